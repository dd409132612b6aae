//! # Generate — write the license manifest of a bundle.
//!
//! Package directories come from positional arguments and, with
//! `--modules-from`, from a file listing one bundled module path per line
//! (the bundler's module graph). Module paths are mapped to their owning
//! package directory; paths outside `node_modules` are ignored.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use ossmeta_manifest::{
    render_artifacts, write_artifacts, ManifestAssembler, NoticeRenderer, PackageDirectorySet,
};
use ossmeta_resolve::{LicenseTextCache, LicenseTextResolver, SpdxTextClient};

use crate::config::{ConfigFile, ToolOptions};

/// Arguments for `ossmeta generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Package directories, in the order they should appear.
    pub dirs: Vec<PathBuf>,

    /// File listing bundled module paths, one per line.
    #[arg(long)]
    pub modules_from: Option<PathBuf>,

    /// Directory the artifacts are written to.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// File name of the JSON manifest (overrides `outputFilename`).
    #[arg(long, conflicts_with = "no_manifest")]
    pub output_filename: Option<String>,

    /// Do not write the JSON manifest.
    #[arg(long)]
    pub no_manifest: bool,

    /// Also write a plain-text third-party notice under this file name.
    #[arg(long)]
    pub notice: Option<String>,

    /// Fetch canonical SPDX texts for packages that ship no license file.
    #[arg(long)]
    pub replenish_default_license_texts: bool,
}

/// Load the configuration, or defaults when none was given.
pub(crate) fn load_options(config: Option<&Path>) -> Result<ToolOptions> {
    let file = match config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    file.into_options()
}

/// Text resolver with a fresh cache for one CLI invocation.
pub(crate) fn text_resolver(options: &ToolOptions) -> Result<LicenseTextResolver> {
    let client = SpdxTextClient::new(options.spdx_text.clone())
        .context("failed to build license text HTTP client")?;
    Ok(LicenseTextResolver::new(client, Arc::new(LicenseTextCache::new())))
}

/// Execute `ossmeta generate`.
pub async fn run_generate(args: &GenerateArgs, config: Option<&Path>) -> Result<u8> {
    let mut options = load_options(config)?;

    if args.replenish_default_license_texts {
        options.manifest.license.replenish_default_license_texts = true;
    }
    if let Some(name) = &args.output_filename {
        options.emit.output_filename = Some(name.clone());
    }
    if args.no_manifest {
        options.emit.output_filename = None;
    }
    if let Some(name) = &args.notice {
        options.emit = options
            .emit
            .with_additional_file(name.clone(), Arc::new(NoticeRenderer::default()));
    }

    let mut dirs = PackageDirectorySet::new();
    dirs.extend(args.dirs.iter().cloned());

    if let Some(modules_from) = &args.modules_from {
        let content = tokio::fs::read_to_string(modules_from)
            .await
            .with_context(|| format!("failed to read module list: {}", modules_from.display()))?;
        let mut ignored = 0usize;
        for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if dirs.insert_module_path(line).is_none() {
                ignored += 1;
            }
        }
        tracing::debug!(ignored, "module paths outside node_modules skipped");
    }

    tracing::info!(packages = dirs.len(), "package directories collected");

    let resolver = text_resolver(&options)?;
    let assembler = ManifestAssembler::new(options.manifest, resolver);
    let entries = assembler.assemble(dirs).await?;

    let artifacts = render_artifacts(&entries, &options.emit)?;
    write_artifacts(&args.out_dir, &artifacts).await?;

    for artifact in &artifacts {
        println!("Wrote {}", args.out_dir.join(&artifact.file_name).display());
    }
    println!("{} packages in license manifest", entries.len());

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(root: &Path, name: &str, manifest: &str) -> PathBuf {
        let dir = root.join("node_modules").join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("package.json"), manifest).unwrap();
        dir
    }

    fn args(out_dir: PathBuf) -> GenerateArgs {
        GenerateArgs {
            dirs: Vec::new(),
            modules_from: None,
            out_dir,
            output_filename: None,
            no_manifest: false,
            notice: None,
            replenish_default_license_texts: false,
        }
    }

    #[tokio::test]
    async fn writes_manifest_from_module_list() {
        let root = tempfile::tempdir().unwrap();
        package(root.path(), "react", r#"{"name":"react","version":"18.2.0","license":"MIT"}"#);
        let scoped = package(
            root.path(),
            "@scope/util",
            r#"{"name":"@scope/util","version":"1.0.0","license":"ISC"}"#,
        );
        std::fs::write(scoped.join("LICENSE"), "ISC License").unwrap();

        let nm = root.path().join("node_modules");
        let modules = format!(
            "{}\n{}\n/app/src/main.ts\n{}\n",
            nm.join("react/index.js").display(),
            nm.join("@scope/util/dist/index.js").display(),
            nm.join("react/cjs/react.production.min.js").display(),
        );
        let list = root.path().join("modules.txt");
        std::fs::write(&list, modules).unwrap();

        let out = root.path().join("dist");
        let mut args = args(out.clone());
        args.modules_from = Some(list);
        args.notice = Some("NOTICE.txt".into());

        assert_eq!(run_generate(&args, None).await.unwrap(), 0);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("oss-licenses.json")).unwrap())
                .unwrap();
        let names: Vec<_> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["react", "@scope/util"]);
        assert_eq!(json[1]["licenseText"], "ISC License");

        let notice = std::fs::read_to_string(out.join("NOTICE.txt")).unwrap();
        assert!(notice.contains("@scope/util 1.0.0"));
    }

    #[tokio::test]
    async fn config_file_and_flags_combine() {
        let root = tempfile::tempdir().unwrap();
        let foo = package(root.path(), "foo", r#"{"name":"foo","version":"1.2.3","license":"WTFPL"}"#);
        let skip = package(root.path(), "skip", r#"{"name":"skip","version":"0.1.0"}"#);

        let config = root.path().join("ossmeta.yaml");
        std::fs::write(
            &config,
            "licenseOverrides:\n  foo: MIT\nexcludedPackages: [skip]\noutputFilename: from-config.json\n",
        )
        .unwrap();

        let out = root.path().join("out");
        let mut args = args(out.clone());
        args.dirs = vec![foo, skip];
        args.output_filename = Some("from-flag.json".into());

        run_generate(&args, Some(&config)).await.unwrap();

        assert!(!out.join("from-config.json").exists());
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("from-flag.json")).unwrap())
                .unwrap();
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["license"], "MIT");
    }

    #[tokio::test]
    async fn resolution_failure_writes_nothing() {
        let root = tempfile::tempdir().unwrap();
        let bad = package(root.path(), "bad", r#"{"name":"bad","version":"1.0.0"}"#);

        let out = root.path().join("out");
        let mut args = args(out.clone());
        args.dirs = vec![bad];

        let err = run_generate(&args, None).await.unwrap_err();
        assert_eq!(err.to_string(), "Could not find license info for bad@1.0.0");
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn no_manifest_without_notice_writes_no_files() {
        let root = tempfile::tempdir().unwrap();
        let a = package(root.path(), "a", r#"{"name":"a","version":"1.0.0","license":"MIT"}"#);

        let out = root.path().join("out");
        let mut args = args(out.clone());
        args.dirs = vec![a];
        args.no_manifest = true;

        run_generate(&args, None).await.unwrap();
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }
}
