//! # Artifact Emission
//!
//! Turns an assembled manifest into named files. The primary artifact is
//! the pretty-printed JSON manifest. Any number of additional artifacts can
//! be derived from the same entries through [`ArtifactRenderer`]s.

use std::fmt::{self, Write as _};
use std::path::Path;
use std::sync::Arc;

use ossmeta_core::LicenseManifestEntry;

use crate::error::EmitError;

/// Default file name of the JSON manifest.
pub const DEFAULT_OUTPUT_FILENAME: &str = "oss-licenses.json";

/// A rendered file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name relative to the output directory.
    pub file_name: String,
    /// Full file contents.
    pub contents: String,
}

/// Renders manifest entries into the contents of one artifact.
pub trait ArtifactRenderer: Send + Sync {
    /// Contents of the artifact for `entries`, in manifest order.
    fn render(&self, entries: &[LicenseManifestEntry]) -> Result<String, EmitError>;
}

impl<F> ArtifactRenderer for F
where
    F: Fn(&[LicenseManifestEntry]) -> Result<String, EmitError> + Send + Sync,
{
    fn render(&self, entries: &[LicenseManifestEntry]) -> Result<String, EmitError> {
        self(entries)
    }
}

/// Which artifacts to produce.
#[derive(Clone)]
pub struct EmitOptions {
    /// File name of the JSON manifest; `None` disables it.
    pub output_filename: Option<String>,
    /// Additional artifacts keyed by file name, rendered in order.
    pub additional_files: Vec<(String, Arc<dyn ArtifactRenderer>)>,
}

impl EmitOptions {
    /// Register an additional artifact.
    pub fn with_additional_file(
        mut self,
        file_name: impl Into<String>,
        renderer: Arc<dyn ArtifactRenderer>,
    ) -> Self {
        self.additional_files.push((file_name.into(), renderer));
        self
    }
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            output_filename: Some(DEFAULT_OUTPUT_FILENAME.to_string()),
            additional_files: Vec::new(),
        }
    }
}

impl fmt::Debug for EmitOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self
            .additional_files
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        f.debug_struct("EmitOptions")
            .field("output_filename", &self.output_filename)
            .field("additional_files", &names)
            .finish()
    }
}

/// The JSON manifest: an array of entries, two-space indented.
pub fn render_json(entries: &[LicenseManifestEntry]) -> Result<String, EmitError> {
    Ok(serde_json::to_string_pretty(entries)?)
}

/// Render every configured artifact. The JSON manifest, if enabled, comes
/// first.
pub fn render_artifacts(
    entries: &[LicenseManifestEntry],
    options: &EmitOptions,
) -> Result<Vec<Artifact>, EmitError> {
    let mut artifacts = Vec::with_capacity(options.additional_files.len() + 1);

    if let Some(file_name) = &options.output_filename {
        artifacts.push(Artifact {
            file_name: file_name.clone(),
            contents: render_json(entries)?,
        });
    }

    for (file_name, renderer) in &options.additional_files {
        artifacts.push(Artifact {
            file_name: file_name.clone(),
            contents: renderer.render(entries)?,
        });
    }

    Ok(artifacts)
}

/// Write `artifacts` into `out_dir`, creating it if needed.
pub async fn write_artifacts(out_dir: &Path, artifacts: &[Artifact]) -> Result<(), EmitError> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|source| EmitError::Io {
            path: out_dir.to_path_buf(),
            source,
        })?;

    for artifact in artifacts {
        let path = out_dir.join(&artifact.file_name);
        if let Err(source) = tokio::fs::write(&path, &artifact.contents).await {
            return Err(EmitError::Io { path, source });
        }
        tracing::info!(path = %path.display(), bytes = artifact.contents.len(), "artifact written");
    }

    Ok(())
}

/// Plain-text third-party notice: one section per package with its license
/// identifier, links and license text.
#[derive(Debug, Clone)]
pub struct NoticeRenderer {
    /// First line of the notice.
    pub title: String,
}

impl Default for NoticeRenderer {
    fn default() -> Self {
        Self {
            title: "THIRD-PARTY SOFTWARE NOTICES".to_string(),
        }
    }
}

const RULE: &str =
    "================================================================================";

impl NoticeRenderer {
    fn write_notice(&self, out: &mut String, entries: &[LicenseManifestEntry]) -> fmt::Result {
        writeln!(out, "{}", self.title)?;
        writeln!(out)?;
        writeln!(
            out,
            "This software includes the following {} third-party package(s).",
            entries.len()
        )?;

        for entry in entries {
            writeln!(out)?;
            writeln!(out, "{RULE}")?;
            writeln!(out, "{} {}", entry.name, entry.version)?;
            writeln!(out, "License: {}", entry.license)?;
            if let Some(repository) = &entry.repository {
                writeln!(out, "Repository: {repository}")?;
            }
            writeln!(out, "Source: {}", entry.source)?;
            writeln!(out, "{RULE}")?;
            writeln!(out)?;
            match &entry.license_text {
                Some(text) => writeln!(out, "{}", text.trim_end())?,
                None => writeln!(out, "(no license text available)")?,
            }
        }

        Ok(())
    }
}

impl ArtifactRenderer for NoticeRenderer {
    fn render(&self, entries: &[LicenseManifestEntry]) -> Result<String, EmitError> {
        let mut out = String::new();
        self.write_notice(&mut out, entries)
            .map_err(|e| EmitError::Render {
                file_name: "notice".to_string(),
                reason: e.to_string(),
            })?;
        Ok(out)
    }
}
