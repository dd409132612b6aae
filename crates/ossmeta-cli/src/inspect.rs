//! # Inspect — resolve one package and print its manifest entry.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use ossmeta_manifest::ManifestAssembler;

use crate::generate::{load_options, text_resolver};

/// Arguments for `ossmeta inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Package directory (the one containing `package.json`).
    pub dir: PathBuf,

    /// Fetch the canonical SPDX text if the package ships no license file.
    #[arg(long)]
    pub replenish_default_license_texts: bool,
}

/// Execute `ossmeta inspect`.
pub async fn run_inspect(args: &InspectArgs, config: Option<&Path>) -> Result<u8> {
    let mut options = load_options(config)?;
    if args.replenish_default_license_texts {
        options.manifest.license.replenish_default_license_texts = true;
    }

    let resolver = text_resolver(&options)?;
    let assembler = ManifestAssembler::new(options.manifest, resolver);

    match assembler.assemble_package(&args.dir).await? {
        Some(entry) => {
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        None => {
            println!("{}: excluded by configuration", args.dir.display());
        }
    }

    Ok(0)
}
