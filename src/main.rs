use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sprite_patch::PatchJob;

#[derive(Parser, Debug)]
#[command(author, version, about = "Paint over the label of the big UI button sprite")]
struct Args {
    /// Optional JSON job file; without it the built-in button job runs
    job: Option<PathBuf>,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let job = match &args.job {
        Some(path) => PatchJob::from_json_file(path)
            .with_context(|| format!("could not load job {}", path.display()))?,
        None => PatchJob::default(),
    };

    let report = sprite_patch::run(&job).with_context(|| {
        format!("patching {} -> {} failed", job.input.display(), job.output.display())
    })?;

    println!("{}", report.output.display());
    Ok(())
}
