use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use testscope_core::cli;
use testscope_core::config::FilterSettings;
use testscope_core::error::IoError;
use testscope_core::filter::select_catalog_file;
use testscope_core::logging::{self, Verbosity};
use testscope_core::output::OutputFormatter;
use testscope_core::reference::{ArtifactSource, InMemorySource, ManifestDirectory};

fn main() -> Result<()> {
    let args = cli::Args::parse();
    logging::init(Verbosity::from_flags(args.verbose, args.quiet));
    args.validate().context("Invalid arguments")?;

    let env = FilterSettings::from_env().context("Invalid module filter configuration")?;
    let config = args
        .filter_config(env)
        .context("Invalid module filter configuration")?;

    let manifests = args.artifacts.as_ref().map(ManifestDirectory::new);
    let empty = InMemorySource::new();
    let source: &dyn ArtifactSource = match manifests {
        Some(ref dir) => dir,
        None => &empty,
    };

    let selection =
        select_catalog_file(&args.catalog, &config, source).context("Test selection aborted")?;

    let rendered = OutputFormatter::format(&selection, &config, args.format)?;
    match args.output_file {
        Some(ref path) => {
            std::fs::write(path, rendered).map_err(|e| IoError::write_error(path, e))?;
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
