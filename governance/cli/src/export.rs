//! Handler for export-raw command

use {
    crate::{config::Config, error::CliError},
    governance_polling::{
        error::PollingError,
        export::RawDocument,
        provider::{PollDataProvider, SnapshotProvider},
    },
    log::info,
    std::path::{Path, PathBuf},
};

/// Writes the raw poll document into out_dir, or the configured export dir
pub fn export_raw(
    config: &Config,
    provider: &SnapshotProvider,
    slug: &str,
    out_dir: Option<&Path>,
) -> Result<PathBuf, CliError> {
    info!("Exporting raw document of poll {}...", slug);

    let poll = provider.find_poll_by_slug(slug)?;
    let document = RawDocument::from_poll(&poll).ok_or(PollingError::DataNotReady)?;
    let path = document.write_to(out_dir.unwrap_or(config.export_dir.as_path()))?;

    println!("{}", path.display());

    Ok(path)
}
