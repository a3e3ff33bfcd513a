//! Poll snapshot loading

use {
    crate::{config::Config, error::CliError},
    governance_polling::{
        analytics::LogAnalyticsSink,
        provider::{PollDataProvider, SnapshotProvider},
        state::poll::AccountAddress,
        view::PollView,
    },
    log::{debug, info},
    std::fs,
};

pub fn load_snapshot(config: &Config) -> Result<SnapshotProvider, CliError> {
    info!(
        "Loading poll snapshot from {}...",
        config.snapshot_path.display()
    );
    let data = fs::read_to_string(&config.snapshot_path)?;
    Ok(SnapshotProvider::from_json(&data)?)
}

/// Opens the poll view and resolves the account's recorded vote
pub fn open_view(
    config: &Config,
    provider: &SnapshotProvider,
    slug: &str,
    account: Option<&str>,
) -> Result<PollView, CliError> {
    let poll = provider.find_poll_by_slug(slug)?;
    debug!("Poll {} resolved from slug {}", poll.poll_id, slug);

    let mut view = PollView::with_analytics(
        poll,
        config.analytics.clone(),
        Box::new(LogAnalyticsSink),
    );

    if let Some(request) = view.set_account(account.map(AccountAddress::new)) {
        let vote = provider.get_existing_vote(&request.account, view.poll())?;
        view.complete_fetch(&request, vote)?;
    }

    Ok(view)
}
