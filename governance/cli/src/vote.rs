//! Handlers for rank, vote and withdraw commands

use {
    crate::{config::Config, error::CliError, loaders, print::print_payload},
    governance_polling::provider::SnapshotProvider,
    log::info,
};

pub fn rank(
    config: &Config,
    provider: &SnapshotProvider,
    slug: &str,
    account: &str,
    choices: &[u8],
) -> Result<(), CliError> {
    info!("Ranking {} choice(s) on poll {}...", choices.len(), slug);

    let mut view = loaders::open_view(config, provider, slug, Some(account))?;
    for (slot_index, position) in choices.iter().enumerate() {
        if slot_index > 0 {
            view.add_choice()?;
        }
        view.rank(slot_index, *position)?;
    }

    print_payload(config, &view.submit()?)
}

pub fn vote(
    config: &Config,
    provider: &SnapshotProvider,
    slug: &str,
    account: &str,
    position: u8,
) -> Result<(), CliError> {
    info!("Voting for option {} on poll {}...", position + 1, slug);

    let mut view = loaders::open_view(config, provider, slug, Some(account))?;
    view.select_option(position)?;

    print_payload(config, &view.submit()?)
}

pub fn withdraw(
    config: &Config,
    provider: &SnapshotProvider,
    slug: &str,
    account: &str,
) -> Result<(), CliError> {
    info!("Withdrawing vote of {} on poll {}...", account, slug);

    let mut view = loaders::open_view(config, provider, slug, Some(account))?;

    print_payload(config, &view.withdraw()?)
}
