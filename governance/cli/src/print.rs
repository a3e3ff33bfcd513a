//! Handlers for list and show commands

use {
    crate::{config::Config, error::CliError, loaders},
    base64::{prelude::BASE64_STANDARD, Engine},
    chrono::Utc,
    governance_polling::{
        error::PollingError,
        format::{format_date, PLACEHOLDER},
        instruction::PollingInstruction,
        provider::{PollDataProvider, SnapshotProvider},
        state::poll::Poll,
        tally::VoteBreakdown,
        view::PollView,
    },
    log::info,
};

pub fn list(config: &Config, provider: &SnapshotProvider) {
    info!("Listing polls...");

    println!("Active polls:");
    for poll in provider.active_polls() {
        print_poll_line(config, poll);
    }

    println!("Historical polls:");
    for poll in provider.historical_polls() {
        print_poll_line(config, poll);
    }
}

fn print_poll_line(config: &Config, poll: &Poll) {
    println!(
        "  {} [{}] {} (ends {})",
        poll.slug(),
        poll.poll_id,
        poll.title,
        format_date(poll.end_date, &config.utc_offset)
    );
}

pub fn show(
    config: &Config,
    provider: &SnapshotProvider,
    slug: &str,
    account: Option<&str>,
) -> Result<(), CliError> {
    let view = loaders::open_view(config, provider, slug, account)?;
    let details = view.details(Utc::now(), &config.utc_offset);

    println!("{}", details.title);
    println!("Started: {}", details.start_date);
    println!("{}: {}", details.time_left_title, details.time_left);
    println!("Source: {}", details.source);
    if let Some(url) = &details.discussion_url {
        println!("Discussion: {}", url);
    }
    println!("Total votes: {}", details.total_votes);
    println!("Participation: {}", details.participation);
    println!("Unique voters: {}", details.unique_voters);
    if let Some(winning_option) = &details.winning_option {
        println!("Winning option: {}", winning_option);
    }

    for line in breakdown_lines(&view)? {
        println!("{}", line);
    }

    if account.is_some() {
        print_existing_vote(&view)?;
    }

    Ok(())
}

/// Vote breakdown lines; a placeholder line while the tally is loading
pub fn breakdown_lines(view: &PollView) -> Result<Vec<String>, CliError> {
    let mut lines = vec!["Vote breakdown:".to_string()];

    let breakdown = match view.breakdown() {
        Ok(breakdown) => breakdown,
        Err(PollingError::DataNotReady) => {
            lines.push(format!("  {}", PLACEHOLDER));
            return Ok(lines);
        }
        Err(e) => return Err(e.into()),
    };

    match breakdown {
        VoteBreakdown::Ranked { banner, rows } => {
            lines.push(format!(
                "  {}: {}",
                banner.title,
                banner.leader.as_deref().unwrap_or(PLACEHOLDER)
            ));
            if let Some(rounds) = banner.rounds {
                lines.push(format!("  {}", rounds));
            }
            for row in rows {
                lines.push(format!(
                    "  {} [first {} | {}]",
                    row,
                    row.first_choice.tooltip(),
                    row.transfer.tooltip()
                ));
            }
        }
        VoteBreakdown::SingleChoice { rows, .. } => {
            for row in rows {
                lines.push(format!("  {}", row));
            }
        }
    }

    Ok(lines)
}

fn print_existing_vote(view: &PollView) -> Result<(), CliError> {
    let vote = view.existing_vote()?;

    println!("{}", view.vote_status()?);
    for choice in vote.ranked_choices(view.poll()) {
        println!(
            "  {} {}",
            choice.rank,
            choice.label.as_deref().unwrap_or(PLACEHOLDER)
        );
    }

    Ok(())
}

pub fn print_payload(config: &Config, instruction: &PollingInstruction) -> Result<(), CliError> {
    let payload = instruction.to_json();

    if config.no_pretty_print {
        println!("{}", serde_json::to_string(&payload)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }

    if config.verbose {
        println!("{}", BASE64_STANDARD.encode(instruction.pack()?));
    }

    Ok(())
}
