//! Governance polling command line interface.

mod config;
mod error;
mod export;
mod loaders;
mod print;
mod vote;

use {
    clap::{crate_version, ArgMatches},
    error::CliError,
    log::error,
    std::process::exit,
};

fn main() {
    let matches = config::get_clap_app(crate_version!()).get_matches();

    // set log verbosity level
    let log_level = match matches.value_of("log_level").unwrap_or("info") {
        "warning" => "warn",
        level => level,
    };
    solana_logger::setup_with_default(
        format!("governance_polling={0},analytics={0}", log_level).as_str(),
    );

    if let Err(e) = run(&matches) {
        error!("{}", e);
        exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    // load config params
    let config = config::Config::new(matches)?;
    let provider = loaders::load_snapshot(&config)?;

    // parse commands
    match matches.subcommand() {
        ("list", Some(_subcommand_matches)) => {
            print::list(&config, &provider);
        }
        ("show", Some(subcommand_matches)) => {
            print::show(
                &config,
                &provider,
                &config::get_slug(subcommand_matches),
                config::get_account(subcommand_matches).as_deref(),
            )?;
        }
        ("rank", Some(subcommand_matches)) => {
            vote::rank(
                &config,
                &provider,
                &config::get_slug(subcommand_matches),
                &config::get_account(subcommand_matches).unwrap_or_default(),
                &config::get_choices(subcommand_matches)?,
            )?;
        }
        ("vote", Some(subcommand_matches)) => {
            vote::vote(
                &config,
                &provider,
                &config::get_slug(subcommand_matches),
                &config::get_account(subcommand_matches).unwrap_or_default(),
                config::get_option_position(
                    subcommand_matches.value_of("option").unwrap_or_default(),
                )?,
            )?;
        }
        ("withdraw", Some(subcommand_matches)) => {
            vote::withdraw(
                &config,
                &provider,
                &config::get_slug(subcommand_matches),
                &config::get_account(subcommand_matches).unwrap_or_default(),
            )?;
        }
        ("export-raw", Some(subcommand_matches)) => {
            export::export_raw(
                &config,
                &provider,
                &config::get_slug(subcommand_matches),
                config::get_out_dir(subcommand_matches).as_deref(),
            )?;
        }
        _ => unreachable!(),
    }

    Ok(())
}
