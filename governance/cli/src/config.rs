//! Configuration and command line arguments management.

use {
    crate::error::CliError,
    chrono::FixedOffset,
    clap::{crate_description, crate_name, App, AppSettings, Arg, ArgMatches, SubCommand},
    governance_polling::analytics::AnalyticsContext,
    serde_derive::{Deserialize, Serialize},
    std::{
        env,
        fs::File,
        path::{Path, PathBuf},
    },
};

/// Settings read from the YAML config file
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub snapshot_path: Option<String>,
    pub utc_offset_minutes: i32,
    pub analytics_product: Option<String>,
    pub analytics_page: Option<String>,
    pub export_dir: Option<String>,
}

impl PollingConfig {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }
}

/// Config file used when --config is not given
pub fn default_config_file() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("governance-polling")
            .join("config.yml")
    })
}

#[derive(Debug)]
pub struct Config {
    pub snapshot_path: PathBuf,
    pub utc_offset: FixedOffset,
    pub analytics: AnalyticsContext,
    pub export_dir: PathBuf,
    pub verbose: bool,
    pub no_pretty_print: bool,
}

impl Config {
    pub fn new(matches: &ArgMatches) -> Result<Self, CliError> {
        let file_config = match matches.value_of("config_file") {
            Some(config_file) => PollingConfig::load(Path::new(config_file)).map_err(|e| {
                CliError::ConfigError(format!(
                    "Failed to load config file \"{}\": {}",
                    config_file, e
                ))
            })?,
            None => match default_config_file() {
                Some(path) if path.exists() => PollingConfig::load(&path)?,
                _ => PollingConfig::default(),
            },
        };

        let snapshot_path = matches
            .value_of("snapshot")
            .map(str::to_string)
            .or(file_config.snapshot_path)
            .ok_or_else(|| {
                CliError::ConfigError(
                    "Poll snapshot is not set, use --snapshot or the config file".to_string(),
                )
            })?;

        let utc_offset_minutes = match matches.value_of("utc_offset") {
            Some(value) => value
                .parse::<i32>()
                .map_err(|_| CliError::ValueError(format!("Invalid UTC offset \"{}\"", value)))?,
            None => file_config.utc_offset_minutes,
        };
        let utc_offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                CliError::ValueError(format!("UTC offset out of range: {}", utc_offset_minutes))
            })?;

        let mut analytics = AnalyticsContext::default();
        if let Some(product) = file_config.analytics_product {
            analytics.product = product;
        }
        if let Some(page) = file_config.analytics_page {
            analytics.page = page;
        }

        let export_dir = file_config.export_dir.unwrap_or_else(|| ".".to_string());

        Ok(Self {
            snapshot_path: PathBuf::from(snapshot_path),
            utc_offset,
            analytics,
            export_dir: PathBuf::from(export_dir),
            verbose: matches.is_present("verbose"),
            no_pretty_print: matches.is_present("no_pretty_print"),
        })
    }
}

pub fn get_slug(matches: &ArgMatches) -> String {
    matches.value_of("poll_slug").unwrap_or_default().to_string()
}

pub fn get_account(matches: &ArgMatches) -> Option<String> {
    matches.value_of("account").map(str::to_string)
}

/// Converts a 1-based option number into its 0-based position
pub fn get_option_position(value: &str) -> Result<u8, CliError> {
    value
        .parse::<u8>()
        .ok()
        .and_then(|number| number.checked_sub(1))
        .ok_or_else(|| CliError::ValueError(format!("Invalid option number \"{}\"", value)))
}

pub fn get_choices(matches: &ArgMatches) -> Result<Vec<u8>, CliError> {
    matches
        .values_of("choice")
        .map(|values| values.map(get_option_position).collect())
        .unwrap_or_else(|| Ok(vec![]))
}

pub fn get_out_dir(matches: &ArgMatches) -> Option<PathBuf> {
    matches.value_of("out_dir").map(PathBuf::from)
}

fn is_option_number(value: String) -> Result<(), String> {
    match value.parse::<u8>() {
        Ok(number) if number >= 1 => Ok(()),
        _ => Err(String::from("Must be an option number starting at 1")),
    }
}

pub fn get_clap_app<'a, 'b>(version: &'b str) -> App<'a, 'b> {
    let poll_slug = Arg::with_name("poll_slug")
        .value_name("POLL_SLUG")
        .required(true)
        .takes_value(true)
        .help("Poll route slug, e.g. greenlight-poll-2020");

    let account = Arg::with_name("account")
        .short("a")
        .long("account")
        .value_name("ADDRESS")
        .takes_value(true)
        .help("Voting account address");

    App::new(crate_name!())
        .about(crate_description!())
        .version(version)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("log_level")
                .short("L")
                .long("log-level")
                .takes_value(true)
                .default_value("info")
                .global(true)
                .help("Log verbosity level (debug, info, warning, error)")
                .validator(|p| {
                    let allowed = ["debug", "info", "warning", "error"];
                    if allowed.contains(&p.as_str()) {
                        Ok(())
                    } else {
                        Err(String::from("Must be one of: debug, info, warning, error"))
                    }
                }),
        )
        .arg(
            Arg::with_name("config_file")
                .short("C")
                .long("config")
                .value_name("PATH")
                .takes_value(true)
                .global(true)
                .help("Configuration file to use [default: ~/.config/governance-polling/config.yml]"),
        )
        .arg(
            Arg::with_name("snapshot")
                .short("s")
                .long("snapshot")
                .value_name("PATH")
                .takes_value(true)
                .global(true)
                .help("Poll snapshot JSON file [default: value from configuration file]"),
        )
        .arg(
            Arg::with_name("utc_offset")
                .long("utc-offset")
                .value_name("MINUTES")
                .takes_value(true)
                .global(true)
                .allow_hyphen_values(true)
                .help("Offset from UTC used to render dates [default: value from configuration file or 0]"),
        )
        .arg(
            Arg::with_name("verbose")
                .long("verbose")
                .short("v")
                .takes_value(false)
                .global(true)
                .help("Show additional information"),
        )
        .arg(
            Arg::with_name("no_pretty_print")
                .short("n")
                .long("no-pretty-print")
                .global(true)
                .takes_value(false)
                .help("Print payloads in one line"),
        )
        .subcommand(
            SubCommand::with_name("list").about("List active and historical polls"),
        )
        .subcommand(
            SubCommand::with_name("show")
                .about("Show poll details, vote breakdown and the account's recorded vote")
                .arg(poll_slug.clone())
                .arg(account.clone()),
        )
        .subcommand(
            SubCommand::with_name("rank")
                .about("Build a ranked-choice vote payload")
                .arg(poll_slug.clone())
                .arg(account.clone().required(true))
                .arg(
                    Arg::with_name("choice")
                        .long("choice")
                        .value_name("OPTION")
                        .takes_value(true)
                        .multiple(true)
                        .required(true)
                        .validator(is_option_number)
                        .help("Option numbers in preference order, starting at 1"),
                ),
        )
        .subcommand(
            SubCommand::with_name("vote")
                .about("Build a single-choice vote payload")
                .arg(poll_slug.clone())
                .arg(account.clone().required(true))
                .arg(
                    Arg::with_name("option")
                        .long("option")
                        .value_name("OPTION")
                        .takes_value(true)
                        .required(true)
                        .validator(is_option_number)
                        .help("Option number, starting at 1"),
                ),
        )
        .subcommand(
            SubCommand::with_name("withdraw")
                .about("Build a withdraw payload for the account's recorded vote")
                .arg(poll_slug.clone())
                .arg(account.required(true)),
        )
        .subcommand(
            SubCommand::with_name("export-raw")
                .about("Write the raw poll document to <multiHash>.txt")
                .arg(poll_slug)
                .arg(
                    Arg::with_name("out_dir")
                        .long("out-dir")
                        .value_name("DIR")
                        .takes_value(true)
                        .help("Output directory [default: value from configuration file or .]"),
                ),
        )
}
