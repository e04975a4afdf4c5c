// Command table and handlers.
//
// Every command name maps to one [`Command`] variant and [`run`] dispatches
// through a single `match`. Handlers write user-facing output to the given
// writer; errors are returned to the caller, which reports them once.

use crate::api::{self, ApiClient};
use crate::apod::Apod;
use crate::config::Config;
use crate::date::ApodDate;
use crate::error::Error;
use crate::store::ApodStore;
use crate::ui;
use anyhow::{anyhow, Context, Result};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    List,
    FetchSingle,
    FetchRandom,
    FetchRange,
    Details,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::Help,
        Command::List,
        Command::FetchSingle,
        Command::FetchRandom,
        Command::FetchRange,
        Command::Details,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::List => "list",
            Command::FetchSingle => "fetch-single",
            Command::FetchRandom => "fetch-random",
            Command::FetchRange => "fetch-range",
            Command::Details => "details",
        }
    }

    pub fn usage(self) -> &'static str {
        match self {
            Command::Help => "help [command]",
            Command::List => "list",
            Command::FetchSingle => "fetch-single <date>",
            Command::FetchRandom => "fetch-random <count>",
            Command::FetchRange => "fetch-range <start_date> <end_date>",
            Command::Details => "details <date>",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Command::Help => "Show the available commands, or describe one of them",
            Command::List => "List every saved APOD in the storage directory",
            Command::FetchSingle => "Fetch and save the APOD for one date (YYYY-MM-DD)",
            Command::FetchRandom => "Fetch and save <count> random APODs (1-100)",
            Command::FetchRange => "Fetch and save every APOD between two dates, inclusive",
            Command::Details => "Show the saved APOD for one date",
        }
    }
}

/// Name that matched no command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a command", self.0)
    }
}

impl std::error::Error for UnknownCommand {}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(name: &str) -> std::result::Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| UnknownCommand(name.to_string()))
    }
}

/// Run the command named by `args[0]` with the remaining arguments.
pub fn run(args: &[String], config: &Config, out: &mut impl Write) -> Result<()> {
    let (name, rest) = args
        .split_first()
        .ok_or_else(|| anyhow!("no command specified"))?;
    let command: Command = name.parse()?;
    debug!(command = command.name(), args = ?rest, "dispatching");

    match command {
        Command::Help => help(rest.first().map(String::as_str), out),
        Command::List => list(config, out),
        Command::FetchSingle => {
            let date = date_arg(rest, 0, "date")?;
            fetch_single(config, date, out)
        }
        Command::FetchRandom => {
            let raw = arg(rest, 0, "count")?;
            let count = api::parse_count(raw)?;
            fetch_random(config, count, out)
        }
        Command::FetchRange => {
            let start = date_arg(rest, 0, "start_date")?;
            let end = date_arg(rest, 1, "end_date")?;
            fetch_range(config, start, end, out)
        }
        Command::Details => {
            let date = date_arg(rest, 0, "date")?;
            details(config, date, out)
        }
    }
}

fn arg<'a>(args: &'a [String], index: usize, name: &'static str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| Error::MissingArgument(name).into())
}

fn date_arg(args: &[String], index: usize, name: &'static str) -> Result<ApodDate> {
    Ok(arg(args, index, name)?.parse::<ApodDate>()?)
}

pub fn help(topic: Option<&str>, out: &mut impl Write) -> Result<()> {
    match topic {
        None => {
            writeln!(out, "Usage: apod <command> [args...]")?;
            writeln!(out)?;
            writeln!(out, "Commands:")?;
            for command in Command::ALL {
                writeln!(out, "  {:<38}{}", command.usage(), command.description())?;
            }
        }
        Some(name) => {
            let command: Command = name.parse()?;
            writeln!(out, "{}", command.usage())?;
            writeln!(out, "  {}", command.description())?;
        }
    }
    Ok(())
}

pub fn list(config: &Config, out: &mut impl Write) -> Result<()> {
    let store = ApodStore::new(&config.apods_path);
    for apod in store.list()? {
        ui::print_summary(out, &apod)?;
    }
    Ok(())
}

pub fn details(config: &Config, date: ApodDate, out: &mut impl Write) -> Result<()> {
    let store = ApodStore::new(&config.apods_path);
    let apod = store.load(date)?;
    ui::print_details(out, &apod)?;
    Ok(())
}

/// Refuses to touch the network when the date is already saved.
pub fn fetch_single(config: &Config, date: ApodDate, out: &mut impl Write) -> Result<()> {
    let store = ApodStore::new(&config.apods_path);
    if store.exists(date)? {
        return Err(Error::AlreadyExists(store.path_for(date)).into());
    }
    let client = ApiClient::from_config(config)?;

    let spinner = ui::spinner(&format!("Fetching {date}..."));
    let fetched = client.fetch_single(date);
    spinner.finish_and_clear();
    let apod = fetched.with_context(|| format!("fetching APOD for {date}"))?;

    save_all(&store, std::slice::from_ref(&apod), out)
}

pub fn fetch_random(config: &Config, count: u32, out: &mut impl Write) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    let store = ApodStore::new(&config.apods_path);

    let spinner = ui::spinner(&format!("Fetching {count} random entries..."));
    let fetched = client.fetch_random(count);
    spinner.finish_and_clear();
    let apods = fetched.with_context(|| format!("fetching {count} random APODs"))?;

    save_all(&store, &apods, out)
}

/// An inverted range is forwarded unchanged; the service decides.
pub fn fetch_range(
    config: &Config,
    start: ApodDate,
    end: ApodDate,
    out: &mut impl Write,
) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    let store = ApodStore::new(&config.apods_path);

    let spinner = ui::spinner(&format!("Fetching {start} to {end}..."));
    let fetched = client.fetch_range(start, end);
    spinner.finish_and_clear();
    let apods = fetched.with_context(|| format!("fetching APODs from {start} to {end}"))?;

    save_all(&store, &apods, out)
}

// Stops at the first failure; files written before it stay on disk.
fn save_all(store: &ApodStore, apods: &[Apod], out: &mut impl Write) -> Result<()> {
    for apod in apods {
        let path = store.save(apod)?;
        info!(target: "apod::store", date = %apod.date, "saved");
        ui::print_saved(out, &path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const RECORD: &str =
        r#"{"date":"2024-01-01","title":"T","explanation":"E","url":"http://x","media_type":"image"}"#;

    fn config(dir: &TempDir) -> Config {
        Config {
            api_key: None,
            apods_path: dir.path().to_path_buf(),
            // Port 9 (discard) is never expected to be reached.
            api_url: "http://127.0.0.1:9/apod".into(),
            max_response_bytes: 1024,
        }
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn run_capture(list: &[&str], config: &Config) -> (Result<()>, String) {
        let mut out = Vec::new();
        let result = run(&args(list), config, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn names_map_to_commands() {
        for command in Command::ALL {
            assert_eq!(command.name().parse::<Command>().unwrap(), command);
        }
        let err = "fetch".parse::<Command>().unwrap_err();
        assert_eq!(err.to_string(), "'fetch' is not a command");
    }

    #[test]
    fn no_command() {
        let tmp = TempDir::new().unwrap();
        let (result, out) = run_capture(&[], &config(&tmp));
        assert_eq!(result.unwrap_err().to_string(), "no command specified");
        assert!(out.is_empty());
    }

    #[test]
    fn help_lists_every_command() {
        let tmp = TempDir::new().unwrap();
        let (result, out) = run_capture(&["help"], &config(&tmp));
        result.unwrap();
        for command in Command::ALL {
            assert!(out.contains(command.usage()), "{}", command.name());
        }
    }

    #[test]
    fn help_for_one_command() {
        let tmp = TempDir::new().unwrap();
        let (result, out) = run_capture(&["help", "details"], &config(&tmp));
        result.unwrap();
        assert_eq!(out, "details <date>\n  Show the saved APOD for one date\n");

        let (result, _) = run_capture(&["help", "bogus"], &config(&tmp));
        assert_eq!(result.unwrap_err().to_string(), "'bogus' is not a command");
    }

    #[test]
    fn missing_arguments() {
        let tmp = TempDir::new().unwrap();
        for (cmd, name) in [
            (vec!["details"], "date"),
            (vec!["fetch-single"], "date"),
            (vec!["fetch-random"], "count"),
            (vec!["fetch-range", "2024-01-01"], "end_date"),
        ] {
            let (result, _) = run_capture(&cmd, &config(&tmp));
            let err = result.unwrap_err();
            assert!(
                matches!(err.downcast_ref::<Error>(), Some(Error::MissingArgument(n)) if *n == name),
                "{cmd:?}: {err}"
            );
        }
    }

    #[test]
    fn list_and_details_read_saved_records() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("2024-01-01.json"), RECORD).unwrap();

        let (result, out) = run_capture(&["list"], &config(&tmp));
        result.unwrap();
        assert_eq!(out, "2024-01-01 (image) - T\n");

        let (result, out) = run_capture(&["details", "2024-01-01"], &config(&tmp));
        result.unwrap();
        assert!(out.contains("2024-01-01 (image) - T (C)"));
        assert!(out.contains("\nE\n"));
        assert!(out.contains("http://x"));
    }

    #[test]
    fn details_missing_prints_nothing() {
        let tmp = TempDir::new().unwrap();
        let (result, out) = run_capture(&["details", "2024-01-02"], &config(&tmp));
        let err = result.unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NotFound(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn fetch_single_existing_is_refused_before_key_check() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("2024-01-01.json");
        fs::write(&path, RECORD).unwrap();

        let (result, out) = run_capture(&["fetch-single", "2024-01-01"], &config(&tmp));
        let err = result.unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::AlreadyExists(_))));
        assert!(out.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), RECORD);
    }

    #[test]
    fn fetch_commands_need_a_valid_key() {
        let tmp = TempDir::new().unwrap();
        let mut cfg = config(&tmp);
        let cases: [&[&str]; 3] = [
            &["fetch-single", "2024-01-01"],
            &["fetch-random", "3"],
            &["fetch-range", "2024-01-01", "2024-01-03"],
        ];

        for case in cases {
            let (result, _) = run_capture(case, &cfg);
            let err = result.unwrap_err();
            assert!(matches!(err.downcast_ref::<Error>(), Some(Error::MissingApiKey)), "{case:?}");
        }

        cfg.api_key = Some("short".into());
        for case in cases {
            let (result, _) = run_capture(case, &cfg);
            let err = result.unwrap_err();
            assert!(
                matches!(err.downcast_ref::<Error>(), Some(Error::InvalidApiKey { .. })),
                "{case:?}"
            );
        }
    }

    #[test]
    fn fetch_random_rejects_bad_counts() {
        let tmp = TempDir::new().unwrap();
        for count in ["0", "101", "many"] {
            let (result, _) = run_capture(&["fetch-random", count], &config(&tmp));
            let err = result.unwrap_err();
            assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidNumber(_))));
        }
    }

    #[test]
    fn invalid_dates_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let (result, _) = run_capture(&["details", "yesterday"], &config(&tmp));
        let err = result.unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidDate(_))));
    }
}
