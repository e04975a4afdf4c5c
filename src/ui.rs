// UI layer: renders records and messages for the terminal. Output goes
// through a caller-supplied writer so commands can be exercised in tests.

use crate::apod::Apod;
use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

/// `<date> (<media_type>) - <title>`
pub fn summary_line(apod: &Apod) -> String {
    format!("{} ({}) - {}", apod.date, apod.media_type, apod.title)
}

/// One line per record, as printed by `list`.
pub fn print_summary(out: &mut impl Write, apod: &Apod) -> io::Result<()> {
    writeln!(out, "{}", summary_line(apod))
}

/// Multi-line view used by `details`.
pub fn print_details(out: &mut impl Write, apod: &Apod) -> io::Result<()> {
    write!(out, "{} (C)", summary_line(apod))?;
    if let Some(copyright) = &apod.copyright {
        write!(out, " {}", copyright.trim())?;
    }
    writeln!(out)?;
    writeln!(out)?;
    writeln!(out, "{}", apod.explanation)?;
    writeln!(out)?;
    writeln!(out, "{}", apod.best_url())
}

pub fn print_saved(out: &mut impl Write, path: &Path) -> io::Result<()> {
    writeln!(out, "Saved {}", path.display())
}

/// Report an error on stderr behind a red `ERROR:` tag.
pub fn print_error(err: &anyhow::Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{} {:#}", "ERROR:".red().bold(), err);
}

/// Spinner shown on stderr while a request is in flight. indicatif hides it
/// when stderr is not a terminal.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
