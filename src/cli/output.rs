//! Handles all user-facing output for the CLI.

use std::io::Write;
use std::path::Path;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::compiler::DroppedEntry;
use crate::SpecError;

/// Prints a diagnostic report for `error` to stderr.
pub fn print_error(error: SpecError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}

/// Prints warnings for entries the compiler dropped.
pub fn print_dropped(dropped: &[DroppedEntry]) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    for entry in dropped {
        let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
        let _ = write!(stderr, "warning");
        let _ = stderr.reset();
        let _ = writeln!(
            stderr,
            ": dropped entry {} of '{}' ({}): {}",
            entry.index, entry.suite, entry.shape, entry.reason
        );
    }
}

/// Prints one line of `check` progress.
pub fn print_check_line(path: &Path, ok: bool) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let (mark, color) = if ok {
        ("✓", Color::Green)
    } else {
        ("✗", Color::Red)
    };
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)));
    let _ = write!(stdout, "{mark}");
    let _ = stdout.reset();
    let _ = writeln!(stdout, " {}", path.display());
}

pub fn print_summary(passed: usize, failed: usize) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_bold(true));
    let _ = writeln!(stdout, "\nChecked {} spec files", passed + failed);
    let _ = stdout.reset();
    if failed > 0 {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
        let _ = writeln!(stdout, "{failed} failed");
        let _ = stdout.reset();
    }
}
