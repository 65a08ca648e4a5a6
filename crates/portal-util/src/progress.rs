//! Terminal status lines and spinners, written to stderr so stdout stays
//! free for command output.

use std::io::Write;
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

fn print_status(style: Style, label: &str, message: &str) {
    let _ = writeln!(
        std::io::stderr(),
        "{:>12} {message}",
        style.bold().apply_to(label)
    );
}

/// `     Pulling https://github.com/...` with a green label.
pub fn status(label: &str, message: &str) {
    print_status(Style::new().green(), label, message);
}

/// Informational line, cyan label.
pub fn status_info(label: &str, message: &str) {
    print_status(Style::new().cyan(), label, message);
}

pub fn status_warn(label: &str, message: &str) {
    print_status(Style::new().yellow(), label, message);
}

/// Spinner for a step of unknown length; clear it with
/// [`ProgressBar::finish_and_clear`] before printing the outcome.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
