//! Status lines for the one-shot commands
//!
//! `list`, `show`, `export` and `config` report their outcome as one tagged
//! line. Results and info go to stdout so they can be piped; warnings and
//! errors go to stderr. Colors are only emitted when the stream is a terminal.

use std::io::{IsTerminal, Write};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Tag {
    Info,
    Warn,
    Error,
    Success,
}

impl Tag {
    fn label(self) -> &'static str {
        match self {
            Tag::Info => "[INFO]",
            Tag::Warn => "[WARN]",
            Tag::Error => "[ERROR]",
            Tag::Success => "[SUCCESS]",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Tag::Info => "\x1b[1;33m",
            Tag::Warn => "\x1b[1;91m",
            Tag::Error => "\x1b[1;31m",
            Tag::Success => "\x1b[1;32m",
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Tag::Warn | Tag::Error)
    }
}

/// `[TAG] title`, followed by a tab and the details when there are any.
fn format_line(tag: Tag, title: &str, details: &str, color: bool) -> String {
    let mut line = if color {
        format!("{}{}\x1b[0m {}", tag.color(), tag.label(), title)
    } else {
        format!("{} {}", tag.label(), title)
    };
    if !details.is_empty() {
        line.push_str("\t ");
        line.push_str(details);
    }
    line
}

fn emit(tag: Tag, title: &str, details: &str) {
    // A closed pipe is not worth a panic.
    let _ = if tag.to_stderr() {
        let stderr = std::io::stderr();
        let color = stderr.is_terminal();
        writeln!(stderr.lock(), "{}", format_line(tag, title, details, color))
    } else {
        let stdout = std::io::stdout();
        let color = stdout.is_terminal();
        writeln!(stdout.lock(), "{}", format_line(tag, title, details, color))
    };
}

/// Effective settings, hints.
pub fn print_info(title: &str, details: &str) {
    emit(Tag::Info, title, details);
}

/// Recoverable problems, such as an unreadable config file.
pub fn print_warn(title: &str, details: &str) {
    emit(Tag::Warn, title, details);
}

/// Why a command failed. The caller still returns the error.
pub fn print_error(title: &str, details: &str) {
    emit(Tag::Error, title, details);
}

pub fn print_success(title: &str, details: &str) {
    emit(Tag::Success, title, details);
}

#[macro_export]
macro_rules! print_cmd_info {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_info($title, &format!($($details)*))
    };
}

#[macro_export]
macro_rules! print_cmd_warn {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_warn($title, &format!($($details)*))
    };
}

/// `print_cmd_error!("Export failed.")` or with format arguments for the details.
#[macro_export]
macro_rules! print_cmd_error {
    ($title:expr) => {
        $crate::cli_messages::print_error($title, "")
    };
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_error($title, &format!($($details)*))
    };
}

#[macro_export]
macro_rules! print_cmd_success {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_success($title, &format!($($details)*))
    };
}
