//! Session lifecycle notices
//!
//! Printed around the dashboard and the headless watcher: once before the
//! poller starts and twice on the way out.

use crate::environment::Environment;
use crate::ui::dashboard::utils::format_countdown;
use std::fmt::{self, Display, Formatter};
use std::io::IsTerminal;
use std::time::Duration;

const COLOR_INFO: &str = "\x1b[1;36m";
const COLOR_SUCCESS: &str = "\x1b[1;32m";
const COLOR_RESET: &str = "\x1b[0m";

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
pub enum SessionMode {
    #[strum(to_string = "dashboard")]
    Dashboard,
    #[strum(to_string = "headless watch")]
    Headless,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionNotice {
    Starting {
        mode: SessionMode,
        api_url: String,
        interval: Duration,
    },
    /// Waiting for the poller and in-flight requests to stop.
    Stopping,
    Stopped,
}

impl SessionNotice {
    pub fn starting(mode: SessionMode, environment: &Environment, interval: Duration) -> Self {
        Self::Starting {
            mode,
            api_url: environment.api_url(),
            interval,
        }
    }

    fn tag(&self) -> (&'static str, &'static str) {
        match self {
            Self::Stopped => ("[SUCCESS]", COLOR_SUCCESS),
            _ => ("[INFO]", COLOR_INFO),
        }
    }

    pub fn print(&self) {
        let (tag, color) = self.tag();
        if std::io::stdout().is_terminal() {
            println!("{}{}{} {}", color, tag, COLOR_RESET, self);
        } else {
            println!("{} {}", tag, self);
        }
    }
}

impl Display for SessionNotice {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Starting {
                mode,
                api_url,
                interval,
            } => write!(
                f,
                "Starting {} against {} (refresh every {})",
                mode,
                api_url,
                format_countdown(*interval)
            ),
            Self::Stopping => write!(f, "Stopping poller..."),
            Self::Stopped => write!(f, "Posture Watch exited"),
        }
    }
}
