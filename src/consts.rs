pub mod cli_consts {
    //! Dashboard Configuration Constants
    //!
    //! Tunables for polling, the activity log and the request layer,
    //! organized by functional area.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Maximum number of buffered events between workers and the UI
    pub const EVENT_QUEUE_SIZE: usize = 100;

    /// Maximum number of buffered controller commands
    pub const COMMAND_QUEUE_SIZE: usize = 16;

    // =============================================================================
    // POLLING CONFIGURATION
    // =============================================================================

    /// Auto-refresh configuration
    pub mod refresh {
        use std::time::Duration;

        /// Default interval between collection fetches (seconds)
        pub const DEFAULT_INTERVAL_SECS: u64 = 300;

        /// Shortest interval a user may configure (seconds)
        pub const MIN_INTERVAL_SECS: u64 = 5;

        pub const fn default_interval() -> Duration {
            Duration::from_secs(DEFAULT_INTERVAL_SECS)
        }

        /// Clamp a requested interval to the supported minimum.
        pub fn clamp_interval(secs: u64) -> Duration {
            Duration::from_secs(secs.max(MIN_INTERVAL_SECS))
        }
    }

    /// Search input configuration
    pub mod search {
        use std::time::Duration;

        /// Quiet period after the last keystroke before the filter is applied (milliseconds)
        pub const DEBOUNCE_MS: u64 = 300;

        pub const fn debounce() -> Duration {
            Duration::from_millis(DEBOUNCE_MS)
        }
    }

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// HTTP request configuration
    pub mod http {
        use std::time::Duration;

        /// Connect and total request timeout (seconds)
        pub const TIMEOUT_SECS: u64 = 10;

        /// Maximum attempts for a single fetch, including the first
        pub const MAX_RETRIES: u32 = 3;

        /// First retry delay; doubles on each further attempt (milliseconds)
        pub const INITIAL_BACKOFF_MS: u64 = 1000;

        /// Upper bound for a single retry delay (milliseconds)
        pub const MAX_BACKOFF_MS: u64 = 30_000;

        pub const fn timeout() -> Duration {
            Duration::from_secs(TIMEOUT_SECS)
        }

        pub const fn initial_backoff() -> Duration {
            Duration::from_millis(INITIAL_BACKOFF_MS)
        }

        pub const fn max_backoff() -> Duration {
            Duration::from_millis(MAX_BACKOFF_MS)
        }
    }

    // =============================================================================
    // EXPORT CONFIGURATION
    // =============================================================================

    /// Base name of downloaded export files
    pub const EXPORT_FILE_STEM: &str = "machines_data";
}
