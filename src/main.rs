mod api;
mod cli_messages;
mod commands;
mod config;
mod consts;
mod environment;
mod events;
mod fleet;
mod logging;
mod network;
mod report;
mod session;
mod ui;
mod workers;

use crate::api::{ComplianceClient, ExportFormat};
use crate::commands::{ListOptions, export_data, list_machines, show_machine};
use crate::config::Config;
use crate::consts::cli_consts::refresh;
use crate::environment::{API_URL_ENV, Environment};
use crate::fleet::{FilterCriteria, IssueKind, SortColumn, SortDirection, SortState, ViewMode};
use crate::network::NetworkClient;
use crate::session::{run_headless_mode, run_tui_mode, setup_session};
use crate::ui::UIConfig;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line arguments
struct Args {
    /// Base URL of the compliance API (overrides POSTURE_API_URL and the config file)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Command to execute. Defaults to the dashboard.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive dashboard
    Dashboard {
        /// Seconds between automatic refreshes
        #[arg(long, value_name = "SECS")]
        refresh_secs: Option<u64>,

        /// Start in card view instead of the table
        #[arg(long)]
        cards: bool,

        /// Disable background color
        #[arg(long)]
        no_background: bool,
    },
    /// Poll the API and print activity without a terminal UI
    Watch {
        /// Run without the interactive dashboard
        #[arg(long, required = true)]
        headless: bool,

        /// Seconds between automatic refreshes
        #[arg(long, value_name = "SECS")]
        refresh_secs: Option<u64>,
    },
    /// Print the machine list once
    List {
        /// Only machines with this exact OS name
        #[arg(long)]
        os: Option<String>,

        /// Only machines failing this check
        /// (unencrypted_disk, outdated_os, no_antivirus, sleep_noncompliant)
        #[arg(long, value_name = "KIND")]
        issue: Option<IssueKind>,

        /// Case-insensitive substring of the machine ID
        #[arg(long, value_name = "TEXT")]
        search: Option<String>,

        /// Sort column (machine_id, os, status, timestamp)
        #[arg(long, value_name = "COLUMN")]
        sort: Option<SortColumn>,

        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,

        /// Print cards instead of a table
        #[arg(long, conflicts_with = "json")]
        cards: bool,

        /// Print the raw records as JSON
        #[arg(long)]
        json: bool,

        /// Let the server apply the OS and issue filters too
        #[arg(long)]
        server_filter: bool,
    },
    /// Print one machine's full report
    Show {
        /// Machine ID
        #[arg(value_name = "MACHINE_ID")]
        machine_id: String,

        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Download an export of all machines as machines_data.<format>
    Export {
        /// Export format (json or csv)
        format: ExportFormat,

        /// Directory to write into (defaults to the configured export directory)
        #[arg(long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
    /// Show or change the stored configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the configuration file
    Show,
    /// Store the API base URL
    SetUrl {
        /// http(s) URL, or "local"
        url: String,
    },
    /// Delete the configuration file
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Command::Dashboard {
        refresh_secs: None,
        cards: false,
        no_background: false,
    });

    // The TUI owns the terminal; everything else logs to stderr.
    if !matches!(command, Command::Dashboard { .. }) {
        logging::init_headless_logger();
    }

    let config_path = Config::default_path()?;
    let config = match Config::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            print_cmd_warn!("Ignoring config file.", "{}", e);
            Config::default()
        }
    };

    let env_value = std::env::var(API_URL_ENV).ok();
    let environment = Environment::resolve(
        args.api_url.as_deref(),
        env_value.as_deref(),
        config.api_url.as_deref(),
    );

    match command {
        Command::Dashboard {
            refresh_secs,
            cards,
            no_background,
        } => {
            let interval = refresh_interval(refresh_secs, &config);
            let view_mode = if cards {
                ViewMode::Cards
            } else {
                config.default_view
            };
            let session = setup_session(environment, interval, config.export_dir())?;
            run_tui_mode(session, UIConfig::new(!no_background, view_mode, interval)).await
        }
        Command::Watch { refresh_secs, .. } => {
            let interval = refresh_interval(refresh_secs, &config);
            let session = setup_session(environment, interval, config.export_dir())?;
            run_headless_mode(session).await
        }
        Command::List {
            os,
            issue,
            search,
            sort,
            asc,
            cards,
            json,
            server_filter,
        } => {
            let api = ComplianceClient::new(environment)?;
            let direction = if asc {
                SortDirection::Asc
            } else {
                SortDirection::Desc
            };
            let options = ListOptions {
                criteria: FilterCriteria {
                    os,
                    issue,
                    search: search.unwrap_or_default(),
                },
                sort: SortState::new(sort.unwrap_or(SortState::default().column), direction),
                cards,
                json,
                server_filter,
            };
            let output = list_machines(&api, &NetworkClient::default(), &options, Utc::now())
                .await
                .inspect_err(|e| print_cmd_error!("Failed to load machine data.", "{}", e))?;
            println!("{}", output);
            Ok(())
        }
        Command::Show { machine_id, json } => {
            let api = ComplianceClient::new(environment)?;
            let output = show_machine(&api, &NetworkClient::default(), &machine_id, json, Utc::now())
                .await
                .inspect_err(|e| print_cmd_error!("Failed to load machine details.", "{}", e))?;
            println!("{}", output);
            Ok(())
        }
        Command::Export { format, output } => {
            let api = ComplianceClient::new(environment)?;
            let dir = output.unwrap_or_else(|| config.export_dir());
            let path = export_data(&api, format, &dir)
                .await
                .inspect_err(|e| print_cmd_error!("Export failed.", "{}", e))?;
            print_cmd_success!("Export complete.", "{} data saved to {}", format, path.display());
            Ok(())
        }
        Command::Config { action } => run_config_action(action, config, &config_path, &environment),
    }
}

/// Refresh interval from the flag or the config file, clamped to the minimum.
fn refresh_interval(flag: Option<u64>, config: &Config) -> std::time::Duration {
    match flag {
        Some(secs) => refresh::clamp_interval(secs),
        None => config.refresh_interval(),
    }
}

fn run_config_action(
    action: ConfigAction,
    mut config: Config,
    config_path: &Path,
    environment: &Environment,
) -> Result<(), Box<dyn Error>> {
    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            print_cmd_info!(
                "Effective API URL:",
                "{} (config file: {})",
                environment.api_url(),
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::SetUrl { url } => {
            let parsed: Environment = url.parse().map_err(|e: String| {
                print_cmd_error!("Invalid API URL.", "{}", e);
                e
            })?;
            config.api_url = Some(parsed.api_url());
            config
                .save(config_path)
                .map_err(|e| format!("Failed to save config: {}", e))?;
            print_cmd_success!("API URL saved.", "{}", parsed.api_url());
            Ok(())
        }
        ConfigAction::Reset => {
            Config::clear(config_path)?;
            print_cmd_success!("Configuration reset.", "{}", config_path.display());
            Ok(())
        }
    }
}
