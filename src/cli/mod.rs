mod commands;
pub mod error;
pub mod utils;

#[cfg(test)]
#[path = "utils_test.rs"]
mod utils_test;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::commands::PageParams;
use crate::cli::error::CliResult;
use crate::config::{Config, ConfigOverrides};
use crate::entities::birthdays::BirthdayFilter;
use crate::review::{ApplicationKind, ApplicationStatus};
use crate::stats::DEFAULT_RECENT;
use crate::store::{PostgrestClient, Remote};

#[derive(Parser)]
#[command(name = "cadmin")]
#[command(author, version, about = "Community administration CLI", long_about = None)]
pub struct Cli {
    /// Backend project URL (default: CADMIN_URL env or config file)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Anonymous API key (default: CADMIN_ANON_KEY env or config file)
    #[arg(long, global = true)]
    pub anon_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// YAML config file (default: CADMIN_CONFIG env)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Member directory
    Members {
        #[command(subcommand)]
        command: ListCommand,
    },
    /// Doctor directory
    Doctors {
        #[command(subcommand)]
        command: ListCommand,
    },
    /// Families grouped by family number
    Families {
        #[command(subcommand)]
        command: ListCommand,
    },
    /// Committees and their members
    Committees {
        #[command(subcommand)]
        command: CommitteeCommands,
    },
    /// Review submitted applications
    Applications {
        #[command(subcommand)]
        command: ApplicationCommands,
    },
    /// Dashboard counters
    Stats {
        /// Number of recent event applications to show
        #[arg(long, default_value_t = DEFAULT_RECENT)]
        recent: usize,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Member birthdays
    Birthdays {
        /// today, month or all
        #[arg(default_value = "all")]
        filter: BirthdayFilter,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Args)]
struct ListArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    page: usize,
    /// Rows per page (default: config page_size)
    #[arg(long)]
    page_size: Option<usize>,
    /// Case-insensitive search across the searchable columns
    #[arg(long)]
    search: Option<String>,
    /// Exact match filter, repeatable (e.g. --filter gender=Female)
    #[arg(long = "filter")]
    filters: Vec<String>,
    /// Output format (table or json)
    #[arg(long, default_value = "table")]
    format: String,
}

impl ListArgs {
    fn page(&self, config: &Config) -> PageParams<'_> {
        PageParams {
            page: self.page,
            page_size: self.page_size.unwrap_or(config.page_size),
            search: self.search.as_deref(),
            filters: &self.filters,
        }
    }
}

#[derive(Subcommand)]
enum ListCommand {
    /// List one page
    List(ListArgs),
}

#[derive(Subcommand)]
enum CommitteeCommands {
    /// List committees
    List {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand)]
enum ApplicationCommands {
    /// List applications of one kind
    List {
        /// event, donation, education_loan, business_loan, girls_hostel, mulund_hostel or vatsalyadham
        kind: ApplicationKind,
        #[command(flatten)]
        args: ListArgs,
    },
    /// Approve a pending application
    Approve {
        kind: ApplicationKind,
        /// Application ID
        id: String,
    },
    /// Reject a pending application
    Reject {
        kind: ApplicationKind,
        /// Application ID
        id: String,
    },
}

/// Initialize tracing subscriber with env filter
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "community_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub async fn run() -> miette::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        // Show help when no command provided
        let _ = Cli::parse_from(["cadmin", "--help"]);
        return Ok(());
    };

    init_tracing();
    let config = Config::load(ConfigOverrides {
        url: cli.url,
        anon_key: cli.anon_key,
        timeout_secs: cli.timeout_secs,
        file: cli.config,
    })?;
    let remote: Arc<dyn Remote> = Arc::new(PostgrestClient::new(&config)?);

    let output = dispatch(command, remote, &config).await?;
    println!("{}", output);
    Ok(())
}

async fn dispatch(command: Commands, remote: Arc<dyn Remote>, config: &Config) -> CliResult<String> {
    match command {
        Commands::Members {
            command: ListCommand::List(args),
        } => commands::members::list_members(remote, args.page(config), &args.format).await,
        Commands::Doctors {
            command: ListCommand::List(args),
        } => commands::doctors::list_doctors(remote, args.page(config), &args.format).await,
        Commands::Families {
            command: ListCommand::List(args),
        } => commands::families::list_families(remote, args.page(config), &args.format).await,
        Commands::Committees {
            command: CommitteeCommands::List { format },
        } => commands::committees::list_committees(remote.as_ref(), &format).await,
        Commands::Applications { command } => match command {
            ApplicationCommands::List { kind, args } => {
                commands::applications::list_applications(
                    remote,
                    kind,
                    args.page(config),
                    &args.format,
                )
                .await
            }
            ApplicationCommands::Approve { kind, id } => {
                commands::applications::decide(
                    remote.as_ref(),
                    kind,
                    &id,
                    ApplicationStatus::Approved,
                )
                .await
            }
            ApplicationCommands::Reject { kind, id } => {
                commands::applications::decide(
                    remote.as_ref(),
                    kind,
                    &id,
                    ApplicationStatus::Rejected,
                )
                .await
            }
        },
        Commands::Stats { recent, format } => {
            commands::stats::show_stats(remote.as_ref(), recent, &format).await
        }
        Commands::Birthdays { filter, format } => {
            let today = Local::now().date_naive();
            commands::birthdays::list_birthdays(remote.as_ref(), filter, today, &format).await
        }
    }
}
