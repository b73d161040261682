mod analyze;
mod query;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "adgap")]
#[command(about = "Competitive ad gap analysis")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a gap analysis for one subject brand against five competitors
    Analyze {
        /// YAML file listing the subject and competitor brands
        #[arg(long, short)]
        input: PathBuf,

        /// Validate the input and print the brands without calling any service
        #[arg(long)]
        dry_run: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
    },
    /// Print a stored analysis
    Show {
        /// Analysis id
        id: Uuid,

        #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
    },
    /// List recent analyses
    List {
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
    /// Database operations
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Json,
    Markdown,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("adgap: run `adgap --help` for available commands");
        return Ok(());
    };

    if let Commands::Analyze {
        input,
        dry_run: true,
        ..
    } = &command
    {
        return analyze::run_dry_run(input);
    }

    let config = adgap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = adgap_db::PoolConfig::from_app_config(&config);
    let pool = adgap_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Analyze { input, format, .. } => {
            analyze::run_analyze(&config, pool, &input, format).await?;
        }
        Commands::Show { id, format } => query::run_show(&pool, id, format).await?,
        Commands::List { limit } => query::run_list(&pool, limit).await?,
        Commands::Db { command } => match command {
            DbCommands::Ping => {
                adgap_db::ping(&pool).await?;
                println!("database reachable");
            }
            DbCommands::Migrate => {
                let applied = adgap_db::run_migrations(&pool).await?;
                println!("applied {applied} migration(s)");
            }
        },
    }

    Ok(())
}
