use anyhow::Result;
use clap::{Parser, Subcommand};
use sqlx::migrate::MigrateDatabase;
use sqlx_migrator::{Migrate, Plan};

/// pointshub - campus loyalty points ledger
#[derive(Parser)]
#[command(name = "pointshub")]
#[command(about = "Points ledger and transaction engine", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Account administration
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Transaction lookup
    Txn {
        #[command(subcommand)]
        command: TxnCommands,
    },
}

#[derive(Subcommand)]
enum TxnCommands {
    /// Show a transaction by id
    Show {
        #[arg(long)]
        id: String,
    },
    /// List a user's transactions, newest first
    List {
        #[arg(long)]
        utorid: String,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create an account
    Create {
        #[arg(long)]
        utorid: String,
        #[arg(long)]
        name: String,
    },
    /// Change an account's role
    SetRole {
        #[arg(long)]
        utorid: String,
        #[arg(long)]
        role: pointshub::cli::user::Role,
    },
    /// Mark an account verified
    Verify {
        #[arg(long)]
        utorid: String,
    },
    /// Flag or clear a cashier's suspicious hold
    SetSuspicious {
        #[arg(long)]
        utorid: String,
        #[arg(long)]
        suspicious: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = pointshub::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    pointshub::observability::init_observability(
        "pointshub",
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Migrate => migrate_command(config).await,
        Commands::Reset => reset_command(config).await,
        Commands::User { command } => match command {
            UserCommands::Create { utorid, name } => {
                pointshub::cli::user::create(config, utorid, name).await
            }
            UserCommands::SetRole { utorid, role } => {
                pointshub::cli::user::set_role(config, utorid, role).await
            }
            UserCommands::Verify { utorid } => {
                pointshub::cli::user::verify(config, utorid).await
            }
            UserCommands::SetSuspicious { utorid, suspicious } => {
                pointshub::cli::user::set_suspicious(config, utorid, suspicious).await
            }
        },
        Commands::Txn { command } => match command {
            TxnCommands::Show { id } => pointshub::cli::transaction::show(config, id).await,
            TxnCommands::List { utorid } => {
                pointshub::cli::transaction::list(config, utorid).await
            }
        },
    }
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: pointshub::config::Config) -> Result<()> {
    tracing::info!("running migrations...");

    if !sqlx::Sqlite::database_exists(&config.database.url).await? {
        sqlx::Sqlite::create_database(&config.database.url).await?;
        tracing::info!("database created");
    }

    let pool = pointshub::create_pool(&config.database.url, 1).await?;
    let mut conn = pool.acquire().await?;
    pointshub_db::migrator::<sqlx::Sqlite>()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    tracing::info!("migrations complete");

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn reset_command(config: pointshub::config::Config) -> Result<()> {
    if sqlx::Sqlite::database_exists(&config.database.url).await? {
        sqlx::Sqlite::drop_database(&config.database.url).await?;
        tracing::info!("database dropped");
    }

    migrate_command(config).await
}
