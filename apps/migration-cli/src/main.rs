use clap::{Parser, ValueEnum};
use migration::MigrationCommand;
use sea_orm::{ConnectOptions, Database};

#[derive(Clone, Copy, ValueEnum)]
enum Command {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

impl From<Command> for MigrationCommand {
    fn from(c: Command) -> Self {
        match c {
            Command::Up => MigrationCommand::Up,
            Command::Down => MigrationCommand::Down,
            Command::Fresh => MigrationCommand::Fresh,
            Command::Reset => MigrationCommand::Reset,
            Command::Refresh => MigrationCommand::Refresh,
            Command::Status => MigrationCommand::Status,
        }
    }
}

#[derive(Parser)]
#[command(name = "migration")]
#[command(about = "Taleforge database migration tool")]
struct Args {
    /// Migration command to run
    #[arg(value_enum)]
    command: Command,

    /// Database URL (postgres://... or sqlite://path?mode=rwc); falls back to DATABASE_URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_env_filter("migration=info,sqlx=warn")
        .init();

    let args = Args::parse();

    let url = match args
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
    {
        Some(url) => url,
        None => {
            eprintln!("DATABASE_URL must be set (or pass --database-url)");
            std::process::exit(2);
        }
    };

    if url.contains(":memory:") {
        eprintln!("In-memory SQLite is discarded when the CLI exits; use a file or Postgres URL.");
        std::process::exit(2);
    }

    let mut opts = ConnectOptions::new(url);
    opts.sqlx_logging(false);

    let db = match Database::connect(opts).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to connect: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = migration::migrate(&db, args.command.into()).await {
        eprintln!("Migration failed: {e}");
        std::process::exit(1);
    }
}
