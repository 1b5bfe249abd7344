pub mod config;
pub mod database;
pub mod error;
pub mod existence;
pub mod ids;
pub mod input;
pub mod logging;
pub mod menu;
pub mod var_char;
pub mod workflow;

use clap::Parser;
use config::AppConfig;
use database::Database;
use error::{AppErr, Result};
use ids::IdStrategy;
use input::Prompter;
use menu::Session;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::error;

/// Menu-driven airline operations over a SQLite database
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(value_name = "DATABASE")]
    database: PathBuf,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Create the database file and schema if they are missing
    #[arg(long)]
    init: bool,

    /// Give up on a field after this many invalid lines
    #[arg(long, value_name = "N")]
    max_retries: Option<u32>,

    #[arg(long, value_enum)]
    id_strategy: Option<IdStrategy>,

    /// Log filter, e.g. `info` or `flightdeck=debug`
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "fatal");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    // 명령행 옵션이 설정 파일보다 우선
    if args.init {
        config.database.create_schema = true;
    }
    if args.max_retries.is_some() {
        config.validation.max_retries = args.max_retries;
    }
    if let Some(strategy) = args.id_strategy {
        config.ids.strategy = strategy;
    }
    config.validate()?;
    Ok(config)
}

// 데이터베이스 유무 체크
fn check_database(path: &Path, create: bool) -> Result<()> {
    if !create && !path.exists() {
        return Err(AppErr::Config(format!(
            "Database file not found: '{}'",
            path.display()
        )));
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    logging::init(args.log_level.as_deref(), &config.logging.level)?;

    let create = config.database.create_schema;
    check_database(&args.database, create)?;

    println!("Connecting to database...");
    let db = Database::open(&args.database, create)?;
    if create {
        db.create_schema()?;
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let prompter = Prompter::new(stdin.lock(), stdout.lock());
    let mut session = Session::new(&db, prompter, &config);
    let result = menu::run(&mut session);
    drop(session);

    println!("Disconnecting from database...");
    db.close()?;
    println!("Done\n\nBye !");
    result
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::parse_from([
            "flightdeck",
            "air.db",
            "--init",
            "--max-retries",
            "3",
            "--id-strategy",
            "sequence",
        ]);
        let config = load_config(&args).unwrap();
        assert!(config.database.create_schema);
        assert_eq!(config.validation.max_retries, Some(3));
        assert_eq!(config.ids.strategy, IdStrategy::Sequence);
    }

    #[test]
    fn test_zero_retries_rejected() {
        let args = Args::parse_from(["flightdeck", "air.db", "--max-retries", "0"]);
        assert!(matches!(load_config(&args), Err(AppErr::Config(_))));
    }

    #[test]
    fn test_missing_database_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.db");
        let args = Args::parse_from([std::ffi::OsStr::new("flightdeck"), path.as_os_str()]);
        let config = load_config(&args).unwrap();
        match check_database(&args.database, config.database.create_schema) {
            Err(AppErr::Config(msg)) => assert!(msg.contains("Database file not found")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_init_allows_missing_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.db");
        let args = Args::parse_from([
            std::ffi::OsStr::new("flightdeck"),
            path.as_os_str(),
            std::ffi::OsStr::new("--init"),
        ]);
        let config = load_config(&args).unwrap();
        check_database(&args.database, config.database.create_schema).unwrap();
    }
}
