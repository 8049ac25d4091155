//! Load per-source parameter mappings from a CSV file into the store.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use clap::Parser;
use postback::domain::MappingImportService;
use postback::domain::ports::MappingImportCommand;
use postback::outbound::persistence::{DbPool, DieselMappingRepository, PoolConfig};
use tokio::runtime::Builder;

/// `import-mapping` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "import-mapping",
    about = "Import per-source postback parameter mappings from CSV",
    version
)]
struct CliArgs {
    /// CSV file whose header names `source`, `user_id`, `code`, and `aim`.
    #[arg(long = "csv", value_name = "path")]
    csv_path: PathBuf,
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let csv = read_csv(&args.csv_path)?;

    let database_url = resolve_database_url(args.database_url)?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let command = MappingImportService::new(Arc::new(DieselMappingRepository::new(pool)));
    let outcome = command
        .import_csv(&csv)
        .await
        .map_err(|error| io::Error::other(format!("import failed: {error}")))?;

    writeln!(io::stdout().lock(), "imported={}", outcome.imported)
}

fn read_csv(path: &Path) -> io::Result<Vec<u8>> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "--csv must name a file"))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        io::Error::other(format!(
            "open CSV parent directory '{}': {error}",
            parent.display()
        ))
    })?;
    let mut file = directory
        .open(Path::new(file_name))
        .map_err(|error| io::Error::other(format!("open CSV file '{}': {error}", path.display())))?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)
        .map_err(|error| io::Error::other(format!("read CSV file '{}': {error}", path.display())))?;
    Ok(contents)
}

fn resolve_database_url(explicit: Option<String>) -> io::Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--database-url must not be empty when provided",
            ));
        }
        return Ok(value);
    }

    match env::var("DATABASE_URL") {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "DATABASE_URL must not be empty",
        )),
        Err(_) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "database URL missing: set --database-url or DATABASE_URL",
        )),
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI helpers.

    use std::io::Write;

    use clap::Parser;
    use env_lock::lock_env;
    use rstest::rstest;
    use tempfile::NamedTempFile;

    use super::{CliArgs, read_csv, resolve_database_url};

    #[rstest]
    fn read_csv_returns_file_contents() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, "source,user_id,code,aim\nacme,uid,clk,goal\n").expect("write fixture");

        let contents = read_csv(file.path()).expect("read fixture");
        assert!(contents.starts_with(b"source,user_id"));
        assert!(contents.ends_with(b"acme,uid,clk,goal\n"));
    }

    #[rstest]
    fn read_csv_reports_missing_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = read_csv(&dir.path().join("absent.csv")).expect_err("missing file");
        assert!(error.to_string().contains("absent.csv"));
    }

    #[rstest]
    fn explicit_url_wins_over_environment() {
        let _guard = lock_env([("DATABASE_URL", Some("postgres://env/db".to_owned()))]);
        let url = resolve_database_url(Some("postgres://flag/db".to_owned())).expect("url");
        assert_eq!(url, "postgres://flag/db");
    }

    #[rstest]
    fn environment_url_is_the_fallback() {
        let _guard = lock_env([("DATABASE_URL", Some("postgres://env/db".to_owned()))]);
        assert_eq!(
            resolve_database_url(None).expect("url"),
            "postgres://env/db"
        );
    }

    #[rstest]
    #[case(Some("   ".to_owned()), None)]
    #[case(None, None)]
    #[case(None, Some(" ".to_owned()))]
    fn unusable_urls_are_rejected(#[case] explicit: Option<String>, #[case] env: Option<String>) {
        let _guard = lock_env([("DATABASE_URL", env)]);
        let error = resolve_database_url(explicit).expect_err("should fail");
        assert_eq!(error.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[rstest]
    fn cli_requires_a_csv_path() {
        assert!(CliArgs::try_parse_from(["import-mapping"]).is_err());
        let args = CliArgs::try_parse_from(["import-mapping", "--csv", "mapping.csv"])
            .expect("args parse");
        assert_eq!(args.csv_path, std::path::PathBuf::from("mapping.csv"));
        assert!(args.database_url.is_none());
    }
}
