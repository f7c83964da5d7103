#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]
//! Operator commands for a Yatube database.
//!
//! # Examples
//! ```sh
//! yatube-admin --database-url postgres://localhost/yatube migrate
//! yatube-admin create-group --title "Cats" --slug cats --description "All about cats"
//! ```

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use tokio::runtime::Builder;

use yatube::domain::ports::GroupRepository;
use yatube::domain::{GroupSlug, NewGroup};
use yatube::outbound::persistence::{
    DbPool, DieselGroupRepository, PoolConfig, run_pending_migrations,
};

/// `yatube-admin` command arguments.
#[derive(Debug, Parser)]
#[command(name = "yatube-admin", about = "Yatube database administration", version)]
struct Cli {
    /// Database connection URL. Falls back to `YATUBE_DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url", global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending schema migrations.
    Migrate,
    /// Create a post group.
    CreateGroup {
        #[arg(long)]
        title: String,
        /// URL slug: lowercase letters, digits, hyphens and underscores.
        #[arg(long)]
        slug: String,
        #[arg(long, default_value = "")]
        description: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let database_url = resolve_database_url(cli.database_url)?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build admin runtime")?;
    runtime.block_on(run(cli.command, &database_url))
}

fn resolve_database_url(flag: Option<String>) -> Result<String> {
    flag.or_else(|| std::env::var("YATUBE_DATABASE_URL").ok())
        .ok_or_else(|| eyre!("no database URL; pass --database-url or set YATUBE_DATABASE_URL"))
}

async fn run(command: Command, database_url: &str) -> Result<()> {
    match command {
        Command::Migrate => {
            let applied = run_pending_migrations(database_url).await?;
            println!("applied {applied} migration(s)");
        }
        Command::CreateGroup {
            title,
            slug,
            description,
        } => {
            let group = NewGroup::try_new(&title, GroupSlug::new(slug)?, &description)?;
            let pool = DbPool::new(PoolConfig::new(database_url, 1))
                .await
                .wrap_err("failed to create database pool")?;
            let created = DieselGroupRepository::new(pool)
                .create(&group)
                .await
                .wrap_err("failed to create group")?;
            println!("created group {} ({})", created.slug(), created.id());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_create_group() {
        let cli = Cli::try_parse_from([
            "yatube-admin",
            "create-group",
            "--title",
            "Cats",
            "--slug",
            "cats",
        ])
        .expect("valid arguments");
        match cli.command {
            Command::CreateGroup {
                title,
                slug,
                description,
            } => {
                assert_eq!(title, "Cats");
                assert_eq!(slug, "cats");
                assert!(description.is_empty());
            }
            Command::Migrate => panic!("expected create-group"),
        }
    }

    #[test]
    fn flag_wins_over_environment() {
        let url = resolve_database_url(Some("postgres://flag/db".to_owned())).expect("url");
        assert_eq!(url, "postgres://flag/db");
    }
}
