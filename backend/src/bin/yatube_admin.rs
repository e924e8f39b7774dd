//! Operator commands for seeding accounts and groups.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]
//!
//! # Examples
//! ```sh
//! yatube-admin --database-url postgres://localhost/yatube \
//!     create-user --username leo --email leo@example.com --password s3cret
//! yatube-admin create-group --title Cats --slug cats --description "All about cats"
//! ```

use std::io;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::runtime::Builder;
use yatube::domain::AdminService;
use yatube::outbound::persistence::{
    DbPool, DieselGroupRepository, DieselUserRepository, PoolConfig, run_pending_migrations,
};

/// `yatube-admin` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "yatube-admin", about = "Manage Yatube users and groups", version)]
struct CliArgs {
    /// Database connection URL.
    #[arg(long = "database-url", value_name = "url", env = "YATUBE_DATABASE_URL")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Command {
    /// Register an account that can sign in.
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Add a group posts can be filed under.
    CreateGroup {
        #[arg(long)]
        title: String,
        #[arg(long)]
        slug: String,
        #[arg(long, default_value = "")]
        description: String,
    },
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
    if args.database_url.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "--database-url must not be empty",
        ));
    }

    run_pending_migrations(&args.database_url)
        .await
        .map_err(|error| io::Error::other(format!("apply migrations: {error}")))?;
    let pool = DbPool::new(PoolConfig::new(&args.database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
    let admin = AdminService::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselGroupRepository::new(pool)),
    );

    match args.command {
        Command::CreateUser {
            username,
            email,
            password,
        } => {
            let user = admin
                .create_user(&username, &email, &password)
                .await
                .map_err(|error| io::Error::other(format!("create user: {error}")))?;
            println!("user_id={}", user.id());
            println!("username={}", user.username());
        }
        Command::CreateGroup {
            title,
            slug,
            description,
        } => {
            let group = admin
                .create_group(&title, &slug, &description)
                .await
                .map_err(|error| io::Error::other(format!("create group: {error}")))?;
            println!("group_id={}", group.id().get());
            println!("slug={}", group.slug());
        }
    }

    Ok(())
}
