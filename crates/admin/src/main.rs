use anyhow::Context;
use clap::{Parser, Subcommand};
use papitop_storage::{
    Database,
    repository::player_metric::PlayerMetricRepository,
    services::rank_rebuild::{RebuildOptions, rebuild_ranks},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "papitop-admin")]
#[command(about = "Leaderboard maintenance for papi rankings", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Purge excluded entries and reassign ranks by value
    Rebuild {
        #[arg(long)]
        papi: String,

        #[arg(long)]
        ascending: bool,

        #[arg(long = "exclude-name")]
        excluded_names: Vec<String>,

        #[arg(long = "exclude-value")]
        excluded_values: Vec<i64>,
    },
    /// Delete every entry of a leaderboard
    Purge {
        #[arg(long)]
        papi: String,
    },
    /// Print one page of a leaderboard
    List {
        #[arg(long)]
        papi: String,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("papitop_admin={},papitop_storage={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = Database::new(&cli.database_url, 2)
        .await
        .context("Failed to connect to database")?;
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    let repo = db.player_metrics();

    match cli.command {
        Commands::Rebuild {
            papi,
            ascending,
            excluded_names,
            excluded_values,
        } => {
            let options = RebuildOptions {
                ascending,
                excluded_names,
                excluded_values,
            };
            handle_rebuild(&repo, &papi, &options).await?;
        }
        Commands::Purge { papi } => {
            let deleted = repo
                .delete_by_metric(&papi)
                .await
                .with_context(|| format!("Failed to purge '{}'", papi))?;
            println!("Deleted {} entries from '{}'", deleted, papi);
        }
        Commands::List {
            papi,
            page,
            page_size,
        } => {
            handle_list(&repo, &papi, page, page_size).await?;
        }
    }

    Ok(())
}

async fn handle_rebuild(
    repo: &PlayerMetricRepository,
    papi: &str,
    options: &RebuildOptions,
) -> anyhow::Result<()> {
    let summary = rebuild_ranks(repo, papi, options)
        .await
        .with_context(|| format!("Failed to rebuild '{}'", papi))?;

    println!(
        "{}: removed {}, ranked {}, rewrote {} ranks",
        papi, summary.removed, summary.ranked, summary.changed
    );
    Ok(())
}

async fn handle_list(
    repo: &PlayerMetricRepository,
    papi: &str,
    page: u32,
    page_size: u32,
) -> anyhow::Result<()> {
    let total = repo.count_by_metric(papi).await?;
    let entries = repo.page(papi, page, page_size).await?;

    if entries.is_empty() {
        println!("No entries on page {} of '{}' ({} total)", page, papi, total);
        return Ok(());
    }

    println!("{:>6}  {:<16}  {:>14}  {}", "RANK", "PLAYER", "VALUE", "UUID");
    for entry in entries {
        println!(
            "{:>6}  {:<16}  {:>14}  {}",
            entry.rank, entry.player_name, entry.vault, entry.player_uuid
        );
    }
    println!("{} total", total);
    Ok(())
}
