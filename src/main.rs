// Command-line entry point.
// Loads a repository's contributor roster and prints it as a table or JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use roster::contributors::{ContributorRecord, Origin, Snapshot};
use roster::{RepoSpec, Roster, RosterConfig};

#[derive(Debug, Parser)]
#[command(name = "roster", version, about = "List, rank and search a GitHub repository's contributors")]
struct Args {
    /// Repository as owner/name or a github.com URL.
    repo: RepoSpec,

    /// Only show contributors whose name, login, role, location or company contains TERM.
    #[arg(short, long, value_name = "TERM")]
    search: Option<String>,

    /// Ignore the cache and fetch everything again.
    #[arg(long)]
    refresh: bool,

    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,

    /// Contributors requested per page (1-100).
    #[arg(long, default_value_t = 100)]
    page_size: u32,

    /// Maximum concurrent profile lookups.
    #[arg(long, default_value_t = 8)]
    concurrency: usize,

    /// Login to classify as project lead (defaults to the repository owner).
    #[arg(long, value_name = "LOGIN")]
    lead: Option<String>,

    /// Cache directory (defaults to the platform cache directory).
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = RosterConfig::from_env(args.repo.clone())
        .with_page_size(args.page_size)
        .with_max_concurrent_lookups(args.concurrency)
        .with_project_lead(args.lead.clone())
        .with_cache_dir(args.cache_dir.clone());

    match run(&args, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            let mut cause = std::error::Error::source(&e);
            while let Some(inner) = cause {
                eprintln!("  caused by: {}", inner);
                cause = inner.source();
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args, config: &RosterConfig) -> roster::Result<()> {
    let roster = Roster::from_config(config)?;
    let snapshot = if args.refresh {
        roster.refresh().await?
    } else {
        roster.get().await?
    };

    let records = snapshot.search(args.search.as_deref().unwrap_or(""));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    print_header(&config.repo, &snapshot);
    if records.is_empty() {
        match args.search.as_deref() {
            Some(term) => println!("No contributors found matching \"{}\"", term),
            None => println!("No contributors found"),
        }
        return Ok(());
    }
    print_table(&records);
    Ok(())
}

fn print_header(repo: &RepoSpec, snapshot: &Snapshot) {
    let summary = snapshot.summary();
    let origin = match snapshot.origin {
        Origin::Fresh => "",
        Origin::Cached => " (cached)",
    };
    println!(
        "{}: {} contributors, {} contributions",
        repo, summary.contributors, summary.contributions
    );
    println!(
        "Last updated: {}{}",
        snapshot.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        origin
    );
    println!();
}

fn print_table(records: &[&ContributorRecord]) {
    println!(
        "{:<24} {:<24} {:<20} {:>8} {:>9} {:>6}  {}",
        "LOGIN", "NAME", "ROLE", "COMMITS", "FOLLOWERS", "REPOS", "BADGE"
    );
    for record in records {
        println!(
            "{:<24} {:<24} {:<20} {:>8} {:>9} {:>6}  {}",
            truncate(&record.login, 24),
            truncate(&record.display_name, 24),
            record.role.label(),
            record.contributions,
            record.followers,
            record.public_repos,
            record.badge.map(|b| b.label()).unwrap_or("")
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('…');
        out
    }
}
