//! shortlist-report - prints derived shortlist views as JSON.
//!
//! Reads the stored collections from a SQLite key-value file and writes one
//! view to stdout, ready for a charting layer. Logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use shortlist::{
    application::ApplicationRecord,
    config::PortalConfig,
    engine::filter::ApplicantQuery,
    persist::sqlite::SqliteKv,
    runtime::portal::Portal,
    types::{Role, SortDirection, SortField},
};

/// Print selection statistics, priority scores, rank usage, applicant
/// listings or course options for the stored tutor applications.
///
/// Examples:
///   shortlist-report --db portal.db
///   shortlist-report --db portal.db --view priority --max-rank 10
///   shortlist-report --db portal.db --view ranks --course COSC1234 --role tutor
///   shortlist-report --init-config > shortlist.toml
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// SQLite file holding the collections (defaults to the config's db_path)
    #[arg(long, value_name = "FILE", env = "SHORTLIST_DB")]
    db: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE", env = "SHORTLIST_CONFIG")]
    config: Option<PathBuf>,

    /// Highest assignable rank, overriding the config file
    #[arg(long, value_name = "N")]
    max_rank: Option<u32>,

    /// View to print
    #[arg(long, default_value = "stats")]
    view: View,

    /// Course code for the ranks and applicants views
    #[arg(long, default_value = "")]
    course: String,

    /// Role for the ranks view
    #[arg(long, default_value = "tutor", value_parser = parse_role)]
    role: Role,

    /// Search text for the applicants view
    #[arg(long, default_value = "")]
    search: String,

    /// Sort the applicants view by availability instead of course
    #[arg(long)]
    by_availability: bool,

    /// Reverse the applicants view order
    #[arg(long)]
    descending: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    init_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    /// Selection counts over per-course reviews
    Stats,
    /// Selection counts over the flat shortlist
    Shortlist,
    /// Priority scores for the priority chart
    Priority,
    /// Used and free ranks for one course and role
    Ranks,
    /// Filtered and sorted applicant listing
    Applicants,
    /// Course dropdown entries with application counts
    Courses,
}

fn parse_role(s: &str) -> Result<Role, String> {
    s.parse()
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.init_config {
        print!("{}", PortalConfig::default_toml()?);
        return Ok(());
    }

    init_logging(args.verbose);
    debug!("Arguments: {:?}", args);

    let config = load_config(&args)?;
    let db_path = args.db.clone().unwrap_or_else(|| config.storage.db_path.clone());
    if !db_path.exists() {
        bail!("database {} does not exist", db_path.display());
    }
    info!(db = %db_path.display(), max_rank = config.ranking.max_rank, "loading collections");

    let kv = SqliteKv::open(&db_path).with_context(|| format!("failed to open {}", db_path.display()))?;
    let mut portal = Portal::open(kv, config).context("failed to load collections")?;

    let output = match args.view {
        View::Stats => serde_json::to_value(portal.selection_stats())?,
        View::Shortlist => serde_json::to_value(portal.shortlist_stats())?,
        View::Priority => serde_json::to_value(portal.priority_scores())?,
        View::Ranks => {
            if args.course.is_empty() {
                bail!("--course is required for the ranks view");
            }
            json!({
                "course": args.course,
                "role": args.role,
                "maxRank": portal.max_rank(),
                "used": portal.used_ranks(&args.course, args.role),
                "available": portal.available_ranks(&args.course, args.role),
            })
        }
        View::Applicants => {
            let query = ApplicantQuery {
                course: args.course.clone(),
                search: args.search.clone(),
                sort_by: if args.by_availability {
                    SortField::Availability
                } else {
                    SortField::Course
                },
                direction: if args.descending {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                },
                ..ApplicantQuery::default()
            };
            let rows: Vec<_> = portal.visible_applicants(&query).into_iter().map(listing_row).collect();
            serde_json::Value::Array(rows)
        }
        View::Courses => serde_json::to_value(portal.course_options())?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn listing_row(app: &ApplicationRecord) -> serde_json::Value {
    json!({
        "email": app.applicant_id,
        "name": app.display_name(),
        "course": app.course,
        "role": app.role,
        "availability": app.availability,
        "skills": app.skills,
    })
}

fn load_config(args: &Args) -> Result<PortalConfig> {
    let mut config = match &args.config {
        Some(path) => PortalConfig::load(path).with_context(|| format!("failed to load {}", path.display()))?,
        None => PortalConfig::default(),
    };
    if let Some(max_rank) = args.max_rank {
        config.ranking.max_rank = max_rank;
        config.validate()?;
    }
    Ok(config)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set tracing subscriber: {err}");
    }
}
