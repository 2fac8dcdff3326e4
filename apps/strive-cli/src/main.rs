//! # strive-cli
//!
//! Command-line interface for Strive goals.
//!
//! Drives the goal lifecycle engine directly against a local store:
//! - `strive create/update/progress/complete/delete` — manage goals
//! - `strive get/list` — inspect goals in either partition
//!
//! The `--domain` flag selects which of the two engine instances to use
//! (user-authored or community-authored goals); each gets its own store
//! directory and they share nothing.

use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use strive_goaling::responses::{error_message, goal_views};
use strive_goaling::{Goal, GoalState, GoalUpdate, Goaling, LogSink};

/// Strive CLI — track goals toward completion.
#[derive(Parser)]
#[command(name = "strive", version, about)]
struct Cli {
    /// Store directory (defaults to ./.strive).
    #[arg(long, default_value = ".strive")]
    store: PathBuf,

    /// Goal domain: user-authored or community-authored.
    #[arg(long, value_enum, default_value = "user")]
    domain: Domain,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Domain {
    User,
    Community,
}

impl Domain {
    fn dir_name(self) -> &'static str {
        match self {
            Domain::User => "user",
            Domain::Community => "community",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new goal.
    Create {
        /// Author identifier (username or community name).
        #[arg(long)]
        author: String,
        /// Goal name (e.g., "Run").
        name: String,
        /// Unit of measure (e.g., "km").
        #[arg(long, default_value = "")]
        unit: String,
        /// Target amount.
        #[arg(long)]
        amount: f64,
        /// Deadline, RFC 3339 (e.g., "2026-12-31T00:00:00Z"). Defaults to
        /// one week from now.
        #[arg(long)]
        deadline: Option<DateTime<Utc>>,
    },
    /// Update fields of an incomplete goal.
    Update {
        /// Goal id.
        id: Uuid,
        /// Acting author (must match the goal's author).
        #[arg(long)]
        author: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        amount: Option<f64>,
        /// New deadline, RFC 3339.
        #[arg(long)]
        deadline: Option<DateTime<Utc>>,
    },
    /// Add progress to an incomplete goal.
    Progress {
        /// Goal id.
        id: Uuid,
        /// Acting author (must match the goal's author).
        #[arg(long)]
        author: String,
        /// Progress to add.
        delta: f64,
    },
    /// Mark an incomplete goal complete regardless of progress.
    Complete {
        /// Goal id.
        id: Uuid,
        /// Acting author (must match the goal's author).
        #[arg(long)]
        author: String,
    },
    /// Delete an incomplete goal.
    Delete {
        /// Goal id.
        id: Uuid,
        /// Acting author (must match the goal's author).
        #[arg(long)]
        author: String,
    },
    /// Show one goal, whichever partition holds it.
    Get {
        /// Goal id (the id the goal was created with).
        id: Uuid,
    },
    /// List goals in one partition.
    List {
        /// Which partition to list.
        #[arg(long, value_enum, default_value = "incomplete")]
        state: Partition,
        /// Only goals by this author.
        #[arg(long)]
        author: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Partition {
    Incomplete,
    Complete,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("strive_goaling=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let base = cli.store.join(cli.domain.dir_name());
    tracing::debug!("using store at {}", base.display());
    let mut goaling: Goaling<String> =
        Goaling::new(&base).with_context(|| format!("opening store at {}", base.display()))?;
    goaling.add_sink(Box::new(LogSink::new(cli.store.join("events.jsonl"))));

    let result = run(&goaling, cli.command);
    if let Err(err) = &result {
        // Engine errors get the user-facing message; anything else is
        // rendered by anyhow below.
        if let Some(goal_err) = err.downcast_ref::<strive_goaling::GoalError>() {
            eprintln!("{}", error_message(goal_err));
            std::process::exit(1);
        }
    }
    result
}

fn run(goaling: &Goaling<String>, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Create {
            author,
            name,
            unit,
            amount,
            deadline,
        } => {
            let deadline = deadline.unwrap_or_else(|| Utc::now() + Duration::days(7));
            let goal = goaling.create(author, &name, &unit, amount, deadline)?;
            println!("Created goal {}", goal.id);
            print_goal(&goal);
        }
        Commands::Update {
            id,
            author,
            name,
            unit,
            amount,
            deadline,
        } => {
            goaling.assert_author(id, &author)?;
            goaling.update(
                id,
                GoalUpdate {
                    name,
                    unit,
                    amount,
                    target_date: deadline,
                },
            )?;
            print_goal(&goaling.get(id)?);
        }
        Commands::Progress { id, author, delta } => {
            goaling.assert_author(id, &author)?;
            goaling.add_progress(id, delta)?;
            print_goal(&goaling.get(id)?);
        }
        Commands::Complete { id, author } => {
            goaling.assert_author(id, &author)?;
            goaling.complete(id)?;
            print_goal(&goaling.get(id)?);
        }
        Commands::Delete { id, author } => {
            goaling.assert_author(id, &author)?;
            goaling.delete_incomplete(id)?;
            println!("Deleted goal {}", id);
        }
        Commands::Get { id } => {
            print_goal(&goaling.get(id)?);
        }
        Commands::List { state, author } => {
            let goals = match (state, &author) {
                (Partition::Incomplete, None) => goaling.incomplete_goals()?,
                (Partition::Complete, None) => goaling.complete_goals()?,
                (Partition::Incomplete, Some(a)) => goaling.incomplete_by_author(a)?,
                (Partition::Complete, Some(a)) => goaling.complete_by_author(a)?,
            };
            if goals.is_empty() {
                println!("No goals.");
                return Ok(());
            }
            for view in goal_views(&goals, |a| Some(a.clone())) {
                println!(
                    "{}  {:<20} {:>8.1}/{:<8.1} {:<6} {}  by {}",
                    view.id, view.name, view.progress, view.amount, view.unit, view.state, view.author
                );
            }
        }
    }
    Ok(())
}

fn print_goal(goal: &Goal<String>) {
    println!("  id:       {}", goal.logical_id());
    println!("  author:   {}", goal.author);
    println!("  name:     {}", goal.name);
    println!(
        "  progress: {:.1} / {:.1} {}",
        goal.progress, goal.amount, goal.unit
    );
    println!("  state:    {}", goal.state());
    match goal.state() {
        GoalState::Incomplete => println!("  due:      {}", goal.target_date),
        GoalState::Complete => println!("  done:     {}", goal.target_date),
    }
}
