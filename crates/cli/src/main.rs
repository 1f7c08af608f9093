mod config;
mod output;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use agents::travel_plan;
use engine::{PipelineExecutor, RunResult};
use events::{Event, EventBus};
use gemini::GeminiClient;
use voyages_core::{AccommodationLevel, TripRequest};

use crate::config::{VoyagesConfig, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "voyages")]
#[command(about = "AI-powered travel planning pipeline", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a trip end to end
    Plan {
        /// Free-text travel request
        query: String,

        #[arg(long)]
        destination: String,

        /// Date range "YYYY-MM-DD to YYYY-MM-DD"
        #[arg(long)]
        dates: String,

        #[arg(long, default_value_t = 5)]
        days: u32,

        #[arg(long, default_value_t = 2)]
        travelers: u32,

        /// budget, mid-range or luxury
        #[arg(long, default_value = "mid-range")]
        level: String,

        /// Approve a suspended booking without prompting
        #[arg(long, conflicts_with = "reject")]
        approve: bool,

        /// Reject a suspended booking without prompting
        #[arg(long)]
        reject: bool,

        /// Override the approval threshold from the config
        #[arg(long)]
        threshold: Option<f64>,

        /// Backend API key (defaults to GEMINI_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let config = VoyagesConfig::load(&config_path);

    match cli.command {
        Commands::Plan {
            query,
            destination,
            dates,
            days,
            travelers,
            level,
            approve,
            reject,
            threshold,
            api_key,
        } => {
            let decision = if approve {
                Some(true)
            } else if reject {
                Some(false)
            } else {
                None
            };
            plan(
                &config,
                PlanArgs {
                    query,
                    destination,
                    dates,
                    days,
                    travelers,
                    level,
                    decision,
                    threshold,
                    api_key,
                },
            )
            .await
        }
        Commands::Config => {
            let rendered =
                toml::to_string_pretty(&config).context("Failed to render configuration")?;
            println!("# {}", config_path.display());
            print!("{rendered}");
            Ok(())
        }
    }
}

struct PlanArgs {
    query: String,
    destination: String,
    dates: String,
    days: u32,
    travelers: u32,
    level: String,
    /// Pre-made approval decision; `None` prompts interactively
    decision: Option<bool>,
    threshold: Option<f64>,
    api_key: Option<String>,
}

async fn plan(config: &VoyagesConfig, args: PlanArgs) -> Result<()> {
    let level = AccommodationLevel::parse(&args.level)
        .with_context(|| format!("Invalid accommodation level '{}'", args.level))?;

    let api_key = args
        .api_key
        .or_else(|| std::env::var("GEMINI_API_KEY").ok())
        .context("No API key found. Set GEMINI_API_KEY or pass --api-key")?;

    let mut client = GeminiClient::new(api_key)
        .with_model(&config.model)
        .with_retry(config.retry_policy());
    if let Some(ref base_url) = config.base_url {
        client = client.with_base_url(base_url);
    }

    let bus = EventBus::new();
    spawn_progress_printer(&bus);

    let executor = PipelineExecutor::new(travel_plan(Arc::new(client)))
        .with_threshold(args.threshold.unwrap_or(config.approval_threshold))
        .with_event_bus(bus);

    let request = TripRequest::new(args.query, args.destination)
        .with_dates(args.dates)
        .with_days(args.days)
        .with_travelers(args.travelers)
        .with_accommodation(level);

    let run_id = Uuid::new_v4();
    println!(
        "{} {} ({} days, {} travelers, {})",
        "Planning trip to".bold(),
        request.destination.bold().cyan(),
        request.num_days,
        request.num_travelers,
        request.accommodation_level.as_str()
    );

    let mut result = executor.submit(run_id, request).await;

    // A resumed run can in principle suspend again; drain every pause.
    while let RunResult::Suspended {
        ref confirmation_id,
        ref payload,
    } = result
    {
        output::print_approval_request(confirmation_id, payload);

        let approved = match args.decision {
            Some(decision) => {
                println!(
                    "Decision: {}",
                    if decision {
                        "approve (via --approve)".green()
                    } else {
                        "reject (via --reject)".red()
                    }
                );
                decision
            }
            None => prompt_for_approval()?,
        };

        let confirmation_id = confirmation_id.clone();
        result = executor
            .resume(&confirmation_id, approved)
            .await
            .context("Failed to resume suspended run")?;
    }

    match result {
        RunResult::Completed { final_state } => {
            output::print_summary(&final_state);
            println!("{}", "Travel planning complete".green().bold());
            Ok(())
        }
        RunResult::Rejected {
            reason,
            final_state,
        } => {
            output::print_summary(&final_state);
            println!("{} {}", "Booking rejected:".red().bold(), reason);
            Ok(())
        }
        RunResult::Failed { stage, reason } => {
            bail!("Run failed at stage {stage}: {reason}")
        }
        RunResult::Suspended { .. } => unreachable!("suspensions are drained above"),
    }
}

fn prompt_for_approval() -> Result<bool> {
    loop {
        print!("Approve this booking? [y/n] ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let mut answer = String::new();
        std::io::stdin()
            .read_line(&mut answer)
            .context("Failed to read approval decision")?;

        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => println!("Please answer y or n."),
        }
    }
}

fn spawn_progress_printer(bus: &EventBus) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        while let Ok(envelope) = rx.recv().await {
            match envelope.event {
                Event::StageStarted { unit, .. } => {
                    println!("  {} {}", "▶".dimmed(), unit.dimmed());
                }
                Event::StageCompleted { unit, slot, .. } => {
                    println!("  {} {} {} {}", "✓".green(), unit, "→".dimmed(), slot.dimmed());
                }
                Event::RunSuspended {
                    confirmation_id, ..
                } => {
                    println!(
                        "  {} waiting for approval ({})",
                        "⏸".yellow(),
                        confirmation_id.dimmed()
                    );
                }
                _ => {}
            }
        }
    });
}
