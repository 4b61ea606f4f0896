// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use the_sous_chef::backends::http::HttpAgent;
use the_sous_chef::config::consts::{CONFIG_ENV_VAR, PASSWORD_ENV_VAR};
use the_sous_chef::config::{Overrides, Settings};
use the_sous_chef::engine::{CookReport, DispatchOutcome, Kitchen};
use the_sous_chef::errors::DispatchError;
use the_sous_chef::observability::messages::dispatch::{AgentProcessingFailed, TaskNoResponse};
use the_sous_chef::observability::messages::StructuredLog;

/// Every task succeeded / the command did what was asked
const EXIT_OK: i32 = 0;
/// Some task or request failed
const EXIT_FAILED: i32 = 1;
/// Nothing was dispatched: bad recipe, bad settings, missing processors
const EXIT_FATAL: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "sous-chef", version, about = "Cook recipes of tasks on remote processing agents")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    /// Settings file (YAML)
    #[arg(long, short = 'c', env = CONFIG_ENV_VAR, global = true)]
    config: Option<PathBuf>,

    /// Agent base URLs, space or comma separated
    #[arg(
        long = "agents",
        short = 'a',
        value_name = "URL",
        num_args = 1..,
        value_delimiter = ',',
        global = true
    )]
    agents: Vec<String>,

    /// Username to authenticate with the agents
    #[arg(long, short = 'u', global = true)]
    username: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every task of a recipe on the agents
    Cook(CookArgs),
    /// Send a single processor invocation to an agent
    Process(ProcessArgs),
    /// List the processors each agent offers
    Processors {
        /// Only list processors whose name contains this text
        #[arg(long, short = 's')]
        search: Option<String>,
    },
    /// Show what each agent reports about itself
    Info,
}

#[derive(Args, Debug)]
struct CookArgs {
    /// Number of tasks processed concurrently
    #[arg(long, short = 'w')]
    worker_count: Option<usize>,

    /// Document providing `recipe_vars` for placeholder substitution
    #[arg(long, short = 'v', value_name = "FILE")]
    variables_file: Option<PathBuf>,

    recipe: PathBuf,
}

#[derive(Args, Debug)]
struct ProcessArgs {
    processor: String,

    /// Arguments as `name:value`
    #[arg(value_parser = parse_argument_pair)]
    arguments: Vec<(String, String)>,
}

fn parse_argument_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once(':')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name:value, got '{}'", raw))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let exit = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            EXIT_FATAL
        }
    };
    std::process::exit(exit);
}

fn init_tracing(debug: bool) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::new(if debug { "debug" } else { "info" }),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let worker_count = match &cli.command {
        Command::Cook(args) => args.worker_count,
        _ => None,
    };
    let settings = settings.resolve(
        Overrides {
            agents: cli.agents,
            username: cli.username,
            worker_count,
        },
        std::env::var(PASSWORD_ENV_VAR).ok(),
    );

    let agents = HttpAgent::from_settings(&settings).context("cannot set up agent client")?;
    let kitchen = Kitchen::new(agents);

    match cli.command {
        Command::Cook(args) => cook(&kitchen, args, settings.worker_count).await,
        Command::Process(args) => process(&kitchen, args).await,
        Command::Processors { search } => processors(&kitchen, search.as_deref()).await,
        Command::Info => info(&kitchen).await,
    }
}

async fn cook(kitchen: &Kitchen, args: CookArgs, worker_count: usize) -> Result<i32> {
    let report = match kitchen
        .cook(&args.recipe, args.variables_file.as_deref(), worker_count)
        .await
    {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{e}");
            return Ok(EXIT_FATAL);
        }
    };

    print_report(&report);
    Ok(if report.is_success() { EXIT_OK } else { EXIT_FAILED })
}

fn print_report(report: &CookReport) {
    let sections = [
        ("succeeded", &report.succeeded),
        ("failed", &report.failed),
        ("cancelled", &report.cancelled),
        ("never reached", &report.unreached),
    ];

    println!("Recipe finished: {} tasks", report.total());
    for (label, tasks) in sections {
        if !tasks.is_empty() {
            println!("  {} ({}): {}", label, tasks.len(), tasks.join(", "));
        }
    }
}

async fn process(kitchen: &Kitchen, args: ProcessArgs) -> Result<i32> {
    let dispatcher = kitchen.dispatcher().await;

    match dispatcher.initiate(&args.processor, &args.arguments).await {
        Ok(DispatchOutcome::Processed { agent, result }) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            if result.status {
                Ok(EXIT_OK)
            } else {
                AgentProcessingFailed {
                    task: &args.processor,
                    agent: &agent,
                }
                .log();
                Ok(EXIT_FAILED)
            }
        }
        Ok(DispatchOutcome::NoResponse { agent, error }) => {
            TaskNoResponse {
                task: &args.processor,
                agent: &agent,
                error: &error,
            }
            .log();
            Ok(EXIT_FAILED)
        }
        Err(DispatchError::ValidationFailed { processor, usage }) => {
            eprintln!("arguments validation failed for processor {}\n", processor);
            eprintln!("{}", usage);
            Ok(EXIT_FAILED)
        }
        Err(e) => {
            eprintln!("{e}");
            Ok(EXIT_FAILED)
        }
    }
}

fn banner(url: &str) {
    println!("{}", "=".repeat(url.len() + 8));
    println!("=== {} ===", url);
    println!("{}", "=".repeat(url.len() + 8));
}

async fn processors(kitchen: &Kitchen, search: Option<&str>) -> Result<i32> {
    let mut exit = EXIT_OK;
    for agent in kitchen.agents() {
        banner(agent.base_url());
        match agent.processors(search).await {
            Ok(resp) => {
                for processor in &resp.processors {
                    println!("{}", processor.usage());
                }
            }
            Err(e) => {
                eprintln!("{e}");
                exit = EXIT_FAILED;
            }
        }
    }
    Ok(exit)
}

async fn info(kitchen: &Kitchen) -> Result<i32> {
    let mut exit = EXIT_OK;
    for agent in kitchen.agents() {
        banner(agent.base_url());
        match agent.info().await {
            Ok(info) => println!("{}", serde_json::to_string_pretty(&info)?),
            Err(e) => {
                eprintln!("{e}");
                exit = EXIT_FAILED;
            }
        }
    }
    Ok(exit)
}
