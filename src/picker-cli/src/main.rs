//! Picker - headless driver for the picker controller.
//!
//! Loads a picker configuration, replays a sequence of searches against it
//! and prints the resulting choices and picks.

use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use picker_core::{Item, KeyCode, KeyEvent, PickerConfig, PickerController};

/// Picker command line driver
#[derive(Parser)]
#[command(name = "picker")]
#[command(about = "Search a picker configuration and pick results")]
#[command(version)]
struct Args {
    /// Configuration file path (.toml or .json)
    #[arg(short, long)]
    config: String,

    /// Search query; repeat to replay several searches in order
    #[arg(short, long = "query")]
    queries: Vec<String>,

    /// Move the result cursor to this index after the last search
    #[arg(long)]
    select: Option<usize>,

    /// Commit the result under the cursor
    #[arg(long)]
    commit: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Serialize)]
struct Choice {
    label: String,
    item: Item,
}

#[derive(Debug, Serialize)]
struct Report {
    placeholder: String,
    query: String,
    choices: Vec<Choice>,
    picks: Vec<Choice>,
    selections: Vec<String>,
}

impl Report {
    fn capture(picker: &PickerController, query: &str) -> Self {
        let describe = |items: &[Item]| -> Vec<Choice> {
            items
                .iter()
                .map(|item| Choice {
                    label: picker.label(item),
                    item: item.clone(),
                })
                .collect()
        };
        Self {
            placeholder: picker.placeholder().to_string(),
            query: query.to_string(),
            choices: describe(picker.choices()),
            picks: describe(picker.picks()),
            selections: picker.selections(),
        }
    }

    fn print(&self) {
        println!("query: {:?}", self.query);
        println!("choices:");
        for (i, choice) in self.choices.iter().enumerate() {
            println!("  [{i}] {}", choice.label);
        }
        println!("picks:");
        for pick in &self.picks {
            println!("  {}", pick.label);
        }
        println!("selections: {}", self.selections.join(", "));
    }
}

fn setup_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

async fn run(args: Args) -> Result<()> {
    let config = PickerConfig::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;

    let mut picker = PickerController::builder(config)
        .on_change(|picks| info!(count = picks.len(), "Picks changed"))
        .build();
    if let Some(err) = picker.config_error() {
        bail!("Picker is disabled: {err}");
    }

    for query in &args.queries {
        picker.set_query(query.as_str());
        let task = picker.search()?;
        picker.settle([task]).await;

        let report = Report::capture(&picker, query);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            report.print();
        }
    }

    if let Some(index) = args.select {
        if !picker.scroll_to(index) {
            bail!(
                "Result index {index} is out of range ({} results)",
                picker.choices().len()
            );
        }
    }

    if args.commit {
        let outcome = picker.handle_key(KeyEvent::press(KeyCode::Enter));
        if !outcome.prevent_default {
            bail!("Nothing to commit: the last search returned no results");
        }
        let report = Report::capture(&picker, picker.query());
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            report.print();
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    setup_logging(&args.log_level, args.json_logs);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
