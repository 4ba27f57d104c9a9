//! view-router CLI
//!
//! Loads a router config and exercises it from the command line.
//!
//! ```text
//! view-router check router.toml
//! view-router resolve router.toml / /animals /unknown
//! view-router simulate router.toml push:/animals name:home back forward
//! view-router listen router.toml        (navigation steps on stdin)
//! view-router watch router.toml
//! ```

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::sync::{broadcast, mpsc};

use view_router::config::watcher::ConfigWatcher;
use view_router::config::{load_config, LoadedRouter, RouterConfig};
use view_router::lifecycle::{signals, Shutdown};
use view_router::navigation::{HistoryDriver, HistoryEvent, MemoryHistory, NavigationController, RenderEvent};
use view_router::observability::logging;
use view_router::routing::match_location;

#[derive(Parser)]
#[command(name = "view-router")]
#[command(about = "Resolve and simulate client-side routes", long_about = None)]
struct Cli {
    /// Log level; defaults to the config file's observability.log_level
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a config and print its route tree
    Check { config: PathBuf },
    /// Resolve locations and print the matching chains as JSON
    Resolve {
        config: PathBuf,
        #[arg(required = true)]
        locations: Vec<String>,
    },
    /// Run navigation steps against an in-memory history
    Simulate {
        config: PathBuf,
        /// Location shown before the first step
        #[arg(long, default_value = "/")]
        initial: String,
        /// push:/path, replace:/path, name:route, pop:/href, back, forward
        steps: Vec<String>,
    },
    /// Read navigation steps from stdin until EOF or Ctrl-C
    Listen { config: PathBuf },
    /// Re-validate the config whenever the file changes
    Watch { config: PathBuf },
}

impl Commands {
    fn config_path(&self) -> &Path {
        match self {
            Commands::Check { config }
            | Commands::Resolve { config, .. }
            | Commands::Simulate { config, .. }
            | Commands::Listen { config }
            | Commands::Watch { config } => config,
        }
    }
}

/// One navigation step given on the command line or stdin.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Event(HistoryEvent),
    Back,
    Forward,
}

fn parse_step(raw: &str) -> Result<Step, String> {
    let raw = raw.trim();
    match raw {
        "back" => return Ok(Step::Back),
        "forward" => return Ok(Step::Forward),
        _ => {}
    }

    let (kind, arg) = raw
        .split_once(':')
        .ok_or_else(|| format!("unrecognized step '{}'", raw))?;
    let arg = arg.to_string();
    match kind {
        "push" => Ok(Step::Event(HistoryEvent::Push(arg))),
        "replace" => Ok(Step::Event(HistoryEvent::Replace(arg))),
        "name" => Ok(Step::Event(HistoryEvent::Named(arg))),
        "pop" => Ok(Step::Event(HistoryEvent::Popped(arg))),
        _ => Err(format!("unrecognized step '{}'", raw)),
    }
}

fn print_render(event: RenderEvent<String>) {
    match serde_json::to_string(&event) {
        Ok(line) => println!("{}", line),
        Err(e) => tracing::error!(error = %e, "Failed to serialize render event"),
    }
}

/// Log level from the config file, without validating anything else.
fn configured_log_level(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let config: RouterConfig = toml::from_str(&content).ok()?;
    Some(config.observability.log_level)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = cli
        .log_level
        .clone()
        .or_else(|| configured_log_level(cli.command.config_path()))
        .unwrap_or_else(|| "info".to_string());
    logging::init_logging(&level)?;

    tracing::debug!("view-router v{} starting", env!("CARGO_PKG_VERSION"));

    let loaded = load_config(cli.command.config_path())?;

    match cli.command {
        Commands::Check { .. } => {
            print!("{}", loaded.table);
        }
        Commands::Resolve { locations, .. } => resolve(&loaded, &locations)?,
        Commands::Simulate { initial, steps, .. } => simulate(&loaded, &initial, &steps)?,
        Commands::Listen { .. } => listen(&loaded).await?,
        Commands::Watch { config } => watch(&config).await?,
    }

    Ok(())
}

fn resolve(loaded: &LoadedRouter, locations: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let base = loaded.config.base_path();

    for raw in locations {
        let location = base.strip(raw);
        let output = match match_location(&loaded.table, &location).into_match() {
            Some(matched) => {
                let chain: Vec<_> = matched
                    .chain()
                    .iter()
                    .filter_map(|m| {
                        let record = loaded.table.get(m.id)?;
                        Some(json!({
                            "component": record.component(),
                            "name": record.name(),
                            "path": record.full_path(),
                            "consumed": matched.consumed(m),
                        }))
                    })
                    .collect();
                json!({ "location": location, "matched": true, "chain": chain })
            }
            None => json!({ "location": location, "matched": false }),
        };
        println!("{}", serde_json::to_string(&output)?);
    }
    Ok(())
}

fn replay(nav: &mut NavigationController<String>, href: Option<String>, step: &str) {
    match href {
        Some(href) => {
            nav.handle_pop(&href);
        }
        None => tracing::warn!(step = %step, "History has no entry in that direction"),
    }
}

fn simulate(loaded: &LoadedRouter, initial: &str, steps: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let mode = loaded.table.mode();
    let base = loaded.config.base_path();
    let initial_href = mode.href(initial, &base).unwrap_or_else(|| initial.to_string());

    let history = MemoryHistory::new(initial_href);
    let mut nav = loaded.controller(Box::new(history.clone()), Box::new(print_render));
    nav.start();

    for raw in steps {
        match parse_step(raw)? {
            Step::Event(HistoryEvent::Push(location)) => {
                nav.push(&location);
            }
            Step::Event(HistoryEvent::Replace(location)) => {
                nav.replace(&location);
            }
            Step::Event(HistoryEvent::Named(name)) => {
                nav.push_named(&name)?;
            }
            Step::Event(HistoryEvent::Popped(href)) => {
                nav.handle_pop(&href);
            }
            Step::Back => replay(&mut nav, history.back(), raw),
            Step::Forward => replay(&mut nav, history.forward(), raw),
        }
    }

    let summary = json!({
        "state": nav.state(),
        "history": history.entries(),
        "index": history.index(),
    });
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

async fn listen(loaded: &LoadedRouter) -> Result<(), Box<dyn std::error::Error>> {
    let shutdown = Arc::new(Shutdown::new());
    let _ = signals::shutdown_on_ctrl_c(shutdown.clone());

    let initial_href = loaded
        .table
        .mode()
        .href("/", &loaded.config.base_path())
        .unwrap_or_else(|| "/".to_string());
    let history = MemoryHistory::new(initial_href);
    let controller = loaded.controller(Box::new(history), Box::new(print_render));

    let (tx, rx) = mpsc::unbounded_channel();
    let driver = tokio::spawn(HistoryDriver::new(controller).run(rx, shutdown.subscribe()));

    let lines = spawn_line_reader(io::BufReader::new(io::stdin()))?;
    let mut stop = shutdown.subscribe();
    feed_steps(lines, &tx, &mut stop).await?;
    drop(tx);
    if !shutdown.is_triggered() {
        tracing::debug!("stdin closed");
    }

    let controller = driver.await?;
    println!("{}", serde_json::to_string(&json!({ "state": controller.state() }))?);
    Ok(())
}

/// Read lines on a plain thread. A read blocked on open input then never
/// holds up runtime shutdown.
fn spawn_line_reader<R>(reader: R) -> io::Result<mpsc::UnboundedReceiver<io::Result<String>>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    thread::Builder::new().name("stdin-reader".into()).spawn(move || {
        for line in reader.lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    })?;
    Ok(rx)
}

/// Parse input lines into driver events until input ends or shutdown fires.
async fn feed_steps(
    mut lines: mpsc::UnboundedReceiver<io::Result<String>>,
    events: &mpsc::UnboundedSender<HistoryEvent>,
    stop: &mut broadcast::Receiver<()>,
) -> io::Result<()> {
    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else { break };
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                match parse_step(&line) {
                    Ok(Step::Event(event)) => {
                        if events.send(event).is_err() {
                            break;
                        }
                    }
                    Ok(_) => tracing::warn!("back/forward need a host history; send pop:<href> instead"),
                    Err(e) => tracing::warn!(error = %e, "Ignoring input line"),
                }
            }
            _ = stop.recv() => break,
        }
    }
    Ok(())
}

async fn watch(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let shutdown = Arc::new(Shutdown::new());
    let _ = signals::shutdown_on_ctrl_c(shutdown.clone());

    let (watcher, mut updates) = ConfigWatcher::new(path);
    let _watcher = watcher.run()?;
    let mut stop = shutdown.subscribe();

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Some(loaded) => print!("{}", loaded.table),
                None => break,
            },
            _ = stop.recv() => break,
        }
    }
    Ok(())
}
