//! Terminal host for the Eagler portal.
//!
//! Mounts the game view against a simulated browser and reads commands from
//! stdin, printing notifications as they arrive.

use anyhow::{Context, Result};
use ctrlc::set_handler;
use eagler_portal::{ControllerConfig, SimulatedBrowserConfig, VersionCatalog};
use ep_host::{
    commands::parse_command,
    host::{Flow, Host},
    reader::spawn_line_reader,
};
use log::info;
use pico_args::Arguments;
use std::{io, path::PathBuf, time::Duration};
use tokio::sync::mpsc;

const HELP: &str = "\
Run the Eagler portal game view against a simulated browser

USAGE:
  ep_host [OPTIONS]

OPTIONS:
  --catalog FILE        JSON version catalog  [default: built-in]
  --delay-ms N          Deferred fullscreen delay  [env: PORTAL_FULLSCREEN_DELAY_MS]
  --confirm-ms N        Simulated fullscreen confirmation latency  [default: 50]

FLAGS:
  --deny-fullscreen     Simulated browser rejects every fullscreen request
  --no-auto             Do not request fullscreen after launch
  --dark                Platform prefers a dark colour scheme
  -h, --help            Print help information

Type 'help' at the prompt for commands.
";

struct Args {
    catalog: Option<PathBuf>,
    delay_ms: Option<u64>,
    confirm_ms: u64,
    deny_fullscreen: bool,
    no_auto: bool,
    dark: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        catalog: pargs.opt_value_from_str("--catalog")?,
        delay_ms: pargs.opt_value_from_str("--delay-ms")?,
        confirm_ms: pargs.opt_value_from_str("--confirm-ms")?.unwrap_or(50),
        deny_fullscreen: pargs.contains("--deny-fullscreen"),
        no_auto: pargs.contains("--no-auto"),
        dark: pargs.contains("--dark"),
    };

    env_logger::builder().format_target(false).init();

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let catalog = match &args.catalog {
        Some(path) => VersionCatalog::load(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => VersionCatalog::default(),
    };
    info!("Catalog has {} version(s)", catalog.list().len());

    let mut config = ControllerConfig::from_env();
    if let Some(delay_ms) = args.delay_ms {
        config.fullscreen_delay = Duration::from_millis(delay_ms);
    }
    if args.no_auto {
        config.auto_fullscreen = false;
    }
    config.validate().context("Invalid controller configuration")?;

    let browser_config = SimulatedBrowserConfig {
        deny_with: args
            .deny_fullscreen
            .then(|| "Permissions check failed".to_string()),
        confirm_latency: Duration::from_millis(args.confirm_ms),
    };

    let (mut host, mut notifications) = Host::mount(catalog, config, browser_config, args.dark);

    let printer = tokio::spawn(async move {
        while let Some(notification) = notifications.recv().await {
            println!("{notification}");
        }
    });

    // Catching signals so the view is unmounted before exit.
    let (interrupt_tx, mut interrupt_rx) = mpsc::unbounded_channel();
    set_handler(move || {
        let _ = interrupt_tx.send(());
    })?;

    println!("Type 'help' for commands.");
    let mut lines = spawn_line_reader(io::BufReader::new(io::stdin()));
    loop {
        let line = tokio::select! {
            _ = interrupt_rx.recv() => break,
            line = lines.recv() => line,
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Ok(command) => {
                if host.execute(command).await? == Flow::Quit {
                    break;
                }
            }
            Err(e) => println!("{e}"),
        }
    }

    info!("Unmounting game view");
    host.unmount().await?;
    printer.await?;
    Ok(())
}
