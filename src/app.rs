use std::io::Write;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::components::app::{self, AppReducer, AppState};
use crate::environment::repository::load_settings;
use crate::environment::{CloudKitGateway, Environment, MockGateway};
use crate::intent::{Intent, HELP};
use crate::reducer::Store;

#[derive(Debug, Parser)]
#[command(name = "podlej", about = "Keep track of your plants")]
pub struct Args {
    /// Keep plants in memory instead of talking to CloudKit
    #[arg(long)]
    pub mock: bool,
    /// Read settings from this file instead of the default location
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

fn setup_logging() {
    use env_logger::Env;
    // stdout carries the snapshots
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{}:{} {} [{}] - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr)
        .init();
}

fn environment(args: &Args) -> anyhow::Result<Environment> {
    if args.mock {
        log::info!("Using the in-memory plant store");
        return Ok(Environment::new(MockGateway::in_memory()));
    }
    let mut settings =
        load_settings(args.settings.as_deref()).context("Could not load the settings")?;
    settings.apply_overrides(|key| std::env::var(key).ok());
    log::info!(
        "Using container {} ({})",
        settings.container,
        settings.environment
    );
    Ok(Environment::new(CloudKitGateway::new(&settings)))
}

pub async fn run(args: Args) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let environment = environment(&args)?;
    let mut store = Store::<AppReducer>::new(AppState::default(), environment);
    let snapshots = store.subscribe();
    let sender = store.sender();
    let mut latest = store.state().clone();
    tokio::spawn(store.run());

    println!("{}", app::render(&latest));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            snapshot = snapshots.recv_async() => {
                let Ok(snapshot) = snapshot else { break };
                println!("{}", app::render(&snapshot));
                latest = snapshot;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Could not read from stdin")? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                let intent = match line.parse::<Intent>() {
                    Ok(intent) => intent,
                    Err(e) => {
                        eprintln!("{e}");
                        continue;
                    }
                };
                match intent {
                    Intent::Quit => break,
                    Intent::Help => println!("{HELP}"),
                    intent => match intent.into_action(&latest) {
                        Some(action) => {
                            if !sender.send(action) {
                                break;
                            }
                        }
                        None => eprintln!("Nothing there to select"),
                    },
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    log::debug!("Bye");
    Ok(())
}
