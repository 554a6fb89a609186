use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use client_core::InMemoryTalkClient;
use shared::domain::RandomIdGenerator;
use talking_heads::{
    backend_bridge::Store,
    config::load_settings,
    controller::{
        events::UserIntent,
        orchestration::{dispatch_action, resolve_intent},
        talk_list::{TalkList, TalkListAction, TalkListState},
    },
    ui,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "talking_heads", about = "Track conference talk proposals")]
struct Args {
    /// Config file; defaults to ./talking_heads.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Chance in [0, 1] that a simulated load/save fails.
    #[arg(long)]
    failure_probability: Option<f64>,
    /// Start with an empty talk store instead of the demo catalogue.
    #[arg(long)]
    no_demo: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(probability) = args.failure_probability {
        settings.failure_probability = probability;
    }
    if args.no_demo {
        settings.seed_demo_talks = false;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let client = if settings.seed_demo_talks {
        InMemoryTalkClient::with_demo_talks(settings.store_options())
    } else {
        InMemoryTalkClient::new(Vec::new(), settings.store_options())
    };
    let store = Store::spawn(
        TalkList::new(Arc::new(client), Arc::new(RandomIdGenerator)),
        TalkListState::default(),
    );
    store
        .send(TalkListAction::Start)
        .await
        .context("talk list stopped before it could subscribe")?;

    let mut states = store.subscribe_state();
    let renderer = tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let rendered = ui::render(&states.borrow_and_update());
            println!("{rendered}");
        }
    });

    println!("{}", ui::HELP);
    let actions = store.sender();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let intent = match ui::parse_command(&line) {
            Ok(intent) => intent,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        match intent {
            UserIntent::Quit => break,
            UserIntent::Help => {
                println!("{}", ui::HELP);
                continue;
            }
            UserIntent::Show => {
                println!("{}", ui::render(&store.state()));
                continue;
            }
            _ => {}
        }

        let mut status = String::new();
        match resolve_intent(intent, &store.state(), Local::now().date_naive()) {
            Ok(action) => dispatch_action(&actions, action, &mut status),
            Err(message) => status = message,
        }
        if !status.is_empty() {
            println!("{status}");
        }
    }

    renderer.abort();
    info!("exiting");
    Ok(())
}
