//! CLI entry point for riski.

mod cli;

use std::io::{IsTerminal, Read};

use clap::Parser;
use riski::api::AgentClient;
use riski::config::load_config;
use riski::runtime::ask_question;
use riski::ui::{format_answer, ProgressView, RenderSink, Renderer};
use tokio::sync::watch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    init_tracing();
    let args = cli::Args::parse();

    let loaded = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    let mut config = loaded.config;

    // Apply CLI overrides.
    if let Some(url) = &args.base_url {
        config.api.base_url = url.trim().trim_end_matches('/').to_string();
    }
    if args.json {
        config.display.json = true;
    }
    if args.no_color || !std::io::stderr().is_terminal() {
        config.display.color = false;
    }

    let renderer = Renderer::new(config.display.color);

    let question = match read_question(args.question) {
        Ok(q) => q,
        Err(msg) => {
            renderer.error(&msg);
            std::process::exit(2);
        }
    };

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let cancelled = cancel_rx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_tx.send_replace(true);
        }
    });

    let client = AgentClient::new(&config.api);
    let mut view = ProgressView::new();
    let quiet = args.quiet;
    let answer = ask_question(
        &client,
        &question,
        cancel_rx,
        config.reconciler.relevance_detection,
        |answer| {
            if !quiet {
                view.update(&renderer, &answer);
            }
        },
    )
    .await;

    if *cancelled.borrow() {
        renderer.warn("cancelled");
    }

    if config.display.json {
        match serde_json::to_string_pretty(&answer) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                renderer.error(&format!("failed to serialize answer: {e}"));
                std::process::exit(1);
            }
        }
    } else {
        println!("{}", format_answer(&answer));
    }

    if *cancelled.borrow() {
        std::process::exit(130);
    }
    if answer.is_error() {
        std::process::exit(1);
    }
}

/// Logs go to stderr, filtered by `RISKI_LOG`, then `RUST_LOG`, default `warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("RISKI_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

/// Take the question from the argument, or from stdin when it is piped in.
fn read_question(arg: Option<String>) -> Result<String, String> {
    let question = match arg {
        Some(q) => q,
        None if std::io::stdin().is_terminal() => {
            return Err("no question given. Usage: riski \"<question>\"".to_string());
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("failed to read question from stdin: {e}"))?;
            buf
        }
    };
    let question = question.trim().to_string();
    if question.is_empty() {
        return Err("question is empty".to_string());
    }
    Ok(question)
}
