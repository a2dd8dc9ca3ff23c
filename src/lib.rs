//! riski: a terminal client for an AG-UI speaking RIS research agent.
//!
//! The agent streams protocol events over SSE. This crate normalizes them,
//! reconciles them into a progress model of steps, tool calls and document
//! checks, and assembles answer snapshots for display.
//!
//! # Quick start
//!
//! ```no_run
//! use riski::api::AgentClient;
//! use riski::config::load_config;
//! use riski::runtime::ask_question;
//!
//! # async fn example() {
//! let loaded = load_config(None).unwrap();
//! let client = AgentClient::new(&loaded.config.api);
//! let (_cancel_tx, cancel_rx) = tokio::sync::watch::channel(false);
//! let answer = ask_question(
//!     &client,
//!     "Welche Anträge gibt es zum Radverkehr?",
//!     cancel_rx,
//!     loaded.config.reconciler.relevance_detection,
//!     |progress| eprintln!("{:?}", progress.status),
//! )
//! .await;
//! println!("{}", answer.response);
//! # }
//! ```

pub mod answer;
pub mod api;
pub mod build_info;
pub mod config;
pub mod error;
pub mod payload;
pub mod protocol;
pub mod reconciler;
pub mod runtime;
#[cfg(test)]
pub mod testsupport;
pub mod types;
pub mod ui;
