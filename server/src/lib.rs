//! # Game Server Library
//!
//! A concurrent text-protocol server that runs one interactive number
//! guessing game per TCP connection and keeps a single best-score record
//! shared by every session.
//!
//! ## Architecture
//!
//! ### Accept Loop
//! The [`network::Server`] owns the listening socket and accepts one
//! connection at a time. Each connection is offered to the admission
//! controller before any game is created.
//!
//! ### Admission
//! [`admission::AdmissionController`] bounds the number of sessions running
//! at once. A rejected peer receives a one-line capacity message and is
//! disconnected without consuming a slot. An admitted session carries its
//! slot until the session task ends, however it ends.
//!
//! ### Sessions
//! Every admitted connection runs in its own tokio task. The game itself is
//! plugged in through the [`shared::Playable`] trait, so the server only
//! knows how to hand a connection to a game, not how the game is played.
//!
//! ### Shared Record
//! [`record::RecordStore`] is the only state shared between sessions besides
//! the slot counter. Its compare-and-set runs under a single write lock so
//! that concurrent winners are serialized.
//!
//! ## Module Organization
//!
//! - `admission`: slot accounting for concurrent sessions
//! - `config`: command line configuration
//! - `game`: the One in a Million guessing game
//! - `logging`: env_logger setup with an optional log file
//! - `network`: listener and session tasks
//! - `record`: the shared best score
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::ServerConfig;
//! use server::game::{GuessingGame, GAME_INFO};
//! use server::network::Server;
//! use server::record::RecordStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let records = Arc::new(RecordStore::new());
//!     let server = Server::bind(&ServerConfig::default(), GAME_INFO, move || {
//!         GuessingGame::new(Arc::clone(&records))
//!     })
//!     .await?;
//!
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod admission;
pub mod config;
pub mod game;
pub mod logging;
pub mod network;
pub mod record;
