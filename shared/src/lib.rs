//! Wire protocol and game contract shared by the server and its clients.
//!
//! Every message the server sends is built by one of the pure functions in
//! this crate, so the server, the test client and the integration tests all
//! agree on the exact text of the line-oriented protocol.

use std::future::Future;
use std::io;
use tokio::io::{AsyncBufRead, AsyncWrite};

pub const MAX_TARGET: u32 = 1_000_000;
pub const DEFAULT_PORT: u16 = 0;
pub const DEFAULT_MAX_SESSIONS: u32 = 10;

/// Token a player sends to give up. Compared case-insensitively.
pub const QUIT_TOKEN: &str = "q";

pub const TOO_LOW: &str = "Too low.";
pub const TOO_HIGH: &str = "Too high.";
pub const WIN_PREFIX: &str = "You guessed it exactly!";
pub const NEW_RECORD_PROMPT: &str =
    "Wow!  That's a new high score -- please enter your initials...";

/// Descriptive metadata for a game, kept apart from the game itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameInfo {
    pub title: &'static str,
    pub authors: &'static [&'static str],
    pub version: &'static str,
    pub description: &'static str,
}

/// A game that can own one connection's conversation from start to finish.
///
/// `serve` returns once the interaction is complete. The server does not
/// know which game it is running; it only hands over the two halves of the
/// connection.
pub trait Playable: Send + 'static {
    fn serve<R, W>(self, input: R, output: W) -> impl Future<Output = io::Result<()>> + Send
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send;
}

/// Produces a fresh game for every admitted connection.
pub trait GameFactory: Send + Sync + 'static {
    type Game: Playable;

    fn new_game(&self) -> Self::Game;
}

impl<F, G> GameFactory for F
where
    F: Fn() -> G + Send + Sync + 'static,
    G: Playable,
{
    type Game = G;

    fn new_game(&self) -> G {
        self()
    }
}

fn guesses(n: u32) -> &'static str {
    if n == 1 {
        "guess"
    } else {
        "guesses"
    }
}

pub fn range_prompt(max_target: u32) -> String {
    format!("Guess a number between 1 and {max_target} or press '{QUIT_TOKEN}' to quit")
}

pub fn invalid_guess(input: &str, max_target: u32) -> String {
    format!(
        "I'm sorry, but {input} is not a valid guess\n{}",
        range_prompt(max_target)
    )
}

/// `too_low` selects the cue; the window is exclusive on both ends.
pub fn suggestion(too_low: bool, low: u32, high: u32, guess_count: u32) -> String {
    let cue = if too_low { TOO_LOW } else { TOO_HIGH };
    format!(
        "{cue}  The answer lies between {low} and {high}.\nYou have used {guess_count} {}",
        guesses(guess_count)
    )
}

pub fn congratulations(guess_count: u32) -> String {
    format!(
        "{WIN_PREFIX}  You used {guess_count} {}.",
        guesses(guess_count)
    )
}

pub fn farewell(guess_count: u32, target: u32) -> String {
    format!(
        "Thanks for playing High-Low.  You tried {guess_count} {} but did not win.  \
         The target was {target}\nTry again, if you think you can do better.",
        guesses(guess_count)
    )
}

pub fn new_record(score: u32, holder: &str) -> String {
    format!("New high score of {score} set by {holder}")
}

/// Sent when a faster winner committed a record while this player was typing.
pub fn record_held(score: u32, holder: &str) -> String {
    format!("The high score of {score} is held by {holder}")
}

pub fn capacity_reached(max_sessions: usize) -> String {
    let noun = if max_sessions == 1 {
        "connection"
    } else {
        "connections"
    };
    format!("The server limit of {max_sessions} {noun} has been reached.  Please try again, later.")
}

/// Which way a hint line points, if it is one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    TooLow,
    TooHigh,
}

/// Recognises the first line of a suggestion message.
pub fn parse_hint(line: &str) -> Option<Hint> {
    let line = line.trim_start();
    if line.starts_with(TOO_LOW) {
        Some(Hint::TooLow)
    } else if line.starts_with(TOO_HIGH) {
        Some(Hint::TooHigh)
    } else {
        None
    }
}
