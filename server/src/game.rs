//! One in a Million: the high-low guessing game played over a connection.
//!
//! Each admitted connection gets its own [`GuessingGame`]. The game keeps a
//! window `(low, high)` that always strictly contains the target and shrinks
//! it with every valid guess that misses. On a win it offers the player a
//! place on the shared record, which may already have been taken by a faster
//! concurrent winner by the time the player has typed their initials.

use crate::record::{RecordStore, RecordUpdate};
use log::debug;
use rand::Rng;
use shared::{GameInfo, Playable, MAX_TARGET, QUIT_TOKEN};
use std::future::Future;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub const GAME_INFO: GameInfo = GameInfo {
    title: "One in a Million",
    authors: &["Kent Collins"],
    version: "0.1.0",
    description: "How many guesses does it take you?",
};

/// Stored in place of an empty name.
const ANONYMOUS: &str = "anonymous";

/// Longest input line accepted from a player, newline included.
const MAX_LINE_LEN: usize = 256;

/// Where the conversation currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingGuess,
    Won,
    Quit,
}

/// Classification of one line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guess {
    Quit,
    Invalid,
    Exact(u32),
    TooLow(u32),
    TooHigh(u32),
}

#[derive(Debug)]
pub struct GuessingGame {
    records: Arc<RecordStore>,
    max_target: u32,
    target: u32,
    low: u32,
    high: u32,
    guesses: u32,
    state: SessionState,
}

impl GuessingGame {
    /// Starts a game with a uniformly random target in `1..=MAX_TARGET`.
    pub fn new(records: Arc<RecordStore>) -> Self {
        let target = rand::thread_rng().gen_range(1..=MAX_TARGET);
        debug!("New game with target {}", target);
        Self::with_target(records, MAX_TARGET, target)
    }

    /// Starts a game over `1..=max_target` with a chosen target.
    ///
    /// `max_target` is clamped to `1..u32::MAX` so the upper bound of the
    /// window stays representable, and `target` is clamped into the range.
    pub fn with_target(records: Arc<RecordStore>, max_target: u32, target: u32) -> Self {
        let max_target = max_target.clamp(1, u32::MAX - 1);
        let target = target.clamp(1, max_target);
        Self {
            records,
            max_target,
            target,
            low: 0,
            high: max_target + 1,
            guesses: 0,
            state: SessionState::AwaitingGuess,
        }
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    /// The exclusive window known to contain the target.
    pub fn bounds(&self) -> (u32, u32) {
        (self.low, self.high)
    }

    pub fn guesses(&self) -> u32 {
        self.guesses
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Classifies a line of input without changing the game.
    pub fn evaluate(&self, input: &str) -> Guess {
        let input = input.trim();
        if input.eq_ignore_ascii_case(QUIT_TOKEN) {
            return Guess::Quit;
        }

        let guess = match input.parse::<i64>() {
            Ok(n) if (1..=i64::from(self.max_target)).contains(&n) => n as u32,
            _ => return Guess::Invalid,
        };

        match guess.cmp(&self.target) {
            std::cmp::Ordering::Equal => Guess::Exact(guess),
            std::cmp::Ordering::Less => Guess::TooLow(guess),
            std::cmp::Ordering::Greater => Guess::TooHigh(guess),
        }
    }

    /// Applies one line of input and returns the reply to send.
    ///
    /// Only valid guesses are counted. Once the game has been won or quit
    /// further input is ignored.
    pub fn step(&mut self, input: &str) -> String {
        if self.state != SessionState::AwaitingGuess {
            return String::new();
        }

        match self.evaluate(input) {
            Guess::Quit => {
                self.state = SessionState::Quit;
                shared::farewell(self.guesses, self.target)
            }
            Guess::Invalid => shared::invalid_guess(input.trim(), self.max_target),
            Guess::Exact(_) => {
                self.guesses += 1;
                self.state = SessionState::Won;
                shared::congratulations(self.guesses)
            }
            Guess::TooLow(guess) => {
                self.guesses += 1;
                self.low = self.low.max(guess);
                shared::suggestion(true, self.low, self.high, self.guesses)
            }
            Guess::TooHigh(guess) => {
                self.guesses += 1;
                self.high = self.high.min(guess);
                shared::suggestion(false, self.low, self.high, self.guesses)
            }
        }
    }

    async fn play<R, W>(mut self, mut input: R, mut output: W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        send(&mut output, &shared::range_prompt(self.max_target)).await?;

        while self.state == SessionState::AwaitingGuess {
            let line = receive(&mut input).await?;
            let reply = self.step(&line);
            send(&mut output, &reply).await?;
        }

        if self.state != SessionState::Won || !self.records.qualifies(self.guesses).await {
            return Ok(());
        }

        send(&mut output, shared::NEW_RECORD_PROMPT).await?;
        let name = receive(&mut input).await?;
        let name = match name.trim() {
            "" => ANONYMOUS,
            name => name,
        };

        // Re-checked under the lock; a faster winner may have committed meanwhile
        let announcement = match self.records.try_set(self.guesses, name).await {
            RecordUpdate::Set(record) => shared::new_record(record.score, &record.holder),
            RecordUpdate::Kept(record) => shared::record_held(record.score, &record.holder),
        };
        send(&mut output, &announcement).await
    }
}

impl Playable for GuessingGame {
    fn serve<R, W>(self, input: R, output: W) -> impl Future<Output = io::Result<()>> + Send
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        self.play(input, output)
    }
}

async fn send<W: AsyncWrite + Unpin>(output: &mut W, message: &str) -> io::Result<()> {
    output.write_all(message.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}

/// Reads one line, treating end of stream as the peer going away.
///
/// Bytes that are not UTF-8 are replaced rather than rejected, so they reach
/// the game as an ordinary invalid guess. A line longer than `MAX_LINE_LEN`
/// ends the session.
async fn receive<R: AsyncBufRead + Unpin>(input: &mut R) -> io::Result<String> {
    let mut line = Vec::new();
    let read = (&mut *input)
        .take(MAX_LINE_LEN as u64)
        .read_until(b'\n', &mut line)
        .await?;

    if read == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed mid-game",
        ));
    }
    if read == MAX_LINE_LEN && line.last() != Some(&b'\n') {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("input line exceeds {MAX_LINE_LEN} bytes"),
        ));
    }
    Ok(String::from_utf8_lossy(&line).into_owned())
}
