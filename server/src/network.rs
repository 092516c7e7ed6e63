//! Server network layer: TCP listener, admission and per-session tasks

use crate::admission::{AdmissionController, AdmissionSlot};
use crate::config::ServerConfig;
use log::{debug, error, info, warn};
use shared::{GameFactory, GameInfo, Playable};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// Accepts connections and runs one game per admitted connection.
pub struct Server<F: GameFactory> {
    listener: TcpListener,
    admission: AdmissionController,
    info: GameInfo,
    factory: Arc<F>,
    rejection: String,
}

impl<F: GameFactory> Server<F> {
    /// Binds the configured address. Failing to bind is fatal to the caller.
    pub async fn bind(
        config: &ServerConfig,
        info: GameInfo,
        factory: F,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(config.address()).await?;
        info!(
            "{} {} listening on {} with capacity {}",
            info.title,
            info.version,
            listener.local_addr()?,
            config.max_sessions
        );

        Ok(Server {
            listener,
            admission: AdmissionController::new(config.max_sessions),
            info,
            factory: Arc::new(factory),
            rejection: shared::capacity_reached(config.max_sessions),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Handle onto the slot counter, for observing how many sessions are open.
    pub fn admission(&self) -> AdmissionController {
        self.admission.clone()
    }

    pub fn info(&self) -> &GameInfo {
        &self.info
    }

    /// Accept loop. Returns only if accepting fails.
    pub async fn run(self) -> io::Result<()> {
        loop {
            let (socket, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    return Err(e);
                }
            };

            match self.admission.try_admit() {
                Some(slot) => {
                    info!(
                        "Accepted {}. Active sessions: {}",
                        peer,
                        self.admission.active()
                    );
                    self.spawn_session(socket, peer, slot);
                }
                None => {
                    warn!(
                        "Rejected {}: server full. Active sessions: {}",
                        peer,
                        self.admission.active()
                    );
                    let rejection = self.rejection.clone();
                    tokio::spawn(async move {
                        if let Err(e) = reject(socket, &rejection).await {
                            debug!("Failed to notify rejected peer {}: {}", peer, e);
                        }
                    });
                }
            }
        }
    }

    /// Spawns the task that owns the session and its slot.
    fn spawn_session(&self, socket: TcpStream, peer: SocketAddr, slot: AdmissionSlot) {
        let game = self.factory.new_game();
        let admission = self.admission.clone();

        tokio::spawn(async move {
            let (reader, writer) = socket.into_split();
            let result = game.serve(BufReader::new(reader), writer).await;
            slot.release();

            match result {
                Ok(()) => info!(
                    "Session with {} finished. Active sessions: {}",
                    peer,
                    admission.active()
                ),
                Err(e) => warn!(
                    "Session with {} ended abruptly: {}. Active sessions: {}",
                    peer,
                    e,
                    admission.active()
                ),
            }
        });
    }
}

/// Tells a peer the server is full and closes the connection.
async fn reject(mut socket: TcpStream, message: &str) -> io::Result<()> {
    socket.write_all(message.as_bytes()).await?;
    socket.write_all(b"\n").await?;
    socket.shutdown().await
}
