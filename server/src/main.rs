use log::{info, warn};
use server::config::ServerConfig;
use server::game::{GuessingGame, GAME_INFO};
use server::logging;
use server::network::Server;
use server::record::RecordStore;
use std::sync::Arc;

/// Parses arguments, sets up logging, then runs the accept loop until it fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = ServerConfig::from_args(std::env::args_os());
    let (config, warnings) = match &parsed {
        Ok((config, warnings)) => (config.clone(), warnings.clone()),
        Err(e) if is_informational(e) => e.exit(),
        Err(_) => (ServerConfig::default(), Vec::new()),
    };

    logging::init(config.log_file);

    if let Err(e) = &parsed {
        warn!(
            "Command line arguments faulty ({:?}). Launching with program defaults.",
            e.kind()
        );
    }
    for warning in &warnings {
        warn!("Command line argument faulty: {}", warning);
    }

    let records = Arc::new(RecordStore::new());
    let server = Server::bind(&config, GAME_INFO, move || {
        GuessingGame::new(Arc::clone(&records))
    })
    .await?;

    tokio::select! {
        result = server.run() => Ok(result?),
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
            Ok(())
        }
    }
}

fn is_informational(e: &clap::Error) -> bool {
    matches!(
        e.kind(),
        clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
    )
}
