use clap::Parser;
use shared::{parse_hint, Hint, MAX_TARGET, NEW_RECORD_PROMPT, WIN_PREFIX};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Plays one game by bisection and prints the whole conversation.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Server address to connect to
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    server: String,
    /// Initials to submit if a record is set
    #[arg(short, long, default_value = "BOT")]
    initials: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let stream = TcpStream::connect(&args.server).await?;
    println!("Connected to {}", args.server);

    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    let greeting = match lines.next_line().await? {
        Some(line) => line,
        None => return Err("server closed the connection".into()),
    };
    println!("<-- {}", greeting);
    if !greeting.starts_with("Guess a number") {
        return Ok(());
    }

    let (mut low, mut high) = (0u32, MAX_TARGET + 1);
    let mut guess = (low + high) / 2;
    let mut won = false;
    println!("--> {}", guess);
    writer.write_all(format!("{guess}\n").as_bytes()).await?;

    while let Some(line) = lines.next_line().await? {
        println!("<-- {}", line);

        match parse_hint(&line) {
            Some(Hint::TooLow) => low = guess,
            Some(Hint::TooHigh) => high = guess,
            None => {
                if line.starts_with(WIN_PREFIX) {
                    won = true;
                } else if line == NEW_RECORD_PROMPT {
                    println!("--> {}", args.initials);
                    writer
                        .write_all(format!("{}\n", args.initials).as_bytes())
                        .await?;
                }
                continue;
            }
        }

        guess = low + (high - low) / 2;
        println!("--> {}", guess);
        writer.write_all(format!("{guess}\n").as_bytes()).await?;
    }

    if won {
        println!("Test client won");
    } else {
        println!("Test client finished without a win");
    }
    Ok(())
}
