//! Headless test client: connects to the server, prints every line it
//! receives, and forwards stdin lines (`MOVE <edgeIndex>` or `QUIT`)
//! verbatim. Useful for driving a game by hand without a graphical client.

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Server address to connect to
    #[clap(short = 'H', long, default_value = "127.0.0.1")]
    host: String,
    /// Server port
    #[clap(short, long, default_value = "8901")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let stream = TcpStream::connect((args.host.as_str(), args.port)).await?;
    println!("Connected to {}", stream.peer_addr()?);
    let (read_half, mut write_half) = stream.into_split();

    // Print every server line until the connection closes.
    let mut printer = tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            println!("< {}", line);
        }
        println!("Server closed the connection");
    });

    // Forward stdin lines to the server.
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = &mut printer => break,
            line = stdin.next_line() => match line? {
                Some(line) => {
                    let command = line.trim();
                    if command.is_empty() {
                        continue;
                    }
                    write_half.write_all(format!("{}\n", command).as_bytes()).await?;
                    if command == "QUIT" {
                        break;
                    }
                }
                None => break,
            }
        }
    }

    Ok(())
}
