use clap::Parser;
use server::network::Server;
use shared::{Grid, DEFAULT_GRID_LENGTH};

/// Main-method of the application.
/// Parses command-line arguments, binds the listener, and accepts player
/// pairs until interrupted.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Command line arguments
    #[derive(Parser, Debug)]
    #[clap(author, version, about)]
    struct Args {
        /// Server IP address to bind to
        #[clap(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
        /// Server port to listen on
        #[clap(short, long, default_value = "8901")]
        port: u16,
        /// Grid side length (odd, at least 5); clients must use the same value
        #[clap(short, long, default_value_t = DEFAULT_GRID_LENGTH)]
        grid_length: usize,
    }

    env_logger::init();
    let args = Args::parse();

    let grid = Grid::new(args.grid_length)?;
    let address = format!("{}:{}", args.host, args.port);
    let server = Server::bind(&address, grid).await?;

    // Handle shutdown gracefully
    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                eprintln!("Server stopped: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}
