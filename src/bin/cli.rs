//! Chateau CLI Client
//!
//! Sends one request to a Chateau server and prints the reply.

use std::io::Write;
use std::time::Duration;

use chateau::client::Client;
use clap::Parser;

/// Chateau CLI
#[derive(Parser, Debug)]
#[command(name = "chateau-cli")]
#[command(about = "CLI for calling a Chateau server")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    server: String,

    /// Timeout for the whole exchange in milliseconds (0 = none)
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    /// Handler to call
    handler: String,

    /// Request payload (must be non-empty)
    payload: String,
}

fn main() {
    let args = Args::parse();

    let reply = Client::connect(&args.server)
        .and_then(|mut client| {
            let timeout = (args.timeout_ms > 0).then(|| Duration::from_millis(args.timeout_ms));
            client.set_timeout(timeout)?;
            client.send(&args.handler, args.payload.as_bytes())?;
            client.finish()
        });

    match reply {
        Ok(bytes) if bytes.is_empty() => {
            eprintln!("(connection closed without a reply)");
            std::process::exit(1);
        }
        Ok(bytes) => {
            let mut stdout = std::io::stdout();
            let _ = stdout.write_all(&bytes);
            let _ = stdout.write_all(b"\n");
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
