//! Chateau Server Binary
//!
//! Serves a small demo service over the plaintext transport.

use std::io::{BufRead, Write};

use chateau::{CancelToken, Config, Handler, HandlerError, Server, Service, Text};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// Chateau Server
#[derive(Parser, Debug)]
#[command(name = "chateau-server")]
#[command(about = "Single-request-per-connection RPC server")]
#[command(version)]
struct Args {
    /// Host to listen on
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Per-connection read timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// Per-connection write timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    write_timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,chateau=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("Chateau Server v{}", chateau::VERSION);

    let config = Config::builder()
        .bind_host(&args.host)
        .bind_port(args.port)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    tracing::info!("Listen address: {}", config.bind_addr());

    // Runs until the process is terminated
    let cancel = CancelToken::new();
    let server = Server::new(config);

    if let Err(e) = server.run(&cancel, &demo_service()) {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}

fn demo_service() -> Service {
    Service::new("demo")
        .handler(Handler::unary("Echo", |_ctx, req: Text| Ok(req)))
        .handler(Handler::unary("Reverse", |_ctx, req: Text| {
            Ok(Text(req.as_str().chars().rev().collect()))
        }))
        .handler(Handler::stream("Collect", collect))
}

/// Acknowledge with `ready`, then gather lines until `done`
fn collect(
    ctx: &chateau::CallContext,
    first: Text,
    peer: &mut chateau::Peer,
) -> Result<Text, HandlerError> {
    peer.write_all(b"ready\n")?;
    peer.flush()?;

    let mut items = vec![first.into_inner()];
    let mut line = String::new();

    while !ctx.is_cancelled() {
        line.clear();
        if peer.read_line(&mut line)? == 0 {
            return Err("stream ended before done".into());
        }

        match line.trim_end() {
            "done" => break,
            item => items.push(item.to_string()),
        }
    }

    Ok(Text(items.join(",")))
}
