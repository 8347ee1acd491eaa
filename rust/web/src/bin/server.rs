//! Standalone web server binary
//!
//! Usage: cargo run -p lowdraw_web --bin lowdraw-web-server

use lowdraw_web::{LogFormat, ServerConfig, WebServer};
use std::process::ExitCode;
use std::time::Duration;

#[tokio::main]
async fn main() -> ExitCode {
    let format = std::env::var("LOWDRAW_LOG_FORMAT")
        .ok()
        .and_then(|v| LogFormat::parse(&v))
        .unwrap_or_default();
    if let Err(err) = lowdraw_web::init_logging(format) {
        eprintln!("Error: failed to install logger: {err}");
        return ExitCode::FAILURE;
    }

    let config = match parse_args(std::env::args().skip(1)) {
        Ok(Some(config)) => config,
        Ok(None) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("Error: {message}");
            print_help();
            return ExitCode::from(2);
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "server terminated");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        host = config.host(),
        port = config.port(),
        sweep_secs = config.sweep_interval().as_secs(),
        "starting lowdraw web server"
    );

    let handle = WebServer::new(config).start().await?;
    println!("Server running at http://{}", handle.address());
    println!("Press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down");
    handle.shutdown().await?;
    Ok(())
}

/// `Ok(None)` means help was requested.
fn parse_args(args: impl Iterator<Item = String>) -> Result<Option<ServerConfig>, String> {
    let mut host = "127.0.0.1".to_string();
    let mut port = 8080u16;
    let mut sweep: Option<Duration> = None;

    let mut args = args.peekable();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--host" | "-h" => {
                host = args.next().ok_or("--host requires a value")?;
            }
            "--port" | "-p" => {
                let value = args.next().ok_or("--port requires a value")?;
                port = value
                    .parse()
                    .map_err(|_| format!("invalid port number: {value}"))?;
            }
            "--sweep-secs" => {
                let value = args.next().ok_or("--sweep-secs requires a value")?;
                let secs: u64 = value
                    .parse()
                    .map_err(|_| format!("invalid sweep interval: {value}"))?;
                if secs == 0 {
                    return Err("sweep interval must be positive".to_string());
                }
                sweep = Some(Duration::from_secs(secs));
            }
            "--help" => return Ok(None),
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    let config = ServerConfig::new(host, port);
    Ok(Some(match sweep {
        Some(interval) => config.with_sweep_interval(interval),
        None => config,
    }))
}

fn print_help() {
    println!("Lowdraw Web Server");
    println!();
    println!("Usage: lowdraw-web-server [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --host, -h <HOST>      Host to bind to (default: 127.0.0.1)");
    println!("  --port, -p <PORT>      Port to bind to (default: 8080)");
    println!("  --sweep-secs <SECS>    Idle session sweep interval (default: 60)");
    println!("  --help                 Show this help message");
    println!();
    println!("Environment:");
    println!("  RUST_LOG               Log filter");
    println!("  LOWDRAW_LOG_FORMAT     text (default) or json");
}
