//! Download a URL into a directory, optionally racing address families.
//!
//! ```text
//! cargo run --example download -- <url> [--race] [--prefer-ipv4] [--out DIR]
//! ```
//!
//! Set `RUST_LOG=happyfetch_client=debug` to watch the connection race.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use happyfetch::{DirectorySink, DownloadOutcome, TracingObserver, start_download};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "download")]
#[command(about = "Download a URL, racing IPv6 and IPv4 connection attempts")]
struct Args {
    /// URL to fetch (http or https)
    url: String,

    /// Race connection attempts across all resolved addresses
    #[arg(long)]
    race: bool,

    /// Try IPv4 addresses before IPv6 ones
    #[arg(long)]
    prefer_ipv4: bool,

    /// Directory the download is written into
    #[arg(short, long, default_value = "downloads")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let sink = DirectorySink::new(&args.out);
    let mut handle = start_download(
        args.url,
        args.race,
        args.prefer_ipv4,
        sink.clone(),
        TracingObserver,
    );

    let outcome = tokio::select! {
        outcome = &mut handle => outcome,
        _ = tokio::signal::ctrl_c() => {
            handle.cancel();
            handle.await
        }
    };

    match outcome {
        DownloadOutcome::Completed { filename, bytes } => {
            println!("saved {bytes} bytes to {}", sink.path_for(&filename).display());
            ExitCode::SUCCESS
        }
        DownloadOutcome::Failed(message) => {
            eprintln!("download failed: {message}");
            ExitCode::FAILURE
        }
        DownloadOutcome::Cancelled => {
            eprintln!("download cancelled");
            ExitCode::FAILURE
        }
    }
}
