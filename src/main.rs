use clap::Parser;
use tracing_subscriber::EnvFilter;

use vector_remote::args::RuntimeArgs;

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init(); // installs the subscriber globally

    let args = RuntimeArgs::parse();

    if let Err(e) = vector_remote::runtime::run(args.into()).await {
        tracing::error!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
