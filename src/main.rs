// Miniterm - Serial console bridge for embedded targets
use clap::Parser;
use miniterm::cli::{execute, Args};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = execute(args).await {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}
