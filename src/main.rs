use backup_mcp::config::Cli;
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = backup_mcp::mcp::server::run_stdio(cli).await {
        eprintln!("backup-mcp: {}", err);
        std::process::exit(1);
    }
}
