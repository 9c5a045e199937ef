// ─────────────────────────────────────────────────────────────────────────────
//  Address Graph — Transaction Graph Service
//
//  Builds a bounded breadth-first graph of addresses and the transactions
//  between them around a seed address, served as JSON for the graph viewer.
// ─────────────────────────────────────────────────────────────────────────────

use address_graph::engine::GraphServer;
use address_graph::error::Result;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "address-graph", version, about = "Serve address/transaction graphs built from Blockscout")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, env = "ADDRESS_GRAPH_CONFIG", default_value = "Config.toml")]
    config: String,
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    GraphServer::run(&cli.config).await?;
    Ok(())
}
