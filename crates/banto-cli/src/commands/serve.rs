//! Server command implementation

use std::path::Path;

use anyhow::Result;
use banto_server::ServerConfig;

use super::open_db;

pub async fn cmd_serve(db_path: &Path, host: &str, port: u16, no_auth: bool) -> Result<()> {
    println!("🚀 Starting Banto web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);

    let mut config = ServerConfig::from_env();

    if no_auth {
        println!();
        println!("   ⚠️  WARNING: Authentication is DISABLED (--no-auth)");
        println!("   Do not expose this server to a network!");
        config.require_auth = false;
    } else if config.api_keys.is_empty() {
        println!();
        println!("   ❌ No API keys configured.");
        println!("   Set BANTO_API_KEYS (comma-separated) or use --no-auth for local dev.");
        anyhow::bail!("refusing to start with auth enabled and no API keys");
    } else {
        println!("   🔑 API key auth: {} key(s) configured", config.api_keys.len());
    }

    let db = open_db(db_path)?;

    banto_server::serve_with_config(db, host, port, config).await
}
