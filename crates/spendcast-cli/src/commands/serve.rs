//! Server command implementation

use std::path::Path;

use anyhow::Result;
use spendcast_core::config::AppConfig;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    config: AppConfig,
    host: &str,
    port: u16,
    no_auth: bool,
    dev_user: &str,
    no_encrypt: bool,
) -> Result<()> {
    println!("🚀 Starting Spendcast web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}/api", host, port);

    // Parse allowed CORS origins from environment (comma-separated)
    let allowed_origins: Vec<String> = std::env::var("SPENDCAST_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
        println!("   Requests act as user '{}'", dev_user);
    } else {
        println!("   🔒 Authentication: HTTP Basic (spendcast users)");
    }
    if !allowed_origins.is_empty() {
        println!(
            "   🌐 Allowed origins: {} (SPENDCAST_ALLOWED_ORIGINS)",
            allowed_origins.join(", ")
        );
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;
    tracing::info!(
        host = %host,
        port,
        require_auth = !no_auth,
        origins = allowed_origins.len(),
        "Serve command starting"
    );

    let server_config = spendcast_server::ServerConfig {
        require_auth: !no_auth,
        allowed_origins,
        dev_user: dev_user.to_string(),
    };

    spendcast_server::serve_with_config(db, config, host, port, server_config).await?;

    Ok(())
}
