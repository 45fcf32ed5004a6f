mod cli;

use signage::{config, seed, server};
use signage_db::pool::{get_conn, init_pool};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting signage server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    server::start_server(config).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "signage=trace,signage_db=debug,tower_http=debug".to_string()
        } else {
            "signage=info,signage_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Import { file } => import_seed(&file, cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("signage {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn import_seed(file: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    if !file.exists() {
        anyhow::bail!("Seed file does not exist: {:?}", file);
    }

    let db_path = config.server.database.to_string_lossy();
    tracing::info!("Importing {:?} into {}", file, db_path);
    let pool = init_pool(&db_path).with_context(|| format!("Failed to open database {}", db_path))?;
    let mut conn = get_conn(&pool)?;

    let summary = seed::import_file(&mut conn, file)?;

    println!(
        "Imported {} assets, {} playlists ({} items), {} screens",
        summary.assets,
        summary.playlists,
        summary.items,
        summary.screens.len()
    );
    for screen in &summary.screens {
        println!(
            "  {} -> {}/{}",
            screen.name, config.player.screen_path, screen.token
        );
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Database: {:?}", config.server.database);
            println!("  Screens: {}/<token>", config.player.screen_path);
            println!("  Playlists: {}/<id>", config.player.playlist_path);
            println!("  Asset content: {}/<id>/content", config.player.asset_path);
            match &config.templates.dir {
                Some(dir) => println!("  Templates: {:?}", dir),
                None => println!("  Templates: none"),
            }
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
        }
    }

    Ok(())
}
