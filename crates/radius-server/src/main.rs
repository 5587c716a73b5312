use clap::Parser;
use radius_server::{Config, RadiusServer, ServerConfig, SimpleAuthHandler};
use std::process;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// RADIUS Server - RFC 2865 RADIUS Authentication Server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "radius-server")]
struct Cli {
    /// Path to configuration file
    #[arg(value_name = "CONFIG", default_value = "config.json")]
    config_path: String,

    /// Validate configuration and exit (doesn't start server)
    #[arg(short, long)]
    validate: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load or create configuration (without logging first)
    let loaded = if cli.validate {
        Config::from_file(&cli.config_path).map(Some)
    } else {
        Config::load_or_bootstrap(&cli.config_path)
    };

    let config = match loaded {
        Ok(Some(cfg)) => cfg,
        Ok(None) => {
            tracing_subscriber::registry()
                .with(EnvFilter::new("info"))
                .with(tracing_subscriber::fmt::layer())
                .init();

            warn!("No config file found at: {}", cli.config_path);
            info!("Created example configuration at: {}", cli.config_path);
            info!("Please edit {} and restart the server", cli.config_path);
            process::exit(0);
        }
        Err(e) => {
            if cli.validate {
                eprintln!("Configuration validation failed!");
                eprintln!("   Error: {}", e);
                process::exit(1);
            }

            tracing_subscriber::registry()
                .with(EnvFilter::new("info"))
                .with(tracing_subscriber::fmt::layer())
                .init();

            error!(error = %e, "Could not load config file from: {}", cli.config_path);
            process::exit(1);
        }
    };

    if cli.validate {
        println!("Configuration validated successfully!");
        println!();
        println!("Configuration summary:");
        println!("  Listen: {}:{}", config.listen_address, config.listen_port);
        println!("  Users: {}", config.users.len());
        println!(
            "  Log level: {}",
            config.log_level.as_deref().unwrap_or("info")
        );
        match config.max_concurrent_requests {
            Some(limit) => println!("  Max concurrent requests: {}", limit),
            None => println!("  Max concurrent requests: unbounded"),
        }
        process::exit(0);
    }

    // RUST_LOG takes precedence over the configured level
    let log_level = config.log_level.as_deref().unwrap_or("info");
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("RADIUS Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded configuration from: {}", cli.config_path);

    let mut auth_handler = SimpleAuthHandler::new();
    for user in &config.users {
        auth_handler.add_user(&user.username, &user.password);
        info!(username = %user.username, "Added user");
    }
    if config.users.is_empty() {
        warn!("No users configured, every Access-Request will be rejected");
    }

    let server_config = match ServerConfig::from_config(&config, Arc::new(auth_handler)) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    let server = match RadiusServer::new(server_config).await {
        Ok(srv) => srv,
        Err(e) => {
            error!("Failed to create server: {}", e);
            process::exit(1);
        }
    };

    info!("Server started successfully, press Ctrl+C to stop");

    if let Err(e) = server.run().await {
        error!("Server error: {}", e);
        process::exit(1);
    }
}
