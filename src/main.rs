use std::process::ExitCode;

use tracing::{error, info};

use meteorz::{Config, ScriptStorage, WebServer};

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let mut config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    if let Err(e) = config.apply_env_overrides().and_then(|()| config.validate()) {
        eprintln!("Invalid configuration: {e}");
        return ExitCode::FAILURE;
    }

    // Initialize logging
    if let Err(e) = meteorz::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        meteorz::logging::init_console_only(&config.logging.level);
    }

    info!("Meteorz Script Library");

    // The server never starts without a usable storage directory.
    let storage = match ScriptStorage::open(&config.files.storage_path) {
        Ok(storage) => storage,
        Err(e) => {
            error!(
                "Cannot use storage directory {}: {}",
                config.files.storage_path, e
            );
            return ExitCode::FAILURE;
        }
    };
    info!("Storing scripts in {}", storage.base_path().display());

    let server = match WebServer::new(&config, storage) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match server.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
