//! Validate configuration command.

use anyhow::Result;
use signal_config::load_config;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match load_config(config_path) {
        Ok(config) => {
            if let Err(e) = config.engine.validate() {
                println!("Configuration error: {}", e);
                return Err(e.into());
            }
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Retention: {}h", config.engine.window.retention_hours);
            println!(
                "Entry interval: {}m",
                config.engine.entry.interval_minutes
            );
            println!(
                "Price change threshold: {}%",
                config.engine.entry.price_change_threshold
            );
            println!(
                "Min holding time: {}m",
                config.engine.exit.min_holding_minutes
            );
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
