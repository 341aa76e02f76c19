use anyhow::Result;
use std::path::Path;

use crate::cli::output::OutputOptions;
use crate::core::config::AppConfig;

pub fn init(path: &Path, _opts: &OutputOptions) -> Result<()> {
    if path.exists() {
        eprintln!("Config file already exists at {}", path.display());
        eprintln!("Remove it first if you want to regenerate.");
        return Ok(());
    }

    match AppConfig::default().save_to(path) {
        Ok(()) => {
            println!("Generated config at {}", path.display());
            println!("  Set ANTHROPIC_API_KEY or model.api_key before running `notecart process`.");
        }
        Err(e) => {
            eprintln!("Failed to generate config: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

pub fn check(path: &Path, _opts: &OutputOptions) -> Result<()> {
    if !path.exists() {
        eprintln!("No config file found at {}", path.display());
        eprintln!("Run `notecart config init` to create one.");
        return Ok(());
    }

    let config = match AppConfig::load_from(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let issues = config.validate();
    if issues.is_empty() {
        println!("Config is valid: {}", path.display());
        println!("  Model: {}", config.model.model);
        let (max_tokens, temperature) = config.model.generation();
        println!("  Generation: {} max tokens, temperature {}", max_tokens, temperature);
        println!("  Cost log: {}", config.storage.cost_log.display());
        println!("  Item cache: {}", config.storage.item_cache.display());
    } else {
        eprintln!("Config issues found in {}:", path.display());
        for issue in &issues {
            eprintln!("  - {}", issue);
        }
        std::process::exit(1);
    }
    Ok(())
}

pub fn path(path: &Path, _opts: &OutputOptions) -> Result<()> {
    println!("{}", path.display());
    Ok(())
}
