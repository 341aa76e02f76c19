use anyhow::Result;
use serde_json::json;

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::config::AppConfig;
use crate::core::items::ItemCacheStore;
use crate::core::models::shopping::{CachedItem, Priority};
use crate::core::storage::LoadState;

pub struct AddArgs {
    pub name: String,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub estimated_cost: Option<String>,
    pub quantity: Option<String>,
}

fn open_store(config: &AppConfig) -> Result<ItemCacheStore> {
    ItemCacheStore::open(config.storage.item_cache.clone())
}

fn build_item(args: &AddArgs) -> Result<CachedItem> {
    let priority = match args.priority.as_deref() {
        Some(id) => match Priority::from_id(id) {
            Some(p) => Some(p),
            None => anyhow::bail!("Invalid priority '{}' (must be high, medium, or low)", id),
        },
        None => None,
    };
    Ok(CachedItem {
        category: args.category.clone(),
        priority,
        estimated_cost: args.estimated_cost.clone(),
        quantity: args.quantity.clone(),
    })
}

pub fn get(name: &str, config: &AppConfig, opts: &OutputOptions) -> Result<()> {
    let store = open_store(config)?;
    let found = store.get_item(name);

    if matches!(opts.format, OutputFormat::Json) {
        println!("{}", opts.to_json(&json!({ "query": name, "item": found }))?);
        if found.is_none() {
            std::process::exit(1);
        }
        return Ok(());
    }

    match found {
        Some(item) => println!("{}", renderer::render_cached_item(name, &item, opts.use_color)),
        None => {
            eprintln!("No cached item matches '{}'", name);
            std::process::exit(1);
        }
    }
    Ok(())
}

pub fn add(args: AddArgs, config: &AppConfig, _opts: &OutputOptions) -> Result<()> {
    let item = build_item(&args)?;
    let store = open_store(config)?;
    store.add_item(&args.name, item)?;
    println!("Cached item: {}", args.name.to_lowercase());
    Ok(())
}

pub fn list(config: &AppConfig, opts: &OutputOptions) -> Result<()> {
    let store = open_store(config)?;
    let (table, state) = store.load_with_state();
    if state == LoadState::Corrupt {
        eprintln!("Item cache at {} is unreadable; showing nothing.", store.path().display());
    } else if opts.verbose {
        eprintln!("Item cache: {}", store.path().display());
    }
    match opts.format {
        OutputFormat::Json => println!("{}", opts.to_json(&table)?),
        _ => println!("{}", renderer::render_item_table(&table, opts.use_color)),
    }
    Ok(())
}
