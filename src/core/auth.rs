use anyhow::Result;

use crate::core::config::ModelConfig;

/// Environment variables checked for an API key, in order.
const API_KEY_VARS: &[&str] = &["ANTHROPIC_API_KEY", "CLAUDE_API_KEY"];

/// Value shipped in sample configs; treated as unset.
const PLACEHOLDER_KEY: &str = "your-claude-api-key-here";

fn usable(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && k != PLACEHOLDER_KEY)
}

/// Resolve the API key from the environment, then the config file.
pub fn resolve_api_key(config: &ModelConfig) -> Result<String> {
    resolve_api_key_with(config, |name| std::env::var(name).ok())
}

fn resolve_api_key_with<F>(config: &ModelConfig, env: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    for var in API_KEY_VARS {
        if let Some(key) = usable(env(var)) {
            tracing::debug!(source = *var, "using API key from environment");
            return Ok(key);
        }
    }
    if let Some(key) = usable(config.api_key.clone()) {
        tracing::debug!("using API key from config file");
        return Ok(key);
    }
    anyhow::bail!(
        "API key not found. Set ANTHROPIC_API_KEY (or CLAUDE_API_KEY) or model.api_key in the config file"
    )
}
