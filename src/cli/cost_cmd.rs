use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::config::AppConfig;
use crate::core::cost::compare_tiers;
use crate::core::cost::log::CostLogStore;
use crate::core::notes;
use crate::core::pipeline::SYSTEM_PROMPT;
use crate::core::storage::LoadState;

pub const DEFAULT_OUTPUT_TOKENS: u64 = 1000;

pub fn summary(config: &AppConfig, opts: &OutputOptions) -> Result<()> {
    let store = CostLogStore::open(config.storage.cost_log.clone())?;
    if let (_, LoadState::Corrupt) = store.load_with_state() {
        eprintln!(
            "Cost log at {} is unreadable; showing empty totals.",
            store.path().display()
        );
    }
    let stats = store.get_stats();

    match opts.format {
        OutputFormat::Json => println!("{}", opts.to_json(&stats)?),
        _ => println!("{}", renderer::render_cost_stats(&stats, store.pricing(), opts.use_color)),
    }
    Ok(())
}

/// The prompt text whose cost is being compared: the system prompt plus
/// either the given text, a note file, or the sample note.
fn comparison_input(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
    let note = match (text, file) {
        (Some(text), _) => notes::note_from_text("inline", &text),
        (None, Some(path)) => notes::load_note_file(&path)
            .with_context(|| format!("Cannot compare costs for {}", path.display()))?,
        (None, None) => notes::sample_note("sample"),
    };
    Ok(format!("{}\n\n{}", SYSTEM_PROMPT, note.to_prompt()))
}

pub fn compare(
    text: Option<String>,
    file: Option<PathBuf>,
    output_tokens: u64,
    opts: &OutputOptions,
) -> Result<()> {
    let input = comparison_input(text, file)?;
    let estimates = compare_tiers(&input, output_tokens);

    match opts.format {
        OutputFormat::Json => println!("{}", opts.to_json(&estimates)?),
        _ => println!("{}", renderer::render_tier_estimates(&estimates, opts.use_color)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_input_prefers_text() {
        let input = comparison_input(Some("rice".into()), Some(PathBuf::from("/nope"))).unwrap();
        assert!(input.starts_with(SYSTEM_PROMPT));
        assert!(input.ends_with("Text content:\nrice"));
    }

    #[test]
    fn comparison_input_defaults_to_sample() {
        let input = comparison_input(None, None).unwrap();
        assert!(input.contains("Organic milk"));
    }

    #[test]
    fn comparison_input_missing_file_is_error() {
        let err = comparison_input(None, Some(PathBuf::from("/no/such/file.txt"))).unwrap_err();
        assert!(err.to_string().contains("Cannot compare costs"));
    }
}
