use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::core::auth::resolve_api_key;
use crate::core::config::AppConfig;
use crate::core::cost::log::CostLogStore;
use crate::core::formatter::{format_cost, format_markdown, format_text};
use crate::core::items::ItemCacheStore;
use crate::core::models::note::NoteContent;
use crate::core::models::shopping::ShoppingReport;
use crate::core::notes;
use crate::core::pipeline::{save_output, ShoppingListProcessor};
use crate::core::providers::claude::ClaudeBackend;

/// Where the note to process comes from.
#[derive(Debug, Clone)]
pub enum NoteSource {
    File(PathBuf),
    Text(String),
    Sample,
}

pub struct ProcessArgs {
    pub source: NoteSource,
    pub note_id: Option<String>,
    pub output_format: Option<OutputFormat>,
    pub no_save: bool,
}

fn load_note(source: &NoteSource, note_id: Option<&str>) -> Result<NoteContent> {
    let mut note = match source {
        NoteSource::File(path) => notes::load_note_file(path)?,
        NoteSource::Text(text) => notes::note_from_text("inline", text),
        NoteSource::Sample => notes::sample_note("sample"),
    };
    if let Some(id) = note_id {
        note.id = id.to_string();
    }
    Ok(note)
}

fn render_report(report: &ShoppingReport, format: OutputFormat) -> Result<String> {
    Ok(match format {
        // Reports are always indented, `--pretty` or not
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize report")?
        }
        OutputFormat::Markdown => format_markdown(&report.list),
        OutputFormat::Text => format_text(&report.list),
    })
}

pub async fn run(args: ProcessArgs, config: &AppConfig, opts: &OutputOptions) -> Result<()> {
    let note = load_note(&args.source, args.note_id.as_deref())?;

    let api_key = resolve_api_key(&config.model)?;
    let backend = ClaudeBackend::new(api_key, &config.model)?;
    let costs = CostLogStore::open(config.storage.cost_log.clone())?;
    let items = ItemCacheStore::open(config.storage.item_cache.clone())?;
    let processor = ShoppingListProcessor::new(backend, costs, items);

    let save = config.output.save_to_file && !args.no_save;
    let format = args.output_format.unwrap_or(opts.format);

    match processor.process_note(&note).await {
        Ok(report) => {
            if save {
                let path = save_output(&report, &config.output.output_directory, &note.id)?;
                eprintln!("Saved to {}", path.display());
            }
            println!("{}", render_report(&report, format)?);
            if opts.verbose {
                let stats = processor.costs().get_stats();
                eprintln!(
                    "Lifetime cost: {} over {} calls; {} items cached",
                    format_cost(stats.total_cost),
                    stats.total_calls,
                    processor.items().load().len()
                );
            }
        }
        Err(e) => {
            let document = e.to_json();
            if save {
                if let Err(save_err) =
                    save_output(&document, &config.output.output_directory, &note.id)
                {
                    tracing::warn!(error = %format!("{:#}", save_err), "failed to save error document");
                }
            }
            println!("{}", opts.to_json(&document)?);
            std::process::exit(1);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::shopping::{Priority, ReportMetadata, ShoppingItem, ShoppingList};

    fn report() -> ShoppingReport {
        ShoppingReport {
            list: ShoppingList {
                shopping_list: vec![ShoppingItem {
                    item: "milk".into(),
                    category: Some("dairy".into()),
                    priority: Some(Priority::High),
                    estimated_cost: Some("$3.99".into()),
                    ..ShoppingItem::default()
                }],
                total_estimated_cost: Some("$3.99".into()),
                ..ShoppingList::default()
            },
            timing: None,
            metadata: ReportMetadata {
                source_note_id: "n".into(),
                processed_at: "2025-01-15T10:30:00.000000".into(),
                model: "claude-test".into(),
                version: "0.1.0".into(),
            },
        }
    }

    #[test]
    fn inline_text_note_with_id_override() {
        let source = NoteSource::Text("eggs and rice".into());
        let note = load_note(&source, Some("weekly")).unwrap();
        assert_eq!(note.id, "weekly");
        assert_eq!(note.text, "eggs and rice");
    }

    #[test]
    fn sample_note_default_id() {
        let note = load_note(&NoteSource::Sample, None).unwrap();
        assert_eq!(note.id, "sample");
    }

    #[test]
    fn missing_file_source_fails() {
        let source = NoteSource::File(PathBuf::from("/no/such/note.txt"));
        assert!(load_note(&source, None).is_err());
    }

    #[test]
    fn json_report_is_indented_with_metadata() {
        let out = render_report(&report(), OutputFormat::Json).unwrap();
        assert!(out.contains('\n'));
        let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(doc["metadata"]["model"], "claude-test");
        assert_eq!(doc["shopping_list"][0]["item"], "milk");
    }

    #[test]
    fn markdown_and_text_reports() {
        let md = render_report(&report(), OutputFormat::Markdown).unwrap();
        assert!(md.contains("## Dairy"));
        let text = render_report(&report(), OutputFormat::Text).unwrap();
        assert!(text.contains("[ ] milk (high) - $3.99"));
    }
}
