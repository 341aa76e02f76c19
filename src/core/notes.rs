use anyhow::{Context, Result};
use std::path::Path;

use crate::core::models::note::NoteContent;

const SAMPLE_NOTE_TEXT: &str = "Need to get:
- Organic milk (2%)
- Whole grain bread
- Free-range eggs (dozen)
- Bananas
- Greek yogurt
- Olive oil (extra virgin)
- Paper towels
- Dish soap
- Light bulbs (LED, 60W equivalent)";

fn now_iso() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// URLs mentioned in free text, in order of appearance, without duplicates.
fn extract_links(text: &str) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        let word = word.trim_start_matches(|c: char| matches!(c, '(' | '<' | '"'));
        if !(word.starts_with("https://") || word.starts_with("http://")) {
            continue;
        }
        let link = word.trim_end_matches(|c: char| matches!(c, '.' | ',' | ')' | ';' | '!' | '?'));
        if !links.iter().any(|l| l == link) {
            links.push(link.to_string());
        }
    }
    links
}

/// Build a note from plain text. The title is the first non-empty line.
pub fn note_from_text(id: &str, text: &str) -> NoteContent {
    let title = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(|l| l.trim_start_matches('#').trim().to_string());
    let now = now_iso();
    NoteContent {
        id: id.to_string(),
        title,
        text: text.to_string(),
        images: Vec::new(),
        links: extract_links(text),
        created_date: Some(now.clone()),
        modified_date: Some(now),
    }
}

/// Load a note from disk.
///
/// `.json` files are read as a full `NoteContent`; anything else is treated
/// as plain text with the file stem as the note id.
pub fn load_note_file(path: &Path) -> Result<NoteContent> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read note {}", path.display()))?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("note")
        .to_string();

    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        let mut note: NoteContent = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse note JSON {}", path.display()))?;
        if note.id == "unknown" {
            note.id = stem;
        }
        return Ok(note);
    }

    Ok(note_from_text(&stem, &content))
}

/// A built-in grocery note for trying the pipeline without a note source.
pub fn sample_note(id: &str) -> NoteContent {
    let mut note = note_from_text(id, SAMPLE_NOTE_TEXT);
    note.title = Some("Shopping List".to_string());
    note
}
