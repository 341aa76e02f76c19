use serde::{Deserialize, Serialize};

/// A note as handed to the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteContent {
    #[serde(default = "default_note_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: String,
    /// Image references (paths or URLs). Only their count reaches the prompt.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub modified_date: Option<String>,
}

fn default_note_id() -> String {
    "unknown".to_string()
}

impl NoteContent {
    /// Render the note as the user message sent to the model.
    pub fn to_prompt(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if !self.text.is_empty() {
            parts.push(format!("Text content:\n{}", self.text));
        }

        if !self.images.is_empty() {
            parts.push(format!("Contains {} images", self.images.len()));
        }

        if !self.links.is_empty() {
            parts.push("Links found:".to_string());
            for link in &self.links {
                parts.push(format!("- {}", link));
            }
        }

        parts.join("\n\n")
    }
}
