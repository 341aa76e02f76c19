use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Text,
}

impl OutputFormat {
    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "markdown" | "md" => Some(Self::Markdown),
            "text" | "txt" => Some(Self::Text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub pretty: bool,
    pub use_color: bool,
    pub verbose: bool,
}

impl OutputOptions {
    /// Serialize as JSON, pretty-printed when requested.
    pub fn to_json<T: serde::Serialize + ?Sized>(&self, value: &T) -> serde_json::Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }
}

/// Decide whether to emit ANSI colors.
///
/// `--no-color` and `NO_COLOR` always win; otherwise the `color` setting
/// (auto|always|never) applies, with `auto` meaning "stdout is a terminal".
pub fn detect_color(color_flag: bool, setting: &str) -> bool {
    if !color_flag {
        return false;
    }
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    match setting {
        "always" => true,
        "never" => false,
        _ => std::io::stdout().is_terminal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_id() {
        assert_eq!(OutputFormat::from_id("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_id("Markdown"), Some(OutputFormat::Markdown));
        assert_eq!(OutputFormat::from_id("md"), Some(OutputFormat::Markdown));
        assert_eq!(OutputFormat::from_id("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_id("xml"), None);
    }

    #[test]
    fn no_color_flag_disables_color() {
        assert!(!detect_color(false, "always"));
    }

    #[test]
    fn never_setting_disables_color() {
        assert!(!detect_color(true, "never"));
    }

    #[test]
    fn to_json_respects_pretty() {
        let mut opts = OutputOptions {
            format: OutputFormat::Json,
            pretty: false,
            use_color: false,
            verbose: false,
        };
        let value = serde_json::json!({"a": 1});
        assert_eq!(opts.to_json(&value).unwrap(), r#"{"a":1}"#);
        opts.pretty = true;
        assert!(opts.to_json(&value).unwrap().contains('\n'));
    }
}
