//! Output formatting for import reports.
//!
//! Text output is one import per line; JSON variants go through serde.

use crate::{FileImports, PackageReport};
use serde::{Deserialize, Serialize};

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One import per line.
    #[default]
    Text,
    /// A single JSON document.
    Json,
    /// JSON Lines (one value per line, arrays emit each element).
    #[serde(rename = "jsonl")]
    JsonLines,
}

impl OutputFormat {
    /// Resolve from CLI flags, falling back to the configured format.
    pub fn from_cli(json: bool, jsonl: bool, configured: Option<OutputFormat>) -> Self {
        if jsonl {
            return OutputFormat::JsonLines;
        }
        if json {
            return OutputFormat::Json;
        }
        configured.unwrap_or_default()
    }
}

/// Types that can be printed as text or JSON.
pub trait OutputFormatter: Serialize {
    /// Format as text. Empty output prints nothing.
    fn format_text(&self) -> String;

    /// Value emitted in JSON Lines mode. Defaults to the whole document.
    fn jsonl_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Render in `format`, without a trailing newline.
    fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => self.format_text(),
            OutputFormat::Json => serde_json::to_string(self).unwrap_or_default(),
            OutputFormat::JsonLines => jsonl_lines(&self.jsonl_value()).join("\n"),
        }
    }

    /// Print to stdout in `format`.
    fn print(&self, format: OutputFormat) {
        let rendered = self.render(format);
        if !rendered.is_empty() {
            println!("{}", rendered);
        }
    }
}

/// Arrays emit each element as a separate line, other values a single line.
fn jsonl_lines(value: &serde_json::Value) -> Vec<String> {
    if let serde_json::Value::Array(arr) = value {
        arr.iter()
            .map(|item| serde_json::to_string(item).unwrap_or_default())
            .collect()
    } else {
        vec![serde_json::to_string(value).unwrap_or_default()]
    }
}

impl OutputFormatter for PackageReport {
    fn format_text(&self) -> String {
        self.imports
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn jsonl_value(&self) -> serde_json::Value {
        serde_json::to_value(&self.imports).unwrap_or_default()
    }
}

impl OutputFormatter for FileImports {
    fn format_text(&self) -> String {
        self.imports.join("\n")
    }

    fn jsonl_value(&self) -> serde_json::Value {
        serde_json::to_value(&self.imports).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImportSet;
    use std::path::PathBuf;

    fn report() -> PackageReport {
        PackageReport {
            package: "example.com/app".to_string(),
            directory: PathBuf::from("/go/src/example.com/app"),
            files: 2,
            imports: ImportSet::from(["os".to_string(), "encoding/json".to_string()]),
        }
    }

    #[test]
    fn test_from_cli() {
        assert_eq!(OutputFormat::from_cli(false, false, None), OutputFormat::Text);
        assert_eq!(
            OutputFormat::from_cli(false, false, Some(OutputFormat::Json)),
            OutputFormat::Json
        );
        assert_eq!(
            OutputFormat::from_cli(true, false, Some(OutputFormat::JsonLines)),
            OutputFormat::Json
        );
        assert_eq!(OutputFormat::from_cli(true, true, None), OutputFormat::JsonLines);
    }

    #[test]
    fn test_text_is_one_per_line() {
        assert_eq!(report().render(OutputFormat::Text), "encoding/json\nos");
    }

    #[test]
    fn test_json_report() {
        let value: serde_json::Value =
            serde_json::from_str(&report().render(OutputFormat::Json)).unwrap();
        assert_eq!(value["package"], "example.com/app");
        assert_eq!(value["files"], 2);
        assert_eq!(value["imports"], serde_json::json!(["encoding/json", "os"]));
    }

    #[test]
    fn test_jsonl_one_import_per_line() {
        assert_eq!(
            report().render(OutputFormat::JsonLines),
            "\"encoding/json\"\n\"os\""
        );
    }

    #[test]
    fn test_file_imports_text_keeps_duplicates() {
        let file = FileImports {
            file: PathBuf::from("a.go"),
            imports: vec!["z".to_string(), "a".to_string(), "z".to_string()],
        };
        assert_eq!(file.render(OutputFormat::Text), "z\na\nz");
    }
}
