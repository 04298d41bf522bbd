//! Output formatting for command results.
//!
//! `--output` picks the shape: a rounded table, pretty or compact JSON,
//! YAML, or plain lines for scripts. Health labels are colored only when
//! `--color` allows it.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};

/// Output settings resolved once from the global flags.
#[derive(Debug, Clone)]
pub struct Printer {
    format: OutputFormat,
    color: bool,
    quiet: bool,
}

impl Printer {
    pub fn new(global: &GlobalOpts) -> Self {
        Self {
            format: global.output.clone(),
            color: should_color(&global.color),
            quiet: global.quiet,
        }
    }

    /// Green when healthy, red otherwise.
    pub fn badge(&self, label: &str, healthy: bool) -> String {
        match (self.color, healthy) {
            (false, _) => label.to_owned(),
            (true, true) => label.green().bold().to_string(),
            (true, false) => label.red().bold().to_string(),
        }
    }

    /// A collection: one table row or one plain line per item.
    pub fn list<T, R>(
        &self,
        items: &[T],
        row: impl Fn(&T) -> R,
        line: impl Fn(&T) -> String,
    ) -> String
    where
        T: Serialize,
        R: Tabled,
    {
        if let Some(out) = self.structured(items) {
            return out;
        }
        match self.format {
            OutputFormat::Plain => items.iter().map(line).collect::<Vec<_>>().join("\n"),
            _ => table(items.iter().map(row)),
        }
    }

    /// A single document that brings its own table and plain views.
    pub fn document<T: Serialize>(
        &self,
        data: &T,
        table_view: impl FnOnce(&T) -> String,
        plain_view: impl FnOnce(&T) -> String,
    ) -> String {
        if let Some(out) = self.structured(data) {
            return out;
        }
        match self.format {
            OutputFormat::Plain => plain_view(data),
            _ => table_view(data),
        }
    }

    /// Write to stdout unless `--quiet`.
    pub fn emit(&self, output: &str) {
        if self.quiet || output.is_empty() {
            return;
        }
        let _ = writeln!(io::stdout().lock(), "{output}");
    }

    /// JSON or YAML rendering; `None` for the human formats.
    fn structured<T: Serialize + ?Sized>(&self, data: &T) -> Option<String> {
        let rendered = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(data).map_err(|e| e.to_string()),
            OutputFormat::JsonCompact => serde_json::to_string(data).map_err(|e| e.to_string()),
            OutputFormat::Yaml => serde_yaml::to_string(data).map_err(|e| e.to_string()),
            OutputFormat::Table | OutputFormat::Plain => return None,
        };
        Some(rendered.unwrap_or_else(|e| format!("serialization failed: {e}")))
    }
}

pub fn table<R: Tabled>(rows: impl IntoIterator<Item = R>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Item {
        id: &'static str,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "ID")]
        id: &'static str,
    }

    fn printer(format: OutputFormat) -> Printer {
        Printer {
            format,
            color: false,
            quiet: false,
        }
    }

    fn items() -> [Item; 2] {
        [Item { id: "a" }, Item { id: "b" }]
    }

    #[test]
    fn plain_list_is_one_line_per_item() {
        let out = printer(OutputFormat::Plain).list(&items(), |i| Row { id: i.id }, |i| i.id.into());
        assert_eq!(out, "a\nb");
    }

    #[test]
    fn table_list_has_header_and_rows() {
        let out = printer(OutputFormat::Table).list(&items(), |i| Row { id: i.id }, |i| i.id.into());
        assert!(out.contains("ID"));
        assert!(out.contains('a') && out.contains('b'));
    }

    #[test]
    fn compact_json_skips_table_view() {
        let out = printer(OutputFormat::JsonCompact).document(
            &Item { id: "a" },
            |_| "table".into(),
            |_| "plain".into(),
        );
        assert_eq!(out, r#"{"id":"a"}"#);
    }

    #[test]
    fn badge_is_plain_without_color() {
        assert_eq!(printer(OutputFormat::Table).badge("ONLINE", true), "ONLINE");
    }
}
