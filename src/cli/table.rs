//! List output in the tabular formats (table, tsv, csv, md, id)
//!
//! Structured formats (json, yaml) are serialized by the commands
//! themselves from the records; this module only handles row-oriented text.

use console::style;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::OutputFormat;

/// Column definition with header and display width cap
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    /// Maximum characters shown in table output; 0 means unlimited
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A record rendered as strings, keyed by column
#[derive(Debug, Clone)]
pub struct TableRow {
    /// Value printed by `--format id`
    pub id: String,
    pub cells: Vec<String>,
}

impl TableRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, value: impl Into<String>) -> Self {
        self.cells.push(value.into());
        self
    }
}

/// Formats rows for one kind of record
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    record_name: &'static str,
    show_summary: bool,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], record_name: &'static str) -> Self {
        Self {
            columns,
            record_name,
            show_summary: true,
        }
    }

    /// Suppress the trailing "N record(s)" line
    pub fn without_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }

    /// Render rows; `Json`/`Yaml` fall back to the table
    pub fn render(&self, rows: &[TableRow], format: OutputFormat) -> String {
        match format {
            OutputFormat::Tsv => self.render_tsv(rows),
            OutputFormat::Csv => self.render_csv(rows),
            OutputFormat::Md => self.render_md(rows),
            OutputFormat::Id => rows.iter().map(|r| format!("{}\n", r.id)).collect(),
            OutputFormat::Auto | OutputFormat::Json | OutputFormat::Yaml => self.render_table(rows),
        }
    }

    pub fn print(&self, rows: &[TableRow], format: OutputFormat) {
        print!("{}", self.render(rows, format));
    }

    fn builder(&self, rows: &[TableRow], header: impl Fn(&ColumnDef) -> String, cell: impl Fn(&ColumnDef, &str) -> String) -> Builder {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().map(&header));
        for row in rows {
            builder.push_record(
                self.columns
                    .iter()
                    .zip(row.cells.iter())
                    .map(|(col, value)| cell(col, value)),
            );
        }
        builder
    }

    fn render_table(&self, rows: &[TableRow]) -> String {
        let table = self
            .builder(
                rows,
                |col| col.header.to_string(),
                |col, value| {
                    if col.width == 0 {
                        value.to_string()
                    } else {
                        truncate_str(value, col.width)
                    }
                },
            )
            .build()
            .with(Style::sharp())
            .to_string();

        let mut out = format!("{}\n", table);
        if self.show_summary {
            out.push_str(&format!(
                "\n{} {}(s) found.\n",
                style(rows.len()).cyan(),
                self.record_name
            ));
        }
        out
    }

    fn render_tsv(&self, rows: &[TableRow]) -> String {
        let mut out = String::new();
        let headers: Vec<&str> = self.columns.iter().map(|c| c.key).collect();
        out.push_str(&headers.join("\t"));
        out.push('\n');
        for row in rows {
            let cells: Vec<String> = row
                .cells
                .iter()
                .map(|c| c.replace(['\t', '\n'], " "))
                .collect();
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }
        out
    }

    fn render_csv(&self, rows: &[TableRow]) -> String {
        let mut out = String::new();
        let headers: Vec<&str> = self.columns.iter().map(|c| c.key).collect();
        out.push_str(&headers.join(","));
        out.push('\n');
        for row in rows {
            let cells: Vec<String> = row.cells.iter().map(|c| escape_csv(c)).collect();
            out.push_str(&cells.join(","));
            out.push('\n');
        }
        out
    }

    fn render_md(&self, rows: &[TableRow]) -> String {
        let table = self
            .builder(
                rows,
                |col| col.header.to_string(),
                |_, value| value.replace('|', "\\|"),
            )
            .build()
            .with(Style::markdown())
            .to_string();
        format!("{}\n", table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("id", "ID", 0),
        ColumnDef::new("name", "NAME", 8),
    ];

    fn rows() -> Vec<TableRow> {
        vec![
            TableRow::new("PROJ-1").cell("PROJ-1").cell("GRI, 2021 edition"),
            TableRow::new("PROJ-2").cell("PROJ-2").cell("SASB"),
        ]
    }

    #[test]
    fn test_csv_escapes_cells() {
        let out = TableFormatter::new(COLUMNS, "project").render(&rows(), OutputFormat::Csv);
        assert_eq!(out, "id,name\nPROJ-1,\"GRI, 2021 edition\"\nPROJ-2,SASB\n");
    }

    #[test]
    fn test_tsv_uses_keys() {
        let out = TableFormatter::new(COLUMNS, "project").render(&rows(), OutputFormat::Tsv);
        assert!(out.starts_with("id\tname\n"));
        assert!(out.contains("PROJ-2\tSASB\n"));
    }

    #[test]
    fn test_id_format() {
        let out = TableFormatter::new(COLUMNS, "project").render(&rows(), OutputFormat::Id);
        assert_eq!(out, "PROJ-1\nPROJ-2\n");
    }

    #[test]
    fn test_table_truncates_and_counts() {
        let out = TableFormatter::new(COLUMNS, "project").render(&rows(), OutputFormat::Auto);
        assert!(out.contains("GRI, ..."));
        assert!(out.contains("project(s) found."));

        let quiet = TableFormatter::new(COLUMNS, "project")
            .without_summary()
            .render(&rows(), OutputFormat::Auto);
        assert!(!quiet.contains("found."));
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        let rows = vec![TableRow::new("x").cell("x").cell("a|b")];
        let out = TableFormatter::new(COLUMNS, "project").render(&rows, OutputFormat::Md);
        assert!(out.contains("a\\|b"));
    }
}
