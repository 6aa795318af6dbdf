//! Table export
//!
//! Writes decoded tables as CSV (one header line, one line per row) or as a
//! single JSON document. Missing cells become empty CSV fields or JSON `null`.

use crate::config::OutputFormat;
use efi_log_decoder::{DecodedTable, FormatDescriptor};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a Path>,
    layout: &'a FormatDescriptor,
    columns: &'a [String],
    rows: Vec<&'a [Option<f32>]>,
}

/// Write `table` in the requested format
pub fn write_table<W: Write>(
    writer: W,
    table: &DecodedTable,
    descriptor: &FormatDescriptor,
    source: Option<&Path>,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Csv => write_csv(writer, table),
        OutputFormat::Json => write_json(writer, table, descriptor, source),
    }
}

pub fn write_csv<W: Write>(mut writer: W, table: &DecodedTable) -> io::Result<()> {
    let header: Vec<String> = table.columns().iter().map(|c| csv_field(c)).collect();
    writeln!(writer, "{}", header.join(","))?;

    for row in table.rows() {
        let mut first = true;
        for cell in row {
            if !first {
                writer.write_all(b",")?;
            }
            first = false;
            if let Some(value) = cell {
                write!(writer, "{}", value)?;
            }
        }
        writer.write_all(b"\n")?;
    }

    writer.flush()
}

pub fn write_json<W: Write>(
    mut writer: W,
    table: &DecodedTable,
    descriptor: &FormatDescriptor,
    source: Option<&Path>,
) -> io::Result<()> {
    let report = JsonReport {
        source,
        layout: descriptor,
        columns: table.columns(),
        rows: table.rows().collect(),
    };

    serde_json::to_writer_pretty(&mut writer, &report)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

/// Quote a CSV field if it contains a separator, quote or line break
fn csv_field(text: &str) -> String {
    if text.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// Output path for `input`: same stem, format extension, placed in
/// `output_dir` when given, otherwise next to the input
pub fn output_path(input: &Path, output_dir: Option<&Path>, format: OutputFormat) -> PathBuf {
    let renamed = input.with_extension(format.extension());
    match (output_dir, renamed.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => renamed,
    }
}
