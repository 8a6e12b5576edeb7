// src/cli/fetch.rs
use std::fmt::Write;

use super::CliError;
use crate::templates::definitions::TemplateGridSnapshot;
use crate::templates::sheets_api::{sheet_id_from_input, SheetsClient};

pub async fn run(api_key: String, sheet: &str) -> Result<(), CliError> {
    let spreadsheet_id = sheet_id_from_input(sheet)?;
    let snapshot = SheetsClient::new(api_key).fetch_grid(&spreadsheet_id).await?;
    print!("{}", format_grid(&snapshot));
    Ok(())
}

/// Tab-separated dump with column letters and 1-based row numbers.
pub fn format_grid(snapshot: &TemplateGridSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} / {} ({})", snapshot.title, snapshot.sheet_name, snapshot.spreadsheet_id);
    let _ = writeln!(out, "\t{}", snapshot.headers.join("\t"));
    for (index, row) in snapshot.values.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|v| v.replace(['\n', '\t'], " ")).collect();
        let _ = writeln!(out, "{}\t{}", index + 1, cells.join("\t"));
    }
    out
}
