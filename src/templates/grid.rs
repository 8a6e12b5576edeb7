// src/templates/grid.rs
//! Shaping of fetched template grids for display and mapping.

use super::definitions::{column_letter, CellFormat, TemplateGridSnapshot};

pub const DEFAULT_ROW_HEIGHT: f32 = 21.0;
const MIN_COLUMN_WIDTH: f32 = 60.0;
const MAX_COLUMN_WIDTH: f32 = 300.0;
const CHAR_WIDTH: f32 = 7.0;
const CELL_PADDING: f32 = 16.0;

/// Largest template grid loaded from the service.
pub const MAX_TEMPLATE_ROWS: usize = 1000;
pub const MAX_TEMPLATE_COLUMNS: usize = 200;

/// Pads every row with empty strings up to the widest row.
pub fn normalize_rows(mut rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, String::new());
    }
    rows
}

/// Pads or trims formatting rows to the given grid shape.
pub fn normalize_formats(mut formats: Vec<Vec<CellFormat>>, rows: usize, cols: usize) -> Vec<Vec<CellFormat>> {
    formats.resize_with(rows, Vec::new);
    for row in &mut formats {
        row.resize_with(cols, CellFormat::default);
    }
    formats
}

pub fn column_headers(count: usize) -> Vec<String> {
    (0..count).map(column_letter).collect()
}

/// Builds a snapshot from raw values; formats/sizes may be filled in later.
pub fn build_snapshot(
    spreadsheet_id: &str,
    title: &str,
    sheet_name: &str,
    values: Vec<Vec<String>>,
) -> TemplateGridSnapshot {
    let values = normalize_rows(values);
    let cols = values.first().map_or(0, Vec::len);
    TemplateGridSnapshot {
        spreadsheet_id: spreadsheet_id.to_string(),
        title: title.to_string(),
        sheet_name: sheet_name.to_string(),
        headers: column_headers(cols),
        values,
        formats: Vec::new(),
        column_widths: Vec::new(),
        row_heights: Vec::new(),
    }
}

/// Clamps service-reported sheet dimensions to the loadable maximum.
pub fn capped_dimensions(rows: usize, cols: usize) -> (usize, usize) {
    (rows.clamp(1, MAX_TEMPLATE_ROWS), cols.clamp(1, MAX_TEMPLATE_COLUMNS))
}

/// Grows a snapshot to at least `rows` x `cols`, filling blank cells.
///
/// The values endpoint drops trailing empty rows and columns, so blank
/// target cells at the sheet edge only exist after padding. Never shrinks.
pub fn pad_snapshot(snapshot: &mut TemplateGridSnapshot, rows: usize, cols: usize) {
    let rows = rows.max(snapshot.row_count());
    let cols = cols.max(snapshot.column_count());
    snapshot.values.resize_with(rows, Vec::new);
    for row in &mut snapshot.values {
        row.resize(cols, String::new());
    }
    if !snapshot.formats.is_empty() {
        snapshot.formats = normalize_formats(std::mem::take(&mut snapshot.formats), rows, cols);
    }
    snapshot.headers = column_headers(cols);
    if snapshot.column_widths.len() < cols {
        snapshot.column_widths.resize(cols, None);
    }
    if snapshot.row_heights.len() < rows {
        snapshot.row_heights.resize(rows, None);
    }
}

/// Service-reported width, else a content-length estimate.
pub fn display_column_width(snapshot: &TemplateGridSnapshot, col: usize) -> f32 {
    if let Some(Some(px)) = snapshot.column_widths.get(col) {
        if *px > 0.0 {
            return *px;
        }
    }
    let max_chars = snapshot
        .values
        .iter()
        .filter_map(|row| row.get(col))
        .flat_map(|value| value.lines().map(|l| l.chars().count()))
        .chain(snapshot.headers.get(col).map(|h| h.chars().count()))
        .max()
        .unwrap_or(0);
    (max_chars as f32 * CHAR_WIDTH + CELL_PADDING).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
}

pub fn display_row_height(snapshot: &TemplateGridSnapshot, row: usize) -> f32 {
    match snapshot.row_heights.get(row) {
        Some(Some(px)) if *px > 0.0 => *px,
        _ => DEFAULT_ROW_HEIGHT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::definitions::CellCoordinate;

    fn strings(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_normalize_rows_pads_to_widest() {
        let rows = normalize_rows(strings(&[&["a"], &["b", "c", "d"], &[]]));
        assert!(rows.iter().all(|r| r.len() == 3));
        assert_eq!(rows[0], vec!["a", "", ""]);
        assert_eq!(rows[2], vec!["", "", ""]);
        assert!(normalize_rows(Vec::new()).is_empty());
    }

    #[test]
    fn test_build_snapshot_headers() {
        let snapshot = build_snapshot("id", "Title", "Sheet1", strings(&[&["x", "y"], &["z"]]));
        assert_eq!(snapshot.headers, vec!["A", "B"]);
        assert_eq!(snapshot.row_count(), 2);
        assert_eq!(snapshot.column_count(), 2);
        assert_eq!(snapshot.values[1][1], "");
    }

    #[test]
    fn test_display_sizes_fall_back() {
        let long = "x".repeat(100);
        let mut snapshot = build_snapshot("id", "T", "S", strings(&[&["short", long.as_str()]]));
        assert_eq!(display_column_width(&snapshot, 0), MIN_COLUMN_WIDTH);
        assert_eq!(display_column_width(&snapshot, 1), 300.0);
        assert_eq!(display_row_height(&snapshot, 0), DEFAULT_ROW_HEIGHT);
        assert_eq!(display_column_width(&snapshot, 7), MIN_COLUMN_WIDTH);

        snapshot.column_widths = vec![Some(150.0), Some(0.0)];
        snapshot.row_heights = vec![Some(40.0)];
        assert_eq!(display_column_width(&snapshot, 0), 150.0);
        assert_eq!(display_column_width(&snapshot, 1), 300.0);
        assert_eq!(display_row_height(&snapshot, 0), 40.0);
    }

    #[test]
    fn test_pad_snapshot_adds_trailing_blank_cells() {
        let mut snapshot = build_snapshot("id", "T", "S", strings(&[&["Hours:"]]));
        assert!(!snapshot.contains(CellCoordinate::new(0, 1)));

        pad_snapshot(&mut snapshot, 10, 5);
        assert_eq!(snapshot.row_count(), 10);
        assert_eq!(snapshot.column_count(), 5);
        assert!(snapshot.contains(CellCoordinate::new(0, 1)));
        assert!(snapshot.contains(CellCoordinate::new(9, 4)));
        assert_eq!(snapshot.values[0][0], "Hours:");
        assert_eq!(snapshot.values[9][4], "");
        assert_eq!(snapshot.headers, vec!["A", "B", "C", "D", "E"]);
        assert_eq!(snapshot.row_heights.len(), 10);
        assert_eq!(display_row_height(&snapshot, 9), DEFAULT_ROW_HEIGHT);
    }

    #[test]
    fn test_pad_snapshot_never_shrinks() {
        let mut snapshot = build_snapshot("id", "T", "S", strings(&[&["a", "b", "c"], &["d"]]));
        snapshot.formats = normalize_formats(Vec::new(), 2, 3);
        pad_snapshot(&mut snapshot, 1, 1);
        assert_eq!(snapshot.row_count(), 2);
        assert_eq!(snapshot.column_count(), 3);
        assert_eq!(snapshot.formats.len(), 2);
        assert!(snapshot.formats.iter().all(|r| r.len() == 3));
    }

    #[test]
    fn test_capped_dimensions() {
        assert_eq!(capped_dimensions(1000, 26), (1000, 26));
        assert_eq!(capped_dimensions(50_000, 18_278), (MAX_TEMPLATE_ROWS, MAX_TEMPLATE_COLUMNS));
        assert_eq!(capped_dimensions(0, 0), (1, 1));
    }

    #[test]
    fn test_normalize_formats_shape() {
        let formats = normalize_formats(vec![vec![CellFormat::default(); 5]], 2, 3);
        assert_eq!(formats.len(), 2);
        assert!(formats.iter().all(|r| r.len() == 3));
    }
}
