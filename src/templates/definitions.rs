// src/templates/definitions.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use super::field_catalog::FieldId;

/// Target cell of a mapping, 0-based and relative to the template's top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoordinate {
    pub row: usize,
    pub col: usize,
}

impl CellCoordinate {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellCoordinate {
    /// A1-style reference, e.g. `{row: 0, col: 1}` -> `B1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letter(self.col), self.row + 1)
    }
}

/// A logical field placed onto a template cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    pub source_id: FieldId,
    pub target_cell: CellCoordinate,
}

/// The committed mapping configuration used at export time.
///
/// Only ever replaced wholesale (see `MappingStore::commit`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateState {
    pub spreadsheet_id: String,
    pub cell_mappings: Vec<Mapping>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalAlign {
    #[default]
    General,
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalAlign {
    Top,
    Middle,
    #[default]
    Bottom,
}

/// Per-cell formatting as reported by the spreadsheet service.
/// Colors are `0xRRGGBB`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellFormat {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub font_size: Option<f64>,
    pub foreground_color: Option<u32>,
    pub background_color: Option<u32>,
    pub horizontal_align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
    pub wrap: bool,
}

impl CellFormat {
    pub fn is_default(&self) -> bool {
        *self == CellFormat::default()
    }
}

/// Point-in-time view of a remote template sheet. Read-only to the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateGridSnapshot {
    pub spreadsheet_id: String,
    pub title: String,
    pub sheet_name: String,
    /// Display column headers (`A`, `B`, ...), one per grid column.
    pub headers: Vec<String>,
    /// Rectangular grid of cell text.
    pub values: Vec<Vec<String>>,
    /// Same shape as `values` when formatting was fetched, empty otherwise.
    pub formats: Vec<Vec<CellFormat>>,
    /// Pixel widths per column when the service reported them.
    pub column_widths: Vec<Option<f32>>,
    /// Pixel heights per row when the service reported them.
    pub row_heights: Vec<Option<f32>>,
}

impl TemplateGridSnapshot {
    pub fn row_count(&self) -> usize {
        self.values.len()
    }

    pub fn column_count(&self) -> usize {
        self.values.first().map_or(0, |r| r.len())
    }

    pub fn contains(&self, cell: CellCoordinate) -> bool {
        cell.row < self.row_count() && cell.col < self.column_count()
    }

    pub fn value_at(&self, cell: CellCoordinate) -> Option<&str> {
        self.values
            .get(cell.row)
            .and_then(|r| r.get(cell.col))
            .map(String::as_str)
    }

    pub fn format_at(&self, cell: CellCoordinate) -> Option<&CellFormat> {
        self.formats.get(cell.row).and_then(|r| r.get(cell.col))
    }
}

/// Spreadsheet column letters: 0 -> `A`, 25 -> `Z`, 26 -> `AA`.
pub fn column_letter(mut col: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn test_cell_coordinate_display() {
        assert_eq!(CellCoordinate::new(0, 1).to_string(), "B1");
        assert_eq!(CellCoordinate::new(9, 26).to_string(), "AA10");
    }

    #[test]
    fn test_template_state_json_shape() {
        let state = TemplateState {
            spreadsheet_id: "abc".to_string(),
            cell_mappings: vec![Mapping {
                source_id: FieldId::from("process"),
                target_cell: CellCoordinate::new(0, 1),
            }],
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["spreadsheetId"], "abc");
        assert_eq!(json["cellMappings"][0]["sourceId"], "process");
        assert_eq!(json["cellMappings"][0]["targetCell"]["col"], 1);
    }
}
