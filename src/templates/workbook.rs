// src/templates/workbook.rs
//! In-memory workbook model and its xlsx encoding.

use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatUnderline, Workbook};

use super::definitions::{CellCoordinate, CellFormat, HorizontalAlign, TemplateGridSnapshot, VerticalAlign};
use super::error::{TemplateError, TemplateResult};

/// Grid limits of the xlsx format.
pub const MAX_XLSX_ROWS: usize = 1_048_576;
pub const MAX_XLSX_COLUMNS: usize = 16_384;

pub fn within_xlsx_limits(at: CellCoordinate) -> bool {
    at.row < MAX_XLSX_ROWS && at.col < MAX_XLSX_COLUMNS
}

/// Converts a cell position to xlsx row/column indices.
fn xlsx_position(at: CellCoordinate) -> TemplateResult<(u32, u16)> {
    if !within_xlsx_limits(at) {
        return Err(TemplateError::OutOfBounds(at));
    }
    let row = u32::try_from(at.row).map_err(|_| TemplateError::OutOfBounds(at))?;
    let col = u16::try_from(at.col).map_err(|_| TemplateError::OutOfBounds(at))?;
    Ok((row, col))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateCell {
    pub value: String,
    pub format: CellFormat,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkbookSheet {
    pub name: String,
    pub cells: Vec<Vec<TemplateCell>>,
    pub column_widths: Vec<Option<f32>>,
    pub row_heights: Vec<Option<f32>>,
}

impl WorkbookSheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Sheet of plain values, first row bold.
    pub fn from_rows(name: &str, rows: Vec<Vec<String>>) -> Self {
        let cells = rows
            .into_iter()
            .enumerate()
            .map(|(r, row)| {
                row.into_iter()
                    .map(|value| TemplateCell {
                        value,
                        format: CellFormat {
                            bold: r == 0,
                            ..Default::default()
                        },
                    })
                    .collect()
            })
            .collect();
        Self {
            name: name.to_string(),
            cells,
            ..Default::default()
        }
    }

    pub fn cell(&self, at: CellCoordinate) -> Option<&TemplateCell> {
        self.cells.get(at.row).and_then(|r| r.get(at.col))
    }

    /// Mutable access to a cell, growing the grid when `at` lies outside it.
    /// Callers keep `at` within the xlsx limits.
    pub fn cell_mut(&mut self, at: CellCoordinate) -> &mut TemplateCell {
        if self.cells.len() <= at.row {
            self.cells.resize_with(at.row + 1, Vec::new);
        }
        let row = &mut self.cells[at.row];
        if row.len() <= at.col {
            row.resize_with(at.col + 1, TemplateCell::default);
        }
        &mut row[at.col]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateWorkbook {
    pub sheets: Vec<WorkbookSheet>,
}

impl TemplateWorkbook {
    pub fn primary_sheet(&self) -> Option<&WorkbookSheet> {
        self.sheets.first()
    }

    pub fn primary_sheet_mut(&mut self) -> Option<&mut WorkbookSheet> {
        self.sheets.first_mut()
    }

    /// Single-sheet workbook mirroring the snapshot's values and styles.
    pub fn from_snapshot(snapshot: &TemplateGridSnapshot) -> Self {
        let cells = snapshot
            .values
            .iter()
            .enumerate()
            .map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .map(|(c, value)| TemplateCell {
                        value: value.clone(),
                        format: snapshot
                            .format_at(CellCoordinate::new(r, c))
                            .cloned()
                            .unwrap_or_default(),
                    })
                    .collect()
            })
            .collect();
        let name = if snapshot.sheet_name.is_empty() {
            "Sheet1".to_string()
        } else {
            snapshot.sheet_name.clone()
        };
        Self {
            sheets: vec![WorkbookSheet {
                name,
                cells,
                column_widths: snapshot.column_widths.clone(),
                row_heights: snapshot.row_heights.clone(),
            }],
        }
    }
}

/// Serializes the workbook to xlsx bytes. Every value is written as text.
pub fn encode_workbook(workbook: &TemplateWorkbook) -> TemplateResult<Vec<u8>> {
    let mut xlsx = Workbook::new();
    for sheet in &workbook.sheets {
        let worksheet = xlsx.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        // Pixel sizes are clamped by the float-to-int conversion.
        for (c, width) in sheet.column_widths.iter().enumerate() {
            if let Some(px) = width {
                let (_, col) = xlsx_position(CellCoordinate::new(0, c))?;
                worksheet.set_column_width_pixels(col, px.round() as u16)?;
            }
        }
        for (r, height) in sheet.row_heights.iter().enumerate() {
            if let Some(px) = height {
                let (row, _) = xlsx_position(CellCoordinate::new(r, 0))?;
                worksheet.set_row_height_pixels(row, px.round() as u16)?;
            }
        }

        for (r, cells) in sheet.cells.iter().enumerate() {
            for (c, cell) in cells.iter().enumerate() {
                if cell.value.is_empty() && cell.format.is_default() {
                    continue;
                }
                let (row, col) = xlsx_position(CellCoordinate::new(r, c))?;
                let format = build_xlsx_format(&cell.format);
                worksheet.write_string_with_format(row, col, &cell.value, &format)?;
            }
        }
    }
    Ok(xlsx.save_to_buffer()?)
}

fn build_xlsx_format(cell_format: &CellFormat) -> Format {
    let mut format = Format::new();

    if cell_format.bold {
        format = format.set_bold();
    }
    if cell_format.italic {
        format = format.set_italic();
    }
    if cell_format.underline {
        format = format.set_underline(FormatUnderline::Single);
    }
    if cell_format.strikethrough {
        format = format.set_font_strikethrough();
    }
    if let Some(size) = cell_format.font_size {
        format = format.set_font_size(size);
    }
    if let Some(rgb) = cell_format.foreground_color {
        format = format.set_font_color(Color::RGB(rgb));
    }
    if let Some(rgb) = cell_format.background_color {
        format = format.set_background_color(Color::RGB(rgb));
    }

    format = match cell_format.horizontal_align {
        HorizontalAlign::General => format,
        HorizontalAlign::Left => format.set_align(FormatAlign::Left),
        HorizontalAlign::Center => format.set_align(FormatAlign::Center),
        HorizontalAlign::Right => format.set_align(FormatAlign::Right),
    };
    format = match cell_format.vertical_align {
        VerticalAlign::Top => format.set_align(FormatAlign::Top),
        VerticalAlign::Middle => format.set_align(FormatAlign::VerticalCenter),
        VerticalAlign::Bottom => format,
    };
    if cell_format.wrap {
        format = format.set_text_wrap();
    }
    format
}

/// `sow_export_<ISO-8601 without ':' and '.', whole seconds>.xlsx`
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("sow_export_{}.xlsx", now.format("%Y-%m-%dT%H%M%S"))
}
