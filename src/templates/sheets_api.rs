// src/templates/sheets_api.rs
//! Google Sheets v4 client used to load template grids.

use bevy::log::{debug, info, warn};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use super::definitions::{CellFormat, HorizontalAlign, TemplateGridSnapshot, VerticalAlign};
use super::error::{TemplateError, TemplateResult};
use super::definitions::column_letter;
use super::grid::{build_snapshot, capped_dimensions, normalize_formats, pad_snapshot};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const FORMAT_FIELDS: &str = "sheets(data(rowData(values(effectiveFormat(backgroundColor,horizontalAlignment,verticalAlignment,wrapStrategy,textFormat))),columnMetadata(pixelSize),rowMetadata(pixelSize)))";

/// Extracts the spreadsheet id from a `docs.google.com/.../d/<id>/...` URL.
pub fn extract_sheet_id(url: &str) -> TemplateResult<String> {
    let parsed = Url::parse(url.trim()).map_err(|_| TemplateError::InvalidSheetUrl(url.to_string()))?;
    if !parsed.host_str().is_some_and(|h| h.contains("docs.google.com")) {
        return Err(TemplateError::InvalidSheetUrl(url.to_string()));
    }
    let mut segments = parsed.path_segments().into_iter().flatten();
    segments
        .by_ref()
        .find(|segment| *segment == "d")
        .and_then(|_| segments.next())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| TemplateError::InvalidSheetUrl(url.to_string()))
}

/// Accepts either a sheet URL or a bare spreadsheet id.
pub fn sheet_id_from_input(input: &str) -> TemplateResult<String> {
    let trimmed = input.trim();
    if trimmed.contains("://") {
        extract_sheet_id(trimmed)
    } else if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        Ok(trimmed.to_string())
    } else {
        Err(TemplateError::InvalidSheetUrl(input.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    properties: Option<SpreadsheetProperties>,
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetProperties {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    title: String,
    #[serde(default)]
    grid_properties: Option<GridProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridProperties {
    #[serde(default)]
    row_count: usize,
    #[serde(default)]
    column_count: usize,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct FormatResponse {
    #[serde(default)]
    sheets: Vec<FormatSheet>,
}

#[derive(Debug, Deserialize)]
struct FormatSheet {
    #[serde(default)]
    data: Vec<GridData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridData {
    #[serde(default)]
    row_data: Vec<RowDataEntry>,
    #[serde(default)]
    column_metadata: Vec<DimensionMetadata>,
    #[serde(default)]
    row_metadata: Vec<DimensionMetadata>,
}

#[derive(Debug, Deserialize)]
struct RowDataEntry {
    #[serde(default)]
    values: Vec<CellDataEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CellDataEntry {
    #[serde(default)]
    effective_format: Option<RemoteCellFormat>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DimensionMetadata {
    #[serde(default)]
    pixel_size: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteCellFormat {
    background_color: Option<RemoteColor>,
    horizontal_alignment: Option<String>,
    vertical_alignment: Option<String>,
    wrap_strategy: Option<String>,
    text_format: Option<RemoteTextFormat>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteTextFormat {
    foreground_color: Option<RemoteColor>,
    font_size: Option<f64>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    italic: bool,
    #[serde(default)]
    strikethrough: bool,
    #[serde(default)]
    underline: bool,
}

/// Channels are 0..=1; the API omits zero channels.
#[derive(Debug, Default, Deserialize)]
struct RemoteColor {
    #[serde(default)]
    red: f32,
    #[serde(default)]
    green: f32,
    #[serde(default)]
    blue: f32,
}

impl RemoteColor {
    fn to_rgb(&self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.red) << 16) | (channel(self.green) << 8) | channel(self.blue)
    }
}

impl RemoteCellFormat {
    fn to_cell_format(&self) -> CellFormat {
        let text = self.text_format.as_ref();
        CellFormat {
            bold: text.is_some_and(|t| t.bold),
            italic: text.is_some_and(|t| t.italic),
            underline: text.is_some_and(|t| t.underline),
            strikethrough: text.is_some_and(|t| t.strikethrough),
            font_size: text.and_then(|t| t.font_size),
            // Black text and white fill are the sheet defaults.
            foreground_color: text
                .and_then(|t| t.foreground_color.as_ref())
                .map(RemoteColor::to_rgb)
                .filter(|rgb| *rgb != 0x000000),
            background_color: self
                .background_color
                .as_ref()
                .map(RemoteColor::to_rgb)
                .filter(|rgb| *rgb != 0xFFFFFF),
            horizontal_align: match self.horizontal_alignment.as_deref() {
                Some("LEFT") => HorizontalAlign::Left,
                Some("CENTER") => HorizontalAlign::Center,
                Some("RIGHT") => HorizontalAlign::Right,
                _ => HorizontalAlign::General,
            },
            vertical_align: match self.vertical_alignment.as_deref() {
                Some("TOP") => VerticalAlign::Top,
                Some("MIDDLE") => VerticalAlign::Middle,
                _ => VerticalAlign::Bottom,
            },
            wrap: self.wrap_strategy.as_deref() == Some("WRAP"),
        }
    }
}

/// Loosely-typed API cell values become plain strings at this boundary.
fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parses an error body into its upstream message, falling back to the raw text.
fn upstream_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| format!("HTTP {}: {}", status, body.trim()))
}

/// Applies fetched formatting and sizing to a snapshot in place.
fn apply_formatting(snapshot: &mut TemplateGridSnapshot, response: FormatResponse) {
    let Some(grid) = response.sheets.into_iter().next().and_then(|s| s.data.into_iter().next()) else {
        return;
    };
    let formats = grid
        .row_data
        .iter()
        .map(|row| {
            row.values
                .iter()
                .map(|cell| {
                    cell.effective_format
                        .as_ref()
                        .map(RemoteCellFormat::to_cell_format)
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();
    let (rows, cols) = (snapshot.row_count(), snapshot.column_count());
    snapshot.formats = normalize_formats(formats, rows, cols);
    snapshot.column_widths = grid.column_metadata.iter().map(|m| m.pixel_size).take(cols).collect();
    snapshot.row_heights = grid.row_metadata.iter().map(|m| m.pixel_size).take(rows).collect();
}

fn quoted_range(sheet_name: &str) -> String {
    format!("'{}'", sheet_name.replace('\'', "''"))
}

/// A1 range covering the whole (capped) grid, or the bare sheet when its size is unknown.
fn grid_range(sheet_name: &str, dimensions: Option<(usize, usize)>) -> String {
    match dimensions {
        Some((rows, cols)) => format!("{}!A1:{}{}", quoted_range(sheet_name), column_letter(cols - 1), rows),
        None => quoted_range(sheet_name),
    }
}

/// Thin client around the three endpoints a template load needs.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SheetsClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, SHEETS_API_BASE.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }

    fn endpoint(&self, spreadsheet_id: &str, tail: &[&str]) -> TemplateResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| TemplateError::TemplateFetch(format!("Bad API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| TemplateError::TemplateFetch("Bad API base URL".to_string()))?
            .push(spreadsheet_id)
            .extend(tail);
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: Url) -> TemplateResult<T> {
        debug!("Templates: GET {}", url.path());
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| TemplateError::TemplateFetch(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TemplateError::TemplateFetch(e.to_string()))?;
        if !status.is_success() {
            return Err(TemplateError::TemplateFetch(upstream_message(status, &body)));
        }
        serde_json::from_str(&body)
            .map_err(|e| TemplateError::TemplateFetch(format!("Unexpected response: {}", e)))
    }

    /// Loads metadata, values and (best-effort) formatting of the first sheet.
    pub async fn fetch_grid(&self, spreadsheet_id: &str) -> TemplateResult<TemplateGridSnapshot> {
        let mut url = self.endpoint(spreadsheet_id, &[])?;
        url.query_pairs_mut()
            .append_pair("fields", "properties.title,sheets.properties");
        let metadata: SpreadsheetMetadata = self.get_json(url).await?;

        let first = metadata
            .sheets
            .first()
            .ok_or_else(|| TemplateError::TemplateFetch("Spreadsheet has no sheets".to_string()))?;
        let sheet_name = first.properties.title.clone();
        let title = metadata.properties.map(|p| p.title).unwrap_or_default();
        let dimensions = first
            .properties
            .grid_properties
            .as_ref()
            .filter(|grid| grid.row_count > 0 && grid.column_count > 0)
            .map(|grid| {
                debug!(
                    "Templates: sheet '{}' reports {} rows x {} columns.",
                    sheet_name, grid.row_count, grid.column_count
                );
                capped_dimensions(grid.row_count, grid.column_count)
            });

        let range = grid_range(&sheet_name, dimensions);
        let values: ValueRange = self
            .get_json(self.endpoint(spreadsheet_id, &["values", range.as_str()])?)
            .await?;
        let rows: Vec<Vec<String>> = values
            .values
            .into_iter()
            .map(|row| row.into_iter().map(value_to_string).collect())
            .collect();
        let mut snapshot = build_snapshot(spreadsheet_id, &title, &sheet_name, rows);
        if let Some((rows, cols)) = dimensions {
            pad_snapshot(&mut snapshot, rows, cols);
        }

        let mut format_url = self.endpoint(spreadsheet_id, &[])?;
        format_url
            .query_pairs_mut()
            .append_pair("ranges", &range)
            .append_pair("includeGridData", "true")
            .append_pair("fields", FORMAT_FIELDS);
        match self.get_json::<FormatResponse>(format_url).await {
            Ok(response) => apply_formatting(&mut snapshot, response),
            Err(e) => warn!("Templates: formatting unavailable for '{}': {}", spreadsheet_id, e),
        }

        info!(
            "Templates: loaded '{}' ({} rows x {} columns).",
            snapshot.title,
            snapshot.row_count(),
            snapshot.column_count()
        );
        Ok(snapshot)
    }
}
