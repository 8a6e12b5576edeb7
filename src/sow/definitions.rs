// src/sow/definitions.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// One line item of the statement of work. Text fields hold editor markup,
/// `hours` is a decimal string as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowData {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub process_and_impact: String,
    #[serde(default)]
    pub components: String,
    #[serde(default)]
    pub assumptions: String,
    #[serde(default)]
    pub hours: String,
    #[serde(default)]
    pub notes: String,
}

impl Default for RowData {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            process_and_impact: String::new(),
            components: String::new(),
            assumptions: String::new(),
            hours: String::new(),
            notes: String::new(),
        }
    }
}

impl RowData {
    pub fn field(&self, field: RowField) -> &str {
        match field {
            RowField::ProcessAndImpact => &self.process_and_impact,
            RowField::Components => &self.components,
            RowField::Assumptions => &self.assumptions,
            RowField::Hours => &self.hours,
            RowField::Notes => &self.notes,
        }
    }

    pub fn field_mut(&mut self, field: RowField) -> &mut String {
        match field {
            RowField::ProcessAndImpact => &mut self.process_and_impact,
            RowField::Components => &mut self.components,
            RowField::Assumptions => &mut self.assumptions,
            RowField::Hours => &mut self.hours,
            RowField::Notes => &mut self.notes,
        }
    }

    /// Copy with a fresh id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowField {
    ProcessAndImpact,
    Components,
    Assumptions,
    Hours,
    Notes,
}

impl RowField {
    pub const ALL: [RowField; 5] = [
        RowField::ProcessAndImpact,
        RowField::Components,
        RowField::Assumptions,
        RowField::Hours,
        RowField::Notes,
    ];

    pub fn header(self) -> &'static str {
        match self {
            RowField::ProcessAndImpact => "Process and Impact",
            RowField::Components => "Components",
            RowField::Assumptions => "Assumptions",
            RowField::Hours => "Hours",
            RowField::Notes => "Notes",
        }
    }

    pub fn is_rich_text(self) -> bool {
        self != RowField::Hours
    }
}

/// Weekly hours per role, kept as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleHours {
    pub sa: String,
    pub consultant: String,
    pub pm: String,
    pub el: String,
    pub specialty: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hypercare {
    pub hours: String,
    pub weeks: String,
}

/// Everything the SOW form holds. The only input of the value resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormState {
    pub rows: Vec<RowData>,
    pub role_hours: RoleHours,
    pub hypercare: Hypercare,
    pub out_of_scope: Vec<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            rows: vec![RowData::default()],
            role_hours: RoleHours::default(),
            hypercare: Hypercare::default(),
            out_of_scope: Vec::new(),
        }
    }
}

impl FormState {
    /// Sum of all row hours, one decimal place with halves rounded up.
    pub fn total_hours(&self) -> String {
        let total = self.rows.iter().fold(0.0, |acc, r| acc + parse_decimal(&r.hours));
        format!("{:.1}", (total * 10.0).round() / 10.0)
    }

    pub fn add_row(&mut self) {
        self.rows.push(RowData::default());
    }

    /// Removes the selected rows. Out-of-range indices are ignored.
    /// Returns how many rows were removed.
    pub fn delete_rows(&mut self, selected: &BTreeSet<usize>) -> usize {
        let before = self.rows.len();
        let mut index = 0;
        self.rows.retain(|_| {
            let keep = !selected.contains(&index);
            index += 1;
            keep
        });
        before - self.rows.len()
    }

    /// Inserts a copy of each selected row right after it.
    pub fn duplicate_rows(&mut self, selected: &BTreeSet<usize>) -> usize {
        let mut count = 0;
        // Highest first so earlier insertions don't shift pending indices.
        for &index in selected.iter().rev() {
            if let Some(row) = self.rows.get(index) {
                let copy = row.duplicate();
                self.rows.insert(index + 1, copy);
                count += 1;
            }
        }
        count
    }

    /// Array-move of one row. Selected indices are remapped so the same
    /// rows stay selected.
    pub fn move_row(&mut self, from: usize, to: usize, selected: &mut BTreeSet<usize>) -> bool {
        if from >= self.rows.len() || to >= self.rows.len() || from == to {
            return false;
        }
        let row = self.rows.remove(from);
        self.rows.insert(to, row);

        *selected = selected
            .iter()
            .map(|&index| {
                if index == from {
                    to
                } else if from < to && index > from && index <= to {
                    index - 1
                } else if from > to && index < from && index >= to {
                    index + 1
                } else {
                    index
                }
            })
            .collect();
        true
    }

    pub fn add_out_of_scope(&mut self, item: String) {
        self.out_of_scope.push(item);
    }

    pub fn remove_out_of_scope(&mut self, index: usize) -> Option<String> {
        (index < self.out_of_scope.len()).then(|| self.out_of_scope.remove(index))
    }
}

/// Lenient decimal parse: the longest leading `[+-]digits[.digits][e[+-]digits]`
/// prefix, 0 when there is none.
pub fn parse_decimal(text: &str) -> f64 {
    let trimmed = text.trim();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > end + 1 {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits {
        return 0.0;
    }
    // An exponent only counts when digits follow it ("1e" parses as 1).
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }
    trimmed[..end].parse::<f64>().unwrap_or(0.0)
}
