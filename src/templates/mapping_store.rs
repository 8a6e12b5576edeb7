// src/templates/mapping_store.rs
//! In-progress set of field -> cell mappings edited in the Settings view.

use super::definitions::{CellCoordinate, Mapping, TemplateState};
use super::error::{TemplateError, TemplateResult};
use super::field_catalog::FieldId;

/// Ordered collection of mappings.
///
/// Invariants held by `create_mapping`: at most one mapping per target cell
/// and at most one mapping per source field. A `TemplateState` built
/// elsewhere (e.g. loaded from JSON) may still carry duplicates; the
/// exporter resolves those last-write-wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingStore {
    mappings: Vec<Mapping>,
}

impl MappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds an editable store from a committed state, keeping the first
    /// mapping per cell and per field.
    pub fn from_state(state: &TemplateState) -> Self {
        let mut store = Self::new();
        for mapping in &state.cell_mappings {
            let _ = store.create_mapping(mapping.source_id.clone(), mapping.target_cell);
        }
        store
    }

    pub fn create_mapping(
        &mut self,
        source_id: FieldId,
        target_cell: CellCoordinate,
    ) -> TemplateResult<()> {
        if !source_id.is_known() {
            return Err(TemplateError::UnknownField(source_id.to_string()));
        }
        if self.mapping_at(target_cell).is_some() {
            return Err(TemplateError::DuplicateTarget(target_cell));
        }
        if self.is_source_mapped(&source_id) {
            return Err(TemplateError::DuplicateSource(source_id));
        }
        self.mappings.push(Mapping {
            source_id,
            target_cell,
        });
        Ok(())
    }

    /// Removes the mapping on `target_cell`. Returns it if there was one.
    pub fn remove_mapping(&mut self, target_cell: CellCoordinate) -> Option<Mapping> {
        let index = self
            .mappings
            .iter()
            .position(|m| m.target_cell == target_cell)?;
        Some(self.mappings.remove(index))
    }

    pub fn reset_all(&mut self) {
        self.mappings.clear();
    }

    pub fn commit(&self, spreadsheet_id: &str) -> TemplateResult<TemplateState> {
        if self.mappings.is_empty() {
            return Err(TemplateError::EmptyMappingSet);
        }
        Ok(TemplateState {
            spreadsheet_id: spreadsheet_id.to_string(),
            cell_mappings: self.mappings.clone(),
        })
    }

    pub fn mapping_at(&self, target_cell: CellCoordinate) -> Option<&Mapping> {
        self.mappings.iter().find(|m| m.target_cell == target_cell)
    }

    pub fn is_source_mapped(&self, source_id: &FieldId) -> bool {
        self.mappings.iter().any(|m| &m.source_id == source_id)
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}
