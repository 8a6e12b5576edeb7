// src/templates/field_catalog.rs
//! Fixed set of logical fields the SOW form can produce values for.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a value source. Either simple (`"hours"`) or
/// namespaced (`"roleHours.sa"`), where the prefix picks a sub-record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn key(&self) -> FieldKey {
        FieldKey::parse(&self.0)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self.key(), FieldKey::Unknown)
    }

    /// Human label from the catalog, or the raw id for unknown fields.
    pub fn label(&self) -> &str {
        FIELD_CATALOG
            .iter()
            .find(|entry| entry.id == self.0)
            .map_or(self.0.as_str(), |entry| entry.label)
    }
}

impl From<&str> for FieldId {
    fn from(value: &str) -> Self {
        FieldId(value.to_string())
    }
}

impl From<String> for FieldId {
    fn from(value: String) -> Self {
        FieldId(value)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Sa,
    Consultant,
    Pm,
    El,
    Specialty,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::Sa, Role::Consultant, Role::Pm, Role::El, Role::Specialty];

    fn from_suffix(suffix: &str) -> Option<Role> {
        match suffix {
            "sa" => Some(Role::Sa),
            "consultant" => Some(Role::Consultant),
            "pm" => Some(Role::Pm),
            "el" => Some(Role::El),
            "specialty" => Some(Role::Specialty),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HypercareField {
    Hours,
    Weeks,
}

/// Parsed form of a `FieldId`, used by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Process,
    Components,
    Assumptions,
    Hours,
    Notes,
    OutOfScope,
    RoleHours(Role),
    Hypercare(HypercareField),
    Unknown,
}

impl FieldKey {
    pub fn parse(id: &str) -> FieldKey {
        match id.split_once('.') {
            None => match id {
                "process" => FieldKey::Process,
                "components" => FieldKey::Components,
                "assumptions" => FieldKey::Assumptions,
                "hours" => FieldKey::Hours,
                "notes" => FieldKey::Notes,
                "outOfScope" => FieldKey::OutOfScope,
                _ => FieldKey::Unknown,
            },
            Some(("roleHours", suffix)) => {
                Role::from_suffix(suffix).map_or(FieldKey::Unknown, FieldKey::RoleHours)
            }
            Some(("hypercare", "hours")) => FieldKey::Hypercare(HypercareField::Hours),
            Some(("hypercare", "weeks")) => FieldKey::Hypercare(HypercareField::Weeks),
            Some(_) => FieldKey::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    MainSections,
    OutOfScope,
    IndividualValues,
}

impl FieldGroup {
    pub const ALL: [FieldGroup; 3] = [
        FieldGroup::MainSections,
        FieldGroup::OutOfScope,
        FieldGroup::IndividualValues,
    ];

    pub fn title(self) -> &'static str {
        match self {
            FieldGroup::MainSections => "Main Sections",
            FieldGroup::OutOfScope => "Out of Scope",
            FieldGroup::IndividualValues => "Individual Values",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub group: FieldGroup,
}

impl CatalogEntry {
    pub fn field_id(&self) -> FieldId {
        FieldId::from(self.id)
    }
}

pub const FIELD_CATALOG: &[CatalogEntry] = &[
    CatalogEntry { id: "process", label: "Process and Impact", group: FieldGroup::MainSections },
    CatalogEntry { id: "components", label: "Components", group: FieldGroup::MainSections },
    CatalogEntry { id: "assumptions", label: "Assumptions", group: FieldGroup::MainSections },
    CatalogEntry { id: "hours", label: "Hours", group: FieldGroup::MainSections },
    CatalogEntry { id: "notes", label: "Notes", group: FieldGroup::MainSections },
    CatalogEntry { id: "outOfScope", label: "Out of Scope Items", group: FieldGroup::OutOfScope },
    CatalogEntry { id: "roleHours.sa", label: "SA Hours Per Week", group: FieldGroup::IndividualValues },
    CatalogEntry { id: "roleHours.consultant", label: "Consultant Hours Per Week", group: FieldGroup::IndividualValues },
    CatalogEntry { id: "roleHours.pm", label: "PM Hours Per Week", group: FieldGroup::IndividualValues },
    CatalogEntry { id: "roleHours.el", label: "EL Hours Per Week", group: FieldGroup::IndividualValues },
    CatalogEntry { id: "roleHours.specialty", label: "Specialty Resource Hours", group: FieldGroup::IndividualValues },
    CatalogEntry { id: "hypercare.hours", label: "Hypercare Hours", group: FieldGroup::IndividualValues },
    CatalogEntry { id: "hypercare.weeks", label: "Hypercare Weeks", group: FieldGroup::IndividualValues },
];

pub fn entries_in(group: FieldGroup) -> impl Iterator<Item = &'static CatalogEntry> {
    FIELD_CATALOG.iter().filter(move |entry| entry.group == group)
}
