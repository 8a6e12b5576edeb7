// src/templates/resolver.rs
//! Computes the text written into a mapped cell from the current form.

use crate::sow::definitions::{FormState, RowData};
use crate::sow::rich_text::to_plain;

use super::field_catalog::{FieldId, FieldKey, HypercareField, Role};

const ENTRY_SEPARATOR: &str = "\n\n";

/// Resolves `field` against `form`. Unknown fields resolve to `""`.
pub fn resolve(field: &FieldId, form: &FormState) -> String {
    match field.key() {
        FieldKey::Process => join_rows(form, |r| &r.process_and_impact),
        FieldKey::Components => join_rows(form, |r| &r.components),
        FieldKey::Assumptions => join_rows(form, |r| &r.assumptions),
        FieldKey::Notes => join_rows(form, |r| &r.notes),
        FieldKey::Hours => form.total_hours(),
        FieldKey::OutOfScope => join_plain(form.out_of_scope.iter().map(String::as_str)),
        FieldKey::RoleHours(role) => role_hours(form, role).to_string(),
        FieldKey::Hypercare(HypercareField::Hours) => form.hypercare.hours.clone(),
        FieldKey::Hypercare(HypercareField::Weeks) => form.hypercare.weeks.clone(),
        FieldKey::Unknown => String::new(),
    }
}

fn role_hours(form: &FormState, role: Role) -> &str {
    let hours = &form.role_hours;
    match role {
        Role::Sa => &hours.sa,
        Role::Consultant => &hours.consultant,
        Role::Pm => &hours.pm,
        Role::El => &hours.el,
        Role::Specialty => &hours.specialty,
    }
}

fn join_rows<F>(form: &FormState, pick: F) -> String
where
    F: Fn(&RowData) -> &String,
{
    join_plain(form.rows.iter().map(|row| pick(row).as_str()))
}

/// Strips markup from each entry and joins with a blank line.
fn join_plain<'a>(entries: impl Iterator<Item = &'a str>) -> String {
    entries
        .map(to_plain)
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}
