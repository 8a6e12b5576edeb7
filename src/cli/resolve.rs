// src/cli/resolve.rs
use std::path::Path;

use super::{read_json, CliError};
use crate::sow::definitions::FormState;
use crate::templates::field_catalog::FieldId;
use crate::templates::resolver::resolve;

pub fn run(form_path: &Path, field: &str) -> Result<(), CliError> {
    let form: FormState = read_json(form_path)?;
    let field = FieldId::from(field);
    if !field.is_known() {
        eprintln!("warning: unknown field '{}', resolving to an empty value", field);
    }
    println!("{}", resolve(&field, &form));
    Ok(())
}
