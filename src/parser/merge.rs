//! Field merge: collapse repeated field definitions within a section.
//!
//! A field may be declared more than once in the same section (for example
//! when module fields are concatenated). The first declaration fixes the
//! position, later ones only update attributes, and every declaration must
//! agree on `type`.

use crate::error::{Error, Result};
use crate::model::*;
use std::collections::HashMap;
use tracing::debug;

/// Merge duplicate fields in every section, in place.
pub fn merge(sections: &mut [Section]) -> Result<()> {
    for section in sections.iter_mut() {
        let fields = std::mem::take(&mut section.fields);
        section.fields = merge_fields(fields, &section.key)?;
    }
    Ok(())
}

/// Deduplicate a field list by name, then recurse into group fields.
fn merge_fields(fields: Vec<Field>, section: &str) -> Result<Vec<Field>> {
    let mut field_map: HashMap<String, Field> = HashMap::new();
    let mut field_order: Vec<String> = Vec::new();

    for field in fields {
        if let Some(existing) = field_map.get_mut(&field.name) {
            if existing.field_type != field.field_type {
                return Err(Error::TypeConflict {
                    section: section.to_string(),
                    field: field.name,
                    existing: type_label(&existing.field_type),
                    redefined: type_label(&field.field_type),
                });
            }
            debug!(section, field = %field.name, "merging redefined field");
            update(existing, field);
        } else {
            field_order.push(field.name.clone());
            field_map.insert(field.name.clone(), field);
        }
    }

    // Preserve first-seen order
    let mut merged: Vec<Field> = field_order
        .into_iter()
        .filter_map(|name| field_map.remove(&name))
        .collect();

    for field in merged.iter_mut().filter(|f| f.is_group()) {
        let nested = std::mem::take(&mut field.fields);
        field.fields = merge_fields(nested, section)?;
    }

    Ok(merged)
}

/// Overwrite `existing` with every attribute `later` defines.
fn update(existing: &mut Field, later: Field) {
    fn set<T>(slot: &mut Option<T>, value: Option<T>) {
        if value.is_some() {
            *slot = value;
        }
    }

    set(&mut existing.description, later.description);
    set(&mut existing.example, later.example);
    set(&mut existing.format, later.format);
    set(&mut existing.required, later.required);
    set(&mut existing.deprecated, later.deprecated);
    set(&mut existing.index, later.index);
    set(&mut existing.enabled, later.enabled);
    set(&mut existing.alias_path, later.alias_path);
    set(&mut existing.prefix, later.prefix);
    set(&mut existing.anchor, later.anchor);
    if !later.multi_fields.is_empty() {
        existing.multi_fields = later.multi_fields;
    }
    if !later.fields.is_empty() {
        existing.fields = later.fields;
    }
    if later.skipdocs {
        existing.skipdocs = true;
    }
}

fn type_label(field_type: &Option<String>) -> String {
    field_type.clone().unwrap_or_else(|| "<none>".to_string())
}
