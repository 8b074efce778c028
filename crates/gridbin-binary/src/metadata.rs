//! Type metadata collected while objects are written.
//!
//! Readers on other platforms need the field names and types of a binary
//! type, not only the hashed ids in each object's schema block. The writer
//! records them as it goes, and [`MetadataRegistry`] merges what successive
//! objects of the same type report.

use std::collections::BTreeMap;

use gridbin_types::{type_id, TypeCode};
use serde::{Deserialize, Serialize};

use crate::error::{BinaryError, BinaryResult};

/// One field of a binary type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMetadata {
    pub name: String,
    pub field_id: i32,
    pub type_code: TypeCode,
}

/// Field layout observed for one binary type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMetadata {
    pub type_id: i32,
    pub type_name: String,
    /// Fields in write order.
    pub fields: Vec<FieldMetadata>,
}

impl TypeMetadata {
    pub fn new(type_id: i32, type_name: impl Into<String>) -> Self {
        Self {
            type_id,
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Metadata for a named type, deriving the id from the name.
    pub fn for_name(type_name: &str) -> Self {
        Self::new(type_id(type_name), type_name)
    }

    pub(crate) fn record(&mut self, name: &str, field_id: i32, type_code: TypeCode) {
        self.fields.push(FieldMetadata {
            name: name.to_owned(),
            field_id,
            type_code,
        });
    }

    pub fn field(&self, name: &str) -> Option<&FieldMetadata> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Accumulated metadata for every type seen by an encoder.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MetadataRegistry {
    types: BTreeMap<i32, TypeMetadata>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one observation. Returns `true` if it added a type or a field.
    ///
    /// A field that reappears with a different type code is rejected; a
    /// type code of `Object` (how nulls are recorded) never conflicts.
    pub fn merge(&mut self, observed: &TypeMetadata) -> BinaryResult<bool> {
        let Some(known) = self.types.get_mut(&observed.type_id) else {
            self.types.insert(observed.type_id, observed.clone());
            return Ok(true);
        };

        let mut changed = false;
        for field in &observed.fields {
            match known.fields.iter_mut().find(|f| f.field_id == field.field_id) {
                None => {
                    known.fields.push(field.clone());
                    changed = true;
                }
                Some(existing) if existing.type_code == field.type_code => {}
                Some(existing) if existing.type_code == TypeCode::Object => {
                    existing.type_code = field.type_code;
                    changed = true;
                }
                Some(_) if field.type_code == TypeCode::Object => {}
                Some(existing) => {
                    return Err(BinaryError::FieldTypeConflict {
                        type_name: known.type_name.clone(),
                        field: field.name.clone(),
                        existing: existing.type_code,
                        actual: field.type_code,
                    });
                }
            }
        }
        Ok(changed)
    }

    pub fn get(&self, type_id: i32) -> Option<&TypeMetadata> {
        self.types.get(&type_id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeMetadata> {
        self.types.values()
    }
}
