//! Identifier hashing.
//!
//! Field ids, type ids, schema ids, and object hash codes are computed by
//! every client that reads or writes the format, so the algorithms below are
//! part of the wire protocol.

/// FNV-1 offset basis used for schema ids.
pub const FNV1_OFFSET_BASIS: i32 = 0x811C_9DC5_u32 as i32;

/// FNV-1 prime used for schema ids.
pub const FNV1_PRIME: i32 = 0x0100_0193;

/// Field identifier for a field name.
///
/// Java `String.hashCode` of the lower-cased name: `h = 31 * h + unit` over
/// UTF-16 code units, with wrapping 32-bit arithmetic.
pub fn field_id(name: &str) -> i32 {
    lowercase_hash(name)
}

/// Type identifier for a type name. Same algorithm as [`field_id`].
pub fn type_id(name: &str) -> i32 {
    lowercase_hash(name)
}

fn lowercase_hash(name: &str) -> i32 {
    let mut units = [0u16; 2];
    name.chars()
        .flat_map(char::to_lowercase)
        .fold(0i32, |hash, ch| {
            ch.encode_utf16(&mut units)
                .iter()
                .fold(hash, |h, &unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
        })
}

/// Incremental FNV-1 hash over the field ids of an object schema.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchemaIdHasher {
    state: Option<i32>,
}

impl SchemaIdHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one field id into the hash, byte by byte in little-endian order.
    pub fn update(&mut self, field_id: i32) {
        let mut hash = self.state.unwrap_or(FNV1_OFFSET_BASIS);
        for byte in field_id.to_le_bytes() {
            hash = (hash ^ i32::from(byte)).wrapping_mul(FNV1_PRIME);
        }
        self.state = Some(hash);
    }

    /// The schema id; `0` when no field was added.
    pub fn finish(&self) -> i32 {
        self.state.unwrap_or(0)
    }
}

/// Schema id of an ordered list of field ids.
pub fn schema_id(field_ids: impl IntoIterator<Item = i32>) -> i32 {
    let mut hasher = SchemaIdHasher::new();
    for id in field_ids {
        hasher.update(id);
    }
    hasher.finish()
}

/// Hash code of an object's data bytes (`31 * h + signed byte`, seeded with 1).
pub fn data_hash_code(data: &[u8]) -> i32 {
    data.iter().fold(1i32, |h, &b| {
        h.wrapping_mul(31).wrapping_add(i32::from(b as i8))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_letter_field_ids() {
        assert_eq!(field_id("a"), 97);
        assert_eq!(field_id("b"), 98);
        assert_eq!(field_id("c"), 99);
    }

    #[test]
    fn known_field_ids() {
        assert_eq!(field_id("name"), 3_373_707);
        assert_eq!(field_id("orgId"), 106_009_343);
        assert_eq!(field_id("OrganizationName"), -1_828_153_794);
    }

    #[test]
    fn type_id_is_case_insensitive() {
        assert_eq!(type_id("Person"), -991_716_523);
        assert_eq!(type_id("person"), type_id("PERSON"));
    }

    #[test]
    fn empty_name_hashes_to_zero() {
        assert_eq!(field_id(""), 0);
    }

    #[test]
    fn schema_id_known_values() {
        assert_eq!(schema_id([97]), -169_749_532);
        assert_eq!(schema_id([97, 98, 99]), -224_585_515);
        assert_eq!(schema_id([]), 0);
    }

    #[test]
    fn schema_id_depends_on_order() {
        assert_ne!(schema_id([97, 98]), schema_id([98, 97]));
    }

    #[test]
    fn data_hash_known_values() {
        assert_eq!(data_hash_code(&[]), 1);
        assert_eq!(data_hash_code(&[1, 2, 3]), 30_817);
        // 0xFF is -1 as a signed byte.
        assert_eq!(data_hash_code(&[0xFF]), 30);
    }

    proptest! {
        #[test]
        fn field_id_deterministic(name in "\\PC{0,32}") {
            prop_assert_eq!(field_id(&name), field_id(&name));
        }

        #[test]
        fn ascii_case_does_not_matter(name in "[a-zA-Z0-9_]{1,32}") {
            prop_assert_eq!(field_id(&name), field_id(&name.to_ascii_uppercase()));
        }
    }
}
