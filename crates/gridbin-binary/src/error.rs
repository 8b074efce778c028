use gridbin_interop::InteropError;
use gridbin_types::TypeCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BinaryError {
    #[error("memory error: {0}")]
    Interop(#[from] InteropError),

    #[error("duplicate field '{name}' (field id {field_id}) in one object")]
    DuplicateField { name: String, field_id: i32 },

    #[error("cannot write field '{field}': object is in raw mode")]
    RawMode { field: String },

    #[error("object too large: {length} bytes")]
    ObjectTooLarge { length: usize },

    #[error("field '{field}' of type '{type_name}' is {existing}, cannot register it as {actual}")]
    FieldTypeConflict {
        type_name: String,
        field: String,
        existing: TypeCode,
        actual: TypeCode,
    },
}

pub type BinaryResult<T> = Result<T, BinaryError>;
