//! Conversion of JSON documents into encodable objects.
//!
//! JSON carries less type information than the binary format, so each value
//! maps to the narrowest binary type that holds it: integers that fit in
//! `i32` become ints, larger ones longs, other numbers doubles. Arrays must
//! be homogeneous. A nested object takes its type name from an `@type` key,
//! or from the field name holding it.

use anyhow::{bail, Context, Result};
use gridbin_binary::{BinaryResult, BinaryType, BinaryWriter};
use serde_json::{Map, Value};

/// Key naming an object's binary type. It is not written as a field.
pub const TYPE_KEY: &str = "@type";

#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    String(String),
    BoolArray(Vec<bool>),
    LongArray(Vec<i64>),
    DoubleArray(Vec<f64>),
    StringArray(Vec<Option<String>>),
    Object(JsonObject),
}

/// A JSON object ready to encode. Fields are written in key order.
#[derive(Clone, Debug, PartialEq)]
pub struct JsonObject {
    pub type_name: String,
    pub fields: Vec<(String, FieldValue)>,
}

impl JsonObject {
    pub fn from_value(value: &Value, default_type: &str) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_map(map, default_type),
            other => bail!("expected a JSON object, found {}", kind(other)),
        }
    }

    fn from_map(map: &Map<String, Value>, default_type: &str) -> Result<Self> {
        let type_name = match map.get(TYPE_KEY) {
            Some(Value::String(name)) => name.clone(),
            Some(other) => bail!("`{TYPE_KEY}` must be a string, found {}", kind(other)),
            None => default_type.to_owned(),
        };

        let fields = map
            .iter()
            .filter(|(name, _)| name.as_str() != TYPE_KEY)
            .map(|(name, value)| {
                let field = FieldValue::from_json(name, value)
                    .with_context(|| format!("field `{name}` of `{type_name}`"))?;
                Ok((name.clone(), field))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { type_name, fields })
    }
}

impl FieldValue {
    fn from_json(name: &str, value: &Value) -> Result<Self> {
        Ok(match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => i32::try_from(i).map_or(Self::Long(i), Self::Int),
                None => Self::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::String(s.clone()),
            Value::Array(items) => Self::from_array(items)?,
            Value::Object(map) => Self::Object(JsonObject::from_map(map, name)?),
        })
    }

    fn from_array(items: &[Value]) -> Result<Self> {
        if items.iter().all(|v| v.is_string() || v.is_null()) {
            return Ok(Self::StringArray(
                items.iter().map(|v| v.as_str().map(str::to_owned)).collect(),
            ));
        }
        if let Some(values) = items.iter().map(Value::as_bool).collect::<Option<Vec<_>>>() {
            return Ok(Self::BoolArray(values));
        }
        if let Some(values) = items.iter().map(Value::as_i64).collect::<Option<Vec<_>>>() {
            return Ok(Self::LongArray(values));
        }
        if let Some(values) = items.iter().map(Value::as_f64).collect::<Option<Vec<_>>>() {
            return Ok(Self::DoubleArray(values));
        }
        bail!("array mixes element types, or holds objects or arrays")
    }
}

impl BinaryType for JsonObject {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn write_binary(&self, writer: &mut BinaryWriter<'_, '_>) -> BinaryResult<()> {
        for (name, value) in &self.fields {
            match value {
                FieldValue::Null => writer.write_null(name)?,
                FieldValue::Bool(v) => writer.write_bool(name, *v)?,
                FieldValue::Int(v) => writer.write_i32(name, *v)?,
                FieldValue::Long(v) => writer.write_i64(name, *v)?,
                FieldValue::Double(v) => writer.write_f64(name, *v)?,
                FieldValue::String(v) => writer.write_string(name, Some(v.as_str()))?,
                FieldValue::BoolArray(v) => writer.write_bool_array(name, v)?,
                FieldValue::LongArray(v) => writer.write_i64_array(name, v)?,
                FieldValue::DoubleArray(v) => writer.write_f64_array(name, v)?,
                FieldValue::StringArray(items) => {
                    let mut array = writer.write_string_array(name)?;
                    for item in items {
                        array.write(item.as_deref())?;
                    }
                    array.close()?;
                }
                FieldValue::Object(object) => writer.write_object(name, Some(object))?,
            }
        }
        Ok(())
    }
}

/// Parse a document holding one object or an array of objects.
pub fn parse_document(text: &str, default_type: &str) -> Result<Vec<JsonObject>> {
    let value: Value = serde_json::from_str(text).context("input is not valid JSON")?;
    match &value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                JsonObject::from_value(item, default_type).with_context(|| format!("element {i}"))
            })
            .collect(),
        other => Ok(vec![JsonObject::from_value(other, default_type)?]),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
