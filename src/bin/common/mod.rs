// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context as _};
use serde_json::{Map, Number, Value as Json};

use cdrcodec::{CdrCodec, CdrValue, CodecOptions, DecodedRecord, ElementType, Shape};

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Load a JSON shape file.
pub fn load_shape(path: &Path) -> CliResult<Shape> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read shape file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid shape file {}", path.display()))
}

/// Build a codec from an optional TOML options file.
pub fn load_codec(options: Option<&Path>) -> CliResult<CdrCodec> {
    let options = match options {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read options file {}", path.display()))?;
            CodecOptions::from_toml_str(&text)?
        }
        None => CodecOptions::default(),
    };
    Ok(CdrCodec::with_options(options)?)
}

/// Read an argument that is either inline text or `@path`.
pub fn read_text_arg(arg: &str) -> CliResult<String> {
    match arg.strip_prefix('@') {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))
        }
        None => Ok(arg.to_string()),
    }
}

/// Read a payload that is either hex text or `@path` to a binary file.
///
/// Whitespace in hex text is ignored.
pub fn read_payload(arg: &str) -> CliResult<Vec<u8>> {
    match arg.strip_prefix('@') {
        Some(path) => fs::read(path).with_context(|| format!("Failed to read {path}")),
        None => {
            let digits: String = arg.chars().filter(|c| !c.is_whitespace()).collect();
            hex::decode(&digits).context("Payload is not valid hex")
        }
    }
}

/// Convert plain JSON into a [`CdrValue`] guided by `shape`.
///
/// Numbers are kept at 64 bits; the codec narrows them to the declared
/// width and rejects values that do not fit. Blobs accept a hex string or
/// an array of bytes.
pub fn json_to_value(json: &Json, shape: &Shape) -> CliResult<CdrValue> {
    if json.is_null() {
        return Ok(CdrValue::Null);
    }
    let value = match shape {
        Shape::Bool => CdrValue::Bool(
            json.as_bool()
                .ok_or_else(|| anyhow!("Expected a boolean, found {json}"))?,
        ),
        Shape::Integer(_) => json_integer(json)?,
        Shape::Float(_) => CdrValue::Float64(
            json.as_f64()
                .ok_or_else(|| anyhow!("Expected a number, found {json}"))?,
        ),
        Shape::String => CdrValue::String(
            json.as_str()
                .ok_or_else(|| anyhow!("Expected a string, found {json}"))?
                .to_string(),
        ),
        Shape::Bytes => CdrValue::Bytes(json_bytes(json)?),
        Shape::FixedArray(element, _) | Shape::DynamicArray(element) => {
            json_array(json, &element.to_shape())?
        }
        Shape::Sequence(element) => json_array(json, element)?,
        Shape::Record(record) => {
            let object = json
                .as_object()
                .ok_or_else(|| anyhow!("Expected an object for {}, found {json}", record.name()))?;
            if let Some(unknown) = object.keys().find(|k| record.field_by_name(k).is_none()) {
                bail!("Record {} has no field '{unknown}'", record.name());
            }
            let mut fields = DecodedRecord::with_capacity(object.len());
            for field in record.fields() {
                if let Some(field_json) = object.get(&*field.name) {
                    let field_value = json_to_value(field_json, &field.shape)
                        .with_context(|| format!("In field '{}'", field.name))?;
                    fields.insert(field.name.to_string(), field_value);
                }
            }
            CdrValue::Struct(fields)
        }
    };
    Ok(value)
}

fn json_integer(json: &Json) -> CliResult<CdrValue> {
    if let Some(v) = json.as_i64() {
        return Ok(CdrValue::Int64(v));
    }
    if let Some(v) = json.as_u64() {
        return Ok(CdrValue::UInt64(v));
    }
    bail!("Expected an integer, found {json}")
}

fn json_bytes(json: &Json) -> CliResult<Vec<u8>> {
    match json {
        Json::String(text) => hex::decode(text).context("Blob string is not valid hex"),
        Json::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| anyhow!("Expected a byte, found {item}"))
            })
            .collect(),
        other => bail!("Expected a hex string or byte array, found {other}"),
    }
}

fn json_array(json: &Json, element: &Shape) -> CliResult<CdrValue> {
    let items = json
        .as_array()
        .ok_or_else(|| anyhow!("Expected an array, found {json}"))?;
    let values = items
        .iter()
        .enumerate()
        .map(|(i, item)| json_to_value(item, element).with_context(|| format!("In element {i}")))
        .collect::<CliResult<Vec<_>>>()?;
    Ok(CdrValue::Array(values))
}

/// Convert a [`CdrValue`] into plain JSON.
///
/// Blobs become hex strings; non-finite floats become `null`.
pub fn value_to_json(value: &CdrValue) -> Json {
    match value {
        CdrValue::Bool(v) => Json::Bool(*v),
        CdrValue::Int8(v) => Json::from(*v),
        CdrValue::Int16(v) => Json::from(*v),
        CdrValue::Int32(v) => Json::from(*v),
        CdrValue::Int64(v) => Json::from(*v),
        CdrValue::UInt8(v) => Json::from(*v),
        CdrValue::UInt16(v) => Json::from(*v),
        CdrValue::UInt32(v) => Json::from(*v),
        CdrValue::UInt64(v) => Json::from(*v),
        CdrValue::Float32(v) => float_json(f64::from(*v)),
        CdrValue::Float64(v) => float_json(*v),
        CdrValue::String(v) => Json::String(v.clone()),
        CdrValue::Bytes(v) => Json::String(hex::encode(v)),
        CdrValue::Array(items) => Json::Array(items.iter().map(value_to_json).collect()),
        CdrValue::Struct(fields) => {
            let mut object = Map::new();
            for (name, field) in fields {
                object.insert(name.clone(), value_to_json(field));
            }
            Json::Object(object)
        }
        CdrValue::Null => Json::Null,
    }
}

fn float_json(v: f64) -> Json {
    Number::from_f64(v).map_or(Json::Null, Json::Number)
}

/// One-line description of an array element kind.
pub fn describe_element(element: ElementType) -> String {
    match element.size() {
        Some(size) => format!("{element} ({size} bytes, aligned to {})", element.alignment()),
        None => format!("{element} (counted per element)"),
    }
}
