//! TypeScript declaration emission.
//!
//! Two concerns live here:
//!
//! - [`emit_declarations`]: the in-process renderer that turns a
//!   [`FlatSchema`] into `export interface` / `export type` declarations,
//!   one per entry of the flat definitions table.
//! - [`emit_interface`]: the generic block assembler used for the
//!   `RPCMethods` and `ServerToClientEvents` interfaces, with the line
//!   formatter supplied per call site.

use std::collections::HashSet;

use serde_json::Value;

use crate::diagnostics::Diagnostics;
use crate::error::{GenerateError, GenerateResult};
use crate::flatten::{FlatSchema, GLOBAL_REF_PREFIX};

/// Render every definition of a flat schema, in insertion order, separated
/// by blank lines.
pub fn emit_declarations(flat: &FlatSchema, diag: &mut Diagnostics) -> GenerateResult<String> {
    let mut blocks = Vec::with_capacity(flat.definitions.len());
    for (name, definition) in &flat.definitions {
        blocks.push(emit_definition(name, definition, diag)?);
    }
    Ok(blocks.join("\n\n"))
}

/// Render one named definition: an interface for object definitions with
/// named fields, a type alias for everything else.
fn emit_definition(name: &str, definition: &Value, diag: &mut Diagnostics) -> GenerateResult<String> {
    let fields = definition.get("properties").and_then(Value::as_object);

    if let Some(fields) = fields {
        let required: HashSet<&str> = definition
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut lines = Vec::with_capacity(fields.len() + 2);
        lines.push(format!("export interface {name} {{"));
        for (field, field_schema) in fields {
            let marker = if required.contains(field.as_str()) { "" } else { "?" };
            let ty = render_type(field_schema, diag)?;
            lines.push(format!("  {field}{marker}: {ty};"));
        }
        lines.push("}".to_string());
        return Ok(lines.join("\n"));
    }

    Ok(format!(
        "export type {name} = {};",
        render_type(definition, diag)?
    ))
}

/// Render a schema node as a TypeScript type expression.
pub fn render_type(schema: &Value, diag: &mut Diagnostics) -> GenerateResult<String> {
    let map = match schema {
        Value::Object(map) => map,
        // `additionalProperties: true` style boolean schemas.
        Value::Bool(_) => return Ok("any".to_string()),
        other => {
            diag.report(GenerateError::unresolved_type(other.to_string()))?;
            return Ok("any".to_string());
        }
    };

    if let Some(path) = map.get("$ref").and_then(Value::as_str) {
        return Ok(ref_leaf(path).to_string());
    }
    if let Some(value) = map.get("const") {
        return Ok(render_literal(value));
    }
    if let Some(values) = map.get("enum").and_then(Value::as_array) {
        return Ok(join_union(values.iter().map(render_literal).collect()));
    }
    if let Some(members) = map
        .get("anyOf")
        .or_else(|| map.get("oneOf"))
        .and_then(Value::as_array)
    {
        let rendered = members
            .iter()
            .map(|member| render_type(member, diag))
            .collect::<GenerateResult<Vec<_>>>()?;
        return Ok(join_union(rendered));
    }

    match map.get("type") {
        Some(Value::String(ty)) => render_typed(ty, map, diag),
        Some(Value::Array(types)) => {
            let rendered = types
                .iter()
                .filter_map(Value::as_str)
                .map(|ty| render_typed(ty, map, diag))
                .collect::<GenerateResult<Vec<_>>>()?;
            Ok(join_union(rendered))
        }
        _ if map.is_empty() => Ok("any".to_string()),
        _ => {
            let repr = Value::Object(map.clone()).to_string();
            diag.report(GenerateError::unresolved_type(repr))?;
            Ok("any".to_string())
        }
    }
}

/// Render a node whose `type` keyword is known.
fn render_typed(
    ty: &str,
    map: &serde_json::Map<String, Value>,
    diag: &mut Diagnostics,
) -> GenerateResult<String> {
    match ty {
        "string" => Ok("string".to_string()),
        "integer" | "number" => Ok("number".to_string()),
        "boolean" => Ok("boolean".to_string()),
        "null" => Ok("null".to_string()),
        "array" => {
            let item = match map.get("items") {
                Some(items) => render_type(items, diag)?,
                None => "any".to_string(),
            };
            if item.contains(" | ") {
                Ok(format!("({item})[]"))
            } else {
                Ok(format!("{item}[]"))
            }
        }
        "object" => render_object(map, diag),
        other => {
            diag.report(GenerateError::unresolved_type(other))?;
            Ok("any".to_string())
        }
    }
}

/// Render an inline object node.
fn render_object(
    map: &serde_json::Map<String, Value>,
    diag: &mut Diagnostics,
) -> GenerateResult<String> {
    if let Some(fields) = map.get("properties").and_then(Value::as_object) {
        let required: HashSet<&str> = map
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut entries = Vec::with_capacity(fields.len());
        for (field, field_schema) in fields {
            let marker = if required.contains(field.as_str()) { "" } else { "?" };
            entries.push(format!(
                "{field}{marker}: {}",
                render_type(field_schema, diag)?
            ));
        }
        return Ok(format!("{{ {} }}", entries.join("; ")));
    }

    match map.get("additionalProperties") {
        Some(Value::Bool(false)) => Ok("{}".to_string()),
        Some(Value::Bool(true)) | None => Ok("{ [key: string]: any }".to_string()),
        Some(schema) => Ok(format!(
            "{{ [key: string]: {} }}",
            render_type(schema, diag)?
        )),
    }
}

/// Render a JSON literal as a TypeScript literal type.
fn render_literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Join union members, de-duplicating by rendered text in first-seen order;
/// a single survivor is returned unwrapped.
fn join_union(members: Vec<String>) -> String {
    let mut unique: Vec<String> = Vec::new();
    for member in members {
        if !unique.contains(&member) {
            unique.push(member);
        }
    }
    if unique.len() == 1 {
        unique.remove(0)
    } else {
        unique.join(" | ")
    }
}

/// Leaf name of a reference path.
fn ref_leaf(path: &str) -> &str {
    path.strip_prefix(GLOBAL_REF_PREFIX)
        .or_else(|| path.rsplit('/').next())
        .unwrap_or(path)
}

/// Wrap formatted lines in a named `export interface` block.
///
/// The formatter is supplied per call site; malformed input is a programmer
/// error there, not a runtime condition here.
pub fn emit_interface<T>(
    name: &str,
    items: &[T],
    mut formatter: impl FnMut(&T) -> GenerateResult<String>,
) -> GenerateResult<String> {
    let mut lines = Vec::with_capacity(items.len() + 2);
    lines.push(format!("export interface {name} {{"));
    for item in items {
        lines.push(format!("  {}", formatter(item)?));
    }
    lines.push("}".to_string());
    Ok(lines.join("\n"))
}
