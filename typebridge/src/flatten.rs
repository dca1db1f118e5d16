//! Structural schema normalization.
//!
//! Raw model schemas arrive with nested, locally-scoped `$defs` sections and
//! `#/$defs/` references. [`flatten_schemas`] hoists every nested definition
//! into one global definitions table and rewrites all references to the
//! global namespace, so that any reference chain starting from the
//! properties table terminates inside the definitions table without
//! re-entering a local scope. [`prune_titles`] then strips display-name
//! hints from everything that is not itself a structural object definition,
//! which keeps the declaration emitter from inventing aliases for inlined
//! scalars.

use indexmap::IndexMap;
use serde_json::Value;

use crate::diagnostics::Diagnostics;
use crate::error::{GenerateError, GenerateResult};

/// Key of the locally-scoped definitions section in raw schemas.
const LOCAL_DEFS_KEY: &str = "$defs";

/// Reference prefix into a locally-scoped definitions section.
const LOCAL_REF_PREFIX: &str = "#/$defs/";

/// Reference prefix into the flat, global definitions table.
pub const GLOBAL_REF_PREFIX: &str = "#/definitions/";

/// The normalizer's output: one global definitions table plus a properties
/// table, both fully rewritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatSchema {
    /// Model and hoisted auxiliary definitions, in first-seen order.
    pub definitions: IndexMap<String, Value>,
    /// Root model name to its rewritten definition.
    pub properties: IndexMap<String, Value>,
}

/// Flatten raw per-model schemas into a [`FlatSchema`].
///
/// Auxiliary definitions nested under a root are lifted into the global
/// table under their own names; the first writer wins per name, and a later
/// structurally different definition records a collision diagnostic.
pub fn flatten_schemas(
    schemas: &IndexMap<String, Value>,
    diag: &mut Diagnostics,
) -> GenerateResult<FlatSchema> {
    let mut definitions: IndexMap<String, Value> = IndexMap::new();

    for (name, schema) in schemas {
        insert_definition(&mut definitions, name, rewrite_refs(schema), diag)?;

        if let Some(local_defs) = schema.get(LOCAL_DEFS_KEY).and_then(Value::as_object) {
            for (def_name, def_schema) in local_defs {
                insert_definition(&mut definitions, def_name, rewrite_refs(def_schema), diag)?;
            }
        }
    }

    let mut properties = IndexMap::new();
    for (name, schema) in schemas {
        properties.insert(name.clone(), rewrite_refs(schema));
    }

    Ok(FlatSchema {
        definitions,
        properties,
    })
}

/// First-writer-wins insertion with a collision diagnostic for
/// structurally different redeclarations.
fn insert_definition(
    definitions: &mut IndexMap<String, Value>,
    name: &str,
    definition: Value,
    diag: &mut Diagnostics,
) -> GenerateResult<()> {
    match definitions.get(name) {
        None => {
            definitions.insert(name.to_string(), definition);
        }
        Some(existing) if *existing == definition => {}
        Some(_) => diag.report(GenerateError::definition_collision(name))?,
    }
    Ok(())
}

/// Pure recursive rewrite: drop every local definitions section and repoint
/// each local reference at the global table. Objects are walked key-by-key,
/// arrays element-wise, scalars pass through unchanged.
pub fn rewrite_refs(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (key, val) in map {
                if key == LOCAL_DEFS_KEY {
                    continue;
                }
                if key == "$ref" {
                    if let Some(leaf) = val.as_str().and_then(|p| p.strip_prefix(LOCAL_REF_PREFIX))
                    {
                        out.insert(
                            key.clone(),
                            Value::String(format!("{GLOBAL_REF_PREFIX}{leaf}")),
                        );
                        continue;
                    }
                }
                out.insert(key.clone(), rewrite_refs(val));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(rewrite_refs).collect()),
        scalar => scalar.clone(),
    }
}

/// Bottom-up title pruning. Recurses into every value first, then removes a
/// `title` key unless the node also carries `properties` (a structural
/// object definition keeps its display name).
pub fn prune_titles(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out: serde_json::Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), prune_titles(v)))
                .collect();
            if !out.contains_key("properties") {
                out.remove("title");
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(prune_titles).collect()),
        scalar => scalar.clone(),
    }
}

impl FlatSchema {
    /// Apply title pruning to every entry of both tables.
    pub fn pruned(&self) -> FlatSchema {
        FlatSchema {
            definitions: self
                .definitions
                .iter()
                .map(|(k, v)| (k.clone(), prune_titles(v)))
                .collect(),
            properties: self
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), prune_titles(v)))
                .collect(),
        }
    }
}

/// Verify that every reference in both tables resolves inside the global
/// definitions table. Dangling references are diagnostics (fatal in strict
/// mode).
pub fn check_references(flat: &FlatSchema, diag: &mut Diagnostics) -> GenerateResult<()> {
    let mut references = Vec::new();
    for value in flat.properties.values().chain(flat.definitions.values()) {
        collect_refs(value, &mut references);
    }

    for reference in references {
        let resolved = reference
            .strip_prefix(GLOBAL_REF_PREFIX)
            .is_some_and(|leaf| flat.definitions.contains_key(leaf));
        if !resolved {
            diag.report(GenerateError::dangling_reference(reference))?;
        }
    }
    Ok(())
}

/// Collect every `$ref` value in the tree.
fn collect_refs(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                if key == "$ref" {
                    if let Some(path) = val.as_str() {
                        out.push(path.to_string());
                    }
                } else {
                    collect_refs(val, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_refs(item, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schemas(entries: &[(&str, Value)]) -> IndexMap<String, Value> {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_flatten_hoists_nested_definitions() {
        let raw = schemas(&[(
            "TopLevelModel",
            json!({
                "$defs": {
                    "NestedModel": {
                        "title": "NestedModel",
                        "type": "object",
                        "properties": {"id": {"type": "integer"}},
                        "required": ["id"],
                    }
                },
                "title": "TopLevelModel",
                "type": "object",
                "properties": {"nested": {"$ref": "#/$defs/NestedModel"}},
                "required": ["nested"],
            }),
        )]);

        let mut diag = Diagnostics::new(false);
        let flat = flatten_schemas(&raw, &mut diag).unwrap();

        assert!(flat.definitions.contains_key("TopLevelModel"));
        assert!(flat.definitions.contains_key("NestedModel"));
        assert_eq!(
            flat.properties["TopLevelModel"]["properties"]["nested"]["$ref"],
            json!("#/definitions/NestedModel")
        );
        // No local scope survives anywhere in the output.
        assert!(flat.definitions["TopLevelModel"].get("$defs").is_none());
    }

    #[test]
    fn test_flatten_already_flat_schema_is_identity() {
        let raw = schemas(&[(
            "User",
            json!({
                "title": "User",
                "type": "object",
                "properties": {"id": {"type": "integer"}},
                "required": ["id"],
            }),
        )]);

        let mut diag = Diagnostics::new(false);
        let flat = flatten_schemas(&raw, &mut diag).unwrap();

        assert_eq!(flat.definitions["User"], raw["User"]);
        assert_eq!(flat.properties["User"], raw["User"]);
        assert!(!diag.warnings_occurred());
    }

    #[test]
    fn test_flatten_first_writer_wins_on_identical_collision() {
        let aux = json!({"type": "object", "properties": {"x": {"type": "string"}}});
        let raw = schemas(&[
            ("A", json!({"$defs": {"Shared": aux.clone()}, "type": "object", "properties": {}})),
            ("B", json!({"$defs": {"Shared": aux}, "type": "object", "properties": {}})),
        ]);

        let mut diag = Diagnostics::new(false);
        let flat = flatten_schemas(&raw, &mut diag).unwrap();

        assert!(flat.definitions.contains_key("Shared"));
        assert!(!diag.warnings_occurred());
    }

    #[test]
    fn test_flatten_warns_on_structural_collision() {
        let raw = schemas(&[
            (
                "A",
                json!({"$defs": {"Shared": {"type": "string"}}, "type": "object", "properties": {}}),
            ),
            (
                "B",
                json!({"$defs": {"Shared": {"type": "integer"}}, "type": "object", "properties": {}}),
            ),
        ]);

        let mut diag = Diagnostics::new(false);
        let flat = flatten_schemas(&raw, &mut diag).unwrap();

        // First writer wins.
        assert_eq!(flat.definitions["Shared"], json!({"type": "string"}));
        assert!(diag.warnings_occurred());
    }

    #[test]
    fn test_rewrite_refs_walks_arrays() {
        let value = json!({
            "anyOf": [{"$ref": "#/$defs/User"}, {"type": "null"}],
        });

        let rewritten = rewrite_refs(&value);

        assert_eq!(
            rewritten["anyOf"][0]["$ref"],
            json!("#/definitions/User")
        );
        assert_eq!(rewritten["anyOf"][1], json!({"type": "null"}));
    }

    #[test]
    fn test_prune_titles_keeps_model_titles_only() {
        let value = json!({
            "title": "User",
            "type": "object",
            "properties": {
                "tags": {"title": "Tags", "type": "array", "items": {"type": "string"}},
            },
        });

        let pruned = prune_titles(&value);

        assert_eq!(pruned["title"], json!("User"));
        assert!(pruned["properties"]["tags"].get("title").is_none());
    }

    #[test]
    fn test_check_references_accepts_resolved() {
        let raw = schemas(&[(
            "Model",
            json!({
                "$defs": {"User": {"type": "object", "properties": {}}},
                "type": "object",
                "properties": {"owner": {"$ref": "#/$defs/User"}},
            }),
        )]);

        let mut diag = Diagnostics::new(false);
        let flat = flatten_schemas(&raw, &mut diag).unwrap();
        check_references(&flat, &mut diag).unwrap();

        assert!(!diag.warnings_occurred());
    }

    #[test]
    fn test_check_references_reports_dangling() {
        let raw = schemas(&[(
            "Model",
            json!({
                "type": "object",
                "properties": {"owner": {"$ref": "#/$defs/Ghost"}},
            }),
        )]);

        let mut diag = Diagnostics::new(false);
        let flat = flatten_schemas(&raw, &mut diag).unwrap();
        check_references(&flat, &mut diag).unwrap();

        assert!(diag.warnings_occurred());

        let mut strict = Diagnostics::new(true);
        let result = check_references(&flat, &mut strict);
        assert!(matches!(
            result,
            Err(GenerateError::DanglingReference { .. })
        ));
    }
}
