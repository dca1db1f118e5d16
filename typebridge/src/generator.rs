//! Generation pipeline.
//!
//! [`Generator::generate`] drives one end-to-end run: bind the requested
//! registry, gather the model schemas its signatures reach, flatten and
//! prune them, then emit banner, declarations, `RPCMethods`, and
//! `ServerToClientEvents` in that fixed order.

use indexmap::IndexMap;
use serde_json::Value;

use crate::diagnostics::{Diagnostics, Outcome};
use crate::emitter::{emit_declarations, emit_interface};
use crate::error::{GenerateError, GenerateResult};
use crate::flatten::{check_references, flatten_schemas};
use crate::surface::{BoundEvent, BoundFunction, Manifest};
use crate::type_mapper::map_type;

/// Header prepended to every generated file.
pub const BANNER: &str = "/* eslint-disable */\n/**\n * This file was automatically generated by typebridge.\n * DO NOT MODIFY IT BY HAND.\n */";

/// Options for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Registry to bind.
    pub registry: String,
    /// Event table to bind, if any.
    pub events: Option<String>,
    /// Escalate degradable diagnostics into errors.
    pub strict: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            registry: "default".to_string(),
            events: None,
            strict: false,
        }
    }
}

/// The product of a generation run.
#[derive(Debug, Clone)]
pub struct Generated {
    /// Full declaration file contents, trailing newline included.
    pub content: String,
    /// Warnings accumulated while generating.
    pub warnings: Vec<String>,
    pub outcome: Outcome,
}

/// One-registry declaration generator.
#[derive(Debug, Clone)]
pub struct Generator {
    options: GenerateOptions,
}

impl Generator {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    /// Run the full pipeline against a manifest.
    ///
    /// The diagnostics context is caller-owned so warnings raised while the
    /// manifest was being assembled land in the same run report.
    pub fn generate(&self, manifest: &Manifest, diag: &mut Diagnostics) -> GenerateResult<Generated> {
        let surface = manifest.surface(
            &self.options.registry,
            self.options.events.as_deref(),
        )?;

        let mut schemas: IndexMap<String, Value> = IndexMap::new();
        for name in surface.reachable_models() {
            match manifest.models.get(&name) {
                Some(schema) => {
                    schemas.insert(name, schema.clone());
                }
                None => diag.report(GenerateError::missing_model(name))?,
            }
        }

        let flat = flatten_schemas(&schemas, diag)?.pruned();
        check_references(&flat, diag)?;

        let mut sections = vec![BANNER.to_string()];
        if !flat.definitions.is_empty() {
            sections.push(emit_declarations(&flat, diag)?);
        }
        sections.push(emit_interface(
            "RPCMethods",
            &surface.functions,
            |function| format_rpc_method(function, &mut *diag),
        )?);
        if !surface.events.is_empty() {
            sections.push(emit_interface(
                "ServerToClientEvents",
                &surface.events,
                |event| format_event(event, &mut *diag),
            )?);
        }

        let mut content = sections.join("\n\n");
        content.push('\n');

        Ok(Generated {
            content,
            warnings: diag.warnings().to_vec(),
            outcome: diag.outcome(),
        })
    }
}

/// `name(param: T, ...): Promise<Ret>;`
fn format_rpc_method(function: &BoundFunction, diag: &mut Diagnostics) -> GenerateResult<String> {
    let params = function
        .params
        .iter()
        .map(|(name, descriptor)| Ok(format!("{name}: {}", map_type(descriptor, diag)?)))
        .collect::<GenerateResult<Vec<_>>>()?;
    let returns = map_type(&function.returns, diag)?;
    Ok(format!(
        "{}({}): Promise<{returns}>;",
        function.name,
        params.join(", ")
    ))
}

/// `'name': (payload: T) => void;`
fn format_event(event: &BoundEvent, diag: &mut Diagnostics) -> GenerateResult<String> {
    let payload = map_type(&event.payload, diag)?;
    Ok(format!("'{}': (payload: {payload}) => void;", event.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest() -> Manifest {
        serde_json::from_value(json!({
            "registries": {
                "api": {
                    "functions": [
                        {
                            "name": "get_user",
                            "params": [{"name": "user_id", "annotation": "int"}],
                            "returns": "User",
                        },
                        {
                            "name": "rename",
                            "params": [
                                {"name": "user_id", "annotation": "int"},
                                {"name": "nickname", "annotation": "Optional[str]"},
                            ],
                            "returns": "None",
                        },
                    ],
                },
                "bare": {"functions": [{"name": "ping", "params": [], "returns": "str"}]},
            },
            "event_tables": {
                "push": {"user_updated": "User"},
            },
            "models": {
                "User": {
                    "title": "User",
                    "type": "object",
                    "properties": {
                        "id": {"type": "integer"},
                        "nickname": {"anyOf": [{"type": "string"}, {"type": "null"}]},
                    },
                    "required": ["id", "nickname"],
                },
            },
        }))
        .unwrap()
    }

    fn run(options: GenerateOptions) -> Generated {
        let mut diag = Diagnostics::new(options.strict);
        Generator::new(options).generate(&manifest(), &mut diag).unwrap()
    }

    #[test]
    fn test_generate_full_output_order() {
        let generated = run(GenerateOptions {
            registry: "api".to_string(),
            events: Some("push".to_string()),
            strict: true,
        });

        let expected = "\
/* eslint-disable */
/**
 * This file was automatically generated by typebridge.
 * DO NOT MODIFY IT BY HAND.
 */

export interface User {
  id: number;
  nickname: string | null;
}

export interface RPCMethods {
  get_user(user_id: number): Promise<User>;
  rename(user_id: number, nickname: string | null): Promise<null>;
}

export interface ServerToClientEvents {
  'user_updated': (payload: User) => void;
}
";
        assert_eq!(generated.content, expected);
        assert_eq!(generated.outcome, Outcome::Success);
    }

    #[test]
    fn test_generate_omits_empty_sections() {
        let generated = run(GenerateOptions {
            registry: "bare".to_string(),
            events: None,
            strict: true,
        });

        assert!(!generated.content.contains("ServerToClientEvents"));
        assert!(!generated.content.contains("export interface User"));
        assert!(generated.content.contains("ping(): Promise<string>;"));
    }

    #[test]
    fn test_generate_hoists_nested_model_definitions() {
        let manifest: Manifest = serde_json::from_value(json!({
            "registries": {
                "api": {
                    "functions": [
                        {"name": "get_model", "params": [], "returns": "Model"},
                    ],
                },
            },
            "models": {
                "Model": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "number"},
                        "tags": {"type": "array", "items": {"type": "string"}},
                        "owner": {"anyOf": [{"$ref": "#/$defs/User"}, {"type": "null"}]},
                    },
                    "required": ["id", "tags", "owner"],
                    "$defs": {
                        "User": {
                            "type": "object",
                            "properties": {
                                "id": {"type": "number"},
                                "name": {"type": "string"},
                            },
                            "required": ["id", "name"],
                        },
                    },
                },
            },
        }))
        .unwrap();

        let options = GenerateOptions {
            registry: "api".to_string(),
            events: None,
            strict: true,
        };
        let mut diag = Diagnostics::new(true);
        let generated = Generator::new(options)
            .generate(&manifest, &mut diag)
            .unwrap();

        assert!(generated.content.contains("export interface Model {"));
        assert!(generated.content.contains("export interface User {"));
        assert!(generated.content.contains("  owner: User | null;"));
        assert!(generated.content.contains("  tags: string[];"));
    }

    #[test]
    fn test_generate_missing_model_degrades_to_warning() {
        let mut manifest = manifest();
        manifest.models.shift_remove("User");

        let options = GenerateOptions {
            registry: "api".to_string(),
            events: None,
            strict: false,
        };
        let mut diag = Diagnostics::new(false);
        let generated = Generator::new(options)
            .generate(&manifest, &mut diag)
            .unwrap();

        assert_eq!(generated.outcome, Outcome::SuccessWithWarnings);
        // The name still appears in signatures even without a declaration.
        assert!(generated.content.contains("Promise<User>"));
    }

    #[test]
    fn test_generate_missing_model_fails_in_strict_mode() {
        let mut manifest = manifest();
        manifest.models.shift_remove("User");

        let options = GenerateOptions {
            registry: "api".to_string(),
            events: None,
            strict: true,
        };
        let mut diag = Diagnostics::new(true);
        let err = Generator::new(options)
            .generate(&manifest, &mut diag)
            .unwrap_err();

        assert!(matches!(err, GenerateError::MissingModel { .. }));
    }

    #[test]
    fn test_generate_unknown_registry_is_fatal() {
        let options = GenerateOptions {
            registry: "nope".to_string(),
            events: None,
            strict: false,
        };
        let mut diag = Diagnostics::new(false);
        let err = Generator::new(options)
            .generate(&manifest(), &mut diag)
            .unwrap_err();

        assert!(matches!(err, GenerateError::MissingRegistry { .. }));
    }
}
