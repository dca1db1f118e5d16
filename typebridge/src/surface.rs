//! Surface manifest model.
//!
//! A manifest is the JSON export of an RPC surface: named registries of
//! callable functions, named event tables, and the JSON Schemas of the
//! models those signatures mention. [`Manifest::surface`] binds one
//! registry (and optionally one event table) into an [`RpcSurface`] whose
//! annotations are parsed into [`TypeDescriptor`]s exactly once.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::diagnostics::Diagnostics;
use crate::error::{GenerateError, GenerateResult};
use crate::ir::TypeDescriptor;
use crate::parser::parse_annotation;

/// Top-level manifest document. All sections are optional so partial
/// manifests merge cleanly.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Manifest {
    #[serde(default)]
    pub registries: IndexMap<String, Registry>,
    #[serde(default)]
    pub event_tables: IndexMap<String, IndexMap<String, String>>,
    #[serde(default)]
    pub models: IndexMap<String, Value>,
}

/// One registry of exposed functions, in registration order.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Registry {
    #[serde(default)]
    pub functions: Vec<FunctionSig>,
}

/// A single exposed function signature, annotations still textual.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FunctionSig {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    pub returns: String,
}

/// A named, annotated parameter.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Param {
    pub name: String,
    pub annotation: String,
}

/// A registry bound for generation: annotations parsed, event table
/// resolved.
#[derive(Debug, Clone)]
pub struct RpcSurface {
    pub functions: Vec<BoundFunction>,
    pub events: Vec<BoundEvent>,
}

#[derive(Debug, Clone)]
pub struct BoundFunction {
    pub name: String,
    pub params: Vec<(String, TypeDescriptor)>,
    pub returns: TypeDescriptor,
}

#[derive(Debug, Clone)]
pub struct BoundEvent {
    pub name: String,
    pub payload: TypeDescriptor,
}

impl Manifest {
    /// Bind the named registry, and the named event table if requested.
    /// A missing registry or event table is fatal rather than degradable.
    pub fn surface(&self, registry: &str, events: Option<&str>) -> GenerateResult<RpcSurface> {
        let registry = self
            .registries
            .get(registry)
            .ok_or_else(|| GenerateError::missing_registry(registry))?;

        let functions = registry
            .functions
            .iter()
            .map(|sig| BoundFunction {
                name: sig.name.clone(),
                params: sig
                    .params
                    .iter()
                    .map(|p| (p.name.clone(), parse_annotation(&p.annotation)))
                    .collect(),
                returns: parse_annotation(&sig.returns),
            })
            .collect();

        let events = match events {
            Some(table) => {
                let table = self
                    .event_tables
                    .get(table)
                    .ok_or_else(|| GenerateError::missing_event_table(table))?;
                table
                    .iter()
                    .map(|(name, annotation)| BoundEvent {
                        name: name.clone(),
                        payload: parse_annotation(annotation),
                    })
                    .collect()
            }
            None => Vec::new(),
        };

        Ok(RpcSurface { functions, events })
    }

    /// Fold another manifest into this one.
    ///
    /// Registries concatenate their function lists, event tables extend
    /// entry-wise, and models are last-write-wins. Redefining a model with
    /// a structurally different schema is reported as a diagnostic.
    pub fn merge(&mut self, other: Manifest, diag: &mut Diagnostics) -> GenerateResult<()> {
        for (name, registry) in other.registries {
            self.registries
                .entry(name)
                .or_default()
                .functions
                .extend(registry.functions);
        }
        for (name, table) in other.event_tables {
            self.event_tables.entry(name).or_default().extend(table);
        }
        for (name, schema) in other.models {
            if let Some(existing) = self.models.get(&name) {
                if *existing != schema {
                    diag.report(GenerateError::definition_collision(&name))?;
                }
            }
            self.models.insert(name, schema);
        }
        Ok(())
    }
}

impl RpcSurface {
    /// Model names mentioned anywhere in the bound signatures, first-seen
    /// order.
    pub fn reachable_models(&self) -> IndexSet<String> {
        let mut names = IndexSet::new();
        for function in &self.functions {
            for (_, descriptor) in &function.params {
                descriptor.collect_named(&mut names);
            }
            function.returns.collect_named(&mut names);
        }
        for event in &self.events {
            event.payload.collect_named(&mut names);
        }
        names
    }
}
