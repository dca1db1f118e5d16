//! # typebridge
//!
//! Generate TypeScript declaration files from an exported RPC surface
//! manifest: function registries, event tables, and the JSON Schemas of the
//! models their signatures mention.
//!
//! ## Quick start
//!
//! ```rust
//! use typebridge::{Diagnostics, GenerateOptions, Generator, Manifest};
//!
//! let manifest: Manifest = serde_json::from_str(r#"{
//!     "registries": {
//!         "api": {
//!             "functions": [
//!                 {"name": "ping", "params": [], "returns": "str"}
//!             ]
//!         }
//!     }
//! }"#).unwrap();
//!
//! let generator = Generator::new(GenerateOptions {
//!     registry: "api".to_string(),
//!     events: None,
//!     strict: false,
//! });
//! let mut diag = Diagnostics::new(false);
//! let generated = generator.generate(&manifest, &mut diag).unwrap();
//! assert!(generated.content.contains("ping(): Promise<string>;"));
//! ```

pub mod diagnostics;
pub mod emitter;
pub mod error;
pub mod flatten;
pub mod generator;
pub mod ir;
pub mod parser;
pub mod surface;
pub mod type_mapper;

pub use diagnostics::{Diagnostics, Outcome};
pub use error::{GenerateError, GenerateResult};
pub use flatten::{flatten_schemas, FlatSchema};
pub use generator::{Generated, GenerateOptions, Generator, BANNER};
pub use ir::{PrimitiveKind, TypeDescriptor};
pub use parser::parse_annotation;
pub use surface::{Manifest, RpcSurface};
pub use type_mapper::map_type;
