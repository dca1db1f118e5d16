//! Intermediate representation of the bridged type grammar.
//!
//! A [`TypeDescriptor`] is produced once, at the boundary where a textual
//! Python annotation is first observed (see [`crate::parser`]), and is the
//! only shape the type mapper ever dispatches on. Shape sniffing of raw
//! annotation text never happens past that boundary.

use indexmap::IndexSet;

/// Primitive kinds with a fixed TypeScript mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// `int`, mapped to `number`.
    Int,
    /// `float`, mapped to `number`; the integer/float distinction is dropped.
    Float,
    /// `str`, mapped to `string`.
    Str,
    /// `bool`, mapped to `boolean`.
    Bool,
    /// `None` or `NoneType`, mapped to `null`.
    NoneType,
    /// `Any`, mapped to `any`.
    Any,
}

/// A parsed type annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// One of the fixed primitive kinds.
    Primitive(PrimitiveKind),
    /// `list[T]` / `List[T]`.
    List(Box<TypeDescriptor>),
    /// `dict[K, V]` / `Dict[K, V]`.
    Dict(Box<TypeDescriptor>, Box<TypeDescriptor>),
    /// `set[T]` / `Set[T]`.
    Set(Box<TypeDescriptor>),
    /// `Union[..]`, `Optional[..]`, or pipe-syntax unions; order-preserving.
    Union(Vec<TypeDescriptor>),
    /// A reference to a named structural model.
    Named(String),
    /// Anything the parser could not classify, carrying the original text.
    Unresolved(String),
}

impl TypeDescriptor {
    /// Collect every named-model reference in this descriptor, depth-first,
    /// preserving first-seen order.
    pub fn collect_named(&self, out: &mut IndexSet<String>) {
        match self {
            TypeDescriptor::Primitive(_) | TypeDescriptor::Unresolved(_) => {}
            TypeDescriptor::List(inner) | TypeDescriptor::Set(inner) => inner.collect_named(out),
            TypeDescriptor::Dict(key, value) => {
                key.collect_named(out);
                value.collect_named(out);
            }
            TypeDescriptor::Union(members) => {
                for member in members {
                    member.collect_named(out);
                }
            }
            TypeDescriptor::Named(name) => {
                out.insert(name.clone());
            }
        }
    }
}
