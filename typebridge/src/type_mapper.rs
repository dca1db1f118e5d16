//! Descriptor to TypeScript type mapping.
//!
//! # Type mappings
//!
//! | Annotation | TypeScript |
//! |------------|------------|
//! | `int`, `float` | `number` |
//! | `str` | `string` |
//! | `bool` | `boolean` |
//! | `None` | `null` |
//! | `Any` | `any` |
//! | `list[T]` | `T[]` |
//! | `dict[K, V]` | `{ [key: K]: V }` |
//! | `set[T]` | `Set<T>` |
//! | `Union[A, B]`, `A \| B` | `A \| B` |
//! | named model | the model name |
//! | anything else | `any`, with a diagnostic |
//!
//! The mapper is total over the descriptor variants: an unresolved input
//! degrades to the `any` fallback instead of aborting, so one bad type never
//! blocks translation of the rest of the surface. Strict mode is the single
//! exception; there the diagnostic escalates before the fallback is used.

use crate::diagnostics::Diagnostics;
use crate::error::{GenerateError, GenerateResult};
use crate::ir::{PrimitiveKind, TypeDescriptor};

/// Map a descriptor to its TypeScript type expression.
pub fn map_type(descriptor: &TypeDescriptor, diag: &mut Diagnostics) -> GenerateResult<String> {
    match descriptor {
        TypeDescriptor::Primitive(kind) => Ok(primitive_ts(*kind).to_string()),
        TypeDescriptor::List(element) => {
            let element = map_type(element, diag)?;
            // Union elements need parentheses; `A | B[]` binds the array
            // suffix to the last member only.
            if element.contains(" | ") {
                Ok(format!("({element})[]"))
            } else {
                Ok(format!("{element}[]"))
            }
        }
        TypeDescriptor::Dict(key, value) => Ok(format!(
            "{{ [key: {}]: {} }}",
            map_type(key, diag)?,
            map_type(value, diag)?
        )),
        TypeDescriptor::Set(element) => Ok(format!("Set<{}>", map_type(element, diag)?)),
        TypeDescriptor::Union(members) => map_union(members, diag),
        TypeDescriptor::Named(name) => Ok(name.clone()),
        TypeDescriptor::Unresolved(repr) => {
            diag.report(GenerateError::unresolved_type(repr))?;
            Ok("any".to_string())
        }
    }
}

/// Fixed primitive lookup table.
const fn primitive_ts(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Int | PrimitiveKind::Float => "number",
        PrimitiveKind::Str => "string",
        PrimitiveKind::Bool => "boolean",
        PrimitiveKind::NoneType => "null",
        PrimitiveKind::Any => "any",
    }
}

/// Map union members, de-duplicating by mapped text in first-seen order.
/// A single surviving member is returned unwrapped.
fn map_union(members: &[TypeDescriptor], diag: &mut Diagnostics) -> GenerateResult<String> {
    let mut unique: Vec<String> = Vec::new();
    for member in members {
        let mapped = map_type(member, diag)?;
        if !unique.contains(&mapped) {
            unique.push(mapped);
        }
    }
    match unique.len() {
        0 => {
            diag.report(GenerateError::unresolved_type("Union[]"))?;
            Ok("any".to_string())
        }
        1 => Ok(unique.remove(0)),
        _ => Ok(unique.join(" | ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_annotation;

    fn map(text: &str) -> String {
        let mut diag = Diagnostics::new(false);
        map_type(&parse_annotation(text), &mut diag).unwrap()
    }

    #[test]
    fn test_primitive_lookup_is_pure() {
        for _ in 0..3 {
            assert_eq!(map("int"), "number");
            assert_eq!(map("float"), "number");
            assert_eq!(map("str"), "string");
            assert_eq!(map("bool"), "boolean");
            assert_eq!(map("None"), "null");
            assert_eq!(map("Any"), "any");
        }
    }

    #[test]
    fn test_containers() {
        assert_eq!(map("list[str]"), "string[]");
        assert_eq!(map("Dict[str, int]"), "{ [key: string]: number }");
        assert_eq!(map("Set[int]"), "Set<number>");
        assert_eq!(map("List[List[bool]]"), "boolean[][]");
    }

    #[test]
    fn test_list_of_union_is_parenthesized() {
        assert_eq!(map("list[str | int]"), "(string | number)[]");
        assert_eq!(map("List[Union[str, int]]"), "(string | number)[]");
        assert_eq!(map("list[Optional[User]]"), "(User | null)[]");
        // A collapsed single-member union needs no parentheses.
        assert_eq!(map("list[Union[int, float]]"), "number[]");
    }

    #[test]
    fn test_union_joins_members() {
        assert_eq!(map("Union[str, int]"), "string | number");
        assert_eq!(map("str | int | None"), "string | number | null");
    }

    #[test]
    fn test_union_deduplicates_by_mapped_text() {
        // int and float collapse to the same target type.
        assert_eq!(map("Union[int, float, str]"), "number | string");
        assert_eq!(map("Union[str, str, int]"), map("Union[str, int]"));
    }

    #[test]
    fn test_single_member_union_is_unwrapped() {
        assert_eq!(map("Union[int, float]"), "number");
        assert_eq!(map("Union[str]"), "string");
    }

    #[test]
    fn test_optional_maps_to_nullable_union() {
        assert_eq!(map("Optional[User]"), "User | null");
    }

    #[test]
    fn test_named_reference_maps_to_itself() {
        assert_eq!(map("User"), "User");
    }

    #[test]
    fn test_unresolved_falls_back_to_any_with_warning() {
        let mut diag = Diagnostics::new(false);
        let mapped = map_type(&parse_annotation("Callable[[int], str]"), &mut diag).unwrap();

        assert_eq!(mapped, "any");
        assert!(diag.warnings_occurred());
    }

    #[test]
    fn test_unresolved_fails_in_strict_mode() {
        let mut diag = Diagnostics::new(true);
        let result = map_type(&parse_annotation("Callable[[int], str]"), &mut diag);

        assert!(matches!(
            result,
            Err(GenerateError::UnresolvedType { .. })
        ));
    }
}
