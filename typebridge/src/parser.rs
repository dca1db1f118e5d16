//! Annotation parser: textual Python type annotations to [`TypeDescriptor`].
//!
//! This is the single recognizer for the whole source grammar. In particular,
//! both union spellings (the subscript form `Union[A, B]` / `Optional[T]`
//! and the pipe form `A | B`) are normalized to the same
//! [`TypeDescriptor::Union`] variant here, so the mapper only ever sees one
//! union representation.
//!
//! The parser is total: anything it cannot classify becomes
//! [`TypeDescriptor::Unresolved`] carrying the original text, never an error.

use crate::ir::{PrimitiveKind, TypeDescriptor};

/// Parse a textual annotation into a descriptor.
pub fn parse_annotation(text: &str) -> TypeDescriptor {
    let text = text.trim();
    if text.is_empty() {
        return TypeDescriptor::Unresolved(text.to_string());
    }

    // Pipe unions take precedence so that `str | int` and `Union[str, int]`
    // land on the same variant.
    let parts = split_top_level(text, '|');
    if parts.len() > 1 {
        return TypeDescriptor::Union(parts.into_iter().map(parse_annotation).collect());
    }

    if let Some((head, args)) = split_subscript(text) {
        return parse_subscript(head, args, text);
    }

    match text {
        "int" => TypeDescriptor::Primitive(PrimitiveKind::Int),
        "float" => TypeDescriptor::Primitive(PrimitiveKind::Float),
        "str" => TypeDescriptor::Primitive(PrimitiveKind::Str),
        "bool" => TypeDescriptor::Primitive(PrimitiveKind::Bool),
        "None" | "NoneType" => TypeDescriptor::Primitive(PrimitiveKind::NoneType),
        "Any" => TypeDescriptor::Primitive(PrimitiveKind::Any),
        // A bare container without an element descriptor stays unresolved
        // rather than defaulting to a container of anything.
        "list" | "List" | "dict" | "Dict" | "set" | "Set" => {
            TypeDescriptor::Unresolved(text.to_string())
        }
        _ if is_identifier(text) => TypeDescriptor::Named(text.to_string()),
        _ => TypeDescriptor::Unresolved(text.to_string()),
    }
}

/// Parse a subscripted annotation such as `list[str]` or `Union[str, int]`.
fn parse_subscript(head: &str, args: &str, original: &str) -> TypeDescriptor {
    let args: Vec<&str> = split_top_level(args, ',');

    match (head, args.as_slice()) {
        ("Union", members) if !members.is_empty() => {
            TypeDescriptor::Union(members.iter().map(|m| parse_annotation(m)).collect())
        }
        ("Optional", [inner]) => TypeDescriptor::Union(vec![
            parse_annotation(inner),
            TypeDescriptor::Primitive(PrimitiveKind::NoneType),
        ]),
        ("list" | "List", [element]) => {
            TypeDescriptor::List(Box::new(parse_annotation(element)))
        }
        ("dict" | "Dict", [key, value]) => TypeDescriptor::Dict(
            Box::new(parse_annotation(key)),
            Box::new(parse_annotation(value)),
        ),
        ("set" | "Set", [element]) => TypeDescriptor::Set(Box::new(parse_annotation(element))),
        _ => TypeDescriptor::Unresolved(original.to_string()),
    }
}

/// Split `Head[inner]` into `("Head", "inner")`, if the text has that shape.
fn split_subscript(text: &str) -> Option<(&str, &str)> {
    if !text.ends_with(']') {
        return None;
    }
    let open = text.find('[')?;
    let head = &text[..open];
    if !is_identifier(head) {
        return None;
    }
    Some((head, &text[open + 1..text.len() - 1]))
}

/// Split on a separator at bracket depth zero, trimming each part.
fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (index, c) in text.char_indices() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            _ if c == separator && depth == 0 => {
                parts.push(text[start..index].trim());
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts
}

/// Whether the text is a plain identifier.
fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> TypeDescriptor {
        parse_annotation(text)
    }

    #[test]
    fn test_parse_primitives() {
        assert_eq!(parse("int"), TypeDescriptor::Primitive(PrimitiveKind::Int));
        assert_eq!(
            parse("float"),
            TypeDescriptor::Primitive(PrimitiveKind::Float)
        );
        assert_eq!(parse("str"), TypeDescriptor::Primitive(PrimitiveKind::Str));
        assert_eq!(parse("bool"), TypeDescriptor::Primitive(PrimitiveKind::Bool));
        assert_eq!(
            parse("None"),
            TypeDescriptor::Primitive(PrimitiveKind::NoneType)
        );
        assert_eq!(parse("Any"), TypeDescriptor::Primitive(PrimitiveKind::Any));
    }

    #[test]
    fn test_parse_containers() {
        assert_eq!(
            parse("list[str]"),
            TypeDescriptor::List(Box::new(TypeDescriptor::Primitive(PrimitiveKind::Str)))
        );
        assert_eq!(
            parse("Dict[str, int]"),
            TypeDescriptor::Dict(
                Box::new(TypeDescriptor::Primitive(PrimitiveKind::Str)),
                Box::new(TypeDescriptor::Primitive(PrimitiveKind::Int)),
            )
        );
        assert_eq!(
            parse("Set[int]"),
            TypeDescriptor::Set(Box::new(TypeDescriptor::Primitive(PrimitiveKind::Int)))
        );
    }

    #[test]
    fn test_parse_nested_containers() {
        assert_eq!(
            parse("dict[str, list[int]]"),
            TypeDescriptor::Dict(
                Box::new(TypeDescriptor::Primitive(PrimitiveKind::Str)),
                Box::new(TypeDescriptor::List(Box::new(TypeDescriptor::Primitive(
                    PrimitiveKind::Int
                )))),
            )
        );
    }

    #[test]
    fn test_both_union_spellings_are_equivalent() {
        assert_eq!(parse("Union[str, int]"), parse("str | int"));
        assert_eq!(parse("Optional[bool]"), parse("bool | None"));
        assert_eq!(
            parse("str | float | None"),
            TypeDescriptor::Union(vec![
                TypeDescriptor::Primitive(PrimitiveKind::Str),
                TypeDescriptor::Primitive(PrimitiveKind::Float),
                TypeDescriptor::Primitive(PrimitiveKind::NoneType),
            ])
        );
    }

    #[test]
    fn test_pipe_union_inside_subscript_stays_nested() {
        assert_eq!(
            parse("list[str | int]"),
            TypeDescriptor::List(Box::new(TypeDescriptor::Union(vec![
                TypeDescriptor::Primitive(PrimitiveKind::Str),
                TypeDescriptor::Primitive(PrimitiveKind::Int),
            ])))
        );
    }

    #[test]
    fn test_parse_named_model() {
        assert_eq!(parse("User"), TypeDescriptor::Named("User".to_string()));
        assert_eq!(
            parse("Optional[User]"),
            TypeDescriptor::Union(vec![
                TypeDescriptor::Named("User".to_string()),
                TypeDescriptor::Primitive(PrimitiveKind::NoneType),
            ])
        );
    }

    #[test]
    fn test_bare_container_is_unresolved() {
        assert_eq!(parse("list"), TypeDescriptor::Unresolved("list".to_string()));
        assert_eq!(parse("dict"), TypeDescriptor::Unresolved("dict".to_string()));
    }

    #[test]
    fn test_unknown_subscript_is_unresolved() {
        assert_eq!(
            parse("Callable[[int], str]"),
            TypeDescriptor::Unresolved("Callable[[int], str]".to_string())
        );
        assert_eq!(
            parse("dict[str]"),
            TypeDescriptor::Unresolved("dict[str]".to_string())
        );
    }

    #[test]
    fn test_garbage_is_unresolved() {
        assert_eq!(
            parse("<class 'object'>"),
            TypeDescriptor::Unresolved("<class 'object'>".to_string())
        );
        assert_eq!(parse(""), TypeDescriptor::Unresolved(String::new()));
    }

    #[test]
    fn test_whitespace_is_insensitive() {
        assert_eq!(parse(" str|int "), parse("str | int"));
        assert_eq!(parse("Dict[ str , int ]"), parse("Dict[str, int]"));
    }
}
