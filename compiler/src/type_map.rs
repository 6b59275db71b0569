use crate::types::SchemaType;
use lazy_static::lazy_static;
use regex::Regex;

/// Source scalar types and the proto type each one becomes.
pub const SCALAR_TYPES: [(&str, &str); 4] = [
    ("int",      "int32"),
    ("string",   "string"),
    ("bool",     "bool"),
    ("DateTime", "date"),
];

lazy_static! {
    // Outer name may not contain `<`, so the element keeps any nested brackets.
    static ref COLLECTION: Regex = Regex::new(r"^[^\s<]+<(?P<element>\S+)>$").unwrap();
}

/// Removes a single trailing nullability marker.
pub fn strip_nullable(source: &str) -> &str {
    source.strip_suffix('?').unwrap_or(source)
}

pub fn scalar_type(source: &str) -> Option<&'static str> {
    SCALAR_TYPES
        .iter()
        .find(|(from, _)| *from == source)
        .map(|(_, to)| *to)
}

/// Returns the element of a collection-shaped type such as `List<Foo>`.
pub fn collection_element(source: &str) -> Option<&str> {
    COLLECTION
        .captures(source)
        .and_then(|caps| caps.name("element"))
        .map(|m| m.as_str())
}

/// Classifies a source type. Never fails: anything that is neither a known
/// scalar nor collection-shaped is treated as a message reference.
pub fn map_type(source: &str) -> SchemaType {
    let stripped = strip_nullable(source);

    if let Some(scalar) = scalar_type(stripped) {
        return SchemaType::Scalar(scalar);
    }
    if let Some(element) = collection_element(stripped) {
        return SchemaType::Repeated(element.to_string());
    }
    SchemaType::Reference(stripped.to_string())
}
