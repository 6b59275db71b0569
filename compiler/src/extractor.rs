//! Line-oriented property extraction.
//!
//! Only single-line auto-properties such as `public int Age { get; set; }`
//! are recognised. Declarations spread across several lines, expression
//! bodied members and fields are skipped. This is a pattern match over one
//! line at a time, not a C# parser.

use crate::{
    imports::ImportSet,
    type_map::map_type,
    types::PropertyDeclaration,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

lazy_static! {
    static ref PROPERTY: Regex =
        Regex::new(r"(?P<type>\S+)\s+(?P<name>\S+)\s+\{\s*get\s*;").unwrap();
}

/// Returns the raw `(type, name)` tokens of a property declaration line.
pub fn match_property(line: &str) -> Option<(&str, &str)> {
    let caps = PROPERTY.captures(line)?;
    Some((caps.name("type")?.as_str(), caps.name("name")?.as_str()))
}

/// Converts a camelCase or PascalCase identifier to lower snake_case.
///
/// Every uppercase letter after the first character gets an underscore in
/// front of it, so acronyms are split letter by letter (`ID` → `i_d`).
pub fn to_snake_case(name: &str) -> String {
    let mut snake = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                snake.push('_');
            }
            snake.extend(c.to_lowercase());
        } else {
            snake.push(c);
        }
    }
    snake
}

/// Extracts every property declaration from `lines`, in order.
///
/// Field numbers start at 1 for each call. Reference types are recorded in
/// `imports`.
pub fn extract_properties<I, S>(lines: I, imports: &ImportSet) -> Vec<PropertyDeclaration>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut properties = Vec::new();
    let mut order      = 1;

    for line in lines {
        let Some((raw_type, raw_name)) = match_property(line.as_ref()) else {
            continue;
        };

        let schema_type = map_type(raw_type);
        imports.record(&schema_type);
        trace!(raw_type, raw_name, mapped = %schema_type, order, "matched property");

        properties.push(PropertyDeclaration {
            order,
            name: to_snake_case(raw_name),
            schema_type,
        });
        order += 1;
    }

    properties
}
