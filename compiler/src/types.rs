use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Result of resolving a source type through the type map.
///
/// Every source type lands in exactly one of these three variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SchemaType {
    /// A proto scalar from the fixed scalar table (`int32`, `string`, ...).
    Scalar(&'static str),
    /// A collection; holds the element type exactly as written in the source.
    Repeated(String),
    /// Any other type, assumed to be a message defined in another file.
    Reference(String),
}

impl SchemaType {
    /// The import token (`customer` for `Customer`) this type requires, if any.
    pub fn import_name(&self) -> Option<String> {
        match self {
            SchemaType::Reference(name) => Some(name.to_lowercase()),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaType::Scalar(name)      => f.write_str(name),
            SchemaType::Repeated(element) => write!(f, "repeated {}", element),
            SchemaType::Reference(name)   => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDeclaration {
    pub order:       u32,
    pub name:        String,
    pub schema_type: SchemaType,
}

/// The full text of one generated `.proto` file, one entry per line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageDocument {
    pub name:  String,
    pub lines: Vec<String>,
}

impl MessageDocument {
    pub fn render(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PersistResult {
    Written(PathBuf),
    /// The target already existed and overwriting was not requested.
    Skipped(PathBuf),
}

/// Outcome of a whole run, one entry per processed source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failed:  Vec<(PathBuf, String)>,
}

impl RunReport {
    pub fn record(&mut self, result: PersistResult) {
        match result {
            PersistResult::Written(path) => self.written.push(path),
            PersistResult::Skipped(path) => self.skipped.push(path),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}
