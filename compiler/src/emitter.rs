use crate::{
    error::OtorpError,
    imports::ImportSet,
    runner::RunConfiguration,
    types::{MessageDocument, PersistResult, PropertyDeclaration},
    utils::{non_empty, quote},
};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

pub const SYNTAX_LINE: &str = "syntax = \"proto3\";";
pub const PROTO_EXTENSION: &str = "proto";

/// Builds the proto3 document for one message.
///
/// The import block reflects every reference seen so far in the run, not
/// just the ones this message uses.
pub fn emit_message(
    name:       &str,
    properties: &[PropertyDeclaration],
    config:     &RunConfiguration,
    imports:    &ImportSet,
) -> MessageDocument {
    let mut lines = vec![SYNTAX_LINE.to_string(), String::new()];

    if let Some(namespace) = non_empty(config.namespace.as_deref()) {
        lines.push(format!("option csharp_namespace = {};", quote(namespace)));
        lines.push(String::new());
    }

    if let Some(package) = non_empty(config.package.as_deref()) {
        lines.push(format!("package {};", package));
        lines.push(String::new());
    }

    let snapshot = imports.snapshot();
    for import in &snapshot {
        lines.push(format!("import {};", quote(&format!("{}.{}", import, PROTO_EXTENSION))));
    }
    if !snapshot.is_empty() {
        lines.push(String::new());
    }

    lines.push(format!("message {} {{", name));
    for property in properties {
        lines.push(format!(
            "  {} {} = {};",
            property.schema_type, property.name, property.order
        ));
    }
    lines.push("}".to_string());

    MessageDocument {
        name: name.to_string(),
        lines,
    }
}

/// Message name for a source file: its file name without the extension.
pub fn message_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Where the `.proto` for `input` goes: next to it, or into the configured
/// output directory.
pub fn output_path(input: &Path, config: &RunConfiguration) -> PathBuf {
    let file_name = format!("{}.{}", message_name(input), PROTO_EXTENSION);
    match &config.output_directory {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

/// Writes `document` to `target` unless it exists and `overwrite` is false.
///
/// The text goes to a temporary file in the target directory which is then
/// renamed over the target, so a failed write never leaves a truncated file.
pub fn persist(
    document:  &MessageDocument,
    target:    &Path,
    overwrite: bool,
) -> Result<PersistResult, OtorpError> {
    if !overwrite && target.exists() {
        warn!(
            "Proto file {} exists! Use -w to overwrite.",
            target.display()
        );
        return Ok(PersistResult::Skipped(target.to_path_buf()));
    }

    let write_err = |source: std::io::Error| OtorpError::Write {
        path: target.to_path_buf(),
        source,
    };

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(write_err)?;
    }

    let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(document.render().as_bytes()).map_err(write_err)?;
    file.flush().map_err(write_err)?;
    if let Some(permissions) = target_permissions(target).map_err(write_err)? {
        file.as_file().set_permissions(permissions).map_err(write_err)?;
    }
    file.persist(target).map_err(|e| write_err(e.error))?;

    debug!(message = %document.name, path = %target.display(), "wrote proto file");
    Ok(PersistResult::Written(target.to_path_buf()))
}

/// Permissions the written file should end up with: those of the file being
/// replaced, or a plain `0644` for a new file. Temp files start out `0600`.
fn target_permissions(target: &Path) -> std::io::Result<Option<fs::Permissions>> {
    match fs::metadata(target) {
        Ok(meta) => Ok(Some(meta.permissions())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(default_permissions()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SchemaType;
    use tracing_test::traced_test;

    fn property(order: u32, name: &str, schema_type: SchemaType) -> PropertyDeclaration {
        PropertyDeclaration { order, name: name.into(), schema_type }
    }

    #[test]
    fn test_minimal_document() {
        let config  = RunConfiguration::new("in");
        let imports = ImportSet::new();
        let doc = emit_message(
            "Person",
            &[
                property(1, "age", SchemaType::Scalar("int32")),
                property(2, "name", SchemaType::Scalar("string")),
            ],
            &config,
            &imports,
        );

        assert_eq!(
            doc.render(),
            "syntax = \"proto3\";\n\nmessage Person {\n  int32 age = 1;\n  string name = 2;\n}\n"
        );
        assert!(!doc.lines.iter().any(|l| l.starts_with("import")));
    }

    #[test]
    fn test_header_order() {
        let config = RunConfiguration::new("in")
            .with_namespace("Shop.Models")
            .with_package("shop");
        let imports = ImportSet::new();
        imports.add("customer");
        imports.add("address");

        let doc = emit_message(
            "Order",
            &[property(1, "buyer", SchemaType::Reference("Customer".into()))],
            &config,
            &imports,
        );

        let expected = vec![
            "syntax = \"proto3\";",
            "",
            "option csharp_namespace = \"Shop.Models\";",
            "",
            "package shop;",
            "",
            "import \"address.proto\";",
            "import \"customer.proto\";",
            "",
            "message Order {",
            "  Customer buyer = 1;",
            "}",
        ];
        assert_eq!(doc.lines, expected);
    }

    #[test]
    fn test_blank_options_are_omitted() {
        let config  = RunConfiguration::new("in").with_package("").with_namespace("  ");
        let doc     = emit_message("Empty", &[], &config, &ImportSet::new());
        assert_eq!(doc.lines, vec![SYNTAX_LINE, "", "message Empty {", "}"]);
    }

    #[test]
    fn test_repeated_rendering() {
        let doc = emit_message(
            "Cart",
            &[property(1, "items", SchemaType::Repeated("Item".into()))],
            &RunConfiguration::new("in"),
            &ImportSet::new(),
        );
        assert!(doc.lines.contains(&"  repeated Item items = 1;".to_string()));
    }

    #[test]
    fn test_output_path() {
        let input = Path::new("models/Customer.cs");
        assert_eq!(
            output_path(input, &RunConfiguration::new("models")),
            PathBuf::from("models/Customer.proto")
        );
        assert_eq!(
            output_path(input, &RunConfiguration::new("models").with_output_directory("out")),
            PathBuf::from("out/Customer.proto")
        );
        assert_eq!(message_name(Path::new("a/Order.Line.cs")), "Order.Line");
    }

    #[test]
    #[traced_test]
    fn test_existing_target_is_skipped_with_warning() {
        let dir    = tempfile::tempdir().unwrap();
        let target = dir.path().join("Person.proto");
        fs::write(&target, "hand edited\n").unwrap();

        let doc    = emit_message("Person", &[], &RunConfiguration::new("in"), &ImportSet::new());
        let result = persist(&doc, &target, false).unwrap();

        assert_eq!(result, PersistResult::Skipped(target.clone()));
        assert_eq!(fs::read_to_string(&target).unwrap(), "hand edited\n");
        assert!(logs_contain("exists! Use -w to overwrite."));
    }

    #[test]
    #[traced_test]
    fn test_written_target_is_not_warned_about() {
        let dir    = tempfile::tempdir().unwrap();
        let target = dir.path().join("Person.proto");

        let doc    = emit_message("Person", &[], &RunConfiguration::new("in"), &ImportSet::new());
        let result = persist(&doc, &target, false).unwrap();

        assert_eq!(result, PersistResult::Written(target.clone()));
        assert!(!logs_contain("exists! Use -w to overwrite."));
    }
}
