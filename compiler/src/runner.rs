use crate::{
    emitter::{emit_message, message_name, output_path, persist},
    error::OtorpError,
    extractor::extract_properties,
    imports::ImportSet,
    types::{PersistResult, RunReport},
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

pub const DEFAULT_SOURCE_EXTENSION: &str = "cs";

/// Everything a run needs, resolved before any file is touched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfiguration {
    pub input_directory:  PathBuf,
    pub output_directory: Option<PathBuf>,
    pub package:          Option<String>,
    pub namespace:        Option<String>,
    pub overwrite:        bool,
    pub source_extension: String,
}

impl RunConfiguration {
    pub fn new(input_directory: impl Into<PathBuf>) -> Self {
        Self {
            input_directory:  input_directory.into(),
            output_directory: None,
            package:          None,
            namespace:        None,
            overwrite:        false,
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
        }
    }

    pub fn with_output_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_directory = Some(dir.into());
        self
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_source_extension(mut self, extension: impl Into<String>) -> Self {
        self.source_extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Checks the configuration before processing starts.
    pub fn validate(&self) -> Result<(), OtorpError> {
        if self.input_directory.as_os_str().is_empty() {
            return Err(OtorpError::Config("an input directory is required".into()));
        }
        if !self.input_directory.is_dir() {
            return Err(OtorpError::Config(format!(
                "input directory {} does not exist or is not a directory",
                self.input_directory.display()
            )));
        }
        if let Some(out) = &self.output_directory {
            if out.exists() && !out.is_dir() {
                return Err(OtorpError::Config(format!(
                    "output path {} is not a directory",
                    out.display()
                )));
            }
        }
        if self.source_extension.is_empty() {
            return Err(OtorpError::Config("source extension cannot be empty".into()));
        }
        Ok(())
    }
}

/// Source files directly inside the input directory, sorted by path.
pub fn source_files(config: &RunConfiguration) -> Result<Vec<PathBuf>, OtorpError> {
    let entries = fs::read_dir(&config.input_directory).map_err(|source| OtorpError::Read {
        path: config.input_directory.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let matches = path
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(&config.source_extension))
            .unwrap_or(false);
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_lines(path: &Path) -> Result<Vec<String>, OtorpError> {
    let bytes = fs::read(path).map_err(|source| OtorpError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    Ok(text.lines().map(str::to_string).collect())
}

/// Converts one source file and persists the result.
pub fn process_file(
    path:    &Path,
    config:  &RunConfiguration,
    imports: &ImportSet,
) -> Result<PersistResult, OtorpError> {
    let lines      = read_lines(path)?;
    let properties = extract_properties(&lines, imports);
    let name       = message_name(path);
    debug!(file = %path.display(), properties = properties.len(), "extracted message {}", name);

    let document = emit_message(&name, &properties, config, imports);
    persist(&document, &output_path(path, config), config.overwrite)
}

/// Converts every source file in the input directory, one after another.
///
/// Configuration problems abort before any file is processed. A failure on a
/// single file is logged and recorded in the report, and the run moves on.
pub fn run(config: &RunConfiguration) -> Result<RunReport, OtorpError> {
    config.validate()?;

    if let Some(out) = &config.output_directory {
        if !out.exists() {
            fs::create_dir_all(out).map_err(|source| OtorpError::Write {
                path: out.clone(),
                source,
            })?;
        }
    }

    let files = source_files(config)?;
    info!(
        input = %config.input_directory.display(),
        files = files.len(),
        "Creating proto files..."
    );

    let imports    = ImportSet::new();
    let mut report = RunReport::default();
    for file in files {
        match process_file(&file, config, &imports) {
            Ok(result) => report.record(result),
            Err(e) => {
                error!(file = %file.display(), "{}", e);
                report.failed.push((file, e.to_string()));
            }
        }
    }

    info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        failed  = report.failed.len(),
        "Proto files created!"
    );
    Ok(report)
}
