use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

use otorp_compiler::error::OtorpError;
use otorp_compiler::runner::{run, RunConfiguration, DEFAULT_SOURCE_EXTENSION};

#[derive(Parser)]
#[command(name = "otorp")]
#[command(about = "Generate proto3 message files from C# property declarations", long_about = None)]
struct Cli {
    /// Directory where input files to be processed exist
    #[arg(short, long)]
    input: PathBuf,

    /// Directory where generated files should go (defaults to the input directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Package name written into every generated file
    #[arg(short, long)]
    package: Option<String>,

    /// Value for `option csharp_namespace`
    #[arg(short, long)]
    namespace: Option<String>,

    /// Overwrite existing proto files
    #[arg(short = 'w', long)]
    overwrite: bool,

    /// Extension of the source files to convert
    #[arg(short, long, default_value = DEFAULT_SOURCE_EXTENSION)]
    extension: String,

    /// Log each file and property as it is processed
    #[arg(short, long)]
    verbose: bool,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn configuration(&self) -> RunConfiguration {
        let mut config = RunConfiguration::new(&self.input)
            .with_overwrite(self.overwrite)
            .with_source_extension(&self.extension);
        if let Some(output) = &self.output {
            config = config.with_output_directory(output);
        }
        if let Some(package) = &self.package {
            config = config.with_package(package);
        }
        if let Some(namespace) = &self.namespace {
            config = config.with_namespace(namespace);
        }
        config
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "otorp=debug,otorp_compiler=debug" } else { "otorp=info,otorp_compiler=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<ExitCode, OtorpError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let report = run(&cli.configuration()).inspect_err(|e| error!("{}", e))?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| OtorpError::Io(e.into()))?;
        println!("{}", json);
    }

    if report.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
