//! @ai:module:intent CLI for the verification benchmark harness
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use verify_bench::{
    is_interrupted, BenchmarkRunner, DefinitionLoader, HarnessConfig, Interrupt,
};

const INTERRUPTED_EXIT: u8 = 130;

#[derive(Parser)]
#[command(name = "verify-bench")]
#[command(about = "Run verification tools over benchmark definitions and report their verdicts")]
#[command(version)]
struct Cli {
    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Run only the test with the given name
    #[arg(short, long, value_name = "NAME")]
    test: Option<String>,

    /// Path to harness configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Benchmark definition files
    #[arg(required = true, value_name = "FILE", value_parser = existing_file)]
    files: Vec<PathBuf>,
}

/// @ai:intent Accept only paths naming an existing regular file
/// @ai:effects fs:read
fn existing_file(value: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(value);

    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("File {value:?} does not exist."))
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let directive = if cli.debug {
        "verify_bench=debug"
    } else {
        "verify_bench=warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .init();

    match run_benchmarks(cli).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) if is_interrupted(&e) => {
            tracing::warn!("script was interrupted by user, some tests may not be done");
            Ok(ExitCode::from(INTERRUPTED_EXIT))
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// @ai:intent Run every benchmark definition named on the command line, in order
/// @ai:effects process:spawn, fs:read, fs:write
async fn run_benchmarks(cli: Cli) -> Result<()> {
    let mut config = load_or_default_config(cli.config)?;
    if cli.test.is_some() {
        config.run.test_filter = cli.test;
    }

    let mut interrupt = Interrupt::listen();
    let loader = DefinitionLoader::new();

    for file in &cli.files {
        let definition = loader.load(file)?;
        let runner = BenchmarkRunner::new(&definition, &config)?;
        runner.run(&mut interrupt).await?;
    }

    Ok(())
}

/// @ai:intent Load config from file or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<HarnessConfig> {
    match path {
        Some(p) => HarnessConfig::load(&p)
            .with_context(|| format!("Failed to load configuration {}", p.display())),
        None => Ok(HarnessConfig::default()),
    }
}
