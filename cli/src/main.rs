use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use syscheck_analyzer::config::AnalyzerConfig;
use syscheck_analyzer::intake::IntakeRejection;
use syscheck_analyzer::output::{OutputFormat, format_report};
use syscheck_analyzer::{AnalyzeError, analyze_file, analyze_lines};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "syscheck-report")]
#[command(about = "Classify sysCheck firmware reports and summarize console health")]
struct Cli {
    /// Log classification decisions to stderr.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze one or more sysCheck report files.
    Analyze(AnalyzeArgs),
    /// Analyze a sysCheck report read from stdin.
    AnalyzeStdin(AnalyzeStdinArgs),
    /// Write the default configuration file.
    InitConfig(InitConfigArgs),
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    /// Report files to analyze.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "text")]
    format: OutputFormat,
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct AnalyzeStdinArgs {
    /// Output format.
    #[arg(long, default_value = "text")]
    format: OutputFormat,
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct InitConfigArgs {
    /// Destination path for the YAML configuration.
    output: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("syscheck_analyzer=debug,syscheck_report=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match cli.command {
        Command::Analyze(args) => run_analyze(args),
        Command::AnalyzeStdin(args) => run_analyze_stdin(args),
        Command::InitConfig(args) => run_init_config(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<AnalyzerConfig, String> {
    match path {
        Some(path) => AnalyzerConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display())),
        None => Ok(AnalyzerConfig::default()),
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<(), String> {
    let config = load_config(args.config.as_ref())?;
    let format = args.format;

    // Reports are independent; results are printed in input order.
    let outcomes: Vec<(PathBuf, Result<String, AnalyzeError>)> = args
        .inputs
        .par_iter()
        .map(|path| {
            let rendered = analyze_file(path, &config.intake)
                .and_then(|result| format_report(&result, format));
            (path.clone(), rendered)
        })
        .collect();

    let multiple = outcomes.len() > 1;
    let mut failures = Vec::new();
    for (index, (path, outcome)) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(rendered) => {
                if multiple {
                    if index > 0 {
                        println!();
                    }
                    println!("==> {} <==", path.display());
                }
                println!("{rendered}");
            }
            Err(err) => {
                debug!(path = %path.display(), error = %err, "Report analysis failed");
                eprintln!("{}: {err}", path.display());
                failures.push(path.display().to_string());
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "{} report(s) could not be analyzed: {}",
            failures.len(),
            failures.join(", ")
        ))
    }
}

fn run_analyze_stdin(args: AnalyzeStdinArgs) -> Result<(), String> {
    let config = load_config(args.config.as_ref())?;
    let limit = config.intake.max_report_bytes;

    let mut raw = Vec::new();
    std::io::stdin()
        .take(limit.saturating_add(1))
        .read_to_end(&mut raw)
        .map_err(|err| format!("Failed to read stdin: {err}"))?;
    if raw.len() as u64 > limit {
        return Err(AnalyzeError::from(IntakeRejection::TooLarge {
            size: raw.len() as u64,
            limit,
        })
        .to_string());
    }

    let text = String::from_utf8_lossy(&raw);
    let result = analyze_lines(text.lines()).map_err(|err| err.to_string())?;
    let rendered = format_report(&result, args.format).map_err(|err| err.to_string())?;
    println!("{rendered}");
    Ok(())
}

fn run_init_config(args: InitConfigArgs) -> Result<(), String> {
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }

    AnalyzerConfig::default()
        .save(&args.output)
        .map_err(|err| format!("Failed to write '{}': {err}", args.output.display()))?;
    println!("Wrote default configuration to '{}'.", args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_multiple_inputs_and_format() {
        let cli = Cli::try_parse_from([
            "syscheck-report",
            "analyze",
            "--format",
            "json",
            "a.txt",
            "b.txt",
        ])
        .unwrap();
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.inputs.len(), 2);
        assert_eq!(args.format, OutputFormat::Json);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_requires_inputs() {
        assert!(Cli::try_parse_from(["syscheck-report", "analyze"]).is_err());
    }

    #[test]
    fn test_load_config_defaults_without_path() {
        assert_eq!(load_config(None).unwrap(), AnalyzerConfig::default());
    }
}
