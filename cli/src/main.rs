//! teachpdf CLI - clean course PDFs and select teachable paragraphs

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use teachpdf::render::{self, JsonFormat, TextView};
use teachpdf::{DocumentReport, Pipeline, PipelineConfig};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "teachpdf")]
#[command(version)]
#[command(about = "Clean PDF course material and select teachable paragraphs", long_about = None)]
struct Cli {
    /// Pipeline configuration file (JSON)
    #[arg(long, global = true, value_name = "FILE", env = "TEACHPDF_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a PDF and write the full JSON report
    Analyze {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Print a summary to stderr
        #[arg(short, long)]
        summary: bool,
    },

    /// Write the cleaned text of a PDF
    Clean {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Write the selected paragraphs of a PDF
    Select {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Analyze many PDFs in parallel, one JSON report per input
    Batch {
        /// Input PDF files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "teachpdf_output")]
        output: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the effective configuration as JSON
    Config,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = load_pipeline(cli.config.as_deref()).and_then(|pipeline| match cli.command {
        Commands::Analyze {
            input,
            output,
            compact,
            summary,
        } => cmd_analyze(&pipeline, &input, output.as_deref(), compact, summary),
        Commands::Clean { input, output } => {
            cmd_text(&pipeline, &input, output.as_deref(), TextView::Cleaned)
        }
        Commands::Select { input, output } => {
            cmd_text(&pipeline, &input, output.as_deref(), TextView::Selected)
        }
        Commands::Batch {
            inputs,
            output,
            compact,
        } => cmd_batch(&pipeline, &inputs, &output, compact),
        Commands::Config => cmd_config(&pipeline),
    });

    if let Err(e) = result {
        match e.downcast_ref::<teachpdf::Error>() {
            Some(err) if matches!(err, teachpdf::Error::Unreadable) => {
                eprintln!("{}: {} [{}]", "Error".red().bold(), err, err.code())
            }
            _ => eprintln!("{}: {}", "Error".red().bold(), e),
        }
        std::process::exit(1);
    }
}

fn load_pipeline(config: Option<&Path>) -> CliResult<Pipeline> {
    let config = match config {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            PipelineConfig::from_json_file(path)?
        }
        None => PipelineConfig::default(),
    };
    Ok(Pipeline::new(config)?)
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn write_output(content: &str, output: Option<&Path>) -> CliResult<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        eprintln!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_analyze(
    pipeline: &Pipeline,
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    summary: bool,
) -> CliResult<()> {
    let report = pipeline.analyze_file(input)?;
    if summary {
        print_summary(input, &report);
    }
    if report.nothing_selected() {
        eprintln!("{}", "No teachable paragraph was found".yellow());
    }

    let json = render::to_json(&report, json_format(compact))?;
    write_output(&json, output)
}

fn cmd_text(pipeline: &Pipeline, input: &Path, output: Option<&Path>, view: TextView) -> CliResult<()> {
    let report = pipeline.analyze_file(input)?;
    write_output(&render::to_text(&report, view), output)
}

fn cmd_batch(pipeline: &Pipeline, inputs: &[PathBuf], output: &Path, compact: bool) -> CliResult<()> {
    fs::create_dir_all(output)?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message("Analyzing...");

    let results = pipeline.analyze_batch_with(inputs, |path| {
        pb.set_message(path.display().to_string());
        pb.inc(1);
    });
    pb.finish_with_message("Done!");

    let mut index = Vec::with_capacity(inputs.len());
    let mut failed = 0usize;

    println!("\n{}", "Results:".green().bold());
    for (i, (input, result)) in inputs.iter().zip(results).enumerate() {
        let branch = if i + 1 == inputs.len() { "└─" } else { "├─" };
        match result {
            Ok(report) => {
                let name = report_file_name(input, i);
                fs::write(output.join(&name), render::to_json(&report, json_format(compact))?)?;
                println!(
                    "  {} {} ({} selected)",
                    branch.dimmed(),
                    name,
                    report.stats.selected_count
                );
                index.push(serde_json::json!({
                    "input": input.display().to_string(),
                    "report": name,
                    "stats": report.stats,
                }));
            }
            Err(e) => {
                failed += 1;
                println!("  {} {} {}", branch.dimmed(), input.display(), e.to_string().red());
                index.push(serde_json::json!({
                    "input": input.display().to_string(),
                    "error": e.code(),
                    "message": e.to_string(),
                }));
            }
        }
    }

    fs::write(output.join("index.json"), serde_json::to_string_pretty(&index)?)?;

    if failed > 0 {
        eprintln!(
            "{} {} of {} documents failed",
            "Warning:".yellow().bold(),
            failed,
            inputs.len()
        );
    }
    Ok(())
}

/// Output name for the i-th input; the index keeps duplicate stems apart.
fn report_file_name(input: &Path, i: usize) -> String {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    format!("{:03}_{}.json", i + 1, stem)
}

fn cmd_config(pipeline: &Pipeline) -> CliResult<()> {
    println!("{}", pipeline.config().to_json()?);
    Ok(())
}

fn print_summary(input: &Path, report: &DocumentReport) {
    eprintln!("{}", "Document Summary".cyan().bold());
    eprintln!("{}", "─".repeat(40).dimmed());
    eprintln!("{}: {}", "File".bold(), input.display());
    eprint!("{}", render::summary(report));
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name(Path::new("dir/course.pdf"), 0), "001_course.json");
        assert_eq!(report_file_name(Path::new("other/course.pdf"), 11), "012_course.json");
    }

    #[test]
    fn test_config_file_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"teach": {"max_selected": 7}}"#).unwrap();

        let pipeline = load_pipeline(Some(&path)).unwrap();
        assert_eq!(pipeline.config().teach.max_selected, 7);
    }

    #[test]
    fn test_cli_parses_batch() {
        let cli = Cli::try_parse_from(["teachpdf", "batch", "a.pdf", "b.pdf", "-o", "out"]).unwrap();
        match cli.command {
            Commands::Batch { inputs, output, .. } => {
                assert_eq!(inputs.len(), 2);
                assert_eq!(output, PathBuf::from("out"));
            }
            _ => panic!("expected batch"),
        }
    }
}
