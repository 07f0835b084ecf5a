//! docxtmpl CLI - render mustache-style .docx templates

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

use docxtmpl::{package, EscapeMode, PlaceholderKind, PrepareStats, Templater};

#[derive(Parser)]
#[command(name = "docxtmpl")]
#[command(version)]
#[command(about = "Render mustache-style templates authored in Word documents", long_about = None)]
struct Cli {
    /// Template .docx file
    #[arg(value_name = "TEMPLATE")]
    template: Option<PathBuf>,

    /// JSON data file
    #[arg(value_name = "DATA")]
    data: Option<PathBuf>,

    /// Output .docx file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template with JSON data
    Render {
        /// Template .docx file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// JSON data file
        #[arg(value_name = "DATA")]
        data: PathBuf,

        /// Output .docx file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        #[command(flatten)]
        flags: RenderFlags,
    },

    /// Write the prepared markup of a template
    Prepare {
        /// Template .docx file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Only warn about unbalanced placeholders
        #[arg(long)]
        lenient: bool,

        /// Archive part to prepare
        #[arg(long, value_name = "NAME", default_value = package::DOCUMENT_PART)]
        part: String,
    },

    /// List the placeholders of a template
    Inspect {
        /// Template .docx file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Archive part to inspect
        #[arg(long, value_name = "NAME", default_value = package::DOCUMENT_PART)]
        part: String,
    },

    /// Render one template per element of a JSON array
    Batch {
        /// Template .docx file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// JSON file holding an array of data objects
        #[arg(value_name = "DATA")]
        data: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        flags: RenderFlags,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args, Clone, Default)]
struct RenderFlags {
    /// Only warn about unbalanced placeholders
    #[arg(long)]
    lenient: bool,

    /// Fail when a placeholder has no value in the data
    #[arg(long)]
    strict_data: bool,

    /// Insert values without XML escaping
    #[arg(long)]
    raw: bool,

    /// Strip whitespace-only text even inside xml:space="preserve"
    #[arg(long)]
    ignore_preserve: bool,

    /// Archive part to render
    #[arg(long, value_name = "NAME", default_value = package::DOCUMENT_PART)]
    part: String,
}

impl RenderFlags {
    fn templater(&self) -> Templater {
        let mut templater = Templater::new()
            .with_part(self.part.clone())
            .with_preserve_space(!self.ignore_preserve);
        if self.lenient {
            templater = templater.lenient();
        }
        if self.strict_data {
            templater = templater.strict_data();
        }
        if self.raw {
            templater = templater.with_escape(EscapeMode::Raw);
        }
        templater
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Render {
            template,
            data,
            output,
            flags,
        }) => cmd_render(&template, &data, &output, &flags),
        Some(Commands::Prepare {
            template,
            output,
            lenient,
            part,
        }) => cmd_prepare(&template, output.as_deref(), lenient, &part),
        Some(Commands::Inspect {
            template,
            json,
            part,
        }) => cmd_inspect(&template, json, &part),
        Some(Commands::Batch {
            template,
            data,
            output,
            flags,
        }) => cmd_batch(&template, &data, output.as_deref(), &flags),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => match (cli.template, cli.data, cli.output) {
            (Some(template), Some(data), Some(output)) => {
                let flags = RenderFlags {
                    part: package::DOCUMENT_PART.to_string(),
                    ..RenderFlags::default()
                };
                cmd_render(&template, &data, &output, &flags)
            }
            _ => {
                print_usage();
                std::process::exit(2);
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn print_usage() {
    println!("{}", "Usage: docxtmpl <TEMPLATE> <DATA> <OUTPUT>".yellow());
    println!("       docxtmpl --help for more information");
}

/// Fail before any document work when the template path does not exist.
fn require_template(template: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !template.exists() {
        print_usage();
        return Err(docxtmpl::Error::TemplateNotFound(template.to_path_buf()).into());
    }
    Ok(())
}

fn cmd_render(
    template: &Path,
    data: &Path,
    output: &Path,
    flags: &RenderFlags,
) -> Result<(), Box<dyn std::error::Error>> {
    require_template(template)?;
    let data = docxtmpl::load_data(data)?;

    let stats = flags.templater().render_file(template, &data, output)?;

    println!("{} {}", "Saved to".green(), output.display());
    print_stats(&stats);
    Ok(())
}

fn cmd_prepare(
    template: &Path,
    output: Option<&Path>,
    lenient: bool,
    part: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    require_template(template)?;

    let mut templater = Templater::new().with_part(part);
    if lenient {
        templater = templater.lenient();
    }
    let prepared = templater.prepare_file(template)?;

    if let Some(path) = output {
        fs::write(path, &prepared.markup)?;
        println!("{} {}", "Saved to".green(), path.display());
        print_stats(&prepared.stats);
    } else {
        println!("{}", prepared.markup);
    }

    Ok(())
}

fn cmd_inspect(template: &Path, json: bool, part: &str) -> Result<(), Box<dyn std::error::Error>> {
    require_template(template)?;

    let prepared = Templater::new().with_part(part).lenient().prepare_file(template)?;
    let placeholders = prepared.placeholders();
    let unmatched = prepared.unmatched_sections();

    if json {
        let report = serde_json::json!({
            "part": part,
            "stats": prepared.stats,
            "placeholders": placeholders,
            "unmatched_sections": unmatched,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Template Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), template.display());
    println!("{}: {}", "Part".bold(), part);
    println!("{}: {}", "Paragraphs".bold(), prepared.stats.paragraph_count);
    println!("{}: {}", "Sections".bold(), prepared.stats.sections_replaced());

    let fields: BTreeSet<&str> = placeholders
        .iter()
        .filter(|p| p.kind == PlaceholderKind::Plain)
        .map(|p| p.name.as_str())
        .collect();
    let sections: BTreeSet<&str> = placeholders
        .iter()
        .filter(|p| p.kind == PlaceholderKind::SectionOpen)
        .map(|p| p.name.as_str())
        .collect();

    println!();
    println!("{}", "Placeholders".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for name in &fields {
        println!("  {} {}", "•".dimmed(), name);
    }
    for name in &sections {
        println!("  {} {} {}", "•".dimmed(), name, "(section)".dimmed());
    }

    if !unmatched.is_empty() {
        println!();
        println!("{}", "Unmatched section tokens".red().bold());
        for token in &unmatched {
            println!("  {} {}", "✗".red(), token.raw);
        }
    }

    Ok(())
}

fn cmd_batch(
    template: &Path,
    data: &Path,
    output: Option<&Path>,
    flags: &RenderFlags,
) -> Result<(), Box<dyn std::error::Error>> {
    require_template(template)?;

    let items = match docxtmpl::load_data(data)? {
        Value::Array(items) => items,
        _ => return Err("DATA must be a JSON array".into()),
    };

    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = template.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    });
    fs::create_dir_all(&output_dir)?;

    let templater = flags.templater();
    let template_bytes = package::read_template(template)?;
    let prepared = templater.prepare_bytes(&template_bytes)?;
    let renderer = templater.renderer();
    let stem = template.file_stem().unwrap_or_default().to_string_lossy();

    let pb = ProgressBar::new(items.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut written = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let filename = format!("{}-{}.docx", stem, index + 1);
        pb.set_message(filename.clone());
        let bytes = templater.render_prepared(&template_bytes, &prepared, &renderer, item)?;
        package::write_output(&output_dir.join(&filename), &bytes)?;
        written.push(filename);
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    for (i, name) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), name);
    }

    Ok(())
}

fn print_stats(stats: &PrepareStats) {
    println!(
        "  {} placeholders merged, {} sections, {} skipped",
        stats.placeholders_merged,
        stats.sections_replaced(),
        stats.sections_skipped
    );
    if stats.unbalanced_paragraphs > 0 {
        println!(
            "  {} {} paragraphs with unbalanced placeholders",
            "Warning:".yellow(),
            stats.unbalanced_paragraphs
        );
    }
}

fn cmd_version() {
    println!("{} {}", "docxtmpl".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Mustache-style templating for Word documents");
    println!();
    println!("License: MIT");
}
