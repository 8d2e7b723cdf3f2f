//! pdftoc CLI - PDF outline extraction tool

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdftoc::{
    extract_outline, outline_file_with_options, BatchOptions, BatchRunner, BodyFontProfile,
    DocumentOutcome, HeadingCounts, JsonFormat, OutlineOptions, PdfSpanSource, SpanSource,
};

const DEFAULT_OUTPUT_DIR: &str = "outlines";

#[derive(Parser)]
#[command(name = "pdftoc")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract document outlines from PDF files as JSON", long_about = None)]
struct Cli {
    /// Input directory of PDF files
    #[arg(value_name = "INPUT_DIR")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT_DIR")]
    output: Option<PathBuf>,

    /// Worker threads (0 = one per logical CPU)
    #[arg(
        short = 'j',
        long,
        value_name = "N",
        default_value_t = 0,
        env = "PDFTOC_JOBS"
    )]
    jobs: usize,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract outlines from every PDF in a directory
    Batch {
        /// Input directory of PDF files
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Output directory for per-document JSON and stats.json
        #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Process only the named file from the input directory
        #[arg(short, long, value_name = "NAME")]
        file: Option<String>,

        /// Worker threads (0 = one per logical CPU)
        #[arg(
            short = 'j',
            long,
            value_name = "N",
            default_value_t = 0,
            env = "PDFTOC_JOBS"
        )]
        jobs: usize,

        #[command(flatten)]
        tune: TuneArgs,
    },

    /// Extract the outline of a single PDF
    #[command(alias = "toc")]
    Outline {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        tune: TuneArgs,
    },

    /// Show document information and outline statistics
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Heuristic thresholds shared by the extraction commands.
#[derive(Args, Default)]
struct TuneArgs {
    /// Pages sampled for body font estimation
    #[arg(long, value_name = "N")]
    sample_pages: Option<usize>,

    /// H1 size delta over the body font (points)
    #[arg(long, value_name = "PT")]
    h1_delta: Option<f32>,

    /// H2 size delta over the body font (points)
    #[arg(long, value_name = "PT")]
    h2_delta: Option<f32>,

    /// Regex for numbered headings
    #[arg(long, value_name = "REGEX")]
    numbering_pattern: Option<String>,

    /// Fraction of pages that marks repeated text as a running header
    #[arg(long, value_name = "FRACTION")]
    header_fraction: Option<f32>,

    /// Minimum heading text length in characters
    #[arg(long, value_name = "CHARS")]
    min_heading_chars: Option<usize>,
}

impl TuneArgs {
    fn to_options(&self) -> OutlineOptions {
        let mut options = OutlineOptions::new();
        if let Some(n) = self.sample_pages {
            options = options.with_sample_pages(n);
        }
        if let Some(delta) = self.h1_delta {
            options = options.with_h1_delta(delta);
        }
        if let Some(delta) = self.h2_delta {
            options = options.with_h2_delta(delta);
        }
        if let Some(ref pattern) = self.numbering_pattern {
            options = options.with_numbering_pattern(pattern.clone());
        }
        if let Some(fraction) = self.header_fraction {
            options = options.with_header_fraction(fraction);
        }
        if let Some(chars) = self.min_heading_chars {
            options = options.with_min_heading_chars(chars);
        }
        options
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Batch {
            input,
            output,
            file,
            jobs,
            tune,
        }) => cmd_batch(&input, &output, file.as_deref(), jobs, &tune),
        Some(Commands::Outline {
            input,
            output,
            compact,
            tune,
        }) => cmd_outline(&input, output.as_deref(), compact, &tune),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: batch if an input directory is provided
            if let Some(input) = cli.input {
                let output = cli
                    .output
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
                cmd_batch(&input, &output, None, cli.jobs, &TuneArgs::default())
            } else {
                println!("{}", "Usage: pdftoc <INPUT_DIR> [OUTPUT_DIR]".yellow());
                println!("       pdftoc --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    file: Option<&str>,
    jobs: usize,
    tune: &TuneArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let paths = discover_pdfs(input, file)?;
    if paths.is_empty() {
        println!("{}", "No PDF files to process".yellow());
        return Ok(());
    }

    fs::create_dir_all(output)?;

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let runner = BatchRunner::new(
        BatchOptions::new()
            .with_workers(jobs)
            .with_outline(tune.to_options()),
    );

    let mut failures: Vec<(String, String)> = Vec::new();
    let stats = runner.run_with(&paths, |outcome| {
        match outcome {
            DocumentOutcome::Succeeded(result) => {
                let stem = Path::new(&result.source_file)
                    .file_stem()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .into_owned();
                let path = output.join(format!("{}.json", stem));
                let json = result.to_json(JsonFormat::Pretty)?;
                fs::write(&path, json).map_err(|e| {
                    pdftoc::Error::OutputWrite(format!("{}: {}", path.display(), e))
                })?;
                pb.set_message(stem);
            }
            DocumentOutcome::Failed { source_file, error } => {
                failures.push((source_file.clone(), error.to_string()));
            }
        }
        pb.inc(1);
        Ok(())
    })?;

    pb.finish_with_message("Done!");

    let stats_path = output.join("stats.json");
    fs::write(&stats_path, stats.to_json(JsonFormat::Pretty)?)?;

    if !failures.is_empty() {
        println!();
        for (file, error) in &failures {
            println!("{} {}: {}", "Failed".red().bold(), file, error);
        }
    }

    println!();
    println!("{}", "Batch Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Processed".bold(), stats.documents_processed);
    println!("{}: {}", "Failed".bold(), stats.documents_failed);
    println!(
        "{}: {} (H1 {}, H2 {}, H3 {})",
        "Headings".bold(),
        stats.total_headings,
        stats.heading_counts.h1,
        stats.heading_counts.h2,
        stats.heading_counts.h3
    );
    println!(
        "{}: {:.2}",
        "Avg per document".bold(),
        stats.avg_headings_per_document
    );
    println!("{}: {}", "Output".bold(), output.display());

    Ok(())
}

fn cmd_outline(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    tune: &TuneArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = outline_file_with_options(input, &tune.to_options())?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = result.to_json(format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = PdfSpanSource::open(input)?;
    let metadata = source.metadata();
    let options = OutlineOptions::default();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), source.format().version);
    println!("{}: {}", "Pages".bold(), source.page_count());

    if let Some(ref title) = metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }

    println!();
    println!("{}", "Outline Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    // Keep showing document information even when extraction fails.
    match extract_outline(&source, &options) {
        Ok(result) => {
            let sample = source.page_count().min(options.sample_pages);
            let pages: Vec<_> = (0..sample)
                .map(|i| source.spans(i).unwrap_or_default())
                .collect();
            let profile = BodyFontProfile::from_pages(&pages, options.fallback_body_size);

            let mut counts = HeadingCounts::default();
            for entry in &result.outline {
                counts.add(entry.level);
            }

            println!("{}: {:.1}pt", "Body font".bold(), profile.body_size());
            if !result.title.is_empty() {
                println!("{}: {}", "Resolved title".bold(), result.title);
            }
            println!(
                "{}: {} (H1 {}, H2 {}, H3 {})",
                "Headings".bold(),
                counts.total(),
                counts.h1,
                counts.h2,
                counts.h3
            );
        }
        Err(e) => println!("{}", format!("Outline unavailable: {}", e).yellow()),
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdftoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF outline extraction tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/pdftoc".dimmed());
    println!("License: MIT");
}

fn discover_pdfs(dir: &Path, file: Option<&str>) -> std::io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_pdf = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            continue;
        }
        if let Some(name) = file {
            if path.file_name() != Some(OsStr::new(name)) {
                continue;
            }
        }
        paths.push(path);
    }
    paths.sort();
    log::debug!("discovered {} PDF files in {}", paths.len(), dir.display());
    Ok(paths)
}
