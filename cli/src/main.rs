//! docsift CLI - PDF outline extraction and persona-aware section ranking

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docsift::model::OutlineNode;
use docsift::outline::FontStatistics;
use docsift::pipeline::{
    find_pdfs, process_batch_with_progress, run_request, BatchOptions, BatchReport, Diagnostic,
    RankingRequest,
};
use docsift::{
    classify, extract_runs, has_pdf_extension, to_json, ExtractOptions, HeadingConfig, JsonFormat,
    OutlinePayload, PageSelection, RankOptions, SimilarityScheme,
};

#[derive(Parser)]
#[command(name = "docsift")]
#[command(version)]
#[command(about = "Extract PDF outlines and rank sections for a persona", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a {title, outline} JSON file per PDF
    Outline {
        /// Input PDF file or directory of PDFs
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output directory
        #[arg(value_name = "OUTPUT_DIR")]
        output: PathBuf,

        /// Use the file name as title when none is found
        #[arg(long)]
        title_fallback: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Fail a document on the first unreadable page
        #[arg(long)]
        strict: bool,

        /// Deepest heading level to emit (1-3)
        #[arg(long, default_value = "3")]
        max_levels: usize,

        /// Minimum font size per tier, largest first (e.g., "20,16,13")
        #[arg(long, value_delimiter = ',')]
        tier_boundaries: Option<Vec<f32>>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Process one document at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Rank sections of a document collection for a persona and task
    Rank {
        /// Request JSON with documents, persona and job_to_be_done
        #[arg(value_name = "REQUEST")]
        request: PathBuf,

        /// Directory holding the requested PDFs
        #[arg(value_name = "PDF_DIR")]
        pdf_dir: PathBuf,

        /// Output JSON file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Number of sections to keep
        #[arg(long, env = "DOCSIFT_TOP_K", default_value = "5")]
        top_k: usize,

        /// Maximum snippet length in characters
        #[arg(long, env = "DOCSIFT_SNIPPET_LENGTH", default_value = "400")]
        snippet_length: usize,

        /// Similarity backend
        #[arg(long, value_enum, env = "DOCSIFT_SIMILARITY", default_value = "tf")]
        similarity: SimilarityArg,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show runs, body baseline and detected outline of a PDF
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum SimilarityArg {
    /// Log-scaled term frequency, cosine similarity
    Tf,
    /// Hashed word and trigram embedding
    Embedding,
}

impl From<SimilarityArg> for SimilarityScheme {
    fn from(arg: SimilarityArg) -> Self {
        match arg {
            SimilarityArg::Tf => SimilarityScheme::TermFrequency,
            SimilarityArg::Embedding => SimilarityScheme::Embedding,
        }
    }
}

struct OutlineArgs {
    title_fallback: bool,
    pages: Option<String>,
    strict: bool,
    max_levels: usize,
    tier_boundaries: Option<Vec<f32>>,
    format: JsonFormat,
    sequential: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Outline {
            input,
            output,
            title_fallback,
            pages,
            strict,
            max_levels,
            tier_boundaries,
            compact,
            sequential,
        } => cmd_outline(
            &input,
            &output,
            OutlineArgs {
                title_fallback,
                pages,
                strict,
                max_levels,
                tier_boundaries,
                format: json_format(compact),
                sequential,
            },
        ),
        Commands::Rank {
            request,
            pdf_dir,
            output,
            top_k,
            snippet_length,
            similarity,
            compact,
        } => {
            let options = RankOptions::new()
                .with_top_k(top_k)
                .with_snippet_length(snippet_length)
                .with_similarity(similarity.into());
            cmd_rank(&request, &pdf_dir, &output, options, json_format(compact))
        }
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn progress_bar(len: usize) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn cmd_outline(
    input: &Path,
    output_dir: &Path,
    args: OutlineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let inputs = if input.is_dir() {
        find_pdfs(input)?
    } else if has_pdf_extension(input) {
        vec![input.to_path_buf()]
    } else {
        return Err(format!("{} is not a PDF file or directory", input.display()).into());
    };

    log::debug!("{} input files under {}", inputs.len(), input.display());
    if inputs.is_empty() {
        println!("{} no PDF files in {}", "Nothing to do:".yellow(), input.display());
        return Ok(());
    }

    let page_selection = match args.pages.as_deref() {
        Some(p) => PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?,
        None => PageSelection::All,
    };
    let mut extract = ExtractOptions::new().with_pages(page_selection);
    extract = if args.strict {
        extract.strict()
    } else {
        extract.lenient()
    };

    let mut heading = HeadingConfig::new().with_max_levels(args.max_levels);
    if let Some(boundaries) = args.tier_boundaries {
        heading = heading.with_tier_boundaries(boundaries);
    }

    let mut options = BatchOptions::new().with_extract(extract).with_heading(heading);
    if args.sequential {
        options = options.sequential();
    }

    fs::create_dir_all(output_dir)?;

    let pb = progress_bar(inputs.len())?;
    pb.set_message("Extracting outlines...");
    let report = process_batch_with_progress(&inputs, &options, |_| pb.inc(1));
    pb.finish_with_message("Done!");

    let mut written = 0;
    for (path, document) in inputs.iter().zip(&report.documents) {
        let Ok(processed) = &document.result else {
            continue;
        };

        let mut payload = processed.outline_payload();
        if args.title_fallback {
            let stem = path.file_stem().unwrap_or_default().to_string_lossy();
            payload = payload.with_title_fallback(&stem);
        }

        let target = output_dir.join(output_name(path));
        fs::write(&target, to_json(&payload, args.format)?)?;
        println!(
            "  {} {} ({} headings)",
            "├─".dimmed(),
            target.display(),
            payload.outline.len()
        );
        written += 1;
    }

    print_diagnostics(&report);
    println!(
        "\n{} {} of {} outlines written",
        "Done!".green().bold(),
        written,
        inputs.len()
    );

    if written == 0 {
        return Err("no outline could be extracted".into());
    }
    Ok(())
}

/// `<stem>.json` for an input PDF.
fn output_name(path: &Path) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default();
    PathBuf::from(stem).with_extension("json")
}

fn cmd_rank(
    request_path: &Path,
    pdf_dir: &Path,
    output: &Path,
    rank: RankOptions,
    format: JsonFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = RankingRequest::from_path(request_path)?;
    log::debug!(
        "request {}: {} documents, similarity {}",
        request_path.display(),
        request.documents.len(),
        rank.similarity
    );
    let options = BatchOptions::new()
        .with_extract(ExtractOptions::new().lenient())
        .with_rank(rank);

    println!(
        "{} {} documents for {}",
        "Ranking".cyan().bold(),
        request.documents.len(),
        request.persona.role.bold()
    );

    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Extracting and scoring sections...");
    let (payload, report) = run_request(&request, pdf_dir, &options)?;
    pb.finish_and_clear();

    let target = if output.is_dir() {
        output.join("output.json")
    } else {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        output.to_path_buf()
    };
    fs::write(&target, to_json(&payload, format)?)?;

    for section in &payload.extracted_sections {
        println!(
            "  {} {} {} (p.{})",
            format!("#{}", section.importance_rank).green(),
            section.section_title.bold(),
            section.document.dimmed(),
            section.page_number
        );
    }

    print_diagnostics(&report);
    println!("\n{} {}", "Saved to".green(), target.display());
    Ok(())
}

fn print_diagnostics(report: &BatchReport) {
    for diagnostic in &report.diagnostics {
        match diagnostic {
            Diagnostic::Failed { .. } => {
                eprintln!("{} {}", "Failed:".red().bold(), diagnostic)
            }
            _ => eprintln!("{} {}", "Warning:".yellow(), diagnostic),
        }
    }
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let document = extract_runs(input, &ExtractOptions::new().lenient())?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), docsift::sniff_version(input)?);
    println!("{}: {}", "Pages".bold(), document.page_count);
    println!("{}: {}", "Text runs".bold(), document.runs.len());
    if !document.skipped_pages.is_empty() {
        println!("{}: {:?}", "Skipped pages".bold(), document.skipped_pages);
    }

    let stats = FontStatistics::from_runs(&document.runs);
    if let Some(baseline) = stats.baseline() {
        println!(
            "{}: {:.1}pt {:?}",
            "Body baseline".bold(),
            baseline.font_size,
            baseline.font_weight
        );
    }
    let sizes: Vec<String> = stats
        .distinct_sizes()
        .iter()
        .map(|s| format!("{:.1}", s))
        .collect();
    println!("{}: {}", "Font sizes".bold(), sizes.join(", "));

    println!();
    println!("{}", "Outline".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    match classify(&document.runs, &HeadingConfig::default()) {
        Ok(outline) => {
            let payload = OutlinePayload::from(&outline);
            if payload.title.is_empty() {
                println!("{}: {}", "Title".bold(), "(none)".dimmed());
            } else {
                println!("{}: {}", "Title".bold(), payload.title);
            }
            for node in &outline.tree {
                print_node(node, 0);
            }
        }
        Err(e) => println!("{} {}", "No outline:".yellow(), e),
    }

    Ok(())
}

fn print_node(node: &OutlineNode, depth: usize) {
    println!(
        "{}{} {} {}",
        "  ".repeat(depth),
        node.level.to_string().dimmed(),
        node.text,
        format!("p.{}", node.page_number).dimmed()
    );
    for child in &node.children {
        print_node(child, depth + 1);
    }
}

fn cmd_version() {
    println!("{} {}", "docsift".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF outline extraction and section ranking tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_name() {
        assert_eq!(
            output_name(Path::new("/in/file01.PDF")),
            PathBuf::from("file01.json")
        );
    }

    #[test]
    fn test_outline_on_empty_directory() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let args = OutlineArgs {
            title_fallback: false,
            pages: None,
            strict: false,
            max_levels: 3,
            tier_boundaries: None,
            format: JsonFormat::Pretty,
            sequential: true,
        };
        assert!(cmd_outline(input.path(), output.path(), args).is_ok());
    }

    #[test]
    fn test_outline_rejects_non_pdf_input() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "plain text").unwrap();
        let args = OutlineArgs {
            title_fallback: false,
            pages: None,
            strict: false,
            max_levels: 3,
            tier_boundaries: None,
            format: JsonFormat::Compact,
            sequential: true,
        };
        assert!(cmd_outline(&file, dir.path(), args).is_err());
    }

    #[test]
    fn test_cli_parses_rank_flags() {
        let cli = Cli::try_parse_from([
            "docsift",
            "rank",
            "request.json",
            "pdfs",
            "out.json",
            "--top-k",
            "10",
            "--similarity",
            "embedding",
        ])
        .unwrap();
        match cli.command {
            Commands::Rank {
                top_k, similarity, ..
            } => {
                assert_eq!(top_k, 10);
                assert!(similarity == SimilarityArg::Embedding);
            }
            _ => panic!("expected rank command"),
        }
    }

    #[test]
    fn test_cli_parses_tier_boundaries() {
        let cli = Cli::try_parse_from([
            "docsift",
            "outline",
            "in",
            "out",
            "--tier-boundaries",
            "20,16,13",
        ])
        .unwrap();
        match cli.command {
            Commands::Outline {
                tier_boundaries, ..
            } => assert_eq!(tier_boundaries, Some(vec![20.0, 16.0, 13.0])),
            _ => panic!("expected outline command"),
        }
    }
}
