//! unresume CLI - resume parsing tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unresume::{
    render, segment, JsonFormat, ParseOptions, RawDocument, ResumeParser, SkillCatalog,
};

#[derive(Parser)]
#[command(name = "unresume")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Parse PDF, DOCX and text resumes into structured JSON", long_about = None)]
struct Cli {
    /// Input resume file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Skill catalog JSON (embedded catalog if not specified)
    #[arg(long, global = true, value_name = "PATH", env = "UNRESUME_CATALOG")]
    catalog: Option<PathBuf>,

    /// Skip unreadable PDF pages instead of failing
    #[arg(long, global = true)]
    lenient: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a resume to JSON
    Parse {
        /// Input resume file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Parse several resumes to a JSON array
    Batch {
        /// Input resume files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Parse one file at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Print the extracted text
    Text {
        /// Input resume file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print text as extracted, before normalization
        #[arg(long)]
        raw: bool,
    },

    /// Show the detected sections
    Sections {
        /// Input resume file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output sections as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let settings = Settings {
        catalog: cli.catalog,
        lenient: cli.lenient,
    };

    let result = match cli.command {
        Some(Commands::Parse {
            input,
            output,
            compact,
        }) => cmd_parse(&settings, &input, output.as_deref(), compact),
        Some(Commands::Batch {
            inputs,
            output,
            compact,
            sequential,
        }) => cmd_batch(&settings, &inputs, output.as_deref(), compact, sequential),
        Some(Commands::Text { input, raw }) => cmd_text(&settings, &input, raw),
        Some(Commands::Sections { input, json }) => cmd_sections(&settings, &input, json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: parse if input is provided
            if let Some(input) = cli.input {
                cmd_parse(&settings, &input, None, false)
            } else {
                println!("{}", "Usage: unresume <FILE>".yellow());
                println!("       unresume --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Options shared by every command.
struct Settings {
    catalog: Option<PathBuf>,
    lenient: bool,
}

impl Settings {
    fn parser(&self, options: ParseOptions) -> Result<ResumeParser, Box<dyn std::error::Error>> {
        let catalog = match &self.catalog {
            Some(path) => {
                log::debug!("loading skill catalog from {}", path.display());
                SkillCatalog::from_path(path)?
            }
            None => SkillCatalog::embedded()?,
        };
        let options = if self.lenient {
            options.lenient()
        } else {
            options
        };
        Ok(ResumeParser::new(&catalog).with_options(options))
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_parse(
    settings: &Settings,
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let parser = settings.parser(ParseOptions::new())?;
    let resume = parser.parse_file(input)?;

    if let Some(ref error) = resume.error {
        eprintln!("{}: {}", "Warning".yellow().bold(), error);
    }

    let json = render::to_json(&resume, json_format(compact))?;
    write_output(output, &json)
}

fn cmd_batch(
    settings: &Settings,
    inputs: &[PathBuf],
    output: Option<&Path>,
    compact: bool,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let parser = settings.parser(ParseOptions::new().with_parallel(!sequential))?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let items = parser.parse_batch_with(inputs, |item| {
        pb.set_message(item.file().to_string());
        pb.inc(1);
    });
    pb.finish_with_message("Done!");

    let failed: Vec<_> = items.iter().filter(|item| item.is_failed()).collect();
    for item in &failed {
        eprintln!("{} {}", "Failed".red(), item.file());
    }
    eprintln!(
        "{} {} parsed, {} failed",
        "Summary:".bold(),
        items.len() - failed.len(),
        failed.len()
    );

    let json = render::batch_to_json(&items, json_format(compact))?;
    write_output(output, &json)
}

fn cmd_text(settings: &Settings, input: &Path, raw: bool) -> Result<(), Box<dyn std::error::Error>> {
    let parser = settings.parser(ParseOptions::new())?;
    let doc = RawDocument::from_path(input)?;

    let text = if raw {
        parser.extract_raw(&doc)?
    } else {
        parser.extract_text(&doc)?
    };
    println!("{}", text);
    Ok(())
}

fn cmd_sections(
    settings: &Settings,
    input: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let parser = settings.parser(ParseOptions::new())?;
    let doc = RawDocument::from_path(input)?;
    let sections = segment::segment(&parser.extract_text(&doc)?);

    if json {
        println!("{}", serde_json::to_string_pretty(&sections)?);
        return Ok(());
    }

    for (section, text) in sections.iter() {
        println!("{}", section.as_str().to_uppercase().cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        if text.trim().is_empty() {
            println!("{}", "(empty)".dimmed());
        } else {
            println!("{}", text);
        }
        println!();
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "unresume".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Resume parsing tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/unresume".dimmed());
    println!("License: MIT");
}
