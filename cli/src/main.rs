//! gendoc CLI - visit report generator
//!
//! Fills a Word template with the first record of a spreadsheet export.

use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use gendoc::docx::Template;
use gendoc::options::DEFAULT_ACCENT_COLOR;
use gendoc::render::{JsonFormat, PreviewOptions};
use gendoc::FillOptions;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Field printed after generation to identify the structure.
const NAME_FIELD: &str = "Nom";

/// Generate personalized visit reports from a spreadsheet export
#[derive(Parser)]
#[command(
    name = "gendoc",
    version,
    about = "Generate visit reports from a Word template and a spreadsheet",
    long_about = "gendoc - fills <<Field>> placeholders of a Word template with the first \
                  data row of a spreadsheet.\n\n\
                  The report is named \"{Code de la structure} CRV {YYYY.MM.DD}.docx\"."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a report from a spreadsheet and a template
    #[command(visible_alias = "gen")]
    Generate {
        /// Spreadsheet export (.xlsx, .xls, .ods)
        #[arg(short, long)]
        data: PathBuf,

        /// Word template
        #[arg(short, long, default_value = "template_assoc.docx")]
        template: PathBuf,

        /// Directory the report is written into
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Hex color of inserted values
        #[arg(long, default_value = DEFAULT_ACCENT_COLOR)]
        accent_color: String,

        /// Do not render inserted values in bold
        #[arg(long)]
        no_bold: bool,

        /// Also fill page headers and footers
        #[arg(long)]
        headers_footers: bool,

        /// Write the document to stdout instead of a file
        #[arg(long)]
        stdout: bool,
    },

    /// Show the record a spreadsheet provides
    Preview {
        /// Spreadsheet export
        input: PathBuf,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// List the placeholders of a template
    Inspect {
        /// Word template
        input: PathBuf,

        /// Include page headers and footers
        #[arg(long)]
        headers_footers: bool,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Generate {
            data,
            template,
            output_dir,
            accent_color,
            no_bold,
            headers_footers,
            stdout,
        } => {
            let pb = create_spinner("Opening template...");
            let template = Template::open(&template)?;

            pb.set_message("Reading spreadsheet...");
            let record = gendoc::xlsx::read_first_record(&data)?;

            pb.set_message("Generating report...");
            let options = FillOptions::new()
                .with_accent_color(accent_color)
                .with_bold_values(!no_bold)
                .with_headers_footers(headers_footers);
            let filled = gendoc::fill_with_options(&template, &record, &options)?;

            pb.finish_and_clear();

            let name = record.display(NAME_FIELD, &options.missing_value_text);
            if stdout {
                io::stdout().lock().write_all(&filled.data)?;
                eprintln!("{} {} ({})", "✓".green().bold(), name, filled.filename);
                return Ok(());
            }

            let path = filled.write_to(&output_dir)?;
            println!("{}: {}", "Structure".bold(), name);
            println!("{} Report written: {}", "✓".green().bold(), path.display());

            if !filled.report.unmatched.is_empty() {
                println!(
                    "{} Placeholders without a matching column: {}",
                    "!".yellow().bold(),
                    filled.report.unmatched.join(", ")
                );
            }
        }

        Commands::Preview { input, json } => {
            let pb = create_spinner("Reading spreadsheet...");
            let record = gendoc::xlsx::read_first_record(&input)?;
            pb.finish_and_clear();

            if json {
                println!("{}", gendoc::render::to_json(&record, JsonFormat::Pretty)?);
            } else {
                println!("{}", "Record".cyan().bold());
                println!("{}", "─".repeat(40));
                print!("{}", gendoc::render::preview(&record, &PreviewOptions::default()));
            }
        }

        Commands::Inspect {
            input,
            headers_footers,
            json,
        } => {
            let pb = create_spinner("Analyzing template...");
            let template = Template::open(&input)?;
            let options = FillOptions::new().with_headers_footers(headers_footers);
            let placeholders = template.placeholders_with(&options)?;
            let doc = template.document()?;
            pb.finish_and_clear();

            if json {
                println!("{}", serde_json::to_string_pretty(&placeholders)?);
                return Ok(());
            }

            println!("{}", "Template Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Format".bold(), template.format());
            println!("{}: {}", "Paragraphs".bold(), doc.paragraphs.len());
            println!("{}: {}", "Tables".bold(), doc.tables.len());
            println!(
                "{}: {}",
                "Headers/footers".bold(),
                template.header_footer_parts().count()
            );

            println!("\n{}", "Placeholders".cyan().bold());
            println!("{}", "─".repeat(40));
            if placeholders.is_empty() {
                println!("{} No placeholders found", "!".yellow().bold());
            }
            for name in &placeholders {
                println!("{}{}{}", options.token_open, name, options.token_close);
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn print_version() {
    println!("{} {}", "gendoc".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Visit report generator for Word templates");
    println!();
    println!("Templates: DOCX, DOTX");
    println!("Data: XLSX, XLS, XLSB, ODS");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
