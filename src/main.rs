//! Rosterload CLI - validate and upload candidate rosters
//!
//! # Main Commands
//!
//! ```bash
//! rosterload template out.xlsx       # Write the canonical template workbook
//! rosterload check roster.xlsx       # Decode + validate + preview a roster
//! rosterload upload roster.xlsx      # Full pipeline: validate then bulk-submit
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! rosterload parse roster.xlsx       # Just decode the document to JSON
//! ```

use clap::{Parser, Subcommand};
use rosterload::{
    decode_bytes, parse_has_resume, project, success_message, user_message, validate,
    write_template, DocumentFormat, HttpSubmitClient, SelectionSummary, UploadOrchestrator,
    UploadOutcome,
};
use serde_json::Value;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rosterload")]
#[command(about = "Validate and bulk-upload candidate roster spreadsheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the canonical roster template workbook
    Template {
        /// Output path (default: candidate_template.xlsx)
        output: Option<PathBuf>,
    },

    /// Decode a roster document and output its rows as JSON
    Parse {
        /// Input document (.xlsx, .xls or .csv)
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode and validate a roster document, then show the preview slice
    Check {
        /// Input document (.xlsx, .xls or .csv)
        input: PathBuf,
    },

    /// Full pipeline: decode, validate, preview, confirm, bulk-submit
    Upload {
        /// Input document (.xlsx, .xls or .csv)
        input: PathBuf,

        /// Bulk-submit endpoint URL (default: $ROSTERLOAD_ENDPOINT)
        #[arg(short, long)]
        endpoint: Option<String>,

        /// Skip the interactive confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Template { output } => cmd_template(output.as_deref()),
        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),
        Commands::Check { input } => cmd_check(&input),
        Commands::Upload { input, endpoint, yes } => cmd_upload(&input, endpoint, yes).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_template(output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let path = output.unwrap_or_else(|| Path::new(rosterload::TEMPLATE_FILE_NAME));
    write_template(path)?;
    eprintln!("Template written to: {}", path.display());
    eprintln!("Fill in the candidate rows and upload with 'rosterload upload'.");
    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Decoding: {}", input.display());

    let bytes = fs::read(input)?;
    let doc = decode_bytes(&bytes)?;

    describe_format(&doc.format);
    eprintln!("   Columns: {}", doc.headers.join(", "));
    eprintln!("Decoded {} rows", doc.rows.len());

    let json = serde_json::to_string_pretty(&doc.rows)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_check(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Checking: {}", input.display());

    let bytes = fs::read(input)?;
    let doc = decode_bytes(&bytes)?;
    describe_format(&doc.format);

    let outcome = validate(&doc.headers, &doc.rows);
    if !outcome.missing_fields.is_empty() {
        eprintln!("Missing required fields: {}", outcome.missing_fields.join(", "));
        std::process::exit(1);
    }
    if !outcome.row_errors.is_empty() {
        eprintln!("{} row error(s):", outcome.row_errors.len());
        for err in outcome.row_errors.iter().take(10) {
            eprintln!("   - {}", err);
        }
        std::process::exit(1);
    }

    eprintln!("All {} rows valid", doc.rows.len());

    let flagged = doc
        .rows
        .iter()
        .filter(|row| {
            row.get("has_resume")
                .and_then(Value::as_str)
                .and_then(parse_has_resume)
                == Some(false)
        })
        .count();
    if flagged > 0 {
        eprintln!("{} candidate(s) flagged without a resume will be notified on upload", flagged);
    }

    print_preview(&doc.headers, project(&doc.rows), doc.rows.len());
    Ok(())
}

async fn cmd_upload(
    input: &Path,
    endpoint: Option<String>,
    yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = match endpoint {
        Some(url) => HttpSubmitClient::new(url),
        None => HttpSubmitClient::from_env()?,
    };
    eprintln!("Endpoint: {}", client.endpoint());
    eprintln!("Reading: {}", input.display());

    let bytes = tokio::fs::read(input).await?;

    let orchestrator = UploadOrchestrator::new(client);
    let summary = match orchestrator.select_file(&bytes) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("{}", user_message(&e));
            std::process::exit(1);
        }
    };

    print_preview(&summary.headers, &summary.preview, summary.row_count);

    if !yes && !confirm_prompt(&summary)? {
        eprintln!("Upload cancelled.");
        return Ok(());
    }

    match orchestrator.confirm_upload().await {
        Ok(UploadOutcome::Submitted(result)) => {
            eprintln!("{}", success_message(&result));
            Ok(())
        }
        Ok(UploadOutcome::AlreadyUploading) => Ok(()),
        Err(e) => {
            eprintln!("{}", user_message(&e));
            std::process::exit(1);
        }
    }
}

fn confirm_prompt(summary: &SelectionSummary) -> Result<bool, Box<dyn std::error::Error>> {
    eprint!("Upload {} candidates? [y/N] ", summary.row_count);
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

fn describe_format(format: &DocumentFormat) {
    match format {
        DocumentFormat::Xlsx => eprintln!("   Format: xlsx"),
        DocumentFormat::Xls => eprintln!("   Format: xls (legacy)"),
        DocumentFormat::Csv { encoding, delimiter } => {
            let shown = match delimiter {
                '\t' => "\\t".to_string(),
                c => c.to_string(),
            };
            eprintln!("   Format: csv (encoding {}, delimiter '{}')", encoding, shown);
        }
    }
}

fn print_preview(headers: &[String], preview: &[Value], total: usize) {
    eprintln!("\nPreview ({} of {} rows):", preview.len(), total);
    eprintln!("   {}", headers.join(" | "));
    for row in preview {
        let cells: Vec<&str> = headers
            .iter()
            .map(|h| row.get(h).and_then(Value::as_str).unwrap_or_default())
            .collect();
        eprintln!("   {}", cells.join(" | "));
    }
    eprintln!();
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
