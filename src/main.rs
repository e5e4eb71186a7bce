//! kbdocx - Knowledge-base article to Word converter

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use kbdocx::{Converter, ExportConfig};

#[derive(Parser)]
#[command(name = "kbdocx")]
#[command(version, about = "Convert knowledge-base HTML articles to DOCX", long_about = None)]
#[command(after_help = "EXAMPLES:
    kbdocx article.html                  Write <title>_<timestamp>.docx
    kbdocx article.html runbook.docx     Write to an explicit path
    kbdocx - --title \"SOP\" < a.html      Read HTML from stdin
    kbdocx --dump article.html           Print the converted blocks as JSON")]
struct Cli {
    /// Input HTML file, or - for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output .docx file (default: derived from the title)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Document title (default: input file stem)
    #[arg(short, long)]
    title: Option<String>,

    /// Print the converted block list as JSON instead of writing a file
    #[arg(long)]
    dump: bool,

    /// Do not append a timestamp to the derived file name
    #[arg(long)]
    no_timestamp: bool,

    /// Scale images to fit the image box instead of stretching them
    #[arg(long)]
    keep_aspect: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,

    /// Log conversion details
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let default_level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();
}

fn run(cli: &Cli) -> Result<(), String> {
    let bytes = read_input(&cli.input).map_err(|e| format!("{}: {e}", cli.input))?;
    let html = kbdocx::decode_html(&bytes);

    let config = ExportConfig {
        preserve_image_aspect: cli.keep_aspect,
        timestamp_filename: !cli.no_timestamp,
        ..ExportConfig::default()
    };

    if cli.dump {
        let blocks = Converter::new(config.image_decoder()).convert(&html);
        let json = serde_json::to_string_pretty(&blocks).map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(());
    }

    let title = cli.title.clone().unwrap_or_else(|| default_title(&cli.input));
    let export =
        kbdocx::export_docx_with_config(&html, &title, &config).map_err(|e| e.to_string())?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&export.filename));
    std::fs::write(&output, &export.bytes).map_err(|e| format!("{}: {e}", output.display()))?;

    if !cli.quiet {
        println!("Wrote {} ({} bytes)", output.display(), export.bytes.len());
    }
    Ok(())
}

fn read_input(input: &str) -> std::io::Result<Vec<u8>> {
    if input == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read(input)
    }
}

fn default_title(input: &str) -> String {
    if input == "-" {
        return "document".to_string();
    }
    Path::new(input)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}
