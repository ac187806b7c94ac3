//! CLI request layer: loads the artifacts, validates input, runs the
//! classifier, renders the result.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use codetect_ai::Classifier;
use codetect_core::{AppConfig, LabelMap};

/// Largest snippet the request layer accepts, in characters.
const MAX_INPUT_CHARS: usize = 2048;

#[derive(Parser)]
#[command(
    name = "codetect",
    about = "Programming-language detection for source snippets",
    version
)]
struct Cli {
    /// YAML config naming the model, tokenizer, and label-map artifacts.
    #[arg(
        long,
        env = "CODETECT_CONFIG",
        default_value = "configs/codetect.yaml",
        global = true
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a snippet given as an argument, from a file, or on stdin.
    Classify {
        /// Snippet text. Reads stdin when neither this nor --file is given.
        text: Option<String>,

        /// Read the snippet from a file instead.
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },

    /// Print the label map, sorted by class index.
    Labels,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = AppConfig::from_file(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;

    match cli.command {
        Command::Classify { text, file } => classify(&config, text, file),
        Command::Labels => labels(&config),
    }
}

fn classify(config: &AppConfig, text: Option<String>, file: Option<PathBuf>) -> anyhow::Result<()> {
    // Artifact load is fatal before any request is read.
    let mut classifier = Classifier::load(config)?;

    let snippet = read_snippet(text, file)?;
    validate_request(&snippet)?;

    info!(chars = snippet.chars().count(), "new classify request");
    let prediction = classifier.classify(&snippet)?;
    let elapsed_ms = prediction.elapsed.as_secs_f64() * 1000.0;
    info!(
        class = prediction.class_index,
        label = %prediction.label,
        elapsed_ms,
        "classified snippet"
    );

    println!(
        "{} (class {}, {:.3} ms)",
        prediction.label, prediction.class_index, elapsed_ms
    );
    Ok(())
}

fn labels(config: &AppConfig) -> anyhow::Result<()> {
    let map = LabelMap::from_file(&config.labels_path)?;
    for (index, label) in map.iter() {
        println!("{index:>4}  {label}");
    }
    Ok(())
}

fn read_snippet(text: Option<String>, file: Option<PathBuf>) -> anyhow::Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(&path)
            .with_context(|| format!("reading snippet file {}", path.display()));
    }

    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("reading snippet from stdin")?;
    Ok(buf)
}

/// Request contract owned by this layer: non-empty, at most
/// [`MAX_INPUT_CHARS`] characters.
fn validate_request(snippet: &str) -> anyhow::Result<()> {
    anyhow::ensure!(!snippet.trim().is_empty(), "snippet is empty");

    let chars = snippet.chars().count();
    anyhow::ensure!(
        chars <= MAX_INPUT_CHARS,
        "snippet is {chars} characters, the limit is {MAX_INPUT_CHARS}"
    );

    Ok(())
}
