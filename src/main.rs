use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use fact_dedup::embedding::EmbeddingTable;
use fact_dedup::export::write_json_atomic;
use fact_dedup::record::{ingest, parse_records, ParseOptions, Record};
use fact_dedup::types::audit_trail;
use fact_dedup::{DedupConfig, DedupPipeline, PipelineOutput};
use tracing::info;

/// Remove duplicate and near-duplicate records, then order each category by similarity.
#[derive(Debug, Parser)]
#[command(name = "fact-dedup", version)]
struct Cli {
    /// JSON input: a list of records, or an object holding one under facts/data/results.
    #[arg(long)]
    input: PathBuf,
    /// Where to write the final ordered corpus.
    #[arg(long)]
    output: PathBuf,
    /// Where to write removed/kept pairs for review.
    #[arg(long)]
    removed: Option<PathBuf>,
    /// Keep at most this many entries in the removed-pairs file.
    #[arg(long)]
    audit_limit: Option<usize>,
    /// Where to write the run report.
    #[arg(long)]
    report: Option<PathBuf>,
    /// Precomputed embeddings, `[{"text": ..., "embedding": [...]}]`. Enables semantic dedup.
    #[arg(long)]
    embeddings: Option<PathBuf>,
    /// JSON file overriding any of the dedup options.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Category for records that carry none. Defaults to the input file stem.
    #[arg(long)]
    default_category: Option<String>,
    #[arg(long)]
    lexical_threshold: Option<f64>,
    #[arg(long)]
    semantic_threshold: Option<f64>,
    #[arg(long)]
    ngram_size: Option<usize>,
    #[arg(long)]
    block_size: Option<usize>,
    #[arg(long)]
    min_length_ratio: Option<f64>,
    #[arg(long)]
    min_word_overlap: Option<f64>,
}

impl Cli {
    fn dedup_config(&self) -> Result<DedupConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
            None => DedupConfig::default(),
        };
        if let Some(v) = self.lexical_threshold {
            config.lexical_threshold = v;
        }
        if let Some(v) = self.semantic_threshold {
            config.semantic_threshold = v;
        }
        if let Some(v) = self.ngram_size {
            config.ngram_size = v;
        }
        if let Some(v) = self.block_size {
            config.block_size = v;
        }
        if let Some(v) = self.min_length_ratio {
            config.min_length_ratio = v;
        }
        if let Some(v) = self.min_word_overlap {
            config.min_word_overlap = v;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("fact-dedup: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = cli.dedup_config()?;

    let document: serde_json::Value = serde_json::from_str(&fs::read_to_string(&cli.input)?)?;
    let source_file = cli
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    let options = ParseOptions {
        source_file: source_file.as_deref(),
        default_category: cli.default_category.as_deref(),
    };
    let parsed = parse_records(&document, options)?;
    let records = ingest(parsed.records)?;
    info!(
        records = records.len(),
        skipped = parsed.rejected.len(),
        input = %cli.input.display(),
        "loaded records"
    );

    let output = match &cli.embeddings {
        Some(path) => {
            let table = EmbeddingTable::from_json(&fs::read_to_string(path)?)?;
            DedupPipeline::semantic(config, table)?.run(records.clone())
        }
        None => DedupPipeline::lexical(config)?.run(records.clone()),
    };

    write_outputs(cli, &records, &output)
}

fn write_outputs(cli: &Cli, input: &[Record], output: &PipelineOutput) -> Result<(), Box<dyn Error>> {
    write_json_atomic(&output.corpus, &cli.output)?;

    if let Some(path) = &cli.removed {
        let mut audit = audit_trail(input, &output.removals);
        if let Some(limit) = cli.audit_limit {
            audit.truncate(limit);
        }
        write_json_atomic(&audit, path)?;
    }

    if let Some(path) = &cli.report {
        write_json_atomic(&output.report, path)?;
    }

    let report = &output.report;
    println!("Input records:        {}", report.input_records);
    println!("Exact removed:        {}", report.exact_removed);
    println!(
        "Similar removed:      {} ({:?})",
        report.similarity_removed, report.similarity_method
    );
    if let Some(reason) = &report.fallback_reason {
        println!("Semantic fallback:    {reason}");
    }
    println!("Final records:        {}", report.output_records);
    println!("Categories:           {}", report.categories.len());
    println!("Saved to:             {}", cli.output.display());
    Ok(())
}
