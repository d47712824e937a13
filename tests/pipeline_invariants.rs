use fact_dedup::embedding::{EmbeddingError, EmbeddingProvider, EmbeddingTable};
use fact_dedup::record::{ingest, RawRecord, Record};
use fact_dedup::text::normalize;
use fact_dedup::types::{DedupMethod, RecordId};
use fact_dedup::{ConfigError, DedupConfig, DedupPipeline, PipelineError};

fn corpus_records() -> Vec<Record> {
    ingest(vec![
        RawRecord::new("Honey never spoils and can last for thousands of years.", "food"),
        RawRecord::new("The cat sleeps.", "animals"),
        RawRecord::new("Honey never spoils and can last thousands of years.", "food"),
        RawRecord::new("the cat sleeps", "animals"),
        RawRecord::new("Dogs bark loudly at night.", "animals"),
        RawRecord::new("Octopuses have three hearts and blue blood.", "animals"),
        RawRecord::new("Octopuses have three hearts plus blue blood.", "animals"),
        RawRecord::new("Bananas are berries but strawberries are not.", "food"),
    ])
    .unwrap()
}

/// Hashes normalized text into a small vector; identical texts embed identically.
struct HashingEmbedder;

impl EmbeddingProvider for HashingEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts
            .iter()
            .map(|t| {
                let mut v = vec![0.0f32; 16];
                for word in t.split(' ') {
                    let bucket = word.bytes().fold(7usize, |h, b| h.wrapping_mul(31).wrapping_add(b as usize)) % 16;
                    v[bucket] += 1.0;
                }
                v
            })
            .collect())
    }
}

struct Offline;

impl EmbeddingProvider for Offline {
    fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::Unavailable("model server down".into()))
    }
}

struct ShortAnswer;

impl EmbeddingProvider for ShortAnswer {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().skip(1).map(|_| vec![1.0, 0.0]).collect())
    }
}

#[test]
fn scenario_three_records_two_survive() {
    let pipeline = DedupPipeline::default();
    let output = pipeline
        .run_raw(vec![
            RawRecord::new("The cat sleeps.", "animals"),
            RawRecord::new("the cat sleeps", "animals"),
            RawRecord::new("Dogs bark loudly at night.", "animals"),
        ])
        .unwrap();

    let texts: Vec<&str> = output.corpus.records().iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["The cat sleeps.", "Dogs bark loudly at night."]);
    assert_eq!(output.removals.len(), 1);
    assert_eq!(output.removals[0].method, DedupMethod::Exact);
    assert_eq!(output.removals[0].removed_id, RecordId::new(1));
}

#[test]
fn lexical_pass_report_and_log_order() {
    let output = DedupPipeline::lexical(DedupConfig::default()).unwrap().run(corpus_records());

    // exact removals come first in the log
    let methods: Vec<DedupMethod> = output.removals.iter().map(|d| d.method).collect();
    assert_eq!(methods, vec![DedupMethod::Exact, DedupMethod::Lexical, DedupMethod::Lexical]);

    let report = &output.report;
    assert_eq!(report.input_records, 8);
    assert_eq!(report.exact_removed, 1);
    assert_eq!(report.similarity_method, DedupMethod::Lexical);
    assert_eq!(report.similarity_removed, 2);
    assert_eq!(report.output_records, 5);
    assert_eq!(report.fallback_reason, None);
    assert_eq!(report.categories.get("animals"), Some(&3));
    assert_eq!(report.categories.get("food"), Some(&2));

    let labels: Vec<&str> = output.corpus.groups().iter().map(|(l, _)| *l).collect();
    assert_eq!(labels, vec!["animals", "food"]);
}

#[test]
fn invariant_pipeline_is_idempotent() {
    let pipeline = DedupPipeline::lexical(DedupConfig::default()).unwrap();

    let first = pipeline.run(corpus_records());
    let second = pipeline.run(first.corpus.clone().into_records());

    assert!(second.removals.is_empty());
    assert_eq!(second.corpus, first.corpus);
}

#[test]
fn invariant_semantic_pipeline_is_idempotent() {
    let pipeline = DedupPipeline::semantic(DedupConfig::default(), HashingEmbedder).unwrap();

    let first = pipeline.run(corpus_records());
    assert_eq!(first.report.similarity_method, DedupMethod::Semantic);
    assert!(first
        .removals
        .iter()
        .skip(first.report.exact_removed)
        .all(|d| d.method == DedupMethod::Semantic));

    let second = pipeline.run(first.corpus.clone().into_records());
    assert!(second.removals.is_empty());
}

#[test]
fn invariant_runs_are_deterministic() {
    let pipeline = DedupPipeline::lexical(DedupConfig::default()).unwrap();

    let a = pipeline.run(corpus_records());
    let b = pipeline.run(corpus_records());

    assert_eq!(
        serde_json::to_string(&a.corpus).unwrap(),
        serde_json::to_string(&b.corpus).unwrap()
    );
    assert_eq!(a.removals, b.removals);
}

#[test]
fn provider_failure_falls_back_to_lexical() {
    let lexical = DedupPipeline::lexical(DedupConfig::default()).unwrap().run(corpus_records());

    for output in [
        DedupPipeline::semantic(DedupConfig::default(), Offline).unwrap().run(corpus_records()),
        DedupPipeline::semantic(DedupConfig::default(), ShortAnswer).unwrap().run(corpus_records()),
    ] {
        assert_eq!(output.report.similarity_method, DedupMethod::Lexical);
        assert!(output.report.fallback_reason.is_some());
        assert_eq!(output.corpus, lexical.corpus);
        assert_eq!(output.removals, lexical.removals);
    }
}

#[test]
fn incomplete_embedding_table_falls_back() {
    let table: EmbeddingTable = vec![("The cat sleeps.", vec![1.0, 0.0])].into_iter().collect();
    let output = DedupPipeline::semantic(DedupConfig::default(), &table).unwrap().run(corpus_records());

    assert_eq!(output.report.similarity_method, DedupMethod::Lexical);
    let reason = output.report.fallback_reason.unwrap();
    assert!(reason.contains("unavailable"), "{reason}");
}

#[test]
fn complete_embedding_table_runs_semantic() {
    let records = corpus_records();
    let table: EmbeddingTable = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            // the honey pair shares a direction, everything else is orthogonal
            let mut v = vec![0.0f32; records.len()];
            v[if i == 2 { 0 } else { i }] = 1.0;
            (normalize(&r.text), v)
        })
        .collect();

    let output = DedupPipeline::semantic(DedupConfig::default(), table).unwrap().run(records);

    assert_eq!(output.report.similarity_method, DedupMethod::Semantic);
    assert_eq!(output.report.similarity_removed, 1);
    let semantic = &output.removals[output.report.exact_removed];
    assert_eq!(semantic.kept_id, RecordId::new(0));
    assert_eq!(semantic.removed_id, RecordId::new(2));
}

#[test]
fn invalid_configuration_fails_before_any_work() {
    let bad_threshold = DedupConfig {
        lexical_threshold: 1.5,
        ..DedupConfig::default()
    };
    assert!(matches!(
        DedupPipeline::lexical(bad_threshold),
        Err(ConfigError::ThresholdOutOfRange { name: "lexical_threshold", .. })
    ));

    let bad_block = DedupConfig {
        block_size: 0,
        ..DedupConfig::default()
    };
    assert!(matches!(
        DedupPipeline::semantic(bad_block, HashingEmbedder),
        Err(ConfigError::InvalidBlockSize)
    ));

    let nan = DedupConfig {
        semantic_threshold: f64::NAN,
        ..DedupConfig::default()
    };
    assert!(nan.validate().is_err());
}

#[test]
fn malformed_record_rejected_at_ingestion() {
    let err = DedupPipeline::default()
        .run_raw(vec![RawRecord::new("fine", "x"), RawRecord::new("   ", "x")])
        .unwrap_err();
    assert!(matches!(err, PipelineError::Record(_)));
}
