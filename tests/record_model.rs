use fact_dedup::record::{
    ingest, parse_records, ParseOptions, RawRecord, RecordError, DEFAULT_CATEGORY,
};
use serde_json::json;

#[test]
fn ids_follow_input_order() {
    let records = ingest(vec![
        RawRecord::new("first", "a"),
        RawRecord::new("second", "b"),
        RawRecord::new("third", "a"),
    ])
    .unwrap();
    let ids: Vec<u64> = records.iter().map(|r| r.id.get()).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn invariant_empty_text_rejected() {
    let result = ingest(vec![RawRecord::new("ok", "a"), RawRecord::new("", "a")]);
    match result {
        Err(RecordError::MalformedRecord { index, .. }) => assert_eq!(index, 1),
        other => panic!("expected MalformedRecord, got {other:?}"),
    }
}

#[test]
fn text_len_counts_chars() {
    let records = ingest(vec![RawRecord::new("naïve café", "a")]).unwrap();
    assert_eq!(records[0].text_len(), 10);
}

#[test]
fn parse_list_of_objects() {
    let doc = json!([
        {"text": "Honey never spoils.", "category": "food", "source_url": "https://example.org/honey", "year": 2020},
        {"fact": "Owls cannot move their eyes.", "topic": "animals", "url": "https://example.org/owls"},
        {"title": "Gold does not rust."}
    ]);

    let raw = parse_records(&doc, ParseOptions::default()).unwrap().records;

    assert_eq!(raw.len(), 3);
    assert_eq!(raw[0].text, "Honey never spoils.");
    assert_eq!(raw[0].category, "food");
    assert_eq!(raw[0].metadata.get("source_url"), Some("https://example.org/honey"));
    assert_eq!(raw[0].metadata.get("year"), Some("2020"));
    assert_eq!(raw[0].metadata.get("text"), None);

    assert_eq!(raw[1].text, "Owls cannot move their eyes.");
    assert_eq!(raw[1].category, "animals");
    assert_eq!(raw[1].metadata.get("source_url"), Some("https://example.org/owls"));

    assert_eq!(raw[2].category, DEFAULT_CATEGORY);
}

#[test]
fn parse_wrapped_list_of_strings_with_default_category() {
    let doc = json!({"facts": ["Mars has two moons.", "Venus spins backwards."]});

    let options = ParseOptions::default().with_default_category(Some("space"));
    let raw = parse_records(&doc, options).unwrap().records;

    assert_eq!(raw.len(), 2);
    assert!(raw.iter().all(|r| r.category == "space"));
    assert!(raw[0].metadata.is_empty());
}

#[test]
fn parse_prefers_text_over_other_fields() {
    let doc = json!([{"description": "long form", "text": "short form", "content": ""}]);
    let raw = parse_records(&doc, ParseOptions::default()).unwrap().records;
    assert_eq!(raw[0].text, "short form");
    assert_eq!(raw[0].metadata.get("description"), Some("long form"));
}

#[test]
fn parse_skips_items_without_text_and_keeps_the_rest() {
    let doc = json!([
        {"text": "Honey never spoils.", "category": "food"},
        {"url": "https://example.org/orphan"},
        17,
        {"text": "   "},
        "Owls cannot move their eyes.",
        " \t "
    ]);
    let options = ParseOptions::default().with_default_category(Some("biology"));

    let parsed = parse_records(&doc, options).unwrap();

    let texts: Vec<&str> = parsed.records.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["Honey never spoils.", "Owls cannot move their eyes."]);
    assert_eq!(parsed.records[1].category, "biology");

    let rejected: Vec<usize> = parsed
        .rejected
        .iter()
        .map(|err| match err {
            RecordError::MalformedRecord { index, .. } => *index,
        })
        .collect();
    assert_eq!(rejected, vec![1, 2, 3, 5]);

    // skipped items never reach ingestion
    let records = ingest(parsed.records).unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn parse_rejects_documents_of_the_wrong_shape() {
    assert!(matches!(
        parse_records(&json!(42), ParseOptions::default()),
        Err(RecordError::MalformedRecord { index: 0, .. })
    ));
    assert!(parse_records(&json!("just a string"), ParseOptions::default()).is_err());

    let parsed = parse_records(&json!([17]), ParseOptions::default()).unwrap();
    assert!(parsed.records.is_empty());
    assert_eq!(parsed.rejected.len(), 1);
}

#[test]
fn parse_from_file_records_source_and_uses_stem_as_category() {
    let doc = json!({"data": [
        {"text": "Lightning strikes Earth about 100 times a second."},
        {"text": "A day on Venus is longer than its year.", "topic": "space"},
        {"text": "Bananas are berries.", "source_file": "curated.json"}
    ]});

    let raw = parse_records(&doc, ParseOptions::from_file("weather.json"))
        .unwrap()
        .records;

    assert_eq!(raw[0].category, "weather");
    assert_eq!(raw[0].metadata.get("source_file"), Some("weather.json"));
    assert_eq!(raw[1].category, "space");
    assert_eq!(raw[1].metadata.get("source_file"), Some("weather.json"));
    assert_eq!(raw[2].metadata.get("source_file"), Some("curated.json"));
}

#[test]
fn explicit_default_category_beats_file_stem() {
    let doc = json!(["Mars has two moons."]);
    let options =
        ParseOptions::from_file("scraped/space_facts.json").with_default_category(Some("space"));
    assert_eq!(options.fallback_category(), "space");

    let raw = parse_records(&doc, options).unwrap().records;
    assert_eq!(raw[0].category, "space");
    assert_eq!(raw[0].metadata.get("source_file"), Some("scraped/space_facts.json"));

    assert_eq!(
        ParseOptions::from_file("space_facts.json").fallback_category(),
        "space_facts"
    );
    assert_eq!(ParseOptions::default().fallback_category(), DEFAULT_CATEGORY);
}
