use std::fs;

use chrono::NaiveDate;
use paper_cache::paper::{DiscoveryParams, FetchedPaper, PaperId, PaperRecord};
use paper_cache::query::{SearchParams, SearchRequest};
use paper_cache::registry::RegistryStore;
use paper_cache::types::TopicSlug;
use serde_json::Value;
use tempfile::tempdir;

fn sample() -> (PaperId, PaperRecord) {
    let mut params = SearchParams::new("Attention Is All You Need");
    params.sort_by = "relevance".into();
    params.search_field = "title".into();
    params.date_from = Some("20170101".into());
    let request = SearchRequest::normalize(params);

    PaperRecord::discovered(
        FetchedPaper {
            id: PaperId::from_entry_url("http://arxiv.org/abs/1706.03762v7"),
            title: "Attention Is All You Need".into(),
            authors: vec!["Ashish Vaswani".into(), "Noam Shazeer".into()],
            summary: "The dominant sequence transduction models…".into(),
            pdf_url: "http://arxiv.org/pdf/1706.03762v7".into(),
            published: NaiveDate::from_ymd_opt(2017, 6, 12).unwrap(),
            updated: NaiveDate::from_ymd_opt(2023, 8, 2),
            categories: vec!["cs.CL".into(), "cs.LG".into()],
            primary_category: "cs.CL".into(),
            entry_id: "http://arxiv.org/abs/1706.03762v7".into(),
        },
        &request,
    )
}

#[test]
fn golden_record_field_order() {
    let (_, record) = sample();
    let json_str = serde_json::to_string(&record).unwrap();

    let keys = [
        "\"title\":",
        "\"authors\":",
        "\"summary\":",
        "\"pdf_url\":",
        "\"published\":",
        "\"updated\":",
        "\"categories\":",
        "\"primary_category\":",
        "\"entry_id\":",
        "\"search_params\":",
    ];
    let positions: Vec<usize> = keys.iter().map(|k| json_str.find(k).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "field order changed: {json_str}");
}

#[test]
fn golden_registry_document() {
    let dir = tempdir().unwrap();
    let store = RegistryStore::new(dir.path());
    let slug = TopicSlug::derive("Attention Is All You Need", None);
    store.merge(&slug, vec![sample()]).unwrap();

    let raw = fs::read_to_string(store.registry_path(&slug)).unwrap();
    // Non-ASCII is written as UTF-8, not escaped.
    assert!(raw.contains("transduction models…"));

    let doc: Value = serde_json::from_str(&raw).unwrap();
    let entry = &doc["1706.03762v7"];
    assert_eq!(entry["published"], "2017-06-12");
    assert_eq!(entry["updated"], "2023-08-02");
    assert_eq!(entry["authors"][1], "Noam Shazeer");
    assert_eq!(entry["categories"], serde_json::json!(["cs.CL", "cs.LG"]));
    assert_eq!(
        entry["search_params"],
        serde_json::json!({
            "query": "Attention Is All You Need",
            "sort_by": "relevance",
            "search_field": "title",
            "author_search": null,
            "date_range": "20170101 to *"
        })
    );
}

#[test]
fn golden_summary_keys() {
    let params = SearchParams::new("x");
    let echoed = serde_json::to_value(&params).unwrap();
    for key in [
        "original_query",
        "max_results",
        "sort_by",
        "sort_order",
        "search_field",
        "date_from",
        "date_to",
        "author_search",
    ] {
        assert!(echoed.get(key).is_some(), "missing {key}");
    }

    let parsed: SearchParams = serde_json::from_str(r#"{"query": "rag", "max_results": 3}"#).unwrap();
    assert_eq!(parsed.query, "rag");
    assert_eq!(parsed.max_results, 3);
    assert_eq!(parsed.sort_by, "relevance");
}

#[test]
fn golden_date_range_ignores_blank_bounds() {
    let discovered = |from: Option<&str>, to: Option<&str>| {
        let mut params = SearchParams::new("rag");
        params.date_from = from.map(String::from);
        params.date_to = to.map(String::from);
        DiscoveryParams::from_request(&SearchRequest::normalize(params)).date_range
    };

    assert_eq!(discovered(Some(""), Some("  ")), None);
    assert_eq!(discovered(Some(""), Some("20240101")).as_deref(), Some("* to 20240101"));
    assert_eq!(discovered(Some(" 20230101 "), None).as_deref(), Some("20230101 to *"));
}
