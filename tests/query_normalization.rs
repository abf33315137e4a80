use paper_cache::query::{FieldScope, SearchParams, SearchRequest, SortDirection, SortKey, MAX_RESULTS_LIMIT};

fn params(query: &str) -> SearchParams {
    SearchParams::new(query)
}

#[test]
fn invariant_all_scope_is_unprefixed() {
    let request = SearchRequest::normalize(params("transformers"));
    assert_eq!(request.field_scope(), FieldScope::All);
    assert_eq!(request.provider_query(), "transformers");

    let multi = SearchRequest::normalize(params("swarm agents artificial intelligence"));
    assert_eq!(multi.provider_query(), "swarm agents artificial intelligence");
    assert!(!multi.provider_query().contains("all:"));
}

#[test]
fn invariant_scoped_search_is_prefixed() {
    let cases = [
        ("title", "ti:transformers"),
        ("author", "au:transformers"),
        ("abstract", "abs:transformers"),
        ("comment", "co:transformers"),
        ("journal", "jr:transformers"),
        ("category", "cat:transformers"),
        ("report_number", "rn:transformers"),
        ("TITLE", "ti:transformers"),
    ];
    for (field, expected) in cases {
        let mut p = params("transformers");
        p.search_field = field.into();
        let request = SearchRequest::normalize(p);
        assert_eq!(request.provider_query(), expected, "field {field}");
    }
}

#[test]
fn invariant_unknown_enums_fall_back() {
    let mut p = params("x");
    p.sort_by = "banana".into();
    p.sort_order = "up".into();
    p.search_field = "everywhere".into();

    let request = SearchRequest::normalize(p);
    assert_eq!(request.sort_key(), SortKey::Relevance);
    assert_eq!(request.sort_direction(), SortDirection::Descending);
    assert_eq!(request.field_scope(), FieldScope::All);
}

#[test]
fn sort_aliases_are_recognized() {
    let cases = [
        ("submitted", SortKey::SubmittedDate),
        ("submittedDate", SortKey::SubmittedDate),
        ("Submitted_Date", SortKey::SubmittedDate),
        ("updated", SortKey::LastUpdatedDate),
        ("last_updated", SortKey::LastUpdatedDate),
        ("lastUpdatedDate", SortKey::LastUpdatedDate),
        ("Relevance", SortKey::Relevance),
    ];
    for (raw, expected) in cases {
        let mut p = params("x");
        p.sort_by = raw.into();
        assert_eq!(SearchRequest::normalize(p).sort_key(), expected, "sort_by {raw}");
    }

    let mut p = params("x");
    p.sort_order = "ASC".into();
    assert_eq!(SearchRequest::normalize(p).sort_direction(), SortDirection::Ascending);
}

#[test]
fn date_range_clause_construction() {
    let mut both = params("llm");
    both.date_from = Some("20240101".into());
    both.date_to = Some("20240601".into());
    assert_eq!(
        SearchRequest::normalize(both).provider_query(),
        "llm AND submittedDate:[202401010000 TO 202406012359]"
    );

    let mut from_only = params("llm");
    from_only.date_from = Some("20240101".into());
    assert_eq!(
        SearchRequest::normalize(from_only).provider_query(),
        "llm AND submittedDate:[202401010000 TO *]"
    );

    let mut to_only = params("llm");
    to_only.date_to = Some("20241231".into());
    assert_eq!(
        SearchRequest::normalize(to_only).provider_query(),
        "llm AND submittedDate:[* TO 202412312359]"
    );
}

#[test]
fn malformed_date_bound_is_dropped_but_echoed() {
    let mut p = params("llm");
    p.date_from = Some("2024-01-01".into());
    p.date_to = Some("20240230".into());

    let request = SearchRequest::normalize(p);
    assert_eq!(request.provider_query(), "llm");
    assert!(request.date_from().is_none());
    assert!(request.date_to().is_none());
    assert_eq!(request.original().date_from.as_deref(), Some("2024-01-01"));
}

#[test]
fn author_clause_is_lowercased_and_joined() {
    let mut p = params("reinforcement learning");
    p.search_field = "abstract".into();
    p.author_search = Some("Richard Sutton".into());
    p.date_from = Some("20200101".into());

    let request = SearchRequest::normalize(p);
    assert_eq!(
        request.provider_query(),
        "abs:reinforcement learning AND au:richard_sutton AND submittedDate:[202001010000 TO *]"
    );
    assert_eq!(request.author_filter(), Some("Richard Sutton"));
}

#[test]
fn empty_author_filter_is_ignored() {
    let mut p = params("llm");
    p.author_search = Some(String::new());
    let request = SearchRequest::normalize(p);
    assert_eq!(request.provider_query(), "llm");
    assert_eq!(request.author_filter(), None);
}

#[test]
fn max_results_is_clamped() {
    let mut zero = params("x");
    zero.max_results = 0;
    assert_eq!(SearchRequest::normalize(zero).max_results(), 1);

    let mut huge = params("x");
    huge.max_results = 1_000_000;
    assert_eq!(SearchRequest::normalize(huge).max_results(), MAX_RESULTS_LIMIT);
}

#[test]
fn original_parameters_are_preserved() {
    let mut p = params("Quantum Error Correction");
    p.sort_by = "banana".into();
    let request = SearchRequest::normalize(p.clone());
    assert_eq!(request.original(), &p);
    assert_eq!(request.raw_query(), "Quantum Error Correction");
}
