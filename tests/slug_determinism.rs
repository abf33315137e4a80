use paper_cache::types::TopicSlug;

#[test]
fn invariant_slug_is_stable_across_calls() {
    let inputs = [
        ("Graph Neural Networks", None),
        ("Graph Neural Networks", Some("Petar Velickovic")),
        ("a/b\\c d", None),
        ("", Some("Someone")),
    ];
    for (query, author) in inputs {
        let first = TopicSlug::derive(query, author);
        for _ in 0..3 {
            assert_eq!(TopicSlug::derive(query, author), first);
        }
    }
}

#[test]
fn slug_lowercases_and_replaces_separators() {
    assert_eq!(TopicSlug::derive("Graph Neural Networks", None).as_str(), "graph_neural_networks");
    assert_eq!(TopicSlug::derive("TCP/IP stacks", None).as_str(), "tcp_ip_stacks");
    assert_eq!(TopicSlug::derive("a\\b", None).as_str(), "a_b");
}

#[test]
fn slug_truncates_query_before_author_suffix() {
    let long = "x".repeat(80);
    let slug = TopicSlug::derive(&long, Some("Ada Lovelace"));
    assert_eq!(slug.as_str(), format!("{}_by_Ada_Lovelace", "x".repeat(50)));
}

#[test]
fn author_suffix_keeps_case() {
    let slug = TopicSlug::derive("*", Some("Yoshua Bengio"));
    assert_eq!(slug.as_str(), "*_by_Yoshua_Bengio");
}

#[test]
fn reserved_names_never_escape_the_root() {
    assert_eq!(TopicSlug::derive("", None).as_str(), "_");
    assert_eq!(TopicSlug::derive("..", None).as_str(), "__");
    assert_eq!(TopicSlug::derive("../etc", None).as_str(), ".._etc");
    assert_eq!(TopicSlug::from_topic_name(".").as_str(), "_");
}

#[test]
fn topic_name_maps_to_search_slug() {
    let from_search = TopicSlug::derive("Machine Learning", None);
    let from_reader = TopicSlug::from_topic_name("Machine Learning");
    assert_eq!(from_search, from_reader);
    assert_eq!(from_search.readable(), "Machine Learning");
}
