use rdfcast::value::{RawValue, ScalarType, Schema, TypedValue};
use rdfcast::{export_rdf, Directives, ExportError, ResultNode, SourceEntry, UnsupportedFeature};

fn init_tracing() {
    // Surfaces debug! output under `cargo test -- --nocapture`.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn root_with(children: Vec<ResultNode>) -> ResultNode {
    let mut root = ResultNode::new("me");
    root.children = children;
    root
}

fn scalar_node(attr: &str, uid: u64, values: Vec<RawValue>) -> ResultNode {
    let mut node = ResultNode::new(attr);
    node.sources = vec![SourceEntry::with_values(uid, values)];
    node
}

#[test]
fn test_scalar_value_line() {
    init_tracing();
    let root = root_with(vec![scalar_node("name", 0x1, vec![RawValue::from("Alice")])]);

    let out = export_rdf(&[root], &Schema::new()).unwrap();
    assert_eq!(out, b"<0x1> <name> Alice .\n".to_vec());
}

#[test]
fn test_root_node_is_never_emitted() {
    init_tracing();
    // The root itself carries subjects and values; none of them may
    // appear in the output.
    let mut root = root_with(vec![scalar_node("name", 0x1, vec![RawValue::from("Alice")])]);
    root.sources = vec![SourceEntry::with_values(0x99, vec![RawValue::from("root")])];

    let out = export_rdf(&[root], &Schema::new()).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(!text.contains("0x99"));
    assert!(!text.contains("<me>"));
    assert_eq!(text, "<0x1> <name> Alice .\n");
}

#[test]
fn test_relation_filtering_keeps_original_order() {
    init_tracing();
    let mut friend = ResultNode::new("friend");
    friend.sources = vec![SourceEntry::with_targets(0x1, vec![0x4, 0x2, 0x3])];
    friend.filtered_targets = [0x2, 0x4].into_iter().collect();

    let out = export_rdf(&[root_with(vec![friend])], &Schema::new()).unwrap();
    assert_eq!(
        out,
        b"<0x1> <friend> <0x4> .\n<0x1> <friend> <0x2> .\n".to_vec()
    );
}

#[test]
fn test_count_with_default_field_name() {
    init_tracing();
    let mut count = ResultNode::new("friend");
    count.sources = vec![SourceEntry::with_count(0x1, 3)];

    let out = export_rdf(&[root_with(vec![count])], &Schema::new()).unwrap();
    assert_eq!(out, b"<0x1> <count(friend)> 3 .\n".to_vec());
}

#[test]
fn test_count_with_alias() {
    init_tracing();
    let mut count = ResultNode::new("friend");
    count.alias = Some("friendCount".to_string());
    count.sources = vec![SourceEntry::with_count(0x1, 3)];

    let out = export_rdf(&[root_with(vec![count])], &Schema::new()).unwrap();
    assert_eq!(out, b"<0x1> <friendCount> 3 .\n".to_vec());
}

#[test]
fn test_count_takes_precedence_over_other_shapes() {
    init_tracing();
    let mut node = ResultNode::new("friend");
    node.sources = vec![SourceEntry {
        uid: 0x1,
        count: Some(2),
        targets: vec![0x2, 0x3],
        values: Some(vec![RawValue::from("noise")]),
    }];
    node.filtered_targets = [0x2, 0x3].into_iter().collect();

    let out = export_rdf(&[root_with(vec![node])], &Schema::new()).unwrap();
    assert_eq!(out, b"<0x1> <count(friend)> 2 .\n".to_vec());
}

#[test]
fn test_reflexive_uid_emits_once_per_subject() {
    init_tracing();
    // Row content and length are irrelevant, including the empty row.
    let mut uid_node = ResultNode::new("uid");
    uid_node.sources = vec![
        SourceEntry::with_values(0x1, vec![RawValue::from("a"), RawValue::from("b")]),
        SourceEntry::with_values(0x2, vec![]),
    ];

    let out = export_rdf(&[root_with(vec![uid_node])], &Schema::new()).unwrap();
    assert_eq!(
        out,
        b"<0x1> <uid> <0x1> .\n<0x2> <uid> <0x2> .\n".to_vec()
    );
}

#[test]
fn test_uid_typed_scalar_is_emitted_as_reference() {
    init_tracing();
    let mut schema = Schema::new();
    schema.declare("boss", ScalarType::Uid);

    let root = root_with(vec![scalar_node("boss", 0x1, vec![RawValue::from("0x2a")])]);
    let out = export_rdf(&[root], &schema).unwrap();
    assert_eq!(out, b"<0x1> <boss> <0x2a> .\n".to_vec());
}

#[test]
fn test_unconvertible_scalar_is_skipped_not_fatal() {
    init_tracing();
    let mut schema = Schema::new();
    schema.declare("age", ScalarType::Int);

    let root = root_with(vec![scalar_node(
        "age",
        0x1,
        vec![
            RawValue::from("not-a-number"),
            RawValue::from("30"),
            RawValue::from("31"),
        ],
    )]);
    let out = export_rdf(&[root], &schema).unwrap();
    assert_eq!(out, b"<0x1> <age> 30 .\n<0x1> <age> 31 .\n".to_vec());
}

#[test]
fn test_ignore_result_suppresses_output() {
    init_tracing();
    let mut node = scalar_node("name", 0x1, vec![RawValue::from("Alice")]);
    node.directives = Directives {
        ignore_result: true,
        ..Directives::default()
    };

    let out = export_rdf(&[root_with(vec![node])], &Schema::new()).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_internal_aggregate_value() {
    init_tracing();
    let mut agg = ResultNode::new("sum(val(a))");
    agg.is_internal = true;
    agg.var_name = Some("a".to_string());
    agg.source_function = Some("sum".to_string());
    agg.sources = vec![SourceEntry::new(0x1), SourceEntry::new(0x2)];
    agg.computed = [(0x1u64, TypedValue::Int(12))].into_iter().collect();

    let out = export_rdf(&[root_with(vec![agg])], &Schema::new()).unwrap();
    // 0x2 has no computed value and is skipped.
    assert_eq!(out, b"<0x1> <sum(val(a))> 12 .\n".to_vec());
}

#[test]
fn test_internal_node_with_expand_is_skipped() {
    init_tracing();
    let mut expand = ResultNode::new("_predicate_");
    expand.is_internal = true;
    expand.directives.expand = Some("_all_".to_string());
    expand.sources = vec![SourceEntry::new(0x1)];
    expand.computed = [(0x1u64, TypedValue::from("x"))].into_iter().collect();

    let out = export_rdf(&[root_with(vec![expand])], &Schema::new()).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_aggregate_encoding_failure_aborts_batch() {
    init_tracing();
    let good = scalar_node("name", 0x1, vec![RawValue::from("Alice")]);

    let mut bad = ResultNode::new("avg");
    bad.is_internal = true;
    bad.var_name = Some("a".to_string());
    bad.sources = vec![SourceEntry::new(0x2)];
    bad.computed = [(0x2u64, TypedValue::Float(f64::NAN))].into_iter().collect();

    let err = export_rdf(&[root_with(vec![good, bad])], &Schema::new()).unwrap_err();
    assert!(matches!(err, ExportError::Value(_)));
}

#[test]
fn test_validation_rejects_each_unsupported_feature() {
    init_tracing();
    let schema = Schema::new();

    let cases: Vec<(ResultNode, UnsupportedFeature, &str)> = vec![
        (
            {
                let mut n = ResultNode::new("age");
                n.is_group_by = true;
                n
            },
            UnsupportedFeature::GroupBy,
            "groupby",
        ),
        (
            {
                let mut n = ResultNode::new("uid");
                n.directives.do_count = true;
                n.is_internal = true;
                n
            },
            UnsupportedFeature::UidCount,
            "uid count",
        ),
        (
            {
                let mut n = ResultNode::new("name");
                n.directives.normalize = true;
                n
            },
            UnsupportedFeature::Normalize,
            "normalize",
        ),
        (
            {
                let mut n = ResultNode::new("friend");
                n.directives.ignore_reflex = true;
                n
            },
            UnsupportedFeature::IgnoreReflex,
            "ignorereflex",
        ),
        (
            {
                let mut n = ResultNode::new("password");
                n.source_function = Some("checkpwd".to_string());
                n
            },
            UnsupportedFeature::CheckPassword,
            "chkpwd",
        ),
        (
            {
                let mut n = ResultNode::new("friend");
                n.has_facets = true;
                n
            },
            UnsupportedFeature::Facets,
            "facet",
        ),
    ];

    for (node, expected, needle) in cases {
        let err = export_rdf(&[root_with(vec![node])], &schema).unwrap_err();
        match err {
            ExportError::Unsupported(feature) => {
                assert_eq!(feature, expected);
                assert!(
                    feature.to_string().contains(needle),
                    "message for {:?} should mention {:?}",
                    expected,
                    needle
                );
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }
}

#[test]
fn test_rejection_in_second_tree_voids_whole_batch() {
    init_tracing();
    let first = root_with(vec![scalar_node("name", 0x1, vec![RawValue::from("Alice")])]);

    let mut poisoned_child = ResultNode::new("friend");
    poisoned_child.has_facets = true;
    let second = root_with(vec![poisoned_child]);

    let result = export_rdf(&[first, second], &Schema::new());
    assert!(matches!(
        result,
        Err(ExportError::Unsupported(UnsupportedFeature::Facets))
    ));
}

#[test]
fn test_rejection_below_the_root_is_caught_during_traversal() {
    init_tracing();
    let mut child = scalar_node("name", 0x1, vec![RawValue::from("Alice")]);
    let mut grandchild = ResultNode::new("friend");
    grandchild.directives.normalize = true;
    child.children = vec![grandchild];

    let result = export_rdf(&[root_with(vec![child])], &Schema::new());
    assert!(matches!(
        result,
        Err(ExportError::Unsupported(UnsupportedFeature::Normalize))
    ));
}

#[test]
fn test_document_order_is_depth_first_pre_order() {
    init_tracing();
    let name = scalar_node("name", 0x1, vec![RawValue::from("Alice")]);
    let age = scalar_node("age", 0x1, vec![RawValue::from(30i64)]);
    let mut friend = ResultNode::new("friend");
    friend.sources = vec![SourceEntry::with_targets(0x1, vec![0x2])];
    friend.filtered_targets = [0x2].into_iter().collect();
    friend.children = vec![scalar_node("name", 0x2, vec![RawValue::from("Bob")])];

    let root = root_with(vec![name, friend, age]);
    let out = export_rdf(&[root], &Schema::new()).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "<0x1> <name> Alice .\n\
         <0x1> <friend> <0x2> .\n\
         <0x2> <name> Bob .\n\
         <0x1> <age> 30 .\n"
    );
}

#[test]
fn test_alias_names_relation_and_scalar_fields() {
    init_tracing();
    let mut friend = ResultNode::new("friend");
    friend.alias = Some("pal".to_string());
    friend.sources = vec![SourceEntry::with_targets(0x1, vec![0x2])];
    friend.filtered_targets = [0x2].into_iter().collect();

    let out = export_rdf(&[root_with(vec![friend])], &Schema::new()).unwrap();
    assert_eq!(out, b"<0x1> <pal> <0x2> .\n".to_vec());
}

#[test]
fn test_empty_batch_and_subjectless_nodes_produce_empty_output() {
    init_tracing();
    let out = export_rdf(&[], &Schema::new()).unwrap();
    assert!(out.is_empty());

    // A child without subjects emits nothing but is still descended into.
    let mut hop = ResultNode::new("hop");
    hop.children = vec![scalar_node("name", 0x5, vec![RawValue::from("Eve")])];
    let out = export_rdf(&[root_with(vec![hop])], &Schema::new()).unwrap();
    assert_eq!(out, b"<0x5> <name> Eve .\n".to_vec());
}

#[test]
fn test_datetime_scalar_renders_rfc3339() {
    init_tracing();
    let mut schema = Schema::new();
    schema.declare("since", ScalarType::DateTime);

    let root = root_with(vec![scalar_node(
        "since",
        0x1,
        vec![RawValue::from("2006-01-02T15:04:05Z")],
    )]);
    let out = export_rdf(&[root], &schema).unwrap();
    assert_eq!(out, b"<0x1> <since> 2006-01-02T15:04:05Z .\n".to_vec());
}
