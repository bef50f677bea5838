//! End-to-end scenarios: index in, scores and transitions out.

use anno_coherence::eval::{discrimination, permutations};
use anno_coherence::lang::CompoundSplittingStrategy;
use anno_coherence::{
    extract_transitions, score_document, BipartiteGraph, CoherenceConfig, CoherenceScorer,
    EntityGrid, EntityOccurrenceIndex, EntityTransitionExtractor, Error, GridModel, Projection,
    ProjectionKind, ProjectionTrace, Role, Transition,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// "Berlin is a city. Berlin is the capital of the city. The city is big."
fn berlin_city() -> EntityOccurrenceIndex {
    EntityOccurrenceIndex::from_occurrences([
        ("Berlin", vec![(0, Role::Object), (1, Role::Subject)]),
        ("city", vec![(1, Role::Other), (2, Role::Subject)]),
    ])
    .unwrap()
}

#[test]
fn berlin_city_unweighted() {
    let index = berlin_city();
    let graph = BipartiteGraph::from_index(&index);
    assert_eq!(graph.sentence_count(), 3);

    let report = CoherenceScorer::new(ProjectionKind::Unweighted)
        .report(&graph)
        .unwrap();
    assert!(approx(report.sum_of_edge_weights, 2.0));
    assert!(approx(report.local_coherence, 2.0 / 3.0));
    assert!(approx(
        score_document(&index, 3, ProjectionKind::Unweighted).unwrap(),
        2.0 / 3.0
    ));
}

#[test]
fn berlin_city_weighted_and_syntactic() {
    let index = berlin_city();
    // Both links are between adjacent sentences and share one entity.
    assert!(approx(
        score_document(&index, 3, ProjectionKind::Weighted).unwrap(),
        2.0 / 3.0
    ));
    // (O·S + X·S) / 3 = (6 + 3) / 3
    assert!(approx(
        score_document(&index, 3, ProjectionKind::Syntactic).unwrap(),
        3.0
    ));
}

#[test]
fn trailing_empty_sentences_do_not_change_n() {
    let index = berlin_city();
    for kind in ProjectionKind::ALL {
        let short = score_document(&index, 3, kind).unwrap();
        let padded = score_document(&index, 10, kind).unwrap();
        assert!(approx(short, padded), "{}: {} vs {}", kind, short, padded);
    }
}

#[test]
fn gaps_count_toward_distance() {
    let index = EntityOccurrenceIndex::from_occurrences([(
        "atom",
        vec![(0, Role::Subject), (4, Role::Object)],
    )])
    .unwrap();
    // Two sentence nodes, one edge of weight 1/4.
    assert!(approx(
        score_document(&index, 5, ProjectionKind::Weighted).unwrap(),
        0.125
    ));
    // S·O = 6 over distance 4.
    assert!(approx(
        score_document(&index, 5, ProjectionKind::Syntactic).unwrap(),
        0.75
    ));
}

#[test]
fn malformed_and_empty_documents_fail_explicitly() {
    let index = berlin_city();
    let err = score_document(&index, 2, ProjectionKind::Unweighted).unwrap_err();
    assert_eq!(err, Error::malformed_index("city", 2, 2));

    let err = score_document(&EntityOccurrenceIndex::default(), 3, ProjectionKind::Weighted)
        .unwrap_err();
    assert!(matches!(err, Error::EmptyDocument(_)));
}

#[test]
fn trace_explains_the_score() {
    let graph = BipartiteGraph::from_index(&berlin_city());
    let mut trace = ProjectionTrace::new();
    let score = CoherenceScorer::new(ProjectionKind::Syntactic)
        .score_with_observer(&graph, &mut trace)
        .unwrap();

    let edges: Vec<(usize, usize, f64)> = trace
        .edges()
        .iter()
        .map(|e| (e.from, e.to, e.weight))
        .collect();
    assert_eq!(edges, vec![(0, 1, 6.0), (1, 2, 3.0)]);
    assert_eq!(trace.edges()[0].shared, vec!["Berlin".to_string()]);
    assert!(approx(score, trace.total_weight() / 3.0));
}

#[test]
fn projected_graph_out_degrees_average_to_coherence() {
    let graph = BipartiteGraph::from_index(&berlin_city());
    for kind in ProjectionKind::ALL {
        let projected = kind.projection().project(&graph);
        let score = CoherenceScorer::new(kind).score(&graph).unwrap();
        assert!(approx(projected.average_out_degree().unwrap(), score));
    }
}

#[test]
fn transitions_of_a_single_column() {
    let grid = EntityGrid::from_columns(vec![(
        "atom",
        vec![Role::Subject, Role::Object, Role::Empty, Role::Subject],
    )])
    .unwrap();
    let transitions = extract_transitions(&grid, 2).unwrap();

    assert_eq!(transitions.total_transitions, 3);
    assert!(!transitions.degenerate);
    for key in ["SO", "O-", "-S"] {
        let transition: Transition = key.parse().unwrap();
        assert_eq!(transitions.counts[&transition], 1);
        assert!(approx(transitions.probabilities[&transition], 1.0 / 3.0));
    }
    assert_eq!(transitions.counts.len(), 3);
}

#[test]
fn single_sentence_has_no_windows() {
    let grid = EntityGrid::from_rows(&["S O X"]).unwrap();
    let transitions = extract_transitions(&grid, 2).unwrap();
    assert!(transitions.degenerate);
    assert_eq!(transitions.total_transitions, 0);
    assert!(transitions.counts.is_empty());
    assert!(transitions.probabilities.is_empty());

    let table = EntityTransitionExtractor::new(2).unwrap().extract(&grid);
    assert_eq!(
        table.probabilities().unwrap_err(),
        Error::degenerate_window(2, 1)
    );
}

#[test]
fn grid_from_index_renders_rows() {
    let grid = EntityGrid::build(&berlin_city(), 4).unwrap();
    assert_eq!(grid.entities(), &["Berlin".to_string(), "city".to_string()][..]);
    assert_eq!(grid.to_string(), "O -\nS X\n- S\n- -\n");
}

#[test]
fn index_from_annotator_json() {
    let json = r#"{
        "Berlin": [{"sentence": 1, "role": "Subject"}, {"sentence": 0, "role": "Object"}],
        "city": [{"sentence": 1, "role": "Other"}, {"sentence": 2, "role": "Subject"}]
    }"#;
    let index = EntityOccurrenceIndex::from_json(json).unwrap();
    assert_eq!(index, berlin_city());

    let bad = r#"{"Berlin": [{"sentence": 0, "role": "Empty"}]}"#;
    assert!(matches!(EntityOccurrenceIndex::from_json(bad), Err(Error::Parse(_))));
}

#[test]
fn compound_splitting_links_more_sentences() {
    // "Die Bundesregierung tagt. Die Regierung entscheidet."
    let splitter = |word: &str| {
        (word == "Bundesregierung").then(|| vec!["Bund".to_string(), "Regierung".to_string()])
    };

    let mut plain = EntityOccurrenceIndex::builder();
    plain.track("Bundesregierung", 0, Role::Subject).unwrap();
    plain.track("Regierung", 1, Role::Subject).unwrap();
    let plain = plain.build();

    let mut split = EntityOccurrenceIndex::builder()
        .with_strategy(CompoundSplittingStrategy::new("german", splitter));
    split.track("Bundesregierung", 0, Role::Subject).unwrap();
    split.track("Regierung", 1, Role::Subject).unwrap();
    let split = split.build();

    assert!(split.contains_entity("Bund"));
    assert!(!split.contains_entity("Bundesregierung"));
    assert!(approx(score_document(&plain, 2, ProjectionKind::Unweighted).unwrap(), 0.0));
    assert!(approx(score_document(&split, 2, ProjectionKind::Unweighted).unwrap(), 0.5));
}

#[test]
fn original_order_wins_discrimination() {
    // A chain where every entity spans two adjacent sentences.
    let index = EntityOccurrenceIndex::from_occurrences([
        ("atom", vec![(0, Role::Subject), (1, Role::Subject)]),
        ("nucleus", vec![(1, Role::Object), (2, Role::Subject)]),
        ("proton", vec![(2, Role::Object), (3, Role::Subject)]),
        ("charge", vec![(3, Role::Object), (4, Role::Subject)]),
    ])
    .unwrap();

    // Only the reversal keeps every link adjacent; anything else stretches one.
    let shuffles = permutations(5, 30, 7);
    let report = discrimination(&index, 5, ProjectionKind::Weighted, &shuffles).unwrap();
    assert_eq!(report.compared(), shuffles.len());
    assert_eq!(report.losses, 0);
    assert!(report.ties <= 1);
    assert!(report.wins >= shuffles.len() - 1);
}

#[test]
fn grid_model_trained_on_a_corpus() {
    let corpus = [
        EntityGrid::from_rows(&["S O", "S -", "S X"]).unwrap(),
        EntityGrid::from_rows(&["S -", "O S", "- S"]).unwrap(),
    ];
    let config = CoherenceConfig::new().with_smoothing(0.5);
    let model = GridModel::train_with_config(corpus.iter(), &config).unwrap();

    let continuous = EntityGrid::from_rows(&["S", "S", "S"]).unwrap();
    let scattered = EntityGrid::from_rows(&["X", "-", "O"]).unwrap();
    let scattered_score = model.log_likelihood(&scattered).unwrap();
    assert!(model.log_likelihood(&continuous).unwrap() > scattered_score);

    let features = EntityTransitionExtractor::from_config(&config)
        .unwrap()
        .extract(&continuous)
        .feature_vector()
        .unwrap();
    assert_eq!(features.len(), 16);
    assert!(approx(features[15], 1.0));
}

#[test]
fn config_drives_the_pipeline() {
    let config: CoherenceConfig =
        serde_json::from_str(r#"{"projection": "syntactic", "window_length": 3}"#).unwrap();
    config.validate().unwrap();

    let graph = BipartiteGraph::from_index(&berlin_city());
    let score = CoherenceScorer::from_config(&config).score(&graph).unwrap();
    assert!(approx(score, 3.0));

    let grid = EntityGrid::build(&berlin_city(), 3).unwrap();
    let table = EntityTransitionExtractor::from_config(&config)
        .unwrap()
        .extract(&grid);
    assert_eq!(table.window_length(), 3);
    assert_eq!(table.total_transitions(), 2);
}

#[test]
fn projection_kind_accepts_integer_codes() {
    let kinds: Vec<ProjectionKind> = ["0", "1", "2"]
        .iter()
        .map(|code| code.parse().unwrap())
        .collect();
    assert_eq!(kinds, ProjectionKind::ALL.to_vec());
    let kind: &dyn Projection = ProjectionKind::Weighted.projection();
    assert_eq!(kind.kind(), ProjectionKind::Weighted);
}
