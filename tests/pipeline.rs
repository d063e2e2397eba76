use text_statistics::{
    AnalysisConfig, DegeneratePolicy, Lexicon, Polarity, RawDocument, StopWordMatch, StopWords, TermCounts,
    TermIncidence, TextAnalyzer, TfIdfTable, TextStatsError, Tokenizer,
};

const MOBY: &str = "Call me Ishmael.\n\
Some years ago, never mind how long precisely,\n\
having little or no money in my purse,\n\
and nothing particular to interest me on shore,\n\
I thought I would sail about a little and see the watery part of the world.\n\
It is a way I have of driving off the spleen and regulating the circulation.";

const EMMA: &str = "Emma Woodhouse, handsome, clever, and rich,\n\
with a comfortable home and happy disposition,\n\
seemed to unite some of the best blessings of existence;\n\
and had lived nearly twenty-one years in the world\n\
with very little to distress or vex her.";

fn corpus() -> Vec<(&'static str, &'static str)> {
    vec![("moby", MOBY), ("emma", EMMA)]
}

#[test]
fn counts_sum_to_emitted_tokens() {
    let tokenizer = Tokenizer::words();
    let tokens: Vec<_> = tokenizer.tokenize(corpus()).collect();
    let counts = TermCounts::from_tokens(tokens.clone(), None, StopWordMatch::Whole);
    for (doc, _) in corpus() {
        let emitted = tokens.iter().filter(|t| t.document == doc).count() as u64;
        let summed: u64 = counts.get(&doc).unwrap().iter().map(|(_, c)| c).sum();
        assert_eq!(summed, emitted);
    }
}

#[test]
fn bigrams_of_three_words() {
    let tokenizer = Tokenizer::ngrams(2).unwrap();
    let terms: Vec<_> = tokenizer.tokenize(vec![(1, "a b c")]).map(|t| t.term).collect();
    assert_eq!(terms, vec!["a b".to_string(), "b c".to_string()]);
}

#[test]
fn cat_dog_idf() {
    let tokenizer = Tokenizer::words();
    let counts = TermCounts::from_tokens(
        tokenizer.tokenize(vec![("doc1", "cat dog"), ("doc2", "cat")]),
        None,
        StopWordMatch::Whole,
    );
    let table: TfIdfTable<&str> = TfIdfTable::from_counts(&counts);
    assert_eq!(table.idf("cat"), Some(0.0));
    assert!((table.idf("dog").unwrap() - 0.693_147_180_559_945_3).abs() < 1e-12);
    assert_eq!(table.get(&"doc1", "cat").unwrap().tf_idf, 0.0);
    assert_eq!(table.get(&"doc2", "cat").unwrap().tf_idf, 0.0);
}

#[test]
fn ubiquitous_terms_have_zero_tf_idf() {
    let tokenizer = Tokenizer::words();
    let counts = TermCounts::from_tokens(tokenizer.tokenize(corpus()), None, StopWordMatch::Whole);
    let table: TfIdfTable<&str> = TfIdfTable::from_counts(&counts);
    let corpus = counts.document_frequency();
    let ubiquitous = corpus.ubiquitous_terms();
    assert!(ubiquitous.contains(&"and"));
    for record in table.records.iter().filter(|r| ubiquitous.contains(&r.term.as_str())) {
        assert_eq!(record.tf_idf, 0.0);
    }
}

#[test]
fn phi_symmetric_and_bounded() {
    let tokenizer = Tokenizer::words();
    let text = format!("{}\n{}", MOBY, EMMA);
    let sectioned = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i / 2, line.to_string()))
        .collect::<Vec<_>>();
    let incidence = TermIncidence::from_tokens(tokenizer.tokenize(sectioned)).with_min_frequency(2);
    assert!(incidence.group_num() >= 2);

    let correlations = incidence.pairwise_correlation(DegeneratePolicy::Nan).unwrap();
    assert!(!correlations.is_empty());
    for c in correlations.iter().filter(|c| !c.phi_coefficient.is_nan()) {
        assert!((-1.0..=1.0).contains(&c.phi_coefficient));
        let back = incidence.correlation(&c.term_b, &c.term_a).unwrap();
        assert_eq!(back, c.phi_coefficient);
        assert!(c.term_a < c.term_b);
    }
}

#[test]
fn pair_always_together() {
    let tokenizer = Tokenizer::words();
    let groups = vec![(0, "salt pepper"), (1, "pepper salt bread"), (2, "salt pepper"), (3, "water")];
    let incidence = TermIncidence::from_tokens(tokenizer.tokenize(groups));
    let pairs = incidence.pairwise_count();
    let sp = pairs.iter().find(|p| p.term_a == "pepper" && p.term_b == "salt").unwrap();
    assert_eq!(sp.joint_count, 3);
    let table = incidence.contingency("salt", "pepper").unwrap();
    assert_eq!((table.n10, table.n01), (0, 0));
}

#[test]
fn pipeline_is_deterministic() {
    let config = AnalysisConfig {
        section_size: 2,
        min_term_frequency: 2,
        degenerate: DegeneratePolicy::Nan,
        ..AnalysisConfig::default()
    };
    let analyzer = TextAnalyzer::new(config, StopWords::english()).unwrap();
    let first = analyzer.analyze(corpus()).unwrap().to_snapshot().unwrap();
    let second = analyzer.analyze(corpus()).unwrap().to_snapshot().unwrap();
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn pipeline_fail_policy_reports_degenerate_input() {
    let analyzer = TextAnalyzer::new(AnalysisConfig::default(), StopWords::new()).unwrap();
    // a single section: every term is present in all groups
    let err = analyzer.analyze(vec![("one", "just one short line")]).unwrap_err();
    assert!(matches!(err, TextStatsError::DegenerateInput(_)));
}

#[test]
fn malformed_documents_are_skipped() {
    let analyzer = TextAnalyzer::new(
        AnalysisConfig { degenerate: DegeneratePolicy::Nan, ..AnalysisConfig::default() },
        StopWords::new(),
    )
    .unwrap();
    let docs = vec![
        RawDocument::new(None, "no id here"),
        RawDocument::new(Some("empty"), ""),
        RawDocument::new(Some("ok"), "some words"),
    ];
    let report = analyzer.analyze(docs).unwrap();
    assert_eq!(report.term_counts.group_num(), 1);
    assert_eq!(report.tf_idf.doc_num, 1);
}

#[test]
fn bigram_config_filters_stop_components() {
    let stop: StopWords = ["the", "and", "of", "a", "to", "with"].into_iter().collect();
    let analyzer = TextAnalyzer::new(AnalysisConfig::bigrams(), stop).unwrap();
    let counts = analyzer.count(vec![("emma", EMMA)]);
    let records = counts.records();
    assert!(records.iter().any(|r| r.term == "emma woodhouse"));
    assert!(records.iter().all(|r| !r.term.split(' ').any(|w| w == "the" || w == "and")));
}

#[test]
fn lexicon_join_on_counts() {
    let stop: StopWords = ["the", "and", "a"].into_iter().collect();
    let analyzer = TextAnalyzer::new(AnalysisConfig::default(), stop).unwrap();
    let counts = analyzer.count(corpus());
    let lexicon = Lexicon::categorical([
        ("happy", Polarity::Positive),
        ("comfortable", Polarity::Positive),
        ("distress", Polarity::Negative),
    ]);
    let net = lexicon.net_sentiment(&counts);
    assert_eq!(net.len(), 1);
    assert_eq!(net[0].document, "emma");
    assert_eq!(net[0].net, 1);
}
