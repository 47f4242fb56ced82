//! End-to-end pipeline over on-disk fixtures: corpus, recorded runs,
//! judgments and config, wired together the way the CLI does it.

use rankblend::{
    load_judgments, optimize, Alpha, AlphaGrid, BlendConfig, EvalSettings, Evaluator,
    HybridSearch, InMemoryDocumentStore, RecordedProvider,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    corpus: PathBuf,
    lexical: PathBuf,
    semantic: PathBuf,
    judgments: PathBuf,
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let corpus = write(
        dir.path(),
        "corpus.jsonl",
        r#"{"id": "1234", "title": "Quantum error correction", "abstract": "Surface codes."}
{"id": "5678", "title": "Quantum algorithms survey", "abstract": "Shor and Grover."}
{"id": "9101", "title": "Classical annealing", "abstract": "Simulated annealing."}

{"id": "2222", "title": "Coupled climate models", "abstract": "Ocean-atmosphere coupling."}
{"id": "3333", "title": "Regional downscaling", "abstract": "Statistical downscaling."}
"#,
    );
    let lexical = write(
        dir.path(),
        "lexical.json",
        r#"{
  "quantum computing applications": [
    {"id": "1234", "score": 14.2}, {"id": "5678", "score": 11.0}, {"id": "9101", "score": 3.1}
  ],
  "climate change models": [
    {"id": "3333", "score": 8.0}, {"id": "2222", "score": 7.5}
  ]
}"#,
    );
    let semantic = write(
        dir.path(),
        "semantic.json",
        r#"{
  "quantum computing applications": [
    {"id": "5678", "score": 0.91}, {"id": "1234", "score": 0.88}, {"id": "ghost", "score": 0.5}
  ],
  "climate change models": [
    {"id": "2222", "score": 0.93}, {"id": "3333", "score": 0.71}
  ]
}"#,
    );
    let judgments = write(
        dir.path(),
        "judgments.json",
        r#"[
  {"query": "quantum computing applications", "relevant": ["5678"]},
  {"query": "climate change models", "relevant": ["2222"]}
]"#,
    );
    Fixture {
        _dir: dir,
        corpus,
        lexical,
        semantic,
        judgments,
    }
}

fn pipeline(f: &Fixture) -> HybridSearch {
    let store = InMemoryDocumentStore::from_jsonl(&f.corpus).unwrap();
    let lexical = RecordedProvider::from_json_file("lexical", &f.lexical).unwrap();
    let semantic = RecordedProvider::from_json_file("semantic", &f.semantic).unwrap();
    HybridSearch::new(Arc::new(lexical), Arc::new(semantic), Arc::new(store))
}

#[test]
fn test_search_resolves_and_skips_unknown_ids() {
    let f = fixture();
    let search = pipeline(&f);

    let response = search
        .search("quantum computing applications", Alpha::BALANCED, 10)
        .unwrap();

    let ids: Vec<String> = response.ids().iter().map(ToString::to_string).collect();
    // 1234: 0.5 * 1 + 0.5 * 2/3, 5678: 0.5 * 2/3 + 0.5 * 1, tie broken by lexical position
    assert_eq!(ids, vec!["1234", "5678", "9101"]);
    assert_eq!(response.stats.unresolved.len(), 1);
    assert_eq!(response.stats.unresolved[0].as_str(), "ghost");
    assert_eq!(response.hits[1].title, "Quantum algorithms survey");
    let ranks: Vec<u32> = response.hits.iter().map(|h| h.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[test]
fn test_records_serialize_with_abstract_field() {
    let f = fixture();
    let response = pipeline(&f)
        .search("climate change models", Alpha::SEMANTIC_ONLY, 1)
        .unwrap();

    let json = serde_json::to_value(response.to_records()).unwrap();
    assert_eq!(json[0]["id"], "2222");
    assert_eq!(json[0]["abstract"], "Ocean-atmosphere coupling.");
    assert_eq!(json[0]["score"], 1.0);
}

#[test]
fn test_tune_from_config_file() {
    let f = fixture();
    let config_path = f._dir.path().join("rankblend.toml");
    assert!(BlendConfig::write_default_if_missing(&config_path).unwrap());
    let config = BlendConfig::from_file(&config_path).unwrap();

    let search = pipeline(&f);
    let judgments = load_judgments(&f.judgments).unwrap();
    let evaluator = Evaluator::new(&search, EvalSettings::from(&config));
    let grid = AlphaGrid::from_config(&config.tuning).unwrap();

    let outcome = optimize(&evaluator, &judgments, &grid).unwrap();

    assert_eq!(outcome.sweep.len(), 9);
    // Semantic ranks both relevant documents first, so low weights win
    assert!((outcome.best_alpha.get() - 0.1).abs() < 1e-9);
    assert!((outcome.best_map - 1.0).abs() < 1e-12);
    for point in &outcome.sweep {
        assert!(point.map >= 0.0 && point.map <= 1.0);
        assert!(point.ndcg >= 0.0 && point.ndcg <= 1.0);
    }
}
