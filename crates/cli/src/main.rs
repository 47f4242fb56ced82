//! rankblend CLI: fused search, evaluation and weight tuning over recorded
//! backend runs.
//!
//! Subcommands:
//! - **init-config**: write a commented `rankblend.toml`
//! - **search**: fuse one query and print the ranking
//! - **eval**: MAP / mean nDCG at one weight
//! - **tune**: sweep the weight grid and report the best MAP
//!
//! Logs go to stderr; results go to stdout.

mod commands;
mod format;

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::ArgMatches;
use rankblend_core::{Alpha, BlendConfig, BlendError, InMemoryDocumentStore, Result, CONFIG_FILE_NAME};
use rankblend_eval::{load_judgments, optimize_with, AlphaGrid, EvalSettings, Evaluator};
use rankblend_fusion::{HybridSearch, RecordedProvider};
use tracing::{debug, Level};

use commands::build_cli;
use format::{
    format_baseline, format_error, format_init, format_report, format_search, format_sweep_point,
    format_tuning, OutputMode,
};

fn main() {
    let matches = build_cli().get_matches();

    init_logging(&matches);

    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    if let Err(e) = run(&matches, mode) {
        eprintln!("{}", format_error(&e, mode));
        process::exit(1);
    }
}

fn init_logging(matches: &ArgMatches) {
    let level = if matches.get_flag("quiet") {
        Level::ERROR
    } else {
        match matches.get_count("verbose") {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(matches: &ArgMatches, mode: OutputMode) -> Result<()> {
    match matches.subcommand() {
        Some(("init-config", sub)) => run_init_config(sub, mode),
        Some(("search", sub)) => run_search(matches, sub, mode),
        Some(("eval", sub)) => run_eval(matches, sub, mode),
        Some(("tune", sub)) => run_tune(matches, sub, mode),
        Some((other, _)) => Err(BlendError::invalid_config(format!(
            "unknown command '{}'",
            other
        ))),
        None => Err(BlendError::invalid_config("no command given")),
    }
}

// =========================================================================
// Setup
// =========================================================================

/// `--config` if given, else `./rankblend.toml` if present, else defaults.
fn load_config(matches: &ArgMatches) -> Result<BlendConfig> {
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        return BlendConfig::from_file(path);
    }
    let local = Path::new(CONFIG_FILE_NAME);
    if local.exists() {
        debug!(target: "rankblend::cli", path = %local.display(), "Using local config");
        return BlendConfig::from_file(local);
    }
    Ok(BlendConfig::default())
}

/// Apply per-command overrides on top of the loaded config.
fn apply_overrides(config: &mut BlendConfig, sub: &ArgMatches) -> Result<()> {
    if let Ok(Some(alpha)) = sub.try_get_one::<f64>("alpha") {
        config.alpha = Alpha::new(*alpha)?;
    }
    if let Some(top_k) = sub.get_one::<usize>("top-k") {
        config.top_k = *top_k;
    }
    if let Ok(Some(true)) = sub.try_get_one::<bool>("parallel") {
        config.tuning.parallel = true;
    }
    for (name, slot) in [
        ("start", &mut config.tuning.start),
        ("stop", &mut config.tuning.stop),
        ("step", &mut config.tuning.step),
    ] {
        if let Ok(Some(value)) = sub.try_get_one::<f64>(name) {
            *slot = *value;
        }
    }
    config.validate()
}

fn path_arg<'a>(sub: &'a ArgMatches, name: &str) -> Result<&'a Path> {
    sub.get_one::<PathBuf>(name)
        .map(PathBuf::as_path)
        .ok_or_else(|| BlendError::invalid_config(format!("--{} is required", name)))
}

/// Build the search pipeline from the corpus and recorded runs.
fn build_pipeline(config: &BlendConfig, sub: &ArgMatches) -> Result<HybridSearch> {
    let store = InMemoryDocumentStore::from_jsonl(path_arg(sub, "corpus")?)?;
    let lexical = RecordedProvider::from_json_file("lexical", path_arg(sub, "lexical-run")?)?;
    let semantic = RecordedProvider::from_json_file("semantic", path_arg(sub, "semantic-run")?)?;

    let search = HybridSearch::new(Arc::new(lexical), Arc::new(semantic), Arc::new(store))
        .with_candidate_multiplier(config.candidate_multiplier)?;
    match config.provider_timeout_ms {
        Some(ms) => search.with_provider_timeout(Duration::from_millis(ms)),
        None => Ok(search),
    }
}

// =========================================================================
// Commands
// =========================================================================

fn run_init_config(sub: &ArgMatches, mode: OutputMode) -> Result<()> {
    let path = sub
        .get_one::<PathBuf>("path")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    let written = BlendConfig::write_default_if_missing(&path)?;
    println!("{}", format_init(&path, written, mode));
    Ok(())
}

fn run_search(matches: &ArgMatches, sub: &ArgMatches, mode: OutputMode) -> Result<()> {
    let mut config = load_config(matches)?;
    apply_overrides(&mut config, sub)?;
    let search = build_pipeline(&config, sub)?;

    let query = sub
        .get_one::<String>("query")
        .ok_or_else(|| BlendError::invalid_config("query is required"))?;
    let response = search.search(query, config.alpha, config.top_k)?;
    debug!(
        target: "rankblend::cli",
        hits = response.len(),
        elapsed_micros = response.stats.elapsed_micros,
        "Search complete"
    );
    println!("{}", format_search(&response, mode));
    Ok(())
}

fn run_eval(matches: &ArgMatches, sub: &ArgMatches, mode: OutputMode) -> Result<()> {
    let mut config = load_config(matches)?;
    apply_overrides(&mut config, sub)?;
    let search = build_pipeline(&config, sub)?;
    let judgments = load_judgments(path_arg(sub, "judgments")?)?;

    let evaluator = Evaluator::new(&search, EvalSettings::from(&config));
    let report = evaluator.evaluate(&judgments, config.alpha)?;
    println!("{}", format_report(&report, mode, sub.get_flag("per-query")));
    Ok(())
}

fn run_tune(matches: &ArgMatches, sub: &ArgMatches, mode: OutputMode) -> Result<()> {
    let mut config = load_config(matches)?;
    apply_overrides(&mut config, sub)?;
    let grid = AlphaGrid::from_config(&config.tuning)?;
    let search = build_pipeline(&config, sub)?;
    let judgments = load_judgments(path_arg(sub, "judgments")?)?;

    let evaluator = Evaluator::new(&search, EvalSettings::from(&config));
    let baseline = evaluator.evaluate(&judgments, config.alpha)?;
    if mode == OutputMode::Human {
        println!("{}", format_baseline(&baseline));
    }

    let outcome = optimize_with(&evaluator, &judgments, &grid, |point| {
        if mode == OutputMode::Human {
            println!("{}", format_sweep_point(point));
        }
    })?;
    println!("{}", format_tuning(&outcome, &baseline, mode));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_fixtures(dir: &Path) {
        fs::write(
            dir.join("corpus.jsonl"),
            "{\"id\": \"a\", \"title\": \"A\", \"abstract\": \"\"}\n\
             {\"id\": \"b\", \"title\": \"B\", \"abstract\": \"\"}\n",
        )
        .unwrap();
        fs::write(dir.join("lex.json"), r#"{"q": [{"id": "a", "score": 2.0}]}"#).unwrap();
        fs::write(dir.join("sem.json"), r#"{"q": [{"id": "b", "score": 0.9}]}"#).unwrap();
    }

    fn search_matches(dir: &Path, extra: &[&str]) -> ArgMatches {
        let corpus = dir.join("corpus.jsonl");
        let lexical = dir.join("lex.json");
        let semantic = dir.join("sem.json");
        let mut args = vec![
            "rankblend".to_string(),
            "search".to_string(),
            "q".to_string(),
            "--corpus".to_string(),
            corpus.display().to_string(),
            "--lexical-run".to_string(),
            lexical.display().to_string(),
            "--semantic-run".to_string(),
            semantic.display().to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        build_cli().try_get_matches_from(args).unwrap()
    }

    #[test]
    fn test_pipeline_takes_timeout_from_config() {
        let dir = TempDir::new().unwrap();
        write_fixtures(dir.path());
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "provider_timeout_ms = 1500\ncandidate_multiplier = 3\n").unwrap();

        let config_arg = config_path.display().to_string();
        let matches = search_matches(dir.path(), &["--config", &config_arg]);
        let (_, sub) = matches.subcommand().unwrap();

        let config = load_config(&matches).unwrap();
        let search = build_pipeline(&config, sub).unwrap();
        assert_eq!(search.provider_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(search.candidate_multiplier(), 3);

        let response = search.search("q", config.alpha, config.top_k).unwrap();
        assert_eq!(response.len(), 2);
    }

    #[test]
    fn test_overrides_apply_and_validate() {
        let dir = TempDir::new().unwrap();
        write_fixtures(dir.path());
        let matches = search_matches(dir.path(), &["--alpha", "0.9", "--top-k", "1"]);
        let (_, sub) = matches.subcommand().unwrap();

        let mut config = BlendConfig::default();
        apply_overrides(&mut config, sub).unwrap();
        assert!((config.alpha.get() - 0.9).abs() < 1e-12);
        assert_eq!(config.top_k, 1);

        let bad = search_matches(dir.path(), &["--alpha", "1.5"]);
        let (_, sub) = bad.subcommand().unwrap();
        let err = apply_overrides(&mut BlendConfig::default(), sub).unwrap_err();
        assert!(matches!(err, BlendError::InvalidAlpha(_)));
    }

    #[test]
    fn test_init_config_writes_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        let path_arg = path.display().to_string();
        let matches = build_cli()
            .try_get_matches_from(["rankblend", "init-config", path_arg.as_str()])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();

        run_init_config(sub, OutputMode::Json).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), BlendConfig::default_toml());

        fs::write(&path, "alpha = 0.7\n").unwrap();
        run_init_config(sub, OutputMode::Json).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "alpha = 0.7\n");
    }
}
