//! Clap command tree definition.

use clap::{value_parser, Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("rankblend")
        .about("Blend lexical and semantic rankings, evaluate and tune the blend")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Config file (default: ./rankblend.toml if present)")
                .value_parser(value_parser!(std::path::PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("More log output on stderr (-v debug, -vv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .global(true),
        )
        .subcommand(build_init_config())
        .subcommand(build_search())
        .subcommand(build_eval())
        .subcommand(build_tune())
}

// =========================================================================
// Shared arguments
// =========================================================================

/// Inputs every pipeline command needs: corpus plus both recorded runs.
fn pipeline_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("corpus")
            .long("corpus")
            .required(true)
            .value_parser(value_parser!(std::path::PathBuf))
            .help("Document corpus, one JSON record per line"),
    )
    .arg(
        Arg::new("lexical-run")
            .long("lexical-run")
            .required(true)
            .value_parser(value_parser!(std::path::PathBuf))
            .help("Recorded lexical backend output (query -> candidates)"),
    )
    .arg(
        Arg::new("semantic-run")
            .long("semantic-run")
            .required(true)
            .value_parser(value_parser!(std::path::PathBuf))
            .help("Recorded semantic backend output (query -> candidates)"),
    )
    .arg(
        Arg::new("top-k")
            .long("top-k")
            .short('k')
            .value_parser(value_parser!(usize))
            .help("Number of results per query (default: from config)"),
    )
}

fn alpha_arg() -> Arg {
    Arg::new("alpha")
        .long("alpha")
        .short('a')
        .value_parser(value_parser!(f64))
        .help("Lexical weight in [0, 1] (default: from config)")
}

fn judgments_arg() -> Arg {
    Arg::new("judgments")
        .long("judgments")
        .short('j')
        .required(true)
        .value_parser(value_parser!(std::path::PathBuf))
        .help("Relevance judgments, a JSON array of {query, relevant}")
}

fn parallel_arg() -> Arg {
    Arg::new("parallel")
        .long("parallel")
        .help("Evaluate queries in parallel")
        .action(ArgAction::SetTrue)
}

// =========================================================================
// Subcommands
// =========================================================================

fn build_init_config() -> Command {
    Command::new("init-config")
        .about("Write a commented default config file")
        .arg(
            Arg::new("path")
                .value_parser(value_parser!(std::path::PathBuf))
                .help("Target path (default: ./rankblend.toml)"),
        )
}

fn build_search() -> Command {
    pipeline_args(
        Command::new("search")
            .about("Run one query through both backends and print the fused ranking")
            .arg(Arg::new("query").required(true).help("Query text")),
    )
    .arg(alpha_arg())
}

fn build_eval() -> Command {
    pipeline_args(Command::new("eval").about("Report MAP and mean nDCG at one weight"))
        .arg(alpha_arg())
        .arg(judgments_arg())
        .arg(parallel_arg())
        .arg(
            Arg::new("per-query")
                .long("per-query")
                .help("Also print per-query scores")
                .action(ArgAction::SetTrue),
        )
}

fn build_tune() -> Command {
    pipeline_args(Command::new("tune").about("Sweep the weight and report the best MAP"))
        .arg(judgments_arg())
        .arg(parallel_arg())
        .arg(
            Arg::new("start")
                .long("start")
                .value_parser(value_parser!(f64))
                .help("First candidate weight (default: from config)"),
        )
        .arg(
            Arg::new("stop")
                .long("stop")
                .value_parser(value_parser!(f64))
                .help("Exclusive upper bound (default: from config)"),
        )
        .arg(
            Arg::new("step")
                .long("step")
                .value_parser(value_parser!(f64))
                .help("Grid increment (default: from config)"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_tree_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_parses_tune_overrides() {
        let matches = build_cli()
            .try_get_matches_from([
                "rankblend",
                "tune",
                "--corpus",
                "docs.jsonl",
                "--lexical-run",
                "lex.json",
                "--semantic-run",
                "sem.json",
                "--judgments",
                "qrels.json",
                "--step",
                "0.05",
                "-v",
            ])
            .unwrap();
        assert_eq!(matches.get_count("verbose"), 1);
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "tune");
        assert_eq!(sub.get_one::<f64>("step"), Some(&0.05));
        assert!(sub.get_one::<f64>("start").is_none());
    }

    #[test]
    fn test_search_requires_runs() {
        let result = build_cli().try_get_matches_from(["rankblend", "search", "quantum"]);
        assert!(result.is_err());
    }
}
