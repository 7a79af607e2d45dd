use hashgap_solver::app::config::SolverConfig;
use hashgap_solver::domain::report::{ResolvedBy, UNRESOLVED_MARKER};
use hashgap_solver::{ConcatOrder, SolverError, run, sha256_hex};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const KEY: &str = "4096";

struct Fixture {
    _dir: TempDir,
    puzzle: PathBuf,
    dictionary: PathBuf,
    hints: PathBuf,
}

fn write_puzzle(path: &Path, key: &str, order: ConcatOrder, message: &[&str]) {
    let lines: Vec<String> = message
        .iter()
        .map(|w| sha256_hex(order.concat(key, w).as_bytes()))
        .collect();
    fs::write(path, lines.join("\n") + "\n").unwrap();
}

fn fixture(order: ConcatOrder, message: &[&str], dictionary: &str, hints: &str) -> Fixture {
    let dir = TempDir::new().unwrap();
    let puzzle = dir.path().join("puzzle.txt");
    let dict_path = dir.path().join("words.csv");
    let hints_path = dir.path().join("hints.txt");

    write_puzzle(&puzzle, KEY, order, message);
    fs::write(&dict_path, dictionary).unwrap();
    fs::write(&hints_path, hints).unwrap();

    Fixture {
        _dir: dir,
        puzzle,
        dictionary: dict_path,
        hints: hints_path,
    }
}

fn config(f: &Fixture) -> SolverConfig {
    SolverConfig {
        workers: 4,
        ..SolverConfig::easy(&f.puzzle, &f.dictionary)
    }
}

#[test]
fn easy_puzzle_end_to_end() {
    let f = fixture(
        ConcatOrder::KeyFirst,
        &["Absolute", "power", "corrupts", "absolutely."],
        "Word,POS,Definition\nAbsolute,a.,Free\nPower,n.,Ability\n\"corrupts\",v.,\"Spoils, taints\"\nAbsolutely,adv.,Wholly\n",
        "",
    );

    let report = run(&config(&f)).unwrap();

    assert_eq!(report.key.as_deref(), Some(KEY));
    assert_eq!(report.reconstruction.sentence(), "Absolute power corrupts absolutely.");
    assert!(report.unresolved.is_empty());
    assert!(report.collisions.is_empty());

    let by: Vec<Option<ResolvedBy>> = report
        .reconstruction
        .positions()
        .iter()
        .map(|p| p.resolved_by)
        .collect();
    assert_eq!(
        by,
        vec![
            Some(ResolvedBy::Lookup),
            Some(ResolvedBy::Lookup),
            Some(ResolvedBy::Lookup),
            Some(ResolvedBy::CorpusVariant),
        ]
    );
}

#[test]
fn hinted_typo_is_resolved() {
    let f = fixture(
        ConcatOrder::KeyFirst,
        &["the", "tyrant,", "falls"],
        "Word\nthe\nfalls\n",
        "# stragglers\n2 tirant\n",
    );
    let config = SolverConfig {
        known_key: Some(KEY.into()),
        hints_path: Some(f.hints.clone()),
        edit_budget: 1,
        ..config(&f)
    };

    let report = run(&config).unwrap();

    assert_eq!(report.reconstruction.sentence(), "the tyrant, falls");
    let line = report.reconstruction.get(2).unwrap();
    assert_eq!(line.resolved_by, Some(ResolvedBy::HintVariant));
    assert_eq!(line.base_word.as_deref(), Some("tirant"));
}

#[test]
fn missing_words_are_reported_with_digests() {
    let f = fixture(
        ConcatOrder::KeyFirst,
        &["as", "you", "wish"],
        "Word\nas\nwish\n",
        "",
    );

    let report = run(&config(&f)).unwrap();

    assert_eq!(report.key.as_deref(), Some(KEY));
    assert_eq!(report.unresolved.len(), 1);
    assert_eq!(report.unresolved[0].line, 2);
    assert_eq!(
        report.unresolved[0].digest.to_hex(),
        sha256_hex(format!("{}you", KEY).as_bytes())
    );
    let lines = report.reconstruction.render_lines();
    assert_eq!(lines[1], format!("Line 2: {}", UNRESOLVED_MARKER));
}

#[test]
fn word_first_puzzle_needs_fallback() {
    let f = fixture(ConcatOrder::WordFirst, &["to", "be"], "Word\nto\nbe\n", "");

    let report = run(&config(&f)).unwrap();
    assert_eq!(report.key, None);

    let config = SolverConfig {
        try_both_orders: true,
        ..config(&f)
    };
    let report = run(&config).unwrap();
    assert_eq!(report.key.as_deref(), Some(KEY));
    assert_eq!(report.order, ConcatOrder::WordFirst);
    assert_eq!(report.reconstruction.sentence(), "to be");
}

#[test]
fn report_serializes_to_json() {
    let f = fixture(ConcatOrder::KeyFirst, &["go"], "Word\ngo\n", "");

    let report = run(&config(&f)).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["key"], KEY);
    assert_eq!(json["order"], "key_first");
    assert_eq!(json["reconstruction"]["positions"][0]["word"], "go");
    assert_eq!(json["key_search"][0]["outcome"]["status"], "found");
}

#[test]
fn missing_inputs_are_configuration_errors() {
    let f = fixture(ConcatOrder::KeyFirst, &["go"], "Word\ngo\n", "");

    let missing_puzzle = SolverConfig::easy(f.puzzle.with_extension("nope"), &f.dictionary);
    assert!(matches!(run(&missing_puzzle), Err(SolverError::Puzzle(_))));

    let missing_dictionary = SolverConfig::easy(&f.puzzle, f.dictionary.with_extension("nope"));
    assert!(matches!(run(&missing_dictionary), Err(SolverError::Dictionary(_))));

    let bad_width = SolverConfig {
        key_width: 0,
        ..config(&f)
    };
    assert!(matches!(run(&bad_width), Err(SolverError::Config(_))));
}
