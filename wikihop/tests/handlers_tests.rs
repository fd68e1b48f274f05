use std::time::Duration;
use tempfile::TempDir;
use wikihop::handlers::*;
use wikihop::command_argument_builder;
use wikihop_core::report::{ReportFormat, SearchReport};
use wikihop_crawler::SearchStats;

fn find_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["wikihop", "find"];
    argv.extend_from_slice(args);
    let matches = command_argument_builder()
        .try_get_matches_from(argv)
        .unwrap();
    matches.subcommand_matches("find").unwrap().clone()
}

#[test]
fn test_load_config_defaults() {
    let matches = find_matches(&["Footloose"]);
    let config = load_config_from_matches(&matches).unwrap();

    assert_eq!(config.target, "Kevin_Bacon");
    assert_eq!(config.workers, 5);
    assert_eq!(config.budget, Some(Duration::from_secs(30)));
    assert_eq!(config.max_retries, 2);
    assert_eq!(
        config.api_url.as_str(),
        "https://en.wikipedia.org/api/rest_v1/page/html"
    );
}

#[test]
fn test_load_config_overrides() {
    let matches = find_matches(&[
        "Footloose",
        "--target",
        "Tom Hanks",
        "--workers",
        "8",
        "--timeout",
        "0",
        "--request-timeout",
        "2",
        "--retries",
        "0",
    ]);
    let config = load_config_from_matches(&matches).unwrap();

    assert_eq!(config.target, "Tom_Hanks");
    assert_eq!(config.workers, 8);
    assert_eq!(config.budget, None);
    assert_eq!(config.request_timeout, Duration::from_secs(2));
    assert_eq!(config.max_retries, 0);
}

#[test]
fn test_load_config_rejects_zero_workers() {
    let matches = find_matches(&["Footloose", "--workers", "0"]);
    assert!(load_config_from_matches(&matches).is_err());
}

#[test]
fn test_unknown_format_is_rejected_by_parser() {
    let result = command_argument_builder().try_get_matches_from([
        "wikihop", "find", "Footloose", "--format", "csv",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_serve_defaults() {
    let matches = command_argument_builder()
        .try_get_matches_from(["wikihop", "serve"])
        .unwrap();
    let serve = matches.subcommand_matches("serve").unwrap();

    assert_eq!(serve.get_one::<u16>("port"), Some(&8000));
    assert_eq!(
        serve.get_one::<String>("host").map(String::as_str),
        Some("127.0.0.1")
    );
}

#[test]
fn test_resolve_bind_addr() {
    let addr = resolve_bind_addr("0.0.0.0", 9000).unwrap();
    assert_eq!(addr.to_string(), "0.0.0.0:9000");

    assert!(resolve_bind_addr("not a host", 9000).is_err());
}

fn one_hop_report() -> SearchReport {
    SearchReport {
        start: "Footloose".to_string(),
        target: "Kevin_Bacon".to_string(),
        outcome: "found".to_string(),
        path: Some(vec!["Footloose".to_string(), "Kevin_Bacon".to_string()]),
        hops: Some(1),
        stats: SearchStats::default(),
    }
}

#[test]
fn test_emit_report_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("path.json");
    let mut stdout = Vec::new();

    emit_report(&one_hop_report(), ReportFormat::Json, Some(&path), &mut stdout)?;
    assert!(stdout.is_empty());

    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(written["report"]["search"]["hops"], 1);
    assert_eq!(written["report"]["search"]["path"][0], "Footloose");
    Ok(())
}

#[test]
fn test_emit_json_report_writes_only_json() -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = Vec::new();

    emit_report(&one_hop_report(), ReportFormat::Json, None, &mut stdout)?;

    // The whole stream must parse, so nothing else may share it.
    let written: serde_json::Value = serde_json::from_slice(&stdout)?;
    assert_eq!(written["report"]["search"]["outcome"], "found");
    Ok(())
}
