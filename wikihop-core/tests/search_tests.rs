// End-to-end search tests against a mock REST endpoint

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use wikihop_core::config::SearchConfig;
use wikihop_core::search::{SearchError, SearchOptions, execute_search};
use wikihop_crawler::{ArticleTitle, ProgressCallback};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!(r#"<a rel="mw:WikiLink" href="./{}">{}</a>"#, l, l))
        .collect();
    format!("<html><body><p>{}</p></body></html>", anchors)
}

async fn mount_page(server: &MockServer, title: &str, links: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/page/html/{}", title)))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(links)))
        .mount(server)
        .await;
}

fn config_for(server: &MockServer, target: &str) -> SearchConfig {
    SearchConfig::default()
        .with_api_url(&format!("{}/page/html", server.uri()))
        .unwrap()
        .with_target(target)
        .unwrap()
        .with_budget_secs(10)
}

fn options(start: &str, config: SearchConfig) -> SearchOptions {
    SearchOptions {
        start: start.to_string(),
        config,
        show_progress_bars: false,
    }
}

#[tokio::test]
async fn test_search_finds_two_hop_path() {
    let server = MockServer::start().await;
    mount_page(&server, "Footloose", &["Dance", "Small_town"]).await;
    mount_page(&server, "Dance", &["Ballet"]).await;
    mount_page(&server, "Small_town", &["Kevin_Bacon"]).await;

    let report = execute_search(
        options("Footloose", config_for(&server, "Kevin_Bacon")),
        None,
    )
    .await
    .unwrap();

    assert_eq!(report.outcome, "found");
    assert_eq!(
        report.path,
        Some(vec![
            "Footloose".to_string(),
            "Small_town".to_string(),
            "Kevin_Bacon".to_string()
        ])
    );
    assert_eq!(report.hops, Some(2));
}

#[tokio::test]
async fn test_search_start_equal_to_target_fetches_nothing() {
    let server = MockServer::start().await;

    let report = execute_search(
        options("Kevin Bacon", config_for(&server, "Kevin_Bacon")),
        None,
    )
    .await
    .unwrap();

    assert_eq!(report.path, Some(vec!["Kevin_Bacon".to_string()]));
    assert_eq!(report.hops, Some(0));
    assert_eq!(report.stats.pages_fetched, 0);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_reports_no_path() {
    let server = MockServer::start().await;
    mount_page(&server, "Island", &["Lagoon"]).await;
    mount_page(&server, "Lagoon", &["Island"]).await;

    let report = execute_search(options("Island", config_for(&server, "Kevin_Bacon")), None)
        .await
        .unwrap();

    assert_eq!(report.outcome, "no_path");
    assert!(report.path.is_none());
    assert!(report.hops.is_none());
    assert_eq!(report.stats.pages_fetched, 2);
}

#[tokio::test]
async fn test_missing_pages_are_dead_ends() {
    let server = MockServer::start().await;
    mount_page(&server, "Start", &["Gone", "Zebra_crossing"]).await;
    mount_page(&server, "Zebra_crossing", &["Kevin_Bacon"]).await;
    // "Gone" has no mock and answers 404. It sorts first, so it is evaluated
    // before the page that reaches the target.

    let report = execute_search(options("Start", config_for(&server, "Kevin_Bacon")), None)
        .await
        .unwrap();

    assert_eq!(report.hops, Some(2));
    assert_eq!(report.stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_invalid_start_is_rejected() {
    let server = MockServer::start().await;

    let err = execute_search(options("   ", config_for(&server, "Kevin_Bacon")), None)
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::InvalidStart(_)));
}

#[tokio::test]
async fn test_progress_callback_sees_each_fetch() {
    let server = MockServer::start().await;
    mount_page(&server, "Start", &["Middle"]).await;
    mount_page(&server, "Middle", &["Kevin_Bacon"]).await;

    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();
    let callback: ProgressCallback = Arc::new(move |_count: usize, _title: &ArticleTitle| {
        calls_clone.fetch_add(1, Ordering::Relaxed);
    });

    let report = execute_search(
        options("Start", config_for(&server, "Kevin_Bacon")),
        Some(callback),
    )
    .await
    .unwrap();

    assert!(report.is_found());
    assert_eq!(calls.load(Ordering::Relaxed), 2);
}
