//! Integration tests for the crawler
//!
//! These tests drive the real HTTP transport against wiremock servers and check
//! traversal limits, failure isolation, persistence and post-processing end to end.

use gleaner::config::{OutputConfig, SeedEntry, UserAgentConfig};
use gleaner::crawler::{crawl_seeds, Coordinator, CrawlResultSet, CrawlSettings, HttpTransport};
use gleaner::output::post_process;
use gleaner::storage::{filename_for_url, open_sinks, SqliteSink};
use gleaner::PageType;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "GleanerTest".to_string(),
        crawler_version: "0.1.0".to_string(),
        contact_url: "https://example.com/about".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

fn settings(max_depth: u32, max_links_per_page: Option<usize>) -> CrawlSettings {
    CrawlSettings {
        max_depth,
        max_links_per_page,
        fetch_timeout: Duration::from_secs(5),
        ..CrawlSettings::default()
    }
}

fn coordinator(settings: CrawlSettings) -> Coordinator {
    let transport = HttpTransport::new(&user_agent()).expect("Failed to build transport");
    Coordinator::new(Arc::new(transport), settings)
}

fn seed(server: &MockServer, page: &str) -> SeedEntry {
    SeedEntry {
        url: format!("{}{}", server.uri(), page),
        scope: Vec::new(),
    }
}

/// Builds an HTML page with the given title, headings, paragraphs and links
fn html(title: &str, headings: &[&str], paragraphs: &[&str], links: &[&str]) -> String {
    let mut body = format!("<html><head><title>{}</title></head><body>", title);
    for h in headings {
        body.push_str(&format!("<h2>{}</h2>", h));
    }
    for p in paragraphs {
        body.push_str(&format!("<p>{}</p>", p));
    }
    for link in links {
        body.push_str(&format!("<a href=\"{}\">Go to {}</a>", link, link));
    }
    body.push_str("</body></html>");
    body
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

async fn serve(server: &MockServer, route: &str, body: String, expected: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_response(body))
        .expect(expected)
        .mount(server)
        .await;
}

fn record_urls(results: &CrawlResultSet) -> Vec<String> {
    results.records.iter().map(|r| r.url.clone()).collect()
}

const RICH: &str = "Our undergraduate programmes combine lectures, seminars and laboratory \
                    work, and every student completes an independent project in the final \
                    year under the supervision of an experienced member of academic staff.";

#[tokio::test]
async fn test_crawl_one_level_deep() {
    let server = MockServer::start().await;
    let base = server.uri();

    serve(
        &server,
        "/",
        html("Home", &["Welcome"], &[RICH], &["/a", "/b", "/c"]),
        1,
    )
    .await;
    for route in ["/a", "/b", "/c"] {
        serve(
            &server,
            route,
            html(route, &["Child"], &[RICH], &["/deeper"]),
            1,
        )
        .await;
    }
    serve(&server, "/deeper", html("Deeper", &[], &[], &[]), 0).await;

    let results = coordinator(settings(1, None))
        .crawl(&seed(&server, "/"))
        .await;

    assert_eq!(
        record_urls(&results),
        vec![
            format!("{}/", base),
            format!("{}/a", base),
            format!("{}/b", base),
            format!("{}/c", base),
        ]
    );
    assert_eq!(results.visited_count(), 4);
    assert_eq!(results.failed_count(), 0);
    assert!(!results.cancelled);
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let server = MockServer::start().await;

    serve(&server, "/", html("Home", &["Welcome"], &[RICH], &["/level1"]), 1).await;
    serve(&server, "/level1", html("One", &["One"], &[RICH], &["/level2"]), 1).await;
    serve(&server, "/level2", html("Two", &["Two"], &[RICH], &["/level3"]), 1).await;

    // Pages at max_depth are fetched but never expanded
    serve(&server, "/level3", html("Three", &[], &[], &[]), 0).await;

    let results = coordinator(settings(2, None))
        .crawl(&seed(&server, "/"))
        .await;

    assert_eq!(results.record_count(), 3);
    assert_eq!(results.visited_count(), 3);
}

#[tokio::test]
async fn test_depth_zero_fetches_only_seed() {
    let server = MockServer::start().await;

    serve(&server, "/", html("Home", &["Welcome"], &[RICH], &["/child"]), 1).await;
    serve(&server, "/child", html("Child", &[], &[], &[]), 0).await;

    let results = coordinator(settings(0, None))
        .crawl(&seed(&server, "/"))
        .await;

    assert_eq!(results.record_count(), 1);
}

#[tokio::test]
async fn test_fan_out_limit_follows_document_order() {
    let server = MockServer::start().await;

    serve(
        &server,
        "/",
        html("Home", &["Welcome"], &[RICH], &["/l1", "/l2", "/l3", "/l4", "/l5"]),
        1,
    )
    .await;
    for route in ["/l1", "/l2"] {
        serve(&server, route, html(route, &["Kept"], &[RICH], &[]), 1).await;
    }
    for route in ["/l3", "/l4", "/l5"] {
        serve(&server, route, html(route, &["Skipped"], &[RICH], &[]), 0).await;
    }

    let results = coordinator(settings(1, Some(2)))
        .crawl(&seed(&server, "/"))
        .await;

    assert_eq!(results.record_count(), 3);
    assert!(results.records[1].url.ends_with("/l1"));
    assert!(results.records[2].url.ends_with("/l2"));
}

#[tokio::test]
async fn test_failed_page_does_not_stop_crawl() {
    let server = MockServer::start().await;

    serve(
        &server,
        "/",
        html("Home", &["Welcome"], &[RICH], &["/missing", "/data", "/ok"]),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .expect(1)
        .mount(&server)
        .await;
    serve(&server, "/ok", html("Fine", &["Fine"], &[RICH], &[]), 1).await;

    let results = coordinator(settings(1, None))
        .crawl(&seed(&server, "/"))
        .await;

    assert_eq!(results.record_count(), 2);
    assert!(results.records[1].url.ends_with("/ok"));

    assert_eq!(results.failed_count(), 2);
    assert!(results.failures[0].url.ends_with("/missing"));
    assert!(results.failures[0].error.contains("404"));
    assert_eq!(results.failures[0].depth, 1);
    assert!(results.failures[1].url.ends_with("/data"));

    // Failed pages still count as visited
    assert_eq!(results.visited_count(), 4);
}

#[tokio::test]
async fn test_unreachable_seed_yields_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let results = coordinator(settings(2, None))
        .crawl(&seed(&server, "/"))
        .await;

    assert!(results.records.is_empty());
    assert_eq!(results.failed_count(), 1);
    assert_eq!(results.visited_count(), 1);
}

#[tokio::test]
async fn test_out_of_scope_and_banned_links_are_skipped() {
    let server = MockServer::start().await;

    serve(
        &server,
        "/",
        html(
            "Home",
            &["Welcome"],
            &[RICH],
            &[
                "http://outside.invalid/page",
                "mailto:admin@example.com",
                "/prospectus.pdf",
                "#top",
                "/inside",
            ],
        ),
        1,
    )
    .await;
    serve(&server, "/inside", html("Inside", &["Inside"], &[RICH], &[]), 1).await;
    Mock::given(method("GET"))
        .and(path("/prospectus.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let results = coordinator(settings(1, Some(1)))
        .crawl(&seed(&server, "/"))
        .await;

    // Skipped links use no fan-out quota, so the single slot goes to /inside
    assert_eq!(results.record_count(), 2);
    assert!(results.records[1].url.ends_with("/inside"));
    assert_eq!(results.failed_count(), 0);
    assert!(!results
        .visited
        .urls()
        .iter()
        .any(|url| url.contains("outside.invalid")));
}

#[tokio::test]
async fn test_duplicate_links_fetched_once() {
    let server = MockServer::start().await;

    serve(
        &server,
        "/",
        html("Home", &["Welcome"], &[RICH], &["/a", "/b"]),
        1,
    )
    .await;
    serve(&server, "/a", html("A", &["A"], &[RICH], &["/shared", "/b"]), 1).await;
    serve(&server, "/b", html("B", &["B"], &[RICH], &["/shared", "/"]), 1).await;
    serve(&server, "/shared", html("Shared", &["S"], &[RICH], &[]), 1).await;

    let results = coordinator(settings(3, None))
        .crawl(&seed(&server, "/"))
        .await;

    assert_eq!(results.visited_count(), 4);
    assert_eq!(results.unique_count(), 4);
}

#[tokio::test]
async fn test_redirect_keeps_requested_url() {
    let server = MockServer::start().await;

    serve(&server, "/", html("Home", &["Welcome"], &[RICH], &["/old"]), 1).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
        .expect(1)
        .mount(&server)
        .await;
    serve(&server, "/new", html("New", &["Moved"], &[RICH], &[]), 1).await;

    let results = coordinator(settings(1, None))
        .crawl(&seed(&server, "/"))
        .await;

    assert_eq!(results.record_count(), 2);
    assert!(results.records[1].url.ends_with("/old"));
    assert_eq!(results.records[1].title, "New");
}

#[tokio::test]
async fn test_user_agent_header_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", user_agent().header_value().as_str()))
        .respond_with(html_response(html("Home", &["Welcome"], &[RICH], &[])))
        .expect(1)
        .mount(&server)
        .await;

    let results = coordinator(settings(0, None))
        .crawl(&seed(&server, "/"))
        .await;

    assert_eq!(results.record_count(), 1);
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let server = MockServer::start().await;
    serve(&server, "/", html("Home", &[], &[], &[]), 0).await;

    let coordinator = coordinator(settings(2, None));
    coordinator.cancellation_token().cancel();

    let results = coordinator.crawl(&seed(&server, "/")).await;

    assert!(results.cancelled);
    assert!(results.records.is_empty());
}

#[tokio::test]
async fn test_classification_of_crawled_pages() {
    let server = MockServer::start().await;

    serve(
        &server,
        "/",
        html("Home", &["Welcome"], &[RICH], &["/postgraduate/msc-data", "/events/webinar"]),
        1,
    )
    .await;
    serve(
        &server,
        "/postgraduate/msc-data",
        html("MSc Data Science", &["Data Science"], &[RICH], &[]),
        1,
    )
    .await;
    serve(
        &server,
        "/events/webinar",
        html("Live webinar", &["Join us online"], &[RICH], &[]),
        1,
    )
    .await;

    let results = coordinator(settings(1, None))
        .crawl(&seed(&server, "/"))
        .await;

    assert_eq!(results.record_count(), 3);
    assert_eq!(results.records[1].page_type, PageType::Postgraduate);
    assert_eq!(results.records[2].page_type, PageType::Events);
}

#[tokio::test]
async fn test_post_process_drops_soft_404_pages() {
    let server = MockServer::start().await;

    serve(
        &server,
        "/",
        html("Home", &["Welcome"], &[RICH], &["/gone", "/empty", "/course"]),
        1,
    )
    .await;
    serve(
        &server,
        "/gone",
        html("Not found", &["Error 404 - Page Not Found"], &[], &[]),
        1,
    )
    .await;
    serve(&server, "/empty", html("Empty", &[], &["Tiny."], &[]), 1).await;
    serve(&server, "/course", html("Course", &["Course"], &[RICH], &[]), 1).await;

    let raw = coordinator(settings(1, None))
        .crawl(&seed(&server, "/"))
        .await;
    assert_eq!(raw.record_count(), 4);

    let processed = post_process(raw);

    let urls = record_urls(&processed);
    assert_eq!(urls.len(), 2);
    assert!(urls[0].ends_with('/'));
    assert!(urls[1].ends_with("/course"));
    assert_eq!(processed.visited_count(), 4);
}

#[tokio::test]
async fn test_sinks_persist_rich_pages_only() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let pages_dir = temp_dir.path().join("pages");
    let db_path = temp_dir.path().join("gleaner.db");

    serve(&server, "/", html("Home", &["Welcome"], &["Short intro."], &["/course"]), 1).await;
    serve(
        &server,
        "/course",
        html("BSc Computer Science", &["Computer Science"], &[RICH, RICH], &[]),
        1,
    )
    .await;

    let output = OutputConfig {
        pages_dir: Some(pages_dir.to_string_lossy().to_string()),
        database_path: Some(db_path.to_string_lossy().to_string()),
        summary_path: None,
    };
    let sinks = open_sinks(&output).expect("Failed to open sinks");
    assert_eq!(sinks.len(), 2);

    let results = coordinator(settings(1, None))
        .with_sinks(sinks)
        .crawl(&seed(&server, "/"))
        .await;
    assert_eq!(results.record_count(), 2);
    assert_eq!(results.failed_count(), 0);

    let course_url = format!("{}/course", server.uri());
    let written = std::fs::read_to_string(pages_dir.join(filename_for_url(&course_url)))
        .expect("Course page should be written");
    assert!(written.starts_with(&format!("URL: {}\n", course_url)));
    assert!(written.contains("Page type: undergraduate\n"));

    let home_url = format!("{}/", server.uri());
    assert!(!pages_dir.join(filename_for_url(&home_url)).exists());

    let storage = SqliteSink::new(&db_path).expect("Failed to open DB");
    assert_eq!(storage.count_pages().expect("Failed to count pages"), 1);

    let stored = storage
        .get_page(&course_url)
        .expect("Failed to read page")
        .expect("Course page should be stored");
    assert_eq!(stored.title, "BSc Computer Science");
    assert_eq!(stored.page_type, PageType::Undergraduate);
    assert_eq!(stored.paragraphs.len(), 2);
}

#[tokio::test]
async fn test_crawl_seeds_keeps_seeds_independent() {
    let server = MockServer::start().await;

    serve(&server, "/one/", html("One", &["One"], &[RICH], &["/shared"]), 1).await;
    serve(&server, "/two/", html("Two", &["Two"], &[RICH], &["/shared"]), 1).await;

    // Each seed has its own visited set, so the shared page is fetched by both
    serve(&server, "/shared", html("Shared", &["Shared"], &[RICH], &[]), 2).await;

    let seeds = vec![seed(&server, "/one/"), seed(&server, "/two/")];
    let results = crawl_seeds(&coordinator(settings(1, None)), &seeds, 2)
        .await
        .expect("Crawl failed");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].seed, seeds[0].url);
    assert_eq!(results[1].seed, seeds[1].url);
    assert_eq!(results[0].record_count(), 2);
    assert_eq!(results[1].record_count(), 2);
}
