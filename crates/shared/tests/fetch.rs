use std::time::Duration;

use chrono::{TimeZone, Utc};
use shared::{FeedAggregator, FeedSource, WikipediaClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>World</title>
<item>
  <title>Ceasefire agreed</title>
  <link>https://news.example/ceasefire</link>
  <description>Both sides agreed to a ceasefire.</description>
  <pubDate>Tue, 03 Jun 2025 08:00:00 GMT</pubDate>
</item>
<item>
  <title>Markets rally</title>
  <link>https://news.example/markets</link>
  <pubDate>Thu, 05 Jun 2025 08:00:00 GMT</pubDate>
</item>
</channel></rss>"#;

#[tokio::test]
async fn wikipedia_client_returns_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wiki/2025"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><body><ul></ul></body></html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let client = WikipediaClient::new(
        format!("{}/wiki/{{year}}", server.uri()),
        Duration::from_secs(5),
    )
    .expect("client builds");

    let doc = client.fetch_year(2025).await.expect("fetch ok");
    assert_eq!(doc.year, 2025);
    assert_eq!(doc.source_url, format!("{}/wiki/2025", server.uri()));
    assert_eq!(doc.html, "<html><body><ul></ul></body></html>");
}

#[tokio::test]
async fn wikipedia_client_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wiki/2031"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = WikipediaClient::new(
        format!("{}/wiki/{{year}}", server.uri()),
        Duration::from_secs(5),
    )
    .expect("client builds");

    let err = client.fetch_year(2031).await.unwrap_err();
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn feed_aggregator_skips_failing_feeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/world.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(RSS, "application/rss+xml"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/politics.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/top.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(RSS, "application/rss+xml"))
        .mount(&server)
        .await;

    let sources = vec![
        FeedSource::new("ap", "world", &format!("{}/world.xml", server.uri())),
        FeedSource::new("ap", "politics", &format!("{}/politics.xml", server.uri())),
        FeedSource::new("ap", "top", &format!("{}/top.xml", server.uri())),
    ];
    let aggregator = FeedAggregator::new(sources, Duration::from_secs(5)).expect("client builds");

    let now = Utc.with_ymd_and_hms(2025, 6, 10, 0, 0, 0).unwrap();
    let articles = aggregator.fetch_all(now).await;

    // The top feed repeats the world feed's links, so only two survive.
    let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Markets rally", "Ceasefire agreed"]);
    assert!(articles.iter().all(|a| a.category == "world"));
}
