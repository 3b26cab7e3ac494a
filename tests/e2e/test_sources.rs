use crate::e2e::helpers;

use helpers::upstream::GUARDIAN_FEED;
use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;
use test_context::test_context;

fn find_source<'a>(body: &'a Value, key: &str) -> &'a Value {
    body["sources"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["source_key"] == key)
        .unwrap_or_else(|| panic!("Source '{}' missing from response", key))
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_seeded_sources(ctx: &TestContext) {
    let response = ctx.client.get("/api/sources").await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 4);

    let bbc = find_source(body, "bbc");
    assert_eq!(bbc["display_name"], "BBC Health");
    assert_eq!(bbc["is_active"], true);
    assert_eq!(bbc["fetch_count"], 0);
    assert_eq!(bbc["last_method"], "none");
    assert!(bbc.get("feed_url").is_none());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_track_fetch_outcomes_per_source(ctx: &TestContext) {
    ctx.client
        .post_empty("/api/articles/refresh")
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let response = ctx.client.get("/api/sources").await.unwrap();
    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();

    let bbc = find_source(body, "bbc");
    assert_eq!(bbc["fetch_count"], 1);
    assert_eq!(bbc["last_method"], "scrape");
    assert!(bbc["last_fetched_at"].is_string());

    let guardian = find_source(body, "guardian");
    assert_eq!(guardian["fetch_count"], 1);
    assert_eq!(guardian["last_method"], "feed");
    assert_eq!(guardian["feed_url"], GUARDIAN_FEED);

    let healthcom = find_source(body, "healthcom");
    assert_eq!(healthcom["fetch_count"], 0);
    assert_eq!(healthcom["error_count"], 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_persist_learned_feed_urls(ctx: &TestContext) {
    ctx.client
        .post_empty("/api/articles/refresh")
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let (fetches, errors, method, feed_url) = ctx
        .fixtures
        .get_source_counters("guardian")
        .await
        .unwrap();
    assert_eq!(fetches, 1);
    assert_eq!(errors, 0);
    assert_eq!(method, "feed");
    assert_eq!(feed_url.as_deref(), Some(GUARDIAN_FEED));

    let (_, errors, method, feed_url) = ctx
        .fixtures
        .get_source_counters("healthywomen")
        .await
        .unwrap();
    assert_eq!(errors, 1);
    assert_eq!(method, "none");
    assert!(feed_url.is_none());
}
