use serde_json::Value;

/// Fields every served article carries, scored or not
pub fn assert_article_response(article: &Value) {
    for field in ["id", "title", "summary", "link", "source_key", "source_name", "category"] {
        assert!(
            article.get(field).and_then(|v| v.as_str()).is_some(),
            "Missing article field '{}'",
            field
        );
    }
    assert!(article.get("publish_date").is_some(), "Missing publish_date");
    assert!(article.get("fetched_at").is_some(), "Missing fetched_at");
}

pub fn assert_scored_article(article: &Value) {
    assert_article_response(article);
    assert!(
        article
            .get("relevance_score")
            .and_then(|v| v.as_f64())
            .is_some(),
        "Missing relevance_score"
    );
}

/// Grouped payloads expose one bucket per configured source
pub fn assert_source_buckets(data: &Value, expected_keys: &[&str]) {
    let buckets = data.as_object().expect("Grouped data should be an object");
    for key in expected_keys {
        assert!(
            buckets.get(*key).map(Value::is_array).unwrap_or(false),
            "Missing bucket for source '{}'",
            key
        );
    }
}

pub fn assert_scores_descending(articles: &[Value]) {
    let scores: Vec<f64> = articles
        .iter()
        .filter_map(|a| a.get("relevance_score").and_then(|v| v.as_f64()))
        .collect();
    assert!(
        scores.windows(2).all(|w| w[0] >= w[1]),
        "Scores not descending: {:?}",
        scores
    );
}
