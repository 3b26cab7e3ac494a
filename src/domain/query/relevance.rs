use crate::domain::article::Article;
use chrono::{DateTime, Utc};

/// Score every article gets when no keyword is given
pub const NEUTRAL_SCORE: f64 = 1.0;

const TITLE_EXACT: f64 = 100.0;
const TITLE_CONTAINS: f64 = 50.0;
const TITLE_TOKEN: f64 = 30.0;
const SUMMARY_OCCURRENCE: f64 = 10.0;
const CATEGORY_CONTAINS: f64 = 20.0;
const RECENCY_WINDOW_HOURS: f64 = 24.0;
const RECENCY_WEIGHT: f64 = 0.5;

/// Keyword match strength plus a boost that decays over the first day.
///
/// Matching is case-insensitive and literal.
pub fn relevance_score(article: &Article, keyword: Option<&str>, now: DateTime<Utc>) -> f64 {
    let Some(keyword) = keyword.map(str::to_lowercase).filter(|k| !k.is_empty()) else {
        return NEUTRAL_SCORE;
    };

    let title = article.title.to_lowercase();
    let summary = article.summary.to_lowercase();
    let mut score = 0.0;

    if title == keyword {
        score += TITLE_EXACT;
    }
    if title.contains(&keyword) {
        score += TITLE_CONTAINS;
    }
    if title.split(' ').any(|token| token == keyword) {
        score += TITLE_TOKEN;
    }

    score += summary.matches(keyword.as_str()).count() as f64 * SUMMARY_OCCURRENCE;

    if article.category.to_lowercase().contains(&keyword) {
        score += CATEGORY_CONTAINS;
    }

    score + recency_bonus(article.publish_date, now)
}

fn recency_bonus(published: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let hours_old = (now - published).num_milliseconds() as f64 / 3_600_000.0;
    (RECENCY_WINDOW_HOURS - hours_old).max(0.0) * RECENCY_WEIGHT
}
