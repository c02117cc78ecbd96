mod helpers;

use dreamlog::journal::SearchSource;
use helpers::{entry, seed_ocean_journal, temp_journal, FakeGenerator};

#[tokio::test]
async fn unavailable_backend_falls_back_to_substring() {
    let (_tmp, journal) = temp_journal(FakeGenerator::unavailable());
    seed_ocean_journal(&journal);

    let response = journal.search("ocean", Some(5)).await;
    assert_eq!(response.source, SearchSource::Substring);
    let dates: Vec<&str> = response.results.iter().map(|h| &h.timestamp[..10]).collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-01-02"]);

    let response = journal.search("mountain", Some(5)).await;
    assert_eq!(response.source, SearchSource::Substring);
    assert!(response.results.is_empty());
}

#[tokio::test]
async fn model_results_are_used_and_limited() {
    let reply = r#"[
        {"timestamp": "2024-01-02T07:00:00", "dream_preview": "Waves crashed...", "analysis_preview": "Change", "mood": "happy", "tags": ["ocean"]},
        {"timestamp": "2024-01-01T07:00:00", "dream_preview": "I flew...", "analysis_preview": "Freedom", "mood": "happy", "tags": ["ocean", "flight"]}
    ]"#;
    let (_tmp, journal) = temp_journal(FakeGenerator::scripted([reply]));
    seed_ocean_journal(&journal);

    let response = journal.search("the sea", Some(1)).await;

    assert_eq!(response.source, SearchSource::Model);
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].dream_preview, "Waves crashed...");

    let seen = journal.analyzer().generator().seen();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].prompt.contains("the sea"));
    assert!(seen[0].prompt.contains("Waves crashed on a beach"));
}

#[tokio::test]
async fn malformed_model_reply_falls_back() {
    let (_tmp, journal) = temp_journal(FakeGenerator::scripted([
        "The most relevant dream is the one about flying.",
    ]));
    seed_ocean_journal(&journal);

    let response = journal.search("FLEW", None).await;

    assert_eq!(response.source, SearchSource::Substring);
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].dream_preview, "I flew over the sea");
    assert_eq!(response.results[0].analysis_preview, "analysis of I flew over the sea");
}

#[tokio::test]
async fn empty_journal_returns_nothing_without_calling_backend() {
    let (_tmp, journal) = temp_journal(FakeGenerator::scripted(["[]"]));

    let response = journal.search("anything", None).await;

    assert!(response.results.is_empty());
    assert!(journal.analyzer().generator().seen().is_empty());
}

#[tokio::test]
async fn only_recent_window_is_searched() {
    let (_tmp, journal) = temp_journal(FakeGenerator::unavailable());
    let store = journal.store();
    store
        .append(entry("2023-12-01T00:00:00", "An ancient castle", &["castle"], "neutral"))
        .unwrap();
    for i in 0..50 {
        store
            .append(entry(&format!("2024-01-01T00:00:{i:02}"), "Ordinary day", &[], "neutral"))
            .unwrap();
    }

    let response = journal.search("castle", None).await;
    assert!(response.results.is_empty(), "the 51st-newest entry is outside the window");

    let response = journal.search("ordinary", Some(3)).await;
    assert_eq!(response.results.len(), 3);
}

#[tokio::test]
async fn blank_query_returns_nothing() {
    let (_tmp, journal) = temp_journal(FakeGenerator::unavailable());
    seed_ocean_journal(&journal);

    assert!(journal.search("   ", None).await.results.is_empty());
    assert!(journal.analyzer().generator().seen().is_empty());
}

#[tokio::test]
async fn missing_limit_uses_configured_default() {
    let (_tmp, journal) = temp_journal(FakeGenerator::unavailable());
    let journal = journal.with_search(50, 1);
    seed_ocean_journal(&journal);

    let response = journal.search("ocean", None).await;

    assert_eq!(response.source, SearchSource::Substring);
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].dream_preview, "I flew over the sea");
}
