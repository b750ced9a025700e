use anyhow::Result;
use httpmock::prelude::*;
use review_responder::config::settings::default_templates;
use review_responder::{
    BusinessProfileClient, LedgerEntry, ResponderError, ReviewLedger, ReviewResponder, RunMode,
    Settings,
};
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;

fn settings_for(server: &MockServer, db: &Path, locations: &[&str]) -> Settings {
    Settings {
        account_id: "acct".to_string(),
        location_ids: locations.iter().map(|l| l.to_string()).collect(),
        response_templates: default_templates(),
        database_path: db.to_path_buf(),
        reviews_page_size: 50,
        max_reviews_per_location: 200,
        default_language: "en".to_string(),
        api_base_url: server.base_url(),
        access_token: Some("token".to_string()),
    }
}

fn responder_for(settings: Settings) -> Result<ReviewResponder<BusinessProfileClient, BusinessProfileClient>> {
    let client = BusinessProfileClient::from_settings(&settings)?;
    Ok(ReviewResponder::new(settings, client.clone(), client))
}

/// 一個地點、兩則需要回覆的評論
fn mock_listing(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path("/accounts/acct/locations/main/reviews");
        then.status(200).json_body(json!({
            "reviews": [
                {"reviewId": "r1", "reviewer": {"displayName": "Sam"}, "starRating": "FIVE"},
                {"reviewId": "r2", "starRating": "ONE"},
                {"reviewId": "r3", "starRating": "FOUR", "reviewReply": {"comment": "Thanks!"}}
            ]
        }));
    })
}

#[tokio::test]
async fn test_simulate_mode_sends_nothing_and_keeps_ledger() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db = temp_dir.path().join("state.sqlite3");
    let server = MockServer::start();

    let list_mock = mock_listing(&server);
    let reply_mock = server.mock(|when, then| {
        when.method(PUT);
        then.status(200);
    });

    let ledger = ReviewLedger::open(&db).await?;
    let responder = responder_for(settings_for(&server, &db, &["main"]))?;
    let report = responder.run(&ledger, RunMode::Simulate).await;
    ledger.close().await;
    let report = report?;

    list_mock.assert();
    reply_mock.assert_hits(0);
    assert_eq!(
        report.entries(),
        vec![LedgerEntry::new("main", "r1"), LedgerEntry::new("main", "r2")]
    );
    assert_eq!(report.sent_count(), 0);
    assert_eq!(report.recorded, 0);
    assert!(report.replies[0].reply_text.contains("Sam"));
    assert!(report.replies[1].reply_text.contains("there"));

    let ledger = ReviewLedger::open(&db).await?;
    assert!(ledger.is_empty().await?);
    ledger.close().await;
    Ok(())
}

#[tokio::test]
async fn test_live_mode_sends_and_records() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db = temp_dir.path().join("state.sqlite3");
    let server = MockServer::start();

    let list_mock = mock_listing(&server);
    let r1_mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/accounts/acct/locations/main/reviews/r1/reply")
            .json_body(json!({
                "comment": "Thanks so much for the 5-star review, Sam! We're excited to serve you again.",
                "languageCode": "en"
            }));
        then.status(200);
    });
    let r2_mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/accounts/acct/locations/main/reviews/r2/reply");
        then.status(200);
    });

    let ledger = ReviewLedger::open(&db).await?;
    let responder = responder_for(settings_for(&server, &db, &["main"]))?;
    let report = responder.run(&ledger, RunMode::Live).await?;

    list_mock.assert();
    r1_mock.assert_hits(1);
    r2_mock.assert_hits(1);
    assert_eq!(report.sent_count(), 2);
    assert_eq!(report.recorded, 2);
    assert!(ledger.has_responded("main", "r1").await?);
    assert!(ledger.has_responded("main", "r2").await?);
    assert!(!ledger.has_responded("main", "r3").await?);

    // 第二次執行不應重複回覆
    let second = responder.run(&ledger, RunMode::Live).await?;
    assert_eq!(second.sent_count(), 0);
    r1_mock.assert_hits(1);
    r2_mock.assert_hits(1);
    list_mock.assert_hits(2);

    ledger.close().await;
    Ok(())
}

#[tokio::test]
async fn test_fetch_failure_aborts_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db = temp_dir.path().join("state.sqlite3");
    let server = MockServer::start();

    let ok_mock = mock_listing(&server);
    let r_mock = server.mock(|when, then| {
        when.method(PUT);
        then.status(200);
    });
    let broken_mock = server.mock(|when, then| {
        when.method(GET).path("/accounts/acct/locations/broken/reviews");
        then.status(500).body("backend error");
    });

    let ledger = ReviewLedger::open(&db).await?;
    let responder = responder_for(settings_for(&server, &db, &["main", "broken"]))?;
    let result = responder.run(&ledger, RunMode::Live).await;

    ok_mock.assert();
    broken_mock.assert();
    // main 的兩則回覆已送出，但整批未寫入 ledger
    r_mock.assert_hits(2);
    match result {
        Err(ResponderError::Fetch { location_id, .. }) => assert_eq!(location_id, "broken"),
        other => panic!("unexpected result: {:?}", other.map(|r| r.replies.len())),
    }
    assert!(ledger.is_empty().await?);

    ledger.close().await;
    Ok(())
}

#[tokio::test]
async fn test_cap_limits_reviews_per_location() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db = temp_dir.path().join("state.sqlite3");
    let server = MockServer::start();

    let list_mock = mock_listing(&server);
    let reply_mock = server.mock(|when, then| {
        when.method(PUT);
        then.status(200);
    });

    let mut settings = settings_for(&server, &db, &["main"]);
    settings.max_reviews_per_location = 1;

    let ledger = ReviewLedger::open(&db).await?;
    let report = responder_for(settings)?
        .run(&ledger, RunMode::Live)
        .await?;

    list_mock.assert();
    reply_mock.assert_hits(1);
    assert_eq!(report.entries(), vec![LedgerEntry::new("main", "r1")]);

    ledger.close().await;
    Ok(())
}
