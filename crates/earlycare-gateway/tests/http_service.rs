//! Integration tests against a running EarlyCare service.
//!
//! These call a real endpoint and need `EARLYCARE_SERVICE_URL` (and, for the
//! authenticated checks, `EARLYCARE_TOKEN`) in the environment.
//!
//! Run with: `cargo test -p earlycare-gateway --test http_service -- --ignored`

use std::time::Duration;

use earlycare_gateway::{Gateway, GatewayError, HttpGateway};

fn gateway(token: Option<String>) -> HttpGateway {
    let url = std::env::var("EARLYCARE_SERVICE_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
    HttpGateway::new(&url, token, Duration::from_secs(10))
}

#[tokio::test]
#[ignore]
async fn tips_are_readable_anonymously() {
    let tips = gateway(None)
        .get_all_health_tips()
        .await
        .expect("tips should load without a token");
    println!("service returned {} tips", tips.len());
}

#[tokio::test]
#[ignore]
async fn anonymous_submit_is_rejected() {
    let err = gateway(None)
        .submit_test(earlycare_core::models::submission::FinalizedSubmission {
            name: "Asha".to_string(),
            age: 40,
            gender: Default::default(),
            smoking: false,
            alcohol: false,
            pain: false,
            lump: false,
            weight_loss: false,
            attachment: None,
        })
        .await
        .expect_err("anonymous callers cannot submit");
    assert!(matches!(err, GatewayError::Unauthorized), "got: {err}");
}

#[tokio::test]
#[ignore]
async fn latest_result_is_absent_or_well_formed() {
    let token = std::env::var("EARLYCARE_TOKEN").expect("set EARLYCARE_TOKEN");
    let latest = gateway(Some(token))
        .get_my_results()
        .await
        .expect("latest result read should succeed");
    if let Some(result) = latest {
        assert!(!result.advice.is_empty());
    }
}
