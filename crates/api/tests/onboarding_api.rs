//! Integration tests for the read-only wizard schema.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};

// ---------------------------------------------------------------------------
// Test: variant listing names every questionnaire with its step count
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_variants_returns_all_three() {
    let app = common::build_test_app(None, None);
    let json = body_json(get(app, "/api/v1/onboarding/variants").await, StatusCode::OK).await;

    let variants = json["data"].as_array().unwrap();
    let names: Vec<_> = variants.iter().map(|v| v["variant"].as_str().unwrap()).collect();
    assert_eq!(names, ["business", "self-assessment", "combined"]);

    assert_eq!(variants[0]["stepCount"], 3);
    assert_eq!(variants[2]["stepCount"], 6);
    assert_eq!(variants[2]["label"], "Business & Self Assessment");
}

// ---------------------------------------------------------------------------
// Test: business layout lists steps, fields and completion percentages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn business_layout_describes_each_step() {
    let app = common::build_test_app(None, None);
    let json = body_json(
        get(app, "/api/v1/onboarding/variants/business").await,
        StatusCode::OK,
    )
    .await;

    let steps = json["data"]["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 3);

    let first = &steps[0];
    assert_eq!(first["number"], 1);
    assert_eq!(first["title"], "Company Details & Documents");
    assert_eq!(first["progressPercent"], 33);
    assert_eq!(first["requiresConfirmation"], false);

    let company = &first["fields"][0];
    assert_eq!(company["key"], "companyName");
    assert_eq!(company["label"], "Company Name");
    assert_eq!(company["required"], true);

    let paye_ref = first["fields"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["key"] == "payeRef")
        .unwrap();
    assert_eq!(paye_ref["revealedBy"], "hasPaye");
    assert_eq!(paye_ref["required"], false);

    let last = &steps[2];
    assert_eq!(last["progressPercent"], 100);
    assert_eq!(last["requiresConfirmation"], true);
}

// ---------------------------------------------------------------------------
// Test: legacy `both` resolves to the combined layout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn legacy_alias_resolves_to_combined() {
    let app = common::build_test_app(None, None);
    let json = body_json(
        get(app, "/api/v1/onboarding/variants/both").await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(json["data"]["variant"], "combined");
    assert_eq!(json["data"]["steps"].as_array().unwrap().len(), 6);
}

// ---------------------------------------------------------------------------
// Test: unknown variant returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_variant_returns_404() {
    let app = common::build_test_app(None, None);
    let json = body_json(
        get(app, "/api/v1/onboarding/variants/partnership").await,
        StatusCode::NOT_FOUND,
    )
    .await;

    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Onboarding variant 'partnership' not found");
}
