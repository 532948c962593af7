//! Blood inventory HTTP tests

use super::{build_test_router, get_json, patch_json, post_json, put_json, TestAppState};
use crate::api::{create_admin_token, create_user_token};
use axum::http::StatusCode;
use bloodbank_core::domain::BloodGroup;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[tokio::test]
async fn test_stock_and_update_units() {
    let state = TestAppState::new();
    let app = build_test_router(state);
    let admin = create_admin_token();

    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/add_bloodtype", Some(&admin), &json!({"name": "O+"})).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/add_to_bloodinventory",
        Some(&admin),
        &json!({"blood_type": "O+", "quantity": 2}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body.unwrap(),
        json!({
            "message": "Blood type with quantity added to inventory",
            "inventory": {"id": 1, "blood_type": "O+", "quantity": 2}
        })
    );

    let (status, body): (StatusCode, Option<Value>) =
        put_json(&app, "/update_units/1", Some(&admin), &json!({"quantity": 6})).await;
    assert_eq!(status, StatusCode::CREATED);
    let body = body.unwrap();
    assert_eq!(body["message"], "Units available updated");
    assert_eq!(body["inventory"]["quantity"], 6);

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/get_bloodinventory", Some(&create_user_token(4))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body.unwrap(),
        json!({
            "items": [{"id": 1, "blood_type": "O+", "quantity": 6}],
            "total": 1,
            "page": 1,
            "total_pages": 1
        })
    );
}

#[tokio::test]
async fn test_duplicate_blood_type_rejected() {
    let state = TestAppState::new();
    state.blood_type_repo.add(BloodGroup::ANegative).await;
    let app = build_test_router(state);
    let admin = create_admin_token();
    let row = json!({"blood_type": "A-", "quantity": 1});

    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/add_to_bloodinventory", Some(&admin), &row).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body): (StatusCode, Option<Value>) =
        post_json(&app, "/add_to_bloodinventory", Some(&admin), &row).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["error"], "conflict");
}

#[tokio::test]
async fn test_moving_row_onto_stocked_type_rejected() {
    let state = TestAppState::new();
    state.blood_type_repo.add(BloodGroup::APositive).await;
    state.blood_type_repo.add(BloodGroup::BPositive).await;
    let app = build_test_router(state);
    let admin = create_admin_token();

    for code in ["A+", "B+"] {
        let (status, _): (StatusCode, Option<Value>) = post_json(
            &app,
            "/add_to_bloodinventory",
            Some(&admin),
            &json!({"blood_type": code, "quantity": 3}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _): (StatusCode, Option<Value>) =
        patch_json(&app, "/update_units/2", Some(&admin), &json!({"blood_type": "A+"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Re-asserting its own blood type is fine
    let (status, _): (StatusCode, Option<Value>) =
        patch_json(&app, "/update_units/2", Some(&admin), &json!({"blood_type": "B+"})).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_inventory_writes_forbidden_for_users() {
    let state = TestAppState::new();
    state.blood_type_repo.add(BloodGroup::OPositive).await;
    let app = build_test_router(state);
    let user = create_user_token(7);

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/add_to_bloodinventory",
        Some(&user),
        &json!({"blood_type": "O+", "quantity": 2}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body.unwrap()["message"],
        "Only admin can add to blood inventory"
    );

    let (status, _): (StatusCode, Option<Value>) =
        put_json(&app, "/update_units/1", Some(&user), &json!({"quantity": 6})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_empty_inventory() {
    let state = TestAppState::new();
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/get_bloodinventory", Some(&create_admin_token())).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["total_pages"], 0);
}

#[tokio::test]
async fn test_inventory_requires_authentication() {
    let state = TestAppState::new();
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) =
        get_json(&app, "/get_bloodinventory", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_missing_row_and_invalid_quantity() {
    let state = TestAppState::new();
    state.blood_type_repo.add(BloodGroup::OPositive).await;
    let app = build_test_router(state);
    let admin = create_admin_token();

    let (status, _): (StatusCode, Option<Value>) =
        put_json(&app, "/update_units/9", Some(&admin), &json!({"quantity": 6})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/add_to_bloodinventory",
        Some(&admin),
        &json!({"blood_type": "O+", "quantity": -1}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["error"], "validation");

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        "/add_to_bloodinventory",
        Some(&admin),
        &json!({"blood_type": "O+"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_role_checked_before_body() {
    let state = TestAppState::new();
    state.blood_type_repo.add(BloodGroup::OPositive).await;
    let app = build_test_router(state);
    let user = create_user_token(7);

    // Missing quantity
    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        "/add_to_bloodinventory",
        Some(&user),
        &json!({"blood_type": "O+"}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _): (StatusCode, Option<Value>) =
        patch_json(&app, "/update_units/1", Some(&user), &json!({"quantity": "six"})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
