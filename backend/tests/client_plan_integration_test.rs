//! Integration tests for the client registry and plan lifecycle

mod common;

use axum::http::StatusCode;
use serde_json::json;

async fn create_client(app: &common::TestApp, token: &str, name: &str) -> String {
    let (status, body) = app
        .post_auth(
            "/api/v1/clients",
            &json!({"name": name}).to_string(),
            token,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create client failed: {}", body);
    let client: serde_json::Value = serde_json::from_str(&body).unwrap();
    client["id"].as_str().unwrap().to_string()
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_new_client_has_no_plan() {
    let app = common::TestApp::new().await;
    let token = app.register_trainer().await;

    let (status, body) = app
        .post_auth(
            "/api/v1/clients",
            &json!({"name": "Ana Souza", "email": "ana@example.com", "weight_kg": 68.5}).to_string(),
            &token,
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let client: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(client["status"], "active");
    assert_eq!(client["plan_status"], "no_plan");
    assert!(client.get("plan").is_none() || client["plan"].is_null());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_assign_custom_plan_creates_pending_charge() {
    let app = common::TestApp::new().await;
    let token = app.register_trainer().await;
    let client_id = create_client(&app, &token, "Bruno Lima").await;

    let (status, body) = app
        .post_auth(
            &format!("/api/v1/clients/{}/plan", client_id),
            &json!({
                "name": "Mensal",
                "value": "150.00",
                "duration_months": 1,
                "start_date": "2024-01-01"
            })
            .to_string(),
            &token,
        )
        .await;

    assert_eq!(status, StatusCode::OK, "assign failed: {}", body);
    let client: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(client["plan"]["name"], "Mensal");
    assert_eq!(client["plan"]["end_date"], "2024-02-01");

    // The pending cycle charge lands on the cycle start
    let (status, body) = app
        .get_auth(
            &format!("/api/v1/transactions?client_id={}", client_id),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let txs: serde_json::Value = serde_json::from_str(&body).unwrap();
    let txs = txs.as_array().unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0]["status"], "pending");
    assert_eq!(txs[0]["amount"], "150.00");
    assert_eq!(txs[0]["due_date"], "2024-01-01");
    assert_eq!(txs[0]["plan_name"], "Mensal");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_assign_plan_from_template() {
    let app = common::TestApp::new().await;
    let token = app.register_trainer().await;
    let client_id = create_client(&app, &token, "Carla Dias").await;

    let (status, body) = app
        .post_auth(
            "/api/v1/plans",
            &json!({"name": "Trimestral", "value": "400.00", "duration_months": 3}).to_string(),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let template: serde_json::Value = serde_json::from_str(&body).unwrap();
    let template_id = template["id"].as_str().unwrap();

    let (status, body) = app
        .post_auth(
            &format!("/api/v1/clients/{}/plan", client_id),
            &json!({"template_id": template_id, "start_date": "2024-03-01"}).to_string(),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "assign failed: {}", body);

    let client: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(client["plan"]["name"], "Trimestral");
    assert_eq!(client["plan"]["duration_months"], 3);
    assert_eq!(client["plan"]["end_date"], "2024-06-01");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_assign_rejects_template_and_custom_mix() {
    let app = common::TestApp::new().await;
    let token = app.register_trainer().await;
    let client_id = create_client(&app, &token, "Diego Reis").await;

    let (status, _) = app
        .post_auth(
            &format!("/api/v1/clients/{}/plan", client_id),
            &json!({
                "template_id": uuid::Uuid::new_v4(),
                "name": "Mensal",
                "value": "150.00",
                "duration_months": 1
            })
            .to_string(),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_renew_requires_current_plan() {
    let app = common::TestApp::new().await;
    let token = app.register_trainer().await;
    let client_id = create_client(&app, &token, "Elisa Melo").await;

    let (status, _) = app
        .post_auth(
            &format!("/api/v1/clients/{}/plan/renew", client_id),
            &json!({"keep_conditions": true}).to_string(),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_renewal_archives_unpaid_cycle_as_pending() {
    let app = common::TestApp::new().await;
    let token = app.register_trainer().await;
    let client_id = create_client(&app, &token, "Fabio Nunes").await;

    app.post_auth(
        &format!("/api/v1/clients/{}/plan", client_id),
        &json!({"name": "Mensal", "value": "150.00", "duration_months": 1, "start_date": "2024-01-01"})
            .to_string(),
        &token,
    )
    .await;

    let (status, body) = app
        .post_auth(
            &format!("/api/v1/clients/{}/plan/renew", client_id),
            &json!({"keep_conditions": true, "start_date": "2024-02-01"}).to_string(),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "renew failed: {}", body);

    // New cycle keeps the terms
    let client: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(client["plan"]["name"], "Mensal");
    assert_eq!(client["plan"]["value"], "150.00");
    assert_eq!(client["plan"]["start_date"], "2024-02-01");
    assert_eq!(client["plan"]["end_date"], "2024-03-01");

    // The outgoing, unpaid cycle is archived as pending
    let (status, body) = app
        .get_auth(&format!("/api/v1/clients/{}/plan/history", client_id), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let history: serde_json::Value = serde_json::from_str(&body).unwrap();
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["plan_name"], "Mensal");
    assert_eq!(history[0]["start_date"], "2024-01-01");
    assert_eq!(history[0]["end_date"], "2024-02-01");
    assert_eq!(history[0]["payment_status"], "pending");

    // Renewal opened a second pending charge
    let (_, body) = app
        .get_auth(&format!("/api/v1/transactions?client_id={}", client_id), &token)
        .await;
    let txs: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(txs.as_array().unwrap().len(), 2);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_renewal_archives_paid_cycle_as_paid() {
    let app = common::TestApp::new().await;
    let token = app.register_trainer().await;
    let client_id = create_client(&app, &token, "Gisele Prado").await;

    app.post_auth(
        &format!("/api/v1/clients/{}/plan", client_id),
        &json!({"name": "Mensal", "value": "150.00", "duration_months": 1, "start_date": "2024-01-01"})
            .to_string(),
        &token,
    )
    .await;

    // Pay the cycle charge
    let (_, body) = app
        .get_auth(&format!("/api/v1/transactions?client_id={}", client_id), &token)
        .await;
    let txs: serde_json::Value = serde_json::from_str(&body).unwrap();
    let tx_id = txs[0]["id"].as_str().unwrap().to_string();
    let (status, _) = app
        .post_auth(&format!("/api/v1/transactions/{}/pay", tx_id), "", &token)
        .await;
    assert_eq!(status, StatusCode::OK);

    app.post_auth(
        &format!("/api/v1/clients/{}/plan/renew", client_id),
        &json!({"keep_conditions": true, "start_date": "2024-02-01"}).to_string(),
        &token,
    )
    .await;

    let (_, body) = app
        .get_auth(&format!("/api/v1/clients/{}/plan/history", client_id), &token)
        .await;
    let history: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(history[0]["payment_status"], "paid");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_renewal_with_new_terms_keeps_name() {
    let app = common::TestApp::new().await;
    let token = app.register_trainer().await;
    let client_id = create_client(&app, &token, "Hugo Costa").await;

    app.post_auth(
        &format!("/api/v1/clients/{}/plan", client_id),
        &json!({"name": "Mensal", "value": "150.00", "duration_months": 1, "start_date": "2024-01-01"})
            .to_string(),
        &token,
    )
    .await;

    let (status, body) = app
        .post_auth(
            &format!("/api/v1/clients/{}/plan/renew", client_id),
            &json!({
                "keep_conditions": false,
                "value": "420.00",
                "duration_months": 3,
                "start_date": "2024-02-01"
            })
            .to_string(),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "renew failed: {}", body);

    let client: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(client["plan"]["name"], "Mensal");
    assert_eq!(client["plan"]["value"], "420.00");
    assert_eq!(client["plan"]["duration_months"], 3);
    assert_eq!(client["plan"]["end_date"], "2024-05-01");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_plan_status_endpoint() {
    let app = common::TestApp::new().await;
    let token = app.register_trainer().await;
    let client_id = create_client(&app, &token, "Iara Luz").await;

    let (status, body) = app
        .get_auth(&format!("/api/v1/clients/{}/plan/status", client_id), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["status"], "no_plan");

    // A cycle starting today runs at least a month, so it reads active
    app.post_auth(
        &format!("/api/v1/clients/{}/plan", client_id),
        &json!({"name": "Mensal", "value": "150.00", "duration_months": 1}).to_string(),
        &token,
    )
    .await;

    let (_, body) = app
        .get_auth(&format!("/api/v1/clients/{}/plan/status", client_id), &token)
        .await;
    let response: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["status"], "active");
    assert!(response["days_remaining"].as_i64().unwrap() > 5);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_public_self_registration() {
    let app = common::TestApp::new().await;
    let token = app.register_trainer().await;

    let (_, body) = app.get_auth("/api/v1/auth/me", &token).await;
    let profile: serde_json::Value = serde_json::from_str(&body).unwrap();
    let trainer_id = profile["id"].as_str().unwrap();

    // No auth header on the public route
    let (status, body) = app
        .post(
            &format!("/api/v1/public/register/{}", trainer_id),
            &json!({"name": "Walk-in Lead", "phone": "+55 11 99999-0000"}).to_string(),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "self-register failed: {}", body);

    let client: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(client["status"], "active");
    assert_eq!(client["plan_status"], "no_plan");

    // The new lead shows up in the trainer's roster
    let (_, body) = app.get_auth("/api/v1/clients", &token).await;
    let clients: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(clients
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["name"] == "Walk-in Lead"));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_clients_are_scoped_to_their_trainer() {
    let app = common::TestApp::new().await;
    let token_a = app.register_trainer().await;
    let token_b = app.register_trainer().await;

    let client_id = create_client(&app, &token_a, "Private Client").await;

    let (status, _) = app
        .get_auth(&format!("/api/v1/clients/{}", client_id), &token_b)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_archive_client_via_status_update() {
    let app = common::TestApp::new().await;
    let token = app.register_trainer().await;
    let client_id = create_client(&app, &token, "Joana Brito").await;

    let (status, body) = app
        .put_auth(
            &format!("/api/v1/clients/{}", client_id),
            &json!({"status": "inactive"}).to_string(),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let client: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(client["status"], "inactive");

    // Filtered listing only returns the requested status
    let (_, body) = app.get_auth("/api/v1/clients?status=active", &token).await;
    let active: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(active.as_array().unwrap().is_empty());

    let (_, body) = app.get_auth("/api/v1/clients?status=inactive", &token).await;
    let inactive: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(inactive.as_array().unwrap().len(), 1);
}
