// tests/api.rs

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::path::PathBuf;
use tower::ServiceExt;

use exam_coordination::{build_router, AppState, Settings};

async fn app() -> Router {
    let settings = Settings {
        bind_addr: "127.0.0.1:0".into(),
        jwt_secret: "test-secret".into(),
        jwt_ttl_hours: 1,
        bcrypt_cost: 4,
        data_seed: Some(42),
        fonts_dir: PathBuf::from("./fonts"),
        access_table_path: None,
    };
    build_router(AppState::new(settings).await.unwrap())
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let response = send_raw(app, method, uri, token, body).await;
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    (status, value)
}

async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login de {} falhou: {}", username, body);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = app().await;
    let response = send_raw(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_success_and_failure() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "22501", "password": "EC22501" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "Exam Coordinator");
    assert_eq!(body["user"]["name"], "M. Suresh");
    assert!(body["token"].as_str().is_some());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "22501", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid username or password.");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_routes_need_token() {
    let app = app().await;
    let (status, _) = send(&app, Method::GET, "/api/dashboard", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/dashboard", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_dashboard_lists_pages_for_role() {
    let app = app().await;
    let token = login(&app, "33701", "AMC33701").await;

    let (status, body) = send(&app, Method::GET, "/api/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isAdmin"], false);
    let pages: Vec<&str> = body["pages"].as_array().unwrap().iter().filter_map(Value::as_str).collect();
    assert_eq!(pages.len(), 2);
    assert!(pages.contains(&"eligibility"));
    assert!(pages.contains(&"review"));
}

#[tokio::test]
async fn test_page_without_access_redirects_to_dashboard() {
    let app = app().await;
    let token = login(&app, "33701", "AMC33701").await;

    let response = send_raw(&app, Method::GET, "/api/allocation", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/api/dashboard");

    // o coordenador não entra na elegibilidade
    let token = login(&app, "22501", "EC22501").await;
    let response = send_raw(
        &app,
        Method::GET,
        "/api/eligibility/students?program=MCA&semester=IV&section=A",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_generate_double_and_edit_occupant() {
    let app = app().await;
    let token = login(&app, "22501", "EC22501").await;

    let (status, _) = send(&app, Method::GET, "/api/allocation", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/allocation/generate",
        Some(&token),
        Some(json!({ "room": "PB701", "seatingOption": "Double" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["configuration"]["room"], "PB701");
    assert_eq!(body["configuration"]["slots"].as_array().unwrap().len(), 2);
    let seats = body["seats"].as_array().unwrap();
    assert_eq!(seats.len(), 24);
    assert_eq!(seats[0]["id"], 1);
    assert_eq!(seats[0]["rollNumbers"][0], "VU22MCA070");
    assert!(seats.iter().all(|s| s["rollNumbers"].as_array().unwrap().len() == 2));
    assert_eq!(body["allocatedCount"], 48);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/allocation/seats/3/occupants/1",
        Some(&token),
        Some(json!({ "rollNumber": "VU22MCA999" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seats"][2]["rollNumbers"][1], "VU22MCA999");
    assert_eq!(body["seats"][2]["rollNumbers"][0], seats[2]["rollNumbers"][0]);
    assert_eq!(body["seats"][3], seats[3]);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/allocation/seats/3/occupants/2",
        Some(&token),
        Some(json!({ "rollNumber": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::POST, "/api/allocation/submit", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["submitted"], true);
}

#[tokio::test]
async fn test_generate_rejects_unknown_room() {
    let app = app().await;
    let token = login(&app, "Cyni", "Vpu09370@").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/allocation/generate",
        Some(&token),
        Some(json!({ "room": "PB999", "seatingOption": "Single" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invigilation_add_and_delete() {
    let app = app().await;
    let token = login(&app, "22501", "EC22501").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/invigilation/assignments",
        Some(&token),
        Some(json!({ "facultyId": "100109", "date": "2025-04-22", "shift": "First Shift", "room": "PB703" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["date"], "22/04/2025");
    assert_eq!(body["facultyName"], "Abhishek Malik");
    let id = body["id"].as_u64().unwrap();

    let uri = format!("/api/invigilation/assignments/{}", id);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    // de novo: continua 204
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, schedule) = send(&app, Method::GET, "/api/invigilation/assignments", Some(&token), None).await;
    assert!(schedule["assignments"].as_array().unwrap().iter().all(|a| a["id"].as_u64() != Some(id)));
}

#[tokio::test]
async fn test_logout_invalidates_token() {
    let app = app().await;
    let token = login(&app, "11301", "HOD11301").await;

    let (status, body) = send(&app, Method::GET, "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "HOD");

    let (status, _) = send(&app, Method::POST, "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reviewed_list_feeds_allocation() {
    let app = app().await;
    let token = login(&app, "11301", "HOD11301").await;
    let mca_iv_a = json!({ "program": "MCA", "semester": "IV", "section": "A" });

    let (status, uploaded) = send(&app, Method::POST, "/api/eligibility/upload", Some(&token), Some(mca_iv_a.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(uploaded["stats"]["overall"], 20);
    assert_eq!(uploaded["stats"]["eligible"], 12);

    let (status, review) = send(&app, Method::GET, "/api/review", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let conditional = review["students"].as_array().unwrap();
    assert_eq!(conditional.len(), 4);
    let accepted = conditional[0]["regNo"].as_str().unwrap().to_string();

    let (status, student) = send(
        &app,
        Method::POST,
        &format!("/api/review/{}/certificate", accepted),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(student["medicalCertificate"], "submitted");

    let (status, student) = send(
        &app,
        Method::POST,
        &format!("/api/review/{}/decision", accepted),
        Some(&token),
        Some(json!({ "action": "accept", "remark": "Medical leave" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(student["hodRemark"], "Medical leave");

    let (status, submitted) = send(&app, Method::POST, "/api/review/submit", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(submitted["eligibleCount"], 13);
    let reviewed: Vec<&str> = submitted["students"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["regNo"].as_str())
        .collect();
    assert_eq!(reviewed[0], accepted);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/allocation/generate",
        Some(&token),
        Some(json!({ "room": "PB704", "seatingOption": "Single", "slots": [mca_iv_a] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let seats = body["seats"].as_array().unwrap();
    // lista revisada primeiro, na ordem em que foi gravada
    for (i, reg_no) in reviewed.iter().enumerate() {
        assert_eq!(seats[i]["rollNumbers"][0], *reg_no);
    }
    // depois a numeração sintética, sem repetir quem já está
    assert_eq!(seats[13]["rollNumbers"][0], "VU22MCA001");
    assert_eq!(body["allocatedCount"], 24);

    let (status, eligible) = send(&app, Method::GET, "/api/allocation/eligible-students", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(eligible["students"].as_array().unwrap().len(), 13);
    assert_eq!(eligible["students"][0]["regNo"], accepted.as_str());
}

#[tokio::test]
async fn test_upload_rejects_incoherent_rows() {
    let app = app().await;
    let token = login(&app, "33701", "AMC33701").await;

    let row = json!({
        "regNo": "VU22MCA001",
        "name": "Aarav Sharma",
        "totalClasses": 96,
        "present": 70,
        "absent": 10,
        "percentage": 72.92,
        "program": "MCA",
        "semester": "IV",
        "section": "A",
        "eligibilityStatus": "Conditional"
    });
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/eligibility/upload",
        Some(&token),
        Some(json!({ "program": "MCA", "semester": "IV", "section": "A", "students": [row] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "One or more fields are invalid.");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/eligibility/upload",
        Some(&token),
        Some(json!({ "program": "MCA", "semester": "VI", "section": "A" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_messages_flow() {
    let app = app().await;
    let token = login(&app, "22501", "EC22501").await;

    let (status, body) = send(&app, Method::GET, "/api/messages/templates", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["templates"].as_array().unwrap().len(), 3);
    assert_eq!(body["variables"].as_array().unwrap().len(), 9);

    let (status, recipients) = send(&app, Method::GET, "/api/messages/recipients?type=faculty", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let recipients = recipients.as_array().unwrap();
    assert_eq!(recipients.len(), 15);
    assert!(recipients.iter().all(|r| r["type"] == "faculty"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/messages/send",
        Some(&token),
        Some(json!({
            "to": "Abhishek Malik",
            "recipientId": "100109",
            "subject": "Invigilation in @roomNumber",
            "body": "Dear @recipientName,\n@senderName",
            "sendViaEmail": true,
            "variables": { "roomNumber": "PB703" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Message sent successfully via WhatsApp and Email");
    assert_eq!(body["sent"]["subject"], "Invigilation in PB703");
    assert_eq!(body["sent"]["body"], "Dear Abhishek Malik,\nM. Suresh");

    let (_, sent) = send(&app, Method::GET, "/api/messages/sent", Some(&token), None).await;
    assert_eq!(sent.as_array().unwrap().len(), 1);

    // AMC não tem a página de mensagens
    let amc = login(&app, "33701", "AMC33701").await;
    let response = send_raw(&app, Method::GET, "/api/messages/templates", Some(&amc), None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}
