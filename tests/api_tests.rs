use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{TimeZone, Utc};
use hotel_reservation::adapter::driven::{FixedClock, InMemoryStore};
use hotel_reservation::adapter::driver::rest_api::{create_router, AppState};
use hotel_reservation::domain::port::Clock;
use serde_json::{json, Value};
use std::sync::Arc;

const PRESIDENTIAL_SUITE: u64 = 3;
const FAMILY_PENTHOUSE: u64 = 6;

fn server() -> TestServer {
    // 本日 = 2025-05-01
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2025, 5, 1, 9, 30, 0).unwrap(),
    ));
    let store = InMemoryStore::seeded(clock.now());
    let state = AppState::new(Arc::new(store.clone()), Arc::new(store), clock);
    TestServer::new(create_router().with_state(state)).unwrap()
}

fn booking(room_id: u64, email: &str, check_in: &str, check_out: &str, guests: u32) -> Value {
    json!({
        "room_id": room_id,
        "full_name": "Jane Doe",
        "email": email,
        "phone": "+1 (555) 123-4567",
        "check_in_date": check_in,
        "check_out_date": check_out,
        "guests": guests,
        "special_requests": "Late check-in"
    })
}

fn available_ids(body: &Value) -> Vec<u64> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|room| room["id"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let response = server().get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], json!("healthy"));
}

#[tokio::test]
async fn test_list_rooms_sorted_by_price() {
    let response = server().get("/rooms").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body = response.json::<Value>();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Rooms retrieved successfully"));
    assert_eq!(body["count"], json!(6));
    assert_eq!(body["data"][0]["room_name"], json!("Modern Twin Room"));
    assert_eq!(body["data"][0]["price_per_night"], json!(249.0));
    assert_eq!(body["data"][5]["room_name"], json!("Presidential Suite"));
    assert_eq!(
        body["data"][5]["features"],
        json!(["2 Bedrooms", "Living Room", "Dining Area", "Butler Service"])
    );
}

#[tokio::test]
async fn test_booking_round_trip() {
    let server = server();
    let dates = json!({"check_in_date": "2025-06-01", "check_out_date": "2025-06-04"});

    // 予約前: すべての客室に空きがある
    let before = server.post("/rooms/availability").json(&dates).await;
    assert_eq!(before.status_code(), StatusCode::OK);
    let before = before.json::<Value>();
    assert_eq!(before["count"], json!(6));
    assert_eq!(before["check_in_date"], json!("2025-06-01"));
    assert_eq!(before["check_out_date"], json!("2025-06-04"));
    assert!(available_ids(&before).contains(&PRESIDENTIAL_SUITE));

    // 予約作成
    let created = server
        .post("/reservations")
        .json(&booking(PRESIDENTIAL_SUITE, "jane@example.com", "2025-06-01", "2025-06-04", 2))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let created = created.json::<Value>();
    assert_eq!(created["message"], json!("Reservation created successfully!"));
    let reservation = &created["data"];
    assert_eq!(reservation["reservation_id"], json!(1));
    assert_eq!(reservation["room_name"], json!("Presidential Suite"));
    assert_eq!(reservation["nights"], json!(3));
    assert_eq!(reservation["price_per_night"], json!(799.0));
    assert_eq!(reservation["total_price"], json!(2397.0));
    assert_eq!(reservation["status"], json!("confirmed"));
    assert_eq!(reservation["special_requests"], json!("Late check-in"));

    // 部屋数1の客室は照会結果から消える
    let during = server.post("/rooms/availability").json(&dates).await.json::<Value>();
    assert_eq!(during["count"], json!(5));
    assert!(!available_ids(&during).contains(&PRESIDENTIAL_SUITE));

    // 連絡先で検索
    let found = server
        .get("/reservations")
        .add_query_param("email", "JANE@example.com")
        .await;
    assert_eq!(found.status_code(), StatusCode::OK);
    let found = found.json::<Value>();
    assert_eq!(found["count"], json!(1));
    assert_eq!(found["data"][0]["room_type"], json!("Presidential"));
    assert_eq!(found["data"][0]["check_in_date"], json!("2025-06-01"));

    // キャンセル
    let cancelled = server
        .post("/reservations/cancel")
        .json(&json!({"reservation_id": 1, "email": "jane@example.com"}))
        .await;
    assert_eq!(cancelled.status_code(), StatusCode::OK);
    let cancelled = cancelled.json::<Value>();
    assert_eq!(
        cancelled["data"],
        json!({
            "reservation_id": 1,
            "guest_name": "Jane Doe",
            "email": "jane@example.com",
            "status": "cancelled"
        })
    );

    // 空きが戻る
    let after = server.post("/rooms/availability").json(&dates).await.json::<Value>();
    assert_eq!(after["count"], json!(6));

    // 検索結果にはキャンセル済みとして残る
    let found = server
        .post("/reservations/lookup")
        .json(&json!({"email": "jane@example.com"}))
        .await
        .json::<Value>();
    assert_eq!(found["data"][0]["status"], json!("cancelled"));
}

#[tokio::test]
async fn test_overlapping_booking_conflicts() {
    let server = server();
    server
        .post("/reservations")
        .json(&booking(PRESIDENTIAL_SUITE, "a@example.com", "2025-06-01", "2025-06-04", 2))
        .await;

    let response = server
        .post("/reservations")
        .json(&booking(PRESIDENTIAL_SUITE, "b@example.com", "2025-06-03", "2025-06-06", 2))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body = response.json::<Value>();
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["message"],
        json!("No rooms available for selected dates. Please choose different dates.")
    );
    assert_eq!(body["data"], Value::Null);

    // チェックアウト日からの予約は可能
    let response = server
        .post("/reservations")
        .json(&booking(PRESIDENTIAL_SUITE, "b@example.com", "2025-06-04", "2025-06-06", 2))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_reservation_validation_messages() {
    let server = server();
    let cases = [
        (
            json!({"room_id": 1, "full_name": "Jane", "phone": "5551234567",
                   "check_in_date": "2025-06-01", "check_out_date": "2025-06-02", "guests": 1}),
            "Email is required",
        ),
        (
            booking(1, "not-an-email", "2025-06-01", "2025-06-02", 1),
            "Invalid email format",
        ),
        (
            booking(1, "a@example.com", "2025-06-03", "2025-06-01", 1),
            "Check-out date must be after check-in date",
        ),
        (
            booking(1, "a@example.com", "2025-04-01", "2025-04-03", 1),
            "Check-in date cannot be in the past",
        ),
        (
            booking(1, "a@example.com", "2025-06-01", "2025-06-02", 3),
            "Number of guests exceeds room capacity (max: 2)",
        ),
    ];

    for (payload, message) in cases {
        let response = server.post("/reservations").json(&payload).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{}", message);
        let body = response.json::<Value>();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!(message));
        assert_eq!(body["data"], Value::Null);
    }
}

#[tokio::test]
async fn test_values_longer_than_columns_are_rejected_before_storage() {
    let server = server();
    let mut long_name = booking(1, "a@example.com", "2025-06-01", "2025-06-02", 1);
    long_name["full_name"] = json!("N".repeat(150));
    let long_email = booking(
        1,
        &format!("{}@example.com", "e".repeat(121)),
        "2025-06-01",
        "2025-06-02",
        1,
    );
    let mut long_phone = booking(1, "a@example.com", "2025-06-01", "2025-06-02", 1);
    long_phone["phone"] = json!("+44 (0) 20 7946 0958 00");

    let cases = [
        (long_name, "Full name must be at most 100 characters"),
        (long_email, "Email must be at most 100 characters"),
        (long_phone, "Phone number must be at most 20 characters"),
    ];
    for (payload, message) in cases {
        let response = server.post("/reservations").json(&payload).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{}", message);
        assert_eq!(response.json::<Value>()["message"], json!(message));
    }

    let lookup = server
        .get("/reservations")
        .add_query_param("email", "a@example.com")
        .await;
    assert_eq!(lookup.json::<Value>()["count"], json!(0));
}

#[tokio::test]
async fn test_unknown_room_is_not_found() {
    let response = server()
        .post("/reservations")
        .json(&booking(99, "a@example.com", "2025-06-01", "2025-06-02", 1))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["message"], json!("Room not found"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let response = server().post("/reservations").text("{not json").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["data"], Value::Null);
}

#[tokio::test]
async fn test_availability_validation_returns_empty_list() {
    let response = server()
        .post("/rooms/availability")
        .json(&json!({"check_in_date": "2025-06-01"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["message"], json!("Check-out date is required"));
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_availability_with_room_filter() {
    let response = server()
        .post("/rooms/availability")
        .json(&json!({
            "check_in_date": "2025-06-01",
            "check_out_date": "2025-06-03",
            "room_id": FAMILY_PENTHOUSE
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(available_ids(&body), vec![FAMILY_PENTHOUSE]);
    assert_eq!(body["data"][0]["available_rooms"], json!(2));
    assert_eq!(body["message"], json!("Available rooms found"));
}

#[tokio::test]
async fn test_lookup_requires_contact() {
    let response = server().post("/reservations/lookup").json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(
        body["message"],
        json!("Email or phone number is required to retrieve reservations")
    );
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_lookup_without_matches_is_success() {
    let response = server()
        .get("/reservations")
        .add_query_param("phone", "0000000000")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("No reservations found"));
    assert_eq!(body["count"], json!(0));
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_cancel_flows() {
    let server = server();
    server
        .post("/reservations")
        .json(&booking(1, "a@example.com", "2025-06-01", "2025-06-03", 1))
        .await;

    // 存在しない予約
    let response = server
        .post("/reservations/cancel")
        .json(&json!({"reservation_id": 42}))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    // メールアドレスが一致しない
    let response = server
        .post("/reservations/cancel")
        .json(&json!({"reservation_id": 1, "email": "other@example.com"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["message"], json!("Reservation not found"));

    // ID未指定
    let response = server.post("/reservations/cancel").json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], json!("Reservation ID is required"));

    // 1回目は成功、2回目はキャンセル済み
    let response = server
        .post("/reservations/cancel")
        .json(&json!({"reservation_id": 1}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server
        .post("/reservations/cancel")
        .json(&json!({"reservation_id": 1}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(
        response.json::<Value>()["message"],
        json!("This reservation has already been cancelled")
    );
}
