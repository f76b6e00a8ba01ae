use actix_web::test;
use actix_web::test::TestRequest;
use actix_web::App;
use chrono::{DateTime, Utc};
use vaultly_lib::time::{time_service, TimeResponse};

#[actix_rt::test]
async fn test_time_endpoint() {
    let app = App::new().service(time_service());
    let service = test::init_service(app).await;

    let before = Utc::now().timestamp_millis();
    let request = TestRequest::get().uri("/time").to_request();
    let response = test::call_service(&service, request).await;
    assert!(response.status().is_success());
    let time: TimeResponse = test::read_body_json(response).await;
    let after = Utc::now().timestamp_millis();

    assert!(before <= time.unix && time.unix <= after);

    let parsed = DateTime::parse_from_rfc3339(&time.iso).unwrap();
    assert_eq!(time.unix, parsed.timestamp_millis());

    assert!(!time.formatted.is_empty());
    // long-form en-US date, e.g. "Thursday, March 7, 2024 at 02:31:05 PM"
    assert!(time.formatted.contains(" at "));
    assert!(time.formatted.ends_with("AM") || time.formatted.ends_with("PM"));
}
