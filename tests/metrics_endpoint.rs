#[macro_use]
mod common;

use actix_web::{http::header, test};
use common::fresh_metrics;

#[actix_web::test]
async fn scrape_exposes_http_instruments() {
    let metrics = fresh_metrics();
    let app = test_app!(metrics);

    test::read_body(test::call_service(&app, test::TestRequest::get().uri("/hello").to_request()).await).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/metrics").to_request()).await;
    assert_eq!(resp.status().as_u16(), 200);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/plain"), "{content_type}");
    assert!(content_type.contains("version=0.0.4"), "{content_type}");

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("http_requests_total"));
    assert!(body.contains("http_request_duration_seconds"));
    assert!(body.contains(r#"http_requests_total{method="GET",route="/hello",status="200"} 1"#));
    assert!(body.contains(r#"http_request_duration_seconds_count{method="GET",route="/hello",status="200"} 1"#));
}

#[actix_web::test]
async fn scrapes_are_themselves_counted() {
    let metrics = fresh_metrics();
    let app = test_app!(metrics);

    for _ in 0..2 {
        let resp = test::call_service(&app, test::TestRequest::get().uri("/metrics").to_request()).await;
        test::read_body(resp).await;
    }

    assert_eq!(metrics.request_count("GET", "/metrics", 200), 2);
}

#[cfg(target_os = "linux")]
#[actix_web::test]
async fn scrape_includes_process_metrics() {
    let metrics = fresh_metrics();
    let app = test_app!(metrics);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/metrics").to_request()).await;
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("process_start_time_seconds"));
}
