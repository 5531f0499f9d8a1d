//! Contract tests for the /api/clients and /api/reports endpoints.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{test, web, App};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use billbook::middleware::{json_error_handler, query_error_handler};
use helpers::{stored_invoice, utc, TestContext};

macro_rules! init_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::Data::new($ctx.invoices.clone()))
                .app_data(web::Data::new($ctx.clients.clone()))
                .app_data(web::Data::new($ctx.reports.clone()))
                .configure(billbook::configure_api),
        )
        .await
    };
}

fn decimal(body: &Value, key: &str) -> Decimal {
    serde_json::from_value(body[key].clone()).unwrap()
}

#[actix_web::test]
async fn test_add_and_list_clients() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    for name in ["Rose Corner", "Acme Traders"] {
        let req = test::TestRequest::post()
            .uri("/api/clients")
            .set_json(json!({ "name": name, "contact": "+91 98765 43210" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
    }

    let req = test::TestRequest::get().uri("/api/clients").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Acme Traders", "Rose Corner"]);
}

#[actix_web::test]
async fn test_blank_client_name_is_bad_request() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/clients")
        .set_json(json!({ "name": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_client_invoices_with_summary() {
    let ctx = TestContext::new();
    ctx.client_repo.seed("client-1", "Rose Corner");
    ctx.invoice_repo
        .seed(stored_invoice("client-1", "Rose Corner", dec!(700), utc(2025, 1, 1)));
    ctx.invoice_repo
        .seed(stored_invoice("client-1", "Rose Corner", dec!(300), utc(2025, 2, 1)));
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/clients/client-1/invoices")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["client_id"], "client-1");
    assert_eq!(body["summary"]["invoice_count"], 2);
    assert_eq!(body["summary"]["symbol"], "₹");
    assert_eq!(decimal(&body["summary"], "balance"), dec!(1000));
    assert_eq!(decimal(&body["invoices"][0], "total_amount"), dec!(300));
}

#[actix_web::test]
async fn test_cascade_delete() {
    let ctx = TestContext::new();
    ctx.client_repo.seed("client-1", "Rose Corner");
    ctx.invoice_repo
        .seed(stored_invoice("client-1", "Rose Corner", dec!(100), utc(2025, 1, 1)));
    let app = init_app!(ctx);

    let req = test::TestRequest::delete().uri("/api/clients/client-1").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 204);
    assert_eq!(ctx.invoice_repo.count(), 0);
    assert!(!ctx.client_repo.exists("client-1"));

    let req = test::TestRequest::delete().uri("/api/clients/client-1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_partial_cascade_is_conflict() {
    let ctx = TestContext::new();
    ctx.client_repo.seed("client-1", "Rose Corner");
    for day in 1..=2 {
        ctx.invoice_repo
            .seed(stored_invoice("client-1", "Rose Corner", dec!(100), utc(2025, 1, day)));
    }
    ctx.invoice_repo.fail_delete_at(1);
    let app = init_app!(ctx);

    let req = test::TestRequest::delete().uri("/api/clients/client-1").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 409);
    let body: Value = test::read_body_json(resp).await;
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("removed 1 of 2 invoices"));
    assert!(ctx.client_repo.exists("client-1"));
}

#[actix_web::test]
async fn test_outstanding_report() {
    let ctx = TestContext::new();
    ctx.invoice_repo
        .seed(stored_invoice("client-1", "Rose Corner", dec!(250), utc(2025, 1, 1)));
    ctx.invoice_repo
        .seed(stored_invoice("client-2", "Blue Mart", dec!(750), utc(2025, 1, 2)));
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/reports/outstanding?period=all&client=Blue%20Mart")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["period"], "all");
    assert_eq!(body["invoice_count"], 1);
    assert_eq!(decimal(&body, "total_due"), dec!(750));
    assert_eq!(body["clients"][0]["client_name"], "Blue Mart");

    let req = test::TestRequest::get()
        .uri("/api/reports/outstanding?period=fortnight")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}
