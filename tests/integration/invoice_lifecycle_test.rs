//! Integration tests for invoice save, list, duplicate and delete.

#[path = "../helpers/mod.rs"]
mod helpers;

use chrono::{Duration, NaiveDate};
use rust_decimal_macros::dec;

use billbook::core::AppError;
use billbook::modules::invoices::models::LineItem;
use billbook::modules::invoices::services::PaymentStateReconciler;
use billbook::modules::invoices::{Invoice, InvoiceStatus};
use helpers::{invoice_for, stored_invoice, utc, TestContext};

#[tokio::test]
async fn test_new_invoice_requires_client() {
    let ctx = TestContext::new();
    let mut invoice = invoice_for("client-1", "Rose Corner", dec!(100));
    invoice.client_id = None;

    let result = ctx.invoices.save_invoice(invoice).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(ctx.invoice_repo.count(), 0);
}

#[tokio::test]
async fn test_save_recomputes_total_and_derives_status() {
    let ctx = TestContext::new();
    let mut invoice = invoice_for("client-1", "Rose Corner", dec!(400));
    invoice.items.push(LineItem::new("Extra", dec!(50), dec!(2)));
    invoice.received_amount = dec!(200);
    invoice.total_amount = dec!(1);
    invoice.status = InvoiceStatus::Closed;

    let saved = ctx.invoices.save_invoice(invoice).await.unwrap();

    assert!(saved.id.is_some());
    assert!(saved.created_at.is_some());
    assert_eq!(saved.total_amount, dec!(500));
    assert_eq!(saved.status, InvoiceStatus::Partial);
    assert!(!saved.is_fully_paid);
}

#[tokio::test]
async fn test_update_keeps_closed_status_and_creation_time() {
    let ctx = TestContext::new();
    let created = utc(2025, 1, 5);
    let id = ctx
        .invoice_repo
        .seed(stored_invoice("client-1", "Rose Corner", dec!(300), created));
    ctx.invoices.close(&id).await.unwrap();

    let mut edited = ctx.invoices.get_invoice(&id).await.unwrap();
    edited.items = vec![LineItem::new("Revised", dec!(450), dec!(1))];
    edited.created_at = None;
    let saved = ctx.invoices.save_invoice(edited).await.unwrap();

    assert_eq!(saved.status, InvoiceStatus::Closed);
    assert_eq!(saved.total_amount, dec!(450));
    assert_eq!(saved.created_at, Some(created));
    assert!(saved.updated_at.unwrap() > created);
}

#[tokio::test]
async fn test_update_of_unknown_invoice_is_not_found() {
    let ctx = TestContext::new();
    let mut invoice = invoice_for("client-1", "Rose Corner", dec!(100));
    invoice.id = Some("ghost".to_string());

    let result = ctx.invoices.save_invoice(invoice).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_negative_received_is_rejected_on_save() {
    let ctx = TestContext::new();
    let mut invoice = invoice_for("client-1", "Rose Corner", dec!(100));
    invoice.received_amount = dec!(-1);

    let result = ctx.invoices.save_invoice(invoice).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_duplicate_preserves_received_and_rederives_status() {
    let ctx = TestContext::new();
    let mut source = stored_invoice("client-1", "Rose Corner", dec!(1000), utc(2025, 2, 1));
    source.due_date = NaiveDate::from_ymd_opt(2025, 3, 1);
    let id = ctx.invoice_repo.seed(source);
    ctx.invoices.record_payment(&id, dec!(250)).await.unwrap();
    ctx.invoices.close(&id).await.unwrap();

    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    let copy = ctx.invoices.duplicate(&id, today).await.unwrap();

    assert_eq!(copy.id, None);
    assert_eq!(copy.number, "INV001-COPY");
    assert_eq!(copy.issue_date, Some(today));
    assert_eq!(copy.due_date, None);
    assert_eq!(copy.received_amount, dec!(250));
    assert_eq!(copy.status, InvoiceStatus::Partial);
    assert_eq!(copy.created_at, None);
    assert_eq!(ctx.invoice_repo.count(), 1);

    let saved = ctx.invoices.save_invoice(copy).await.unwrap();
    assert_ne!(saved.id.as_deref(), Some(id.as_str()));
    assert_eq!(ctx.invoice_repo.count(), 2);
}

#[tokio::test]
async fn test_recent_invoices_newest_first_with_default_limit() {
    let ctx = TestContext::new();
    let start = utc(2025, 1, 1);
    for day in 0..12 {
        ctx.invoice_repo.seed(stored_invoice(
            "client-1",
            "Rose Corner",
            dec!(100),
            start + Duration::days(day),
        ));
    }

    let recent = ctx.invoices.list_recent(None).await.unwrap();
    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0].created_at, Some(start + Duration::days(11)));
    assert!(recent
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));

    let three = ctx.invoices.list_recent(Some(3)).await.unwrap();
    assert_eq!(three.len(), 3);
}

#[tokio::test]
async fn test_client_invoices_newest_first() {
    let ctx = TestContext::new();
    ctx.invoice_repo
        .seed(stored_invoice("client-1", "Rose Corner", dec!(1), utc(2025, 1, 1)));
    ctx.invoice_repo
        .seed(stored_invoice("client-1", "Rose Corner", dec!(2), utc(2025, 3, 1)));
    ctx.invoice_repo
        .seed(stored_invoice("client-2", "Blue Mart", dec!(3), utc(2025, 2, 1)));

    let invoices = ctx.invoices.list_by_client("client-1").await.unwrap();

    let totals: Vec<_> = invoices.iter().map(|i| i.total_amount).collect();
    assert_eq!(totals, vec![dec!(2), dec!(1)]);

    let blank = ctx.invoices.list_by_client("  ").await;
    assert!(matches!(blank, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_delete_is_permanent() {
    let ctx = TestContext::new();
    let id = ctx
        .invoice_repo
        .seed(stored_invoice("client-1", "Rose Corner", dec!(10), utc(2025, 1, 1)));

    ctx.invoices.delete_invoice(&id).await.unwrap();

    assert!(matches!(
        ctx.invoices.get_invoice(&id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        ctx.invoices.delete_invoice(&id).await,
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn test_zero_total_invoice_counts_as_paid() {
    let mut invoice = Invoice::new("client-1", "Rose Corner");
    PaymentStateReconciler::reconcile(&mut invoice).unwrap();

    assert_eq!(invoice.status, InvoiceStatus::Paid);
    assert!(invoice.is_fully_paid);
}

#[tokio::test]
async fn test_pay_in_full_then_resave_stays_paid_at_full_precision() {
    let ctx = TestContext::new();
    let mut invoice = invoice_for("client-1", "Rose Corner", dec!(0.333));
    invoice.items = vec![LineItem::new("Tiny", dec!(0.333), dec!(3))];
    invoice.tax = billbook::modules::taxes::TaxSetting::new(true, dec!(7));
    let saved = ctx.invoices.save_invoice(invoice).await.unwrap();
    let id = saved.id.clone().unwrap();
    assert_eq!(saved.total_amount, dec!(1.06893));

    let paid = ctx.invoices.pay_in_full(&id).await.unwrap();
    assert_eq!(paid.received_amount, dec!(1.06893));
    assert_eq!(paid.status, InvoiceStatus::Paid);

    let unchanged = ctx.invoices.get_invoice(&id).await.unwrap();
    let resaved = ctx.invoices.save_invoice(unchanged).await.unwrap();

    assert_eq!(resaved.total_amount, dec!(1.06893));
    assert_eq!(resaved.status, InvoiceStatus::Paid);
    assert!(resaved.is_fully_paid);
}
