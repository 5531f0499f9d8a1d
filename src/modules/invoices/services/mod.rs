pub mod invoice_calculator;
pub mod invoice_service;
pub mod payment_reconciler;

pub use invoice_calculator::InvoiceCalculator;
pub use invoice_service::InvoiceService;
pub use payment_reconciler::{
    DisplayStatus, PaymentEvent, PaymentState, PaymentStateReconciler, DISPLAY_PAID_TOLERANCE,
};
