mod advance;
mod amounts;
mod invoice;
mod line_item;

pub use advance::{AdvanceBase, AdvanceSetting, DEFAULT_ADVANCE_PERCENTAGE};
pub use amounts::{Amounts, FormattedAmounts};
pub use invoice::{
    CalculationRequest, CalculationResponse, Invoice, InvoiceResponse, InvoiceStatus,
    DUPLICATE_NUMBER_SUFFIX,
};
pub use line_item::{LineItem, LineItemInput};
pub(crate) use line_item::raw_field;
