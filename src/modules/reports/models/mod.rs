mod outstanding_report;

pub use outstanding_report::{ClientTotals, OutstandingReport, ReportPeriod, UNKNOWN_CLIENT};
