//! HTTP response domain types

mod capture;

pub use capture::{ERROR_STATUS_THRESHOLD, ResponseCapture};
