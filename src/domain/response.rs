//! Normalized results for the non-label operations.
//!
//! Every result carries `success` and the untouched raw `response_body`;
//! `error_message` is populated exactly when an error condition was
//! detected. Remote-reported failures are surfaced through these structs,
//! never as client errors.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassPhraseResult {
    pub success: bool,
    pub error_message: Option<String>,
    pub response_body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecreditResult {
    pub success: bool,
    pub error_message: Option<String>,
    pub response_body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusResult {
    pub success: bool,
    /// Literal status text from the service, e.g. a delivery narrative.
    pub status: Option<String>,
    /// Service status code; `"-1"` means the tracking number was not found.
    pub status_code: Option<String>,
    pub error_message: Option<String>,
    pub response_body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundResult {
    pub success: bool,
    /// Refund form number, present when a refund was filed.
    pub form_number: Option<String>,
    pub error_message: Option<String>,
    pub response_body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierPickupResult {
    pub success: bool,
    pub day_of_week: Option<String>,
    pub date: Option<String>,
    pub carrier_route: Option<String>,
    pub confirmation_number: Option<String>,
    /// Numeric code from a nested `Response/Error` block.
    pub error_code: Option<String>,
    /// Description from a nested `Response/Error` block.
    pub error_description: Option<String>,
    pub error_message: Option<String>,
    pub response_body: String,
}
