/// Placeholder substituted for the base64 image payload in a stored
/// response body.
pub const IMAGE_DATA_PLACEHOLDER: &str = "[data]";

const IMAGE_OPEN_TAG: &str = "<Base64LabelImage>";
const IMAGE_CLOSE_TAG: &str = "</Base64LabelImage>";

#[derive(Debug, Clone, Default, PartialEq)]
/// One purchased label, built from a single `LabelRequestResponse`.
///
/// Immutable once constructed; no shared ownership. The image bytes live in
/// [`Label::image`] only — `response_body` keeps the raw response with the
/// embedded base64 payload replaced by `[data]` so it stays readable in
/// logs, and `request_body`/`request_url` record the exact outgoing call
/// for traceability.
pub struct Label {
    /// Base64 label image, renamed from the service's `Base64LabelImage`.
    pub image: Option<String>,
    pub status: Option<i32>,
    pub error_message: Option<String>,
    pub tracking_number: Option<String>,
    pub pic: Option<String>,
    pub final_postage: Option<f64>,
    pub transaction_id: Option<i64>,
    pub transaction_date_time: Option<String>,
    pub postmark_date: Option<String>,
    pub postage_balance: Option<f64>,
    pub cost_center: Option<i64>,
    pub reference_id: Option<String>,
    pub reference_id2: Option<String>,
    pub reference_id3: Option<String>,
    pub reference_id4: Option<String>,
    pub requester_id: Option<String>,
    pub request_body: Option<String>,
    pub request_url: Option<String>,
    /// Raw response text with the image payload redacted.
    pub response_body: String,
}

/// Replace the embedded base64 image payload with [`IMAGE_DATA_PLACEHOLDER`].
///
/// Purely cosmetic: the image stays available through the typed `image`
/// field, not by re-parsing the stored body.
pub fn redact_image_data(body: &str) -> String {
    let Some(start) = body.find(IMAGE_OPEN_TAG) else {
        return body.to_owned();
    };
    let payload_start = start + IMAGE_OPEN_TAG.len();
    let Some(payload_len) = body[payload_start..].find(IMAGE_CLOSE_TAG) else {
        return body.to_owned();
    };

    let mut redacted = String::with_capacity(body.len());
    redacted.push_str(&body[..payload_start]);
    redacted.push_str(IMAGE_DATA_PLACEHOLDER);
    redacted.push_str(&body[payload_start + payload_len..]);
    redacted
}
