use quick_xml::Writer;

use crate::domain::{Options, RefundResult};
use crate::transport::document::{Element, XmlError};
use crate::transport::{finish_xml, write_optional_element, write_text_element};

/// Build the `RefundRequest` document; the tracking number rides under
/// `RefundList/PICNumber`.
pub fn encode_refund_request(
    tracking_number: &str,
    options: &Options,
) -> Result<String, XmlError> {
    let mut buf = Vec::with_capacity(256);
    let mut writer = Writer::new(&mut buf);
    writer
        .create_element("RefundRequest")
        .write_inner_content(|w| {
            write_text_element(
                w,
                "AccountID",
                &options.text("AccountID").unwrap_or_default(),
            )?;
            write_text_element(
                w,
                "PassPhrase",
                &options.text("PassPhrase").unwrap_or_default(),
            )?;
            write_optional_element(w, "Test", options.text("Test").as_deref())?;
            w.create_element("RefundList").write_inner_content(|list| {
                write_text_element(list, "PICNumber", tracking_number)
            })?;
            Ok(())
        })?;

    finish_xml(buf)
}

/// Extract a [`RefundResult`] from a raw response body.
///
/// A top-level `ErrorMsg` (login failure) fails the whole request.
/// Otherwise the first `RefundList/PICNumber` entry decides: approval is
/// `IsApproved == "YES"`, and the entry's nested `ErrorMsg` is the denial
/// reason. The entry is mixed content — the tracking number is its text.
pub fn decode_refund_response(body: &str) -> Result<RefundResult, XmlError> {
    let doc = Element::parse(body)?;
    let root = doc.descendant("RefundResponse");

    let top_error = root.and_then(|root| {
        root.child("ErrorMsg")
            .map(Element::text)
            .filter(|text| !text.is_empty())
            .map(str::to_owned)
    });
    let form_number = root.and_then(|root| {
        root.child("FormNumber")
            .map(Element::text)
            .filter(|text| !text.is_empty())
            .map(str::to_owned)
    });
    let entry = root.and_then(|root| root.path(&["RefundList", "PICNumber"]));
    let approved = entry
        .and_then(|entry| entry.descendant_text("IsApproved"))
        .is_some_and(|text| text == "YES");

    let success = top_error.is_none() && approved;
    let error_message = if let Some(message) = top_error {
        Some(message)
    } else if success {
        None
    } else {
        entry.and_then(|entry| entry.descendant_text("ErrorMsg"))
    };

    Ok(RefundResult {
        success,
        form_number,
        error_message,
        response_body: body.to_owned(),
    })
}
