use quick_xml::Writer;

use crate::domain::{Options, StatusResult};
use crate::transport::document::{Element, XmlError};
use crate::transport::{finish_xml, write_optional_element, write_text_element};

/// Build the `StatusRequest` document; the tracking number rides under
/// `StatusList/PICNumber`.
pub fn encode_status_request(
    tracking_number: &str,
    options: &Options,
) -> Result<String, XmlError> {
    let mut buf = Vec::with_capacity(256);
    let mut writer = Writer::new(&mut buf);
    writer
        .create_element("StatusRequest")
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
            w.create_element("StatusList").write_inner_content(|list| {
                write_text_element(list, "PICNumber", tracking_number)
            })?;
            Ok(())
        })?;

    finish_xml(buf)
}

/// Extract a [`StatusResult`] from a raw response body.
///
/// The service answers in two shapes: a `StatusResponse` document with the
/// status nested under `StatusList/PICNumber`, or bare `Status`/`StatusCode`
/// sibling elements. Both normalize through the same document tree; the
/// first element of each name wins (`StatusBreakdown` entries are named
/// `Status_1`..`Status_7` and never collide).
///
/// Success needs a non-empty status, a code other than `"-1"` (tracking
/// number not found), and no `ErrorMsg`; when the code is `"-1"` the literal
/// status text doubles as the error message.
pub fn decode_status_response(body: &str) -> Result<StatusResult, XmlError> {
    let doc = Element::parse(body)?;
    let status = doc.descendant_text("Status");
    let status_code = doc.descendant_text("StatusCode");
    let error_msg = doc.descendant_text("ErrorMsg");

    let not_found = status_code.as_deref() == Some("-1");
    let success = status.is_some() && !not_found && error_msg.is_none();
    let error_message = if success {
        None
    } else if error_msg.is_some() {
        error_msg
    } else if not_found {
        status.clone()
    } else {
        None
    };

    Ok(StatusResult {
        success,
        status,
        status_code,
        error_message,
        response_body: body.to_owned(),
    })
}
