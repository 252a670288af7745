use quick_xml::Writer;

use crate::domain::{Options, PassPhraseResult};
use crate::transport::document::{Element, XmlError};
use crate::transport::{finish_xml, write_text_element};

/// Literal prefix of the synthesized `RequestID` for this operation.
pub const CHANGE_PASS_PHRASE_REQUEST_ID_PREFIX: &str = "CPP";

/// Build the `ChangePassPhraseRequest` document.
///
/// `request_id` is the full correlation key (prefix + timestamp token); the
/// caller synthesizes it so the value is pinnable in tests.
pub fn encode_change_pass_phrase_request(
    new_pass_phrase: &str,
    options: &Options,
    request_id: &str,
) -> Result<String, XmlError> {
    let mut buf = Vec::with_capacity(256);
    let mut writer = Writer::new(&mut buf);
    writer
        .create_element("ChangePassPhraseRequest")
        .write_inner_content(|w| {
            write_text_element(
                w,
                "RequesterID",
                &options.text("RequesterID").unwrap_or_default(),
            )?;
            write_text_element(w, "RequestID", request_id)?;
            w.create_element("CertifiedIntermediary")
                .write_inner_content(|ci| {
                    write_text_element(
                        ci,
                        "AccountID",
                        &options.text("AccountID").unwrap_or_default(),
                    )?;
                    write_text_element(
                        ci,
                        "PassPhrase",
                        &options.text("PassPhrase").unwrap_or_default(),
                    )?;
                    Ok(())
                })?;
            write_text_element(w, "NewPassPhrase", new_pass_phrase)?;
            Ok(())
        })?;

    finish_xml(buf)
}

/// Extract a [`PassPhraseResult`] from a raw response body.
///
/// Success means top-level `Status == "0"`; any other status is a
/// remote-reported failure carrying `ErrorMessage`.
pub fn decode_change_pass_phrase_response(body: &str) -> Result<PassPhraseResult, XmlError> {
    decode_status_zero_response(body, "ChangePassPhraseRequestResponse").map(
        |(success, error_message)| PassPhraseResult {
            success,
            error_message,
            response_body: body.to_owned(),
        },
    )
}

/// Shared rule for the two `Status == "0"` response shapes.
pub(crate) fn decode_status_zero_response(
    body: &str,
    root_name: &str,
) -> Result<(bool, Option<String>), XmlError> {
    let doc = Element::parse(body)?;
    let root = doc.descendant(root_name);
    let status = root.and_then(|root| root.descendant_text("Status"));
    let success = status.as_deref() == Some("0");
    let error_message = if success {
        None
    } else {
        root.and_then(|root| root.descendant_text("ErrorMessage"))
    };
    Ok((success, error_message))
}
