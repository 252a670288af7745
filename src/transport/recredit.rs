use quick_xml::Writer;

use crate::domain::{Options, RecreditResult};
use crate::transport::document::XmlError;
use crate::transport::pass_phrase::decode_status_zero_response;
use crate::transport::{finish_xml, write_text_element};

/// Literal prefix of the synthesized `RequestID` for this operation.
pub const BUY_POSTAGE_REQUEST_ID_PREFIX: &str = "BP";

/// Build the `RecreditRequest` document used to buy postage.
pub fn encode_recredit_request(
    amount: &str,
    options: &Options,
    request_id: &str,
) -> Result<String, XmlError> {
    let mut buf = Vec::with_capacity(256);
    let mut writer = Writer::new(&mut buf);
    writer
        .create_element("RecreditRequest")
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
            write_text_element(w, "RecreditAmount", amount)?;
            Ok(())
        })?;

    finish_xml(buf)
}

/// Extract a [`RecreditResult`]; same `Status == "0"` rule as the
/// pass-phrase operation, different response root.
pub fn decode_recredit_response(body: &str) -> Result<RecreditResult, XmlError> {
    decode_status_zero_response(body, "RecreditRequestResponse").map(
        |(success, error_message)| RecreditResult {
            success,
            error_message,
            response_body: body.to_owned(),
        },
    )
}
