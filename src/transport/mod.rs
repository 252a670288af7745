//! Transport layer: the XML wire shapes of the label server, one module per
//! operation, plus the shared parsed-document abstraction for responses.

mod document;
mod label;
mod pass_phrase;
mod pickup;
mod recredit;
mod refund;
mod status;

pub use document::{Element, XmlError};
pub use label::{decode_label_response, encode_label_request};
pub use pass_phrase::{
    CHANGE_PASS_PHRASE_REQUEST_ID_PREFIX, decode_change_pass_phrase_response,
    encode_change_pass_phrase_request,
};
pub use pickup::{decode_carrier_pickup_response, encode_carrier_pickup_request};
pub use recredit::{
    BUY_POSTAGE_REQUEST_ID_PREFIX, decode_recredit_response, encode_recredit_request,
};
pub use refund::{decode_refund_response, encode_refund_request};
pub use status::{decode_status_response, encode_status_request};

use std::io::{self, Write};

use quick_xml::Writer;
use quick_xml::events::BytesText;

/// Timestamp token appended to synthesized `RequestID` values.
///
/// Wall-clock milliseconds; the service treats the id as a correlation key,
/// not a uniqueness guarantee, so a monotonic clock is not required.
pub(crate) fn request_token() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        .to_string()
}

/// Write a simple `<tag>text</tag>` element.
pub(crate) fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    text: &str,
) -> io::Result<()> {
    writer
        .create_element(tag)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

/// Write `<tag>text</tag>` only if the value is `Some`.
pub(crate) fn write_optional_element<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: Option<&str>,
) -> io::Result<()> {
    if let Some(text) = value {
        write_text_element(writer, tag, text)?;
    }
    Ok(())
}

/// Finish a written buffer as a UTF-8 string.
pub(crate) fn finish_xml(buf: Vec<u8>) -> Result<String, XmlError> {
    String::from_utf8(buf).map_err(|err| XmlError::Parse(err.to_string()))
}
