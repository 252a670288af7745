use quick_xml::Writer;

use crate::domain::{Label, Options, redact_image_data, split_postal_code};
use crate::transport::document::{Element, XmlError};
use crate::transport::{finish_xml, write_text_element};

/// Options lifted onto the `LabelRequest` root element as attributes
/// instead of being serialized as child elements.
const ROOT_ATTRIBUTE_KEYS: [&str; 4] = ["LabelType", "Test", "LabelSize", "ImageFormat"];

/// Build the `LabelRequest` document from merged options.
///
/// Root attributes come from [`ROOT_ATTRIBUTE_KEYS`] (`LabelType` defaults
/// to `"Default"`); 9-digit postal codes split into code + ZIP4 fields;
/// `InsuredMail` becomes a `<Services>` attribute; `Jewelry` and null-valued
/// options are never serialized. Everything else passes through as a child
/// element under its verbatim key.
pub fn encode_label_request(options: &Options) -> Result<String, XmlError> {
    let mut attributes = vec![(
        "LabelType".to_owned(),
        options
            .text("LabelType")
            .unwrap_or_else(|| "Default".to_owned()),
    )];
    for key in ["Test", "LabelSize", "ImageFormat"] {
        if let Some(value) = options.text(key) {
            attributes.push((key.to_owned(), value));
        }
    }

    let mut buf = Vec::with_capacity(512);
    let mut writer = Writer::new(&mut buf);
    writer
        .create_element("LabelRequest")
        .with_attributes(
            attributes
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str())),
        )
        .write_inner_content(|w| {
            for (key, value) in options.iter() {
                if value.is_null()
                    || key == "Jewelry"
                    || key == "InsuredMail"
                    || ROOT_ATTRIBUTE_KEYS.contains(&key.as_str())
                {
                    continue;
                }
                match key.as_str() {
                    "ToPostalCode" | "ReturnPostalCode" => {
                        let text = value.to_string();
                        let (code, extension) = split_postal_code(&text);
                        write_text_element(w, key, code)?;
                        if let Some(extension) = extension {
                            let zip4 = if key == "ToPostalCode" {
                                "ToZIP4"
                            } else {
                                "ReturnZIP4"
                            };
                            write_text_element(w, zip4, extension)?;
                        }
                    }
                    _ => write_text_element(w, key, &value.to_string())?,
                }
            }
            if let Some(insured_mail) = options.text("InsuredMail") {
                w.create_element("Services")
                    .with_attribute(("InsuredMail", insured_mail.as_str()))
                    .write_empty()?;
            }
            Ok(())
        })?;

    finish_xml(buf)
}

/// Build a [`Label`] from a raw `LabelRequestResponse` body.
///
/// Field population is an enumerated table from remote field name to local
/// attribute: unknown fields are ignored (forward compatible), namespace
/// markers are skipped, and `Base64LabelImage` lands in `image`. The stored
/// body has its image payload redacted; the outgoing request body and URL
/// are recorded verbatim for traceability.
pub fn decode_label_response(
    request_url: &str,
    request_body: &str,
    body: &str,
) -> Result<Label, XmlError> {
    let doc = Element::parse(body)?;
    let mut label = Label {
        request_url: Some(request_url.to_owned()),
        request_body: Some(request_body.to_owned()),
        response_body: redact_image_data(body),
        ..Label::default()
    };

    if let Some(root) = doc.descendant("LabelRequestResponse") {
        for field in root.children() {
            if field.name().contains("xmlns") {
                continue;
            }
            let text = field.text();
            match field.name() {
                "Base64LabelImage" => label.image = non_empty(text),
                "Status" => label.status = text.parse().ok(),
                "ErrorMessage" => label.error_message = non_empty(text),
                "TrackingNumber" => label.tracking_number = non_empty(text),
                "PIC" => label.pic = non_empty(text),
                "FinalPostage" => label.final_postage = text.parse().ok(),
                "TransactionID" => label.transaction_id = text.parse().ok(),
                "TransactionDateTime" => label.transaction_date_time = non_empty(text),
                "PostmarkDate" => label.postmark_date = non_empty(text),
                "PostageBalance" => label.postage_balance = text.parse().ok(),
                "CostCenter" => label.cost_center = text.parse().ok(),
                "ReferenceID" => label.reference_id = non_empty(text),
                "ReferenceID2" => label.reference_id2 = non_empty(text),
                "ReferenceID3" => label.reference_id3 = non_empty(text),
                "ReferenceID4" => label.reference_id4 = non_empty(text),
                "RequesterID" => label.requester_id = non_empty(text),
                _ => {}
            }
        }
    }

    Ok(label)
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::OptionValue;

    use super::*;

    fn parsed(xml: &str) -> Element {
        Element::parse(xml).unwrap()
    }

    #[test]
    fn root_carries_label_type_default_and_passed_attributes() {
        let xml = encode_label_request(&Options::new()).unwrap();
        let root = parsed(&xml);
        let request = root.child("LabelRequest").unwrap();
        assert_eq!(request.attribute("LabelType"), Some("Default"));
        assert_eq!(request.attribute("Test"), None);

        let options = Options::new()
            .with("LabelType", "Priority")
            .with("Test", "YES")
            .with("LabelSize", "6x4")
            .with("ImageFormat", "PNG");
        let xml = encode_label_request(&options).unwrap();
        let request = parsed(&xml);
        let request = request.child("LabelRequest").unwrap();
        assert_eq!(request.attribute("LabelType"), Some("Priority"));
        assert_eq!(request.attribute("Test"), Some("YES"));
        assert_eq!(request.attribute("LabelSize"), Some("6x4"));
        assert_eq!(request.attribute("ImageFormat"), Some("PNG"));
        // Root attributes never double as child elements.
        assert!(request.child("LabelType").is_none());
        assert!(request.child("Test").is_none());
    }

    #[test]
    fn nine_digit_zip_splits_into_two_fields() {
        let options = Options::new().with("ToPostalCode", "12345-6789");
        let xml = encode_label_request(&options).unwrap();
        let doc = parsed(&xml);
        let request = doc.child("LabelRequest").unwrap();
        assert_eq!(request.child("ToPostalCode").unwrap().text(), "12345");
        assert_eq!(request.child("ToZIP4").unwrap().text(), "6789");
    }

    #[test]
    fn bare_zip_emits_no_extension_field() {
        let options = Options::new().with("ToPostalCode", "12345");
        let xml = encode_label_request(&options).unwrap();
        let doc = parsed(&xml);
        let request = doc.child("LabelRequest").unwrap();
        assert_eq!(request.child("ToPostalCode").unwrap().text(), "12345");
        assert!(request.child("ToZIP4").is_none());
    }

    #[test]
    fn return_postal_code_splits_too() {
        let options = Options::new().with("ReturnPostalCode", "54321-9876");
        let xml = encode_label_request(&options).unwrap();
        let doc = parsed(&xml);
        let request = doc.child("LabelRequest").unwrap();
        assert_eq!(request.child("ReturnPostalCode").unwrap().text(), "54321");
        assert_eq!(request.child("ReturnZIP4").unwrap().text(), "9876");
    }

    #[test]
    fn insured_mail_becomes_a_services_attribute() {
        for value in ["OFF", "ON", "UspsOnline", "Endicia"] {
            let options = Options::new().with("InsuredMail", value);
            let xml = encode_label_request(&options).unwrap();
            let doc = parsed(&xml);
            let request = doc.child("LabelRequest").unwrap();
            assert_eq!(
                request.child("Services").unwrap().attribute("InsuredMail"),
                Some(value)
            );
            assert!(request.child("InsuredMail").is_none());
        }
    }

    #[test]
    fn jewelry_never_appears_in_the_request() {
        let options = Options::new()
            .with("Jewelry", true)
            .with("InsuredMail", OptionValue::Null);
        let xml = encode_label_request(&options).unwrap();
        assert!(!xml.contains("Jewelry"));
        assert!(!xml.contains("Services"));
    }

    #[test]
    fn null_options_are_suppressed() {
        let options = Options::new()
            .with("MailClass", "First")
            .with("Stealth", OptionValue::Null);
        let xml = encode_label_request(&options).unwrap();
        let doc = parsed(&xml);
        let request = doc.child("LabelRequest").unwrap();
        assert_eq!(request.child("MailClass").unwrap().text(), "First");
        assert!(request.child("Stealth").is_none());
    }

    const LABEL_RESPONSE: &str = r#"<LabelRequestResponse xmlns="www.envmgr.com/LabelService">
        <Status>123</Status>
        <ErrorMessage>If there's an error it would be here</ErrorMessage>
        <Base64LabelImage>dGhlIGxhYmVsIGltYWdl</Base64LabelImage>
        <TrackingNumber>abc123</TrackingNumber>
        <PIC>abcd1234</PIC>
        <FinalPostage>1.2</FinalPostage>
        <TransactionID>1234</TransactionID>
        <TransactionDateTime>20110102030405</TransactionDateTime>
        <CostCenter>12345</CostCenter>
        <ReferenceID>abcde12345</ReferenceID>
        <PostmarkDate>20110102</PostmarkDate>
        <PostageBalance>3.4</PostageBalance>
        <RequesterID>abcd</RequesterID>
        <ReferenceID2>ref2</ReferenceID2>
        <ReferenceID3>ref3</ReferenceID3>
        <ReferenceID4>ref4</ReferenceID4>
        <SomeFutureField>ignored</SomeFutureField>
    </LabelRequestResponse>"#;

    #[test]
    fn label_fields_populate_from_the_field_table() {
        let label = decode_label_response("http://example.invalid", "body", LABEL_RESPONSE).unwrap();
        assert_eq!(label.status, Some(123));
        assert_eq!(
            label.error_message.as_deref(),
            Some("If there's an error it would be here")
        );
        assert_eq!(label.image.as_deref(), Some("dGhlIGxhYmVsIGltYWdl"));
        assert_eq!(label.tracking_number.as_deref(), Some("abc123"));
        assert_eq!(label.pic.as_deref(), Some("abcd1234"));
        assert_eq!(label.final_postage, Some(1.2));
        assert_eq!(label.transaction_id, Some(1234));
        assert_eq!(label.transaction_date_time.as_deref(), Some("20110102030405"));
        assert_eq!(label.cost_center, Some(12345));
        assert_eq!(label.reference_id.as_deref(), Some("abcde12345"));
        assert_eq!(label.postmark_date.as_deref(), Some("20110102"));
        assert_eq!(label.postage_balance, Some(3.4));
        assert_eq!(label.requester_id.as_deref(), Some("abcd"));
        assert_eq!(label.reference_id2.as_deref(), Some("ref2"));
        assert_eq!(label.reference_id3.as_deref(), Some("ref3"));
        assert_eq!(label.reference_id4.as_deref(), Some("ref4"));
    }

    #[test]
    fn response_body_is_stored_with_image_redacted() {
        let label = decode_label_response("http://example.invalid", "body", LABEL_RESPONSE).unwrap();
        assert!(
            label
                .response_body
                .contains("<Base64LabelImage>[data]</Base64LabelImage>")
        );
        assert!(!label.response_body.contains("dGhlIGxhYmVsIGltYWdl"));
        // The typed field keeps the image.
        assert_eq!(label.image.as_deref(), Some("dGhlIGxhYmVsIGltYWdl"));
    }

    #[test]
    fn request_url_and_body_are_recorded() {
        let label = decode_label_response(
            "https://example.invalid/GetPostageLabelXML",
            "labelRequestXML=...",
            LABEL_RESPONSE,
        )
        .unwrap();
        assert_eq!(
            label.request_url.as_deref(),
            Some("https://example.invalid/GetPostageLabelXML")
        );
        assert_eq!(label.request_body.as_deref(), Some("labelRequestXML=..."));
    }

    #[test]
    fn bodies_without_a_label_response_yield_an_empty_label() {
        let label = decode_label_response("url", "body", "the response body").unwrap();
        assert_eq!(label.status, None);
        assert_eq!(label.image, None);
        assert_eq!(label.response_body, "the response body");
    }
}
