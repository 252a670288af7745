use quick_xml::Writer;

use crate::domain::{CarrierPickupResult, Options};
use crate::transport::document::{Element, XmlError};
use crate::transport::{finish_xml, write_optional_element, write_text_element};

/// Address-override fields, serialized in this order when supplied.
const ADDRESS_OVERRIDE_KEYS: [&str; 11] = [
    "FirstName",
    "LastName",
    "CompanyName",
    "SuiteOrApt",
    "Address",
    "City",
    "State",
    "ZIP5",
    "ZIP4",
    "Phone",
    "Extension",
];

/// Build the `CarrierPickupRequest` document.
///
/// `PackageLocation` always comes from the positional argument. When any
/// address-override field is supplied, `UseAddressOnFile` is emitted as well
/// (defaulting to `"N"` if the caller did not set it) followed by the
/// supplied fields; the tracking number rides under `PickupList/PICNumber`.
pub fn encode_carrier_pickup_request(
    tracking_number: &str,
    package_location: &str,
    options: &Options,
) -> Result<String, XmlError> {
    let overriding_address = ADDRESS_OVERRIDE_KEYS
        .iter()
        .any(|key| options.text(key).is_some());
    let use_address_on_file = if overriding_address || options.text("UseAddressOnFile").is_some() {
        Some(options.text("UseAddressOnFile").unwrap_or_else(|| "N".to_owned()))
    } else {
        None
    };

    let mut buf = Vec::with_capacity(256);
    let mut writer = Writer::new(&mut buf);
    writer
        .create_element("CarrierPickupRequest")
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
            write_optional_element(w, "UseAddressOnFile", use_address_on_file.as_deref())?;
            for key in ADDRESS_OVERRIDE_KEYS {
                write_optional_element(w, key, options.text(key).as_deref())?;
            }
            write_text_element(w, "PackageLocation", package_location)?;
            write_optional_element(
                w,
                "SpecialInstructions",
                options.text("SpecialInstructions").as_deref(),
            )?;
            w.create_element("PickupList").write_inner_content(|list| {
                write_text_element(list, "PICNumber", tracking_number)
            })?;
            Ok(())
        })?;

    finish_xml(buf)
}

/// Extract a [`CarrierPickupResult`] from a raw response body.
///
/// Failure comes in two shapes: a top-level `ErrorMsg`, or a nested
/// `Response/Error` block carrying `Number` and `Description`. Otherwise
/// the `Response` block holds the scheduled pickup details.
pub fn decode_carrier_pickup_response(body: &str) -> Result<CarrierPickupResult, XmlError> {
    let doc = Element::parse(body)?;
    let root = doc.descendant("CarrierPickupRequestResponse");

    let error_msg = root.and_then(|root| {
        root.child("ErrorMsg")
            .map(Element::text)
            .filter(|text| !text.is_empty())
            .map(str::to_owned)
    });
    let response = root.and_then(|root| root.child("Response"));
    let error_block = response.and_then(|response| response.child("Error"));

    if let Some(message) = error_msg {
        return Ok(CarrierPickupResult {
            success: false,
            day_of_week: None,
            date: None,
            carrier_route: None,
            confirmation_number: None,
            error_code: None,
            error_description: None,
            error_message: Some(message),
            response_body: body.to_owned(),
        });
    }

    if let Some(error) = error_block {
        let description = error.descendant_text("Description");
        return Ok(CarrierPickupResult {
            success: false,
            day_of_week: None,
            date: None,
            carrier_route: None,
            confirmation_number: None,
            error_code: error.descendant_text("Number"),
            error_description: description.clone(),
            error_message: description,
            response_body: body.to_owned(),
        });
    }

    Ok(CarrierPickupResult {
        success: true,
        day_of_week: response.and_then(|r| r.descendant_text("DayOfWeek")),
        date: response.and_then(|r| r.descendant_text("Date")),
        carrier_route: response.and_then(|r| r.descendant_text("CarrierRoute")),
        confirmation_number: response.and_then(|r| r.descendant_text("ConfirmationNumber")),
        error_code: None,
        error_description: None,
        error_message: None,
        response_body: body.to_owned(),
    })
}
