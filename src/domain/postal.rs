/// Split a 9-digit postal code of the form `"NNNNN-NNNN"` into its 5-digit
/// code and 4-digit extension.
///
/// A bare code without an extension yields `(code, None)`; the caller must
/// then omit the ZIP4 field entirely rather than emit an empty placeholder.
/// Anything that does not match the `NNNNN-NNNN` shape passes through
/// unchanged — format validation is the remote service's job, not ours.
pub fn split_postal_code(value: &str) -> (&str, Option<&str>) {
    match value.split_once('-') {
        Some((code, extension))
            if code.len() == 5
                && extension.len() == 4
                && code.bytes().all(|b| b.is_ascii_digit())
                && extension.bytes().all(|b| b.is_ascii_digit()) =>
        {
            (code, Some(extension))
        }
        _ => (value, None),
    }
}
