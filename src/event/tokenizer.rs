/// Return the text strictly between the first `start` token and the next
/// `end` token after it.
///
/// A missing delimiter is a normal "no value" result and yields an empty
/// string.
pub fn extract<'a>(text: &'a str, start: &str, end: &str) -> &'a str {
    let Some(start_index) = text.find(start) else {
        return "";
    };
    let value_start = start_index + start.len();
    let rest = &text[value_start..];

    match rest.find(end) {
        Some(end_index) => &rest[..end_index],
        None => "",
    }
}
