/// Converts full-width digits (`０`-`９`) to ASCII digits.
///
/// # Example
/// ```
/// use covid_data::models::text_utils::zen_digit_to_han;
///
/// assert_eq!(zen_digit_to_han("今日は５月６日です"), "今日は5月6日です");
/// ```
pub fn zen_digit_to_han(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            _ => c,
        })
        .collect()
}

/// Removes ASCII and ideographic (`　`) spaces.
pub fn strip_space(text: &str) -> String {
    text.chars().filter(|c| *c != ' ' && *c != '\u{3000}').collect()
}
