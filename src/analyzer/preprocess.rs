//! Line preprocessing: separating code from trailing comments.

/// Split a raw source line at the first apostrophe into its code part and
/// the comment (apostrophe included).
///
/// Apostrophes inside string literals are not recognized: an apostrophe in a
/// quoted string still starts the comment. Downstream consumers depend on
/// this exact split, so it must not be "fixed" here.
pub fn split_comment(raw: &str) -> (&str, Option<&str>) {
    match raw.find('\'') {
        Some(idx) => (&raw[..idx], Some(&raw[idx..])),
        None => (raw, None),
    }
}

/// The code portion of a raw line, comment stripped.
pub fn code_of(raw: &str) -> &str {
    split_comment(raw).0
}
