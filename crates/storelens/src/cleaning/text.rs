//! Text normalization helpers.

/// Title-case a string: a letter is upper-cased when it starts a word (the
/// previous character is not a letter) and lower-cased otherwise.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

/// Returns true if `s` is already in title case.
pub fn is_title_case(s: &str) -> bool {
    title_case(s) == s
}
