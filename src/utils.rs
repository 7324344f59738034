/// Returns the byte offset of the first occurrence of `needle`, ignoring
/// ASCII case.
///
/// Folding only ASCII keeps byte lengths identical, so the offset is valid in
/// the original string.
pub fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }

    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Returns the byte offset of the last occurrence of `needle`, ignoring ASCII
/// case.
pub fn rfind_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return Some(haystack.len());
    }
    if needle.len() > haystack.len() {
        return None;
    }

    haystack
        .as_bytes()
        .windows(needle.len())
        .rposition(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Byte offsets of every non-overlapping occurrence of `needle`.
pub fn match_offsets(haystack: &str, needle: &str, case_sensitive: bool) -> Vec<usize> {
    let mut offsets = Vec::new();
    if needle.is_empty() {
        return offsets;
    }

    let mut from = 0;
    while from <= haystack.len() {
        let rest = &haystack[from..];
        let found = if case_sensitive {
            rest.find(needle)
        } else {
            find_ignore_case(rest, needle)
        };
        let Some(offset) = found else {
            break;
        };
        offsets.push(from + offset);
        from += offset + needle.len();
    }
    offsets
}
