//! Filename extraction from `Content-Disposition` style header values.
//!
//! Servers suggest a save-name for a response body through a header such as
//!
//! ```text
//! Content-Disposition: attachment; filename="report.pdf"
//! Content-Disposition: attachment; filename*=UTF-8''r%C3%A9sum%C3%A9.pdf
//! ```
//!
//! [`extract_filename`] pulls that name out, handling the quoted, charset
//! prefixed and percent-encoded forms, and falls back to a caller-supplied
//! name whenever the header is absent or unusable. The function is total:
//! it never fails and never returns an empty string.

use std::borrow::Cow;

/// Extract a filename from a disposition-style header value.
///
/// Returns `fallback` when `header` is `None`, carries no `filename`
/// parameter, or the extracted value is empty after stripping.
pub fn extract_filename(header: Option<&str>, fallback: &str) -> String {
    let Some(header) = header else {
        return fallback.to_string();
    };

    let Some(raw) = filename_param(header) else {
        return fallback.to_string();
    };

    let name = strip_quotes(raw.trim());
    let name = strip_charset_prefix(name);
    let name = percent_decode(name);
    let name = name.trim();

    if name.is_empty() {
        fallback.to_string()
    } else {
        name.to_string()
    }
}

/// Locate the `filename` / `filename*` parameter value, up to the next `;`.
/// The extended `filename*` form wins when both are present.
fn filename_param(header: &str) -> Option<&str> {
    let mut plain = None;
    for param in header.split(';') {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.eq_ignore_ascii_case("filename*") {
            return Some(value);
        }
        if key.eq_ignore_ascii_case("filename") && plain.is_none() {
            plain = Some(value);
        }
    }
    plain
}

fn strip_quotes(value: &str) -> &str {
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .unwrap_or(value)
}

/// Strip a leading RFC 5987 charset prefix such as `UTF-8''`.
fn strip_charset_prefix(value: &str) -> &str {
    match (value.get(..5), value.get(5..)) {
        (Some(prefix), Some(rest)) if prefix.eq_ignore_ascii_case("UTF-8") => {
            rest.strip_prefix("''").unwrap_or(value)
        }
        _ => value,
    }
}

/// Percent-decode when the value looks encoded. Invalid sequences are kept
/// verbatim rather than turned into an error.
fn percent_decode(value: &str) -> Cow<'_, str> {
    if !value.contains('%') {
        return Cow::Borrowed(value);
    }
    match urlencoding::decode(value) {
        Ok(decoded) => decoded,
        Err(_) => Cow::Borrowed(value),
    }
}
