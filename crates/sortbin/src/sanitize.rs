//! Helpers for sanitizing data before it enters tracing span attributes.

/// Reduces a client-supplied upload filename to its final path component.
///
/// Browsers may send full client paths (`C:\Users\me\scan.jpg`); only the
/// name itself is safe to log.
pub fn redact_filename(filename: &str) -> String {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() {
        "<unknown>".to_string()
    } else {
        name.chars().filter(|c| !c.is_control()).collect()
    }
}
