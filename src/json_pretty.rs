use serde::Serialize;

/// Render a view model as indented JSON.
pub fn pretty<T: Serialize + ?Sized>(v: &T) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| "{}".to_string())
}

/// Render JSON with truncation for massive payloads (blocks with many
/// transactions, raw tx payloads).
///
/// Output is cut at the last complete line before `max_bytes` and gets a
/// "... (truncated)" footer.
pub fn pretty_safe<T: Serialize + ?Sized>(v: &T, max_bytes: usize) -> String {
    let formatted = pretty(v);
    if formatted.len() <= max_bytes {
        return formatted;
    }

    let mut cut = max_bytes;
    while !formatted.is_char_boundary(cut) {
        cut -= 1;
    }
    let clean = match formatted[..cut].rfind('\n') {
        Some(i) => &formatted[..i],
        None => &formatted[..cut],
    };

    format!(
        "{}\n\n... (truncated - {} total bytes, showing first {} KB)\n",
        clean,
        formatted.len(),
        max_bytes / 1024
    )
}
