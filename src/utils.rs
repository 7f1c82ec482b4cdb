use std::time::Duration;
use unicode_segmentation::UnicodeSegmentation;

/// Shortens `message` to at most `max_width` grapheme clusters, ending it
/// with `…` when something was cut off.
///
/// # Panics
/// Panics if `max_width` is less than 2.
///
/// # Examples
/// ```rust
/// use imgkey_sitemap::utils::truncate_message;
///
/// assert_eq!(truncate_message("Hello World", 6), "Hello…");
/// assert_eq!(truncate_message("Hi", 5), "Hi");
/// ```
pub fn truncate_message(message: &str, max_width: usize) -> String {
    assert!(
        max_width >= 2,
        "max_width must be at least 2 to accommodate the ellipsis"
    );

    let mut graphemes = message.graphemes(true);
    let head: String = graphemes.by_ref().take(max_width - 1).collect();
    match (graphemes.next(), graphemes.next()) {
        (None, _) => head,
        (Some(last), None) => format!("{head}{last}"),
        (Some(_), Some(_)) => format!("{head}…"),
    }
}

/// Human-readable file size, e.g. `12.34 KB`.
pub fn kb(bytes: u64) -> String {
    let kilobytes = bytes as f64 / 1024.0;
    format!("{kilobytes:.2} KB")
}

/// Elapsed time in seconds with two decimals, e.g. `3.41s`.
pub fn seconds(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f64())
}
