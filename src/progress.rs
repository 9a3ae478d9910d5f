// Progress math and the bar renderer used by the interactive screen.

/// Convert a transport progress fraction into a whole percentage.
///
/// Returns `None` when the fraction is undefined (NaN) or exactly zero;
/// the transport reports those before any byte went out and they must
/// not reset what is already displayed.
pub fn percent_from_fraction(fraction: f64) -> Option<u8> {
    if fraction.is_nan() || fraction == 0.0 {
        return None;
    }
    Some((fraction * 100.0).round().clamp(0.0, 100.0) as u8)
}

/// Round a percentage down to the nearest multiple of ten.
pub fn quantize_to_tens(percent: u8) -> u8 {
    percent - percent % 10
}

/// Render `percent` as a bar of `width` cells.
///
/// Callers keep `percent` within 0..=100.
pub fn render_bar(percent: u8, width: usize) -> String {
    let filled = (usize::from(percent) * width + 50) / 100;
    let mut bar = String::with_capacity(width * 3);
    bar.push_str(&"█".repeat(filled));
    bar.push_str(&"░".repeat(width.saturating_sub(filled)));
    bar
}
