pub const SIZE_STEP: f64 = 1024.0;
pub const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// formats a byte count for display, e.g. `1536 -> "1.5 KB"`
///
/// values are divided by 1024 until they drop below 1024 or the largest
/// unit is reached. anything above bytes and below 10 keeps one decimal
/// place, a trailing `.0` is always dropped.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;

    while size >= SIZE_STEP && unit < SIZE_UNITS.len() - 1 {
        size /= SIZE_STEP;
        unit += 1;
    }

    let formatted = if unit > 0 && size < 10.0 {
        format!("{:.1}", (size * 10.0).round() / 10.0)
    } else {
        format!("{:.0}", size.round())
    };

    let trimmed = formatted.strip_suffix(".0").unwrap_or(&formatted);

    format!("{trimmed} {}", SIZE_UNITS[unit])
}
