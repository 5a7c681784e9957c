//! Small presentation helpers.

/// Compact counter form: `1234` → `1.2K`, `2_500_000` → `2.5M`. Whole
/// multiples drop the trailing `.0`.
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{}M", trim_trailing_zero(format!("{:.1}", n as f64 / 1_000_000.0)))
    } else if n >= 1_000 {
        format!("{}K", trim_trailing_zero(format!("{:.1}", n as f64 / 1_000.0)))
    } else {
        n.to_string()
    }
}

fn trim_trailing_zero(value: String) -> String {
    value
        .strip_suffix(".0")
        .map(str::to_string)
        .unwrap_or(value)
}

/// Five-entity HTML escape for user-controlled text interpolated into
/// markup.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_count_compacts_thousands_and_millions() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1K");
        assert_eq!(format_count(1_234), "1.2K");
        assert_eq!(format_count(52_000), "52K");
        assert_eq!(format_count(1_000_000), "1M");
        assert_eq!(format_count(2_500_000), "2.5M");
    }

    #[test]
    fn escape_html_covers_the_five_entities() {
        assert_eq!(
            escape_html(r#"<b>"Fish" & 'Chips'</b>"#),
            "&lt;b&gt;&quot;Fish&quot; &amp; &#039;Chips&#039;&lt;/b&gt;"
        );
        assert_eq!(escape_html("BraveOwl417"), "BraveOwl417");
    }
}
