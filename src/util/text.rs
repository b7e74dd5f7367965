use std::borrow::Cow;

use chrono::{DateTime, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Terminal columns occupied by `s` (CJK and emoji count as 2).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Fit `s` into `max_width` columns, appending "..." when something was cut.
///
/// Widths of 3 or less have no room for an ellipsis, so the text is simply
/// clipped. Returns the input borrowed whenever it already fits.
///
/// ```
/// use spacenews::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Starship", 20), "Starship");
/// assert_eq!(truncate_to_width("Starship flight test", 11), "Starship...");
/// assert_eq!(truncate_to_width("Starship", 3), "Sta");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width <= ELLIPSIS_WIDTH {
        return Cow::Owned(s[..fit_prefix(s, max_width)].to_string());
    }
    let end = fit_prefix(s, max_width - ELLIPSIS_WIDTH);
    Cow::Owned(format!("{}{ELLIPSIS}", &s[..end]))
}

/// Byte length of the longest prefix of `s` that fits in `budget` columns.
fn fit_prefix(s: &str, budget: usize) -> usize {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            return idx;
        }
        used += w;
    }
    s.len()
}

fn is_unsafe_byte(b: u8) -> bool {
    b == 0x1b || b == 0x7f || (b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r'))
}

/// Remove terminal control characters and ANSI escape sequences.
///
/// Titles and summaries come straight from a third-party API and are drawn
/// into the terminal, so CSI (`ESC [ ... final`) and OSC (`ESC ] ... BEL|ST`)
/// sequences are dropped along with bare C0 controls and DEL. Tab, newline
/// and carriage return survive.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    if !bytes.iter().any(|&b| is_unsafe_byte(b)) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            0x1b => i = skip_escape(bytes, i),
            b if is_unsafe_byte(b) => i += 1,
            _ => {
                let start = i;
                while i < bytes.len() && !is_unsafe_byte(bytes[i]) {
                    i += 1;
                }
                // Only ASCII bytes stop the run, so this is a char boundary
                out.push_str(&s[start..i]);
            }
        }
    }
    Cow::Owned(out)
}

/// Index just past the escape sequence starting at `i` (which holds ESC).
fn skip_escape(bytes: &[u8], i: usize) -> usize {
    match bytes.get(i + 1) {
        Some(b'[') => {
            let mut j = i + 2;
            while j < bytes.len() {
                let c = bytes[j];
                j += 1;
                if (0x40..=0x7e).contains(&c) {
                    break;
                }
            }
            j
        }
        Some(b']') => {
            let mut j = i + 2;
            while j < bytes.len() {
                if bytes[j] == 0x07 {
                    return j + 1;
                }
                if bytes[j] == 0x1b && bytes.get(j + 1) == Some(&b'\\') {
                    return j + 2;
                }
                j += 1;
            }
            j
        }
        _ => i + 1,
    }
}

/// "March 5, 2025" style date used in the detail view and popular panel.
pub fn format_long_date(ts: &DateTime<Utc>) -> String {
    ts.format("%B %-d, %Y").to_string()
}

/// "March 5" style date used on list cards.
pub fn format_short_date(ts: &DateTime<Utc>) -> String {
    ts.format("%B %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fits_is_borrowed() {
        let out = truncate_to_width("Falcon 9", 8);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, "Falcon 9");
    }

    #[test]
    fn test_ascii_truncation() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
        assert_eq!(truncate_to_width("Testing", 4), "T...");
    }

    #[test]
    fn test_wide_char_truncation() {
        // 2 columns per char; 7 wide leaves 4 for text
        assert_eq!(truncate_to_width("火星探査機", 7), "火星...");
        assert_eq!(truncate_to_width("火星探査機", 5), "火...");
    }

    #[test]
    fn test_narrow_widths_clip_without_ellipsis() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Test", 1), "T");
        assert_eq!(truncate_to_width("Test", 3), "Tes");
        assert_eq!(truncate_to_width("火星", 1), "");
        assert_eq!(truncate_to_width("火星", 3), "火");
    }

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("ISS"), 3);
        assert_eq!(display_width("火星"), 4);
    }

    #[test]
    fn test_strip_clean_text_is_borrowed() {
        let input = "Artemis II crew named\n\twith tabs\r\n";
        let out = strip_control_chars(input);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, input);
    }

    #[test]
    fn test_strip_c0_and_del() {
        assert_eq!(strip_control_chars("he\x00ll\x07o\x7f!"), "hello!");
    }

    #[test]
    fn test_strip_csi() {
        assert_eq!(strip_control_chars("\x1b[31mRed\x1b[0m"), "Red");
        assert_eq!(strip_control_chars("up\x1b[2Adown"), "updown");
    }

    #[test]
    fn test_strip_osc_both_terminators() {
        assert_eq!(strip_control_chars("\x1b]0;title\x07safe"), "safe");
        assert_eq!(strip_control_chars("\x1b]0;title\x1b\\safe"), "safe");
    }

    #[test]
    fn test_strip_bare_and_trailing_esc() {
        assert_eq!(strip_control_chars("a\x1bb"), "ab");
        assert_eq!(strip_control_chars("tail\x1b"), "tail");
        assert_eq!(strip_control_chars("tail\x1b["), "tail");
    }

    #[test]
    fn test_strip_keeps_unicode() {
        assert_eq!(strip_control_chars("火星 \x1b[1m探査\x1b[0m"), "火星 探査");
    }

    #[test]
    fn test_date_formats() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 5, 14, 30, 0).unwrap();
        assert_eq!(format_long_date(&ts), "March 5, 2025");
        assert_eq!(format_short_date(&ts), "March 5");
    }
}
