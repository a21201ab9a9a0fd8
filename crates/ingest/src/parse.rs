use chrono::NaiveDate;

/// Date formats accepted before the ISO-8601 fallback, tried in order.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d.%m.%Y", "%Y/%m/%d", "%d/%m/%Y"];

/// Parses a date field, trying each accepted format and finally a general
/// ISO-8601 parse. Returns `None` when nothing matches; the caller drops
/// the row.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    s.parse::<NaiveDate>().ok()
}

/// Parses a numeric field into an amount.
///
/// Accommodates the locale of the source sheets: interior spaces and
/// non-breaking spaces are thousands separators, a comma is a decimal
/// point. Empty strings and the literals "none"/"nan" (any case) are
/// absent values. Anything else unparsable is also absent, never an error.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '\u{00A0}' && *c != ' ')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if s.is_empty() || s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("nan") {
        return None;
    }
    s.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_accepted_formats_agree() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        for raw in ["2024-03-05", "05.03.2024", "2024/03/05", "05/03/2024"] {
            assert_eq!(parse_date(raw), Some(expected), "format {raw}");
        }
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(
            parse_date(" 2024-03-05 "),
            Some(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())
        );
    }

    #[test]
    fn garbage_dates_are_none() {
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("13.45.2024"), None);
    }

    #[test]
    fn comma_decimal_and_spacing() {
        assert_eq!(parse_amount("1 234,56"), Some(1234.56));
        assert_eq!(parse_amount("1\u{00A0}234,56"), Some(1234.56));
        assert_eq!(parse_amount(" 100 "), Some(100.0));
    }

    #[test]
    fn absent_markers_and_garbage_are_none() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("None"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("abc"), None);
    }
}
