use chrono::NaiveDate;

/// strftime patterns for reading and displaying a release date of a given precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTokens {
    pub parse: &'static str,
    pub display: &'static str,
}

pub fn date_tokens(precision: &str) -> DateTokens {
    let (parse, display) = match precision {
        "day" => ("%Y-%m-%d", "%b %-d %Y"),
        "month" => ("%Y-%m", "%b %Y"),
        "year" => ("%Y", "%Y"),
        _ => ("", ""),
    };
    DateTokens { parse, display }
}

/// Parses a release date, completing month/year precision to the first day of the period.
pub fn parse_release_date(raw: &str, precision: &str) -> Option<NaiveDate> {
    let tokens = date_tokens(precision);
    let (fill_value, fill_pattern) = match precision {
        "day" => ("", ""),
        "month" => ("-01", "-%d"),
        "year" => ("-01-01", "-%m-%d"),
        _ => return None,
    };

    NaiveDate::parse_from_str(
        &format!("{}{}", raw.trim(), fill_value),
        &format!("{}{}", tokens.parse, fill_pattern),
    )
    .ok()
}

pub fn display_release_date(date: NaiveDate, precision: &str) -> String {
    match date_tokens(precision).display {
        "" => date.to_string(),
        pattern => date.format(pattern).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_month() {
        let tokens = date_tokens("month");
        assert_eq!(tokens.parse, "%Y-%m");
        assert_eq!(tokens.display, "%b %Y");
    }

    #[test]
    fn test_tokens_day_and_year() {
        assert_eq!(
            date_tokens("day"),
            DateTokens {
                parse: "%Y-%m-%d",
                display: "%b %-d %Y"
            }
        );
        assert_eq!(
            date_tokens("year"),
            DateTokens {
                parse: "%Y",
                display: "%Y"
            }
        );
    }

    #[test]
    fn test_tokens_unknown_precision_are_empty() {
        assert_eq!(
            date_tokens("week"),
            DateTokens {
                parse: "",
                display: ""
            }
        );
    }

    #[test]
    fn test_parse_each_precision() {
        assert_eq!(
            parse_release_date("2026-03-14", "day"),
            NaiveDate::from_ymd_opt(2026, 3, 14)
        );
        assert_eq!(
            parse_release_date("2026-03", "month"),
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
        assert_eq!(
            parse_release_date("1999", "year"),
            NaiveDate::from_ymd_opt(1999, 1, 1)
        );
    }

    #[test]
    fn test_parse_rejects_mismatch() {
        assert_eq!(parse_release_date("2026-03", "day"), None);
        assert_eq!(parse_release_date("2026-03-14", "week"), None);
    }

    #[test]
    fn test_display_follows_precision() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        assert_eq!(display_release_date(date, "day"), "Mar 4 2026");
        assert_eq!(display_release_date(date, "month"), "Mar 2026");
        assert_eq!(display_release_date(date, "year"), "2026");
    }
}
