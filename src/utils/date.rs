use chrono::NaiveDate;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates_only() {
        assert_eq!(parse_date("2022-07-27"), NaiveDate::from_ymd_opt(2022, 7, 27));
        assert_eq!(parse_date(" 2022-07-27 "), NaiveDate::from_ymd_opt(2022, 7, 27));
        assert!(parse_date("27/07/2022").is_none());
        assert!(parse_date("2022-02-30").is_none());
    }
}
