/// Text processing utilities
pub mod text {
    use std::ops::Range;

    /// First candidate that is present and not blank.
    pub fn first_non_empty<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
        candidates
            .iter()
            .flatten()
            .copied()
            .find(|candidate| !candidate.trim().is_empty())
    }

    /// Byte ranges of every non-overlapping, case-insensitive occurrence of
    /// `needle` in `haystack`, leftmost first. Ranges always fall on char
    /// boundaries of `haystack`.
    pub fn find_case_insensitive(haystack: &str, needle: &str) -> Vec<Range<usize>> {
        let needle: Vec<char> = needle.chars().collect();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut matches = Vec::new();
        let mut search_from = 0;

        for (start, _) in haystack.char_indices() {
            if start < search_from {
                continue;
            }
            if let Some(end) = match_at(haystack, start, &needle) {
                matches.push(start..end);
                search_from = end;
            }
        }

        matches
    }

    pub fn contains_case_insensitive(haystack: &str, needle: &str) -> bool {
        needle.is_empty() || !find_case_insensitive(haystack, needle).is_empty()
    }

    fn match_at(haystack: &str, start: usize, needle: &[char]) -> Option<usize> {
        let mut chars = haystack[start..].char_indices();
        let mut end = start;

        for expected in needle {
            let (offset, actual) = chars.next()?;
            if !chars_equal_ignore_case(actual, *expected) {
                return None;
            }
            end = start + offset + actual.len_utf8();
        }

        Some(end)
    }

    fn chars_equal_ignore_case(a: char, b: char) -> bool {
        a == b || a.to_lowercase().eq(b.to_lowercase())
    }

    /// Escape the characters that matter when text is embedded in markup.
    pub fn escape_markup(text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#39;"),
                _ => escaped.push(c),
            }
        }
        escaped
    }
}

/// URL utilities
pub mod url {
    use url::Url;

    /// Only absolute http(s) URLs are emitted as links.
    pub fn is_safe_link(url_str: &str) -> bool {
        if let Ok(url) = Url::parse(url_str.trim()) {
            url.scheme() == "http" || url.scheme() == "https"
        } else {
            false
        }
    }

    pub fn safe_link(url_str: Option<&str>) -> Option<String> {
        url_str
            .map(str::trim)
            .filter(|candidate| is_safe_link(candidate))
            .map(str::to_string)
    }
}

/// Time utilities
pub mod time {
    use chrono::{Local, NaiveDate};

    /// `YYYY-MM-DD` with zero-padded month and day.
    pub fn format_date(date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Today's date from local calendar fields, not UTC.
    pub fn local_today() -> NaiveDate {
        Local::now().date_naive()
    }
}
