use regex::Regex;
use std::sync::OnceLock;

use super::types::{AvailableMonth, Month, YearMonth};

fn tab_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([A-Za-z]{3})-(\d{2})$").expect("valid tab name pattern"))
}

/// Parse a monthly tab label such as `Out-25` into its month and year.
/// Two-digit years always land in the 2000s.
pub fn parse_tab_name(label: &str) -> Option<(Month, i32)> {
    let caps = tab_pattern().captures(label)?;
    let month = Month::from_abbrev(&caps[1])?;
    let year_short: i32 = caps[2].parse().ok()?;

    Some((month, 2000 + year_short))
}

/// Canonical tab label for a month, e.g. `(Out, 2025)` -> `Out-25`
pub fn format_tab_name(month: Month, year: i32) -> String {
    format!("{}-{:02}", month.abbrev(), year.rem_euclid(100))
}

/// First tab, in workbook order, at or before the cutoff.
///
/// This is not necessarily the closest month to the cutoff.
pub fn nearest_eligible_tab<'a, I>(names: I, cutoff: YearMonth) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().find(|name| {
        parse_tab_name(name)
            .map(|(month, year)| YearMonth::new(year, month.number()) <= cutoff)
            .unwrap_or(false)
    })
}

/// Every resolvable monthly tab, most recent first
pub fn available_months<'a, I>(names: I) -> Vec<AvailableMonth>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut months: Vec<AvailableMonth> = names
        .into_iter()
        .filter_map(|name| {
            parse_tab_name(name).map(|(month, year)| AvailableMonth {
                month: month.number(),
                year,
                tab_name: name.to_string(),
            })
        })
        .collect();

    months.sort_by(|a, b| b.year.cmp(&a.year).then(b.month.cmp(&a.month)));
    months
}
