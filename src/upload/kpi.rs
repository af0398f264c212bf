use chrono::{Datelike, NaiveDate};

use super::types::{KpiSet, Month, MonthlyDataPoint, SalespersonRecord, YearMonth};

/// Rough customers-per-salesperson estimate used for `activeCustomers`
const CUSTOMERS_PER_SALESPERSON: u32 = 50;

/// Round half up, to `decimals` places
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}

fn percent_change(from: f64, to: f64) -> f64 {
    if from > 0.0 {
        (to - from) / from * 100.0
    } else {
        0.0
    }
}

/// Month and year of a mentorship start annotation.
///
/// Accepts ISO dates (`2024-03-01`, optionally followed by a time) and
/// Brazilian `dd/mm/yyyy`.
pub fn parse_mentorship_date(raw: &str) -> Option<YearMonth> {
    let raw = raw.trim();

    let iso = raw
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok());
    let date = iso.or_else(|| NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok())?;

    Some(YearMonth::new(date.year(), date.month()))
}

/// Revenue before (inclusive) and after the mentorship start, the latter
/// bounded by the cutoff
fn mentorship_buckets<'a, I>(points: I, start: YearMonth, cutoff: YearMonth) -> (f64, f64)
where
    I: IntoIterator<Item = &'a MonthlyDataPoint>,
{
    points
        .into_iter()
        .fold((0.0, 0.0), |(pre, post), point| {
            let position = point.position();
            if position <= start {
                (pre + point.revenue, post)
            } else if position <= cutoff {
                (pre, post + point.revenue)
            } else {
                (pre, post)
            }
        })
}

/// Derive the KPI set from extracted data. Pure; recomputed on every
/// upload.
pub fn calculate_kpis(
    historical_data: &[MonthlyDataPoint],
    current_year_data: &[MonthlyDataPoint],
    team: &[SalespersonRecord],
    cutoff: YearMonth,
    mentorship_start_date: Option<&str>,
) -> KpiSet {
    let current_month_name = Month::from_number(cutoff.month)
        .map(|m| m.long_name().to_string())
        .unwrap_or_default();

    let annual_goal: f64 = current_year_data.iter().map(|m| m.goal).sum();
    let annual_realized: f64 = current_year_data.iter().map(|m| m.revenue).sum();

    let last_year_total: f64 = historical_data
        .iter()
        .filter(|m| m.year == cutoff.year - 1)
        .map(|m| m.revenue)
        .sum();
    let last_year_growth = percent_change(last_year_total, annual_realized);

    let mentorship_growth = mentorship_start_date
        .filter(|raw| !raw.is_empty())
        .and_then(parse_mentorship_date)
        .map(|start| {
            let (pre, post) = mentorship_buckets(
                historical_data.iter().chain(current_year_data.iter()),
                start,
                cutoff,
            );
            percent_change(pre, post)
        })
        .unwrap_or(0.0);

    let total_sales_count: u32 = team.iter().map(|t| t.total_sales_count).sum();
    let active_customers = team.iter().filter(|t| t.active).count() as u32 * CUSTOMERS_PER_SALESPERSON;

    let average_ticket = if total_sales_count > 0 {
        round_to(annual_realized / total_sales_count as f64, 0)
    } else {
        0.0
    };

    KpiSet {
        annual_goal,
        annual_realized,
        last_year_growth: round_to(last_year_growth, 1),
        mentorship_growth: round_to(mentorship_growth, 1),
        current_month_name,
        average_ticket,
        conversion_rate: 0.0,
        cac: 0.0,
        ltv: 0.0,
        active_customers,
        total_sales_count,
    }
}
