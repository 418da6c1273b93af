//! Pro-rated license pricing.
//!
//! A license period includes both of its endpoint dates. Amounts are rounded
//! to two decimals exactly once, on the final figure of each operation.

use crate::domain::model::{LeapYearPolicy, LineItem, PricedLineItem, Report};
use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

/// Year length assumed by [`LeapYearPolicy::Simple`].
pub const SIMPLE_YEAR_DAYS: u32 = 365;

/// Commercial rounding to kopecks/cents: halves go away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn year_length(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Number of days in `[start, end]`, both ends included.
pub fn period_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Price of one license for `[start, end]` given its annual price.
///
/// Callers must ensure `start <= end`; the input boundary rejects reversed
/// ranges before anything is priced.
pub fn price(
    start: NaiveDate,
    end: NaiveDate,
    annual_price: Decimal,
    policy: LeapYearPolicy,
) -> Decimal {
    debug_assert!(start <= end, "price() called with start after end");

    let amount = match policy {
        LeapYearPolicy::Simple => {
            annual_price * Decimal::from(period_days(start, end)) / Decimal::from(SIMPLE_YEAR_DAYS)
        }
        LeapYearPolicy::CalendarAccurate => calendar_accurate_amount(start, end, annual_price),
    };

    round_money(amount)
}

/// Unrounded sum of `annual_price / year_length(day.year)` over every day
/// in the period. Days are counted per calendar year so each year's share
/// is a single exact product instead of hundreds of repeating fractions.
fn calendar_accurate_amount(start: NaiveDate, end: NaiveDate, annual_price: Decimal) -> Decimal {
    let mut amount = Decimal::ZERO;
    let mut segment_start = start;

    while segment_start <= end {
        let year = segment_start.year();
        let segment_end = NaiveDate::from_ymd_opt(year, 12, 31).map_or(end, |last| last.min(end));

        let days = Decimal::from(period_days(segment_start, segment_end));
        amount += annual_price * days / Decimal::from(year_length(year));

        match segment_end.succ_opt() {
            Some(next) => segment_start = next,
            None => break,
        }
    }

    amount
}

/// `per_license_price * license_count`, rounded.
pub fn total(per_license_price: Decimal, license_count: u32) -> Decimal {
    round_money(per_license_price * Decimal::from(license_count))
}

/// Sum of item totals. Each addend already has two decimals, so no
/// rounding is applied.
pub fn grand_total(items: &[PricedLineItem]) -> Decimal {
    items.iter().map(|item| item.total_price).sum()
}

pub fn price_item(item: &LineItem, policy: LeapYearPolicy) -> PricedLineItem {
    let per_license_price = price(item.start_date, item.end_date, item.annual_price, policy);
    let total_price = total(per_license_price, item.license_count);

    PricedLineItem {
        item: item.clone(),
        per_license_price,
        total_price,
    }
}

/// Prices every item, keeping input order, and sums the grand total.
pub fn price_all(items: &[LineItem], policy: LeapYearPolicy) -> Report {
    let rows: Vec<PricedLineItem> = items.iter().map(|item| price_item(item, policy)).collect();
    let grand_total = grand_total(&rows);

    tracing::debug!(
        "Priced {} line items with {} policy, grand total {}",
        rows.len(),
        policy,
        grand_total
    );

    Report {
        policy,
        rows,
        grand_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::program::Program;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(start: NaiveDate, end: NaiveDate, count: u32, annual: Decimal) -> LineItem {
        LineItem {
            program: Program::DocOne,
            start_date: start,
            end_date: end,
            license_count: count,
            annual_price: annual,
        }
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert_eq!(year_length(2024), 366);
        assert_eq!(year_length(2025), 365);
    }

    #[test]
    fn test_period_is_inclusive() {
        assert_eq!(period_days(date(2023, 1, 1), date(2023, 1, 1)), 1);
        assert_eq!(period_days(date(2024, 1, 1), date(2024, 12, 31)), 366);
        assert_eq!(period_days(date(2023, 12, 31), date(2024, 1, 1)), 2);
    }

    #[test]
    fn test_single_day_non_leap_year() {
        let start = date(2023, 1, 1);
        for policy in [LeapYearPolicy::Simple, LeapYearPolicy::CalendarAccurate] {
            assert_eq!(price(start, start, Decimal::from(365), policy), Decimal::new(100, 2));
        }
    }

    #[test]
    fn test_full_leap_year_calendar_accurate() {
        let amount = price(
            date(2024, 1, 1),
            date(2024, 12, 31),
            Decimal::from(36500),
            LeapYearPolicy::CalendarAccurate,
        );
        assert_eq!(amount, Decimal::new(3650000, 2));
    }

    #[test]
    fn test_full_leap_year_simple_overcharges_one_day() {
        let amount = price(
            date(2024, 1, 1),
            date(2024, 12, 31),
            Decimal::from(36500),
            LeapYearPolicy::Simple,
        );
        assert_eq!(amount, Decimal::from(36600));
    }

    #[test]
    fn test_full_non_leap_year_is_annual_price() {
        let annual = Decimal::new(1234567, 2);
        for policy in [LeapYearPolicy::Simple, LeapYearPolicy::CalendarAccurate] {
            assert_eq!(price(date(2022, 3, 1), date(2023, 2, 28), annual, policy), annual);
        }
    }

    #[test]
    fn test_period_spanning_new_year_into_leap_year() {
        // 31.12.2023 (1/365) + 01.01.2024 (1/366)
        let amount = price(
            date(2023, 12, 31),
            date(2024, 1, 1),
            Decimal::from(73200),
            LeapYearPolicy::CalendarAccurate,
        );
        let expected = round_money(Decimal::from(73200) / Decimal::from(365) + Decimal::from(200));
        assert_eq!(amount, expected);
        assert_eq!(amount, Decimal::new(40055, 2));
    }

    #[test]
    fn test_policies_agree_outside_leap_years() {
        let annual = Decimal::new(9999900, 2);
        let start = date(2025, 2, 10);
        let end = date(2025, 11, 3);
        assert_eq!(
            price(start, end, annual, LeapYearPolicy::Simple),
            price(start, end, annual, LeapYearPolicy::CalendarAccurate)
        );
    }

    #[test]
    fn test_zero_price_is_zero() {
        let start = date(2024, 2, 1);
        let end = date(2024, 3, 31);
        assert_eq!(
            price(start, end, Decimal::ZERO, LeapYearPolicy::CalendarAccurate),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_total_rounds_product() {
        assert_eq!(total(Decimal::new(100, 2), 3), Decimal::new(300, 2));
        assert_eq!(total(Decimal::new(3333, 2), 3), Decimal::new(9999, 2));
    }

    #[test]
    fn test_round_money_midpoint() {
        assert_eq!(round_money(Decimal::new(1005, 3)), Decimal::new(101, 2));
        assert_eq!(round_money(Decimal::new(1004, 3)), Decimal::new(100, 2));
    }

    #[test]
    fn test_grand_total_of_two_items() {
        let start = date(2023, 1, 1);
        let rows = vec![
            PricedLineItem {
                item: item(start, start, 1, Decimal::from(100)),
                per_license_price: Decimal::new(10000, 2),
                total_price: Decimal::new(10000, 2),
            },
            PricedLineItem {
                item: item(start, start, 1, Decimal::from(250)),
                per_license_price: Decimal::new(25050, 2),
                total_price: Decimal::new(25050, 2),
            },
        ];
        assert_eq!(grand_total(&rows), Decimal::new(35050, 2));
    }

    #[test]
    fn test_price_all_keeps_order_and_totals() {
        let items = vec![
            item(date(2023, 1, 1), date(2023, 1, 1), 2, Decimal::from(365)),
            item(date(2024, 1, 1), date(2024, 12, 31), 1, Decimal::from(36500)),
        ];

        let report = price_all(&items, LeapYearPolicy::CalendarAccurate);

        assert_eq!(report.len(), 2);
        assert_eq!(report.rows[0].per_license_price, Decimal::new(100, 2));
        assert_eq!(report.rows[0].total_price, Decimal::new(200, 2));
        assert_eq!(report.rows[1].total_price, Decimal::from(36500));
        assert_eq!(report.grand_total, Decimal::new(3650200, 2));
        assert_eq!(report.policy, LeapYearPolicy::CalendarAccurate);
    }

    #[test]
    fn test_price_is_deterministic() {
        let start = date(2024, 2, 15);
        let end = date(2025, 3, 10);
        let annual = Decimal::new(4999999, 2);
        let first = price(start, end, annual, LeapYearPolicy::CalendarAccurate);
        let second = price(start, end, annual, LeapYearPolicy::CalendarAccurate);
        assert_eq!(first, second);
    }
}
