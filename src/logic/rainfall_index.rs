use crate::error::{Result, SmartRiceError};
use crate::models::{
    days_in_month, month_name, parse_calendar_date, DuplicatePolicy, MonthlyTotal,
    RainfallObservation,
};
use chrono::{Datelike, Days, NaiveDate};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::warn;

/// Daily rainfall keyed by naive calendar date.
///
/// Rebuilt from the full observation list for every comparison run. Dates
/// with no observation are absent and count as 0 mm when summing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RainfallIndex {
    amounts: BTreeMap<NaiveDate, f64>,
}

impl RainfallIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from raw observations.
    ///
    /// Unparseable dates are skipped and negative amounts are clamped to 0,
    /// both with a warning. A NULL amount counts as 0. Repeated dates are
    /// resolved by `policy`; under [`DuplicatePolicy::Reject`] the first
    /// repeat fails the build.
    pub fn build(observations: &[RainfallObservation], policy: DuplicatePolicy) -> Result<Self> {
        let amounts = resolve_observations(observations, policy)?
            .into_iter()
            .map(|(date, amount)| (date, amount.unwrap_or(0.0)))
            .collect();
        Ok(Self { amounts })
    }

    pub fn insert(&mut self, date: NaiveDate, amount_mm: f64) {
        self.amounts.insert(date, amount_mm.max(0.0));
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.amounts.get(&date).copied()
    }

    pub fn amount_on(&self, date: NaiveDate) -> f64 {
        self.get(date).unwrap_or(0.0)
    }

    /// Total rainfall over the inclusive range between two dates, in either order
    pub fn sum_between(&self, a: NaiveDate, b: NaiveDate) -> f64 {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        self.amounts.range(start..=end).map(|(_, mm)| *mm).sum()
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.amounts.iter().map(|(d, mm)| (*d, *mm))
    }

    /// Per-month totals for `year`, January first
    pub fn monthly_totals(&self, year: i32) -> [f64; 12] {
        let mut totals = [0.0; 12];
        let (Some(start), Some(end)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        ) else {
            return totals;
        };
        for (date, mm) in self.amounts.range(start..=end) {
            totals[date.month0() as usize] += mm;
        }
        totals
    }

    /// Monthly totals for `year` with each month's name and length
    pub fn monthly_report(&self, year: i32) -> Vec<MonthlyTotal> {
        self.monthly_totals(year)
            .iter()
            .zip(1u32..)
            .map(|(total, month)| MonthlyTotal {
                month,
                name: month_name(month),
                days: days_in_month(year, month),
                total_mm: *total,
            })
            .collect()
    }

    pub fn yearly_total(&self, year: i32) -> f64 {
        self.monthly_totals(year).iter().sum()
    }

    /// Most recent observation in the `window_days` days ending on `date`
    pub fn latest_within(&self, date: NaiveDate, window_days: i64) -> Option<(NaiveDate, f64)> {
        let lookback = Days::new((window_days.max(1) - 1) as u64);
        let start = date.checked_sub_days(lookback).unwrap_or(NaiveDate::MIN);
        self.amounts
            .range(start..=date)
            .next_back()
            .map(|(d, mm)| (*d, *mm))
    }
}

/// One reading per calendar date, in date order, with repeats resolved by
/// `policy`. A missing amount stays `None` so storage can keep it as NULL;
/// summing a missing amount with a present one keeps the present one.
pub fn resolve_observations(
    observations: &[RainfallObservation],
    policy: DuplicatePolicy,
) -> Result<BTreeMap<NaiveDate, Option<f64>>> {
    let mut resolved = BTreeMap::new();

    for obs in observations {
        let date = match parse_calendar_date("date", &obs.date) {
            Ok(d) => d,
            Err(e) => {
                warn!(date = %obs.date, "Skipping rainfall observation: {}", e);
                continue;
            }
        };

        let amount = sanitize_amount(date, obs.amount_mm);

        match resolved.entry(date) {
            Entry::Vacant(slot) => {
                slot.insert(amount);
            }
            Entry::Occupied(mut slot) => match policy {
                DuplicatePolicy::LastWins => {
                    slot.insert(amount);
                }
                DuplicatePolicy::Sum => {
                    let total = match (*slot.get(), amount) {
                        (None, None) => None,
                        (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
                    };
                    slot.insert(total);
                }
                DuplicatePolicy::Reject => {
                    return Err(SmartRiceError::DuplicateObservation(date));
                }
            },
        }
    }

    Ok(resolved)
}

fn sanitize_amount(date: NaiveDate, amount: Option<f64>) -> Option<f64> {
    match amount {
        Some(mm) if mm.is_finite() && mm >= 0.0 => Some(mm),
        Some(mm) => {
            warn!(%date, amount_mm = mm, "Out-of-range rainfall amount, counting as 0");
            Some(0.0)
        }
        None => None,
    }
}
