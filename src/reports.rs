//! Reports
//!
//! Pure read-side statistics over the transaction history for the dashboard
//! and report pages. Nothing here mutates state; callers fetch collections
//! from the backend and pass them in along with the session clock, so every
//! figure is reproducible for a given clock value.
//!
//! Period boundaries are evaluated in the clock's time zone: "today" means
//! the civil date at the till, not at the server.

use jiff::{civil::Date, Timestamp, ToSpan, Zoned};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::transactions::PersistedTransaction;

/// Reporting period, relative to a session clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// The clock's civil date.
    Today,

    /// The civil date before the clock's.
    Yesterday,

    /// The trailing seven days, measured from the clock instant.
    LastWeek,

    /// The trailing month, measured from the clock instant.
    LastMonth,

    /// The trailing year, measured from the clock instant.
    LastYear,

    /// An inclusive civil date range.
    Custom {
        /// First date included.
        start: Date,

        /// Last date included.
        end: Date,
    },
}

impl Period {
    /// Whether an instant falls inside this period, judged against `now`.
    ///
    /// Date-based periods compare civil dates in `now`'s time zone; the
    /// trailing periods compare instants and have no upper bound, so a
    /// clock-skewed future transaction still counts.
    #[must_use]
    pub fn contains(&self, at: Timestamp, now: &Zoned) -> bool {
        let date = at.to_zoned(now.time_zone().clone()).date();

        match self {
            Self::Today => date == now.date(),
            Self::Yesterday => date == now.date().saturating_sub(1.day()),
            Self::LastWeek => at >= now.saturating_sub(7.days()).timestamp(),
            Self::LastMonth => at >= now.saturating_sub(1.month()).timestamp(),
            Self::LastYear => at >= now.saturating_sub(1.year()).timestamp(),
            Self::Custom { start, end } => (*start..=*end).contains(&date),
        }
    }
}

/// Transactions created within `period`, in input order.
#[must_use]
pub fn filter_by_period<'a>(
    transactions: &'a [PersistedTransaction],
    period: Period,
    now: &Zoned,
) -> Vec<&'a PersistedTransaction> {
    transactions
        .iter()
        .filter(|t| period.contains(t.created_at, now))
        .collect()
}

/// Headline figures for a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SalesSummary {
    /// Sum of transaction totals, in minor units.
    pub total_sales: u64,

    /// Number of transactions.
    pub transaction_count: usize,

    /// Total units sold across all line snapshots.
    pub items_sold: u32,

    /// Profit estimated at a flat 30% margin on sales, in minor units,
    /// truncated toward zero.
    pub estimated_profit: u64,
}

/// Summarize a set of transactions, usually the output of
/// [`filter_by_period`].
pub fn sales_summary<'a, I>(transactions: I) -> SalesSummary
where
    I: IntoIterator<Item = &'a PersistedTransaction>,
{
    let mut summary = SalesSummary::default();

    for transaction in transactions {
        summary.total_sales += transaction.total;
        summary.transaction_count += 1;
        summary.items_sold += transaction.items.iter().map(|i| i.quantity).sum::<u32>();
    }

    let margin = Decimal::new(3, 1);
    let profit = Decimal::from(summary.total_sales) * margin;

    summary.estimated_profit = profit.trunc().to_u64().unwrap_or(0);

    summary
}

/// Revenue for one civil date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyRevenue {
    /// The civil date, in the clock's time zone.
    pub date: Date,

    /// Sum of that date's transaction totals, in minor units. Zero for days
    /// with no transactions.
    pub revenue: u64,
}

/// Revenue per day for the trailing `days` dates ending today, oldest
/// first. Days without transactions appear with zero revenue so the series
/// always has `days` points.
#[must_use]
pub fn revenue_by_day(
    transactions: &[PersistedTransaction],
    days: u16,
    now: &Zoned,
) -> SmallVec<[DailyRevenue; 7]> {
    let time_zone = now.time_zone();

    (0..days)
        .rev()
        .map(|offset| {
            let date = now.date().saturating_sub(i32::from(offset).days());
            let revenue = transactions
                .iter()
                .filter(|t| t.created_at.to_zoned(time_zone.clone()).date() == date)
                .map(|t| t.total)
                .sum();

            DailyRevenue { date, revenue }
        })
        .collect()
}

/// Sales totals per category key, summed over line snapshots.
pub fn category_totals<'a, I>(transactions: I) -> FxHashMap<String, u64>
where
    I: IntoIterator<Item = &'a PersistedTransaction>,
{
    let mut totals: FxHashMap<String, u64> = FxHashMap::default();

    for transaction in transactions {
        for item in &transaction.items {
            *totals.entry(item.category.clone()).or_insert(0) += item.line_total;
        }
    }

    totals
}

/// Today's income next to yesterday's, for the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomeComparison {
    /// Income for the clock's civil date, in minor units.
    pub today: u64,

    /// Income for the previous civil date, in minor units.
    pub yesterday: u64,
}

impl IncomeComparison {
    /// Percentage change from yesterday to today, or `None` when yesterday
    /// had no income (a change from zero has no meaningful percentage).
    #[must_use]
    pub fn change_percent(&self) -> Option<Decimal> {
        if self.yesterday == 0 {
            return None;
        }

        let today = Decimal::from(self.today);
        let yesterday = Decimal::from(self.yesterday);

        Some((today - yesterday) / yesterday * Decimal::ONE_HUNDRED)
    }
}

/// Compare today's income against yesterday's.
#[must_use]
pub fn income_comparison(transactions: &[PersistedTransaction], now: &Zoned) -> IncomeComparison {
    let income = |period: Period| {
        filter_by_period(transactions, period, now)
            .iter()
            .map(|t| t.total)
            .sum()
    };

    IncomeComparison {
        today: income(Period::Today),
        yesterday: income(Period::Yesterday),
    }
}
