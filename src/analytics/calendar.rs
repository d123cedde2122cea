/// Calendar and heatmap bucketing
///
/// Buckets completions by calendar day into a 6 x 7 month grid or a
/// 53-week x 7-day heatmap, GitHub contribution-graph style. Each cell gets
/// a color tier relative to the busiest day in the habit's own history, so
/// the same count can land in different tiers for different habits.

use std::collections::HashMap;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Serialize, Serializer};

use crate::domain::{Completion, Period};

/// Cells in a month grid (6 weeks of 7 days)
pub const MONTH_GRID_CELLS: usize = 42;
/// Weekly columns in the year heatmap
pub const HEATMAP_WEEKS: usize = 53;
/// Days per heatmap column
pub const DAYS_PER_WEEK: usize = 7;

/// Discrete intensity bucket for a day's completion count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColorTier {
    /// No completions
    Empty,
    Low,
    Medium,
    High,
    Max,
}

impl ColorTier {
    /// Tier for `count` completions given the dataset maximum
    pub fn for_count(count: u32, max_completions: u32) -> Self {
        if count == 0 {
            return ColorTier::Empty;
        }

        let intensity = (count as f64 / max_completions.max(1) as f64).min(1.0);
        if intensity <= 0.25 {
            ColorTier::Low
        } else if intensity <= 0.5 {
            ColorTier::Medium
        } else if intensity <= 0.75 {
            ColorTier::High
        } else {
            ColorTier::Max
        }
    }

    /// Numeric level, 0 (empty) to 4 (busiest)
    pub fn level(&self) -> u8 {
        match self {
            ColorTier::Empty => 0,
            ColorTier::Low => 1,
            ColorTier::Medium => 2,
            ColorTier::High => 3,
            ColorTier::Max => 4,
        }
    }

    /// Hex color on a darkening green scale
    pub fn color(&self) -> &'static str {
        match self {
            ColorTier::Empty => "#ebedf0",
            ColorTier::Low => "#9be9a8",
            ColorTier::Medium => "#40c463",
            ColorTier::High => "#30a14e",
            ColorTier::Max => "#216e39",
        }
    }

    /// Single-character shade for text rendering
    pub fn glyph(&self) -> char {
        match self {
            ColorTier::Empty => '·',
            ColorTier::Low => '░',
            ColorTier::Medium => '▒',
            ColorTier::High => '▓',
            ColorTier::Max => '█',
        }
    }
}

impl Serialize for ColorTier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.level())
    }
}

/// Which calendar layout suits a habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    Month,
    Heatmap,
}

impl CalendarView {
    /// Day and week habits get a month grid; month and year habits a heatmap
    pub fn for_period(period: Period) -> Self {
        match period {
            Period::Day | Period::Week => CalendarView::Month,
            Period::Month | Period::Year => CalendarView::Heatmap,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "month" | "calendar" => Some(CalendarView::Month),
            "heatmap" | "year" => Some(CalendarView::Heatmap),
            _ => None,
        }
    }
}

/// One day in the month grid
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthCell {
    pub day_of_month: u32,
    pub iso_date: NaiveDate,
    pub is_current_month: bool,
    pub is_today: bool,
    pub completion_count: u32,
    pub color_tier: ColorTier,
}

/// One day in the year heatmap
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub iso_date: NaiveDate,
    pub completion_count: u32,
    pub color_tier: ColorTier,
    pub is_today: bool,
}

/// Trailing-year heatmap
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearHeatmap {
    /// 53 columns, each Sunday through Saturday
    pub weeks: Vec<Vec<HeatmapCell>>,
    /// Busiest single day across the full history, at least 1
    pub max_completions: u32,
    /// Sum of the counts shown in the grid
    pub total_completions: u32,
}

/// Completion count per calendar day
pub fn daily_counts(completions: &[Completion]) -> HashMap<NaiveDate, u32> {
    let mut counts = HashMap::new();
    for completion in completions {
        *counts.entry(completion.day).or_insert(0) += 1;
    }
    counts
}

/// Busiest day's count, never below 1
pub fn max_daily_completions(counts: &HashMap<NaiveDate, u32>) -> u32 {
    counts.values().copied().max().unwrap_or(0).max(1)
}

fn sunday_on_or_before(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// 42-day grid covering the month of `reference`
///
/// Starts on the Sunday on or before the 1st, so leading and trailing cells
/// belong to the neighbouring months.
pub fn month_grid(completions: &[Completion], reference: NaiveDate, today: NaiveDate) -> Vec<MonthCell> {
    let counts = daily_counts(completions);
    let max_completions = max_daily_completions(&counts);

    let first = reference - Duration::days(reference.day0() as i64);
    let start = sunday_on_or_before(first);

    (0..MONTH_GRID_CELLS as i64)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let completion_count = counts.get(&date).copied().unwrap_or(0);
            MonthCell {
                day_of_month: date.day(),
                iso_date: date,
                is_current_month: date.month() == first.month() && date.year() == first.year(),
                is_today: date == today,
                completion_count,
                color_tier: ColorTier::for_count(completion_count, max_completions),
            }
        })
        .collect()
}

/// 53 x 7 heatmap of roughly the trailing year
///
/// Columns start on the Sunday on or before one year before `today` and run
/// for 371 days from there. When that year-ago date is a Saturday the grid
/// ends the day before `today`, so no cell is marked `is_today` and today's
/// completions are left out of `total_completions`.
pub fn year_heatmap(completions: &[Completion], today: NaiveDate) -> YearHeatmap {
    let counts = daily_counts(completions);
    let max_completions = max_daily_completions(&counts);

    let year_ago = today
        .checked_sub_months(Months::new(12))
        .unwrap_or(today - Duration::days(365));
    let start = sunday_on_or_before(year_ago);

    let mut total_completions = 0;
    let weeks: Vec<Vec<HeatmapCell>> = (0..HEATMAP_WEEKS as i64)
        .map(|week| {
            (0..DAYS_PER_WEEK as i64)
                .map(|day| {
                    let date = start + Duration::days(week * 7 + day);
                    let completion_count = counts.get(&date).copied().unwrap_or(0);
                    total_completions += completion_count;
                    HeatmapCell {
                        iso_date: date,
                        completion_count,
                        color_tier: ColorTier::for_count(completion_count, max_completions),
                        is_today: date == today,
                    }
                })
                .collect()
        })
        .collect();

    YearHeatmap {
        weeks,
        max_completions,
        total_completions,
    }
}
