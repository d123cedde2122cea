/// Tool for calendar and heatmap views of a habit
///
/// This module implements the habit_calendar MCP tool. Besides the cell
/// data it renders a plain-text grid using one shade character per day.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::analytics::calendar::DAYS_PER_WEEK;
use crate::analytics::{AnalyticsEngine, Calendar, CalendarView, HeatmapCell, MonthCell};
use crate::domain::DomainError;
use crate::storage::{HabitStorage, StorageError};
use crate::tools::parse_habit_id;

const WEEKDAY_HEADER: &str = "Su Mo Tu We Th Fr Sa";
const HEATMAP_ROW_LABELS: [&str; DAYS_PER_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Parameters for the calendar tool
#[derive(Debug, Deserialize)]
pub struct HabitCalendarParams {
    pub habit_id: String,
    /// "month" or "heatmap"; chosen from the habit's period when absent
    pub view: Option<String>,
    /// Month to show in month view, as YYYY-MM; defaults to the current month
    pub month: Option<String>,
}

/// Calendar cells plus a text rendering
#[derive(Debug, Serialize)]
pub struct HabitCalendarResponse {
    pub habit_id: String,
    pub name: String,
    pub calendar: Calendar,
    pub rendered: String,
}

/// Build the calendar for one habit
pub fn habit_calendar<S: HabitStorage + ?Sized>(
    storage: &S,
    analytics: &AnalyticsEngine,
    params: HabitCalendarParams,
    now: NaiveDateTime,
) -> Result<HabitCalendarResponse, StorageError> {
    let habit_id = parse_habit_id(&params.habit_id)?;

    let view = match params.view.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => Some(CalendarView::parse(raw).ok_or_else(|| DomainError::Validation {
            message: format!("Invalid view '{}'. Valid options: month, heatmap", raw),
        })?),
        None => None,
    };

    let today = now.date();
    let reference = match params.month.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        Some(raw) => parse_month(raw)?,
        None => today,
    };

    let habit = storage.get_habit(&habit_id)?;
    let calendar = analytics.habit_calendar(&habit, view, reference, today);

    let rendered = match &calendar {
        Calendar::Month { cells, .. } => render_month(&habit.name, reference, cells),
        Calendar::Heatmap(heatmap) => render_heatmap(&habit.name, &heatmap.weeks, heatmap.total_completions),
    };

    Ok(HabitCalendarResponse {
        habit_id: habit.id.to_string(),
        name: habit.name,
        calendar,
        rendered,
    })
}

/// Parse a YYYY-MM month into its first day
fn parse_month(raw: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d")
        .map_err(|_| DomainError::InvalidDate(format!("'{}' is not a month in YYYY-MM form", raw)))
}

fn render_month(name: &str, reference: NaiveDate, cells: &[MonthCell]) -> String {
    let mut out = format!("{} - {}\n{}\n", name, reference.format("%B %Y"), WEEKDAY_HEADER);

    for week in cells.chunks(DAYS_PER_WEEK) {
        let row: Vec<String> = week
            .iter()
            .map(|cell| {
                if !cell.is_current_month {
                    "  ".to_string()
                } else if cell.completion_count > 0 {
                    format!("{}{}", cell.color_tier.glyph(), cell.color_tier.glyph())
                } else {
                    format!("{:>2}", cell.day_of_month)
                }
            })
            .collect();
        out.push_str(row.join(" ").trim_end());
        out.push('\n');
    }

    let done: u32 = cells
        .iter()
        .filter(|c| c.is_current_month)
        .map(|c| c.completion_count)
        .sum();
    out.push_str(&format!("{} completion{} this month", done, if done == 1 { "" } else { "s" }));
    out
}

fn render_heatmap(name: &str, weeks: &[Vec<HeatmapCell>], total_completions: u32) -> String {
    let mut out = format!("{} - last 12 months\n", name);

    for (row, label) in HEATMAP_ROW_LABELS.iter().enumerate() {
        let line: String = weeks
            .iter()
            .filter_map(|week| week.get(row))
            .map(|cell| cell.color_tier.glyph())
            .collect();
        out.push_str(&format!("{} {}\n", label, line));
    }

    if let (Some(first), Some(last)) = (
        weeks.first().and_then(|w| w.first()),
        weeks.last().and_then(|w| w.last()),
    ) {
        out.push_str(&format!(
            "{} to {}: {} completion{}",
            first.iso_date,
            last.iso_date,
            total_completions,
            if total_completions == 1 { "" } else { "s" }
        ));
    }

    out
}
