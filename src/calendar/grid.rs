use std::collections::HashMap;

use chrono::{Datelike as _, Days, Local, Months, NaiveDate, Weekday};

use super::{CalendarDay, CalendarWeek, DayRecord, WEEK_LENGTH};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const WEEKDAY_NAMES: [&str; WEEK_LENGTH] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MONTH_NAMES: [&str; 12] = [
  "January",
  "February",
  "March",
  "April",
  "May",
  "June",
  "July",
  "August",
  "September",
  "October",
  "November",
  "December",
];

/// Generates the month grid for the given zero-based `month0` of `year`.
///
/// The grid runs from the Sunday on or before the 1st to the Saturday on or
/// after the last day of the month, so it always consists of whole weeks.
/// Cells outside the month are padding. `selected` is compared by exact
/// `YYYY-MM-DD` string match, `is_today` against the current local date.
pub fn generate_weeks<T: Clone>(
  year: i32,
  month0: u32,
  records: &[DayRecord<T>],
  selected: Option<&str>,
) -> Vec<CalendarWeek<T>> {
  generate_weeks_at(year, month0, records, selected, Local::now().date_naive())
}

/// Same as [`generate_weeks`] with an explicit "today" for the `is_today`
/// flag.
pub fn generate_weeks_at<T: Clone>(
  year: i32,
  month0: u32,
  records: &[DayRecord<T>],
  selected: Option<&str>,
  today: NaiveDate,
) -> Vec<CalendarWeek<T>> {
  let Some(first) = NaiveDate::from_ymd_opt(year, month0.saturating_add(1), 1) else {
    return Vec::new();
  };
  let last = (first + Months::new(1)) - Days::new(1);

  let start = start_grid_date(first);
  let end = end_grid_date(last);

  let by_date: HashMap<&str, &DayRecord<T>> = records
    .iter()
    .filter(|record| !record.date.is_empty())
    .map(|record| (record.date.as_str(), record))
    .collect();
  let today_str = today.format(DATE_FORMAT).to_string();

  let mut weeks = Vec::new();
  let mut week: Vec<CalendarDay<T>> = Vec::with_capacity(WEEK_LENGTH);

  for date in start.iter_days().take_while(|date| *date <= end) {
    week.push(build_day(date, first.month(), &by_date, &today_str, selected));

    if week.len() == WEEK_LENGTH {
      let Ok(row) = CalendarWeek::try_from(std::mem::take(&mut week)) else {
        unreachable!("week rows are always {WEEK_LENGTH} days");
      };
      weeks.push(row);
    }
  }

  weeks
}

fn build_day<T: Clone>(
  date: NaiveDate,
  month: u32,
  by_date: &HashMap<&str, &DayRecord<T>>,
  today: &str,
  selected: Option<&str>,
) -> CalendarDay<T> {
  if date.month() != month {
    return CalendarDay::padding();
  }

  let date_str = date.format(DATE_FORMAT).to_string();
  let items = by_date
    .get(date_str.as_str())
    .map(|record| record.items.clone())
    .unwrap_or_default();

  CalendarDay {
    day: date.day(),
    is_current_month: true,
    is_today: date_str == today,
    is_selected: selected == Some(date_str.as_str()),
    item_count: items.len(),
    items,
    date: date_str,
  }
}

/// Full English name for a zero-based month index.
pub fn month_name(index: u32) -> Option<&'static str> {
  MONTH_NAMES.get(index as usize).copied()
}

/// Wraps January back to December of the previous year.
pub const fn previous_month(month0: u32, year: i32) -> (u32, i32) {
  if month0 == 0 {
    (11, year - 1)
  } else {
    (month0 - 1, year)
  }
}

/// Wraps December forward to January of the next year.
pub const fn next_month(month0: u32, year: i32) -> (u32, i32) {
  if month0 == 11 {
    (0, year + 1)
  } else {
    (month0 + 1, year)
  }
}

pub fn total_item_count<T>(records: &[DayRecord<T>]) -> usize {
  records.iter().map(|record| record.items.len()).sum()
}

pub fn items_for_date<'a, T>(date: &str, records: &'a [DayRecord<T>]) -> &'a [T] {
  records
    .iter()
    .find(|record| record.date == date)
    .map_or(&[], |record| record.items.as_slice())
}

fn start_grid_date(first: NaiveDate) -> NaiveDate {
  let mut start = first;

  while start.weekday() != Weekday::Sun {
    start = start.pred_opt().unwrap_or(start);
  }

  start
}

fn end_grid_date(last: NaiveDate) -> NaiveDate {
  let mut end = last;

  while end.weekday() != Weekday::Sat {
    end = end.succ_opt().unwrap_or(end);
  }

  end
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn record(day: &str, items: &[&str]) -> DayRecord<String> {
    DayRecord {
      date: day.to_string(),
      items: items.iter().map(ToString::to_string).collect(),
    }
  }

  fn in_month_cells(weeks: &[CalendarWeek<String>]) -> Vec<&CalendarDay<String>> {
    weeks.iter().flatten().filter(|day| day.is_current_month).collect()
  }

  #[test]
  fn grid_is_whole_weeks() {
    let weeks = generate_weeks::<String>(2025, 7, &[], None);

    assert!(!weeks.is_empty());
    let cells: usize = weeks.iter().map(|week| week.len()).sum();
    assert_eq!(cells % 7, 0);
    // August 2025 starts on a Friday and ends on a Sunday: 6 rows.
    assert_eq!(weeks.len(), 6);
    assert_eq!(in_month_cells(&weeks).len(), 31);
  }

  #[test]
  fn leap_year_february_has_29_cells() {
    let weeks = generate_weeks::<String>(2024, 1, &[], None);

    assert_eq!(in_month_cells(&weeks).len(), 29);
  }

  #[test]
  fn non_leap_february_has_28_cells() {
    let weeks = generate_weeks::<String>(2025, 1, &[], None);

    assert_eq!(in_month_cells(&weeks).len(), 28);
  }

  #[test]
  fn grid_starts_sunday_and_ends_saturday() {
    // July 2025: the 1st is a Tuesday, the 31st a Thursday.
    let weeks = generate_weeks::<String>(2025, 6, &[], None);

    let first_row = &weeks[0];
    assert!(!first_row[0].is_current_month);
    assert!(!first_row[1].is_current_month);
    assert_eq!(first_row[2].day, 1);

    let last_row = weeks.last().unwrap();
    assert_eq!(last_row[4].day, 31);
    assert!(!last_row[5].is_current_month);
    assert!(!last_row[6].is_current_month);
  }

  #[test]
  fn padding_cells_are_empty() {
    let weeks = generate_weeks::<String>(2025, 7, &[], None);

    for day in weeks.iter().flatten().filter(|day| !day.is_current_month) {
      assert_eq!(day.day, 0);
      assert_eq!(day.date, "");
      assert!(!day.is_today);
      assert!(!day.is_selected);
      assert_eq!(day.item_count, 0);
      assert!(day.items.is_empty());
    }
  }

  #[test]
  fn items_associate_by_exact_date() {
    let records = vec![record("2025-08-15", &["x", "y"])];
    let weeks = generate_weeks(2025, 7, &records, None);

    for day in weeks.iter().flatten() {
      if day.date == "2025-08-15" {
        assert_eq!(day.item_count, 2);
        assert_eq!(day.items, vec!["x".to_string(), "y".to_string()]);
      } else {
        assert_eq!(day.item_count, 0);
      }
    }
  }

  #[test]
  fn record_without_date_never_associates() {
    let records = vec![record("", &["orphan"]), record("2025-08-02", &["kept"])];
    let weeks = generate_weeks(2025, 7, &records, None);

    let cells = in_month_cells(&weeks);
    let total: usize = cells.iter().map(|day| day.item_count).sum();
    assert_eq!(total, 1);
  }

  #[test]
  fn today_flag_matches_single_cell() {
    let weeks =
      generate_weeks_at::<String>(2025, 7, &[], None, date(2025, 8, 20));

    let today: Vec<_> = weeks.iter().flatten().filter(|day| day.is_today).collect();
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].date, "2025-08-20");
  }

  #[test]
  fn today_in_another_month_flags_nothing() {
    let weeks =
      generate_weeks_at::<String>(2025, 7, &[], None, date(2025, 9, 1));

    assert!(weeks.iter().flatten().all(|day| !day.is_today));
  }

  #[test]
  fn selected_flag_matches_single_cell() {
    let weeks = generate_weeks::<String>(2025, 7, &[], Some("2025-08-10"));

    let selected: Vec<_> = weeks.iter().flatten().filter(|day| day.is_selected).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].date, "2025-08-10");
    assert_eq!(selected[0].day, 10);
  }

  #[test]
  fn month_wraps_around_year_boundaries() {
    assert_eq!(previous_month(0, 2025), (11, 2024));
    assert_eq!(next_month(11, 2025), (0, 2026));
    assert_eq!(previous_month(5, 2025), (4, 2025));
    assert_eq!(next_month(5, 2025), (6, 2025));
  }

  #[test]
  fn month_names_cover_the_year() {
    assert_eq!(month_name(0), Some("January"));
    assert_eq!(month_name(11), Some("December"));
    assert_eq!(month_name(12), None);
  }

  #[test]
  fn invalid_month_yields_empty_grid() {
    assert!(generate_weeks::<String>(2025, 12, &[], None).is_empty());
  }

  #[test]
  fn counts_and_lookups() {
    let records = vec![
      record("2025-08-01", &["a"]),
      record("2025-08-15", &["b", "c"]),
    ];

    assert_eq!(total_item_count(&records), 3);
    assert_eq!(total_item_count::<String>(&[]), 0);
    assert_eq!(items_for_date("2025-08-15", &records).len(), 2);
    assert!(items_for_date("2025-08-16", &records).is_empty());
  }
}
