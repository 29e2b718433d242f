use serde::Deserialize;

/// Number of days in a rendered week row.
pub const WEEK_LENGTH: usize = 7;

/// A week row of the month grid, always exactly seven days.
pub type CalendarWeek<T> = [CalendarDay<T>; WEEK_LENGTH];

/// Backend data for a single date: everything uploaded on that day.
///
/// At most one record exists per date. A record with an empty `date` never
/// matches a grid cell and is silently ignored by the generator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DayRecord<T> {
  #[serde(default)]
  pub date: String,
  #[serde(default)]
  pub items: Vec<T>,
}

/// One cell of the month grid.
///
/// Padding cells (dates outside the rendered month) carry `day = 0`, an empty
/// `date` and no items; they exist only to complete the week row.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay<T> {
  pub day: u32,
  pub date: String,
  pub is_current_month: bool,
  pub is_today: bool,
  pub is_selected: bool,
  pub items: Vec<T>,
  pub item_count: usize,
}

impl<T> CalendarDay<T> {
  pub fn padding() -> Self {
    Self {
      day: 0,
      date: String::new(),
      is_current_month: false,
      is_today: false,
      is_selected: false,
      items: Vec::new(),
      item_count: 0,
    }
  }
}
