use chrono::{Datelike as _, Days, NaiveDate};
use serde::Deserialize;
use ureq::Agent;
use url::Url;

use crate::calendar::{DayRecord, DATE_FORMAT};

/// One model upload as reported by the backend.
///
/// The backend is inconsistent about key casing, so the fields carry the
/// aliases seen in the wild and are normalized here once, at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadRecord {
  #[serde(alias = "Id", alias = "ID")]
  pub id: String,
  #[serde(alias = "Name", alias = "modelName")]
  pub name: String,
  #[serde(alias = "UploadDate", alias = "uploadDate", default)]
  pub date: String,
}

/// Fetches the month's uploads and groups them into per-date records.
///
/// # Errors
/// Returns an error if the request or the JSON decoding fails.
pub fn fetch_month(
  agent: &Agent,
  base_url: &Url,
  year: i32,
  month0: u32,
) -> Result<Vec<DayRecord<UploadRecord>>, Error> {
  let url = format!(
    "{}/uploads?year={}&month={}",
    base_url.as_str().trim_end_matches('/'),
    year,
    month0 + 1,
  );

  let uploads: Vec<UploadRecord> = agent.get(&url).call()?.into_json()?;

  Ok(group_by_date(uploads))
}

/// Groups flat upload records into one `DayRecord` per date, preserving the
/// order the backend returned them in. Uploads without a date end up in a
/// record the calendar never matches.
pub fn group_by_date(uploads: Vec<UploadRecord>) -> Vec<DayRecord<UploadRecord>> {
  let mut records: Vec<DayRecord<UploadRecord>> = Vec::new();

  for upload in uploads {
    match records.iter_mut().find(|record| record.date == upload.date) {
      Some(record) => record.items.push(upload),
      None => records.push(DayRecord {
        date: upload.date.clone(),
        items: vec![upload],
      }),
    }
  }

  records
}

/// Locally generated stand-in month for when the backend is unreachable.
pub fn sample_month(year: i32, month0: u32) -> Vec<DayRecord<UploadRecord>> {
  let Some(first) = NaiveDate::from_ymd_opt(year, month0.saturating_add(1), 1) else {
    return Vec::new();
  };

  let mut records = Vec::new();

  for (offset, count) in [(2, 2), (7, 1), (16, 3), (23, 1)] {
    let Some(date) = first.checked_add_days(Days::new(offset)) else {
      continue;
    };
    if date.month0() != month0 {
      continue;
    }

    let date_str = date.format(DATE_FORMAT).to_string();
    let items = (0..count)
      .map(|i| UploadRecord {
        id: format!("sample-{date_str}-{i}"),
        name: format!("model-v{}", i + 1),
        date: date_str.clone(),
      })
      .collect();

    records.push(DayRecord {
      date: date_str,
      items,
    });
  }

  records
}

/// Errors that may occur while fetching uploads.
#[derive(Debug)]
pub struct Error {
  pub kind: ErrorKind,
  pub message: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ErrorKind {
  Http,
  Decoding,
}

impl From<ureq::Error> for Error {
  fn from(e: ureq::Error) -> Self {
    Self {
      kind: ErrorKind::Http,
      message: format!("{e:?}"),
    }
  }
}

impl From<std::io::Error> for Error {
  fn from(e: std::io::Error) -> Self {
    Self {
      kind: ErrorKind::Decoding,
      message: e.to_string(),
    }
  }
}
