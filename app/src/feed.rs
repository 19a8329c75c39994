// In app/src/feed.rs

//! Historical bar files replayed through the engine.
//!
//! Expected header: `time,open,high,low,close,volume`. `time` is either epoch
//! milliseconds or a `YYYY-MM-DD` date (taken as midnight UTC). Only `time`
//! and `close` are required; missing prices default to the close.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use core_types::Kline;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct BarRow {
    time: String,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: f64,
    volume: Option<f64>,
}

fn parse_time(raw: &str) -> Result<i64> {
    let raw = raw.trim();
    if let Ok(millis) = raw.parse::<i64>() {
        return Ok(millis);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid time value {raw:?}"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .with_context(|| format!("invalid date {raw:?}"))?;
    Ok(midnight.and_utc().timestamp_millis())
}

impl BarRow {
    fn into_kline(self) -> Result<Kline> {
        if !self.close.is_finite() {
            bail!("non-finite close {}", self.close);
        }
        Ok(Kline {
            open_time: parse_time(&self.time)?,
            open: self.open.unwrap_or(self.close),
            high: self.high.unwrap_or(self.close),
            low: self.low.unwrap_or(self.close),
            close: self.close,
            volume: self.volume.unwrap_or_default(),
        })
    }
}

/// Reads every bar from a CSV file, in file order.
pub fn load_bars(path: &Path) -> Result<Vec<Kline>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut bars = Vec::new();
    for (line, row) in reader.deserialize::<BarRow>().enumerate() {
        let bar = row
            .map_err(anyhow::Error::from)
            .and_then(BarRow::into_kline)
            .with_context(|| format!("{}: bad record {}", path.display(), line + 1))?;
        bars.push(bar);
    }
    tracing::debug!(path = %path.display(), count = bars.len(), "Loaded bars.");
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bars.csv");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn reads_millisecond_timestamps() {
        let (_dir, path) = write_csv("time,open,high,low,close,volume\n1000,1,2,0.5,1.5,10\n2000,1.5,1.6,1.4,1.55,12\n");
        let bars = load_bars(&path).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].open_time, 1000);
        assert_eq!(bars[0].high, 2.0);
        assert_eq!(bars[1].close, 1.55);
        assert_eq!(bars[1].volume, 12.0);
    }

    #[test]
    fn reads_dates_and_close_only_rows() {
        let (_dir, path) = write_csv("time,close\n2024-01-02,100.5\n2024-01-03,101\n");
        let bars = load_bars(&path).unwrap();
        assert_eq!(bars[0].open_time, 1_704_153_600_000);
        assert_eq!(bars[1].open_time - bars[0].open_time, 86_400_000);
        assert_eq!(bars[0].open, 100.5);
        assert_eq!(bars[0].low, 100.5);
    }

    #[test]
    fn bad_time_names_the_record() {
        let (_dir, path) = write_csv("time,close\n2024-01-02,100\nyesterday,101\n");
        let err = load_bars(&path).unwrap_err();
        assert!(format!("{err:#}").contains("bad record 2"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_bars(Path::new("/definitely/not/here.csv")).is_err());
    }
}
