use chrono::{Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// A date range like "Jan 2019 - Mar 2021", "2019–2021" or "2019 to present".
/// Capture groups: start month, start year, end month, end year, open-ended
/// marker.
static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+)?((?:19|20)\d{2})\s*(?:-|–|—|to|until|till)\s*(?:(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+)?(?:((?:19|20)\d{2})|(present|current|now|today|date))\b",
    )
    .unwrap()
});

static INTERNSHIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(intern|internship|trainee|training)\b").unwrap());

/// Sums total years of non-internship work experience from date-range
/// entries.
///
/// An entry is the block of lines around one date-range line, including the
/// role-title line directly above it, up to (not including) the next entry.
/// Entries mentioning intern/internship/trainee/training as whole words are
/// excluded. Qualifying ranges are merged as month
/// intervals before summing, so concurrent roles are never double-counted.
pub struct ExperienceCalculator {
    reference: NaiveDate,
}

impl ExperienceCalculator {
    /// Open-ended ranges ("present", "till date") resolve against today.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reference: Utc::now().date_naive(),
        }
    }

    /// Pin the date open-ended ranges resolve against, for deterministic
    /// output.
    #[must_use]
    pub const fn with_reference(reference: NaiveDate) -> Self {
        Self { reference }
    }

    #[must_use]
    pub fn is_internship_entry(text: &str) -> bool {
        INTERNSHIP_RE.is_match(text)
    }

    /// Total non-internship experience in fractional years, `0.0` when no
    /// qualifying entries are found. Never negative.
    #[must_use]
    pub fn total_years(&self, text: &str) -> f64 {
        let mut intervals: Vec<(i32, i32)> = Vec::new();

        for block in entry_blocks(text) {
            if Self::is_internship_entry(&block) {
                tracing::debug!("Excluding internship entry: {}", block.lines().next().unwrap_or(""));
                continue;
            }
            for caps in RANGE_RE.captures_iter(&block) {
                let start = months_from(
                    caps.get(2).map(|m| m.as_str()),
                    caps.get(1).map(|m| m.as_str()),
                );
                let end = if caps.get(5).is_some() {
                    Some(self.reference.year() * 12 + self.reference.month0() as i32)
                } else {
                    months_from(
                        caps.get(4).map(|m| m.as_str()),
                        caps.get(3).map(|m| m.as_str()),
                    )
                };
                if let (Some(start), Some(end)) = (start, end) {
                    if end > start {
                        intervals.push((start, end));
                    }
                }
            }
        }

        let months: i32 = merge_intervals(intervals).iter().map(|(s, e)| e - s).sum();
        f64::from(months) / 12.0
    }
}

impl Default for ExperienceCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Split text into entry blocks around date-range lines. A block claims the
/// line directly above its range line when that line is free (the usual
/// "role title above dates" layout), then runs until the next block.
fn entry_blocks(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let starts: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| RANGE_RE.is_match(l))
        .map(|(i, _)| i)
        .collect();

    let begins: Vec<usize> = starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let floor = if n == 0 { 0 } else { starts[n - 1] + 1 };
            if start > floor {
                start - 1
            } else {
                start
            }
        })
        .collect();

    begins
        .iter()
        .enumerate()
        .map(|(n, &begin)| {
            let end = begins.get(n + 1).copied().unwrap_or(lines.len());
            lines[begin..end].join("\n")
        })
        .collect()
}

/// Absolute month index for a year + optional month name. A missing month
/// defaults to January, so bare year ranges measure year-to-year.
fn months_from(year: Option<&str>, month: Option<&str>) -> Option<i32> {
    let year: i32 = year?.parse().ok()?;
    let month0 = month.map_or(0, month_index);
    Some(year * 12 + month0)
}

fn month_index(name: &str) -> i32 {
    match name.to_lowercase().as_str() {
        "feb" => 1,
        "mar" => 2,
        "apr" => 3,
        "may" => 4,
        "jun" => 5,
        "jul" => 6,
        "aug" => 7,
        "sep" => 8,
        "oct" => 9,
        "nov" => 10,
        "dec" => 11,
        _ => 0,
    }
}

fn merge_intervals(mut intervals: Vec<(i32, i32)>) -> Vec<(i32, i32)> {
    intervals.sort_unstable();
    let mut merged: Vec<(i32, i32)> = Vec::with_capacity(intervals.len());

    for (start, end) in intervals {
        match merged.last_mut() {
            Some((_, last_end)) if start <= *last_end => *last_end = (*last_end).max(end),
            _ => merged.push((start, end)),
        }
    }

    merged
}
