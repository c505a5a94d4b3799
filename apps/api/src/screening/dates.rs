//! Calendar-month spans and interval-union arithmetic over experience periods.
//!
//! Spans are whole calendar months: `(end.year - start.year) * 12 +
//! (end.month - start.month)`, floored at 0. Day-of-month is ignored.
//!
//! End-date policy: an explicit end date always wins. An absent end date
//! resolves to `now` regardless of the `ongoing` flag; the flag is an
//! annotation, not the resolution rule. The absent-end-and-not-ongoing case
//! is logged as a warning because it usually means the extraction missed a
//! date.

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::models::candidate::Experience;

/// Parses an ISO-ish date: `YYYY-MM-DD`, `YYYY-MM` or bare `YYYY`.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
        return Some(d);
    }
    NaiveDate::parse_from_str(&format!("{s}-01-01"), "%Y-%m-%d").ok()
}

/// Whole calendar months between `start` and the resolved end date,
/// floored at 0. Returns 0 when `start` cannot be parsed.
pub fn months_between(start: &str, end: Option<&str>, ongoing: bool, now: NaiveDate) -> u32 {
    let Some(start_date) = parse_iso_date(start) else {
        warn!(start, "unparseable start date, counting 0 months");
        return 0;
    };
    let end_date = match end.and_then(parse_iso_date) {
        Some(d) => d,
        None => {
            if !ongoing && end.is_none() {
                warn!(start, "experience has no end date and is not ongoing, assuming now");
            }
            now
        }
    };
    span_months(start_date, end_date)
}

/// Total months covered by the union of the given experience periods.
/// Overlapping periods are merged (never double-counted); gaps between
/// periods contribute nothing. Open periods end at `now`.
pub fn union_months(experiences: &[Experience], now: NaiveDate) -> u32 {
    let mut spans: Vec<(NaiveDate, NaiveDate)> = experiences
        .iter()
        .filter_map(|exp| {
            let start = parse_iso_date(&exp.start)?;
            let end = exp
                .end
                .as_deref()
                .and_then(parse_iso_date)
                .unwrap_or(now);
            Some((start, end.max(start)))
        })
        .collect();

    spans.sort_by_key(|(start, _)| *start);

    let mut total = 0u32;
    let mut current: Option<(NaiveDate, NaiveDate)> = None;
    for (start, end) in spans {
        match current {
            Some((cur_start, cur_end)) if start <= cur_end => {
                current = Some((cur_start, cur_end.max(end)));
            }
            Some((cur_start, cur_end)) => {
                total += span_months(cur_start, cur_end);
                current = Some((start, end));
            }
            None => current = Some((start, end)),
        }
    }
    if let Some((start, end)) = current {
        total += span_months(start, end);
    }
    total
}

fn span_months(start: NaiveDate, end: NaiveDate) -> u32 {
    let months = (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32);
    months.max(0) as u32
}
