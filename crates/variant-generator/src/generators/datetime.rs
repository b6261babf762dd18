//! Date and time value generators.
//!
//! Patterns use strftime syntax. `%f` renders microseconds (six digits).

use crate::error::FactoryError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use rand::Rng;
use std::fmt;
use std::fmt::Write as _;

/// Default date patterns: `2025-09-10`, `10/09/2025`, `09-10-2025`,
/// `10 Sep 2025`, `September 10, 2025`, `20250910`.
pub const DEFAULT_DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%Y%m%d",
];

/// Default time patterns: `14:05`, `14:05:33`, `02:05 PM`, `14:05:33.000000`.
pub const DEFAULT_TIME_FORMATS: [&str; 4] = ["%H:%M", "%H:%M:%S", "%I:%M %p", "%H:%M:%S.%f"];

/// Offsets are drawn from whole hours in this range.
pub const OFFSET_HOURS: std::ops::RangeInclusive<i32> = -12..=14;

/// Offset minutes are one of these.
pub const OFFSET_MINUTES: [u32; 4] = [0, 15, 30, 45];

/// A validated, non-empty list of strftime patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatPool {
    kind: &'static str,
    patterns: Vec<String>,
}

impl FormatPool {
    pub fn new<I, S>(kind: &'static str, patterns: I) -> Result<Self, FactoryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut validated = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }
            let normalized = normalize_pattern(pattern);
            // Rendering fails for unknown specifiers and for ones a naive
            // date-time cannot satisfy (`%Z`, `%z`), whatever the instant.
            if render(&default_floor(), &normalized).is_none() {
                return Err(FactoryError::InvalidFormat {
                    kind,
                    pattern: pattern.to_string(),
                });
            }
            validated.push(normalized);
        }
        if validated.is_empty() {
            return Err(FactoryError::EmptyFormatPool(kind));
        }
        Ok(Self {
            kind,
            patterns: validated,
        })
    }

    /// Parse a comma-separated list.
    ///
    /// A comma followed by a space belongs to the pattern (`%B %d, %Y`); any
    /// other comma separates entries.
    pub fn parse(kind: &'static str, list: &str) -> Result<Self, FactoryError> {
        Self::new(kind, split_patterns(list))
    }

    pub fn default_dates() -> Self {
        Self {
            kind: "date",
            patterns: DEFAULT_DATE_FORMATS.iter().map(|p| normalize_pattern(p)).collect(),
        }
    }

    pub fn default_times() -> Self {
        Self {
            kind: "time",
            patterns: DEFAULT_TIME_FORMATS.iter().map(|p| normalize_pattern(p)).collect(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn first(&self) -> &str {
        &self.patterns[0]
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn choose<R: Rng>(&self, rng: &mut R) -> &str {
        &self.patterns[rng.random_range(0..self.patterns.len())]
    }
}

/// Translate a bare `%f` into chrono's microsecond specifier.
fn normalize_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 2);
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '%' {
            match chars.next() {
                Some('f') => out.push_str("6f"),
                Some(next) => out.push(next),
                None => {}
            }
        }
    }
    out
}

fn split_patterns(list: &str) -> Vec<String> {
    let mut patterns = Vec::new();
    let mut current = String::new();
    let mut chars = list.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ',' && chars.peek() != Some(&' ') {
            patterns.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    patterns.push(current);
    patterns
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// The closed interval random instants are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, FactoryError> {
        if end < start {
            return Err(FactoryError::InvalidWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// `2015-01-01T00:00:00` up to `end`.
    pub fn until(end: NaiveDateTime) -> Result<Self, FactoryError> {
        Self::new(default_floor(), end)
    }

    /// Uniform instant in the window, at whole-second resolution.
    ///
    /// The offset from `start` does not depend on the exact window length:
    /// for a given seed, windows whose ends differ by a few seconds yield the
    /// same instants, so runs with the default "until now" window stay
    /// reproducible.
    pub fn random_instant<R: Rng>(&self, rng: &mut R) -> NaiveDateTime {
        let span = (self.end - self.start).num_seconds().max(0) as u64;
        let offset = stable_offset(rng, span);
        self.start + TimeDelta::seconds(offset as i64)
    }
}

/// Uniform draw in `0..=span` by masked rejection sampling.
///
/// A candidate accepted for one span is accepted unchanged for every larger
/// span of the same bit length.
fn stable_offset<R: Rng>(rng: &mut R, span: u64) -> u64 {
    if span == 0 {
        return 0;
    }
    let mask = u64::MAX >> span.leading_zeros();
    loop {
        let candidate = rng.random::<u64>() & mask;
        if candidate <= span {
            return candidate;
        }
    }
}

impl Default for DateWindow {
    /// `2015-01-01T00:00:00` up to the current UTC time.
    fn default() -> Self {
        let now = Utc::now().naive_utc();
        let floor = default_floor();
        Self {
            start: floor,
            end: now.max(floor),
        }
    }
}

fn default_floor() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2015, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Parse an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight).
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, FactoryError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc).naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| FactoryError::InvalidTimestamp(s.to_string()))
}

/// Timezone information appended to a time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneSuffix {
    None,
    Utc,
    Offset { hours: i32, minutes: u32 },
}

impl ZoneSuffix {
    /// `Z` or a numeric offset, 50/50.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            ZoneSuffix::Utc
        } else {
            let hours = rng.random_range(OFFSET_HOURS);
            let minutes = OFFSET_MINUTES[rng.random_range(0..OFFSET_MINUTES.len())];
            ZoneSuffix::Offset { hours, minutes }
        }
    }
}

impl fmt::Display for ZoneSuffix {
    /// The sign follows the hours; a zero-hour offset is always `+`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneSuffix::None => Ok(()),
            ZoneSuffix::Utc => f.write_str("Z"),
            ZoneSuffix::Offset { hours, minutes } => {
                let sign = if *hours >= 0 { '+' } else { '-' };
                write!(f, "{sign}{:02}:{:02}", hours.unsigned_abs(), minutes)
            }
        }
    }
}

/// Render `instant` with a strftime pattern.
///
/// Fails for patterns a naive date-time cannot satisfy, such as the timezone
/// specifiers `%Z`, `%z` and `%:z`.
pub fn format_instant(instant: &NaiveDateTime, pattern: &str) -> Result<String, FactoryError> {
    render(instant, &normalize_pattern(pattern)).ok_or_else(|| FactoryError::InvalidFormat {
        kind: "date/time",
        pattern: pattern.to_string(),
    })
}

fn render(instant: &NaiveDateTime, pattern: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", instant.format(pattern)).ok()?;
    Some(out)
}

/// Render a pattern taken from a [`FormatPool`].
fn render_pooled(instant: &NaiveDateTime, pattern: &str) -> String {
    // Pool patterns passed the same render check in `FormatPool::new`.
    render(instant, pattern).unwrap_or_default()
}

/// A date and a time value for one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeValues {
    pub date: String,
    pub time: String,
}

/// Draw an instant and render it.
///
/// With `vary_formats`, a date and a time pattern are picked uniformly and a
/// timezone suffix is appended half of the time. Without it, the first
/// pattern of each pool is used and no suffix is added.
pub fn generate_date_time<R: Rng>(
    rng: &mut R,
    window: &DateWindow,
    date_formats: &FormatPool,
    time_formats: &FormatPool,
    vary_formats: bool,
) -> DateTimeValues {
    let instant = window.random_instant(rng);

    let (date_fmt, time_fmt, zone) = if vary_formats {
        let date_fmt = date_formats.choose(rng);
        let time_fmt = time_formats.choose(rng);
        let zone = if rng.random_bool(0.5) {
            ZoneSuffix::random(rng)
        } else {
            ZoneSuffix::None
        };
        (date_fmt, time_fmt, zone)
    } else {
        (date_formats.first(), time_formats.first(), ZoneSuffix::None)
    };

    DateTimeValues {
        date: render_pooled(&instant, date_fmt),
        time: format!("{}{}", render_pooled(&instant, time_fmt), zone),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed_window() -> DateWindow {
        DateWindow::until(parse_timestamp("2024-12-31T23:59:59Z").unwrap()).unwrap()
    }

    #[test]
    fn test_split_keeps_comma_space_inside_pattern() {
        let pool = FormatPool::parse("date", " %Y-%m-%d,%B %d, %Y,%Y%m%d ").unwrap();
        assert_eq!(pool.patterns(), &["%Y-%m-%d", "%B %d, %Y", "%Y%m%d"]);
    }

    #[test]
    fn test_default_pools() {
        assert_eq!(FormatPool::default_dates().len(), 6);
        assert_eq!(FormatPool::default_times().len(), 4);
        assert_eq!(FormatPool::default_times().patterns()[3], "%H:%M:%S.%6f");
    }

    #[test]
    fn test_invalid_and_empty_pools() {
        assert!(matches!(
            FormatPool::parse("date", "%Y-%Q"),
            Err(FactoryError::InvalidFormat { .. })
        ));
        assert!(matches!(
            FormatPool::parse("time", " , "),
            Err(FactoryError::EmptyFormatPool("time"))
        ));
    }

    #[test]
    fn test_format_instant() {
        let instant = parse_timestamp("2025-09-10T14:05:33Z").unwrap();
        let dates: Vec<_> = FormatPool::default_dates()
            .patterns()
            .iter()
            .map(|p| format_instant(&instant, p).unwrap())
            .collect();
        assert_eq!(
            dates,
            vec![
                "2025-09-10",
                "10/09/2025",
                "09-10-2025",
                "10 Sep 2025",
                "September 10, 2025",
                "20250910"
            ]
        );

        let times: Vec<_> = FormatPool::default_times()
            .patterns()
            .iter()
            .map(|p| format_instant(&instant, p).unwrap())
            .collect();
        assert_eq!(times, vec!["14:05", "14:05:33", "02:05 PM", "14:05:33.000000"]);
    }

    #[test]
    fn test_zone_suffix_rendering() {
        assert_eq!(ZoneSuffix::None.to_string(), "");
        assert_eq!(ZoneSuffix::Utc.to_string(), "Z");
        assert_eq!(
            ZoneSuffix::Offset {
                hours: 0,
                minutes: 0
            }
            .to_string(),
            "+00:00"
        );
        assert_eq!(
            ZoneSuffix::Offset {
                hours: -9,
                minutes: 30
            }
            .to_string(),
            "-09:30"
        );
        assert_eq!(
            ZoneSuffix::Offset {
                hours: 14,
                minutes: 45
            }
            .to_string(),
            "+14:45"
        );
    }

    #[test]
    fn test_random_offsets_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            if let ZoneSuffix::Offset { hours, minutes } = ZoneSuffix::random(&mut rng) {
                assert!(OFFSET_HOURS.contains(&hours));
                assert!(OFFSET_MINUTES.contains(&minutes));
            }
        }
    }

    #[test]
    fn test_random_instant_in_window() {
        let window = fixed_window();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let instant = window.random_instant(&mut rng);
            assert!(instant >= window.start && instant <= window.end);
            assert!(instant.year() >= 2015 && instant.year() <= 2024);
        }
    }

    #[test]
    fn test_timezone_specifiers_are_rejected() {
        for pattern in ["%H:%M %Z", "%H:%M%z", "%H:%M:%S%:z", "%+"] {
            assert!(
                matches!(
                    FormatPool::parse("time", pattern),
                    Err(FactoryError::InvalidFormat { .. })
                ),
                "{pattern}"
            );
        }

        let instant = parse_timestamp("2025-09-10T14:05:33Z").unwrap();
        assert!(format_instant(&instant, "%H:%M %Z").is_err());
        assert_eq!(format_instant(&instant, "%H:%M:%S.%f").unwrap(), "14:05:33.000000");
    }

    #[test]
    fn test_instants_stable_when_window_end_moves() {
        let end = parse_timestamp("2026-10-16T12:00:00Z").unwrap();
        let earlier = DateWindow::until(end).unwrap();
        let later = DateWindow::until(end + TimeDelta::seconds(5)).unwrap();
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            assert_eq!(
                earlier.random_instant(&mut rng_a),
                later.random_instant(&mut rng_b)
            );
        }
    }

    #[test]
    fn test_zero_length_window() {
        let instant = parse_timestamp("2020-02-29").unwrap();
        let window = DateWindow::new(instant, instant).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(window.random_instant(&mut rng), instant);
    }

    #[test]
    fn test_invalid_window() {
        let start = parse_timestamp("2020-01-01").unwrap();
        let end = parse_timestamp("2019-01-01").unwrap();
        assert!(matches!(
            DateWindow::new(start, end),
            Err(FactoryError::InvalidWindow { .. })
        ));
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_fixed_formats_never_add_zone() {
        let window = fixed_window();
        let dates = FormatPool::default_dates();
        let times = FormatPool::default_times();
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..200 {
            let values = generate_date_time(&mut rng, &window, &dates, &times, false);
            assert_eq!(values.date.len(), 10);
            assert_eq!(values.date.as_bytes()[4], b'-');
            assert_eq!(values.time.len(), 5);
            assert!(!values.time.contains('Z') && !values.time.contains('+'));
        }
    }

    #[test]
    fn test_varied_formats_sometimes_add_zone() {
        let window = fixed_window();
        let dates = FormatPool::default_dates();
        let times = FormatPool::default_times();
        let mut rng = StdRng::seed_from_u64(9);

        let values: Vec<_> = (0..300)
            .map(|_| generate_date_time(&mut rng, &window, &dates, &times, true))
            .collect();
        assert!(values.iter().any(|v| v.time.ends_with('Z')));
        assert!(values
            .iter()
            .any(|v| v.time.contains('+') || v.time.matches('-').count() == 1));
        assert!(values.iter().any(|v| v.date.contains('/')));
    }
}
