//! Daily forecast aggregation.
//!
//! The provider returns 3-hour samples covering up to five days. They are
//! folded into one summary per day label, in the order each label first
//! appears, and cut to the first [`MAX_FORECAST_DAYS`] days.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Local, Locale, Utc};

use crate::types::{DailySummary, ForecastSample};

/// Number of days shown in the forecast row
pub const MAX_FORECAST_DAYS: usize = 3;

/// Locale names day labels can be rendered in
pub const SUPPORTED_LOCALES: &[(&str, Locale)] = &[
    ("fr_FR", Locale::fr_FR),
    ("en_US", Locale::en_US),
    ("en_GB", Locale::en_GB),
    ("de_DE", Locale::de_DE),
    ("es_ES", Locale::es_ES),
    ("it_IT", Locale::it_IT),
];

/// Maps a sample timestamp to the label of the day it belongs to.
///
/// Samples with equal labels are merged, so the formatter's timezone decides
/// where one day ends and the next begins.
pub trait DayFormatter {
    fn day_label(&self, timestamp: i64) -> String;
}

impl<F> DayFormatter for F
where
    F: Fn(i64) -> String,
{
    fn day_label(&self, timestamp: i64) -> String {
        self(timestamp)
    }
}

#[derive(Debug, Clone, Copy)]
enum DayZone {
    Local,
    Fixed(FixedOffset),
}

/// Short weekday names ("lun.", "Mon", ...) in a given locale and timezone.
#[derive(Debug, Clone, Copy)]
pub struct WeekdayFormatter {
    locale: Locale,
    zone: DayZone,
}

impl WeekdayFormatter {
    /// Build a formatter for `locale` (e.g. "fr_FR").
    ///
    /// `utc_offset_seconds` pins the timezone; `None` uses the device's local
    /// timezone. Unknown locales fall back to `en_US`, out-of-range offsets to
    /// the local timezone.
    pub fn new(locale: &str, utc_offset_seconds: Option<i32>) -> Self {
        let locale = Self::locale_from_name(locale).unwrap_or_else(|| {
            tracing::warn!("Unsupported locale {}, using en_US", locale);
            Locale::en_US
        });

        let zone = match utc_offset_seconds.map(FixedOffset::east_opt) {
            Some(Some(offset)) => DayZone::Fixed(offset),
            Some(None) => {
                tracing::warn!("UTC offset out of range, using local timezone");
                DayZone::Local
            }
            None => DayZone::Local,
        };

        Self { locale, zone }
    }

    /// Resolve one of the [`SUPPORTED_LOCALES`].
    pub fn locale_from_name(name: &str) -> Option<Locale> {
        SUPPORTED_LOCALES
            .iter()
            .find(|(supported, _)| *supported == name)
            .map(|&(_, locale)| locale)
    }
}

impl DayFormatter for WeekdayFormatter {
    fn day_label(&self, timestamp: i64) -> String {
        // Timestamps chrono can't represent share one empty label
        let Some(utc) = DateTime::<Utc>::from_timestamp(timestamp, 0) else {
            return String::new();
        };

        match self.zone {
            DayZone::Local => utc
                .with_timezone(&Local)
                .format_localized("%a", self.locale)
                .to_string(),
            DayZone::Fixed(offset) => utc
                .with_timezone(&offset)
                .format_localized("%a", self.locale)
                .to_string(),
        }
    }
}

/// Fold forecast samples into at most [`MAX_FORECAST_DAYS`] daily summaries.
///
/// Samples are taken in the given order and never re-sorted. The first sample
/// of a day seeds its min, max and icon; later samples only widen min/max.
/// Only raw samples are accepted: summaries carry no timestamp and can't be
/// fed back in.
pub fn aggregate<F>(samples: &[ForecastSample], formatter: &F) -> Vec<DailySummary>
where
    F: DayFormatter + ?Sized,
{
    let mut days: Vec<DailySummary> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for sample in samples {
        let label = formatter.day_label(sample.timestamp);

        match positions.get(&label).and_then(|&i| days.get_mut(i)) {
            Some(day) => {
                day.min_temperature_c = day.min_temperature_c.min(sample.min_temperature_c);
                day.max_temperature_c = day.max_temperature_c.max(sample.max_temperature_c);
            }
            None => {
                positions.insert(label.clone(), days.len());
                days.push(DailySummary {
                    day_label: label,
                    // A sample reporting min > max still yields min <= max
                    min_temperature_c: sample.min_temperature_c.min(sample.max_temperature_c),
                    max_temperature_c: sample.max_temperature_c.max(sample.min_temperature_c),
                    icon_id: sample.icon_id.clone(),
                });
            }
        }
    }

    days.truncate(MAX_FORECAST_DAYS);
    days
}

/// Aggregator bound to one day formatter
pub struct ForecastAggregator {
    formatter: Box<dyn DayFormatter + Send + Sync>,
}

impl ForecastAggregator {
    pub fn new(formatter: impl DayFormatter + Send + Sync + 'static) -> Self {
        Self {
            formatter: Box::new(formatter),
        }
    }

    pub fn aggregate(&self, samples: &[ForecastSample]) -> Vec<DailySummary> {
        aggregate(samples, self.formatter.as_ref())
    }
}

impl std::fmt::Debug for ForecastAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastAggregator").finish_non_exhaustive()
    }
}
