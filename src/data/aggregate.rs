//! Forecast aggregation
//!
//! Turns a decoded API response into the simplified hourly and daily
//! forecasts. The 3-hour variant is bucketed by calendar day locally; the
//! one-call variant is already split by the API and is only projected.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::weather::{
    OneCallResponse, RawCondition, RawDaily, RawHourly, RawSample, ThreeHourResponse,
};
use super::{ApiVariant, DailySummary, Forecasts, HourlyPoint, RawForecast, MAX_DAYS};

/// Time marker of the sample preferred as a day's representative
const MIDDAY_MARKER: &str = "12:00:00";

/// A 3-hour sample with every field the aggregator needs present
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub dt: i64,
    pub dt_txt: String,
    pub temp: f64,
    pub humidity: u8,
    pub temp_min: f64,
    pub temp_max: f64,
    pub icon: String,
    pub description: String,
}

impl Sample {
    /// Validate a raw sample, returning `None` if a required field is missing
    pub fn from_raw(raw: &RawSample) -> Option<Self> {
        let main = raw.main.as_ref()?;
        let (icon, description) = first_condition(raw.weather.as_deref());
        Some(Self {
            dt: raw.dt?,
            dt_txt: raw.dt_txt.clone()?,
            temp: main.temp?,
            humidity: humidity_percent(main.humidity?),
            temp_min: main.temp_min?,
            temp_max: main.temp_max?,
            icon,
            description,
        })
    }

    /// Date portion (YYYY-MM-DD) of the formatted timestamp
    pub fn date_key(&self) -> &str {
        self.dt_txt.get(..10).unwrap_or(&self.dt_txt)
    }

    fn to_hourly(&self) -> HourlyPoint {
        HourlyPoint {
            dt: self.dt,
            temp: self.temp,
            humidity: self.humidity,
            icon: self.icon.clone(),
        }
    }
}

/// Samples sharing one calendar date, in encounter order
#[derive(Debug, Clone)]
pub struct DayBucket<'a> {
    /// Date key (YYYY-MM-DD)
    pub date: &'a str,
    pub samples: Vec<&'a Sample>,
    pub temp_min: Vec<f64>,
    pub temp_max: Vec<f64>,
}

impl<'a> DayBucket<'a> {
    fn new(date: &'a str) -> Self {
        Self {
            date,
            samples: Vec::new(),
            temp_min: Vec::new(),
            temp_max: Vec::new(),
        }
    }

    fn push(&mut self, sample: &'a Sample) {
        self.temp_min.push(sample.temp_min);
        self.temp_max.push(sample.temp_max);
        self.samples.push(sample);
    }

    /// Sample supplying the day's icon, summary and timestamp
    ///
    /// The midday sample if there is one, otherwise the sample at the lower
    /// midpoint of the bucket.
    pub fn representative(&self) -> Option<&'a Sample> {
        self.samples
            .iter()
            .copied()
            .find(|s| s.dt_txt.contains(MIDDAY_MARKER))
            .or_else(|| self.samples.get(self.samples.len() / 2).copied())
            .or_else(|| self.samples.first().copied())
    }

    /// Collapse the bucket into one daily summary
    pub fn summarize(&self) -> Option<DailySummary> {
        let rep = self.representative()?;
        Some(DailySummary {
            dt: rep.dt,
            summary: rep.description.clone(),
            icon: rep.icon.clone(),
            temp_min: self.temp_min.iter().copied().fold(f64::INFINITY, f64::min),
            temp_max: self.temp_max.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

/// Group samples by calendar date, keeping the order dates are first seen
pub fn bucket_by_day(samples: &[Sample]) -> Vec<DayBucket<'_>> {
    let mut buckets: Vec<DayBucket<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for sample in samples {
        let date = sample.date_key();
        let slot = *index.entry(date).or_insert_with(|| {
            buckets.push(DayBucket::new(date));
            buckets.len() - 1
        });
        buckets[slot].push(sample);
    }

    buckets
}

/// Aggregate a decoded response of either variant
pub fn aggregate(raw: &RawForecast) -> Forecasts {
    match raw {
        RawForecast::ThreeHour(response) => aggregate_three_hour(response),
        RawForecast::OneCall(response) => aggregate_one_call(response),
    }
}

/// Aggregate a flat list of 3-hour samples
///
/// Hourly output is the first two samples. Daily output buckets the samples
/// by date and summarizes the first five days. A missing or empty list gives
/// empty forecasts.
pub fn aggregate_three_hour(response: &ThreeHourResponse) -> Forecasts {
    let raw = response.list.as_deref().unwrap_or_default();
    let samples: Vec<Sample> = raw.iter().filter_map(Sample::from_raw).collect();
    log_dropped(raw.len(), samples.len());

    if samples.is_empty() {
        return Forecasts::default();
    }

    let hourly_forecast = samples
        .iter()
        .take(ApiVariant::ThreeHour.hourly_slots())
        .map(Sample::to_hourly)
        .collect();

    let buckets = bucket_by_day(&samples);
    debug!(
        samples = samples.len(),
        days = buckets.len(),
        "Bucketed forecast samples"
    );

    let daily_forecast = buckets
        .iter()
        .take(MAX_DAYS)
        .filter_map(DayBucket::summarize)
        .collect();

    Forecasts {
        hourly_forecast,
        daily_forecast,
    }
}

/// Project the pre-split one-call arrays
pub fn aggregate_one_call(response: &OneCallResponse) -> Forecasts {
    let hourly = response.hourly.as_deref().unwrap_or_default();
    let daily = response.daily.as_deref().unwrap_or_default();

    let hourly_forecast: Vec<HourlyPoint> =
        hourly.iter().filter_map(project_hourly).collect();
    log_dropped(hourly.len(), hourly_forecast.len());

    let daily_forecast: Vec<DailySummary> = daily.iter().filter_map(project_daily).collect();
    log_dropped(daily.len(), daily_forecast.len());

    Forecasts {
        hourly_forecast: hourly_forecast
            .into_iter()
            .take(ApiVariant::OneCall.hourly_slots())
            .collect(),
        daily_forecast: daily_forecast.into_iter().take(MAX_DAYS).collect(),
    }
}

fn project_hourly(raw: &RawHourly) -> Option<HourlyPoint> {
    let (icon, _) = first_condition(raw.weather.as_deref());
    Some(HourlyPoint {
        dt: raw.dt?,
        temp: raw.temp?,
        humidity: humidity_percent(raw.humidity?),
        icon,
    })
}

fn project_daily(raw: &RawDaily) -> Option<DailySummary> {
    let temp = raw.temp.as_ref()?;
    let (icon, description) = first_condition(raw.weather.as_deref());
    Some(DailySummary {
        dt: raw.dt?,
        summary: raw.summary.clone().unwrap_or(description),
        icon,
        temp_min: temp.min?,
        temp_max: temp.max?,
    })
}

/// Icon and description of the first weather condition, empty if absent
fn first_condition(weather: Option<&[RawCondition]>) -> (String, String) {
    let first = weather.and_then(<[RawCondition]>::first);
    (
        first.and_then(|c| c.icon.clone()).unwrap_or_default(),
        first.and_then(|c| c.description.clone()).unwrap_or_default(),
    )
}

fn humidity_percent(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

fn log_dropped(total: usize, kept: usize) {
    if kept < total {
        warn!(dropped = total - kept, total, "Skipping incomplete forecast entries");
    }
}
