pub(crate) mod poller;
pub(crate) mod source;

use serde::Deserialize;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

// Inclusive upper bound of each band, evaluated in ascending order.
const PM25_EXCELLENT_MAX: f64 = 12.0;
const PM25_GOOD_MAX: f64 = 35.4;
const PM25_FAIR_MAX: f64 = 55.4;
const PM25_INFERIOR_MAX: f64 = 150.4;

// Normal/abnormal CO2 cutoff in ppm.
const CO2_NORMAL_MAX_PPM: f64 = 1200.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub(crate) struct TelemetrySnapshot {
    #[serde(rename = "pm02")]
    pub pm25_density: f64,

    #[serde(rename = "rco2")]
    pub co2_level: f64,

    #[serde(rename = "atmp")]
    pub temperature_celsius: f64,

    #[serde(rename = "rhum")]
    pub relative_humidity_pct: f64,
}

impl TelemetrySnapshot {
    pub(crate) fn fields(&self) -> [(TelemetryField, f64); 4] {
        [
            (TelemetryField::Pm25Density, self.pm25_density),
            (TelemetryField::Co2Level, self.co2_level),
            (TelemetryField::TemperatureCelsius, self.temperature_celsius),
            (TelemetryField::RelativeHumidityPct, self.relative_humidity_pct),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TelemetryField {
    Pm25Density,
    Co2Level,
    TemperatureCelsius,
    RelativeHumidityPct,
}

impl TelemetryField {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Pm25Density => "pm25_density",
            Self::Co2Level => "co2_level",
            Self::TemperatureCelsius => "temperature_celsius",
            Self::RelativeHumidityPct => "relative_humidity_pct",
        }
    }
}

impl fmt::Display for TelemetryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum AirQualityBand {
    Excellent,
    Good,
    Fair,
    Inferior,
    Poor,
}

impl AirQualityBand {
    pub(crate) fn from_pm25_density(value: f64) -> Self {
        // A non-finite value fails every comparison and lands on Poor.
        if value <= PM25_EXCELLENT_MAX {
            Self::Excellent
        } else if value <= PM25_GOOD_MAX {
            Self::Good
        } else if value <= PM25_FAIR_MAX {
            Self::Fair
        } else if value <= PM25_INFERIOR_MAX {
            Self::Inferior
        } else {
            Self::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Co2Status {
    Normal,
    Abnormal,
}

impl Co2Status {
    pub(crate) fn from_ppm(value: f64) -> Self {
        if value <= CO2_NORMAL_MAX_PPM {
            Self::Normal
        } else {
            Self::Abnormal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SensorInfo {
    pub id: String,
    pub name: String,
    pub endpoint: String,
}

impl SensorInfo {
    pub(crate) fn new(name: &str, endpoint: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        endpoint.hash(&mut hasher);

        Self {
            id: format!("{:016x}", hasher.finish()),
            name: name.to_string(),
            endpoint: endpoint.to_string(),
        }
    }
}

pub(crate) trait Downstream: Send + Sync {
    fn register(&self, sensor: &SensorInfo);
    fn push_value(&self, field: TelemetryField, value: f64);
    fn push_air_quality(&self, band: AirQualityBand);
    fn push_co2_status(&self, status: Co2Status);
}
