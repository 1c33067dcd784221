use super::source::TelemetrySource;
use super::{AirQualityBand, Co2Status, Downstream, SensorInfo, TelemetrySnapshot};
use crate::app_config::SensorConfig;
use log::{debug, warn};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QueryError {
    #[error("no data available")]
    NoDataAvailable,
}

pub(crate) struct SensorPoller {
    info: SensorInfo,
    snapshot: Arc<Mutex<Option<TelemetrySnapshot>>>,
    task: JoinHandle<()>,
}

impl SensorPoller {
    pub(crate) fn spawn(
        config: SensorConfig,
        source: Arc<dyn TelemetrySource>,
        downstream: Arc<dyn Downstream>,
    ) -> Self {
        let info = SensorInfo::new(&config.name, &config.endpoint);
        downstream.register(&info);

        let snapshot = Arc::new(Mutex::new(None));
        let task = tokio::spawn(refresh_cycle(
            info.clone(),
            config.polling_interval(),
            source,
            downstream,
            snapshot.clone(),
        ));

        Self {
            info,
            snapshot,
            task,
        }
    }

    pub(crate) fn info(&self) -> &SensorInfo {
        &self.info
    }

    pub(crate) fn air_quality(&self) -> Result<AirQualityBand, QueryError> {
        Ok(AirQualityBand::from_pm25_density(self.current()?.pm25_density))
    }

    pub(crate) fn pm25_density(&self) -> Result<f64, QueryError> {
        Ok(self.current()?.pm25_density)
    }

    pub(crate) fn temperature(&self) -> Result<f64, QueryError> {
        Ok(self.current()?.temperature_celsius)
    }

    pub(crate) fn co2_level(&self) -> Result<f64, QueryError> {
        Ok(self.current()?.co2_level)
    }

    pub(crate) fn co2_status(&self) -> Result<Co2Status, QueryError> {
        Ok(Co2Status::from_ppm(self.current()?.co2_level))
    }

    pub(crate) fn humidity(&self) -> Result<f64, QueryError> {
        Ok(self.current()?.relative_humidity_pct)
    }

    // An in-flight fetch may still complete; its result is discarded along
    // with the aborted task.
    pub(crate) fn stop(&self) {
        self.task.abort();
    }

    fn current(&self) -> Result<TelemetrySnapshot, QueryError> {
        (*self.snapshot.lock().unwrap()).ok_or(QueryError::NoDataAvailable)
    }
}

impl Drop for SensorPoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn refresh_cycle(
    info: SensorInfo,
    interval: Duration,
    source: Arc<dyn TelemetrySource>,
    downstream: Arc<dyn Downstream>,
    snapshot: Arc<Mutex<Option<TelemetrySnapshot>>>,
) {
    loop {
        match source.fetch().await {
            Ok(data) => {
                *snapshot.lock().unwrap() = Some(data);
                debug!("{}: telemetry updated: {:?}", info.name, data);
                push_valid_fields(&info, &data, downstream.as_ref());
            }
            Err(e) => warn!("{}: fetch failed: {e}", info.name),
        }

        // The next fetch is scheduled only once the current one has fully
        // resolved, success or failure. No backoff.
        tokio::time::sleep(interval).await;
    }
}

fn push_valid_fields(info: &SensorInfo, data: &TelemetrySnapshot, downstream: &dyn Downstream) {
    for (field, value) in data.fields() {
        if value.is_finite() {
            downstream.push_value(field, value);
        } else {
            warn!("{}: invalid {field} value: {value}", info.name);
        }
    }

    if data.co2_level.is_finite() {
        downstream.push_co2_status(Co2Status::from_ppm(data.co2_level));
    }

    if data.pm25_density.is_finite() {
        downstream.push_air_quality(AirQualityBand::from_pm25_density(data.pm25_density));
    }
}
