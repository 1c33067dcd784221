mod app_config;
mod sensor;

use clap::Parser;
use log::{debug, info, warn};
use sensor::poller::{QueryError, SensorPoller};
use sensor::source::HttpSource;
use sensor::{AirQualityBand, Co2Status, Downstream, SensorInfo, TelemetryField};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(version = env!("VERSION"), about)]
struct Cli {
    /// Configuration file
    #[arg(short, long)]
    config: String,
}

struct LogDownstream;

impl Downstream for LogDownstream {
    fn register(&self, sensor: &SensorInfo) {
        info!(
            "Registered sensor {} ({}) for endpoint {}",
            sensor.name, sensor.id, sensor.endpoint
        );
    }

    fn push_value(&self, field: TelemetryField, value: f64) {
        debug!("Pushed {field} = {value}");
    }

    fn push_air_quality(&self, band: AirQualityBand) {
        debug!("Pushed air quality {band:?}");
    }

    fn push_co2_status(&self, status: Co2Status) {
        debug!("Pushed CO2 status {status:?}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    env_logger::init();

    let config = config::Config::builder()
        .add_source(config::File::with_name(&args.config))
        .build()?;
    let config = config.try_deserialize::<app_config::Config>()?;
    debug!("Sensor config: {:#?}", config.sensors);

    for sensor in &config.sensors {
        sensor.validate()?;
    }

    let downstream: Arc<dyn Downstream> = Arc::new(LogDownstream);

    let pollers: Vec<SensorPoller> = config
        .sensors
        .into_iter()
        .map(|config| {
            let source = Arc::new(HttpSource::new(&config.endpoint));
            SensorPoller::spawn(config, source, downstream.clone())
        })
        .collect();

    info!("Started {} sensor poller(s)", pollers.len());

    let mut report_interval = tokio::time::interval(Duration::from_secs(60));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Exiting");
                break;
            }
            _ = report_interval.tick() => {
                report_current_readings(&pollers);
            }
        };
    }

    for poller in &pollers {
        poller.stop();
    }

    Ok(())
}

fn report_current_readings(pollers: &[SensorPoller]) {
    for poller in pollers {
        let name = &poller.info().name;
        match current_reading_line(poller) {
            Ok(line) => info!("{name}: {line}"),
            Err(QueryError::NoDataAvailable) => warn!("{name}: no data available yet"),
        }
    }
}

fn current_reading_line(poller: &SensorPoller) -> Result<String, QueryError> {
    Ok(format!(
        "air quality {:?}, PM2.5 {} ug/m3, CO2 {} ppm ({:?}), temperature {} C, humidity {} %",
        poller.air_quality()?,
        poller.pm25_density()?,
        poller.co2_level()?,
        poller.co2_status()?,
        poller.temperature()?,
        poller.humidity()?,
    ))
}
