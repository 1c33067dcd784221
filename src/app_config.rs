use serde::Deserialize;
use std::time::Duration;

const DEFAULT_POLLING_INTERVAL_MS: u64 = 60_000;

#[derive(Debug, Deserialize)]
pub(crate) struct Config {
    pub sensors: Vec<SensorConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct SensorConfig {
    pub name: String,
    pub endpoint: String,

    #[serde(default)]
    pub polling_interval_ms: i64,
}

impl SensorConfig {
    // Absent or non-positive intervals resolve to the one minute default.
    pub(crate) fn polling_interval(&self) -> Duration {
        if self.polling_interval_ms <= 0 {
            Duration::from_millis(DEFAULT_POLLING_INTERVAL_MS)
        } else {
            Duration::from_millis(self.polling_interval_ms as u64)
        }
    }

    pub(crate) fn validate(&self) -> anyhow::Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("sensor name must not be empty");
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            anyhow::bail!(
                "sensor {}: endpoint must start with http:// or https://",
                self.name
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn interval_defaults_when_absent() {
        let config: SensorConfig = serde_json::from_str(
            r#"{"name": "office", "endpoint": "http://x/metrics"}"#,
        )
        .unwrap();

        assert_eq!(config.polling_interval(), Duration::from_millis(60_000));
    }

    #[test]
    fn non_positive_interval_defaults() {
        let mut config = SensorConfig {
            name: "office".into(),
            endpoint: "http://x/metrics".into(),
            polling_interval_ms: 0,
        };
        assert_eq!(config.polling_interval(), Duration::from_millis(60_000));

        config.polling_interval_ms = -5;
        assert_eq!(config.polling_interval(), Duration::from_millis(60_000));
    }

    #[test]
    fn positive_interval_is_used() {
        let config = SensorConfig {
            name: "office".into(),
            endpoint: "http://x/metrics".into(),
            polling_interval_ms: 1000,
        };

        assert_eq!(config.polling_interval(), Duration::from_millis(1000));
    }

    #[test]
    fn validate_rejects_empty_name() {
        let config = SensorConfig {
            name: "  ".into(),
            endpoint: "http://x/metrics".into(),
            polling_interval_ms: 1000,
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_http_endpoint() {
        let config = SensorConfig {
            name: "office".into(),
            endpoint: "x.local/metrics".into(),
            polling_interval_ms: 1000,
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_accepts_http_and_https() {
        for endpoint in ["http://x.local/metrics", "https://x.local/metrics"] {
            let config = SensorConfig {
                name: "office".into(),
                endpoint: endpoint.into(),
                polling_interval_ms: 1000,
            };

            assert!(config.validate().is_ok());
        }
    }
}
