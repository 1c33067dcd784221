use super::TelemetrySnapshot;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum FetchError {
    #[error("request failed: {0}")]
    Transport(Box<ureq::Error>),

    #[error("failed to read response body: {0}")]
    Body(#[from] std::io::Error),

    #[error("endpoint returned status {0}")]
    HttpStatus(u16),

    #[error("malformed telemetry body: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[async_trait]
pub(crate) trait TelemetrySource: Send + Sync {
    async fn fetch(&self) -> Result<TelemetrySnapshot, FetchError>;
}

pub(crate) struct HttpSource {
    agent: ureq::Agent,
    endpoint: String,
}

impl HttpSource {
    pub(crate) fn new(endpoint: &str) -> Self {
        // No request timeout is configured; the transport defaults apply.
        let agent = ureq::AgentBuilder::new()
            .user_agent(&format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build();

        Self {
            agent,
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl TelemetrySource for HttpSource {
    async fn fetch(&self) -> Result<TelemetrySnapshot, FetchError> {
        let agent = self.agent.clone();
        let endpoint = self.endpoint.clone();

        tokio::task::spawn_blocking(move || fetch_blocking(&agent, &endpoint)).await?
    }
}

fn fetch_blocking(agent: &ureq::Agent, endpoint: &str) -> Result<TelemetrySnapshot, FetchError> {
    let response = match agent.get(endpoint).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(code, _)) => return Err(FetchError::HttpStatus(code)),
        Err(e) => return Err(FetchError::Transport(Box::new(e))),
    };

    parse_body(&response.into_string()?)
}

fn parse_body(body: &str) -> Result<TelemetrySnapshot, FetchError> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_documented_body() {
        let snapshot = parse_body(r#"{"pm02":4,"rco2":763,"atmp":23.30,"rhum":37}"#).unwrap();

        assert_eq!(snapshot.pm25_density, 4.0);
        assert_eq!(snapshot.co2_level, 763.0);
        assert_eq!(snapshot.temperature_celsius, 23.3);
        assert_eq!(snapshot.relative_humidity_pct, 37.0);
    }

    #[test]
    fn ignores_extra_fields() {
        let snapshot =
            parse_body(r#"{"pm02":4,"rco2":763,"atmp":23.30,"rhum":37,"wifi":-62,"tvoc":112}"#)
                .unwrap();

        assert_eq!(snapshot.pm25_density, 4.0);
    }

    #[test]
    fn missing_field_is_parse_error() {
        let result = parse_body(r#"{"pm02":4,"rco2":763,"atmp":23.30}"#);

        assert!(matches!(result, Err(FetchError::Parse(_))));
    }

    #[test]
    fn non_numeric_field_is_parse_error() {
        let result = parse_body(r#"{"pm02":"four","rco2":763,"atmp":23.30,"rhum":37}"#);

        assert!(matches!(result, Err(FetchError::Parse(_))));
    }

    #[test]
    fn non_json_body_is_parse_error() {
        let result = parse_body("sensor offline");

        assert!(matches!(result, Err(FetchError::Parse(_))));
    }
}
