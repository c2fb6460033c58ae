//! Landmark service client.
//!
//! The service answers `GET <endpoint>` with
//! `{ "landmarks": [ {"x": .., "y": .., "z": ..}, ... ] }`.

use std::time::Duration;

use log::trace;
use serde::Deserialize;

use crate::config::{HandmarkerError, SourceConfig};
use crate::landmark::Landmark;

#[derive(Debug, Deserialize)]
struct LandmarkPayload {
    #[serde(default)]
    landmarks: Vec<Landmark>,
}

/// Parse one response body.
///
/// An empty `landmarks` array means no hand is visible and yields an empty
/// vector; frame completeness is judged by the engine.
pub fn parse_landmarks(body: &str) -> Result<Vec<Landmark>, HandmarkerError> {
    let payload: LandmarkPayload = serde_json::from_str(body)?;
    Ok(payload.landmarks)
}

/// Anything that can hand the manager one raw frame per tick.
pub trait LandmarkSource {
    fn fetch_frame(&mut self) -> Result<Vec<Landmark>, HandmarkerError>;
}

/// Blocking HTTP poller for the landmark service.
pub struct HttpLandmarkSource {
    agent: ureq::Agent,
    endpoint: String,
}

impl HttpLandmarkSource {
    pub fn new(config: &SourceConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build();
        Self {
            agent,
            endpoint: config.endpoint.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn http_error(&self, message: impl Into<String>) -> HandmarkerError {
        HandmarkerError::Http {
            endpoint: self.endpoint.clone(),
            message: message.into(),
        }
    }
}

impl LandmarkSource for HttpLandmarkSource {
    fn fetch_frame(&mut self) -> Result<Vec<Landmark>, HandmarkerError> {
        let response = self.agent.get(&self.endpoint).call().map_err(|e| match e {
            ureq::Error::Status(code, _) => self.http_error(format!("HTTP status {code}")),
            other => self.http_error(other.to_string()),
        })?;

        if response.status() != 200 {
            return Err(self.http_error(format!("HTTP status {}", response.status())));
        }

        let body = response
            .into_string()
            .map_err(|e| self.http_error(e.to_string()))?;
        trace!("Landmark payload: {body}");

        parse_landmarks(&body)
    }
}
