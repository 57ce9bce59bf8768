use anyhow::Result;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Default host for the weather provider.
pub const OPENWEATHER_HOST: &str = "https://api.openweathermap.org";

pub struct WeatherConfig {
    pub host: String,
    pub api_key: String,
}

impl WeatherConfig {
    pub fn new(host: String, api_key: String) -> Self {
        Self { host, api_key }
    }
}

#[derive(Error, Debug)]
pub enum WeatherError {
    /// The provider answered with a non-success status and its own message.
    #[error("{message}")]
    Api { message: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Malformed(String),
}

/// One reduced observation from the weather provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub temperature: f64,
    pub description: String,
}

pub struct WeatherClient {
    client: Client,
    config: WeatherConfig,
}

impl WeatherClient {
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let client = Client::builder().build()?;

        Ok(Self { client, config })
    }

    /// Look up the current weather for a free-text place name, folding every
    /// failure into a human-readable string. This is the boundary the tool
    /// dispatcher uses; callers that need the failure kind use `fetch`.
    pub async fn lookup(&self, location: &str) -> String {
        match self.fetch(location).await {
            Ok(observation) => format!(
                "The current weather in {} is {}°C with {}.",
                location, observation.temperature, observation.description
            ),
            Err(WeatherError::Api { message }) => format!("Error: {}", message),
            Err(e) => format!("Technical error: {}", e),
        }
    }

    /// One GET against the current-weather endpoint. Exactly one outbound
    /// call per invocation, no retries.
    pub async fn fetch(&self, location: &str) -> std::result::Result<Observation, WeatherError> {
        let url = format!(
            "{}/data/2.5/weather",
            self.config.host.trim_end_matches('/')
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", location),
                ("appid", &self.config.api_key),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let data: Value = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Malformed(format!("undecodable response body: {}", e)))?;

        if status == StatusCode::OK {
            let temperature = data["main"]["temp"]
                .as_f64()
                .ok_or_else(|| WeatherError::Malformed("missing main.temp".to_string()))?;
            let description = data["weather"][0]["description"]
                .as_str()
                .ok_or_else(|| {
                    WeatherError::Malformed("missing weather[0].description".to_string())
                })?
                .to_string();

            Ok(Observation {
                temperature,
                description,
            })
        } else {
            let message = data
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("City not found")
                .to_string();
            Err(WeatherError::Api { message })
        }
    }
}
