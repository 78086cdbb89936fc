//! HTTP client for the generation endpoint.

use reqwest::multipart::{Form, Part};
use std::time::Duration;
use url::Url;

use super::response::{check_content_type, interpret_body};
use crate::config::Config;
use crate::error::{ConfigError, GenerateError, RemoteError, ValidationError};
use crate::state::data::SelectedImage;
use crate::state::workflow::MAX_UPLOAD_BYTES;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Sends images and prompts to the generation endpoint.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    http: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl GenerationClient {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let endpoint = config.endpoint()?;
        let timeout = config.timeout();

        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Upload `image` and `prompt` as one multipart request and return the
    /// generated image's location.
    pub async fn generate(
        &self,
        image: SelectedImage,
        prompt: String,
    ) -> Result<String, GenerateError> {
        let contents = image.contents().ok_or(ValidationError::FileTooLarge {
            size: image.size(),
            limit: MAX_UPLOAD_BYTES,
        })?;

        let file = Part::bytes(contents.to_vec())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)
            .map_err(|e| self.transport_error(e))?;

        let form = Form::new().part("file", file).text("prompt", prompt);

        tracing::info!(
            "sending {} ({} bytes) to {}",
            image.file_name,
            image.size(),
            self.endpoint
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        // Checked before the body is touched so HTML error pages never reach the JSON parser
        check_content_type(content_type.as_deref())?;

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        tracing::debug!("backend response ({}): {}", status, String::from_utf8_lossy(&body));

        interpret_body(status, &body)
    }

    /// Resolve a result location against the endpoint, so relative paths work
    pub fn resolve(&self, location: &str) -> Result<Url, GenerateError> {
        self.endpoint
            .join(location)
            .map_err(|e| GenerateError::Transport(format!("invalid image location {location}: {e}")))
    }

    /// Download the generated image for display
    pub async fn fetch_image(&self, location: String) -> Result<Vec<u8>, GenerateError> {
        let url = self.resolve(&location)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError {
                status: status.as_u16(),
                message: format!("HTTP error! status: {}", status.as_u16()),
            }
            .into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(bytes.to_vec())
    }

    fn transport_error(&self, e: reqwest::Error) -> GenerateError {
        let message = if e.is_timeout() {
            format!("request timed out after {} ms", self.timeout.as_millis())
        } else if e.is_connect() {
            format!("could not connect to {}: {}", self.endpoint, e)
        } else {
            e.to_string()
        };
        GenerateError::Transport(message)
    }
}
