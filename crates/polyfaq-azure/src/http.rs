//! Shared request plumbing for the Azure clients

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use polyfaq_core::{Error, Result};

pub(crate) const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
pub(crate) const SUBSCRIPTION_REGION_HEADER: &str = "Ocp-Apim-Subscription-Region";

/// Build the HTTP client shared by all requests of one service
pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("polyfaq/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::Network(e.to_string()))
}

/// Send a JSON body and return the response text of a successful call.
///
/// Non-success statuses become [`Error::Service`], carrying the message of
/// the service's error envelope or the raw body when there is none.
pub(crate) async fn send_json<B>(service: &'static str, request: RequestBuilder, body: &B) -> Result<String>
where
    B: Serialize + ?Sized,
{
    let response = request
        .header("Content-Type", "application/json")
        .json(body)
        .send()
        .await
        .map_err(transport_error)?;

    let status = response.status();
    let text = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        warn!(service, status = status.as_u16(), "request failed");
        return Err(Error::Service {
            service,
            status: status.as_u16(),
            body: service_message(&text),
        });
    }

    debug!(service, bytes = text.len(), "response received");
    Ok(text)
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout(err.to_string())
    } else {
        Error::Network(err.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    message: String,
}

/// Both services wrap failures as `{"error": {"code": .., "message": ..}}`;
/// the code is a string for question answering and a number for Translator.
pub(crate) fn service_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope { error: ErrorBody { code: Some(code), message } }) => {
            let code = code.as_str().map(str::to_string).unwrap_or_else(|| code.to_string());
            format!("{} ({})", message, code)
        }
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
