use crate::core::error::ProviderError;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::debug;

/// Longest slice of a raw error body kept in a user-visible message
const MAX_ERROR_BODY: usize = 200;

/// JSON-over-HTTP client shared by the provider adapters.
///
/// The credential is supplied per call, so one instance can serve any key
/// the user enters during the session.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    extra_headers: HashMap<String, String>,
}

impl HttpClient {
    pub fn new(
        client: Client,
        base_url: String,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            extra_headers: extra_headers.unwrap_or_default(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POSTs `payload` and decodes a successful JSON answer.
    ///
    /// `auth` is a `(header name, header value)` pair.
    pub async fn post_json<T, R>(
        &self,
        path: &str,
        auth: (&str, String),
        payload: &T,
    ) -> Result<R, ProviderError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, "sending completion request");

        let mut request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(auth.0, auth.1);

        for (key, value) in &self.extra_headers {
            request = request.header(key, value);
        }

        let response = request.json(payload).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "received completion response");

        if !status.is_success() {
            return Err(ProviderError::RequestFailed(api_error_details(status, &body)));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Builds `"<status>: <message>"` from a provider error body.
///
/// OpenAI, Groq, Anthropic and Gemini all report `{"error": {"message": ..}}`;
/// some proxies send `{"error": ".."}`. Anything else falls back to the body.
pub(crate) fn api_error_details(status: StatusCode, body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|value| {
        let error = value.get("error")?;
        error
            .get("message")
            .and_then(|m| m.as_str())
            .or_else(|| error.as_str())
            .map(str::to_string)
    });

    let message = message.unwrap_or_else(|| {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("no error details")
                .to_string()
        } else {
            trimmed.chars().take(MAX_ERROR_BODY).collect()
        }
    });

    format!("{}: {}", status.as_u16(), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_nested_error_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(
            api_error_details(StatusCode::UNAUTHORIZED, body),
            "401: Incorrect API key provided"
        );
    }

    #[test]
    fn extracts_plain_string_error() {
        let body = r#"{"error":"rate limited"}"#;
        assert_eq!(
            api_error_details(StatusCode::TOO_MANY_REQUESTS, body),
            "429: rate limited"
        );
    }

    #[test]
    fn falls_back_to_truncated_body_or_reason() {
        let long = "x".repeat(500);
        let details = api_error_details(StatusCode::BAD_GATEWAY, &long);
        assert_eq!(details.len(), "502: ".len() + MAX_ERROR_BODY);

        assert_eq!(
            api_error_details(StatusCode::SERVICE_UNAVAILABLE, "  "),
            "503: Service Unavailable"
        );
    }

    #[test]
    fn joins_base_url_and_path_with_one_slash() {
        let client = HttpClient::new(Client::new(), "https://api.example.com/v1/".to_string(), None);
        assert_eq!(
            client.url("/chat/completions"),
            "https://api.example.com/v1/chat/completions"
        );
    }
}
