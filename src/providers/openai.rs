use std::time::Duration;
use async_trait::async_trait;
use log::{debug, trace, error};
use reqwest::StatusCode;
use crate::config::GeneratorConfig;
use crate::error::Error;
use crate::request::{CompletionRequest, CompletionResponse};

// ===== OpenAI-compatible Client =====

/// Client for any endpoint speaking the OpenAI chat-completion API
pub struct OpenAiClient
{   api_base: String
  , api_key: Option<String>
  , http_client: reqwest::Client
}

impl OpenAiClient
{   pub fn new(
      api_base: impl Into<String>
    , api_key: Option<String>
    , timeout: Option<Duration>
    ) -> Result<Self, Error>
    {   let api_base = api_base.into()
          .trim_end_matches('/')
          .to_string();
        debug!("Creating OpenAiClient for {}", api_base);

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout
        {   builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(|e| {
          error!("Failed to build HTTP client: {}", e);
          Error::HttpError(e.to_string())
        })?;

        Ok(OpenAiClient
        {   api_base
          , api_key
          , http_client
        })
    }

    /// Build from configuration, reading the key from its env var
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, Error>
    {   let api_key = config.api_key();
        if api_key.is_none()
        {   debug!(
              "{} not set, sending requests without Authorization",
              config.api_key_env
            );
        }
        OpenAiClient::new(
          config.api_base.clone()
        , api_key
        , config.timeout_secs.map(Duration::from_secs)
        )
    }

    pub fn api_base(&self) -> &str
    {   &self.api_base
    }

    pub fn has_api_key(&self) -> bool
    {   self.api_key.is_some()
    }

    fn completions_url(&self) -> String
    {   format!("{}/chat/completions", self.api_base)
    }
}

fn transport_error(e: reqwest::Error) -> Error
{   if e.is_timeout()
    {   error!("Request timed out: {}", e);
        Error::Timeout
    } else
    {   error!("HTTP error: {}", e);
        Error::HttpError(e.to_string())
    }
}

#[async_trait]
impl super::CompletionBackend for OpenAiClient
{   async fn complete(&self, request: &CompletionRequest)
      -> Result<CompletionResponse, Error>
    {   debug!("Sending completion for model: {}", request.model);
        trace!("Completion request: {:?}", request);

        let mut http_request = self.http_client
          .post(self.completions_url())
          .header("Content-Type", "application/json")
          .json(request);
        if let Some(api_key) = &self.api_key
        {   http_request = http_request.bearer_auth(api_key);
        }

        let response = http_request
          .send()
          .await
          .map_err(transport_error)?;

        let status = response.status();
        trace!("Completion response status: {}", status);

        if status == StatusCode::TOO_MANY_REQUESTS
        {   error!("Rate limited by {}", self.api_base);
            return Err(Error::RateLimitExceeded);
        }

        if !status.is_success()
        {   let body = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            error!("API error {}: {}", status, body);
            return Err(Error::ApiError
            {   status: status.as_u16()
              , body
            });
        }

        let body = response.text().await
          .map_err(transport_error)?;
        trace!("Completion response body: {}", body);

        serde_json::from_str::<CompletionResponse>(&body)
          .map_err(|e| {
            error!("Parse error: {}", e);
            Error::ParseError(e.to_string())
          })
    }
}
