use std::time::Duration;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use log::{debug, trace, error, info};

use crate::config::LlmConfig;
use crate::error::Error;
use crate::normalize::{normalize, NormalizedResult};
use crate::prompt::PromptFormatter;
use crate::request::{ParamOverrides, RequestParameters};

// ===== Wire Types =====

/// JSON body of the completion POST: the prompt plus the
/// flattened sampling parameters.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionBody
{   pub prompt: String
  , #[serde(flatten)]
    pub params: RequestParameters
}

/// Intermediate status delivered over the optional
/// progress channel before the blocking call starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressUpdate
{   /// The request is about to be sent upstream
    Processing
}

// ===== Completion Client =====

/// Client for one upstream completion endpoint.
///
/// Holds its configuration immutably; nothing here is
/// shared across invocations and nothing is retried.
/// Certificate validation stays at the reqwest defaults.
pub struct CompletionClient
{   config: LlmConfig
  , formatter: PromptFormatter
  , http_client: reqwest::Client
}

impl CompletionClient
{   /// Create a client for the configured endpoint.
    pub fn new(config: LlmConfig) -> Result<Self, Error>
    {   debug!(
          "Creating CompletionClient for: {}",
          config.endpoint
        );
        config.params.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs
        {   builder = builder
              .timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build()
          .map_err(|e| {
            error!("Cannot build HTTP client: {}", e);
            Error::InvalidConfiguration(e.to_string())
          })?;

        let formatter = PromptFormatter::new(
          config.template.clone().unwrap_or_default(),
          config.system_prompt.clone()
        );

        Ok(CompletionClient
        {   config
          , formatter
          , http_client
        })
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str
    {   &self.config.endpoint
    }

    /// The configured parameter defaults.
    pub fn default_params(&self) -> &RequestParameters
    {   &self.config.params
    }

    /// Build the outbound request without sending it.
    /// The Authorization header is attached only when an
    /// API key is configured.
    pub fn request_for(
      &self
    , prompt: &str
    , params: &RequestParameters
    ) -> Result<reqwest::Request, Error>
    {   let body = CompletionBody
        {   prompt: prompt.to_string()
          , params: params.clone()
        };
        trace!("Completion body: {:?}", body);

        let mut builder = self.http_client
          .post(&self.config.endpoint)
          .header("Content-Type", "application/json")
          .json(&body);

        if let Some(key) = &self.config.api_key
        {   builder = builder.header(
              "Authorization",
              format!("Bearer {}", key)
            );
        }

        builder.build().map_err(|e| {
          error!("Cannot build request: {}", e);
          Error::Request(e.to_string())
        })
    }

    /// Issue exactly one POST to the endpoint and decode
    /// the response body as JSON.
    ///
    /// Connection failure, timeout, non-2xx status, and
    /// malformed JSON all come back as [`Error::Request`];
    /// the body is returned undecoded-further for the
    /// normalizer to interpret.
    pub async fn complete(
      &self
    , prompt: &str
    , params: &RequestParameters
    ) -> Result<Value, Error>
    {   debug!("Sending completion request");
        let request = self.request_for(prompt, params)?;

        let response = self.http_client
          .execute(request)
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            Error::Request(e.to_string())
          })?;

        let status = response.status();
        trace!("Completion response status: {}", status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            error!(
              "Endpoint returned {}: {}",
              status, error_text
            );
            return Err(Error::Request(
              format!("{}: {}", status, error_text)
            ));
        }

        response.json::<Value>().await.map_err(|e| {
          error!("Cannot decode response body: {}", e);
          Error::Request(e.to_string())
        })
    }

    /// Full pipeline: format the instruction, send the
    /// single request, normalize the body.
    ///
    /// Never returns an error; a failed request becomes
    /// the hybrid `{error, result}` record and the
    /// normalizer never sees a partial body. When a
    /// progress channel is given, exactly one
    /// [`ProgressUpdate::Processing`] is sent before the
    /// blocking call; a dropped receiver is ignored.
    pub async fn generate(
      &self
    , instruction: &str
    , system_prompt: Option<&str>
    , overrides: &ParamOverrides
    , progress: Option<&mpsc::UnboundedSender<ProgressUpdate>>
    ) -> NormalizedResult
    {   debug!("generate for instruction of {} chars",
          instruction.len()
        );
        let prompt = self.formatter
          .format(instruction, system_prompt);
        let params = self.config.params.merged(overrides);

        if let Some(tx) = progress
        {   let _ = tx.send(ProgressUpdate::Processing);
        }

        match self.complete(&prompt, &params).await
        {   Ok(raw) => {
              info!("Completion request succeeded");
              normalize(&raw)
            }
          , Err(e) => {
              error!("Completion request failed: {}", e);
              NormalizedResult::from_error(&e)
            }
        }
    }
}
