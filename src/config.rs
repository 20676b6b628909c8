//! Configuration for the completion endpoint and defaults

use serde::{Deserialize, Serialize};
use log::{debug, error};

use crate::prompt::ChatTemplate;
use crate::request::RequestParameters;

const DEFAULT_ENDPOINT: &str
  = "http://localhost:8000/v1/completions";

/// Immutable configuration for one [`CompletionClient`].
///
/// Built once and handed to the client at construction;
/// there is no process-wide config state. File values
/// replace these defaults, call-site overrides beat both.
///
/// [`CompletionClient`]: crate::client::CompletionClient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig
{   /// Completion endpoint URL
    pub endpoint: String
  , /// Bearer API key; no Authorization header when unset
    pub api_key: Option<String>
  , /// Default system prompt used when a call supplies
    /// none; pass-through mode when this is also unset
    pub system_prompt: Option<String>
  , /// Chat delimiter scheme (ChatML when unset)
    pub template: Option<ChatTemplate>
  , /// Sampling parameter defaults
    pub params: RequestParameters
  , /// Request timeout in seconds
    pub timeout_secs: Option<u64>
}

impl Default for LlmConfig
{   fn default() -> Self
    {   LlmConfig
        {   endpoint: DEFAULT_ENDPOINT.to_string()
          , api_key: None
          , system_prompt: None
          , template: None
          , params: RequestParameters::default()
          , timeout_secs: None
        }
    }
}

/// Partial configuration read from a JSON file.
/// Every field optional so a file may override only
/// what it cares about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigOverlay
{   pub endpoint: Option<String>
  , pub api_key: Option<String>
  , pub system_prompt: Option<String>
  , pub template: Option<ChatTemplate>
  , pub max_tokens: Option<u32>
  , pub temperature: Option<f32>
  , pub top_p: Option<f32>
  , pub timeout_secs: Option<u64>
}

impl LlmConfig
{   /// Load configuration by overlaying a JSON file on the
    /// built-in defaults. Missing keys keep their default;
    /// out-of-range parameter values are rejected.
    pub fn from_file(path: &str)
      -> Result<Self, crate::error::Error>
    {   debug!("Loading configuration from: {}", path);
        let text = std::fs::read_to_string(path)
          .map_err(|e| {
            error!("Cannot read config file: {}", e);
            crate::error::Error::InvalidConfiguration(
              format!("cannot read {}: {}", path, e)
            )
          })?;
        let overlay: ConfigOverlay
          = serde_json::from_str(&text)
            .map_err(|e| {
              error!("Cannot parse config file: {}", e);
              crate::error::Error::InvalidConfiguration(
                format!("cannot parse {}: {}", path, e)
              )
            })?;
        LlmConfig::default().overlaid(overlay)
    }

    /// Apply a partial overlay to this configuration.
    pub fn overlaid(mut self, overlay: ConfigOverlay)
      -> Result<Self, crate::error::Error>
    {   if let Some(endpoint) = overlay.endpoint
        {   self.endpoint = endpoint;
        }
        if overlay.api_key.is_some()
        {   self.api_key = overlay.api_key;
        }
        if overlay.system_prompt.is_some()
        {   self.system_prompt = overlay.system_prompt;
        }
        if overlay.template.is_some()
        {   self.template = overlay.template;
        }
        if let Some(max_tokens) = overlay.max_tokens
        {   self.params.max_tokens = max_tokens;
        }
        if let Some(temperature) = overlay.temperature
        {   self.params.temperature = temperature;
        }
        if let Some(top_p) = overlay.top_p
        {   self.params.top_p = top_p;
        }
        if overlay.timeout_secs.is_some()
        {   self.timeout_secs = overlay.timeout_secs;
        }
        self.params.validate()?;
        Ok(self)
    }
}
