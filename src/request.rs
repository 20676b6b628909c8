//! Sampling parameters sent with every completion request

use serde::{Deserialize, Serialize};
use log::debug;

/// Sampling parameters for one completion call.
///
/// Serialized directly into the wire body next to the
/// prompt; the optional passthrough fields are omitted
/// from the JSON entirely when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestParameters
{   /// Max tokens to generate
    pub max_tokens: u32
  , /// Temperature for sampling, in [0, 2]
    pub temperature: f32
  , /// Nucleus sampling cutoff, in (0, 1]
    pub top_p: f32
  , /// Passthrough: presence penalty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>
  , /// Passthrough: frequency penalty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>
  , /// Passthrough: stop sequences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>
}

impl Default for RequestParameters
{   fn default() -> Self
    {   RequestParameters
        {   max_tokens: 200
          , temperature: 0.7
          , top_p: 0.9
          , presence_penalty: None
          , frequency_penalty: None
          , stop: None
        }
    }
}

/// Call-site overrides for [`RequestParameters`].
///
/// Every field optional; a set field replaces the
/// configured default, an unset field keeps it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ParamOverrides
{   pub max_tokens: Option<u32>
  , pub temperature: Option<f32>
  , pub top_p: Option<f32>
  , pub presence_penalty: Option<f32>
  , pub frequency_penalty: Option<f32>
  , pub stop: Option<Vec<String>>
}

impl RequestParameters
{   /// Merge call-site overrides over these defaults.
    /// Override wins wherever both specify a key.
    pub fn merged(&self, overrides: &ParamOverrides)
      -> Self
    {   debug!("Merging parameter overrides");
        RequestParameters
        {   max_tokens: overrides.max_tokens
            .unwrap_or(self.max_tokens)
          , temperature: overrides.temperature
            .unwrap_or(self.temperature)
          , top_p: overrides.top_p
            .unwrap_or(self.top_p)
          , presence_penalty: overrides.presence_penalty
            .or(self.presence_penalty)
          , frequency_penalty: overrides.frequency_penalty
            .or(self.frequency_penalty)
          , stop: overrides.stop.clone()
            .or_else(|| self.stop.clone())
        }
    }

    /// Check the documented ranges: max_tokens positive,
    /// temperature in [0, 2], top_p in (0, 1].
    pub fn validate(&self)
      -> Result<(), crate::error::Error>
    {   if self.max_tokens == 0
        {   return Err(
              crate::error::Error::InvalidConfiguration(
                "max_tokens must be positive".to_string()
              )
            );
        }
        if !(0.0..=2.0).contains(&self.temperature)
        {   return Err(
              crate::error::Error::InvalidConfiguration(
                format!(
                  "temperature out of range [0, 2]: {}",
                  self.temperature
                )
              )
            );
        }
        if self.top_p <= 0.0 || self.top_p > 1.0
        {   return Err(
              crate::error::Error::InvalidConfiguration(
                format!(
                  "top_p out of range (0, 1]: {}",
                  self.top_p
                )
              )
            );
        }
        Ok(())
    }
}
