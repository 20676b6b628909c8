//! Response normalization: one canonical record out of
//! several known upstream response shapes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use log::{debug, warn};

/// Placeholder result kept alongside `error` so callers
/// that read `result` unconditionally still get a string.
pub const ERROR_RESULT: &str = "Error calling LLM service";

/// Result text when the body decoded but matched nothing.
pub const UNRECOGNIZED_RESULT: &str
  = "Response received but format not recognized";

/// Top-level keys probed when no usable `choices` array
/// is present. The order is a contract with several
/// unspecified upstream shapes; reordering changes
/// observable behavior for ambiguous bodies.
pub const FALLBACK_KEYS: [&str; 3]
  = ["result", "output", "response"];

// ===== Shape Classification =====

/// Which known shape a raw response body matched.
/// Ordered predicates, first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseShape
{   /// `choices[0].text`, completion style
    Completion
  , /// `choices[0].message.content`, chat style
    Chat
  , /// `choices` present and non-empty but the first
    /// element matched neither known layout
    UnknownChoice
  , /// No usable `choices`; this top-level key carried
    /// the result instead
    Fallback(&'static str)
  , /// Nothing matched at all
    Unrecognized
}

/// Classify a raw response body.
///
/// Precedence: a non-empty `choices` array always wins
/// over any top-level fallback key, then the fallback
/// keys are probed in [`FALLBACK_KEYS`] order.
pub fn classify(raw: &Value) -> ResponseShape
{   if let Some(choice) = first_choice(raw)
    {   if choice.get("text").is_some()
        {   return ResponseShape::Completion;
        }
        if choice.get("message")
          .and_then(|m| m.get("content"))
          .is_some()
        {   return ResponseShape::Chat;
        }
        return ResponseShape::UnknownChoice;
    }

    for key in FALLBACK_KEYS
    {   if raw.get(key).is_some()
        {   return ResponseShape::Fallback(key);
        }
    }

    ResponseShape::Unrecognized
}

fn first_choice(raw: &Value) -> Option<&Value>
{   raw.get("choices")
      .and_then(Value::as_array)
      .and_then(|choices| choices.first())
}

// classify() guarantees the choice exists on the branches
// that use this; Null only to avoid a panic path.
static NULL: Value = Value::Null;

// ===== Normalized Result =====

/// The canonical record this crate produces, independent
/// of the upstream response shape.
///
/// `result` is always present. `error` is set only when
/// the request itself failed; callers must check it
/// before trusting `result`. `raw_response` carries the
/// full decoded body on the diagnostic branches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResult
{   /// Generated text, or a best-effort description
    pub result: String
  , /// Upstream finish reason, empty when absent
    #[serde(default)]
    pub finish_reason: String
  , /// Model that produced the response, empty when absent
    #[serde(default)]
    pub model: String
  , /// Token usage counters as reported upstream
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub usage: Map<String, Value>
  , /// Request failure message; absent on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>
  , /// Full raw body, attached for diagnostics when the
    /// shape was unknown or a fallback key was used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<Value>
}

impl NormalizedResult
{   fn success(result: String) -> Self
    {   NormalizedResult
        {   result
          , finish_reason: String::new()
          , model: String::new()
          , usage: Map::new()
          , error: None
          , raw_response: None
        }
    }

    /// Hybrid failure record for a failed request: the
    /// error message plus a placeholder `result`.
    pub fn from_error(err: &crate::error::Error) -> Self
    {   NormalizedResult
        {   result: ERROR_RESULT.to_string()
          , finish_reason: String::new()
          , model: String::new()
          , usage: Map::new()
          , error: Some(err.to_string())
          , raw_response: None
        }
    }
}

// ===== Normalization =====

/// Reduce a raw response body to one [`NormalizedResult`].
///
/// Pure single-pass classification; applying it twice to
/// the same body yields the same record.
pub fn normalize(raw: &Value) -> NormalizedResult
{   match classify(raw)
    {   ResponseShape::Completion => {
          debug!("Completion-style response");
          let choice = first_choice(raw)
            .unwrap_or(&NULL);
          let mut out = NormalizedResult::success(
            text_of(&choice["text"])
          );
          fill_metadata(&mut out, choice, raw);
          out
        }
      , ResponseShape::Chat => {
          debug!("Chat-style response");
          let choice = first_choice(raw)
            .unwrap_or(&NULL);
          let mut out = NormalizedResult::success(
            text_of(&choice["message"]["content"])
          );
          fill_metadata(&mut out, choice, raw);
          out
        }
      , ResponseShape::UnknownChoice => {
          warn!("Choice in unknown format");
          let choice = first_choice(raw)
            .unwrap_or(&NULL);
          let mut out = NormalizedResult::success(
            format!(
              "Received response in unknown format: {}",
              choice
            )
          );
          out.raw_response = Some(raw.clone());
          out
        }
      , ResponseShape::Fallback(key) => {
          debug!("Fallback key matched: {}", key);
          let mut out = NormalizedResult::success(
            text_of(&raw[key])
          );
          out.raw_response = Some(raw.clone());
          out
        }
      , ResponseShape::Unrecognized => {
          warn!("Response format not recognized");
          let mut out = NormalizedResult::success(
            UNRECOGNIZED_RESULT.to_string()
          );
          out.raw_response = Some(raw.clone());
          out
        }
    }
}

/// finish_reason from the choice, model and usage from
/// the top level; empty when absent.
fn fill_metadata(
  out: &mut NormalizedResult
, choice: &Value
, raw: &Value
)
{   out.finish_reason = choice.get("finish_reason")
      .and_then(Value::as_str)
      .unwrap_or("")
      .to_string();
    out.model = raw.get("model")
      .and_then(Value::as_str)
      .unwrap_or("")
      .to_string();
    out.usage = raw.get("usage")
      .and_then(Value::as_object)
      .cloned()
      .unwrap_or_default();
}

/// String values verbatim, everything else stringified.
fn text_of(value: &Value) -> String
{   match value.as_str()
    {   Some(s) => s.to_string()
      , None => value.to_string()
    }
}
