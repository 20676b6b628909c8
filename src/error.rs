use std::fmt;

/// Custom error type for llmgate operations
/// Implements Clone for sending through channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Anything that went wrong talking to the upstream
    /// service: connection failure, timeout, non-2xx
    /// status, or a body that failed to decode as JSON.
    /// One kind; nothing is retried and callers never
    /// branch on the transport detail.
    Request(String)
  , /// Configuration file unreadable, invalid JSON, or a
    /// parameter outside its accepted range
    InvalidConfiguration(String)
  , /// Generic error
    Other(String)
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::Request(msg) => {
              write!(f, "Request error: {}", msg)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}
