use std::fmt;

/// Error type for prompt composition and completion calls
/// Implements Clone so callers can keep or forward a failure
#[derive(Debug, Clone, PartialEq)]
pub enum Error
{   /// HTTP transport error
    HttpError(String)
  , /// API returned a non-success status
    ApiError
    {   status: u16
      , body: String
    }
  , /// Failed to parse API response
    ParseError(String)
  , /// No choices in API response
    NoChoicesInResponse
  , /// Rate limit exceeded (HTTP 429)
    RateLimitExceeded
  , /// Request timed out
    Timeout
  , /// Temperature outside [0.0, 1.0]
    InvalidTemperature(f32)
  , /// Unrecognised enumeration label
    InvalidValue
    {   kind: &'static str
      , value: String
    }
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// Local I/O failure (config file, stdin)
    Io(String)
}

impl Error
{   /// True for failures raised by the text-generation service
    /// or the transport to it
    pub fn is_upstream(&self) -> bool
    {   matches!(
          self
        , Error::HttpError(_)
          | Error::ApiError { .. }
          | Error::ParseError(_)
          | Error::NoChoicesInResponse
          | Error::RateLimitExceeded
          | Error::Timeout
        )
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::ApiError { status, body } => {
              write!(f, "API error ({}): {}", status, body)
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::NoChoicesInResponse => {
              write!(f, "API response contained no choices")
            }
          , Error::RateLimitExceeded => {
              write!(f, "API rate limit exceeded")
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::InvalidTemperature(t) => {
              write!(f,
                "Temperature must be within [0.0, 1.0], got {}",
                t
              )
            }
          , Error::InvalidValue { kind, value } => {
              write!(f, "Unknown {}: {:?}", kind, value)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::Io(msg) => {
              write!(f, "I/O error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error
{   fn from(e: std::io::Error) -> Self
    {   Error::Io(e.to_string())
    }
}
