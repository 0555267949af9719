//! Configuration for the completion endpoint and request defaults

use std::path::Path;
use log::debug;
use serde::{Deserialize, Serialize};
use crate::{PromptStyle, Style, Tone};
use crate::error::Error;
use crate::request::{check_temperature, DEFAULT_TEMPERATURE};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

pub const MODEL_ENV: &str = "STORYPROMPT_MODEL";
pub const API_BASE_ENV: &str = "STORYPROMPT_API_BASE";

/// Defaults applied to fields the caller leaves unset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDefaults
{   pub prompt_style: PromptStyle
  , pub style: Style
  , pub tone: Tone
  , /// Sampling temperature, 0.0 to 1.0
    pub temperature: f32
}

impl Default for RequestDefaults
{   fn default() -> Self
    {   RequestDefaults
        {   prompt_style: PromptStyle::FirstSentence
          , style: Style::Neutral
          , tone: Tone::Informative
          , temperature: DEFAULT_TEMPERATURE
        }
    }
}

/// Generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig
{   /// Model identifier sent with every request
    pub model: String
  , /// API base URL, without the trailing `/chat/completions`
    pub api_base: String
  , /// Environment variable holding the API key. An unset
    /// variable means requests go out without Authorization.
    pub api_key_env: String
  , /// Request timeout in seconds
    pub timeout_secs: Option<u64>
  , pub defaults: RequestDefaults
}

impl Default for GeneratorConfig
{   fn default() -> Self
    {   GeneratorConfig
        {   model: DEFAULT_MODEL.to_string()
          , api_base: DEFAULT_API_BASE.to_string()
          , api_key_env: DEFAULT_API_KEY_ENV.to_string()
          , timeout_secs: None
          , defaults: RequestDefaults::default()
        }
    }
}

impl GeneratorConfig
{   /// Parse a JSON config; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, Error>
    {   serde_json::from_str(json)
          .map_err(|e| Error::InvalidConfiguration(e.to_string()))
    }

    /// Load a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error>
    {   let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        GeneratorConfig::from_json(&json)
    }

    /// Apply STORYPROMPT_MODEL / STORYPROMPT_API_BASE
    pub fn with_env_overrides(self) -> Self
    {   self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>
    {   if let Some(model) = lookup(MODEL_ENV)
        {   debug!("Model overridden by {}: {}", MODEL_ENV, model);
            self.model = model;
        }
        if let Some(api_base) = lookup(API_BASE_ENV)
        {   debug!("API base overridden by {}: {}", API_BASE_ENV, api_base);
            self.api_base = api_base;
        }
        self
    }

    /// API key from the configured environment variable, if set
    pub fn api_key(&self) -> Option<String>
    {   std::env::var(&self.api_key_env).ok()
          .filter(|k| !k.is_empty())
    }

    pub fn validate(&self) -> Result<(), Error>
    {   if self.model.trim().is_empty()
        {   return Err(Error::InvalidConfiguration(
              "model must not be empty".to_string()
            ));
        }
        if self.api_base.trim().is_empty()
        {   return Err(Error::InvalidConfiguration(
              "api_base must not be empty".to_string()
            ));
        }
        if self.timeout_secs == Some(0)
        {   return Err(Error::InvalidConfiguration(
              "timeout_secs must be positive".to_string()
            ));
        }
        check_temperature(self.defaults.temperature)?;
        Ok(())
    }
}
