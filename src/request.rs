//! Prompt request and chat wire types

use serde::{Deserialize, Serialize};
use crate::{PromptStyle, Style, Tone};
use crate::error::Error;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Check temperature is a number within [0.0, 1.0]
pub fn check_temperature(temperature: f32) -> Result<f32, Error>
{   if (0.0..=1.0).contains(&temperature)
    {   Ok(temperature)
    } else
    {   Err(Error::InvalidTemperature(temperature))
    }
}

/// One story-prompt invocation. Fields are private so a built
/// request always carries an in-range temperature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptRequest
{   user_input: String
  , prompt_style: PromptStyle
  , style: Style
  , tone: Tone
  , temperature: f32
}

impl PromptRequest
{   /// Request with every field except the input at its default
    pub fn new(user_input: impl Into<String>) -> Self
    {   PromptRequest
        {   user_input: user_input.into()
          , prompt_style: PromptStyle::default()
          , style: Style::default()
          , tone: Tone::default()
          , temperature: DEFAULT_TEMPERATURE
        }
    }

    /// Request seeded from configured defaults
    pub fn from_defaults(
      user_input: impl Into<String>
    , defaults: &crate::config::RequestDefaults
    ) -> Result<Self, Error>
    {   PromptRequest::new(user_input)
          .with_prompt_style(defaults.prompt_style)
          .with_style(defaults.style)
          .with_tone(defaults.tone)
          .with_temperature(defaults.temperature)
    }

    pub fn with_prompt_style(mut self, prompt_style: PromptStyle) -> Self
    {   self.prompt_style = prompt_style;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self
    {   self.style = style;
        self
    }

    pub fn with_tone(mut self, tone: Tone) -> Self
    {   self.tone = tone;
        self
    }

    /// Fails with `InvalidTemperature` outside [0.0, 1.0] or for NaN
    pub fn with_temperature(mut self, temperature: f32)
      -> Result<Self, Error>
    {   self.temperature = check_temperature(temperature)?;
        Ok(self)
    }

    pub fn user_input(&self) -> &str
    {   &self.user_input
    }

    pub fn prompt_style(&self) -> PromptStyle
    {   self.prompt_style
    }

    pub fn style(&self) -> Style
    {   self.style
    }

    pub fn tone(&self) -> Tone
    {   self.tone
    }

    pub fn temperature(&self) -> f32
    {   self.temperature
    }
}

/// Ready-made requests offered by the front-end
pub fn showcase_requests() -> Vec<PromptRequest>
{   vec![
      PromptRequest
      {   user_input: "A cyberpunk thriller set in a neon-lit city."
            .to_string()
        , prompt_style: PromptStyle::Question
        , style: Style::Formal
        , tone: Tone::Mysterious
        , temperature: 0.8
      }
    , PromptRequest
      {   user_input: "Compose a humorous limerick about a talking cat."
            .to_string()
        , prompt_style: PromptStyle::FirstSentence
        , style: Style::Informal
        , tone: Tone::Happy
        , temperature: 0.5
      }
    ]
}

// ===== Chat Wire Types =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

impl ChatMessage
{   pub fn user(content: impl Into<String>) -> Self
    {   ChatMessage
        {   role: "user".to_string()
          , content: content.into()
        }
    }
}

/// Body of a chat-completion call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest
{   pub model: String
  , pub messages: Vec<ChatMessage>
  , pub temperature: f32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse
{   pub choices: Vec<Choice>
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice
{   pub message: ChatMessage
  , #[serde(default)]
    pub finish_reason: Option<String>
}

impl CompletionResponse
{   /// Content of the first choice, untouched
    pub fn first_content(&self) -> Option<&str>
    {   self.choices.first()
          .map(|c| c.message.content.as_str())
    }
}
