pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod composer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/*

storyprompt turns a handful of form fields (input text, prompt style,
writing style, tone, temperature) into a story-writing instruction and
hands it to an OpenAI-compatible chat-completion endpoint.

storyprompt/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Enumerations and re-exports
│   ├── error.rs        # Error type
│   ├── config.rs       # Generator configuration and request defaults
│   ├── request.rs      # PromptRequest and chat wire types
│   ├── composer.rs     # Prompt template and compose_and_generate
│   ├── providers/      # CompletionBackend trait and HTTP client
│   │   ├── mod.rs
│   │   └── openai.rs
│   └── main.rs         # CLI front-end
└── tests/

*/

pub use composer::{compose_prompt, instruction_prefix, PromptComposer};
pub use config::{GeneratorConfig, RequestDefaults};
pub use error::Error;
pub use providers::{CompletionBackend, OpenAiClient};
pub use request::{
  ChatMessage, Choice, CompletionRequest, CompletionResponse, PromptRequest,
};

// ===== Enumerations =====

/// Lowercase, with spaces, dashes and underscores removed
fn normalize_label(s: &str) -> String
{   s.chars()
      .filter(|c| !matches!(c, ' ' | '-' | '_'))
      .flat_map(char::to_lowercase)
      .collect()
}

/// How the user's input is framed in the instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum PromptStyle
{   /// Input is the opening sentence of the story
    #[default]
    #[serde(alias = "First Sentence")]
    FirstSentence
  , /// Input is a question the story starts with
    Question
}

impl PromptStyle
{   pub const ALL: [PromptStyle; 2]
      = [PromptStyle::FirstSentence, PromptStyle::Question];

    pub fn label(&self) -> &'static str
    {   match self
        {   PromptStyle::FirstSentence => "First Sentence"
          , PromptStyle::Question => "Question"
        }
    }
}

/// Writing style substituted into the instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Style
{   #[default]
    Neutral
  , Formal
  , Informal
  , Poetic
}

impl Style
{   pub const ALL: [Style; 4]
      = [Style::Neutral, Style::Formal, Style::Informal, Style::Poetic];

    pub fn label(&self) -> &'static str
    {   match self
        {   Style::Neutral => "Neutral"
          , Style::Formal => "Formal"
          , Style::Informal => "Informal"
          , Style::Poetic => "Poetic"
        }
    }
}

/// Tone substituted into the instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Tone
{   #[default]
    Informative
  , Happy
  , Sad
  , Mysterious
}

impl Tone
{   pub const ALL: [Tone; 4]
      = [Tone::Informative, Tone::Happy, Tone::Sad, Tone::Mysterious];

    pub fn label(&self) -> &'static str
    {   match self
        {   Tone::Informative => "Informative"
          , Tone::Happy => "Happy"
          , Tone::Sad => "Sad"
          , Tone::Mysterious => "Mysterious"
        }
    }
}

impl fmt::Display for PromptStyle
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(self.label())
    }
}

impl fmt::Display for Style
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(self.label())
    }
}

impl fmt::Display for Tone
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(self.label())
    }
}

impl FromStr for PromptStyle
{   type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {   PromptStyle::ALL.into_iter()
          .find(|v| normalize_label(v.label()) == normalize_label(s))
          .ok_or_else(|| Error::InvalidValue
            {   kind: "prompt style"
              , value: s.to_string()
            })
    }
}

impl FromStr for Style
{   type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {   Style::ALL.into_iter()
          .find(|v| normalize_label(v.label()) == normalize_label(s))
          .ok_or_else(|| Error::InvalidValue
            {   kind: "style"
              , value: s.to_string()
            })
    }
}

impl FromStr for Tone
{   type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {   Tone::ALL.into_iter()
          .find(|v| normalize_label(v.label()) == normalize_label(s))
          .ok_or_else(|| Error::InvalidValue
            {   kind: "tone"
              , value: s.to_string()
            })
    }
}
