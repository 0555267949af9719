//! Prompt composition and the single completion call

use log::{debug, error, info};
use crate::{PromptStyle, Style, Tone};
use crate::error::Error;
use crate::providers::CompletionBackend;
use crate::request::{ChatMessage, CompletionRequest, PromptRequest};

/// Instruction text placed in front of the user's input
pub fn instruction_prefix(
  prompt_style: PromptStyle
, style: Style
, tone: Tone
) -> String
{   match prompt_style
    {   PromptStyle::Question => format!(
          "Write a story in the style of {} with a tone of {} \
           that starts with the question:"
        , style
        , tone
        )
      , PromptStyle::FirstSentence => format!(
          "Write a story in the style of {} with a tone of {} \
           that begins with the sentence:"
        , style
        , tone
        )
    }
}

/// Full prompt: instruction prefix immediately followed by the input
pub fn compose_prompt(request: &PromptRequest) -> String
{   let mut prompt = instruction_prefix(
      request.prompt_style()
    , request.style()
    , request.tone()
    );
    prompt.push_str(request.user_input());
    prompt
}

/// Composes prompts and forwards them to a borrowed backend
pub struct PromptComposer<'a, B: CompletionBackend + ?Sized>
{   backend: &'a B
  , model: String
}

impl<'a, B: CompletionBackend + ?Sized> PromptComposer<'a, B>
{   pub fn new(backend: &'a B, model: impl Into<String>) -> Self
    {   PromptComposer
        {   backend
          , model: model.into()
        }
    }

    pub fn model(&self) -> &str
    {   &self.model
    }

    /// Completion request for `request`, without sending it
    pub fn build_completion_request(
      &self
    , request: &PromptRequest
    ) -> CompletionRequest
    {   CompletionRequest
        {   model: self.model.clone()
          , messages: vec![ChatMessage::user(compose_prompt(request))]
          , temperature: request.temperature()
        }
    }

    /// Send the composed prompt and return the first choice verbatim.
    /// Backend errors are returned unchanged.
    pub async fn compose_and_generate(
      &self
    , request: &PromptRequest
    ) -> Result<String, Error>
    {   let completion = self.build_completion_request(request);
        info!(
          "Generating with {} ({}, {}, {}, temperature {})"
        , self.model
        , request.prompt_style()
        , request.style()
        , request.tone()
        , request.temperature()
        );

        let response = self.backend.complete(&completion).await?;

        let choice = response.choices.into_iter().next()
          .ok_or_else(|| {
            error!("No choices in response");
            Error::NoChoicesInResponse
          })?;
        debug!(
          "Completion finished: {:?}"
        , choice.finish_reason
        );
        Ok(choice.message.content)
    }
}
