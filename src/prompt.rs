//! Prompt formatting: chat templates and system prompts

use serde::{Deserialize, Serialize};
use log::{debug, trace};

/// Stock system prompt used when no custom one is
/// configured or supplied with a call.
pub const DEFAULT_SYSTEM_PROMPT: &str
  = "You are a helpful, harmless, honest english speaking AI assistant. \n\
When a user asks you a question, respond accurately and be truthful. \n\
If you don't know the answer to something, say that you don't know rather than making up an answer.\n\
Always try to be helpful, but prioritize truthfulness and honesty above all else.\n\
\n\
- Keep responses concise and to the point\n\
- Format output nicely using markdown when appropriate \n\
- If asked to generate code, make sure it's properly formatted and practical\n\
- Do not generate content that is harmful, illegal, unethical or deceptive\n\
- Do not share personal information about real individuals unless it is publicly available information about public figures\n";

/// Build a system prompt from the stock text, appending
/// custom instructions when some are supplied.
pub fn system_prompt_with(
  custom_instructions: Option<&str>
) -> String
{   match custom_instructions
    {   Some(custom) if !custom.is_empty() => {
          format!(
            "{}\n\nAdditional Instructions:\n{}",
            DEFAULT_SYSTEM_PROMPT, custom
          )
        }
      , _ => DEFAULT_SYSTEM_PROMPT.to_string()
    }
}

// ===== Chat Template =====

/// Delimiter scheme for the three-turn chat layout.
///
/// The tokens are an external contract with whatever
/// model sits behind the endpoint; different models
/// expect different schemes, so these are configuration,
/// not constants. The default is ChatML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTemplate
{   /// Token opening every turn
    pub turn_start: String
  , /// Token closing the system and user turns
    pub turn_end: String
  , /// Role name for the system turn
    pub system_role: String
  , /// Role name for the user turn
    pub user_role: String
  , /// Role name for the opening assistant turn
    pub assistant_role: String
}

impl Default for ChatTemplate
{   fn default() -> Self
    {   ChatTemplate
        {   turn_start: "<|im_start|>".to_string()
          , turn_end: "<|im_end|>".to_string()
          , system_role: "system".to_string()
          , user_role: "user".to_string()
          , assistant_role: "assistant".to_string()
        }
    }
}

impl ChatTemplate
{   /// Render the three-turn layout: a system turn, a user
    /// turn, and an opening assistant turn left empty for
    /// the model to complete.
    pub fn render(
      &self
    , system_prompt: &str
    , instruction: &str
    ) -> String
    {   trace!("Rendering chat template");
        format!(
          "{ts}{sys}\n{system_prompt}{te}\n\
           {ts}{user}\n{instruction}{te}\n\
           {ts}{asst}\n",
          ts = self.turn_start,
          te = self.turn_end,
          sys = self.system_role,
          user = self.user_role,
          asst = self.assistant_role,
        )
    }
}

// ===== Prompt Formatter =====

/// Combines a system instruction with a user instruction
/// into the single string the endpoint expects.
///
/// Delimiter-like substrings inside the instruction are
/// not escaped; a user can fake a turn boundary. Known
/// limitation inherited from the upstream chat format.
#[derive(Debug, Clone)]
pub struct PromptFormatter
{   template: ChatTemplate
  , default_system_prompt: Option<String>
}

impl PromptFormatter
{   /// Create a formatter with an explicit template and an
    /// optional default system prompt.
    pub fn new(
      template: ChatTemplate
    , default_system_prompt: Option<String>
    ) -> Self
    {   debug!("Creating PromptFormatter");
        PromptFormatter
        {   template
          , default_system_prompt
        }
    }

    /// Format one instruction.
    ///
    /// An explicit non-empty system prompt wins; else the
    /// configured default; if neither exists the
    /// instruction passes through unchanged.
    pub fn format(
      &self
    , instruction: &str
    , system_prompt: Option<&str>
    ) -> String
    {   let system = system_prompt
          .filter(|s| !s.is_empty())
          .or(self.default_system_prompt.as_deref());

        match system
        {   Some(sys) => {
              debug!("Formatting with system turn");
              self.template.render(sys, instruction)
            }
          , None => {
              debug!("No system prompt, pass-through");
              instruction.to_string()
            }
        }
    }
}

impl Default for PromptFormatter
{   fn default() -> Self
    {   PromptFormatter::new(ChatTemplate::default(), None)
    }
}
