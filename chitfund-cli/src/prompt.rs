//! Line input abstraction for interactive prompts
//!
//! [`Prompt`] hides where answers come from so menus and wizards can be
//! driven by [`ScriptedPrompt`] in tests. The `ask_*` helpers loop on
//! invalid input: a non-numeric answer where a number is expected is
//! reported and asked again, never surfaced as a failure.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::{CliError, CliResult};
use crate::output::Output;

/// Source of answers to interactive questions
pub trait Prompt {
    /// Show `prompt` and read one line. `None` means end of input.
    fn read_line(&mut self, prompt: &str) -> CliResult<Option<String>>;
}

/// Reads answers from standard input
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn read_line(&mut self, prompt: &str) -> CliResult<Option<String>> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Replays a fixed list of answers, recording the prompts it was shown
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompt for ScriptedPrompt {
    fn read_line(&mut self, prompt: &str) -> CliResult<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.answers.pop_front())
    }
}

/// Read one line; end of input becomes `CliError::InputClosed`
pub fn ask_line(prompt: &mut dyn Prompt, question: &str) -> CliResult<String> {
    prompt.read_line(question)?.ok_or(CliError::InputClosed)
}

/// Ask until the answer parses. Parse errors are shown and the question repeated.
pub fn ask_parsed<T>(
    prompt: &mut dyn Prompt,
    output: &dyn Output,
    question: &str,
    parse: impl Fn(&str) -> CliResult<T>,
) -> CliResult<T> {
    loop {
        let answer = ask_line(prompt, question)?;
        match parse(&answer) {
            Ok(value) => return Ok(value),
            Err(CliError::InvalidInput(reason)) => output.error(&reason)?,
            Err(CliError::Fund(e)) => output.error(&e.to_string())?,
            Err(other) => return Err(other),
        }
    }
}

/// Ask for non-blank text
pub fn ask_text(prompt: &mut dyn Prompt, output: &dyn Output, question: &str) -> CliResult<String> {
    ask_parsed(prompt, output, question, |answer| {
        let trimmed = answer.trim();
        if trimmed.is_empty() {
            Err(CliError::InvalidInput("A value is required".to_string()))
        } else {
            Ok(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::parse_amount;
    use crate::output::testing::MockOutput;

    #[test]
    fn test_scripted_prompt_replays_answers() {
        let mut prompt = ScriptedPrompt::new(["first", "second"]);
        assert_eq!(prompt.read_line("> ").unwrap(), Some("first".to_string()));
        assert_eq!(prompt.read_line("> ").unwrap(), Some("second".to_string()));
        assert_eq!(prompt.read_line("> ").unwrap(), None);
        assert_eq!(prompt.prompts().len(), 3);
    }

    #[test]
    fn test_ask_parsed_reprompts_on_invalid_number() {
        let mut prompt = ScriptedPrompt::new(["ten", "0", "10"]);
        let output = MockOutput::new();

        let amount = ask_parsed(&mut prompt, &output, "Amount: ", parse_amount).unwrap();

        assert_eq!(amount, 10);
        assert_eq!(output.errors().len(), 2);
        output.expect_error("not a whole number");
    }

    #[test]
    fn test_ask_parsed_end_of_input() {
        let mut prompt = ScriptedPrompt::new(["bad"]);
        let output = MockOutput::new();

        let result = ask_parsed(&mut prompt, &output, "Amount: ", parse_amount);
        assert!(matches!(result, Err(CliError::InputClosed)));
    }

    #[test]
    fn test_ask_text_skips_blank_answers() {
        let mut prompt = ScriptedPrompt::new(["  ", " Asha "]);
        let output = MockOutput::new();

        assert_eq!(ask_text(&mut prompt, &output, "Name: ").unwrap(), "Asha");
        output.expect_error("required");
    }
}
