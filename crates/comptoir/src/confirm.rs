//! Confirmation of destructive actions.
//!
//! Deleting is a two-step protocol: the screen hands out a
//! [`PendingDelete`](crate::controller::PendingDelete) carrying the question
//! to ask, something implementing [`Confirm`] turns it into a [`Decision`],
//! and the screen acts on that decision. Nothing blocks inside the screen.

use std::io::{self, BufRead, IsTerminal, Write};

/// The user's answer to a confirmation question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Cancel,
}

impl Decision {
    pub fn is_proceed(self) -> bool {
        self == Decision::Proceed
    }
}

impl From<bool> for Decision {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Decision::Proceed
        } else {
            Decision::Cancel
        }
    }
}

/// Answers a yes/no question.
pub trait Confirm {
    fn confirm(&self, question: &str) -> io::Result<Decision>;
}

/// Always proceeds, as with a `--yes` flag.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _question: &str) -> io::Result<Decision> {
        Ok(Decision::Proceed)
    }
}

/// Abstraction over terminal I/O for testability.
pub trait TerminalIO {
    /// Check if stdin is a terminal.
    fn is_terminal(&self) -> bool;

    /// Write a prompt to stdout.
    fn write_prompt(&self, prompt: &str) -> io::Result<()>;

    /// Read a line from stdin. An empty string means end of input.
    fn read_line(&self) -> io::Result<String>;
}

/// Real terminal I/O.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealTerminal;

impl TerminalIO for RealTerminal {
    fn is_terminal(&self) -> bool {
        io::stdin().is_terminal()
    }

    fn write_prompt(&self, prompt: &str) -> io::Result<()> {
        print!("{}", prompt);
        io::stdout().flush()
    }

    fn read_line(&self) -> io::Result<String> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }
}

/// Yes/no prompt on a terminal.
///
/// Accepts y/yes/n/no, case-insensitive. Anything else asks again, up to
/// `attempts` times. End of input, a non-interactive stdin, or running out
/// of attempts all cancel.
#[derive(Debug, Clone)]
pub struct ConfirmPrompt<T: TerminalIO = RealTerminal> {
    terminal: T,
    default: Option<bool>,
    attempts: usize,
}

impl ConfirmPrompt<RealTerminal> {
    pub fn new() -> Self {
        Self::with_terminal(RealTerminal)
    }
}

impl Default for ConfirmPrompt<RealTerminal> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TerminalIO> ConfirmPrompt<T> {
    /// Create a prompt with a custom terminal for testing.
    pub fn with_terminal(terminal: T) -> Self {
        Self {
            terminal,
            default: None,
            attempts: 3,
        }
    }

    /// Answer used when the user presses Enter without input.
    pub fn default_answer(mut self, default: bool) -> Self {
        self.default = Some(default);
        self
    }

    pub fn attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    fn suffix(&self) -> &'static str {
        match self.default {
            None => "[y/n]",
            Some(true) => "[Y/n]",
            Some(false) => "[y/N]",
        }
    }
}

impl<T: TerminalIO> Confirm for ConfirmPrompt<T> {
    fn confirm(&self, question: &str) -> io::Result<Decision> {
        if !self.terminal.is_terminal() {
            log::warn!("stdin is not a terminal; treating \"{question}\" as declined");
            return Ok(Decision::Cancel);
        }

        let prompt = format!("{} {} ", question, self.suffix());
        for _ in 0..self.attempts {
            self.terminal.write_prompt(&prompt)?;
            let line = self.terminal.read_line()?;
            if line.is_empty() {
                return Ok(Decision::Cancel);
            }

            match line.trim().to_lowercase().as_str() {
                "y" | "yes" => return Ok(Decision::Proceed),
                "n" | "no" => return Ok(Decision::Cancel),
                "" => {
                    if let Some(default) = self.default {
                        return Ok(default.into());
                    }
                }
                _ => {}
            }
            self.terminal.write_prompt("Please enter 'y' or 'n'\n")?;
        }
        Ok(Decision::Cancel)
    }
}

/// Terminal double returning canned responses.
#[derive(Debug)]
pub struct MockTerminal {
    is_terminal: bool,
    responses: Vec<String>,
    response_index: std::cell::Cell<usize>,
    prompts: std::cell::RefCell<Vec<String>>,
}

impl MockTerminal {
    /// A mock that simulates a non-terminal.
    pub fn non_terminal() -> Self {
        Self::build(false, Vec::new())
    }

    /// A mock terminal that returns the given response.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self::build(true, vec![response.into()])
    }

    /// A mock terminal that returns multiple responses in sequence.
    pub fn with_responses(responses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::build(true, responses.into_iter().map(Into::into).collect())
    }

    /// A mock that simulates end of input (Ctrl+D).
    pub fn eof() -> Self {
        Self::build(true, Vec::new())
    }

    /// Everything written to the terminal so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    fn build(is_terminal: bool, responses: Vec<String>) -> Self {
        Self {
            is_terminal,
            responses,
            response_index: std::cell::Cell::new(0),
            prompts: std::cell::RefCell::new(Vec::new()),
        }
    }
}

impl TerminalIO for MockTerminal {
    fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    fn write_prompt(&self, prompt: &str) -> io::Result<()> {
        self.prompts.borrow_mut().push(prompt.to_string());
        Ok(())
    }

    fn read_line(&self) -> io::Result<String> {
        let idx = self.response_index.get();
        self.response_index.set(idx + 1);
        Ok(self
            .responses
            .get(idx)
            .map(|response| format!("{response}\n"))
            .unwrap_or_default())
    }
}
