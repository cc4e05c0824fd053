//! Placeholder resolution
//!
//! Collects one value per distinct placeholder of a command, in order of first
//! appearance, gating each submission on the placeholder's `regex` validation.
//!
//! ```
//! use cmdwiki::{Command, Resolver, ResolveState};
//!
//! let mut cmd = Command::new("greet");
//! cmd.content = "echo <name> {name}".to_string();
//! cmd.variables = vec!["name".to_string(), "name".to_string()];
//!
//! let mut resolver = Resolver::new(&cmd);
//! resolver.start();
//! assert_eq!(resolver.state(), &ResolveState::Prompting("name".to_string()));
//! resolver.submit("world");
//! assert!(resolver.is_done());
//! assert_eq!(resolver.render(), "echo world world\n");
//! ```

use std::collections::HashMap;

use regex::Regex;
use tracing::warn;

use crate::command::{Command, Validation};
use crate::script;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveState {
    /// Not started yet
    NotPrompting,
    /// Waiting for a value for this placeholder
    Prompting(String),
    /// Every placeholder has a value
    Done,
}

/// Result of submitting one input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Failed validation; the same prompt stays active
    Rejected,
    /// Stored; the next placeholder is now active
    Next(String),
    /// Stored; nothing left to ask
    Done,
    /// Nothing is being prompted for
    Ignored,
}

/// Display hints for the active placeholder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptHint {
    pub placeholder: Option<String>,
    pub description: Option<String>,
}

/// Interactive value collection for one command
#[derive(Debug)]
pub struct Resolver<'a> {
    command: &'a Command,
    values: HashMap<String, String>,
    state: ResolveState,
    // Compiled `regex` validation of the active placeholder
    pattern: Option<Regex>,
    warning: Option<String>,
}

impl<'a> Resolver<'a> {
    pub fn new(command: &'a Command) -> Self {
        Self {
            command,
            values: HashMap::new(),
            state: ResolveState::NotPrompting,
            pattern: None,
            warning: None,
        }
    }

    pub fn command(&self) -> &'a Command {
        self.command
    }

    pub fn state(&self) -> &ResolveState {
        &self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ResolveState::Done
    }

    /// Name currently being prompted for
    pub fn active(&self) -> Option<&str> {
        match &self.state {
            ResolveState::Prompting(name) => Some(name),
            _ => None,
        }
    }

    pub fn values(&self) -> &HashMap<String, String> {
        &self.values
    }

    /// Warning raised when the active placeholder's pattern failed to compile
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    /// Begin prompting; commands without placeholders are immediately done
    pub fn start(&mut self) -> &ResolveState {
        if self.state == ResolveState::NotPrompting {
            self.advance();
        }
        &self.state
    }

    /// Hints for the active placeholder, looked up fresh each call
    pub fn hint(&self) -> PromptHint {
        let Some(name) = self.active() else {
            return PromptHint::default();
        };
        PromptHint {
            placeholder: self.command.attribute(name, "placeholder").map(str::to_string),
            description: self.command.attribute(name, "desc").map(str::to_string),
        }
    }

    /// Live validation of a partial input: `None` when nothing is enforced
    pub fn feedback(&self, input: &str) -> Option<bool> {
        self.pattern.as_ref().map(|re| re.is_match(input))
    }

    /// Offer a value for the active placeholder
    pub fn submit(&mut self, input: &str) -> Submission {
        let Some(name) = self.active().map(str::to_string) else {
            return Submission::Ignored;
        };
        if self.feedback(input) == Some(false) {
            return Submission::Rejected;
        }

        self.values.insert(name, input.to_string());
        match self.advance() {
            ResolveState::Prompting(next) => Submission::Next(next.clone()),
            _ => Submission::Done,
        }
    }

    /// Move to the first placeholder without a value (duplicates are skipped)
    fn advance(&mut self) -> &ResolveState {
        let next = self
            .command
            .variables
            .iter()
            .find(|v| !self.values.contains_key(v.as_str()))
            .cloned();

        self.pattern = None;
        self.warning = None;
        self.state = match next {
            Some(name) => {
                self.activate(&name);
                ResolveState::Prompting(name)
            }
            None => ResolveState::Done,
        };
        &self.state
    }

    fn activate(&mut self, name: &str) {
        match self.command.validation(name) {
            Some(Validation::Regex(pattern)) => {
                match Regex::new(&format!("^(?:{})$", pattern)) {
                    Ok(re) => self.pattern = Some(re),
                    Err(e) => {
                        warn!(variable = name, %pattern, error = %e, "invalid validation pattern, ignoring it");
                        self.warning = Some(format!("Invalid regex: {}", pattern));
                    }
                }
            }
            // `file` and unknown kinds are accepted without checks
            Some(Validation::File(_)) | Some(Validation::Other { .. }) | None => {}
        }
    }

    /// The command content with every collected value substituted
    pub fn render(&self) -> String {
        script::render(&self.command.content, &self.values)
    }
}
