//! Application state for the TUI
//!
//! Each screen pairs a pure model from `update.rs` with the data it shows.

use crossterm::event::{KeyEvent, KeyEventKind};

use crate::command::Command;
use crate::resolve::{PromptHint, ResolveState, Resolver, Submission};
use crate::search::Ranked;

use super::msg::{key_to_msg, Mode, Msg};
use super::update::{update_picker, update_prompt, Cmd, PickerModel, PromptModel};

/// Where a screen ended up after an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Continue,
    Cancelled,
    Finished(T),
}

/// Translate a raw key to a message, ignoring release/repeat noise
pub fn key_msg(key: KeyEvent, mode: Mode) -> Msg {
    if key.kind != KeyEventKind::Press {
        return Msg::Noop;
    }
    key_to_msg(key.code, key.modifiers, mode)
}

/// Choosing among several ranked matches
pub struct PickerApp<'a> {
    pub ranked: &'a [Ranked<'a>],
    pub model: PickerModel,
}

impl<'a> PickerApp<'a> {
    pub fn new(ranked: &'a [Ranked<'a>]) -> Self {
        Self {
            ranked,
            model: PickerModel::new(ranked.len()),
        }
    }

    pub fn handle(&mut self, msg: Msg) -> Outcome<usize> {
        let (model, cmd) = update_picker(msg, self.model.clone());
        self.model = model;
        if cmd.is_quit() {
            return Outcome::Cancelled;
        }
        match cmd {
            Cmd::Select(index) => Outcome::Finished(index),
            _ => Outcome::Continue,
        }
    }

    pub fn selected(&self) -> Option<&Ranked<'a>> {
        self.ranked.get(self.model.selected_index)
    }
}

/// Collecting placeholder values for one command
pub struct PromptApp<'a> {
    pub resolver: Resolver<'a>,
    pub model: PromptModel,
    /// Rendered markdown shown above the prompt
    pub document: String,
    /// Set after a rejected submission, cleared on the next keystroke
    pub rejected: bool,
}

impl<'a> PromptApp<'a> {
    pub fn new(command: &'a Command, document: String) -> Self {
        let mut resolver = Resolver::new(command);
        resolver.start();
        let model = PromptModel::new(document.lines().count());
        Self {
            resolver,
            model,
            document,
            rejected: false,
        }
    }

    pub fn handle(&mut self, msg: Msg) -> Outcome<()> {
        if matches!(msg, Msg::Input(_) | Msg::Backspace) {
            self.rejected = false;
        }

        let (model, cmd) = update_prompt(msg, std::mem::take(&mut self.model));
        self.model = model;
        if cmd.is_quit() {
            return Outcome::Cancelled;
        }

        match cmd {
            Cmd::Submit(input) => match self.resolver.submit(&input) {
                Submission::Rejected => {
                    self.rejected = true;
                    Outcome::Continue
                }
                Submission::Next(_) => {
                    self.model = std::mem::take(&mut self.model).cleared();
                    Outcome::Continue
                }
                Submission::Done | Submission::Ignored => Outcome::Finished(()),
            },
            _ => Outcome::Continue,
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.resolver.active()
    }

    pub fn hint(&self) -> PromptHint {
        self.resolver.hint()
    }

    /// ✔ / ❌ state for the current input, `None` when nothing is enforced
    pub fn feedback(&self) -> Option<bool> {
        self.resolver.feedback(&self.model.input)
    }

    pub fn is_done(&self) -> bool {
        self.resolver.state() == &ResolveState::Done
    }
}
