//! Markdown recipe parser
//!
//! Turns one document written in the commands.wiki dialect into commands:
//!
//! ~~~text
//! ### Create a dummy interface
//! Creates a dummy network interface.
//! ```bash
//! ip link add <name> type dummy
//! ```
//! [name]: <> (placeholder=vip0 validation="regex [a-z\d]+" desc="Interface name")
//! ~~~
//!
//! Every `### ` heading starts a command. The text up to the first fence is
//! the description, the first fenced block is the executable template, and
//! directive lines attach attributes to placeholders. Directive lines are
//! dropped from the markdown body kept for display.
//!
//! The parser does no I/O; writing the rendered bodies is the builder's job.

use regex::Regex;

use crate::command::{Attributes, Command, Metadata};

const HEADING: &str = "### ";
const FENCE: &str = "```";

lazy_static::lazy_static! {
    static ref DIRECTIVE_RE: Regex =
        Regex::new(r"^\[(.*)\]: <> \((.*)\)$").expect("valid directive pattern");
    static ref ATTRIBUTE_RE: Regex =
        Regex::new(r#"([A-Za-z0-9_]+)=([^\s"]+|"[^"]+")"#).expect("valid attribute pattern");
    static ref PLACEHOLDER_RE: Regex =
        Regex::new(r"\{([A-Za-z0-9_\-/]+)\}|<([A-Za-z0-9_\-/]+)>").expect("valid placeholder pattern");
}

/// A command together with the markdown body rendered for it
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    pub command: Command,
    pub markdown: String,
}

/// Where the line scanner is within the current command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No heading seen yet
    Seeking,
    ReadingDescription,
    AwaitingFenceClose,
    /// Past the first code block; only a new heading changes anything
    Idle,
}

/// Accumulators for the command under construction
#[derive(Debug, Default)]
struct Pending {
    title: String,
    description: String,
    code: String,
    markdown: String,
    metadata: Metadata,
}

impl Pending {
    fn start(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    fn finish(self, ai_generated: bool) -> ParsedCommand {
        let content = trim_one_newline(self.code);
        let description = trim_one_newline(self.description);

        let mut command = Command::new(self.title);
        command.variables = extract_variables(&content);
        command.description = description;
        command.content = content;
        command.metadata = self.metadata;
        command.ai_generated = ai_generated;

        ParsedCommand {
            command,
            markdown: self.markdown,
        }
    }
}

fn trim_one_newline(mut s: String) -> String {
    if s.ends_with('\n') {
        s.pop();
    }
    s
}

/// Line-by-line scanner; feed lines, then call `finish`
struct Scanner {
    state: State,
    pending: Option<Pending>,
    done: Vec<ParsedCommand>,
    ai_generated: bool,
}

impl Scanner {
    fn new(ai_generated: bool) -> Self {
        Self {
            state: State::Seeking,
            pending: None,
            done: Vec::new(),
            ai_generated,
        }
    }

    fn feed(&mut self, line: &str) {
        if let Some(title) = line.strip_prefix(HEADING) {
            self.flush();
            self.pending = Some(Pending::start(title));
            self.state = State::ReadingDescription;
        } else {
            self.state = self.transition(line);
        }

        // Directives before the first heading belong to nobody
        let Some(p) = self.pending.as_mut() else {
            return;
        };
        match parse_directive(line) {
            Some((name, Some(attrs))) => {
                p.metadata.insert(name, attrs);
            }
            Some((_, None)) => {}
            None => {
                p.markdown.push_str(line);
                p.markdown.push('\n');
            }
        }
    }

    /// Description/code capture for a non-heading line
    fn transition(&mut self, line: &str) -> State {
        let is_fence = line.starts_with(FENCE);
        let Some(p) = self.pending.as_mut() else {
            return self.state;
        };
        match self.state {
            State::Seeking | State::Idle => self.state,
            State::ReadingDescription if is_fence => {
                p.code.clear();
                State::AwaitingFenceClose
            }
            State::ReadingDescription => {
                p.description.push_str(line);
                p.description.push('\n');
                State::ReadingDescription
            }
            State::AwaitingFenceClose if is_fence => State::Idle,
            State::AwaitingFenceClose => {
                p.code.push_str(line);
                p.code.push('\n');
                State::AwaitingFenceClose
            }
        }
    }

    /// Emit the pending command; an untitled heading produces nothing
    fn flush(&mut self) {
        if let Some(p) = self.pending.take() {
            if !p.title.trim().is_empty() {
                self.done.push(p.finish(self.ai_generated));
            }
        }
    }

    fn finish(mut self) -> Vec<ParsedCommand> {
        self.flush();
        self.done
    }
}

/// Parse a whole document into commands, in heading order
pub fn parse_document(contents: &str, ai_generated: bool) -> Vec<ParsedCommand> {
    let mut scanner = Scanner::new(ai_generated);
    for line in contents.split('\n') {
        scanner.feed(line);
    }
    scanner.finish()
}

/// Recognize a `[name]: <> (k=v k2="v 2")` directive line
///
/// Returns `None` when the line is not a directive at all. A directive without
/// any parsable `key=value` pair yields `Some((name, None))`: the line is still
/// hidden from the body but records nothing.
pub fn parse_directive(line: &str) -> Option<(String, Option<Attributes>)> {
    let caps = DIRECTIVE_RE.captures(line)?;
    let name = caps.get(1)?.as_str().to_string();
    let raw = caps.get(2)?.as_str();

    let attrs: Attributes = ATTRIBUTE_RE
        .captures_iter(raw)
        .filter_map(|c| {
            let key = c.get(1)?.as_str().to_string();
            let value = c.get(2)?.as_str().trim_matches('"').to_string();
            Some((key, value))
        })
        .collect();

    if attrs.is_empty() {
        Some((name, None))
    } else {
        Some((name, Some(attrs)))
    }
}

/// Every `{name}` / `<name>` token in order of appearance, duplicates kept
pub fn extract_variables(content: &str) -> Vec<String> {
    content
        .split('\n')
        .flat_map(|line| PLACEHOLDER_RE.captures_iter(line))
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}
