//! cmdwiki - shell recipes from a markdown wiki, searchable and runnable
//!
//! A repository of markdown documents describes commands: a heading, a short
//! description, a fenced script with `{name}` / `<name>` placeholders, and
//! optional directives tuning each placeholder. cmdwiki mirrors that
//! repository, indexes the commands, ranks them against a query, collects
//! placeholder values and runs the result.
//!
//! # Document format
//!
//! ~~~text
//! ### Add an address
//! Assign an address to an interface.
//! ```bash
//! ip addr add <cidr> dev <iface>
//! ```
//! [cidr]: <> (validation="regex [0-9./]+" desc="Address with prefix")
//! [iface]: <> (placeholder=eth0)
//! ~~~
//!
//! # Directive attributes
//!
//! | Attribute | Purpose |
//! |-----------|---------|
//! | `placeholder` | Example value shown in an empty prompt |
//! | `desc` | One-line explanation shown while prompting |
//! | `validation` | `regex <pattern>` the whole value must match |
//!
//! # Quick Start
//!
//! ```
//! use cmdwiki::{parser, search, SearchOutcome};
//!
//! let doc = "### List files\n```\nls -la <dir>\n```\n### Copy file\n```\ncp <src> <dest>\n```\n";
//! let commands: Vec<_> = parser::parse_document(doc, false)
//!     .into_iter()
//!     .map(|p| p.command)
//!     .collect();
//!
//! match search::search("copy", &commands) {
//!     SearchOutcome::Single(cmd) => assert_eq!(cmd.variables, vec!["src", "dest"]),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

pub mod builder;
pub mod command;
pub mod config;
pub mod error;
pub mod index;
pub mod parser;
pub mod resolve;
pub mod script;
pub mod search;
pub mod sync;
pub mod tui;

pub use builder::{BuildReport, IndexBuilder};
pub use command::{Attributes, Command, Metadata, Validation};
pub use config::{Config, RepoId};
pub use error::{Error, Result};
pub use index::IndexStore;
pub use resolve::{PromptHint, ResolveState, Resolver, Submission};
pub use search::{Ranked, SearchOutcome};
pub use sync::{GitSync, LocalCheckout, RepoSync};
