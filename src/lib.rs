//! courseplan: course catalog lookup backed by an unbalanced binary search tree.
//!
//! Layers, leaves first:
//! - [`domain`]: course records, catalog parsing and the ordered store (no I/O)
//! - [`application`]: the catalog service, talking to I/O through traits
//! - [`infrastructure`]: real I/O implementations and service wiring
//! - [`cli`]: argument parsing, one-shot commands and the interactive shell

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
