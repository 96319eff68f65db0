//! Interactive client core of the card catalog.
//!
//! The components in this crate are plain state machines driven by explicit instants. A
//! [`Page`](page::Page) wires them to a [`Backend`](backend::Backend) (usually a
//! [`cardhub::Client`]) and reports side effects to the embedding [`Host`](host::Host).

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub use config::{ClientConfig, ConfigError};

pub mod backend;
pub mod config;
pub mod element;
pub mod gallery;
pub mod host;
pub mod interaction;
pub mod logging;
pub mod modal;
pub mod notification;
pub mod page;
pub mod search;
