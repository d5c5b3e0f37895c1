//! redloop-core: LLM-driven penetration testing agent library
//!
//! Wraps offensive-security CLI tools (nmap, gobuster, sqlmap) behind
//! chat-style agent loops coordinated by a supervising orchestrator. The
//! language model decides each step; tools run on a remote Kali service.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod agents;
pub mod config;
pub mod decision;
pub mod error;
pub mod kali;
pub mod parsers;
pub mod prompts;
pub mod providers;
pub mod state;
pub mod tools;

pub use error::{Error, Result};
