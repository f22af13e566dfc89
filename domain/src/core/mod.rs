//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: configuration errors raised while assembling a session
//! - [`string::truncate`]: UTF-8 safe truncation used for log previews

pub mod error;
pub mod string;
