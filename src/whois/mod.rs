//! WHOIS transport and response parsing

pub mod client;
pub mod parse;

pub use client::{WhoisClient, WhoisError};
pub use parse::{parse_response, ParseError};
