//! Wire types for the Gemini Files and Models APIs.

pub mod config;
pub mod content;
pub mod converters;
pub mod enums;
pub mod files;
pub mod models;
pub mod response;
