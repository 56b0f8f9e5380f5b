//! Minimal Gemini client: upload a file, then generate content that references it.

pub mod client;
pub mod error;
pub mod files;
pub mod models;
mod upload;

#[cfg(test)]
mod test_support;

pub use gemini_pdf_types as types;

pub use client::{Client, ClientBuilder, HttpOptions};
pub use error::{Error, Result};
pub use files::file_part;
