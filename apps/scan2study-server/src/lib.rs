//! Scan2Study Server Library
//!
//! Upload a scanned PDF, extract its text through an OCR provider, then
//! summarize it and ask questions about it through a language model.
//!
//! # Modules
//!
//! - `routes`: the HTTP surface (`/api/ocr`, `/api/summary`, `/api/qa`)
//! - `ocr`, `llm`: upstream provider integrations
//! - `client`: upload and study flows driven against the HTTP API

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod llm;
pub mod ocr;
pub mod routes;
pub mod state;
