//! # TaskFlow Dashboard Library
//!
//! Server-rendered board for the TaskFlow API.
//!
//! ## Modules
//!
//! - `app`: Routes, form handling and page assembly
//! - `client`: Typed HTTP client for the API
//! - `config`: Configuration management
//! - `render`: HTML rendering

pub mod app;
pub mod client;
pub mod config;
pub mod render;
