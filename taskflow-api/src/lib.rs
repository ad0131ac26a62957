//! # TaskFlow API Server Library
//!
//! This library provides the core functionality for the TaskFlow API server.
//!
//! ## Modules
//!
//! - `app`: Application state, backend selection and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Validating request extractors
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
