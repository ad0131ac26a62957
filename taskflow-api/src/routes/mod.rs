/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `root`: Welcome message and the not-found fallback
/// - `users`: User listing and creation
/// - `tasks`: Task listing and creation

pub mod root;
pub mod tasks;
pub mod users;
