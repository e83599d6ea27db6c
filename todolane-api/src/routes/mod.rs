/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (signup, login)
/// - `todos`: Todo CRUD and statistics endpoints

pub mod auth;
pub mod health;
pub mod todos;
