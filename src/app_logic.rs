/*
 * This module provides the application logic layer: `DocumentSession`, the
 * session controller that owns the open-document lifecycle and the command
 * surface, and the `CommandId` enablement model. Unit tests for the session
 * live in `handler_tests.rs`.
 */
pub mod commands;
pub mod handler;


pub use commands::CommandId;
pub use handler::DocumentSession;
