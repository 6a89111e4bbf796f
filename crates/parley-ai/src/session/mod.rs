//! Conversation session management.
//!
//! A `ChatSession` owns the conversation history and the backend, builds
//! each request from the history snapshot, and only commits turns to the
//! history when the exchange succeeds.

mod chat;
mod manager;


pub use manager::ChatSession;
