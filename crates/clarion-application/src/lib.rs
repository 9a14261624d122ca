//! View usecases: the application layer composing the core view state with
//! the backend gateway.
//!
//! Each view owns an explicit state struct behind a `tokio::sync::RwLock`;
//! mutations are named operations with the fetch orchestration (generation
//! guards, polling lifecycle) handled here so the core stays pure.

pub mod home;
pub mod poller;
pub mod portal;
pub mod prompt;
pub mod thread;

#[cfg(test)]
pub(crate) mod testing;
