//! Session domain module.
//!
//! This module contains all session-related domain models and the state
//! machines that keep one page view's session list consistent.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`)
//! - `message`: Conversation message types (`MessageRole`, `Message`)
//! - `event`: Replacement events from the chat surface (`SessionEvent`)
//! - `store`: Ordered in-memory list (`SessionStore`, `StoreOp`)
//! - `resolver`: Current-session state machine (`CurrentSessionResolver`)
//!
//! # Usage
//!
//! ```ignore
//! use chatdesk_core::session::{Session, SessionStore, CurrentSessionResolver};
//! ```

mod event;
mod message;
mod model;
mod resolver;
mod store;

// Re-export public API
pub use event::SessionEvent;
pub use message::{Message, MessageRole};
pub use model::{PLACEHOLDER_TITLE, Session};
pub use resolver::{CurrentSessionResolver, Resolution, ResolveFailure, ResolveStep, ResolveTicket};
pub use store::{SessionStore, StoreOp};
