//! Infrastructure adapters for chatdesk: the HTTP conversation backend, an
//! in-process history stack, configuration loading and platform paths.

pub mod config_service;
pub mod history;
pub mod http_conversation_source;
pub mod paths;

pub use crate::config_service::ConfigService;
pub use crate::history::InMemoryHistory;
pub use crate::http_conversation_source::HttpConversationSource;
pub use crate::paths::ChatdeskPaths;
