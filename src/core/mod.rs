//! Conversation model, store, and exchange controller.

pub mod conversation;
pub mod exchange;
pub mod store;

pub use conversation::{Conversation, ConversationMap, ConversationSummary, Message, Role};
pub use exchange::{ExchangeController, ExchangeOutcome};
pub use store::ConversationStore;
