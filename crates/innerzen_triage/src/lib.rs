//! # InnerZen Triage
//!
//! Keyword-based crisis classification and the companion's reply selection.
//! Classification is high-recall and never fails; a crisis always routes to
//! the fixed safety-resource reply before any topic or general response.

pub mod chooser;
pub mod classifier;
pub mod conversation;
pub mod greeting;
pub mod responses;

pub use chooser::{Chooser, FixedChooser, RandomChooser};
pub use classifier::{classify, is_crisis, Classification, CRISIS_KEYWORDS};
pub use conversation::{Conversation, ConversationError, ConversationState, Message, Sender, Turn};
pub use greeting::{greeting, welcome_message, TimeOfDay};
pub use responses::{crisis_response, general_pool, respond, Reply, ReplyTier, Topic};
