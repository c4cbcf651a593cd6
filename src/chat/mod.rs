//! Chat state management
//!
//! Three collaborating pieces: [`SessionList`] mirrors the server's session
//! collection, [`ChatController`] owns the active conversation and its
//! transcript, and [`ReloadGuard`] closes the race between session
//! auto-creation and the history reload a session switch would trigger.

pub mod controller;
pub mod guard;
pub mod session_list;

pub use controller::{
    ChatController, ChatPhase, HistoryTicket, SendOutcome, SendStart, SendTicket,
    SEND_FAILURE_APOLOGY, WELCOME_EMPTY_SESSION, WELCOME_NO_SESSION,
};
pub use guard::ReloadGuard;
pub use session_list::{SessionList, TimeBucket};
