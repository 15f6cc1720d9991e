//! Conversational engine interface
//!
//! The live voice conversation itself runs in an external engine. The
//! controller only needs to open and close a session, ask for the capture
//! permission, and consume the engine's event stream.

mod backend;

pub use backend::{CapturePermission, ConversationEngine, EngineEvent, EngineSession, SessionHandle};
