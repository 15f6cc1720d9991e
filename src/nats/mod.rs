pub mod client;
pub mod messages;

pub use client::NatsEngine;
pub use messages::{
    CloseSessionReply, CloseSessionRequest, OpenSessionReply, OpenSessionRequest, PermissionReply,
};
