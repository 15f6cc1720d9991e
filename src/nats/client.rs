use super::messages::{
    CloseSessionReply, CloseSessionRequest, OpenSessionReply, OpenSessionRequest, PermissionReply,
};
use crate::engine::{CapturePermission, ConversationEngine, EngineEvent, EngineSession, SessionHandle};
use crate::error::SessionError;
use anyhow::{Context, Result};
use async_nats::Client;
use futures::stream::StreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

const PERMISSION_SUBJECT: &str = "conversation.control.permission";
const OPEN_SUBJECT: &str = "conversation.control.open";
const CLOSE_SUBJECT: &str = "conversation.control.close";

/// Conversational engine reached over NATS request/reply.
///
/// Session events are published by the engine on
/// `conversation.event.<session id>` and forwarded, in order, to the
/// controller.
pub struct NatsEngine {
    client: Client,
}

impl NatsEngine {
    /// Connect to NATS server
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client })
    }

    fn event_subject(session_id: &str) -> String {
        format!("conversation.event.{}", session_id)
    }

    async fn call<Req, Reply>(&self, subject: &str, body: &Req) -> Result<Reply>
    where
        Req: Serialize,
        Reply: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body)?;

        let message = self
            .client
            .request(subject.to_string(), payload.into())
            .await
            .with_context(|| format!("Request on {} failed", subject))?;

        serde_json::from_slice(&message.payload)
            .with_context(|| format!("Malformed reply on {}", subject))
    }
}

#[async_trait::async_trait]
impl CapturePermission for NatsEngine {
    async fn request(&self) -> Result<(), SessionError> {
        let reply: PermissionReply = self
            .call(PERMISSION_SUBJECT, &serde_json::json!({}))
            .await
            .map_err(|e| SessionError::PermissionDenied(format!("{:#}", e)))?;

        if reply.granted {
            Ok(())
        } else {
            Err(SessionError::PermissionDenied(
                reply.reason.unwrap_or_else(|| "capture access refused".to_string()),
            ))
        }
    }
}

#[async_trait::async_trait]
impl ConversationEngine for NatsEngine {
    async fn open_session(&self, agent_id: &str) -> Result<EngineSession, SessionError> {
        // Subscribe before asking the engine to open so no early event is missed
        let session_id = uuid::Uuid::new_v4().to_string();
        let subject = Self::event_subject(&session_id);
        let mut subscriber = self
            .client
            .subscribe(subject.clone())
            .await
            .map_err(|e| SessionError::EngineStartFailure(e.to_string()))?;

        info!("Subscribed to {}", subject);

        let reply: OpenSessionReply = self
            .call(
                OPEN_SUBJECT,
                &OpenSessionRequest {
                    agent_id: agent_id.to_string(),
                    session_id: session_id.clone(),
                },
            )
            .await
            .map_err(|e| SessionError::EngineStartFailure(format!("{:#}", e)))?;

        if let Some(detail) = reply.error {
            return Err(SessionError::EngineStartFailure(detail));
        }

        let (event_tx, event_rx) = mpsc::channel(100);

        // Spawn event forwarding task
        tokio::spawn(async move {
            loop {
                let msg = tokio::select! {
                    msg = subscriber.next() => match msg {
                        Some(msg) => msg,
                        None => break,
                    },
                    // Controller released the session
                    _ = event_tx.closed() => break,
                };

                match serde_json::from_slice::<EngineEvent>(&msg.payload) {
                    Ok(event) => {
                        let last = event == EngineEvent::Disconnected;
                        if event_tx.send(event).await.is_err() {
                            break;
                        }
                        if last {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to parse engine event on {}: {}", subject, e);
                    }
                }
            }

            info!("Engine event task for {} stopped", subject);
        });

        Ok(EngineSession {
            handle: SessionHandle(session_id),
            events: event_rx,
        })
    }

    async fn close_session(&self, handle: &SessionHandle) -> Result<(), SessionError> {
        let reply: CloseSessionReply = self
            .call(
                CLOSE_SUBJECT,
                &CloseSessionRequest {
                    session_id: handle.0.clone(),
                },
            )
            .await
            .map_err(|e| SessionError::EngineStopFailure(format!("{:#}", e)))?;

        match reply.error {
            Some(detail) => {
                error!("Engine failed to close session {}: {}", handle, detail);
                Err(SessionError::EngineStopFailure(detail))
            }
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "nats"
    }
}
