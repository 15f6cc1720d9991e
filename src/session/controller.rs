use super::state::SessionStatus;
use super::stats::SessionStats;
use crate::audit::{AuditOutcome, AuditPipeline, TextGenerator};
use crate::engine::{CapturePermission, ConversationEngine, EngineEvent, EngineSession, SessionHandle};
use crate::error::SessionError;
use crate::scenario::{Scenario, ScenarioCatalog};
use crate::transcript::{Speaker, TranscriptCache, TranscriptLog, TranscriptSnapshot, Turn};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Drives one practice session at a time: engine lifecycle, transcript
/// accumulation, and the audit that runs when the conversation ends.
///
/// Cheap to clone; all clones share the same session.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
}

struct Inner {
    engine: Arc<dyn ConversationEngine>,
    permission: Arc<dyn CapturePermission>,
    pipeline: AuditPipeline,
    catalog: Arc<ScenarioCatalog>,
    cache: Option<TranscriptCache>,

    /// Live session state, read at the moment an event fires
    live: Mutex<LiveSession>,

    /// Audit outcome of the current session
    outcome: watch::Sender<AuditOutcome>,
}

#[derive(Default)]
struct LiveSession {
    session_id: Option<Uuid>,
    status: SessionStatus,
    scenario: Option<Scenario>,
    handle: Option<SessionHandle>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    transcript: TranscriptLog,
    pump: Option<EventPump>,

    /// One-shot latch: set by whichever termination path fires first
    audit_claimed: bool,

    last_error: Option<SessionError>,
}

/// Task forwarding one session's engine events into the controller
struct EventPump {
    drain: oneshot::Sender<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl EventPump {
    /// Handle every event already queued, then release the event channel.
    /// Returns once the pump has exited.
    async fn drain(self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.drain.send(done_tx).is_ok() {
            let _ = done_rx.await;
        }
    }
}

/// Everything one audit submission needs, captured at trigger time
struct AuditJob {
    session_id: Uuid,
    scenario: Scenario,
    transcript: TranscriptSnapshot,
}

impl SessionController {
    pub fn new(
        engine: Arc<dyn ConversationEngine>,
        permission: Arc<dyn CapturePermission>,
        generator: Arc<dyn TextGenerator>,
        catalog: Arc<ScenarioCatalog>,
        cache: Option<TranscriptCache>,
    ) -> Self {
        let (outcome, _) = watch::channel(AuditOutcome::Idle);

        Self {
            inner: Arc::new(Inner {
                engine,
                permission,
                pipeline: AuditPipeline::new(generator),
                catalog,
                cache,
                live: Mutex::new(LiveSession::default()),
                outcome,
            }),
        }
    }

    /// Start a session for the given scenario.
    ///
    /// Returns the new session ID. The transcript is cleared and the audit
    /// outcome reset only once the capture permission has been granted.
    pub async fn start(&self, scenario_id: Option<&str>) -> Result<Uuid, SessionError> {
        let scenario_id = scenario_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(SessionError::MissingScenario)?;

        let scenario = self
            .inner
            .catalog
            .get(scenario_id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownScenario(scenario_id.to_string()))?;

        {
            let mut live = self.inner.live.lock().await;
            if live.status.is_live() {
                warn!("Session already {}, ignoring start", live.status);
                return Err(SessionError::AlreadyActive);
            }
            live.status = SessionStatus::Connecting;
        }

        info!("Starting practice session for scenario: {}", scenario.id);

        if let Err(e) = self.inner.permission.request().await {
            warn!("Capture permission denied: {}", e);
            self.fail_start(e.clone()).await;
            return Err(e);
        }

        let session_id = Uuid::new_v4();
        {
            let mut live = self.inner.live.lock().await;
            if let Some(stale) = live.pump.take() {
                stale.task.abort();
            }
            live.session_id = Some(session_id);
            live.scenario = Some(scenario.clone());
            live.handle = None;
            live.started_at = Some(Utc::now());
            live.ended_at = None;
            live.audit_claimed = false;
            live.last_error = None;
            live.transcript.clear();
            self.mirror_transcript(&live).await;
            self.inner.outcome.send_replace(AuditOutcome::Idle);
        }

        let EngineSession { handle, events } =
            match self.inner.engine.open_session(&scenario.id).await {
                Ok(session) => session,
                Err(e) => {
                    error!("Engine {} failed to open session: {}", self.inner.engine.name(), e);
                    self.fail_start(e.clone()).await;
                    return Err(e);
                }
            };

        {
            let mut live = self.inner.live.lock().await;
            live.handle = Some(handle.clone());
            live.status = SessionStatus::Connected;
            live.pump = Some(self.spawn_event_pump(session_id, events));
        }

        info!(
            "Session {} connected (engine: {}, handle: {})",
            session_id,
            self.inner.engine.name(),
            handle
        );

        Ok(session_id)
    }

    /// Explicitly end the current session and audit its transcript.
    ///
    /// Events the engine delivered before the close completed are recorded
    /// before the transcript is snapshotted. Repeated calls, or a call racing
    /// an engine-initiated disconnect, are no-ops: only one audit is submitted
    /// per session. A failure to close the engine session is returned after
    /// the audit has run.
    pub async fn stop(&self) -> Result<(), SessionError> {
        let (session_id, handle, pump) = {
            let mut live = self.inner.live.lock().await;
            match live.status {
                SessionStatus::Connected if !live.audit_claimed => {}
                SessionStatus::Connected | SessionStatus::Disconnected => {
                    debug!("Session already terminating, ignoring stop");
                    return Ok(());
                }
                SessionStatus::Idle | SessionStatus::Connecting => {
                    return Err(SessionError::NotConnected);
                }
            }
            live.audit_claimed = true;
            (live.session_id, live.handle.clone(), live.pump.take())
        };

        info!("Stopping session {:?}", session_id);

        let closed = match &handle {
            Some(handle) => self.inner.engine.close_session(handle).await,
            None => Ok(()),
        };

        if let Some(pump) = pump {
            pump.drain().await;
        }

        let job = {
            let mut live = self.inner.live.lock().await;
            if live.session_id != session_id {
                // The engine disconnected and a new session started while closing
                warn!(
                    "Session {:?} was superseded while stopping, its audit is skipped",
                    session_id
                );
                return closed;
            }
            live.status = SessionStatus::Disconnected;
            live.ended_at = Some(Utc::now());
            if let Err(e) = &closed {
                error!("Failed to stop session: {}", e);
                live.last_error = Some(e.clone());
            }
            self.take_audit_job(&live)
        };

        if let Some(job) = job {
            self.run_audit(job).await;
        }

        closed
    }

    /// A message from the engine for the current session
    pub async fn on_message(
        &self,
        speaker: Speaker,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.record_turn(None, speaker, text.into()).await
    }

    /// Engine-initiated disconnect of the current session
    pub async fn on_disconnect(&self) {
        self.handle_disconnect(None).await
    }

    /// Dispatch one engine event belonging to `session_id`
    pub async fn handle_event(&self, session_id: Uuid, event: EngineEvent) {
        match event {
            EngineEvent::Connected => debug!("Engine confirmed session {}", session_id),
            EngineEvent::Message { speaker, text } => {
                if let Err(e) = self.record_turn(Some(session_id), speaker, text).await {
                    warn!("Dropping message for session {}: {}", session_id, e);
                }
            }
            EngineEvent::Error { detail } => {
                error!("Engine error in session {}: {}", session_id, detail);
                let mut live = self.inner.live.lock().await;
                if live.session_id == Some(session_id) {
                    live.last_error = Some(SessionError::EngineError(detail));
                }
            }
            EngineEvent::Disconnected => self.handle_disconnect(Some(session_id)).await,
        }
    }

    pub async fn status(&self) -> SessionStatus {
        self.inner.live.lock().await.status
    }

    /// Copy of the current transcript
    pub async fn transcript(&self) -> Vec<Turn> {
        self.inner.live.lock().await.transcript.turns().to_vec()
    }

    /// Current audit outcome
    pub fn outcome(&self) -> AuditOutcome {
        self.inner.outcome.borrow().clone()
    }

    /// Watch the audit outcome; resolves through `Loading` to a terminal state
    pub fn subscribe_outcome(&self) -> watch::Receiver<AuditOutcome> {
        self.inner.outcome.subscribe()
    }

    /// Last session-level error (engine error event or stop failure)
    pub async fn last_session_error(&self) -> Option<SessionError> {
        self.inner.live.lock().await.last_error.clone()
    }

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.inner.catalog
    }

    /// Get current session statistics
    pub async fn stats(&self) -> SessionStats {
        let live = self.inner.live.lock().await;

        let duration_secs = live
            .started_at
            .map(|started| {
                let end = live.ended_at.unwrap_or_else(Utc::now);
                end.signed_duration_since(started).num_milliseconds() as f64 / 1000.0
            })
            .unwrap_or(0.0);

        SessionStats {
            status: live.status,
            session_id: live.session_id,
            scenario_id: live.scenario.as_ref().map(|s| s.id.clone()),
            started_at: live.started_at,
            duration_secs,
            turn_count: live.transcript.len(),
        }
    }

    async fn fail_start(&self, error: SessionError) {
        let mut live = self.inner.live.lock().await;
        live.status = SessionStatus::Idle;
        live.last_error = Some(error);
    }

    /// Forward engine events, in order, until the engine disconnects or a
    /// drain is requested. A closed channel counts as a disconnect.
    fn spawn_event_pump(
        &self,
        session_id: Uuid,
        mut events: mpsc::Receiver<EngineEvent>,
    ) -> EventPump {
        let controller = self.clone();
        let (drain, mut drain_rx) = oneshot::channel::<oneshot::Sender<()>>();

        let task = tokio::spawn(async move {
            debug!("Event pump for session {} started", session_id);

            loop {
                tokio::select! {
                    biased;

                    event = events.recv() => match event {
                        Some(event) => {
                            let last = event == EngineEvent::Disconnected;
                            controller.handle_event(session_id, event).await;
                            if last {
                                return;
                            }
                        }
                        None => {
                            debug!("Event stream for session {} closed", session_id);
                            controller.handle_disconnect(Some(session_id)).await;
                            return;
                        }
                    },

                    request = &mut drain_rx => {
                        // Buffered events are still delivered after close
                        events.close();
                        while let Some(event) = events.recv().await {
                            controller.handle_event(session_id, event).await;
                        }
                        debug!("Event pump for session {} drained", session_id);

                        if let Ok(done) = request {
                            let _ = done.send(());
                        }
                        return;
                    }
                }
            }
        });

        EventPump { drain, task }
    }

    async fn record_turn(
        &self,
        expected: Option<Uuid>,
        speaker: Speaker,
        text: String,
    ) -> Result<(), SessionError> {
        let mut live = self.inner.live.lock().await;

        if expected.is_some() && live.session_id != expected {
            debug!("Ignoring message from superseded session {:?}", expected);
            return Ok(());
        }
        if live.status != SessionStatus::Connected {
            return Err(SessionError::NotConnected);
        }

        live.transcript.append(Turn::now(speaker, text));
        debug!("Recorded turn #{} ({})", live.transcript.len(), speaker);

        self.mirror_transcript(&live).await;
        Ok(())
    }

    async fn handle_disconnect(&self, expected: Option<Uuid>) {
        let job = {
            let mut live = self.inner.live.lock().await;

            if expected.is_some() && live.session_id != expected {
                debug!("Ignoring disconnect from superseded session {:?}", expected);
                return;
            }
            if live.status != SessionStatus::Connected {
                return;
            }

            info!("Engine disconnected session {:?}", live.session_id);
            live.status = SessionStatus::Disconnected;
            live.ended_at = Some(Utc::now());
            live.pump = None;

            if live.audit_claimed {
                // stop() is already closing this session and will audit it
                return;
            }
            live.audit_claimed = true;
            self.take_audit_job(&live)
        };

        if let Some(job) = job {
            self.run_audit(job).await;
        }
    }

    /// Snapshot the transcript as of now and flip the outcome to `Loading`.
    /// Caller must hold the claimed latch.
    fn take_audit_job(&self, live: &LiveSession) -> Option<AuditJob> {
        let (Some(session_id), Some(scenario)) = (live.session_id, live.scenario.clone()) else {
            return None;
        };

        self.inner.outcome.send_replace(AuditOutcome::Loading);

        Some(AuditJob {
            session_id,
            scenario,
            transcript: live.transcript.snapshot(),
        })
    }

    async fn run_audit(&self, job: AuditJob) {
        info!(
            "Auditing session {} ({} turns)",
            job.session_id,
            job.transcript.len()
        );

        let outcome = self.inner.pipeline.run(&job.scenario, &job.transcript).await;

        let live = self.inner.live.lock().await;
        if live.session_id == Some(job.session_id) {
            self.inner.outcome.send_replace(outcome);
        } else {
            warn!(
                "Discarding audit result of superseded session {}",
                job.session_id
            );
        }
    }

    async fn mirror_transcript(&self, live: &LiveSession) {
        if let Some(cache) = &self.inner.cache {
            if let Err(e) = cache.store(live.transcript.turns()).await {
                warn!("Failed to mirror transcript: {:#}", e);
            }
        }
    }
}
