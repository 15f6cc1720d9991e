// Shared fakes for controller and API tests
#![allow(dead_code)]

use practice_audit::{
    AuditError, AuditOutcome, CapturePermission, ConversationEngine, EngineEvent, EngineSession,
    Scenario, ScenarioCatalog, SessionController, SessionError, SessionHandle, TextGenerator,
    TranscriptCache,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};

pub const SCENARIO_ID: &str = "agent_sales_en";

pub fn scenario() -> Scenario {
    Scenario {
        id: SCENARIO_ID.to_string(),
        program: "Sample Scenarios".to_string(),
        title: "Overcoming Objections in Sales".to_string(),
        narrative: "Sell a pen to Anna.".to_string(),
        rating_prompt_template: Some("Rate the sales agent.\n\nConversation Transcript:".to_string()),
    }
}

pub fn catalog() -> Arc<ScenarioCatalog> {
    Arc::new(ScenarioCatalog::from_scenarios(vec![scenario()]).unwrap())
}

pub fn valid_report_json() -> String {
    r#"{
        "summary": "The agent handled the call well.",
        "ratings": {
            "respectful_introduction": { "stars": 4, "explanation": "Polite opener." },
            "call_to_action_appropriate": { "stars": 2, "explanation": "Too pushy." }
        },
        "overall_sentiment": "Positive",
        "areas_for_improvement": ["Slow down the close"]
    }"#
    .to_string()
}

/// Engine whose event stream is driven by the test
#[derive(Default)]
pub struct FakeEngine {
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    pub fail_open: bool,
    pub fail_close: bool,
    /// Emit `Disconnected` when the session is closed, like a real engine
    pub disconnect_on_close: bool,
    /// When set, `close_session` waits for a permit after counting the close
    pub close_gate: Option<Semaphore>,
    events: Mutex<Option<mpsc::Sender<EngineEvent>>>,
}

impl FakeEngine {
    pub fn disconnecting_on_close() -> Self {
        Self {
            disconnect_on_close: true,
            ..Default::default()
        }
    }

    pub fn failing_open() -> Self {
        Self {
            fail_open: true,
            ..Default::default()
        }
    }

    pub fn failing_close() -> Self {
        Self {
            fail_close: true,
            ..Default::default()
        }
    }

    pub fn gated_close() -> Self {
        Self {
            close_gate: Some(Semaphore::new(0)),
            ..Default::default()
        }
    }

    pub fn sender(&self) -> mpsc::Sender<EngineEvent> {
        self.events
            .lock()
            .unwrap()
            .clone()
            .expect("no open session")
    }

    pub async fn emit(&self, event: EngineEvent) {
        self.sender().send(event).await.unwrap();
    }

    /// Drop the event sender without a `Disconnected` event
    pub fn hang_up(&self) {
        self.events.lock().unwrap().take();
    }
}

#[async_trait::async_trait]
impl ConversationEngine for FakeEngine {
    async fn open_session(&self, agent_id: &str) -> Result<EngineSession, SessionError> {
        if self.fail_open {
            return Err(SessionError::EngineStartFailure("agent offline".to_string()));
        }

        let n = self.opened.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::channel(100);
        *self.events.lock().unwrap() = Some(tx);

        Ok(EngineSession {
            handle: SessionHandle(format!("{}-{}", agent_id, n)),
            events: rx,
        })
    }

    async fn close_session(&self, _handle: &SessionHandle) -> Result<(), SessionError> {
        self.closed.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.close_gate {
            gate.acquire().await.unwrap().forget();
        }

        if self.disconnect_on_close {
            let tx = self.events.lock().unwrap().clone();
            if let Some(tx) = tx {
                let _ = tx.send(EngineEvent::Disconnected).await;
            }
        }

        if self.fail_close {
            return Err(SessionError::EngineStopFailure("socket already gone".to_string()));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

pub struct FakePermission {
    pub granted: bool,
}

#[async_trait::async_trait]
impl CapturePermission for FakePermission {
    async fn request(&self) -> Result<(), SessionError> {
        if self.granted {
            Ok(())
        } else {
            Err(SessionError::PermissionDenied("microphone blocked".to_string()))
        }
    }
}

/// Records every prompt and answers with a fixed response
pub struct RecordingGenerator {
    pub response: Result<String, AuditError>,
    pub prompts: Mutex<Vec<String>>,
    pub completed: AtomicUsize,
    /// When set, each submission waits for a permit
    pub gate: Option<Semaphore>,
}

impl RecordingGenerator {
    pub fn answering(response: Result<String, AuditError>) -> Self {
        Self {
            response,
            prompts: Mutex::new(Vec::new()),
            completed: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn gated(response: Result<String, AuditError>) -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::answering(response)
        }
    }

    pub fn submissions(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl TextGenerator for RecordingGenerator {
    async fn submit(&self, prompt: &str) -> Result<String, AuditError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        self.completed.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

pub struct Harness {
    pub controller: SessionController,
    pub engine: Arc<FakeEngine>,
    pub generator: Arc<RecordingGenerator>,
}

pub fn harness(engine: FakeEngine, granted: bool, generator: RecordingGenerator) -> Harness {
    harness_with_cache(engine, granted, generator, None)
}

pub fn harness_with_cache(
    engine: FakeEngine,
    granted: bool,
    generator: RecordingGenerator,
    cache: Option<TranscriptCache>,
) -> Harness {
    let engine = Arc::new(engine);
    let generator = Arc::new(generator);

    let controller = SessionController::new(
        engine.clone(),
        Arc::new(FakePermission { granted }),
        generator.clone(),
        catalog(),
        cache,
    );

    Harness {
        controller,
        engine,
        generator,
    }
}

/// Wait until the audit settles into `Success` or `Failure`
pub async fn terminal_outcome(controller: &SessionController) -> AuditOutcome {
    let mut rx = controller.subscribe_outcome();
    let outcome = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|o| o.is_terminal()))
        .await
        .expect("audit did not finish in time")
        .expect("outcome channel closed");
    outcome.clone()
}
