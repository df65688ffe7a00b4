// ABOUTME: Chat turn controller: submit a message, poll its job, then append the reply
// ABOUTME: One turn at a time per controller; the poll task is aborted on session switch or drop
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Chat Poller
//!
//! A turn moves `Idle -> Sending -> Polling -> Idle`. The job status is read
//! on a fixed interval with no upper bound on attempts; status-check
//! failures are logged and the next tick tries again. The poll runs as a
//! tokio task owned by a [`PollGuard`], so dropping the controller or
//! switching sessions stops it.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use super::transcript::{Bubble, Transcript};
use crate::client::{BackendClient, Credentials};
use crate::config::ChatConfig;
use crate::constants::chat;
use crate::errors::{ActionError, ActionResult};
use crate::logging::AppLogger;
use crate::views::notifications::Toast;
use xaze_core::models::{HistoryMessage, JobState, JobStatus, JobTicket, SendMessageRequest};

/// Backend operations a chat turn needs
#[async_trait]
pub trait ChatBackend: Send + Sync + 'static {
    /// Start a session and return its id
    async fn create_session(&self, knowledge_base_id: &str) -> ActionResult<String>;
    /// Submit a message and return the job to poll
    async fn send_message(&self, session_id: &str, content: &str) -> ActionResult<JobTicket>;
    /// Current state of a job
    async fn job_status(&self, job_id: &str) -> ActionResult<JobStatus>;
    /// Session history, oldest first
    async fn history(&self, session_id: &str) -> ActionResult<Vec<HistoryMessage>>;
}

/// Backend client bound to one playground API key
#[derive(Clone)]
pub struct ApiKeyChat {
    client: BackendClient,
    credentials: Credentials,
    language: String,
    use_history: bool,
}

impl ApiKeyChat {
    /// Bind a client to an API key
    #[must_use]
    pub fn new(client: BackendClient, credentials: Credentials, config: &ChatConfig) -> Self {
        Self {
            client,
            credentials,
            language: config.language.clone(),
            use_history: config.use_history,
        }
    }
}

#[async_trait]
impl ChatBackend for ApiKeyChat {
    async fn create_session(&self, knowledge_base_id: &str) -> ActionResult<String> {
        self.client
            .create_chat_session(Some(&self.credentials), knowledge_base_id)
            .await
    }

    async fn send_message(&self, session_id: &str, content: &str) -> ActionResult<JobTicket> {
        let request = SendMessageRequest {
            content: content.to_owned(),
            language: self.language.clone(),
            use_history: self.use_history,
        };
        self.client
            .send_chat_message(Some(&self.credentials), session_id, &request)
            .await
    }

    async fn job_status(&self, job_id: &str) -> ActionResult<JobStatus> {
        self.client
            .chat_job_status(Some(&self.credentials), job_id)
            .await
    }

    async fn history(&self, session_id: &str) -> ActionResult<Vec<HistoryMessage>> {
        self.client
            .chat_history(Some(&self.credentials), session_id)
            .await
    }
}

/// Where the current turn stands
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TurnPhase {
    /// Ready for input
    Idle,
    /// Message submitted, waiting for a job id
    Sending,
    /// Waiting for the job to finish
    Polling {
        /// Job being polled
        job_id: String,
    },
}

impl TurnPhase {
    /// Whether a new turn may start
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Errors raised when starting a turn or changing sessions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// A reply is still pending
    #[error("A reply is still pending")]
    TurnInProgress,
    /// A backend action failed
    #[error(transparent)]
    Action(#[from] ActionError),
}

/// Aborts the owned task when dropped
#[derive(Debug)]
pub struct PollGuard(JoinHandle<()>);

impl PollGuard {
    /// Whether the task has ended
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

impl Drop for PollGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

#[derive(Debug, Default)]
struct ChatState {
    session_id: Option<String>,
    knowledge_base_id: Option<String>,
    transcript: Transcript,
    notices: Vec<Toast>,
    // Bumped whenever the transcript is replaced; stale poll results are dropped
    generation: u64,
}

/// Everything a renderer needs to draw the chat pane
#[derive(Debug, Clone, Serialize)]
pub struct ChatSnapshot {
    /// Selected session
    pub session_id: Option<String>,
    /// Selected knowledge base
    pub knowledge_base_id: Option<String>,
    /// Turn state
    pub phase: TurnPhase,
    /// Transcript bubbles
    pub messages: Vec<Bubble>,
    /// Toasts raised since the previous snapshot
    pub notices: Vec<Toast>,
}

/// Chat state and turn orchestration for one API key
pub struct ChatController<B: ChatBackend> {
    backend: Arc<B>,
    poll_interval: Duration,
    state: Arc<Mutex<ChatState>>,
    phase: Arc<watch::Sender<TurnPhase>>,
    poll: Mutex<Option<PollGuard>>,
}

impl<B: ChatBackend> ChatController<B> {
    /// Controller polling every `poll_interval`
    #[must_use]
    pub fn new(backend: B, poll_interval: Duration) -> Self {
        let (phase, _) = watch::channel(TurnPhase::Idle);
        Self {
            backend: Arc::new(backend),
            poll_interval,
            state: Arc::new(Mutex::new(ChatState::default())),
            phase: Arc::new(phase),
            poll: Mutex::new(None),
        }
    }

    /// Current turn phase
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase.borrow().clone()
    }

    /// Selected session id
    pub async fn session_id(&self) -> Option<String> {
        self.state.lock().await.session_id.clone()
    }

    /// Selected knowledge base id
    pub async fn knowledge_base_id(&self) -> Option<String> {
        self.state.lock().await.knowledge_base_id.clone()
    }

    /// Select the knowledge base new sessions are started against
    pub async fn select_knowledge_base(&self, knowledge_base_id: &str) {
        let mut state = self.state.lock().await;
        state.knowledge_base_id =
            Some(knowledge_base_id.trim().to_owned()).filter(|id| !id.is_empty());
    }

    /// Restore persisted selections and reload the session history
    ///
    /// History failures leave the transcript empty.
    pub async fn restore(&self, session_id: Option<String>, knowledge_base_id: Option<String>) {
        {
            let mut state = self.state.lock().await;
            if knowledge_base_id.is_some() {
                state.knowledge_base_id = knowledge_base_id;
            }
            state.session_id.clone_from(&session_id);
        }
        let Some(session_id) = session_id else {
            return;
        };
        match self.backend.history(&session_id).await {
            Ok(history) => {
                let mut state = self.state.lock().await;
                if state.transcript.is_empty() && state.session_id.as_deref() == Some(&session_id) {
                    state.transcript = Transcript::from_history(&history);
                }
            }
            Err(e) => debug!(session_id = %session_id, error = %e, "Failed to restore chat history"),
        }
    }

    /// Start a chat turn
    ///
    /// Blank input is ignored and yields `Ok(None)`. Without a session one is
    /// started against the selected knowledge base first. On success the
    /// transcript ends with the pending placeholder and a poll task runs.
    ///
    /// # Errors
    ///
    /// `TurnInProgress` while another turn is pending; `Action` when no
    /// knowledge base is selected, the session cannot be started, or the
    /// message is rejected (the transcript then shows `Error: <message>`).
    pub async fn send(&self, content: &str) -> Result<Option<JobTicket>, ChatError> {
        if content.trim().is_empty() {
            return Ok(None);
        }
        let claimed = self.phase.send_if_modified(|phase| {
            if phase.is_idle() {
                *phase = TurnPhase::Sending;
                true
            } else {
                false
            }
        });
        if !claimed {
            return Err(ChatError::TurnInProgress);
        }

        let generation = self.state.lock().await.generation;
        let result = self.submit(content, generation).await;

        // Lock order is poll then state, matching `reset`
        let mut poll = self.poll.lock().await;
        let mut state = self.state.lock().await;
        if state.generation != generation {
            // The session changed while sending; the newer selection owns the phase
            return result.map(|(ticket, _)| Some(ticket));
        }
        match result {
            Ok((ticket, session_id)) => {
                self.phase.send_replace(TurnPhase::Polling {
                    job_id: ticket.job_id.clone(),
                });
                let task = tokio::spawn(poll_job(
                    Arc::clone(&self.backend),
                    Arc::clone(&self.state),
                    Arc::clone(&self.phase),
                    self.poll_interval,
                    Turn {
                        session_id,
                        job_id: ticket.job_id.clone(),
                        generation,
                    },
                ));
                *poll = Some(PollGuard(task));
                Ok(Some(ticket))
            }
            Err(e) => {
                if let ChatError::Action(action) = &e {
                    if state.transcript.is_pending() {
                        state
                            .transcript
                            .resolve(Bubble::error(format!("Error: {}", action.message)));
                    }
                }
                self.phase.send_replace(TurnPhase::Idle);
                Err(e)
            }
        }
    }

    async fn submit(&self, content: &str, generation: u64) -> Result<(JobTicket, String), ChatError> {
        let session_id = self.ensure_session(generation).await?;
        {
            let mut state = self.state.lock().await;
            if state.generation == generation {
                state.transcript.begin_turn(content);
            }
        }
        let ticket = self.backend.send_message(&session_id, content).await?;
        Ok((ticket, session_id))
    }

    async fn ensure_session(&self, generation: u64) -> Result<String, ChatError> {
        let knowledge_base_id = {
            let state = self.state.lock().await;
            if let Some(session_id) = &state.session_id {
                return Ok(session_id.clone());
            }
            state.knowledge_base_id.clone()
        };
        let Some(knowledge_base_id) = knowledge_base_id else {
            return Err(ActionError::validation("Knowledge Base ID is required").into());
        };
        let session_id = self
            .backend
            .create_session(&knowledge_base_id)
            .await
            .map_err(|e| ActionError::new(e.kind, "Failed to auto-start session"))?;
        let mut state = self.state.lock().await;
        if state.generation == generation {
            state.session_id = Some(session_id.clone());
        }
        Ok(session_id)
    }

    /// Start a fresh session against the selected knowledge base
    ///
    /// Any pending poll is abandoned and the transcript is cleared.
    ///
    /// # Errors
    ///
    /// `Action` when no knowledge base is selected or the backend refuses
    pub async fn start_new_session(&self) -> Result<String, ChatError> {
        let knowledge_base_id = self.state.lock().await.knowledge_base_id.clone();
        let Some(knowledge_base_id) = knowledge_base_id else {
            return Err(ActionError::validation("Knowledge Base ID is required").into());
        };
        let session_id = self.backend.create_session(&knowledge_base_id).await?;
        self.reset(Some(session_id.clone())).await;
        Ok(session_id)
    }

    /// Select another session and load its history
    ///
    /// Any pending poll is abandoned first.
    ///
    /// # Errors
    ///
    /// `Action` with `Failed to load session history` when the history cannot
    /// be read; the session stays selected with an empty transcript
    pub async fn switch_session(&self, session_id: &str) -> Result<(), ChatError> {
        self.reset(Some(session_id.to_owned())).await;
        let history = self
            .backend
            .history(session_id)
            .await
            .map_err(|e| ActionError::new(e.kind, "Failed to load session history"))?;
        let mut state = self.state.lock().await;
        if state.session_id.as_deref() == Some(session_id) {
            state.transcript = Transcript::from_history(&history);
        }
        Ok(())
    }

    async fn reset(&self, session_id: Option<String>) {
        let mut poll = self.poll.lock().await;
        if let Some(guard) = poll.take() {
            if !guard.is_finished() {
                debug!("Abandoning pending chat poll");
            }
        }
        // Held until the generation moves so `send` cannot store a stale guard
        let mut state = self.state.lock().await;
        state.session_id = session_id;
        state.transcript.clear();
        state.generation += 1;
        self.phase.send_replace(TurnPhase::Idle);
    }

    /// Snapshot for rendering; drains pending notices
    pub async fn snapshot(&self) -> ChatSnapshot {
        let mut state = self.state.lock().await;
        ChatSnapshot {
            session_id: state.session_id.clone(),
            knowledge_base_id: state.knowledge_base_id.clone(),
            phase: self.phase(),
            messages: state.transcript.messages().to_vec(),
            notices: std::mem::take(&mut state.notices),
        }
    }

    /// Wait until no turn is pending
    pub async fn wait_idle(&self) {
        let mut phase = self.phase.subscribe();
        // The sender lives as long as `self`, so this only ends when idle
        let _ = phase.wait_for(TurnPhase::is_idle).await;
    }
}

struct Turn {
    session_id: String,
    job_id: String,
    generation: u64,
}

async fn poll_job<B: ChatBackend>(
    backend: Arc<B>,
    state: Arc<Mutex<ChatState>>,
    phase: Arc<watch::Sender<TurnPhase>>,
    every: Duration,
    turn: Turn,
) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    let mut polls: u64 = 0;
    let (bubble, notice, outcome) = loop {
        ticker.tick().await;
        polls += 1;
        let status = match backend.job_status(&turn.job_id).await {
            Ok(status) => status,
            Err(e) => {
                warn!(job_id = %turn.job_id, error = %e, "Chat job status check failed");
                continue;
            }
        };
        match status.status {
            JobState::Completed => {
                break (latest_reply(backend.as_ref(), &turn.session_id).await, None, "completed");
            }
            JobState::Failed => {
                let error = status.error.unwrap_or_default();
                break (
                    Bubble::error(format!("Error: {error}")),
                    Some(Toast::error(format!("Job failed: {error}"))),
                    "failed",
                );
            }
            JobState::Pending | JobState::Other(_) => {}
        }
    };

    let mut state = state.lock().await;
    if state.generation != turn.generation {
        return;
    }
    state.transcript.resolve(bubble);
    state.notices.extend(notice);
    phase.send_replace(TurnPhase::Idle);
    AppLogger::log_chat_turn(&turn.session_id, &turn.job_id, outcome, polls);
}

/// The newest history entry when it is an assistant reply
async fn latest_reply<B: ChatBackend>(backend: &B, session_id: &str) -> Bubble {
    let history = backend.history(session_id).await.unwrap_or_else(|e| {
        warn!(session_id = %session_id, error = %e, "Failed to fetch chat history");
        Vec::new()
    });
    match history.last() {
        Some(message) if message.is_assistant() => Bubble::assistant(message.content.clone()),
        _ => Bubble::error(chat::NO_RESPONSE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use xaze_core::errors::ActionErrorKind;

    #[derive(Default)]
    struct Scripted {
        statuses: std::sync::Mutex<VecDeque<ActionResult<JobStatus>>>,
        history: Vec<HistoryMessage>,
        fail_send: bool,
        fail_create: bool,
        yield_on_send: bool,
        sessions_created: AtomicUsize,
    }

    impl Scripted {
        fn with_statuses(statuses: Vec<ActionResult<JobStatus>>) -> Self {
            Self {
                statuses: std::sync::Mutex::new(statuses.into()),
                ..Self::default()
            }
        }
    }

    fn status(state: &str, error: Option<&str>) -> ActionResult<JobStatus> {
        Ok(JobStatus {
            status: JobState::parse(state),
            error: error.map(str::to_owned),
        })
    }

    #[async_trait]
    impl ChatBackend for Scripted {
        async fn create_session(&self, _knowledge_base_id: &str) -> ActionResult<String> {
            if self.fail_create {
                return Err(ActionError::backend(500, "Failed to start session"));
            }
            let n = self.sessions_created.fetch_add(1, Ordering::SeqCst);
            Ok(format!("s{n}"))
        }

        async fn send_message(&self, _session_id: &str, _content: &str) -> ActionResult<JobTicket> {
            if self.yield_on_send {
                tokio::task::yield_now().await;
            }
            if self.fail_send {
                return Err(ActionError::backend(429, "Insufficient credits"));
            }
            Ok(JobTicket {
                job_id: "job-1".into(),
            })
        }

        async fn job_status(&self, _job_id: &str) -> ActionResult<JobStatus> {
            self.statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| status("pending", None))
        }

        async fn history(&self, _session_id: &str) -> ActionResult<Vec<HistoryMessage>> {
            Ok(self.history.clone())
        }
    }

    fn controller(backend: Scripted) -> ChatController<Scripted> {
        ChatController::new(backend, Duration::from_millis(5))
    }

    fn message(role: &str, content: &str) -> HistoryMessage {
        HistoryMessage {
            role: role.into(),
            content: content.into(),
        }
    }

    #[tokio::test]
    async fn test_completed_job_appends_latest_reply() {
        let mut backend = Scripted::with_statuses(vec![
            status("pending", None),
            Err(ActionError::network()),
            status("completed", None),
        ]);
        backend.history = vec![message("user", "hi"), message("assistant", "hello!")];
        let chat = controller(backend);
        chat.select_knowledge_base("kb1").await;

        let ticket = chat.send("hi").await.unwrap();
        assert_eq!(ticket.map(|t| t.job_id).as_deref(), Some("job-1"));
        chat.wait_idle().await;

        let snapshot = chat.snapshot().await;
        assert_eq!(snapshot.session_id.as_deref(), Some("s0"));
        assert_eq!(
            snapshot.messages,
            vec![Bubble::user("hi"), Bubble::assistant("hello!")]
        );
        assert!(snapshot.notices.is_empty());
    }

    #[tokio::test]
    async fn test_completed_without_assistant_reply() {
        let mut backend = Scripted::with_statuses(vec![status("completed", None)]);
        backend.history = vec![message("user", "hi")];
        let chat = controller(backend);
        chat.restore(Some("s9".into()), None).await;

        chat.send("hi").await.unwrap();
        chat.wait_idle().await;

        let snapshot = chat.snapshot().await;
        let last = snapshot.messages.last().unwrap();
        assert_eq!(last, &Bubble::error("(No response received)"));
    }

    #[tokio::test]
    async fn test_failed_job_shows_error_and_toast() {
        let chat = controller(Scripted::with_statuses(vec![status(
            "failed",
            Some("quota exceeded"),
        )]));
        chat.select_knowledge_base("kb1").await;

        chat.send("hi").await.unwrap();
        chat.wait_idle().await;

        let snapshot = chat.snapshot().await;
        assert_eq!(
            snapshot.messages.last(),
            Some(&Bubble::error("Error: quota exceeded"))
        );
        assert_eq!(snapshot.notices, vec![Toast::error("Job failed: quota exceeded")]);
        assert!(chat.snapshot().await.notices.is_empty());
    }

    #[tokio::test]
    async fn test_second_send_while_polling_is_rejected() {
        let chat = controller(Scripted::default());
        chat.select_knowledge_base("kb1").await;

        chat.send("first").await.unwrap();
        assert!(matches!(chat.phase(), TurnPhase::Polling { .. }));
        assert_eq!(chat.send("second").await, Err(ChatError::TurnInProgress));
    }

    #[tokio::test]
    async fn test_switch_session_cancels_poll() {
        let mut backend = Scripted::default();
        backend.history = vec![message("assistant", "earlier reply")];
        let chat = controller(backend);
        chat.select_knowledge_base("kb1").await;

        chat.send("first").await.unwrap();
        chat.switch_session("other").await.unwrap();

        assert_eq!(chat.phase(), TurnPhase::Idle);
        let snapshot = chat.snapshot().await;
        assert_eq!(snapshot.session_id.as_deref(), Some("other"));
        assert_eq!(snapshot.messages, vec![Bubble::assistant("earlier reply")]);
        assert!(chat.send("again").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_send_failure_replaces_placeholder() {
        let backend = Scripted {
            fail_send: true,
            ..Scripted::default()
        };
        let chat = controller(backend);
        chat.select_knowledge_base("kb1").await;

        let err = chat.send("hi").await.unwrap_err();
        assert!(matches!(err, ChatError::Action(ref e) if e.message == "Insufficient credits"));
        assert_eq!(chat.phase(), TurnPhase::Idle);
        let snapshot = chat.snapshot().await;
        assert_eq!(
            snapshot.messages,
            vec![Bubble::user("hi"), Bubble::error("Error: Insufficient credits")]
        );
    }

    #[tokio::test]
    async fn test_send_requires_knowledge_base_without_session() {
        let chat = controller(Scripted::default());
        let err = chat.send("hi").await.unwrap_err();
        assert!(
            matches!(err, ChatError::Action(ref e) if e.message == "Knowledge Base ID is required")
        );
        assert!(chat.snapshot().await.messages.is_empty());
        assert_eq!(chat.send("   ").await, Ok(None));
    }

    #[tokio::test]
    async fn test_auto_start_failure_message() {
        let backend = Scripted {
            fail_create: true,
            ..Scripted::default()
        };
        let chat = controller(backend);
        chat.select_knowledge_base("kb1").await;
        let err = chat.send("hi").await.unwrap_err();
        assert_eq!(
            err,
            ChatError::Action(ActionError::new(
                ActionErrorKind::Backend { status: 500 },
                "Failed to auto-start session"
            ))
        );
        assert_eq!(chat.phase(), TurnPhase::Idle);
    }

    #[tokio::test]
    async fn test_start_new_session_clears_transcript() {
        let mut backend = Scripted::default();
        backend.history = vec![message("assistant", "old")];
        let chat = controller(backend);
        chat.select_knowledge_base("kb1").await;
        chat.restore(Some("s-old".into()), None).await;
        assert_eq!(chat.snapshot().await.messages.len(), 1);

        let session_id = chat.start_new_session().await.unwrap();
        assert_eq!(session_id, "s0");
        let snapshot = chat.snapshot().await;
        assert!(snapshot.messages.is_empty());
        assert_eq!(snapshot.session_id.as_deref(), Some("s0"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_switch_racing_send_leaves_no_stale_poll() {
        for _ in 0..100 {
            let backend = Scripted {
                yield_on_send: true,
                ..Scripted::default()
            };
            let chat = Arc::new(controller(backend));
            chat.restore(Some("s-old".into()), None).await;

            let sender = tokio::spawn({
                let chat = Arc::clone(&chat);
                async move { chat.send("hi").await }
            });
            let switcher = tokio::spawn({
                let chat = Arc::clone(&chat);
                async move { chat.switch_session("s-new").await }
            });
            sender.await.unwrap().unwrap();
            switcher.await.unwrap().unwrap();

            // Jobs never complete here, so a live poll must belong to the current turn
            let polling = matches!(chat.phase(), TurnPhase::Polling { .. });
            let guarded = chat.poll.lock().await.is_some();
            assert_eq!(polling, guarded);
        }
    }
}
