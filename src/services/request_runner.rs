//! Background request runner
//!
//! Runs API calls on short-lived threads and hands the results back to the
//! UI loop through a channel, which is drained on every tick.

use crate::error::{RefactorError, Result};
use crate::model::archive::ArchiveHandle;
use crate::model::refactor::{RefactorRequest, RefactorResult, ZipFileResult};
use crate::model::source::{ExtractedFile, SourceUnit};
use crate::model::workflow::{RunId, WorkflowEvent};
use crate::services::api::ApiClient;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use tracing::debug;

/// Result of one background call
#[derive(Debug)]
pub enum RequestMessage {
    Refactored {
        run: RunId,
        result: Result<RefactorResult>,
    },
    ZipExtracted {
        run: RunId,
        result: Result<Vec<ExtractedFile>>,
    },
    ZipRefactored {
        run: RunId,
        result: Result<Vec<ZipFileResult>>,
    },
    ArchiveFetched {
        run: RunId,
        result: Result<ArchiveHandle>,
    },
    Stats(Result<serde_json::Value>),
    Health(Result<serde_json::Value>),
}

impl RequestMessage {
    /// Whether the reply belongs to the refactor workflow
    pub fn is_workflow(&self) -> bool {
        !matches!(self, RequestMessage::Stats(_) | RequestMessage::Health(_))
    }

    /// Convert a workflow reply into the matching state machine event
    pub fn into_event(self) -> Option<WorkflowEvent> {
        let event = match self {
            RequestMessage::Refactored { run, result } => match result {
                Ok(result) => WorkflowEvent::SingleSucceeded { run, result },
                Err(error) => WorkflowEvent::SingleFailed { run, error },
            },
            RequestMessage::ZipExtracted { run, result } => match result {
                Ok(files) => WorkflowEvent::ZipExtracted { run, files },
                Err(error) => WorkflowEvent::UploadFailed { run, error },
            },
            RequestMessage::ZipRefactored { run, result } => match result {
                Ok(files) => WorkflowEvent::ZipSucceeded { run, files },
                Err(error) => WorkflowEvent::ZipFailed { run, error },
            },
            RequestMessage::ArchiveFetched { run, result } => match result {
                Ok(archive) => WorkflowEvent::ArchiveReady { run, archive },
                Err(error) => WorkflowEvent::ArchiveFailed { run, error },
            },
            RequestMessage::Stats(_) | RequestMessage::Health(_) => return None,
        };
        Some(event)
    }
}

/// Spawns API calls and collects their replies
pub struct RequestRunner {
    api: ApiClient,
    sender: Sender<RequestMessage>,
    receiver: Receiver<RequestMessage>,
    /// Workflow requests spawned on the current channel and not yet received
    pending: usize,
}

impl RequestRunner {
    pub fn new(api: ApiClient) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            api,
            sender,
            receiver,
            pending: 0,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn spawn<F>(&mut self, tracked: bool, job: F)
    where
        F: FnOnce(&ApiClient) -> RequestMessage + Send + 'static,
    {
        let api = self.api.clone();
        let tx = self.sender.clone();
        if tracked {
            self.pending += 1;
        }
        thread::spawn(move || {
            // The receiver is gone after cancel_all; the reply is simply dropped
            let _ = tx.send(job(&api));
        });
    }

    pub fn spawn_refactor(&mut self, run: RunId, request: RefactorRequest) {
        self.spawn(true, move |api| RequestMessage::Refactored {
            run,
            result: api.refactor(&request),
        });
    }

    pub fn spawn_upload_zip(&mut self, run: RunId, path: PathBuf) {
        self.spawn(true, move |api| RequestMessage::ZipExtracted {
            run,
            result: api.upload_zip(&path),
        });
    }

    pub fn spawn_refactor_zip(&mut self, run: RunId, files: Vec<SourceUnit>) {
        self.spawn(true, move |api| RequestMessage::ZipRefactored {
            run,
            result: api.refactor_zip_animated(&files),
        });
    }

    pub fn spawn_fetch_archive(&mut self, run: RunId, files: Vec<SourceUnit>) {
        self.spawn(true, move |api| RequestMessage::ArchiveFetched {
            run,
            result: api.refactor_zip_archive(&files).and_then(|bytes| {
                ArchiveHandle::from_bytes(&bytes).map_err(RefactorError::from)
            }),
        });
    }

    pub fn spawn_stats(&mut self) {
        self.spawn(false, |api| RequestMessage::Stats(api.stats()));
    }

    pub fn spawn_health(&mut self) {
        self.spawn(false, |api| RequestMessage::Health(api.health()));
    }

    /// Drain every reply that has arrived so far
    pub fn poll(&mut self) -> Vec<RequestMessage> {
        let mut messages = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(message) => {
                    if message.is_workflow() {
                        self.pending = self.pending.saturating_sub(1);
                    }
                    messages.push(message);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        messages
    }

    /// Abandon every outstanding request
    ///
    /// Threads already running finish on their own, but they send into the
    /// old channel, which nobody reads anymore.
    pub fn cancel_all(&mut self) {
        if self.pending > 0 {
            debug!(pending = self.pending, "cancelling in-flight requests");
        }
        let (sender, receiver) = mpsc::channel();
        self.sender = sender;
        self.receiver = receiver;
        self.pending = 0;
    }

    /// Number of workflow requests still waiting for a reply
    pub fn in_flight(&self) -> usize {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::source::Language;
    use std::time::{Duration, Instant};

    fn runner(server: &mockito::Server) -> RequestRunner {
        RequestRunner::new(ApiClient::new(server.url(), Duration::from_secs(5)).unwrap())
    }

    fn request() -> RefactorRequest {
        RefactorRequest {
            code: "var x = 1;".to_string(),
            language: Language::JavaScript,
            settings: None,
        }
    }

    fn wait_for_messages(runner: &mut RequestRunner) -> Vec<RequestMessage> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let messages = runner.poll();
            if !messages.is_empty() || Instant::now() > deadline {
                return messages;
            }
            thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn test_refactor_reply_is_tagged_with_run() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/refactor")
            .with_status(200)
            .with_body(r#"{"success": true, "data": {"refactoredCode": "const x = 1;"}}"#)
            .create();
        let mut runner = runner(&server);

        runner.spawn_refactor(7, request());
        assert_eq!(runner.in_flight(), 1);

        let mut messages = wait_for_messages(&mut runner);
        assert_eq!(messages.len(), 1);
        assert_eq!(runner.in_flight(), 0);

        match messages.remove(0).into_event() {
            Some(WorkflowEvent::SingleSucceeded { run, result }) => {
                assert_eq!(run, 7);
                assert_eq!(result.refactored_code, "const x = 1;");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_failure_maps_to_failed_event() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/refactor/refactor-zip-animated")
            .with_status(200)
            .with_body(r#"{"success": false}"#)
            .create();
        let mut runner = runner(&server);

        runner.spawn_refactor_zip(3, vec![SourceUnit::new("a.js", "var a;")]);

        let mut messages = wait_for_messages(&mut runner);
        assert!(matches!(
            messages.remove(0).into_event(),
            Some(WorkflowEvent::ZipFailed { run: 3, .. })
        ));
    }

    #[test]
    fn test_archive_reply_holds_temp_file() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/refactor/refactor-zip")
            .with_status(200)
            .with_body(b"PK\x03\x04")
            .create();
        let mut runner = runner(&server);

        runner.spawn_fetch_archive(1, vec![SourceUnit::new("a.js", "var a;")]);

        let mut messages = wait_for_messages(&mut runner);
        match messages.remove(0).into_event() {
            Some(WorkflowEvent::ArchiveReady { archive, .. }) => {
                assert_eq!(archive.size(), 4);
                assert!(archive.path().exists());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_cancel_all_drops_late_replies() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/refactor")
            .with_status(200)
            .with_body(r#"{"success": true, "data": {"refactoredCode": "late"}}"#)
            .create();
        let mut runner = runner(&server);

        runner.spawn_refactor(1, request());
        runner.cancel_all();
        assert_eq!(runner.in_flight(), 0);

        thread::sleep(Duration::from_millis(300));
        assert!(runner.poll().is_empty());
    }

    #[test]
    fn test_health_is_not_a_workflow_request() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status": "ok"}"#)
            .create();
        let mut runner = runner(&server);

        runner.spawn_health();
        assert_eq!(runner.in_flight(), 0);

        let mut messages = wait_for_messages(&mut runner);
        let message = messages.remove(0);
        assert!(!message.is_workflow());
        assert!(matches!(message, RequestMessage::Health(Ok(_))));
    }
}
