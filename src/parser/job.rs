//! Background parse jobs.
//!
//! Parsing a container or trace document is the only long-running
//! operation; it runs off the interactive thread and communicates exactly
//! one completion message (batch or error) per job. Cancellation is
//! cooperative, checked at per-record granularity.

use crate::parser::event_log::{parse_event_log, EventLogBatch};
use crate::parser::request_trace::{parse_request_trace, TraceViews};
use crate::utils::error::ParseError;
use log::debug;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

/// Shareable cancellation flag for an in-flight parse.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A spawned parse job delivering a single completion message.
pub struct ParseJob<T> {
    token: CancelToken,
    receiver: Receiver<Result<T, ParseError>>,
}

impl<T: Send + 'static> ParseJob<T> {
    fn spawn<F>(work: F) -> Self
    where
        F: FnOnce(&CancelToken) -> Result<T, ParseError> + Send + 'static,
    {
        let token = CancelToken::new();
        let (sender, receiver) = std::sync::mpsc::channel();
        let worker_token = token.clone();
        thread::spawn(move || {
            let outcome = work(&worker_token);
            // The receiver may already be gone; nothing left to report to.
            let _ = sender.send(outcome);
        });
        Self { token, receiver }
    }

    /// Request cooperative cancellation of the running parse.
    pub fn cancel(&self) {
        debug!("Cancellation requested for parse job");
        self.token.cancel();
    }

    /// Block until the job's single completion message arrives.
    pub fn wait(self) -> Result<T, ParseError> {
        self.receiver
            .recv()
            .unwrap_or(Err(ParseError::JobTerminated))
    }

    /// Non-blocking poll; `None` while the job is still running.
    pub fn poll(&self) -> Option<Result<T, ParseError>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(ParseError::JobTerminated)),
        }
    }
}

/// Spawn an event-log container parse off the interactive thread.
pub fn spawn_event_log_job(path: PathBuf, source_id: String) -> ParseJob<EventLogBatch> {
    ParseJob::spawn(move |token| parse_event_log(&path, &source_id, token))
}

/// Spawn a request-trace document parse off the interactive thread.
pub fn spawn_request_trace_job(path: PathBuf) -> ParseJob<TraceViews> {
    ParseJob::spawn(move |_token| parse_request_trace(&path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_shared_state() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_job_delivers_single_message() {
        let job: ParseJob<u32> = ParseJob::spawn(|_| Ok(42));
        assert_eq!(job.wait().unwrap(), 42);
    }

    #[test]
    fn test_cancelled_job_reports_cancellation() {
        let job: ParseJob<u32> = ParseJob::spawn(|token| {
            while !token.is_cancelled() {
                thread::yield_now();
            }
            Err(ParseError::Cancelled)
        });
        job.cancel();
        assert!(matches!(job.wait(), Err(ParseError::Cancelled)));
    }
}
