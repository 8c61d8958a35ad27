use log::{info, warn};

use crate::model::{Badge, BadgeListEnvelope, CaptureResult, IdentityEnvelope};

use super::filter::{ResponseFilter, ResponseKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Capturing,
    Done,
}

/// Accumulates matched responses for one page-load lifecycle.
///
/// Events may arrive in any order and interleaved with unrelated traffic.
/// The identity is first-write-wins; the badge list is replaced wholesale on
/// every matching response. After `finish()` the session is frozen and
/// ignores further events.
#[derive(Debug)]
pub struct CaptureSession {
    filter: ResponseFilter,
    state: SessionState,
    result: CaptureResult,
}

impl CaptureSession {
    pub fn new(filter: ResponseFilter) -> Self {
        Self {
            filter,
            state: SessionState::Idle,
            result: CaptureResult::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Idle → Capturing, on navigation start.
    pub fn begin(&mut self) {
        if self.state == SessionState::Idle {
            self.state = SessionState::Capturing;
        }
    }

    /// Per-event classification, delegated to the filter. Returns `None`
    /// outside the Capturing state.
    pub fn classify(&self, url: &str, status: i64, mime_type: &str) -> Option<ResponseKind> {
        if self.state != SessionState::Capturing {
            return None;
        }
        self.filter.classify(url, status, mime_type)
    }

    /// Feed the body of a matched response. A malformed body is logged and
    /// that single response discarded; the capture keeps going.
    pub fn record(&mut self, kind: ResponseKind, body: &str) {
        if self.state != SessionState::Capturing {
            return;
        }

        match kind {
            ResponseKind::Identity => match serde_json::from_str::<IdentityEnvelope>(body) {
                Ok(envelope) => {
                    if self.result.user_id.is_none() {
                        info!("captured identity {}", envelope.data.id);
                        self.result.user_id = Some(envelope.data.id);
                    }
                }
                Err(err) => warn!("discarding unparseable identity response: {err}"),
            },
            ResponseKind::BadgeList => match serde_json::from_str::<BadgeListEnvelope>(body) {
                Ok(envelope) => {
                    self.result.badges = envelope.data.into_iter().map(Badge::from).collect();
                    info!("captured {} badges", self.result.badges.len());
                }
                Err(err) => warn!("discarding unparseable badge list response: {err}"),
            },
        }
    }

    /// Capturing → Done. Freezes the accumulator and hands it off by value.
    pub fn finish(&mut self) -> CaptureResult {
        self.state = SessionState::Done;
        std::mem::take(&mut self.result)
    }
}
