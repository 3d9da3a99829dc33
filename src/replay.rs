//! Event Replay
//!
//! Feeds newline-delimited JSON events through a [`ReputationEngine`]:
//!
//! ```text
//! {"type":"register","user_id":"alice"}
//! {"type":"return","user_id":"alice","on_time":true}
//! {"type":"dispute","user_id":"bob"}
//! {"type":"rating","user_id":"alice","rating":5}
//! {"type":"remove","user_id":"bob"}
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use crate::reputation::{ReputationEngine, ReputationEvent};
use crate::store::ReputationStore;

/// One line of a replay stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    Register { user_id: String },
    Return { user_id: String, on_time: bool },
    Dispute { user_id: String },
    Rating { user_id: String, rating: u8 },
    Remove { user_id: String },
}

impl ReplayEvent {
    pub fn user_id(&self) -> &str {
        match self {
            ReplayEvent::Register { user_id }
            | ReplayEvent::Return { user_id, .. }
            | ReplayEvent::Dispute { user_id }
            | ReplayEvent::Rating { user_id, .. }
            | ReplayEvent::Remove { user_id } => user_id,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    pub applied: u64,
    pub rejected: u64,
}

/// Apply a single replay event to the engine.
pub async fn apply_event<S: ReputationStore>(
    engine: &ReputationEngine<S>,
    event: &ReplayEvent,
) -> Result<()> {
    let user_id = event.user_id();
    match event {
        ReplayEvent::Register { .. } => {
            engine.register(user_id).await?;
        }
        ReplayEvent::Return { on_time, .. } => {
            engine
                .apply(user_id, ReputationEvent::ReturnRecorded { on_time: *on_time })
                .await?;
        }
        ReplayEvent::Dispute { .. } => {
            engine.apply(user_id, ReputationEvent::DisputeFiled).await?;
        }
        ReplayEvent::Rating { rating, .. } => {
            engine
                .apply(user_id, ReputationEvent::RatingSubmitted { rating: *rating })
                .await?;
        }
        ReplayEvent::Remove { .. } => {
            engine.remove(user_id).await?;
        }
    }
    Ok(())
}

/// Replay every event in `reader`.
///
/// With `fail_fast` the first malformed line or rejected event aborts the
/// replay; otherwise it is logged and counted.
pub async fn replay<S, R>(engine: &ReputationEngine<S>, reader: R, fail_fast: bool) -> Result<ReplayStats>
where
    S: ReputationStore,
    R: AsyncBufRead + Unpin,
{
    let mut stats = ReplayStats::default();
    let mut reader = reader;
    let mut buf = Vec::new();
    let mut line_no = 0u64;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .context("Failed to read event stream")?;
        if read == 0 {
            break;
        }
        line_no += 1;

        let outcome = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => match serde_json::from_str::<ReplayEvent>(line.trim()) {
                Ok(event) => {
                    debug!(line = line_no, event = ?event, "Replaying event");
                    apply_event(engine, &event).await
                }
                Err(e) => Err(anyhow::Error::new(e).context("Malformed event")),
            },
            Err(e) => Err(anyhow::Error::new(e).context("Malformed event")),
        };

        match outcome {
            Ok(()) => stats.applied += 1,
            Err(e) if fail_fast => {
                return Err(e.context(format!("Replay aborted at line {}", line_no)));
            }
            Err(e) => {
                warn!(line = line_no, error = %format!("{:#}", e), "Skipping rejected event");
                stats.rejected += 1;
            }
        }
    }

    info!(
        applied = stats.applied,
        rejected = stats.rejected,
        "Replay finished"
    );

    Ok(stats)
}
