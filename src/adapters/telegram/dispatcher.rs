//! Long-polling dispatch loop.
//!
//! Updates are fanned out to per-user lanes. A lane is a queue drained by a
//! single task, so turns of one user run strictly in arrival order while
//! different users run concurrently. A lane that replaces a closed one waits
//! for the old task to finish draining first. The number of turns in flight
//! across all lanes is bounded by a semaphore.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;

use crate::application::ConversationEngine;
use crate::domain::conversation::InboundEvent;
use crate::domain::foundation::UserId;

use super::client::TelegramClient;
use super::updates::normalize_update;

/// A lane with nothing to do for this long shuts down.
const LANE_IDLE_TIMEOUT: Duration = Duration::from_secs(60);
/// Pause after a failed poll.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(3);

struct Lane {
    events: mpsc::UnboundedSender<InboundEvent>,
    task: JoinHandle<()>,
}

impl Lane {
    /// Closed and fully drained.
    fn is_done(&self) -> bool {
        self.events.is_closed() && self.task.is_finished()
    }
}

/// Feeds Telegram updates into the conversation engine.
pub struct PollingDispatcher {
    client: Arc<TelegramClient>,
    engine: ConversationEngine,
    workers: Arc<Semaphore>,
    lanes: HashMap<UserId, Lane>,
}

impl PollingDispatcher {
    /// `workers` bounds the turns processed at the same time.
    pub fn new(client: Arc<TelegramClient>, engine: ConversationEngine, workers: usize) -> Self {
        Self {
            client,
            engine,
            workers: Arc::new(Semaphore::new(workers.max(1))),
            lanes: HashMap::new(),
        }
    }

    /// Polls until ctrl-c.
    pub async fn run(mut self) {
        let mut offset = 0;
        tracing::info!("Polling for updates");

        loop {
            let updates = tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received, stopping polling");
                    break;
                }
                result = self.client.get_updates(offset) => result,
            };

            match updates {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        match normalize_update(&update) {
                            Some((user, event)) => self.route(user, event),
                            None => tracing::debug!(update_id = update.update_id, "Skipping update"),
                        }
                    }
                    self.lanes.retain(|_, lane| !lane.is_done());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Polling failed, retrying");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                }
            }
        }
    }

    fn route(&mut self, user: UserId, event: InboundEvent) {
        let (event, previous) = match self.lanes.remove(&user) {
            Some(lane) => match lane.events.send(event) {
                Ok(()) => {
                    self.lanes.insert(user, lane);
                    return;
                }
                Err(mpsc::error::SendError(event)) => (event, Some(lane.task)),
            },
            None => (event, None),
        };

        let lane = spawn_lane(user, self.engine.clone(), Arc::clone(&self.workers), previous);
        if lane.events.send(event).is_err() {
            tracing::error!(%user, "Fresh lane rejected event");
        }
        self.lanes.insert(user, lane);
    }
}

/// `previous` is the task of the closed lane this one replaces; no turn runs
/// before it has finished.
fn spawn_lane(
    user: UserId,
    engine: ConversationEngine,
    workers: Arc<Semaphore>,
    previous: Option<JoinHandle<()>>,
) -> Lane {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(async move {
        if let Some(previous) = previous {
            if let Err(e) = previous.await {
                tracing::warn!(%user, error = %e, "Previous lane ended abnormally");
            }
        }
        loop {
            match tokio::time::timeout(LANE_IDLE_TIMEOUT, rx.recv()).await {
                Ok(Some(event)) => run_turn(&engine, &workers, user, event).await,
                Ok(None) => break,
                Err(_) => {
                    // Refuse new events, then finish whatever slipped in.
                    rx.close();
                    while let Ok(event) = rx.try_recv() {
                        run_turn(&engine, &workers, user, event).await;
                    }
                    break;
                }
            }
        }
        tracing::debug!(%user, "Lane closed");
    });
    Lane { events: tx, task }
}

async fn run_turn(engine: &ConversationEngine, workers: &Semaphore, user: UserId, event: InboundEvent) {
    let Ok(_permit) = workers.acquire().await else {
        return;
    };
    if let Err(e) = engine.handle_event(user, event).await {
        if e.is_fatal() {
            tracing::error!(%user, error = %e, "Turn failed");
        } else {
            tracing::warn!(%user, error = %e, "Turn aborted");
        }
    }
}
