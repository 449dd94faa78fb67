use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use console_core::PollId;
use console_logging::{console_debug, console_info, console_warn};
use tokio::runtime::Handle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{ConsoleClient, EngineEvent};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Receiver side of engine events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Fixed-interval status polls, one cancellation token per poll id.
pub struct PollerPool {
    interval: Duration,
    polls: HashMap<PollId, CancellationToken>,
}

impl PollerPool {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            polls: HashMap::new(),
        }
    }

    /// Spawns the timer for `poll_id`. Returns `false` if it already runs.
    pub fn start(
        &mut self,
        runtime: &Handle,
        poll_id: PollId,
        name: String,
        path: String,
        client: Arc<dyn ConsoleClient>,
        sink: Arc<dyn EventSink>,
    ) -> bool {
        if self.polls.contains_key(&poll_id) {
            return false;
        }
        let token = CancellationToken::new();
        self.polls.insert(poll_id, token.clone());
        console_info!("polling {} every {:?} (poll #{})", name, self.interval, poll_id);
        runtime.spawn(run_poll(
            token,
            self.interval,
            PollTarget {
                poll_id,
                name,
                path,
            },
            client,
            sink,
        ));
        true
    }

    /// Stops the timer of `poll_id`. Later calls are no-ops.
    pub fn cancel(&mut self, poll_id: PollId) -> bool {
        match self.polls.remove(&poll_id) {
            Some(token) => {
                token.cancel();
                console_info!("poll #{} cancelled", poll_id);
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, token) in self.polls.drain() {
            token.cancel();
        }
    }

    pub fn is_running(&self, poll_id: PollId) -> bool {
        self.polls.contains_key(&poll_id)
    }

    pub fn len(&self) -> usize {
        self.polls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polls.is_empty()
    }
}

impl Drop for PollerPool {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[derive(Clone)]
struct PollTarget {
    poll_id: PollId,
    name: String,
    path: String,
}

/// Ticks are not serialized: each tick spawns its own request, so a slow
/// response may land after a newer one.
async fn run_poll(
    token: CancellationToken,
    interval: Duration,
    target: PollTarget,
    client: Arc<dyn ConsoleClient>,
    sink: Arc<dyn EventSink>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                let token = token.clone();
                let target = target.clone();
                let client = client.clone();
                let sink = sink.clone();
                tokio::spawn(async move {
                    console_debug!("poll #{} tick for {}", target.poll_id, target.name);
                    let result = client.fetch_status(&target.path).await;
                    if let Err(err) = &result {
                        console_warn!("status fetch for {} failed: {}", target.name, err);
                    }
                    // Responses landing after cancellation are dropped.
                    if token.is_cancelled() {
                        return;
                    }
                    sink.emit(EngineEvent::StatusFetched {
                        poll_id: target.poll_id,
                        name: target.name,
                        result,
                    });
                });
            }
        }
    }
}
