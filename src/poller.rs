//! Keeps the store close to the server by re-fetching on a fixed interval.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::model::PageQuery;
use crate::operations::Tracker;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Handle to a running poll loop. Dropping it stops the timer.
#[derive(Debug)]
pub struct PollHandle {
    query_tx: watch::Sender<PageQuery>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Fetch the new page right away and restart the interval.
    pub fn set_query(&self, query: PageQuery) {
        self.query_tx.send_if_modified(|current| {
            if *current == query {
                return false;
            }
            *current = query;
            true
        });
    }

    pub fn query(&self) -> PageQuery {
        *self.query_tx.borrow()
    }

    /// Cancel the timer. Requests already sent are left to finish.
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub struct Poller;

impl Poller {
    pub fn spawn(tracker: Arc<Tracker>, query: PageQuery, interval: Duration) -> PollHandle {
        let (query_tx, query_rx) = watch::channel(query);
        let task = tokio::spawn(run(tracker, query_rx, interval));
        PollHandle { query_tx, task }
    }
}

async fn run(tracker: Arc<Tracker>, mut query_rx: watch::Receiver<PageQuery>, interval: Duration) {
    info!(?interval, "starting poller");
    let mut query = *query_rx.borrow_and_update();
    spawn_fetch(&tracker, query);

    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                debug!(?query, "poll tick");
                spawn_refresh(&tracker, query);
            }
            changed = query_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                query = *query_rx.borrow_and_update();
                info!(?query, "page changed; fetching");
                spawn_fetch(&tracker, query);
                ticker.reset();
            }
        }
    }
    debug!("poller stopped");
}

// Each request runs on its own task so a slow response never delays the
// timer; overlapping requests resolve in completion order.
fn spawn_fetch(tracker: &Arc<Tracker>, query: PageQuery) {
    let tracker = Arc::clone(tracker);
    tokio::spawn(async move {
        let _ = tracker.fetch_all(query).await;
    });
}

fn spawn_refresh(tracker: &Arc<Tracker>, query: PageQuery) {
    let tracker = Arc::clone(tracker);
    tokio::spawn(async move {
        let _ = tracker.refresh(query).await;
    });
}
