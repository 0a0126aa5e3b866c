//! Marshals work from request threads onto the single host context.
//!
//! The host document may only be touched from one thread. This module owns
//! that thread and the queue feeding it:
//!
//! - `HostBridge`: a clonable handle that any thread can use to submit a
//!   closure. Each submission carries its own one-shot result slot, so the
//!   caller gets back exactly the value (or failure) of its own closure.
//! - `spawn`: starts the host thread, builds the host value on it and attaches
//!   the queue to a bridge. Until that happens the bridge refuses work.
//! - `HostThread`: join handle for the host thread once the bridge is shut down.
//!
//! Jobs run strictly one after another in submission order. A job that panics
//! is reported to its own submitter as `BridgeError::ActionFailed` and the
//! loop moves on to the next job.

use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc as std_mpsc, Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

pub type BridgeResult<T> = Result<T, BridgeError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The bridge was used before a host context was attached.
    #[error("host context is not initialized")]
    HostUnavailable,

    /// The bridge has been shut down and accepts no new work.
    #[error("host context is shutting down")]
    Closed,

    /// The host thread went away before the job produced a result.
    #[error("host context stopped before the action completed")]
    Disconnected,

    /// The job itself failed while running on the host context.
    #[error("host action failed: {0}")]
    ActionFailed(String),

    #[error("host context is already attached")]
    AlreadyAttached,

    #[error("host context failed to start: {0}")]
    Startup(String),
}

type Job<H> = Box<dyn FnOnce(&mut H) + Send + 'static>;

enum Link<H> {
    Uninitialized,
    Ready(mpsc::Sender<Job<H>>),
    Closed,
}

/// Counters describing the traffic through a bridge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BridgeCounters {
    pub submitted: u64,
    pub completed: u64,
    pub failed: u64,
}

#[derive(Debug, Default)]
struct BridgeStats {
    submitted: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

/// Handle used to run closures on the host context.
///
/// Cloning is cheap; all clones share the same queue and state.
pub struct HostBridge<H> {
    link: Arc<RwLock<Link<H>>>,
    stats: Arc<BridgeStats>,
}

impl<H> Clone for HostBridge<H> {
    fn clone(&self) -> Self {
        Self {
            link: Arc::clone(&self.link),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<H> Default for HostBridge<H> {
    fn default() -> Self {
        Self {
            link: Arc::new(RwLock::new(Link::Uninitialized)),
            stats: Arc::new(BridgeStats::default()),
        }
    }
}

impl<H: 'static> fmt::Debug for HostBridge<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostBridge")
            .field("ready", &self.is_ready())
            .field("counters", &self.counters())
            .finish()
    }
}

impl<H: 'static> HostBridge<H> {
    /// Creates a bridge with no host context attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a host context is attached and accepting work.
    pub fn is_ready(&self) -> bool {
        matches!(
            &*self.link.read().unwrap_or_else(PoisonError::into_inner),
            Link::Ready(_)
        )
    }

    pub fn counters(&self) -> BridgeCounters {
        BridgeCounters {
            submitted: self.stats.submitted.load(Ordering::Relaxed),
            completed: self.stats.completed.load(Ordering::Relaxed),
            failed: self.stats.failed.load(Ordering::Relaxed),
        }
    }

    /// Stops accepting new work.
    ///
    /// Jobs already queued still run; the host thread exits once the queue
    /// is drained and every outstanding sender is gone.
    pub fn shutdown(&self) {
        let mut link = self.link.write().unwrap_or_else(PoisonError::into_inner);
        if matches!(&*link, Link::Ready(_)) {
            log::info!("Host bridge shutting down");
        }
        *link = Link::Closed;
    }

    /// Runs `action` on the host context and blocks the calling thread until
    /// it has completed.
    ///
    /// Must not be called from inside an async runtime; use `invoke_async`
    /// there.
    pub fn invoke<R, F>(&self, action: F) -> BridgeResult<R>
    where
        F: FnOnce(&mut H) -> R + Send + 'static,
        R: Send + 'static,
    {
        let sender = self.sender()?;
        let (job, slot) = self.package(action);
        self.stats.submitted.fetch_add(1, Ordering::Relaxed);
        if sender.blocking_send(job).is_err() {
            self.stats.submitted.fetch_sub(1, Ordering::Relaxed);
            return Err(BridgeError::Disconnected);
        }
        slot.blocking_recv()
            .map_err(|_| BridgeError::Disconnected)?
    }

    /// Async variant of `invoke`: suspends the calling task instead of
    /// blocking its thread.
    pub async fn invoke_async<R, F>(&self, action: F) -> BridgeResult<R>
    where
        F: FnOnce(&mut H) -> R + Send + 'static,
        R: Send + 'static,
    {
        let sender = self.sender()?;
        let (job, slot) = self.package(action);
        // Counted before the send so a snapshot never shows more completed
        // than submitted.
        self.stats.submitted.fetch_add(1, Ordering::Relaxed);
        if sender.send(job).await.is_err() {
            self.stats.submitted.fetch_sub(1, Ordering::Relaxed);
            return Err(BridgeError::Disconnected);
        }
        slot.await.map_err(|_| BridgeError::Disconnected)?
    }

    fn attach(&self, sender: mpsc::Sender<Job<H>>) -> BridgeResult<()> {
        let mut link = self.link.write().unwrap_or_else(PoisonError::into_inner);
        match &*link {
            Link::Uninitialized => {
                *link = Link::Ready(sender);
                log::info!("Host context attached to bridge");
                Ok(())
            }
            Link::Ready(_) => Err(BridgeError::AlreadyAttached),
            Link::Closed => Err(BridgeError::Closed),
        }
    }

    fn sender(&self) -> BridgeResult<mpsc::Sender<Job<H>>> {
        match &*self.link.read().unwrap_or_else(PoisonError::into_inner) {
            Link::Ready(sender) => Ok(sender.clone()),
            Link::Uninitialized => {
                log::error!("Host bridge used before the host context was initialized");
                Err(BridgeError::HostUnavailable)
            }
            Link::Closed => Err(BridgeError::Closed),
        }
    }

    /// Wraps `action` into a job that fills a one-shot slot with its outcome.
    fn package<R, F>(&self, action: F) -> (Job<H>, oneshot::Receiver<BridgeResult<R>>)
    where
        F: FnOnce(&mut H) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (slot_tx, slot_rx) = oneshot::channel();
        let stats = Arc::clone(&self.stats);
        let job: Job<H> = Box::new(move |host: &mut H| {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| action(host)));
            let outcome = match outcome {
                Ok(value) => {
                    stats.completed.fetch_add(1, Ordering::Relaxed);
                    Ok(value)
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    log::error!("Host action failed: {}", message);
                    stats.failed.fetch_add(1, Ordering::Relaxed);
                    Err(BridgeError::ActionFailed(message))
                }
            };
            // The submitter may have given up waiting; nothing to deliver then.
            let _ = slot_tx.send(outcome);
        });
        (job, slot_rx)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown failure".to_string()
    }
}

/// The running host thread.
#[derive(Debug)]
pub struct HostThread {
    handle: JoinHandle<()>,
}

impl HostThread {
    /// Waits for the host thread to finish. Only returns after the bridge
    /// has been shut down and the queue drained.
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }
}

/// Starts the host context and attaches it to `bridge`.
///
/// `factory` runs on the new thread, so the host value never has to cross
/// threads. `capacity` bounds the pending queue; submitters wait for room
/// instead of dropping work when it is full.
pub fn spawn<H, F, E>(bridge: &HostBridge<H>, capacity: usize, factory: F) -> BridgeResult<HostThread>
where
    H: 'static,
    F: FnOnce() -> Result<H, E> + Send + 'static,
    E: fmt::Display,
{
    let (tx, mut rx) = mpsc::channel::<Job<H>>(capacity.max(1));
    let (ready_tx, ready_rx) = std_mpsc::channel::<Result<(), String>>();

    let handle = thread::Builder::new()
        .name("host-context".to_string())
        .spawn(move || {
            let mut host = match factory() {
                Ok(host) => {
                    let _ = ready_tx.send(Ok(()));
                    host
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                    return;
                }
            };
            log::info!("Host context running");
            while let Some(job) = rx.blocking_recv() {
                job(&mut host);
            }
            log::info!("Host context stopped");
        })
        .map_err(|e| BridgeError::Startup(e.to_string()))?;

    match ready_rx.recv() {
        Ok(Ok(())) => {
            bridge.attach(tx)?;
            Ok(HostThread { handle })
        }
        Ok(Err(message)) => {
            log::error!("Host context failed to start: {}", message);
            Err(BridgeError::Startup(message))
        }
        Err(_) => Err(BridgeError::Startup(
            "host context exited during startup".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;

    fn start<H: 'static>(host: H) -> (HostBridge<H>, HostThread)
    where
        H: Send,
    {
        let bridge = HostBridge::new();
        let thread = spawn(&bridge, 4, move || Ok::<_, String>(host)).unwrap();
        (bridge, thread)
    }

    #[test]
    fn invoke_before_attach_fails_fast() {
        let bridge: HostBridge<Vec<u32>> = HostBridge::new();
        assert!(!bridge.is_ready());
        assert_eq!(
            bridge.invoke(|host| host.push(1)),
            Err(BridgeError::HostUnavailable)
        );
        assert_eq!(bridge.counters().submitted, 0);
    }

    #[test]
    fn returns_value_and_unit_results() {
        let (bridge, thread) = start(Vec::<u32>::new());
        assert!(bridge.is_ready());

        assert_eq!(bridge.invoke(|host| host.push(7)), Ok(()));
        assert_eq!(bridge.invoke(|host| host.len()), Ok(1));

        bridge.shutdown();
        thread.join().unwrap();
    }

    #[test]
    fn serializes_concurrent_submitters_in_order() {
        let (bridge, thread) = start(Vec::<(usize, usize)>::new());
        let busy = Arc::new(AtomicBool::new(false));

        let workers: Vec<_> = (0..8)
            .map(|submitter| {
                let bridge = bridge.clone();
                let busy = Arc::clone(&busy);
                thread::spawn(move || {
                    for seq in 0..25 {
                        let busy = Arc::clone(&busy);
                        bridge
                            .invoke(move |log| {
                                assert!(!busy.swap(true, Ordering::SeqCst), "overlapping actions");
                                log.push((submitter, seq));
                                thread::sleep(Duration::from_micros(50));
                                busy.store(false, Ordering::SeqCst);
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let log = bridge.invoke(|log| log.clone()).unwrap();
        assert_eq!(log.len(), 8 * 25);
        let mut last_seen: HashMap<usize, usize> = HashMap::new();
        for (submitter, seq) in log {
            if let Some(previous) = last_seen.insert(submitter, seq) {
                assert!(previous < seq, "submitter {submitter} ran out of order");
            }
        }
        assert_eq!(bridge.counters().failed, 0);

        bridge.shutdown();
        thread.join().unwrap();
    }

    #[test]
    fn failing_action_does_not_stop_later_ones() {
        let (bridge, thread) = start(Vec::<u32>::new());

        let failed = bridge.invoke(|_: &mut Vec<u32>| -> u32 { panic!("boom") });
        match failed {
            Err(BridgeError::ActionFailed(message)) => assert!(message.contains("boom")),
            other => panic!("unexpected outcome: {other:?}"),
        }

        assert_eq!(
            bridge.invoke(|host| {
                host.push(1);
                host.len()
            }),
            Ok(1)
        );
        let counters = bridge.counters();
        assert_eq!(counters.failed, 1);
        assert_eq!(counters.completed, 1);
        assert_eq!(counters.submitted, 2);

        bridge.shutdown();
        thread.join().unwrap();
    }

    #[test]
    fn running_action_is_already_counted_as_submitted() {
        let (bridge, thread) = start(0u32);
        let observer = bridge.clone();

        let seen = bridge.invoke(move |_| observer.counters()).unwrap();
        assert_eq!(seen.submitted, 1);
        assert_eq!(seen.completed, 0);

        let observer = bridge.clone();
        let seen = bridge.invoke(move |_| observer.counters()).unwrap();
        assert_eq!(seen.submitted, 2);
        assert_eq!(seen.completed, 1);

        bridge.shutdown();
        thread.join().unwrap();
    }

    #[test]
    fn shutdown_rejects_new_work_and_stops_thread() {
        let (bridge, thread) = start(0u32);
        bridge.shutdown();

        assert!(!bridge.is_ready());
        assert_eq!(bridge.invoke(|n| *n += 1), Err(BridgeError::Closed));
        thread.join().unwrap();
    }

    #[test]
    fn second_attach_is_rejected() {
        let (bridge, thread) = start(0u32);
        let again = spawn(&bridge, 1, || Ok::<_, String>(0u32));
        assert!(matches!(again, Err(BridgeError::AlreadyAttached)));

        bridge.shutdown();
        thread.join().unwrap();
    }

    #[test]
    fn startup_failure_leaves_bridge_unavailable() {
        let bridge: HostBridge<u32> = HostBridge::new();
        let result = spawn(&bridge, 1, || Err::<u32, _>("document locked"));

        assert_eq!(
            result.map(|_| ()),
            Err(BridgeError::Startup("document locked".to_string()))
        );
        assert!(!bridge.is_ready());
    }

    #[actix_web::test]
    async fn invoke_async_resolves_on_host_thread() {
        let (bridge, thread) = start(String::new());

        let name = bridge
            .invoke_async(|host| {
                host.push_str("done");
                thread::current().name().map(str::to_string)
            })
            .await
            .unwrap();

        assert_eq!(name.as_deref(), Some("host-context"));
        assert_eq!(bridge.invoke_async(|host| host.clone()).await.unwrap(), "done");

        bridge.shutdown();
        thread.join().unwrap();
    }
}
