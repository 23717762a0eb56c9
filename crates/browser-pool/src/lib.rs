//! Browser Pool (C10): bounded-capacity, FIFO-waited reusable Chromium
//! instances (§4.8). The pool is the only state shared across concurrent
//! runs; acquire/release mutate it under a single critical section.

mod error;

pub use error::PoolError;

use std::collections::VecDeque;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use auspex_cdp_adapter::{ChromeDriver, LaunchConfig};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::warn;

struct PoolState {
    idle: Vec<ChromeDriver>,
    live: usize,
    waiters: VecDeque<oneshot::Sender<ChromeDriver>>,
    closed: bool,
}

/// A bounded pool of reusable `ChromeDriver` instances. Cheap to clone
/// (wraps its state in `Arc`); acquire a browser with [`BrowserPool::acquire`].
pub struct BrowserPool {
    state: Mutex<PoolState>,
    capacity: usize,
    launch_config: LaunchConfig,
}

enum AcquireAction {
    Ready(ChromeDriver),
    Launch,
    Wait(oneshot::Receiver<ChromeDriver>),
}

enum ReleaseAction {
    Drop,
    GiveTo(oneshot::Sender<ChromeDriver>),
    ToIdle,
}

impl BrowserPool {
    pub fn new(capacity: usize, launch_config: LaunchConfig) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(PoolState {
                idle: Vec::new(),
                live: 0,
                waiters: VecDeque::new(),
                closed: false,
            }),
            capacity,
            launch_config,
        })
    }

    /// Checks out a browser, launching one if under capacity or waiting in
    /// FIFO order (up to `wait_cap`) otherwise (§4.8).
    pub async fn acquire(self: &Arc<Self>, wait_cap: Duration) -> Result<PooledBrowser, PoolError> {
        let action = {
            let mut state = self.state.lock();
            if state.closed {
                return Err(PoolError::Closed);
            }

            let mut ready = None;
            while let Some(browser) = state.idle.pop() {
                if browser.is_disconnected() {
                    state.live = state.live.saturating_sub(1);
                    continue;
                }
                ready = Some(browser);
                break;
            }

            if let Some(browser) = ready {
                AcquireAction::Ready(browser)
            } else if state.live < self.capacity {
                state.live += 1;
                AcquireAction::Launch
            } else {
                let (tx, rx) = oneshot::channel();
                state.waiters.push_back(tx);
                AcquireAction::Wait(rx)
            }
        };

        match action {
            AcquireAction::Ready(browser) => Ok(self.wrap(browser)),
            AcquireAction::Launch => match ChromeDriver::launch(self.launch_config.clone()).await {
                Ok(driver) => Ok(self.wrap(driver)),
                Err(e) => {
                    let mut state = self.state.lock();
                    state.live = state.live.saturating_sub(1);
                    drop(state);
                    Err(PoolError::Launch(e.to_string()))
                }
            },
            AcquireAction::Wait(rx) => match tokio::time::timeout(wait_cap, rx).await {
                Ok(Ok(browser)) => Ok(self.wrap(browser)),
                Ok(Err(_)) => Err(PoolError::Closed),
                Err(_) => Err(PoolError::AcquireTimeout),
            },
        }
    }

    fn wrap(self: &Arc<Self>, browser: ChromeDriver) -> PooledBrowser {
        PooledBrowser { browser: Some(browser), pool: self.clone() }
    }

    /// Returns a checked-out browser to the pool: handed directly to a
    /// waiter if one is pending, pushed to idle otherwise, or closed if the
    /// pool has been closed or the browser has disconnected (§4.8).
    async fn release(&self, browser: ChromeDriver) {
        let disconnected = browser.is_disconnected();
        let action = {
            let mut state = self.state.lock();
            if disconnected || state.closed {
                state.live = state.live.saturating_sub(1);
                ReleaseAction::Drop
            } else if let Some(waiter) = state.waiters.pop_front() {
                ReleaseAction::GiveTo(waiter)
            } else {
                ReleaseAction::ToIdle
            }
        };

        match action {
            ReleaseAction::Drop => {
                if let Err(e) = browser.close().await {
                    warn!(error = %e, "error closing released browser");
                }
            }
            ReleaseAction::GiveTo(tx) => {
                if let Err(returned) = tx.send(browser) {
                    // the waiter already timed out and dropped its receiver;
                    // don't lose the browser's capacity slot.
                    self.state.lock().idle.push(returned);
                }
            }
            ReleaseAction::ToIdle => {
                self.state.lock().idle.push(browser);
            }
        }
    }

    /// Idempotent: marks the pool closed, rejects every pending waiter, and
    /// closes all idle browsers concurrently, ignoring individual errors
    /// (§4.8). Browsers currently checked out are closed when released.
    pub async fn close(&self) {
        let (idle, waiters) = {
            let mut state = self.state.lock();
            state.closed = true;
            (std::mem::take(&mut state.idle), std::mem::take(&mut state.waiters))
        };
        drop(waiters);

        let closes = idle.into_iter().map(|browser| async move {
            if let Err(e) = browser.close().await {
                warn!(error = %e, "error closing idle browser during pool shutdown");
            }
        });
        futures::future::join_all(closes).await;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// A checked-out browser. Returned to the pool automatically when dropped.
pub struct PooledBrowser {
    browser: Option<ChromeDriver>,
    pool: Arc<BrowserPool>,
}

impl Deref for PooledBrowser {
    type Target = ChromeDriver;

    fn deref(&self) -> &ChromeDriver {
        self.browser.as_ref().expect("browser present until drop")
    }
}

impl Drop for PooledBrowser {
    fn drop(&mut self) {
        if let Some(browser) = self.browser.take() {
            let pool = self.pool.clone();
            tokio::spawn(async move {
                pool.release(browser).await;
            });
        }
    }
}
