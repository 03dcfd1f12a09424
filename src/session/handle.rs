//! Shared handle to one running match
//!
//! Every request for a match goes through its `MatchHandle`, which serializes
//! access to the engine with a tokio mutex. The handle also owns the
//! adrenaline timer: a task that sleeps for the grant window and then hands
//! the borrowed items back, unless the borrowed action came first.

use crate::game::{Action, DuelEngine, DuelSnapshot, TurnResult};
use crate::core::ChatId;
use crate::Result;
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

struct MatchInner {
    engine: DuelEngine,
    timer: Option<JoinHandle<()>>,
}

impl MatchInner {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

/// Cloneable, thread-safe access to a match
#[derive(Clone)]
pub struct MatchHandle {
    inner: Arc<Mutex<MatchInner>>,
}

impl MatchHandle {
    pub fn new(engine: DuelEngine) -> Self {
        MatchHandle {
            inner: Arc::new(Mutex::new(MatchInner {
                engine,
                timer: None,
            })),
        }
    }

    /// Start (or restart) the duel
    pub async fn start(&self) -> Result<TurnResult> {
        let mut inner = self.inner.lock().await;
        inner.cancel_timer();
        inner.engine.start()
    }

    pub async fn make_turn(&self, action: Action, claimed_player: ChatId) -> Result<TurnResult> {
        let mut inner = self.inner.lock().await;
        let result = inner.engine.make_turn(action, claimed_player)?;

        if inner.engine.active_grant().is_none() {
            inner.cancel_timer();
        }
        if let Some(grant) = result.adrenaline {
            inner.cancel_timer();
            let weak = Arc::downgrade(&self.inner);
            inner.timer = Some(tokio::spawn(expire_after(weak, grant.id, grant.window())));
        }
        Ok(result)
    }

    pub async fn make_turn_token(&self, token: &str, claimed_player: ChatId) -> Result<TurnResult> {
        let action = Action::parse_token(token)?;
        self.make_turn(action, claimed_player).await
    }

    pub async fn snapshot(&self) -> DuelSnapshot {
        self.inner.lock().await.engine.snapshot()
    }

    /// Run `f` with exclusive access to the engine
    pub async fn with_engine<T>(&self, f: impl FnOnce(&mut DuelEngine) -> T) -> T {
        let mut inner = self.inner.lock().await;
        f(&mut inner.engine)
    }

    /// Stop any pending adrenaline timer (the match is being dropped)
    pub async fn shutdown(&self) {
        self.inner.lock().await.cancel_timer();
    }
}

async fn expire_after(inner: Weak<Mutex<MatchInner>>, grant_id: u64, window: std::time::Duration) {
    tokio::time::sleep(window).await;
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let mut inner = inner.lock().await;
    if inner.engine.expire_adrenaline(grant_id) {
        // this task is the stored timer; dropping its own handle just detaches it
        inner.timer = None;
    }
}

impl std::fmt::Debug for MatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchHandle")
            .field("references", &Arc::strong_count(&self.inner))
            .finish()
    }
}
