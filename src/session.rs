//! The dataset currently on display.
//!
//! A [`Session`] is built once per successful fetch and never modified. The
//! store swaps the whole value, so a reader holding an `Arc<Session>` keeps a
//! consistent view even while a newer fetch is being installed.
//!
//! Fetches can overlap. Each one takes a ticket before it starts, and the
//! store refuses to install a session whose ticket is older than the one on
//! display, so the most recently started fetch wins.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::models::NormalizedReading;
use crate::timeline::{ProcessedBatch, Rejected};

// ---

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    // ---
    /// Channel credential the readings were fetched with.
    #[serde(skip)]
    pub api_key: String,
    pub date_filter: Option<NaiveDate>,
    pub readings: Vec<NormalizedReading>,
    pub rejected: Vec<Rejected>,
    pub fetched_at: DateTime<Utc>,
}

impl Session {
    // ---
    pub fn new(
        api_key: String,
        date_filter: Option<NaiveDate>,
        batch: ProcessedBatch,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Session {
            api_key,
            date_filter,
            readings: batch.readings,
            rejected: batch.rejected,
            fetched_at,
        }
    }
}

/// Shared handle to the current session. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Slot>>,
    tickets: Arc<AtomicU64>,
}

#[derive(Debug, Default)]
struct Slot {
    ticket: u64,
    session: Option<Arc<Session>>,
}

impl SessionStore {
    // ---
    pub fn new() -> Self {
        Self::default()
    }

    /// The session on display, if any fetch has succeeded yet.
    pub async fn current(&self) -> Option<Arc<Session>> {
        self.inner.read().await.session.clone()
    }

    /// Reserve the install slot for a fetch that is about to start.
    /// Tickets increase strictly, starting at 1.
    pub fn next_ticket(&self) -> u64 {
        self.tickets.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Install `session` unless a fetch started later has already installed
    /// its own. Returns `None` when `ticket` is stale.
    pub async fn install(&self, ticket: u64, session: Session) -> Option<Arc<Session>> {
        // ---
        let mut slot = self.inner.write().await;
        if ticket < slot.ticket {
            return None;
        }

        let session = Arc::new(session);
        slot.ticket = ticket;
        slot.session = Some(Arc::clone(&session));
        Some(session)
    }
}
