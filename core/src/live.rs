//! Live queries: a derived result set recomputed from scratch whenever a write
//! touches one of the tables it depends on.
//!
//! A [`LiveQuery`] holds a receiver on the database's change channel. The
//! first call to [`LiveQuery::next`] yields the initial result; later calls
//! wait for a relevant notification and yield one recomputed result for each
//! batch of notifications that arrived in the meantime. Dropping the query
//! (or calling [`LiveQuery::unsubscribe`]) ends the subscription.

use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use crate::db::Database;
use crate::error::Result;
use crate::models::Table;

type Compute<T> = Box<dyn Fn(&Database) -> Result<Vec<T>>>;

pub struct LiveQuery<T> {
    rx: Receiver<Table>,
    tables: Vec<Table>,
    compute: Compute<T>,
    primed: bool,
}

impl<T> LiveQuery<T> {
    /// Subscribe before the first computation so no write between the two is
    /// missed.
    pub fn new(
        db: &Database,
        tables: impl Into<Vec<Table>>,
        compute: impl Fn(&Database) -> Result<Vec<T>> + 'static,
    ) -> Self {
        Self {
            rx: db.subscribe(),
            tables: tables.into(),
            compute: Box::new(compute),
            primed: false,
        }
    }

    #[must_use]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    fn recompute(&self, db: &Database) -> Result<Vec<T>> {
        (self.compute)(db)
    }

    /// Drain everything already queued; returns whether any of it was relevant.
    fn drain(&mut self) -> bool {
        let mut dirty = false;
        loop {
            match self.rx.try_recv() {
                Ok(table) => dirty |= self.tables.contains(&table),
                Err(TryRecvError::Lagged(missed)) => {
                    tracing::debug!(missed, "live query lagged, recomputing");
                    dirty = true;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return dirty,
            }
        }
    }

    /// The initial result, then one result per relevant change. Returns
    /// `None` once the change channel is closed.
    pub async fn next(&mut self, db: &Database) -> Option<Result<Vec<T>>> {
        if !self.primed {
            self.primed = true;
            return Some(self.recompute(db));
        }
        loop {
            match self.rx.recv().await {
                Ok(table) if self.tables.contains(&table) => {
                    self.drain();
                    return Some(self.recompute(db));
                }
                Ok(_) => {}
                Err(RecvError::Lagged(missed)) => {
                    tracing::debug!(missed, "live query lagged, recomputing");
                    self.drain();
                    return Some(self.recompute(db));
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking [`LiveQuery::next`]: `None` when nothing relevant changed
    /// since the last result.
    pub fn try_next(&mut self, db: &Database) -> Option<Result<Vec<T>>> {
        if !self.primed {
            self.primed = true;
            self.drain();
            return Some(self.recompute(db));
        }
        if self.drain() {
            Some(self.recompute(db))
        } else {
            None
        }
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}
