//! Best-effort compensating transactions.
//!
//! A [`Saga`] drives a sequence of forward steps.  Each successful step may
//! leave behind a compensation (usually a delete).  When a later step fails,
//! the recorded compensations run in reverse order, one after another, and
//! the failing step's error is returned.  Compensation failures are logged and
//! never replace that error, and they do not stop the remaining compensations.
//!
//! ```text
//! step 1 ✓ ──> step 2 ✓ ──> step 3 ✗
//!                              │
//!              comp 2 <────────┘
//!                │
//!              comp 1
//! ```
//!
//! There is no persistence: a crash between steps leaves whatever was
//! created behind.

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use tracing::{debug, info, warn};

use crate::resource::ResourceKind;

/// Deferred undo action for a completed step, labelled with the remote
/// identifier it removes so a failed undo can be traced to what was left
/// behind.
pub struct Compensation<'a, E> {
    target: String,
    action: BoxFuture<'a, Result<(), E>>,
}

impl<'a, E> Compensation<'a, E> {
    pub fn new<Fut>(target: impl Into<String>, action: Fut) -> Self
    where
        Fut: Future<Output = Result<(), E>> + Send + 'a,
    {
        Self {
            target: target.into(),
            action: Box::pin(action),
        }
    }
}

struct CompletedStep<'a, E> {
    resource: ResourceKind,
    undo: Option<Compensation<'a, E>>,
}

/// Forward steps plus the stack of compensations for what has been done.
pub struct Saga<'a, E> {
    name: String,
    completed: Vec<CompletedStep<'a, E>>,
}

impl<'a, E> Saga<'a, E>
where
    E: fmt::Display,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            completed: Vec::new(),
        }
    }

    /// Run one forward step.
    ///
    /// On success `compensate` is handed the step's output and may return the
    /// action that undoes it (`None` when the resource goes away with an
    /// earlier one).  On failure every recorded compensation runs before the
    /// error is returned.
    pub async fn step<T, Fut, F>(
        &mut self,
        resource: ResourceKind,
        create: Fut,
        compensate: F,
    ) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        F: FnOnce(&T) -> Option<Compensation<'a, E>>,
    {
        match create.await {
            Ok(output) => {
                debug!(saga = %self.name, %resource, "step completed");
                let undo = compensate(&output);
                if undo.is_none() && resource.independently_deletable() {
                    warn!(
                        saga = %self.name,
                        %resource,
                        "no compensation recorded, rollback will leave it behind"
                    );
                }
                self.completed.push(CompletedStep { resource, undo });
                Ok(output)
            }
            Err(err) => {
                debug!(saga = %self.name, %resource, error = %err, "step failed, rolling back");
                self.rollback().await;
                Err(err)
            }
        }
    }

    /// Resources completed so far, in creation order.
    pub fn completed(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        self.completed.iter().map(|step| step.resource)
    }

    /// Undo every completed step, most recent first.
    pub async fn rollback(&mut self) {
        while let Some(step) = self.completed.pop() {
            let Some(undo) = step.undo else {
                continue;
            };
            match undo.action.await {
                Ok(()) => {
                    info!(
                        saga = %self.name,
                        resource = %step.resource,
                        id = %undo.target,
                        "rolled back"
                    );
                }
                Err(err) => {
                    warn!(
                        saga = %self.name,
                        resource = %step.resource,
                        id = %undo.target,
                        error = %err,
                        "error rolling back {} creation",
                        step.resource,
                    );
                }
            }
        }
    }

    /// Keep everything that was created; pending compensations are dropped
    /// without running.
    pub fn commit(self) {
        let resources: Vec<ResourceKind> = self.completed().collect();
        debug!(saga = %self.name, ?resources, "saga committed");
    }
}
