//! Mutation lifecycle: mutate, then confirm by refetching the whole list.
//!
//! [`execute`] borrows only the remote source, never the controller state,
//! so the caller can keep paging and searching while it is outstanding. The
//! result is fed back through `ResourceController::complete`.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::error::{AerodeskError, Result};
use crate::remote::RemoteSource;
use crate::resource::Resource;

/// Which mutation is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    pub fn verb(&self) -> &'static str {
        match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            MutationKind::Create => "created",
            MutationKind::Update => "updated",
            MutationKind::Delete => "deleted",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// A validated mutation, ready to send
#[derive(Debug)]
pub enum Mutation<R: Resource> {
    Create(R::Draft),
    Update { key: R::Key, changes: R::Changes },
    Delete(R::Key),
}

impl<R: Resource> Mutation<R> {
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::Create(_) => MutationKind::Create,
            Mutation::Update { .. } => MutationKind::Update,
            Mutation::Delete(_) => MutationKind::Delete,
        }
    }
}

/// How a mutation ended
#[derive(Debug)]
pub enum MutationOutcome<R> {
    /// Committed and confirmed by a fresh list
    Succeeded {
        kind: MutationKind,
        /// Identity key of the affected record, as displayed
        subject: String,
        records: Vec<R>,
    },
    /// Rejected or never delivered; the server state is unchanged
    Failed {
        kind: MutationKind,
        error: AerodeskError,
    },
    /// Committed, but the confirming list query failed
    Stale {
        kind: MutationKind,
        subject: String,
        error: AerodeskError,
    },
}

impl<R> MutationOutcome<R> {
    pub fn kind(&self) -> MutationKind {
        match self {
            MutationOutcome::Succeeded { kind, .. }
            | MutationOutcome::Failed { kind, .. }
            | MutationOutcome::Stale { kind, .. } => *kind,
        }
    }
}

/// Bound a remote call by `limit`
pub async fn with_timeout<T>(
    limit: Duration,
    future: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| AerodeskError::Timeout(limit))?
}

/// Send `mutation`, then refetch the list. Each round trip is bounded by `limit`.
pub async fn execute<R, S>(
    source: &S,
    mutation: Mutation<R>,
    limit: Duration,
) -> MutationOutcome<R>
where
    R: Resource,
    S: RemoteSource<R> + ?Sized,
{
    let kind = mutation.kind();
    let committed = match mutation {
        Mutation::Create(draft) => with_timeout(limit, source.create(draft))
            .await
            .map(|record| record.key().to_string()),
        Mutation::Update { key, changes } => with_timeout(limit, source.update(&key, changes))
            .await
            .map(|record| record.key().to_string()),
        Mutation::Delete(key) => with_timeout(limit, source.delete(&key))
            .await
            .map(|()| key.to_string()),
    };

    let subject = match committed {
        Ok(subject) => subject,
        Err(error) => return MutationOutcome::Failed { kind, error },
    };

    match with_timeout(limit, source.list()).await {
        Ok(records) => MutationOutcome::Succeeded {
            kind,
            subject,
            records,
        },
        Err(error) => MutationOutcome::Stale {
            kind,
            subject,
            error,
        },
    }
}
