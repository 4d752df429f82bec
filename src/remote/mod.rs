//! Remote data source module.
//!
//! The airline API owns every record. This module defines the contract the
//! controller relies on ([`RemoteSource`]) and its GraphQL implementation.
//! The full collection is always fetched; pagination happens client-side.

mod client;
mod graphql;
mod sources;

use std::future::Future;
use std::sync::Arc;

use crate::error::Result;
use crate::resource::Resource;

pub use client::GraphQlClient;

/// Query and mutation operations for one record type.
///
/// Every call is a single round trip. Implementations never cache: `list`
/// always reflects the server as of the call.
pub trait RemoteSource<R: Resource>: Send + Sync {
    /// Fetch the whole collection, in server order
    fn list(&self) -> impl Future<Output = Result<Vec<R>>> + Send;

    /// Create a record, returning its committed form
    fn create(&self, draft: R::Draft) -> impl Future<Output = Result<R>> + Send;

    /// Apply changes to the record addressed by `key`
    fn update(
        &self,
        key: &R::Key,
        changes: R::Changes,
    ) -> impl Future<Output = Result<R>> + Send;

    /// Delete the record addressed by `key`
    fn delete(&self, key: &R::Key) -> impl Future<Output = Result<()>> + Send;
}

impl<R: Resource, S: RemoteSource<R> + ?Sized> RemoteSource<R> for Arc<S> {
    fn list(&self) -> impl Future<Output = Result<Vec<R>>> + Send {
        (**self).list()
    }

    fn create(&self, draft: R::Draft) -> impl Future<Output = Result<R>> + Send {
        (**self).create(draft)
    }

    fn update(
        &self,
        key: &R::Key,
        changes: R::Changes,
    ) -> impl Future<Output = Result<R>> + Send {
        (**self).update(key, changes)
    }

    fn delete(&self, key: &R::Key) -> impl Future<Output = Result<()>> + Send {
        (**self).delete(key)
    }
}
