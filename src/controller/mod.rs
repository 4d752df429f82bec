//! Generic resource controller.
//!
//! One [`ResourceController`] drives a single record type: it owns the
//! screen state, fetches the list on mount and confirms every mutation by
//! refetching. The per-type differences (identity key, form fields, search
//! fields) come from the [`Resource`] implementation.
//!
//! Mutations can be driven in one call with [`ResourceController::submit`],
//! or split into `begin_*`, [`lifecycle::execute`] and
//! [`ResourceController::complete`] so the list can still be browsed while
//! the request is outstanding.

pub mod lifecycle;
mod state;
mod toast;
mod view;

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::error::Result;
use crate::pagination::Page;
use crate::remote::RemoteSource;
use crate::resource::Resource;

pub use lifecycle::{Mutation, MutationKind, MutationOutcome, execute};
pub use state::{Lifecycle, Modal, Records, ResourceState};
pub use toast::{Toast, ToastLevel};
pub use view::{FieldViewModel, FormViewModel, ListStatus, ResourceViewModel, compute_view_model};

/// Default bound on every remote round trip
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ResourceController<R: Resource, S> {
    source: Arc<S>,
    state: ResourceState<R>,
    timeout: Duration,
}

/// Read-only access, available for any source type
impl<R: Resource, S> ResourceController<R, S> {
    pub fn state(&self) -> &ResourceState<R> {
        &self.state
    }

    /// Handle on the source, for running [`execute`] outside the controller
    pub fn source(&self) -> Arc<S> {
        Arc::clone(&self.source)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn current_page(&self) -> Page<'_, R> {
        self.state.current_page()
    }

    pub fn view_model(&self) -> ResourceViewModel<'_, R> {
        compute_view_model(&self.state)
    }
}

impl<R, S> ResourceController<R, S>
where
    R: Resource,
    S: RemoteSource<R>,
{
    pub fn new(source: S) -> Self {
        Self::with_shared(Arc::new(source))
    }

    /// Controller over a source that is also used elsewhere
    pub fn with_shared(source: Arc<S>) -> Self {
        Self {
            source,
            state: ResourceState::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reset the screen and fetch the list.
    ///
    /// Refused while a mutation is in flight, so its outcome still has a
    /// `Submitting` state to complete.
    pub async fn mount(&mut self) -> Result<()> {
        self.state.require_idle()?;
        debug!(resource = R::KIND.plural(), "mounting controller");
        self.state = ResourceState::default();
        self.refresh().await
    }

    /// Refetch the list, keeping page, search and any open form
    pub async fn refresh(&mut self) -> Result<()> {
        self.state.begin_loading();
        match lifecycle::with_timeout(self.timeout, self.source.list()).await {
            Ok(records) => {
                self.state.load(records);
                Ok(())
            }
            Err(err) => {
                self.state.fail_loading(&err);
                Err(err)
            }
        }
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.state.set_search(term);
    }

    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.state.go_to_page(page)
    }

    pub fn next_page(&mut self) -> usize {
        self.state.next_page()
    }

    pub fn prev_page(&mut self) -> usize {
        self.state.prev_page()
    }

    pub fn open_add(&mut self) -> Result<()> {
        self.state.open_add()
    }

    pub fn open_update(&mut self, row: usize) -> Result<()> {
        self.state.open_update(row)
    }

    pub fn open_update_for(&mut self, key: &R::Key) -> Result<()> {
        self.state.open_update_for(key)
    }

    pub fn edit_field(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        self.state.edit_field(name, value)
    }

    pub fn cancel(&mut self) -> Result<()> {
        self.state.cancel()
    }

    pub fn begin_submit(&mut self) -> Result<Mutation<R>> {
        self.state.begin_submit()
    }

    pub fn begin_delete(&mut self, row: usize) -> Result<Mutation<R>> {
        self.state.begin_delete(row)
    }

    pub fn begin_delete_key(&mut self, key: R::Key) -> Result<Mutation<R>> {
        self.state.begin_delete_key(key)
    }

    pub fn complete(&mut self, outcome: MutationOutcome<R>) -> Result<()> {
        self.state.complete(outcome)
    }

    /// Submit the open form and wait for the refetch
    pub async fn submit(&mut self) -> Result<()> {
        let mutation = self.state.begin_submit()?;
        self.run(mutation).await
    }

    /// Delete row `row` of the current page and wait for the refetch
    pub async fn delete_row(&mut self, row: usize) -> Result<()> {
        let mutation = self.state.begin_delete(row)?;
        self.run(mutation).await
    }

    /// Delete the record with `key` and wait for the refetch
    pub async fn delete_key(&mut self, key: R::Key) -> Result<()> {
        let mutation = self.state.begin_delete_key(key)?;
        self.run(mutation).await
    }

    async fn run(&mut self, mutation: Mutation<R>) -> Result<()> {
        let outcome = execute(self.source.as_ref(), mutation, self.timeout).await;
        self.state.complete(outcome)
    }
}
