//! Controller state as one explicit value.
//!
//! Page, search term, open form, edit buffer, lifecycle and feedback live in
//! a single [`ResourceState`]. The edit buffer only exists inside an open
//! [`Modal`], so a closed modal can never carry stale input. Every
//! transition is a synchronous method here; the async controller only adds
//! the remote round trips around them.

use tracing::{debug, info, warn};

use crate::error::{AerodeskError, Result};
use crate::pagination::{self, PAGE_SIZE, Page};
use crate::resource::{EditBuffer, Resource, duplicate_keys};

use super::lifecycle::{Mutation, MutationKind, MutationOutcome};
use super::toast::Toast;

/// The locally held record set, always the result of the last list query
#[derive(Debug, Clone, PartialEq)]
pub enum Records<R> {
    Loading,
    Ready(Vec<R>),
    Failed(String),
}

impl<R> Records<R> {
    /// Loaded records, empty while loading or after a failure
    pub fn as_slice(&self) -> &[R] {
        match self {
            Records::Ready(records) => records,
            Records::Loading | Records::Failed(_) => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Records::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// The add or update form, if one is open
#[derive(Debug, Clone, PartialEq)]
pub enum Modal<R: Resource> {
    Closed,
    Add {
        buffer: EditBuffer,
    },
    /// `key` is captured when the form opens and addresses the record even
    /// if the form edits the fields the key is made of
    Update {
        key: R::Key,
        buffer: EditBuffer,
    },
}

impl<R: Resource> Modal<R> {
    pub fn is_open(&self) -> bool {
        !matches!(self, Modal::Closed)
    }

    pub fn buffer(&self) -> Option<&EditBuffer> {
        match self {
            Modal::Closed => None,
            Modal::Add { buffer } | Modal::Update { buffer, .. } => Some(buffer),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Submitting(MutationKind),
}

/// Everything one resource screen knows
#[derive(Debug, Clone)]
pub struct ResourceState<R: Resource> {
    records: Records<R>,
    page: usize,
    search: String,
    modal: Modal<R>,
    lifecycle: Lifecycle,
    toast: Option<Toast>,
}

impl<R: Resource> Default for ResourceState<R> {
    fn default() -> Self {
        Self {
            records: Records::Loading,
            page: 1,
            search: String::new(),
            modal: Modal::Closed,
            lifecycle: Lifecycle::Idle,
            toast: None,
        }
    }
}

impl<R: Resource> ResourceState<R> {
    pub fn records(&self) -> &Records<R> {
        &self.records
    }

    /// Current 1-based page, always within the valid range
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn modal(&self) -> &Modal<R> {
        &self.modal
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Submitting(_))
    }

    // ------------------------------------------------------------------
    // Records
    // ------------------------------------------------------------------

    pub fn begin_loading(&mut self) {
        self.records = Records::Loading;
    }

    /// Replace the record set with a fresh list result
    pub fn load(&mut self, records: Vec<R>) {
        for key in duplicate_keys(&records) {
            warn!(
                resource = R::KIND.plural(),
                %key,
                "duplicate identity key; update and delete address the first match"
            );
        }
        debug!(resource = R::KIND.plural(), count = records.len(), "records loaded");
        self.records = Records::Ready(records);
        self.page = pagination::clamp_page(self.page, self.total_pages());
    }

    /// The list query failed; the screen degrades to an error display
    pub fn fail_loading(&mut self, err: &AerodeskError) {
        warn!(resource = R::KIND.plural(), error = %err, "failed to load records");
        self.records = Records::Failed(err.to_string());
        self.toast = Some(Toast::error(format!(
            "Failed to load {}: {err}",
            R::KIND.plural()
        )));
    }

    // ------------------------------------------------------------------
    // Search and paging
    // ------------------------------------------------------------------

    /// Change the search term and go back to the first page
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    pub fn total_pages(&self) -> usize {
        let matches = pagination::filter(self.records.as_slice(), &self.search).len();
        pagination::total_pages(matches, PAGE_SIZE)
    }

    /// Jump to `page`, clamped into range. Returns the page now shown.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.page = pagination::clamp_page(page, self.total_pages());
        self.page
    }

    pub fn next_page(&mut self) -> usize {
        self.go_to_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> usize {
        self.go_to_page(self.page.saturating_sub(1))
    }

    pub fn current_page(&self) -> Page<'_, R> {
        pagination::paginate(self.records.as_slice(), &self.search, self.page, PAGE_SIZE)
    }

    // ------------------------------------------------------------------
    // Forms
    // ------------------------------------------------------------------

    pub fn open_add(&mut self) -> Result<()> {
        let result = self.ensure_idle().map(|()| {
            self.modal = Modal::Add {
                buffer: EditBuffer::blank(R::CREATE_FIELDS),
            };
        });
        self.surface(result)
    }

    /// Open the update form for row `row` (0-based) of the current page
    pub fn open_update(&mut self, row: usize) -> Result<()> {
        let record = self
            .ensure_idle()
            .and_then(|()| self.visible_record(row).cloned());
        let result = record.map(|record| self.open_update_with(&record));
        self.surface(result)
    }

    /// Open the update form for the first loaded record with `key`
    pub fn open_update_for(&mut self, key: &R::Key) -> Result<()> {
        let record = self.ensure_idle().and_then(|()| self.find(key).cloned());
        let result = record.map(|record| self.open_update_with(&record));
        self.surface(result)
    }

    fn open_update_with(&mut self, record: &R) {
        self.modal = Modal::Update {
            key: record.key(),
            buffer: EditBuffer::seeded(R::UPDATE_FIELDS, &record.seed()),
        };
    }

    pub fn edit_field(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let result = self.ensure_idle().and_then(|()| match &mut self.modal {
            Modal::Closed => Err(AerodeskError::NoOpenForm),
            Modal::Add { buffer } | Modal::Update { buffer, .. } => buffer.set(name, value),
        });
        self.surface(result)
    }

    /// Close the open form, discarding its buffer
    pub fn cancel(&mut self) -> Result<()> {
        let result = self.ensure_idle().map(|()| {
            self.modal = Modal::Closed;
        });
        self.surface(result)
    }

    // ------------------------------------------------------------------
    // Mutation lifecycle
    // ------------------------------------------------------------------

    /// Validate the open form and enter `Submitting`.
    ///
    /// On error the form and buffer are left untouched.
    pub fn begin_submit(&mut self) -> Result<Mutation<R>> {
        let mutation = self.ensure_idle().and_then(|()| match &self.modal {
            Modal::Closed => Err(AerodeskError::NoOpenForm),
            Modal::Add { buffer } => buffer
                .validate()
                .and_then(|()| R::draft(buffer))
                .map(Mutation::Create),
            Modal::Update { key, buffer } => {
                if !buffer.has_changes() {
                    return Err(AerodeskError::NothingToUpdate);
                }
                R::changes(buffer).map(|changes| Mutation::Update {
                    key: key.clone(),
                    changes,
                })
            }
        });
        let mutation = self.surface(mutation)?;
        self.enter_submitting(mutation.kind());
        Ok(mutation)
    }

    /// Enter `Submitting` for deleting row `row` of the current page
    pub fn begin_delete(&mut self, row: usize) -> Result<Mutation<R>> {
        let key = self
            .ensure_idle()
            .and_then(|()| self.visible_record(row).map(Resource::key));
        let key = self.surface(key)?;
        self.enter_submitting(MutationKind::Delete);
        Ok(Mutation::Delete(key))
    }

    /// Enter `Submitting` for deleting the record with `key`.
    ///
    /// The key is not checked against the loaded records; the server decides
    /// whether it exists.
    pub fn begin_delete_key(&mut self, key: R::Key) -> Result<Mutation<R>> {
        self.require_idle()?;
        self.enter_submitting(MutationKind::Delete);
        Ok(Mutation::Delete(key))
    }

    /// `Busy` while a mutation is in flight, surfaced like any rejection
    pub fn require_idle(&mut self) -> Result<()> {
        let result = self.ensure_idle();
        self.surface(result)
    }

    fn enter_submitting(&mut self, kind: MutationKind) {
        debug!(resource = R::KIND.plural(), %kind, "submitting");
        self.lifecycle = Lifecycle::Submitting(kind);
    }

    /// Apply the outcome of a mutation and return to `Idle`
    pub fn complete(&mut self, outcome: MutationOutcome<R>) -> Result<()> {
        let kind = outcome.kind();
        self.lifecycle = Lifecycle::Idle;

        match outcome {
            MutationOutcome::Succeeded {
                subject, records, ..
            } => {
                info!(resource = R::KIND.plural(), %kind, %subject, "mutation confirmed");
                self.load(records);
                self.close_after_commit(kind, &subject);
                self.toast = Some(Toast::success(format!(
                    "{} '{subject}' {}",
                    R::KIND.label(),
                    kind.past_tense()
                )));
                Ok(())
            }
            MutationOutcome::Failed { error, .. } => {
                warn!(resource = R::KIND.plural(), %kind, error = %error, "mutation failed");
                self.toast = Some(Toast::error(format!(
                    "Failed to {kind} {}: {error}",
                    R::KIND.singular()
                )));
                Err(error)
            }
            MutationOutcome::Stale { subject, error, .. } => {
                warn!(
                    resource = R::KIND.plural(),
                    %kind,
                    %subject,
                    error = %error,
                    "mutation committed but reloading failed"
                );
                // Committed: resubmitting the form would apply it twice
                self.close_after_commit(kind, &subject);
                self.records = Records::Failed(error.to_string());
                self.toast = Some(Toast::error(format!(
                    "{} '{subject}' {}, but reloading {} failed: {error}",
                    R::KIND.label(),
                    kind.past_tense(),
                    R::KIND.plural()
                )));
                Err(error)
            }
        }
    }

    fn close_after_commit(&mut self, kind: MutationKind, subject: &str) {
        let close = match (&self.modal, kind) {
            (Modal::Closed, _) => false,
            (_, MutationKind::Create | MutationKind::Update) => true,
            // A delete only closes the form editing the deleted record
            (Modal::Update { key, .. }, MutationKind::Delete) => key.to_string() == subject,
            (Modal::Add { .. }, MutationKind::Delete) => false,
        };
        if close {
            self.modal = Modal::Closed;
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn ensure_idle(&self) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Idle => Ok(()),
            Lifecycle::Submitting(kind) => Err(AerodeskError::Busy(format!(
                "{} {kind}",
                R::KIND.singular()
            ))),
        }
    }

    fn ensure_loaded(&self) -> Result<&[R]> {
        match &self.records {
            Records::Ready(records) => Ok(records),
            Records::Loading | Records::Failed(_) => {
                Err(AerodeskError::NotLoaded(R::KIND.plural().to_string()))
            }
        }
    }

    fn visible_record(&self, row: usize) -> Result<&R> {
        self.ensure_loaded()?;
        let page = self.current_page();
        let visible = page.items.len();
        page.items
            .get(row)
            .copied()
            .ok_or(AerodeskError::RowOutOfRange { row, visible })
    }

    fn find(&self, key: &R::Key) -> Result<&R> {
        self.ensure_loaded()?
            .iter()
            .find(|record| &record.key() == key)
            .ok_or_else(|| AerodeskError::RecordNotFound(format!("{} '{key}'", R::KIND)))
    }

    /// Put a rejection into the feedback slot so it is never only logged
    fn surface<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            debug!(resource = R::KIND.plural(), error = %err, "action rejected");
            self.toast = Some(match err {
                AerodeskError::Busy(_) => Toast::warning(err.to_string()),
                _ => Toast::error(err.to_string()),
            });
        }
        result
    }
}
