use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use shared::{
    domain::{Record, RecordDraft, RecordId},
    error::ValidationError,
};
use thiserror::Error;

use crate::{NetworkError, RecordListHandle, RecordStore, PAGE_SIZE};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Snapshot handed to a renderer. Derived from controller state on demand,
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordListView {
    pub visible: Vec<Record>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_count: usize,
}

/// In-memory authority over the record collection, the active search term,
/// and the active page. Local state is mutated only after the remote store
/// has acknowledged a write, so the view never shows rejected records.
pub struct RecordListController<S> {
    store: S,
    records: Vec<Record>,
    search_term: String,
    current_page: usize,
    page_size: usize,
}

impl<S: RecordStore> RecordListController<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            records: Vec::new(),
            search_term: String::new(),
            current_page: 1,
            page_size: PAGE_SIZE,
        }
    }

    /// Replaces the collection wholesale from the remote store and returns
    /// to the first page. On failure the collection is left untouched.
    pub async fn load(&mut self) -> Result<(), NetworkError> {
        let records = self.store.fetch_all().await?;
        self.records = records;
        self.current_page = 1;
        Ok(())
    }

    /// Search always lands on the first page of matches.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.current_page = 1;
    }

    /// Stale pagination controls may request a page that no longer exists;
    /// out-of-range input clamps instead of producing an empty view.
    pub fn set_page(&mut self, page: usize) {
        let last = self.total_pages().max(1);
        self.current_page = page.clamp(1, last);
    }

    pub async fn create(&mut self, draft: RecordDraft) -> Result<RecordId, ControllerError> {
        draft.validate()?;
        let created = self.store.create(&draft).await?;
        // The backing store acknowledges every create with the same fixed id,
        // which would collide on the next insert. Assign the id locally.
        let id = self.next_local_id();
        self.records.push(Record { id, ..created });
        Ok(id)
    }

    pub async fn update(&mut self, id: RecordId, draft: RecordDraft) -> Result<(), ControllerError> {
        draft.validate()?;
        self.store.update(id, &draft).await?;
        // An id missing locally after a confirmed remote update is treated
        // as a stale-cache no-op, not an error.
        if let Some(record) = self.records.iter_mut().find(|r| r.id == id) {
            record.name = draft.name;
            record.email = draft.email;
            record.phone = draft.phone;
        }
        Ok(())
    }

    pub async fn delete(&mut self, id: RecordId) -> Result<(), NetworkError> {
        self.store.delete(id).await?;
        self.records.retain(|r| r.id != id);
        // Deleting the last record of the trailing page would otherwise
        // strand the view on an empty page.
        let total_pages = self.total_pages();
        if self.current_page > total_pages && total_pages > 0 {
            self.current_page = total_pages;
        }
        Ok(())
    }

    pub fn view(&self) -> RecordListView {
        let filtered = self.filtered();
        let total_count = filtered.len();
        let total_pages = total_count.div_ceil(self.page_size);
        let start = (self.current_page - 1) * self.page_size;
        let visible = filtered
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();
        RecordListView {
            visible,
            current_page: self.current_page,
            total_pages,
            total_count,
        }
    }

    fn filtered(&self) -> Vec<&Record> {
        let needle = self.search_term.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .collect()
    }

    fn total_pages(&self) -> usize {
        self.filtered().len().div_ceil(self.page_size)
    }

    fn next_local_id(&self) -> RecordId {
        match self.records.iter().map(|r| r.id.0).max() {
            Some(max) => RecordId(max + 1),
            None => RecordId(Utc::now().timestamp_millis()),
        }
    }
}

#[async_trait]
impl<S: RecordStore> RecordListHandle for RecordListController<S> {
    async fn load(&mut self) -> Result<(), ControllerError> {
        Ok(RecordListController::load(self).await?)
    }

    fn set_search_term(&mut self, term: &str) {
        RecordListController::set_search_term(self, term);
    }

    fn set_page(&mut self, page: usize) {
        RecordListController::set_page(self, page);
    }

    async fn create(&mut self, draft: RecordDraft) -> Result<RecordId, ControllerError> {
        RecordListController::create(self, draft).await
    }

    async fn update(&mut self, id: RecordId, draft: RecordDraft) -> Result<(), ControllerError> {
        RecordListController::update(self, id, draft).await
    }

    async fn delete(&mut self, id: RecordId) -> Result<(), ControllerError> {
        Ok(RecordListController::delete(self, id).await?)
    }

    fn view(&self) -> RecordListView {
        RecordListController::view(self)
    }
}
