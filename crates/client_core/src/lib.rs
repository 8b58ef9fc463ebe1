use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use shared::domain::{Record, RecordDraft, RecordId};
use thiserror::Error;
use tracing::info;

mod controller;
pub use controller::{ControllerError, RecordListController, RecordListView};

/// Records shown per page, fixed by the rendered pagination control.
pub const PAGE_SIZE: usize = 5;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("record store responded with status {0}")]
    Status(StatusCode),
    #[error("record store transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Remote API boundary for the record collection. Implementations own any
/// timeout policy; the caller never retries.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Record>, NetworkError>;
    async fn create(&self, draft: &RecordDraft) -> Result<Record, NetworkError>;
    async fn update(&self, id: RecordId, draft: &RecordDraft) -> Result<Record, NetworkError>;
    async fn delete(&self, id: RecordId) -> Result<(), NetworkError>;
}

/// Capability surface a renderer binds to. Terminal, GUI, and test harness
/// front-ends all drive the list through this one interface.
#[async_trait]
pub trait RecordListHandle {
    async fn load(&mut self) -> Result<(), ControllerError>;
    fn set_search_term(&mut self, term: &str);
    fn set_page(&mut self, page: usize);
    async fn create(&mut self, draft: RecordDraft) -> Result<RecordId, ControllerError>;
    async fn update(&mut self, id: RecordId, draft: RecordDraft) -> Result<(), ControllerError>;
    async fn delete(&mut self, id: RecordId) -> Result<(), ControllerError>;
    fn view(&self) -> RecordListView;
}

/// JSON-over-HTTP store: GET/POST on the base path, PUT/DELETE on one path
/// segment per record id.
pub struct HttpRecordStore {
    http: Client,
    base_url: String,
}

impl HttpRecordStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: Client::new(),
            base_url,
        }
    }

    fn record_url(&self, id: RecordId) -> String {
        format!("{}/{}", self.base_url, id.0)
    }
}

fn checked(response: Response) -> Result<Response, NetworkError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(NetworkError::Status(status))
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn fetch_all(&self) -> Result<Vec<Record>, NetworkError> {
        let records: Vec<Record> = checked(self.http.get(&self.base_url).send().await?)?
            .json()
            .await?;
        info!(count = records.len(), "records: collection fetched");
        Ok(records)
    }

    async fn create(&self, draft: &RecordDraft) -> Result<Record, NetworkError> {
        let record: Record = checked(self.http.post(&self.base_url).json(draft).send().await?)?
            .json()
            .await?;
        info!(server_id = record.id.0, "records: create acknowledged");
        Ok(record)
    }

    async fn update(&self, id: RecordId, draft: &RecordDraft) -> Result<Record, NetworkError> {
        let record: Record = checked(self.http.put(self.record_url(id)).json(draft).send().await?)?
            .json()
            .await?;
        info!(record_id = id.0, "records: update acknowledged");
        Ok(record)
    }

    async fn delete(&self, id: RecordId) -> Result<(), NetworkError> {
        checked(self.http.delete(self.record_url(id)).send().await?)?;
        info!(record_id = id.0, "records: delete acknowledged");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
