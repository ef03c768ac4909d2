//! Scripted in-memory transport shared by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::oneshot;

use super::api::ApiClient;
use super::transport::{ApiRequest, ApiResponse, Transport, TransportError};
use crate::navigation::Location;
use crate::state::session::Session;
use crate::storage::{MemoryStorage, Storage, TOKEN_KEY};

enum Reply {
    Ready(Result<ApiResponse, TransportError>),
    Wait(oneshot::Receiver<ApiResponse>),
}

/// Replays queued replies in order and records every request it sees.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, status: u16, body: Value) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Ready(Ok(ApiResponse { status, body: body.to_string() })));
    }

    pub fn reply_raw(&self, status: u16, body: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Ready(Ok(ApiResponse { status, body: body.to_owned() })));
    }

    pub fn fail(&self, reason: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Ready(Err(TransportError::Request(reason.to_owned()))));
    }

    /// Queue a reply that is only delivered once the returned sender fires.
    pub fn gate(&self) -> oneshot::Sender<ApiResponse> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(Reply::Wait(rx));
        tx
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Wait(rx)) => rx
                .await
                .map_err(|_| TransportError::Request("gate dropped".to_owned())),
            None => Err(TransportError::Request("no scripted reply".to_owned())),
        }
    }
}

/// A fully wired client over a mock transport.
pub struct Harness {
    pub transport: Arc<MockTransport>,
    pub storage: Arc<MemoryStorage>,
    pub session: Session,
    pub location: Location,
    pub api: ApiClient,
}

impl Harness {
    pub fn anonymous() -> Self {
        Self::with_storage(MemoryStorage::new())
    }

    pub fn logged_in(token: &str) -> Self {
        Self::with_storage(MemoryStorage::with_entries([
            (TOKEN_KEY, token.to_owned()),
            ("user", r#"{"id":1,"username":"alice"}"#.to_owned()),
        ]))
    }

    pub fn with_storage(storage: MemoryStorage) -> Self {
        let transport = MockTransport::new();
        let storage = Arc::new(storage);
        let session = Session::restore(storage.clone() as Arc<dyn Storage>);
        let location = Location::new("/dashboard");
        let api = ApiClient::new(transport.clone(), session.clone(), Arc::new(location.clone()));
        Self { transport, storage, session, location, api }
    }
}
