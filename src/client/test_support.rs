use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::*;

#[derive(Debug, Clone, Default)]
pub struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

#[derive(Debug, Default)]
struct FakeTransportState {
    requests: Vec<HttpRequest>,
    responses: VecDeque<HttpResponse>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response; calls without a queued response fail like a dropped connection.
    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.state.lock().unwrap().responses.push_back(HttpResponse {
            status,
            body: body.into(),
        });
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.state.lock().unwrap().requests.last().cloned()
    }
}

impl HttpTransport for FakeTransport {
    fn send<'a>(&'a self, request: HttpRequest) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.requests.push(request);
            state
                .responses
                .pop_front()
                .ok_or_else(|| BoxError::from("connection reset: no response queued"))
        })
    }
}

pub fn make_client(transport: FakeTransport) -> SmsapiClient {
    SmsapiClient::builder(ApiToken::new("test-token").unwrap())
        .base_url("https://example.invalid/")
        .transport(Arc::new(transport))
        .build()
        .unwrap()
}

pub fn assert_param(params: &[(String, String)], key: &str, value: &str) {
    assert!(
        params.iter().any(|(k, v)| k == key && v == value),
        "missing param {key}={value}; got: {params:?}"
    );
}

pub fn assert_no_param(params: &[(String, String)], key: &str) {
    assert!(
        !params.iter().any(|(k, _)| k == key),
        "unexpected param {key}; got: {params:?}"
    );
}
