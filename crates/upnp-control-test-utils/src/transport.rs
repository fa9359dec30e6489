use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use upnp_control_protocol::{SoapRequest, SoapResponse, SoapTransport, TransportError};

/// Transport double that records every request and replays queued outcomes.
///
/// Calls beyond the queued outcomes fail with `TransportError::Http`.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    outcomes: Mutex<VecDeque<Result<SoapResponse, TransportError>>>,
    requests: Mutex<Vec<SoapRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response with the given decoded body.
    pub fn with_response(self, body: Value) -> Self {
        self.outcomes
            .lock()
            .push_back(Ok(SoapResponse::new(body)));
        self
    }

    /// Queue a transport failure.
    pub fn with_error(self, error: TransportError) -> Self {
        self.outcomes.lock().push_back(Err(error));
        self
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<SoapRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl SoapTransport for RecordingTransport {
    async fn call(&self, request: SoapRequest) -> Result<SoapResponse, TransportError> {
        self.requests.lock().push(request);
        self.outcomes
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Http("no response queued".to_string())))
    }
}
