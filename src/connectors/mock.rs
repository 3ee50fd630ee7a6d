use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::token::{TokenError, TokenProvider};
use super::transport::{Method, RequestParams, Transport, TransportError};

/// One call as the transport saw it
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub endpoint: String,
    pub params: RequestParams,
}

pub enum Scripted {
    Ok(String),
    Client(u16, String),
    Failed(String),
}

/// Transport that replays scripted outcomes in order and records every call
pub struct MockTransport {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn ok(body: &str) -> Scripted {
        Scripted::Ok(body.to_string())
    }

    pub fn client_error(status: u16, body: &str) -> Scripted {
        Scripted::Client(status, body.to_string())
    }

    pub fn failed(reason: &str) -> Scripted {
        Scripted::Failed(reason.to_string())
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        params: RequestParams,
    ) -> Result<String, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            endpoint: endpoint.to_string(),
            params,
        });

        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Ok(body)) => Ok(body),
            Some(Scripted::Client(status, body)) => Err(TransportError::Client { status, body }),
            Some(Scripted::Failed(reason)) => Err(TransportError::Failed(reason)),
            None => Err(TransportError::Failed("no scripted response".to_string())),
        }
    }
}

/// Hands out `cached-token` or `fresh-token` and remembers every `use_cache` flag
#[derive(Default)]
pub struct MockTokenProvider {
    requests: Mutex<Vec<bool>>,
    fail: bool,
}

impl MockTokenProvider {
    pub fn failing() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn requests(&self) -> Vec<bool> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenProvider for MockTokenProvider {
    async fn get_token(&self, use_cache: bool) -> Result<String, TokenError> {
        self.requests.lock().unwrap().push(use_cache);
        if self.fail {
            return Err(TokenError::Source("issuer offline".to_string()));
        }
        Ok(if use_cache { "cached-token" } else { "fresh-token" }.to_string())
    }
}
