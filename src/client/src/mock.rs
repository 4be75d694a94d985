use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use common::error::{SnmpCfgError, SnmpCfgResult};
use serde_json::Value;
use url::Url;

use crate::{ApiPath, ApiResponse, HttpApi};

#[derive(Debug, Clone)]
pub(crate) struct Request {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

/// Records every request by its resolved path and answers with queued
/// responses in order.
#[derive(Default)]
pub(crate) struct MockApi {
    requests: Mutex<Vec<Request>>,
    responses: Mutex<VecDeque<ApiResponse>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: Value) {
        self.respond_raw(status, serde_json::to_vec(&body).unwrap());
    }

    pub fn respond_raw(&self, status: u16, body: impl Into<Bytes>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(ApiResponse::new(status, body));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    fn record(
        &self,
        method: &'static str,
        path: &ApiPath,
        body: Option<Bytes>,
    ) -> SnmpCfgResult<ApiResponse> {
        // recorded as sent on the wire, not as displayed
        let url = path.resolve(&Url::parse("http://collector/")?)?;
        let body = match body {
            Some(body) => Some(serde_json::from_slice(&body)?),
            None => None,
        };
        self.requests.lock().unwrap().push(Request {
            method,
            path: url.path().to_owned(),
            body,
        });

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| SnmpCfgError::Common(format!("no response queued for {} {}", method, path)))
    }
}

#[async_trait]
impl HttpApi for MockApi {
    async fn get(&self, path: &ApiPath) -> SnmpCfgResult<ApiResponse> {
        self.record("GET", path, None)
    }

    async fn post(&self, path: &ApiPath, body: Bytes) -> SnmpCfgResult<ApiResponse> {
        self.record("POST", path, Some(body))
    }

    async fn put(&self, path: &ApiPath, body: Bytes) -> SnmpCfgResult<ApiResponse> {
        self.record("PUT", path, Some(body))
    }

    async fn delete(&self, path: &ApiPath) -> SnmpCfgResult<ApiResponse> {
        self.record("DELETE", path, None)
    }
}
