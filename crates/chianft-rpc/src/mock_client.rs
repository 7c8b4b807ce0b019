use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{ChiaRpcClient, RpcError};

/// An offline transport for tests. Responses are queued per URL and served
/// in order; the final queued response is sticky, so a single
/// `mock_response` call behaves like a fixed response.
#[derive(Debug, Default)]
pub struct MockRpcClient {
    requests: Mutex<Vec<(String, Value)>>,
    responses: Mutex<HashMap<String, VecDeque<String>>>,
}

impl MockRpcClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mock_response(&mut self, url: &str, response: &str) {
        self.responses
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(response.to_string());
    }

    pub fn get_requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }

    fn next_response(&self, url: &str) -> Option<String> {
        let mut responses = self.responses.lock().unwrap();
        let queue = responses.get_mut(url)?;

        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl ChiaRpcClient for MockRpcClient {
    fn base_url(&self) -> &str {
        "http://api.example.com"
    }

    async fn make_post_request<R, B>(&self, endpoint: &str, body: B) -> Result<R, RpcError>
    where
        B: Serialize + Send,
        R: DeserializeOwned + Send,
    {
        let url = format!("{}/{}", self.base_url(), endpoint);

        self.requests
            .lock()
            .unwrap()
            .push((url.clone(), serde_json::to_value(body)?));

        let response = self
            .next_response(&url)
            .ok_or(RpcError::MissingMock(url))?;

        Ok(serde_json::from_str(&response)?)
    }
}
