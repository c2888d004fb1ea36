//! Canned HTTP responses

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use crate::http::{HttpClient, HttpError, HttpResponse};

/// HTTP client answering from a per-URL response queue.
///
/// Each URL holds a queue of responses. Requests pop from the front until
/// one response is left, which is then repeated. URLs with no responses fail
/// with a transport error, like an unreachable host.
#[derive(Debug, Default)]
pub struct MockHttp {
    responses: RefCell<HashMap<String, VecDeque<HttpResponse>>>,
    requests: RefCell<Vec<String>>,
}

impl MockHttp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `url`
    pub fn respond(&self, url: &str, status: u16, body: impl Into<Vec<u8>>) {
        self.responses
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(HttpResponse::new(status, body));
    }

    /// Number of requests made to `url`
    pub fn request_count(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|u| *u == url).count()
    }

    /// All requested URLs in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl HttpClient for MockHttp {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        self.requests.borrow_mut().push(url.to_string());

        let mut responses = self.responses.borrow_mut();
        let next = responses.get_mut(url).and_then(|queue| {
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        });

        next.ok_or_else(|| HttpError::Transport {
            url: url.to_string(),
            reason: "connection refused".to_string(),
        })
    }
}
