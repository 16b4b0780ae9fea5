use crate::traits::{RawResponse, SearchTransport};
use crate::SearchError;
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;
use url::Url;

#[derive(Debug, Clone)]
pub(crate) enum Step {
    Respond(u16, String),
    /// Answers 200 with the body after the given delay.
    Slow(std::time::Duration, String),
    /// Never answers; the client's timeout has to cut it off.
    Hang,
    Fail,
}

pub(crate) fn respond(status: u16, body: impl Into<String>) -> Step {
    Step::Respond(status, body.into())
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub url: Url,
    pub at: Instant,
}

#[derive(Default)]
struct Script {
    steps: VecDeque<Step>,
    last: Option<Step>,
    calls: Vec<RecordedCall>,
}

/// Plays back steps in order and repeats the final one once exhausted.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub(crate) fn new(steps: Vec<Step>) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                steps: steps.into(),
                last: None,
                calls: Vec::new(),
            })),
        }
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.script.lock().unwrap().calls.clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.script.lock().unwrap().calls.len()
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| {
                call.url
                    .query_pairs()
                    .find(|(key, _)| key == "q")
                    .map(|(_, value)| value.into_owned())
            })
            .collect()
    }
}

#[async_trait]
impl SearchTransport for ScriptedTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse, SearchError> {
        let step = {
            let mut script = self.script.lock().unwrap();
            script.calls.push(RecordedCall {
                url: url.clone(),
                at: Instant::now(),
            });
            match script.steps.pop_front() {
                Some(step) => {
                    script.last = Some(step.clone());
                    step
                }
                None => script.last.clone().unwrap_or(Step::Fail),
            }
        };

        match step {
            Step::Respond(status, body) => Ok(RawResponse::new(status, body)),
            Step::Slow(delay, body) => {
                tokio::time::sleep(delay).await;
                Ok(RawResponse::new(200, body))
            }
            Step::Hang => std::future::pending().await,
            Step::Fail => Err(SearchError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
        }
    }
}

pub(crate) fn results_body(count: usize) -> String {
    let results: Vec<_> = (0..count)
        .map(|index| {
            json!({
                "id": format!("course-{index}"),
                "title": format!("Course {index}"),
                "type": "course",
                "snippet": "An introductory course",
            })
        })
        .collect();
    json!({ "results": results, "totalResults": count }).to_string()
}
