//! Classification client driven by per-part-number reply scripts.

use async_trait::async_trait;
use parking_lot::Mutex;
use reclassifier::classifier::{ClassificationClient, ClassificationRequest};
use reclassifier::ClassifierError;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
pub enum Reply {
    Code(String),
    Fail(ClassifierError),
    Panic,
}

impl Reply {
    pub fn code(code: &str) -> Self {
        Reply::Code(code.to_string())
    }

    pub fn unavailable() -> Self {
        Reply::Fail(ClassifierError::Unavailable("service unavailable".to_string()))
    }

    pub fn exhausted() -> Self {
        Reply::Fail(ClassifierError::ResourceExhausted("quota exceeded".to_string()))
    }

    pub fn fatal() -> Self {
        Reply::Fail(ClassifierError::Other("invalid argument".to_string()))
    }
}

#[derive(Debug, Default)]
pub struct ScriptedClient {
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<HashMap<String, u32>>,
    total_calls: AtomicUsize,
    /// Reply for part numbers without a script
    default_code: Option<String>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every unscripted record classifies to `code`
    pub fn answering(code: &str) -> Self {
        Self {
            default_code: Some(code.to_string()),
            ..Self::default()
        }
    }

    pub fn script(self, part_number: &str, replies: Vec<Reply>) -> Self {
        self.scripts
            .lock()
            .insert(part_number.to_string(), replies.into_iter().collect());
        self
    }

    pub fn calls_for(&self, part_number: &str) -> u32 {
        self.calls.lock().get(part_number).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClassificationClient for ScriptedClient {
    async fn classify(&self, request: &ClassificationRequest) -> Result<String, ClassifierError> {
        let part_number = request.key.part_number.clone();
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        *self.calls.lock().entry(part_number.clone()).or_insert(0) += 1;

        let reply = self
            .scripts
            .lock()
            .get_mut(&part_number)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Code(code)) => Ok(code),
            Some(Reply::Fail(error)) => Err(error),
            Some(Reply::Panic) => panic!("scripted panic for {part_number}"),
            None => self
                .default_code
                .clone()
                .ok_or_else(|| ClassifierError::Other(format!("no reply scripted for {part_number}"))),
        }
    }

    fn client_name(&self) -> &'static str {
        "scripted"
    }
}
