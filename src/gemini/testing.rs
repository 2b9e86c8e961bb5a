use super::ContentGenerator;
use crate::{
    error::{Result, TryOnError},
    models::{Candidate, Content, GenerateContentRequest, GenerateContentResponse, Part},
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Semaphore;

pub fn image_response(mime_type: &str, bytes: &[u8]) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: vec![Candidate {
            content: Some(Content {
                role: Some("model".into()),
                parts: vec![Part::inline_bytes(mime_type, bytes)],
            }),
            finish_reason: Some("STOP".into()),
        }],
        prompt_feedback: None,
    }
}

/// Replays canned results in order and records every request.
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<GenerateContentResponse>>>,
    requests: Mutex<Vec<GenerateContentRequest>>,
}

impl ScriptedGenerator {
    pub fn new(script: Vec<Result<GenerateContentResponse>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GenerateContentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TryOnError::ResponseError("script exhausted".into())))
    }
}

/// Holds every call until the test releases it.
pub struct GatedGenerator {
    inner: ScriptedGenerator,
    gate: Semaphore,
    entered: AtomicUsize,
}

impl GatedGenerator {
    pub fn new(script: Vec<Result<GenerateContentResponse>>) -> Self {
        Self {
            inner: ScriptedGenerator::new(script),
            gate: Semaphore::new(0),
            entered: AtomicUsize::new(0),
        }
    }

    pub fn release(&self, calls: usize) {
        self.gate.add_permits(calls);
    }

    pub fn entered(&self) -> usize {
        self.entered.load(Ordering::SeqCst)
    }

    pub async fn wait_entered(&self, calls: usize) {
        while self.entered() < calls {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl ContentGenerator for GatedGenerator {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        self.entered.fetch_add(1, Ordering::SeqCst);
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| TryOnError::ResponseError(e.to_string()))?;
        permit.forget();
        self.inner.generate_content(request).await
    }
}
