#![allow(dead_code)]

pub mod fixtures;
pub mod pdf_assertions;

use async_trait::async_trait;
use dossier::{ResourceError, ResourceProvider};
use lopdf::Document as LopdfDocument;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    /// Create a GeneratedPdf from raw bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    /// Get the number of pages in the PDF
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    pub fn text(&self) -> String {
        pdf_assertions::extract_text(&self.doc)
    }

    /// Save PDF to a file for manual debugging
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

/// How a [`ScriptedProvider`] answers one URI.
#[derive(Debug, Clone)]
pub enum Script {
    Bytes(Vec<u8>),
    /// Answer after a delay.
    Delayed(Duration, Vec<u8>),
    Fail(ResourceError),
    /// Never answer.
    Hang,
}

/// A provider with canned answers that records how it was called.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    scripts: HashMap<String, Script>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, uri: impl Into<String>, script: Script) -> Self {
        self.scripts.insert(uri.into(), script);
        self
    }

    /// Highest number of loads that were running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResourceProvider for ScriptedProvider {
    async fn load(&self, uri: &str) -> Result<Arc<Vec<u8>>, ResourceError> {
        self.calls.lock().unwrap().push(uri.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let result = match self.scripts.get(uri) {
            Some(Script::Bytes(bytes)) => Ok(Arc::new(bytes.clone())),
            Some(Script::Delayed(delay, bytes)) => {
                tokio::time::sleep(*delay).await;
                Ok(Arc::new(bytes.clone()))
            }
            Some(Script::Fail(error)) => Err(error.clone()),
            Some(Script::Hang) => std::future::pending().await,
            None => Err(ResourceError::NotFound(uri.to_string())),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn name(&self) -> &'static str {
        "ScriptedProvider"
    }
}
