//! Mock image host and compositor for pipeline and handler tests.
//!
//! Both mocks count their calls so tests can assert that a stage was
//! skipped entirely.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    models::polaroidmodel::ResultMime,
    service::{
        compositor::Compositor,
        error::{CompositorError, UploadError},
        image_host::ImageHost,
        pipeline::{PipelineSettings, PolaroidPipeline},
    },
};

pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Clone, Debug)]
pub enum HostBehavior {
    /// Returns `U1`, `U2`, ... in call order.
    Succeed,
    /// Fails the n-th call (1-based); other calls succeed.
    FailOn(usize),
    /// Never answers within any test timeout.
    Hang,
    /// Fails the first call at once; later calls hang.
    FailFirstThenHang,
}

pub struct MockImageHost {
    behavior: HostBehavior,
    calls: AtomicUsize,
}

impl MockImageHost {
    pub fn new(behavior: HostBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageHost for MockImageHost {
    fn name(&self) -> &'static str {
        "mock-host"
    }

    async fn upload(&self, _image: Vec<u8>) -> Result<String, UploadError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        match self.behavior {
            HostBehavior::Succeed => Ok(format!("https://host.test/dl/U{}", call)),
            HostBehavior::FailOn(n) if n == call => Err(UploadError::Status(500)),
            HostBehavior::FailOn(_) => Ok(format!("https://host.test/dl/U{}", call)),
            HostBehavior::FailFirstThenHang if call == 1 => Err(UploadError::Status(500)),
            HostBehavior::Hang | HostBehavior::FailFirstThenHang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok("https://host.test/dl/late".to_string())
            }
        }
    }
}

#[derive(Clone, Debug)]
pub enum CompositorBehavior {
    Return(Vec<u8>),
    Status(u16),
    Hang,
}

pub struct MockCompositor {
    behavior: CompositorBehavior,
    received: Mutex<Vec<(String, String)>>,
}

impl MockCompositor {
    pub fn new(behavior: CompositorBehavior) -> Self {
        Self {
            behavior,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    pub fn received(&self) -> Vec<(String, String)> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl Compositor for MockCompositor {
    async fn compose(&self, url1: &str, url2: &str) -> Result<Vec<u8>, CompositorError> {
        self.received
            .lock()
            .unwrap()
            .push((url1.to_string(), url2.to_string()));

        match &self.behavior {
            CompositorBehavior::Return(bytes) => Ok(bytes.clone()),
            CompositorBehavior::Status(code) => Err(CompositorError::Status(*code)),
            CompositorBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(Vec::new())
            }
        }
    }
}

pub fn test_settings() -> PipelineSettings {
    PipelineSettings {
        upload_timeout: Duration::from_millis(100),
        compose_timeout: Duration::from_millis(100),
        parallel_uploads: false,
        result_mime: ResultMime::Png,
        max_image_bytes: 1024,
    }
}

pub fn build_pipeline(
    host: Arc<MockImageHost>,
    compositor: Arc<MockCompositor>,
    settings: PipelineSettings,
) -> PolaroidPipeline {
    PolaroidPipeline::new(host, compositor, settings)
}
