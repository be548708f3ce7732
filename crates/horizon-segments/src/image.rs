//! Image loading for image-mode segments.
//!
//! In the image display modes a segment's display string is an image
//! descriptor. The descriptor is resolved to an [`ImageSource`], loaded by an
//! [`ImageService`] on the async runtime, and handed back to the UI thread
//! through the [`ImageFetcher`]'s completion channel. Segment views are built
//! immediately with a placeholder; the decoded image is applied when the
//! owner drains completions.
//!
//! Requests are keyed by view. Destroying a view cancels its request, and a
//! completion for a view that has since been destroyed or re-requested is
//! discarded on arrival.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use futures_util::future::BoxFuture;
use horizon_segments_core::logging::targets;
use horizon_segments_core::{AsyncRuntime, AsyncTaskHandle};

use crate::error::ImageError;
use crate::platform::ViewId;

/// Where a segment image comes from.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum ImageSource {
    File(PathBuf),
    Uri(String),
    Bytes(Arc<[u8]>),
}

impl ImageSource {
    /// Parse an image descriptor.
    ///
    /// `http://` and `https://` descriptors are URIs; `file://` descriptors and
    /// everything else are file paths. Blank descriptors have no image.
    pub fn parse(descriptor: &str) -> Option<Self> {
        let descriptor = descriptor.trim();
        if descriptor.is_empty() {
            return None;
        }
        if descriptor.starts_with("http://") || descriptor.starts_with("https://") {
            return Some(ImageSource::Uri(descriptor.to_string()));
        }
        let path = descriptor.strip_prefix("file://").unwrap_or(descriptor);
        Some(ImageSource::File(PathBuf::from(path)))
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::File(path) => f.debug_tuple("File").field(path).finish(),
            ImageSource::Uri(uri) => f.debug_tuple("Uri").field(uri).finish(),
            ImageSource::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
        }
    }
}

/// Maps a display string to an image source.
pub type ImageResolver = Arc<dyn Fn(&str) -> Option<ImageSource> + Send + Sync>;

/// The resolver used when none is configured.
pub fn default_resolver() -> ImageResolver {
    Arc::new(ImageSource::parse)
}

/// A decoded RGBA8 image ready to hand to a native view.
#[derive(Clone, PartialEq, Eq)]
pub struct NativeImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<[u8]>,
}

impl NativeImage {
    /// Decode an encoded image (PNG, JPEG, ...).
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw().into(),
        })
    }
}

impl fmt::Debug for NativeImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Loads images for segments.
pub trait ImageService: Send + Sync + 'static {
    fn load(&self, source: ImageSource) -> BoxFuture<'static, Result<NativeImage, ImageError>>;
}

/// Loads files and in-memory bytes, plus `http(s)` URIs with the
/// `networking` feature.
#[derive(Debug, Clone, Default)]
pub struct DefaultImageService {
    #[cfg(feature = "networking")]
    client: reqwest::Client,
}

impl DefaultImageService {
    pub fn new() -> Self {
        Self::default()
    }

    async fn decode_off_thread(bytes: Vec<u8>) -> Result<NativeImage, ImageError> {
        tokio::task::spawn_blocking(move || NativeImage::decode(&bytes))
            .await
            .map_err(|_| ImageError::Cancelled)?
    }

    #[cfg(feature = "networking")]
    async fn fetch(client: reqwest::Client, uri: String) -> Result<Vec<u8>, ImageError> {
        let response = client
            .get(&uri)
            .send()
            .await
            .map_err(|e| ImageError::Fetch(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ImageError::Fetch(format!("{uri}: HTTP status {}", response.status())));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageError::Fetch(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

impl ImageService for DefaultImageService {
    fn load(&self, source: ImageSource) -> BoxFuture<'static, Result<NativeImage, ImageError>> {
        #[cfg(feature = "networking")]
        let client = self.client.clone();

        Box::pin(async move {
            let bytes = match source {
                ImageSource::File(path) => tokio::fs::read(&path).await?,
                ImageSource::Bytes(bytes) => bytes.to_vec(),
                #[cfg(feature = "networking")]
                ImageSource::Uri(uri) => Self::fetch(client, uri).await?,
                #[cfg(not(feature = "networking"))]
                ImageSource::Uri(uri) => {
                    return Err(ImageError::Unsupported(format!(
                        "{uri} (built without the `networking` feature)"
                    )));
                }
            };
            Self::decode_off_thread(bytes).await
        })
    }
}

/// A finished image load.
#[derive(Debug)]
pub struct ImageCompletion {
    pub view: ViewId,
    pub result: Result<NativeImage, ImageError>,
    ticket: u64,
}

struct PendingLoad {
    ticket: u64,
    task: AsyncTaskHandle<()>,
}

/// Runs image loads on the async runtime and collects their results.
///
/// The fetcher never touches views itself; its owner drains
/// [`completed`](Self::completed) on the UI thread and applies the results.
pub struct ImageFetcher {
    service: Arc<dyn ImageService>,
    runtime: AsyncRuntime,
    sender: Sender<ImageCompletion>,
    receiver: Receiver<ImageCompletion>,
    pending: HashMap<ViewId, PendingLoad>,
    next_ticket: u64,
}

impl ImageFetcher {
    pub fn new(service: Arc<dyn ImageService>, runtime: AsyncRuntime) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            service,
            runtime,
            sender,
            receiver,
            pending: HashMap::new(),
            next_ticket: 0,
        }
    }

    /// A fetcher using [`DefaultImageService`] on the given runtime.
    pub fn with_default_service(runtime: AsyncRuntime) -> Self {
        Self::new(Arc::new(DefaultImageService::new()), runtime)
    }

    /// Start loading `source` for `view`, replacing any load already
    /// running for it.
    pub fn request(&mut self, view: ViewId, source: ImageSource) {
        self.cancel(view);

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        tracing::trace!(target: targets::IMAGE, ?view, ?source, ticket, "image load requested");

        let load = self.service.load(source);
        let sender = self.sender.clone();
        let task = self.runtime.spawn(async move {
            let result = load.await;
            // The receiver only disappears with the fetcher itself.
            let _ = sender.send(ImageCompletion { view, result, ticket });
        });
        self.pending.insert(view, PendingLoad { ticket, task });
    }

    /// Cancel the load for `view`, if one is running.
    pub fn cancel(&mut self, view: ViewId) -> bool {
        match self.pending.remove(&view) {
            Some(load) => {
                load.task.abort();
                tracing::trace!(target: targets::IMAGE, ?view, "image load cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancel every running load.
    pub fn cancel_all(&mut self) {
        for (_, load) in self.pending.drain() {
            load.task.abort();
        }
    }

    /// Loads requested but not yet collected.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Collect finished loads without blocking.
    ///
    /// Results for cancelled or superseded requests are dropped here.
    pub fn completed(&mut self) -> Vec<ImageCompletion> {
        let arrived: Vec<_> = self.receiver.try_iter().collect();
        self.accept(arrived)
    }

    /// Wait up to `timeout` for at least one load to finish, then collect
    /// everything that has arrived.
    pub fn wait_completed(&mut self, timeout: Duration) -> Vec<ImageCompletion> {
        let deadline = std::time::Instant::now() + timeout;
        let mut accepted = Vec::new();
        while accepted.is_empty() && !self.pending.is_empty() {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(first) => {
                    let mut arrived = vec![first];
                    arrived.extend(self.receiver.try_iter());
                    accepted = self.accept(arrived);
                }
                Err(_) => break,
            }
        }
        accepted
    }

    fn accept(&mut self, arrived: Vec<ImageCompletion>) -> Vec<ImageCompletion> {
        arrived
            .into_iter()
            .filter(|completion| {
                let current = self
                    .pending
                    .get(&completion.view)
                    .is_some_and(|load| load.ticket == completion.ticket);
                if current {
                    self.pending.remove(&completion.view);
                } else {
                    tracing::debug!(
                        target: targets::IMAGE,
                        view = ?completion.view,
                        "discarding stale image result"
                    );
                }
                current
            })
            .collect()
    }
}

impl Drop for ImageFetcher {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

impl fmt::Debug for ImageFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFetcher")
            .field("pending", &self.pending.len())
            .finish()
    }
}
