use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::{Builder, Handle, Runtime};
use tracing::{debug, warn};

use crate::catalog::ImageSource;
use crate::error::{AppError, AppResult};

use super::frame::RgbaFrame;

const REMOTE_MAX_BYTES: u64 = 64 * 1024 * 1024;

/// Which consumer a load result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadSlot {
    Hero,
    Lightbox,
    Preload,
}

/// Identifies one load attempt. Controllers compare `attempt` to drop stale results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub slot: LoadSlot,
    pub attempt: u64,
}

#[derive(Debug)]
pub struct LoadResultEvent {
    pub task_id: u64,
    pub ticket: LoadTicket,
    pub work: usize,
    pub result: AppResult<RgbaFrame>,
    pub elapsed: Duration,
}

/// Blocking fetch + decode of one image. Runs on the blocking pool.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, source: &ImageSource) -> AppResult<RgbaFrame>;
}

/// Reads local files directly and remote URLs through a blocking HTTP client.
pub struct DefaultImageFetcher {
    client: reqwest::blocking::Client,
}

impl DefaultImageFetcher {
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| AppError::unsupported(format!("http client unavailable: {err}")))?;
        Ok(Self { client })
    }

    fn fetch_remote(&self, url: &str) -> AppResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|source| AppError::image_load(url, source))?;
        let mut bytes = Vec::new();
        response
            .take(REMOTE_MAX_BYTES)
            .read_to_end(&mut bytes)
            .map_err(|source| AppError::image_load(url, source))?;
        Ok(bytes)
    }
}

impl ImageFetcher for DefaultImageFetcher {
    fn fetch(&self, source: &ImageSource) -> AppResult<RgbaFrame> {
        let locator = source.locator();
        let bytes = match source {
            ImageSource::File(path) => {
                fs::read(path).map_err(|err| AppError::image_load(&locator, err))?
            }
            ImageSource::Remote(url) => self.fetch_remote(url)?,
        };
        RgbaFrame::decode(&locator, &bytes)
    }
}

struct LoadRuntime {
    _owned: Option<Runtime>,
    handle: Handle,
}

impl LoadRuntime {
    fn new(worker_threads: usize) -> Self {
        if let Ok(handle) = Handle::try_current() {
            return Self {
                _owned: None,
                handle,
            };
        }

        let runtime = Builder::new_multi_thread()
            .worker_threads(worker_threads.max(1))
            .enable_all()
            .thread_name("folio-load")
            .build()
            .expect("load runtime should initialize");
        let handle = runtime.handle().clone();
        Self {
            _owned: Some(runtime),
            handle,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct InFlightLoad {
    ticket: LoadTicket,
    work: usize,
    canceled: bool,
}

/// Issues image loads behind a timeout and reports them over a channel.
///
/// There is no cancellation of the underlying read: a timed-out load may still
/// finish on the blocking pool, and its result is simply never delivered.
pub struct LoadWorker {
    result_tx: flume::Sender<LoadResultEvent>,
    result_rx: flume::Receiver<LoadResultEvent>,
    fetcher: Arc<dyn ImageFetcher>,
    runtime: LoadRuntime,
    timeout: Duration,
    in_flight: HashMap<u64, InFlightLoad>,
    next_task_id: u64,
}

impl LoadWorker {
    pub fn new(fetcher: Arc<dyn ImageFetcher>, timeout: Duration, worker_threads: usize) -> Self {
        let (result_tx, result_rx) = flume::unbounded();
        Self {
            result_tx,
            result_rx,
            fetcher,
            runtime: LoadRuntime::new(worker_threads),
            timeout,
            in_flight: HashMap::new(),
            next_task_id: 1,
        }
    }

    pub fn request(&mut self, ticket: LoadTicket, work: usize, source: ImageSource) -> u64 {
        let task_id = self.register(ticket, work);
        let fetcher = Arc::clone(&self.fetcher);
        let result_tx = self.result_tx.clone();
        let timeout = self.timeout;
        let handle = self.runtime.handle.clone();
        debug!(task_id, work, source = %source, ?ticket, "image load requested");

        self.runtime.handle.spawn(async move {
            let started = Instant::now();
            let locator = source.locator();
            let blocking = handle.spawn_blocking(move || fetcher.fetch(&source));
            let result = match tokio::time::timeout(timeout, blocking).await {
                Ok(Ok(result)) => result,
                Ok(Err(join_err)) => Err(AppError::unsupported(format!(
                    "image load task failed: {join_err}"
                ))),
                Err(_) => {
                    let after_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                    warn!(work, %locator, after_ms, "image load timed out");
                    Err(AppError::load_timeout(locator, after_ms))
                }
            };
            let _ = result_tx.send(LoadResultEvent {
                task_id,
                ticket,
                work,
                result,
                elapsed: started.elapsed(),
            });
        });
        task_id
    }

    /// Resolves a load from an already decoded frame through the same result path.
    pub fn resolve_ready(&mut self, ticket: LoadTicket, work: usize, frame: RgbaFrame) -> u64 {
        self.resolve(ticket, work, Ok(frame))
    }

    /// Fails a load that could not be started, e.g. a work without an image source.
    pub fn resolve_failed(&mut self, ticket: LoadTicket, work: usize, err: AppError) -> u64 {
        self.resolve(ticket, work, Err(err))
    }

    fn resolve(&mut self, ticket: LoadTicket, work: usize, result: AppResult<RgbaFrame>) -> u64 {
        let task_id = self.register(ticket, work);
        let _ = self.result_tx.send(LoadResultEvent {
            task_id,
            ticket,
            work,
            result,
            elapsed: Duration::ZERO,
        });
        task_id
    }

    /// Starts a background load into the cache unless one is already running.
    pub fn preload(&mut self, work: usize, source: ImageSource) -> bool {
        if self.is_loading(work) {
            return false;
        }
        self.request(
            LoadTicket {
                slot: LoadSlot::Preload,
                attempt: 0,
            },
            work,
            source,
        );
        true
    }

    pub fn is_loading(&self, work: usize) -> bool {
        self.in_flight
            .values()
            .any(|entry| entry.work == work && !entry.canceled)
    }

    /// Marks every pending load of `slot` as undeliverable.
    pub fn cancel_slot(&mut self, slot: LoadSlot) -> usize {
        let mut canceled = 0;
        for entry in self.in_flight.values_mut() {
            if entry.ticket.slot == slot && !entry.canceled {
                entry.canceled = true;
                canceled += 1;
            }
        }
        canceled
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn accept_result_event(&mut self, event: LoadResultEvent) -> Option<LoadResultEvent> {
        let entry = self.in_flight.remove(&event.task_id)?;
        if entry.canceled {
            return None;
        }
        Some(event)
    }

    pub async fn recv_result(&mut self) -> Option<LoadResultEvent> {
        while let Ok(event) = self.result_rx.recv_async().await {
            if let Some(event) = self.accept_result_event(event) {
                return Some(event);
            }
        }
        None
    }

    pub fn try_recv_result(&mut self) -> Option<LoadResultEvent> {
        while let Ok(event) = self.result_rx.try_recv() {
            if let Some(event) = self.accept_result_event(event) {
                return Some(event);
            }
        }
        None
    }

    fn register(&mut self, ticket: LoadTicket, work: usize) -> u64 {
        let task_id = self.next_task_id;
        self.next_task_id = self.next_task_id.saturating_add(1);
        self.in_flight.insert(
            task_id,
            InFlightLoad {
                ticket,
                work,
                canceled: false,
            },
        );
        task_id
    }
}
