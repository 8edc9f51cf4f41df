use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;
use ratatui_image::{FilterType, Resize, ResizeEncodeRender};
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;

use crate::gallery::RgbaFrame;

use super::image_ops::{derive_variant, to_protocol};
use super::protocol_cache::ProtocolKey;

/// Resize mode shared by encoding and drawing so both agree on the target size.
pub(crate) fn fit_mode() -> Resize {
    Resize::Fit(Some(FilterType::Nearest))
}

pub(crate) struct EncodeJob {
    pub(crate) key: ProtocolKey,
    pub(crate) picker: Picker,
    /// Uncropped, undimmed source; the worker derives the variant named by `key`.
    pub(crate) source: RgbaFrame,
    pub(crate) area: Rect,
    pub(crate) generation: u64,
}

enum Request {
    Encode(EncodeJob),
    Shutdown,
}

pub(crate) enum EncodeOutcome {
    Finished {
        key: ProtocolKey,
        protocol: Option<Box<StatefulProtocol>>,
        elapsed: Duration,
    },
    /// Dropped from the queue before it ran; the source comes back for a retry.
    Superseded { key: ProtocolKey, source: RgbaFrame },
}

/// Single blocking thread that turns frames into terminal protocols, newest
/// generation first.
pub(crate) struct EncodeWorker {
    requests: Option<UnboundedSender<Request>>,
    outcomes: UnboundedReceiver<EncodeOutcome>,
    task: Option<JoinHandle<()>>,
    _runtime: Option<Runtime>,
}

impl EncodeWorker {
    pub(crate) fn spawn() -> Self {
        let (runtime, handle) = match Handle::try_current() {
            Ok(handle) => (None, handle),
            Err(_) => {
                let runtime = Builder::new_multi_thread()
                    .worker_threads(1)
                    .enable_all()
                    .thread_name("folio-encode")
                    .build()
                    .expect("encode runtime should initialize");
                let handle = runtime.handle().clone();
                (Some(runtime), handle)
            }
        };
        let (request_tx, request_rx) = unbounded_channel();
        let (outcome_tx, outcome_rx) = unbounded_channel();
        let task = handle.spawn_blocking(move || run_worker(request_rx, outcome_tx));
        Self {
            requests: Some(request_tx),
            outcomes: outcome_rx,
            task: Some(task),
            _runtime: runtime,
        }
    }

    /// Hands `job` to the worker. False when the worker is gone.
    pub(crate) fn submit(&self, job: EncodeJob) -> bool {
        self.requests
            .as_ref()
            .is_some_and(|requests| requests.send(Request::Encode(job)).is_ok())
    }

    pub(crate) fn try_next(&mut self) -> Option<EncodeOutcome> {
        self.outcomes.try_recv().ok()
    }

    pub(crate) fn shutdown(&mut self) {
        if let Some(requests) = self.requests.take() {
            let _ = requests.send(Request::Shutdown);
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Jobs waiting for the worker. A newer generation supersedes every older
/// job, and a repeated key supersedes its earlier request.
#[derive(Default)]
pub(crate) struct JobQueue {
    jobs: VecDeque<EncodeJob>,
}

impl JobQueue {
    pub(crate) fn push(&mut self, job: EncodeJob) -> Vec<EncodeJob> {
        let (superseded, kept): (Vec<_>, Vec<_>) = self
            .jobs
            .drain(..)
            .partition(|queued| queued.generation < job.generation || queued.key == job.key);
        self.jobs.extend(kept);
        self.jobs.push_back(job);
        superseded
    }

    pub(crate) fn pop(&mut self) -> Option<EncodeJob> {
        self.jobs.pop_front()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.jobs.len()
    }
}

/// Queues an encode request, reporting superseded jobs. False on shutdown.
fn accept(request: Request, queue: &mut JobQueue, outcomes: &UnboundedSender<EncodeOutcome>) -> bool {
    let Request::Encode(job) = request else {
        return false;
    };
    for stale in queue.push(job) {
        let _ = outcomes.send(EncodeOutcome::Superseded {
            key: stale.key,
            source: stale.source,
        });
    }
    true
}

pub(crate) fn encode(job: EncodeJob) -> Option<StatefulProtocol> {
    let variant = derive_variant(&job.source, job.key.frame, job.area, job.picker.font_size()).ok()?;
    let mut protocol = to_protocol(&job.picker, variant).ok()?;
    protocol.resize_encode(&fit_mode(), job.area);
    match protocol.last_encoding_result() {
        Some(Err(_)) => None,
        _ => Some(protocol),
    }
}

fn run_worker(mut requests: UnboundedReceiver<Request>, outcomes: UnboundedSender<EncodeOutcome>) {
    let mut queue = JobQueue::default();
    loop {
        // Block only when idle, then take everything already sent so stale
        // jobs are superseded before the next encode starts.
        let first = if queue.is_empty() {
            match requests.blocking_recv() {
                Some(request) => Some(request),
                None => return,
            }
        } else {
            None
        };
        let arrived = first
            .into_iter()
            .chain(std::iter::from_fn(|| requests.try_recv().ok()));
        for request in arrived {
            if !accept(request, &mut queue, &outcomes) {
                return;
            }
        }

        let Some(job) = queue.pop() else {
            continue;
        };
        let started = Instant::now();
        let key = job.key;
        let protocol = encode(job).map(Box::new);
        let _ = outcomes.send(EncodeOutcome::Finished {
            key,
            protocol,
            elapsed: started.elapsed(),
        });
    }
}
