use std::path::PathBuf;
use std::sync::{Arc, TryLockError};
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use toonify_core::alignment::domain::padding::Padding;
use toonify_core::pipeline::model_adapter::{
    status, AlignedImage, AlignedVideo, LoadedStyle, ModelAdapter, ToonifiedImage, ToonifiedVideo,
};
use toonify_core::shared::frame::Frame;
use toonify_core::stylization::domain::style_code::{StyleCode, StyleInputCode};

use super::model_cache::{lock, ModelCache};

/// One adapter call, with everything it needs copied out of the session.
#[derive(Debug, Clone)]
pub enum Job {
    LoadModel {
        style: String,
    },
    AlignImage {
        path: Option<PathBuf>,
        padding: Padding,
    },
    AlignFirstFrame {
        path: Option<PathBuf>,
        padding: Padding,
    },
    AlignVideo {
        path: Option<PathBuf>,
        padding: Padding,
    },
    ToonifyImage {
        face: Option<Frame>,
        style_input: Option<StyleInputCode>,
        style_code: Option<StyleCode>,
        degree: f32,
    },
    ToonifyVideo {
        video: Option<PathBuf>,
        style_input: Option<StyleInputCode>,
        style_code: Option<StyleCode>,
        degree: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    LoadModel,
    AlignImage,
    AlignFirstFrame,
    AlignVideo,
    ToonifyImage,
    ToonifyVideo,
}

impl JobKind {
    pub fn label(self) -> &'static str {
        match self {
            JobKind::LoadModel => "Loading model",
            JobKind::AlignImage => "Rescaling image",
            JobKind::AlignFirstFrame => "Rescaling first frame",
            JobKind::AlignVideo => "Rescaling video",
            JobKind::ToonifyImage => "Toonifying image",
            JobKind::ToonifyVideo => "Toonifying video",
        }
    }
}

#[derive(Debug)]
pub enum JobResult {
    ModelLoaded(LoadedStyle),
    ImageAligned(AlignedImage),
    FirstFrameAligned(AlignedImage),
    VideoAligned(AlignedVideo),
    ImageToonified(ToonifiedImage),
    VideoToonified(ToonifiedVideo),
    /// The job never reached the adapter. Carries only a status text.
    Rejected { kind: JobKind, status: String },
}

impl JobResult {
    pub fn status(&self) -> &str {
        match self {
            JobResult::ModelLoaded(r) => &r.status,
            JobResult::ImageAligned(r) | JobResult::FirstFrameAligned(r) => &r.status,
            JobResult::VideoAligned(r) => &r.status,
            JobResult::ImageToonified(r) => &r.status,
            JobResult::VideoToonified(r) => &r.status,
            JobResult::Rejected { status, .. } => status,
        }
    }
}

impl Job {
    pub fn kind(&self) -> JobKind {
        match self {
            Job::LoadModel { .. } => JobKind::LoadModel,
            Job::AlignImage { .. } => JobKind::AlignImage,
            Job::AlignFirstFrame { .. } => JobKind::AlignFirstFrame,
            Job::AlignVideo { .. } => JobKind::AlignVideo,
            Job::ToonifyImage { .. } => JobKind::ToonifyImage,
            Job::ToonifyVideo { .. } => JobKind::ToonifyVideo,
        }
    }

    pub fn label(&self) -> &'static str {
        self.kind().label()
    }

    pub fn run(self, adapter: &mut dyn ModelAdapter) -> JobResult {
        let sides = |p: Padding| (p.top(), p.bottom(), p.left(), p.right());
        match self {
            Job::LoadModel { style } => JobResult::ModelLoaded(adapter.load_model(&style)),
            Job::AlignImage { path, padding } => {
                let (t, b, l, r) = sides(padding);
                JobResult::ImageAligned(adapter.detect_and_align_image(path.as_deref(), t, b, l, r))
            }
            Job::AlignFirstFrame { path, padding } => {
                let (t, b, l, r) = sides(padding);
                JobResult::FirstFrameAligned(
                    adapter.detect_and_align_video(path.as_deref(), t, b, l, r),
                )
            }
            Job::AlignVideo { path, padding } => {
                let (t, b, l, r) = sides(padding);
                JobResult::VideoAligned(
                    adapter.detect_and_align_full_video(path.as_deref(), t, b, l, r),
                )
            }
            Job::ToonifyImage {
                face,
                style_input,
                style_code,
                degree,
            } => JobResult::ImageToonified(adapter.image_toonify(
                face.as_ref(),
                style_input.as_ref(),
                style_code.as_ref(),
                degree,
            )),
            Job::ToonifyVideo {
                video,
                style_input,
                style_code,
                degree,
            } => JobResult::VideoToonified(adapter.video_toonify(
                video.as_deref(),
                style_input.as_ref(),
                style_code.as_ref(),
                degree,
            )),
        }
    }

    /// The result this job produces when it never reaches the adapter.
    pub fn reject(&self, status: &str) -> JobResult {
        JobResult::Rejected {
            kind: self.kind(),
            status: status.to_string(),
        }
    }
}

/// Runs adapter jobs off the UI thread.
///
/// Queued mode feeds one worker through a FIFO channel, so calls run in
/// submission order. Direct mode gives every job its own thread; a job
/// that finds the adapter in use completes at once with the busy status.
pub struct JobDispatcher {
    cache: Arc<ModelCache>,
    queue: Option<Sender<Job>>,
    results_tx: Sender<JobResult>,
    results: Receiver<JobResult>,
    pending: usize,
}

impl JobDispatcher {
    pub fn new(cache: Arc<ModelCache>, queued: bool) -> Self {
        let (results_tx, results) = crossbeam_channel::unbounded();
        let queue = queued.then(|| {
            let (tx, rx) = crossbeam_channel::unbounded::<Job>();
            let cache = Arc::clone(&cache);
            let results_tx = results_tx.clone();
            thread::spawn(move || {
                for job in rx {
                    let result = match cache.wait() {
                        Ok(adapter) => job.run(&mut *lock(&adapter)),
                        Err(e) => job.reject(&status::error(&e)),
                    };
                    if results_tx.send(result).is_err() {
                        break;
                    }
                }
            });
            tx
        });

        Self {
            cache,
            queue,
            results_tx,
            results,
            pending: 0,
        }
    }

    pub fn submit(&mut self, job: Job) {
        log::info!("{}", job.label());
        self.pending += 1;
        match &self.queue {
            Some(tx) => {
                if let Err(e) = tx.send(job) {
                    let job = e.into_inner();
                    let _ = self.results_tx.send(job.reject(&status::error(&"job queue closed")));
                }
            }
            None => {
                let cache = Arc::clone(&self.cache);
                let results_tx = self.results_tx.clone();
                thread::spawn(move || {
                    let result = match cache.wait() {
                        Ok(adapter) => match adapter.try_lock() {
                            Ok(mut guard) => job.run(&mut *guard),
                            Err(TryLockError::WouldBlock) => job.reject(status::BUSY),
                            Err(TryLockError::Poisoned(p)) => job.run(&mut *p.into_inner()),
                        },
                        Err(e) => job.reject(&status::error(&e)),
                    };
                    let _ = results_tx.send(result);
                });
            }
        }
    }

    /// Results finished since the last call, in completion order.
    pub fn drain(&mut self) -> Vec<JobResult> {
        let results: Vec<JobResult> = self.results.try_iter().collect();
        self.pending = self.pending.saturating_sub(results.len());
        results
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn is_queued(&self) -> bool {
        self.queue.is_some()
    }
}
