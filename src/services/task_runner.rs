// src/services/task_runner.rs
//
// Task Runner - single-worker sequential job execution
//
// CRITICAL RULES:
// - Exactly one job runs at a time, on a dedicated worker thread
// - Later submissions queue behind the running job, never run beside it
// - A job never crashes the worker: errors and panics end as JobStatus::Failed
// - Cancellation is cooperative; a cancelled job reports Cancelled, not Failed
// - Failures are surfaced through the dialog collaborator

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::{JobStatus, Library};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, JobFinished};
use crate::integrations::DialogService;
use crate::services::game_info_resolver::ScanOptions;
use crate::services::library_scanner::LibraryScanner;
use crate::services::progress::ProgressReporter;

// ============================================================================
// JOBS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Job {
    RefreshLibraries,
    RefreshLibrary(Uuid),
    ProcessPath { library: Library, path: PathBuf },
    CleanupGames,
}

impl Job {
    pub fn name(&self) -> String {
        match self {
            Job::RefreshLibraries => "refresh_libraries".to_string(),
            Job::RefreshLibrary(id) => format!("refresh_library:{}", id),
            Job::ProcessPath { path, .. } => format!("process_path:{}", path.display()),
            Job::CleanupGames => "cleanup_games".to_string(),
        }
    }

    fn run(
        &self,
        scanner: &LibraryScanner,
        options: &ScanOptions,
        cancel: &CancellationToken,
    ) -> AppResult<()> {
        match self {
            Job::RefreshLibraries => scanner.refresh_libraries(options, cancel).map(|_| ()),
            Job::RefreshLibrary(id) => scanner.refresh_library(*id, options, cancel).map(|_| ()),
            Job::ProcessPath { library, path } => scanner
                .process_path(library, path, options, cancel)
                .map(|_| ()),
            Job::CleanupGames => scanner.cleanup_games(cancel).map(|_| ()),
        }
    }
}

struct Submission {
    job: Job,
    options: ScanOptions,
    cancel: CancellationToken,
    done: oneshot::Sender<JobStatus>,
}

/// Caller's side of a submitted job
pub struct JobHandle {
    cancel: CancellationToken,
    status: oneshot::Receiver<JobStatus>,
}

impl JobHandle {
    /// Request cooperative cancellation, whether the job is running or still queued
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub async fn wait(self) -> JobStatus {
        self.status.await.unwrap_or_else(|_| worker_gone())
    }

    /// Must not be called from inside an async runtime
    pub fn blocking_wait(self) -> JobStatus {
        self.status.blocking_recv().unwrap_or_else(|_| worker_gone())
    }
}

fn worker_gone() -> JobStatus {
    JobStatus::Failed("Task runner stopped before the job finished".to_string())
}

// ============================================================================
// RUNNER
// ============================================================================

pub struct TaskRunner {
    sender: Option<mpsc::UnboundedSender<Submission>>,
    current: Arc<Mutex<Option<CancellationToken>>>,
    progress: Arc<ProgressReporter>,
    worker: Option<thread::JoinHandle<()>>,
}

impl TaskRunner {
    /// Spawn the worker thread; it owns the scanner for its whole life
    pub fn start(
        scanner: LibraryScanner,
        dialog: Arc<dyn DialogService>,
        event_bus: Arc<EventBus>,
    ) -> AppResult<Self> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let current = Arc::new(Mutex::new(None));
        let progress = Arc::clone(scanner.progress());

        let worker = Worker {
            scanner,
            dialog,
            event_bus,
            current: Arc::clone(&current),
        };

        let handle = thread::Builder::new()
            .name("gamedex-worker".to_string())
            .spawn(move || worker.run(receiver))
            .map_err(|e| AppError::Other(format!("Failed to spawn worker thread: {}", e)))?;

        Ok(Self {
            sender: Some(sender),
            current,
            progress,
            worker: Some(handle),
        })
    }

    /// Queue a job. Returns immediately.
    pub fn submit(&self, job: Job, options: ScanOptions) -> AppResult<JobHandle> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| AppError::Other("Task runner is shut down".to_string()))?;

        let cancel = CancellationToken::new();
        let (done, status) = oneshot::channel();

        log::debug!("Queued job {}", job.name());
        sender
            .send(Submission {
                job,
                options,
                cancel: cancel.clone(),
                done,
            })
            .map_err(|_| AppError::Other("Task runner is shut down".to_string()))?;

        Ok(JobHandle { cancel, status })
    }

    /// Cancel the running job, if any. Queued jobs are left alone.
    pub fn cancel_current(&self) -> AppResult<bool> {
        let current = self
            .current
            .lock()
            .map_err(|_| AppError::Other("Task runner state poisoned".to_string()))?;

        match current.as_ref() {
            Some(token) => {
                token.cancel();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn is_busy(&self) -> AppResult<bool> {
        self.current
            .lock()
            .map(|current| current.is_some())
            .map_err(|_| AppError::Other("Task runner state poisoned".to_string()))
    }

    /// Message, progress and fetch-progress signals of the running job
    pub fn progress(&self) -> &Arc<ProgressReporter> {
        &self.progress
    }

    /// Stop accepting jobs, cancel the running one and join the worker.
    /// Queued jobs still drain, each observing its own token.
    pub fn shutdown(&mut self) {
        self.sender.take();
        if let Err(e) = self.cancel_current() {
            log::warn!("Could not cancel the running job on shutdown: {}", e);
        }

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Task runner worker panicked during shutdown");
            }
        }
    }
}

impl Drop for TaskRunner {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ============================================================================
// WORKER
// ============================================================================

struct Worker {
    scanner: LibraryScanner,
    dialog: Arc<dyn DialogService>,
    event_bus: Arc<EventBus>,
    current: Arc<Mutex<Option<CancellationToken>>>,
}

impl Worker {
    fn run(self, mut receiver: mpsc::UnboundedReceiver<Submission>) {
        while let Some(submission) = receiver.blocking_recv() {
            let name = submission.job.name();
            let status = self.execute(&submission);

            log::info!("Job {} finished: {}", name, status);
            self.event_bus.emit(JobFinished::new(name, status.clone()));

            // The caller may have dropped its handle
            let _ = submission.done.send(status);
        }
        log::debug!("Task runner worker stopped");
    }

    fn execute(&self, submission: &Submission) -> JobStatus {
        let progress = self.scanner.progress();

        *self.lock_current() = Some(submission.cancel.clone());

        let result = if submission.cancel.is_cancelled() {
            Err(AppError::Cancelled)
        } else {
            log::info!("Starting job {}", submission.job.name());
            catch_unwind(AssertUnwindSafe(|| {
                submission
                    .job
                    .run(&self.scanner, &submission.options, &submission.cancel)
            }))
            .unwrap_or_else(|panic| Err(AppError::Other(panic_message(panic))))
        };

        *self.lock_current() = None;

        match result {
            Ok(()) => JobStatus::Completed,
            Err(AppError::Cancelled) => {
                progress.reset();
                progress.message("Cancelled.");
                JobStatus::Cancelled
            }
            Err(e) => {
                log::error!("Job {} failed: {}", submission.job.name(), e);
                progress.reset();
                self.dialog.show_error("Unexpected error", &e);
                JobStatus::Failed(e.to_string())
            }
        }
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        // The worker cannot report a poisoned lock to anyone; keep going
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("Job panicked: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("Job panicked: {}", message)
    } else {
        "Job panicked".to_string()
    }
}
