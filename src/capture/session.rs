use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::capture::source::FrameSource;
use crate::foundation::core::SourceImage;
use crate::foundation::error::{GlyphError, GlyphResult};

pub const DEFAULT_CAPTURE_INTERVAL: Duration = Duration::from_millis(200);

// Upper bound on how long a stop request waits for the sleeping capture thread.
const STOP_POLL: Duration = Duration::from_millis(5);

/// What the capture thread reports.
#[derive(Debug)]
pub enum CaptureEvent {
    /// A grabbed frame; `seq` counts grabs from 1, so gaps mean frames were replaced.
    Frame { seq: u64, image: SourceImage },
    /// Grabbing failed; capture has ended.
    Failed(GlyphError),
    /// The source ran out of frames.
    Ended,
}

/// Newest undelivered frame plus the terminal event, if the thread has finished.
///
/// A fresh frame replaces an undelivered one, so at most one frame is ever pending.
#[derive(Debug, Default)]
struct Pending {
    frame: Option<(u64, SourceImage)>,
    end: Option<CaptureEvent>,
    replaced: u64,
}

impl Pending {
    fn take(&mut self) -> Option<CaptureEvent> {
        if let Some((seq, image)) = self.frame.take() {
            return Some(CaptureEvent::Frame { seq, image });
        }
        self.end.take()
    }
}

#[derive(Debug, Default)]
struct Mailbox {
    pending: Mutex<Pending>,
    ready: Condvar,
}

impl Mailbox {
    fn lock(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn post_frame(&self, seq: u64, image: SourceImage) {
        let mut pending = self.lock();
        if let Some((stale, _)) = pending.frame.replace((seq, image)) {
            pending.replaced += 1;
            tracing::trace!(stale, seq, "replaced undelivered capture frame");
        }
        drop(pending);
        self.ready.notify_one();
    }

    fn post_end(&self, event: CaptureEvent) {
        self.lock().end = Some(event);
        self.ready.notify_one();
    }
}

/// A running periodic capture.
///
/// Frames are grabbed on a background thread every `interval`. Only the newest undelivered
/// frame is kept for the owner; older ones are dropped as soon as a newer one arrives.
/// Stopping (explicitly or on drop) joins the thread and discards whatever is still pending.
pub struct CaptureSession {
    stop: Arc<AtomicBool>,
    mailbox: Arc<Mailbox>,
    handle: Option<JoinHandle<()>>,
    interval: Duration,
    source: String,
}

impl CaptureSession {
    pub fn start<S: FrameSource>(mut source: S, interval: Duration) -> GlyphResult<Self> {
        if interval.is_zero() {
            return Err(GlyphError::validation("capture interval must be > 0"));
        }
        let name = source.describe();
        source.open().map_err(|e| match e {
            GlyphError::CaptureUnavailable(_) => e,
            other => GlyphError::capture(format!("{name}: {other}")),
        })?;

        let stop = Arc::new(AtomicBool::new(false));
        let mailbox = Arc::new(Mailbox::default());
        let thread_stop = Arc::clone(&stop);
        let thread_mailbox = Arc::clone(&mailbox);
        let handle = thread::Builder::new()
            .name("glyphcast-capture".to_string())
            .spawn(move || run_capture_loop(source, interval, thread_stop, thread_mailbox))
            .map_err(|e| GlyphError::capture(format!("spawn capture thread: {e}")))?;

        tracing::info!(source = %name, interval_ms = interval.as_millis() as u64, "capture started");
        Ok(Self {
            stop,
            mailbox,
            handle: Some(handle),
            interval,
            source: name,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Frames dropped so far because a newer one arrived before they were taken.
    pub fn replaced_frames(&self) -> u64 {
        self.mailbox.lock().replaced
    }

    /// Whether a frame is waiting to be taken.
    pub fn has_pending_frame(&self) -> bool {
        self.mailbox.lock().frame.is_some()
    }

    /// Next pending event without blocking. A pending frame comes before the end event.
    pub fn try_next(&self) -> Option<CaptureEvent> {
        self.mailbox.lock().take()
    }

    /// Wait up to `timeout` for the next event.
    pub fn next_timeout(&self, timeout: Duration) -> Option<CaptureEvent> {
        let deadline = Instant::now() + timeout;
        let mut pending = self.mailbox.lock();
        loop {
            if let Some(event) = pending.take() {
                return Some(event);
            }
            let now = Instant::now();
            if now >= deadline || self.handle.is_none() {
                return None;
            }
            pending = self
                .mailbox
                .ready
                .wait_timeout(pending, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Signal the thread, wait for it, and drop pending events. Returns how many were discarded.
    pub fn stop(&mut self) -> usize {
        self.stop.store(true, Ordering::Relaxed);
        let Some(handle) = self.handle.take() else {
            return 0;
        };
        if handle.join().is_err() {
            tracing::error!(source = %self.source, "capture thread panicked");
        }
        let mut pending = self.mailbox.lock();
        let discarded = usize::from(pending.frame.take().is_some())
            + usize::from(pending.end.take().is_some());
        drop(pending);
        tracing::info!(source = %self.source, discarded, "capture stopped");
        discarded
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_capture_loop<S: FrameSource>(
    mut source: S,
    interval: Duration,
    stop: Arc<AtomicBool>,
    mailbox: Arc<Mailbox>,
) {
    let mut seq = 0u64;
    while !stop.load(Ordering::Relaxed) {
        let tick = Instant::now();
        match source.grab() {
            Ok(Some(image)) => {
                seq += 1;
                mailbox.post_frame(seq, image);
            }
            Ok(None) => {
                mailbox.post_end(CaptureEvent::Ended);
                return;
            }
            Err(e) => {
                mailbox.post_end(CaptureEvent::Failed(e));
                return;
            }
        }

        while !stop.load(Ordering::Relaxed) {
            let elapsed = tick.elapsed();
            if elapsed >= interval {
                break;
            }
            thread::sleep((interval - elapsed).min(STOP_POLL));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/session.rs"]
mod tests;
