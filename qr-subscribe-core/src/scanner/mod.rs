//! QR analyzer thread
//!
//! Frames are decoded on a dedicated `qr-analyzer` thread. Only the newest
//! frame is kept: a frame submitted while the analyzer is busy replaces the
//! pending one instead of queueing.

mod rqrr_scanner;

pub use rqrr_scanner::RqrrScanner;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

use crate::error::{CoreError, CoreResult};
use crate::traits::QrScanner;
use crate::types::LumaFrame;

/// Slot shared between the submitting side and the analyzer thread
#[derive(Default)]
struct FrameSlot {
    pending: Mutex<Option<LumaFrame>>,
    ready: Condvar,
    stop: AtomicBool,
}

impl FrameSlot {
    /// Block until a frame is pending or shutdown was requested.
    fn take(&self) -> Option<LumaFrame> {
        let Ok(mut pending) = self.pending.lock() else {
            return None;
        };
        loop {
            if self.stop.load(Ordering::SeqCst) {
                return None;
            }
            if let Some(frame) = pending.take() {
                return Some(frame);
            }
            pending = match self.ready.wait(pending) {
                Ok(guard) => guard,
                Err(_) => return None,
            };
        }
    }
}

/// Handle to the running analyzer thread
///
/// Dropping the worker stops and joins the thread.
pub struct ScanWorker {
    slot: Arc<FrameSlot>,
    thread: Option<JoinHandle<()>>,
}

impl ScanWorker {
    /// Start the analyzer.
    ///
    /// `on_decoded` receives each payload that differs from the previous one;
    /// returning `false` stops the analyzer.
    pub fn spawn<F>(mut scanner: Box<dyn QrScanner>, on_decoded: F) -> CoreResult<Self>
    where
        F: Fn(String) -> bool + Send + 'static,
    {
        let slot = Arc::new(FrameSlot::default());
        let thread_slot = Arc::clone(&slot);

        let thread = std::thread::Builder::new()
            .name("qr-analyzer".to_string())
            .spawn(move || {
                let mut last: Option<String> = None;
                while let Some(frame) = thread_slot.take() {
                    let Some(payload) = scanner.decode(&frame) else {
                        continue;
                    };
                    if last.as_deref() == Some(payload.as_str()) {
                        continue;
                    }
                    log::debug!("QR code decoded ({} bytes)", payload.len());
                    last = Some(payload.clone());
                    if !on_decoded(payload) {
                        break;
                    }
                }
                log::debug!("QR analyzer stopped");
            })
            .map_err(|e| CoreError::ScannerError(format!("Spawn analyzer thread: {e}")))?;

        Ok(Self {
            slot,
            thread: Some(thread),
        })
    }

    /// Hand a frame to the analyzer, replacing any frame not yet analyzed.
    pub fn submit(&self, frame: LumaFrame) {
        if let Ok(mut pending) = self.slot.pending.lock() {
            *pending = Some(frame);
            self.slot.ready.notify_one();
        }
    }

    /// Stop the analyzer and wait for the thread to exit.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        self.slot.stop.store(true, Ordering::SeqCst);
        // 持锁通知，避免唤醒丢失
        if let Ok(_pending) = self.slot.pending.lock() {
            self.slot.ready.notify_all();
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("QR analyzer thread panicked");
            }
        }
    }
}

impl Drop for ScanWorker {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}
