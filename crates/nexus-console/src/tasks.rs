//! Runs SDK futures off the UI thread and hands their outcome back to the
//! next frame through a shared slot.

use std::future::Future;
use std::sync::{Arc, Mutex};

use eframe::egui;

/// Outcome of one background call, taken by the UI once per frame.
pub type Slot<T> = Arc<Mutex<Option<T>>>;

pub fn slot<T>() -> Slot<T> {
    Arc::new(Mutex::new(None))
}

pub fn take<T>(slot: &Slot<T>) -> Option<T> {
    slot.lock().unwrap_or_else(|e| e.into_inner()).take()
}

fn put<T>(slot: &Slot<T>, value: T) {
    *slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(value);
}

pub struct Spawner {
    #[cfg(not(target_arch = "wasm32"))]
    runtime: tokio::runtime::Runtime,
}

impl Spawner {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> eyre::Result<Self> {
        use eyre::WrapErr;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("nexus-io")
            .enable_all()
            .build()
            .wrap_err("failed to start async runtime")?;
        Ok(Self { runtime })
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new() -> eyre::Result<Self> {
        Ok(Self {})
    }

    /// Drives `task` on a worker thread; the runtime only supplies IO and
    /// timers, so the future itself need not be `Send`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn spawn<T, F, Fut>(&self, ctx: &egui::Context, slot: &Slot<T>, task: F)
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T>,
    {
        let handle = self.runtime.handle().clone();
        let slot = Arc::clone(slot);
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let outcome = handle.block_on(task());
            put(&slot, outcome);
            ctx.request_repaint();
        });
    }

    #[cfg(target_arch = "wasm32")]
    pub fn spawn<T, F, Fut>(&self, ctx: &egui::Context, slot: &Slot<T>, task: F)
    where
        T: 'static,
        F: FnOnce() -> Fut + 'static,
        Fut: Future<Output = T> + 'static,
    {
        let slot = Arc::clone(slot);
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = task().await;
            put(&slot, outcome);
            ctx.request_repaint();
        });
    }
}
