//! Worker thread ownership for the interactive form.
//!
//! A [`ClickSession`] is the running click loop: its thread handle plus the
//! token that stops it. The form controller holds at most one.

use crate::clicker::{run_click_loop, CancelToken, ClickSummary};
use crate::config::ClickConfig;
use crate::error::{ClickerError, Result};
use crate::input::MouseInjector;
use std::thread::{self, JoinHandle};
use tracing::debug;

pub struct ClickSession {
    handle: JoinHandle<Result<ClickSummary>>,
    cancel: CancelToken,
}

impl ClickSession {
    /// Validate `config` and start the click loop on a new worker thread.
    pub fn spawn<I>(config: ClickConfig, mut injector: I, cancel: CancelToken) -> Result<Self>
    where
        I: MouseInjector + Send + 'static,
    {
        config.validate()?;

        let worker_cancel = cancel.clone();
        let handle = thread::Builder::new()
            .name("click-worker".to_string())
            .spawn(move || run_click_loop(&config, &mut injector, Some(&worker_cancel)))?;

        debug!("click worker spawned");
        Ok(Self { handle, cancel })
    }

    /// Ask the worker to stop. Returns immediately.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker and return what the loop reported.
    pub fn join(self) -> Result<ClickSummary> {
        self.handle
            .join()
            .map_err(|_| ClickerError::WorkerPanicked)?
    }
}
