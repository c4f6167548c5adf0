//! Autoplay timers: the advance loop and the progress ticker.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;

use super::{Nav, SliderInner};

/// Cancel handle for a spawned timer task.
///
/// Aborts the task on drop so no timer callback can outlive its owner;
/// stopping autoplay is always a deterministic cancellation.
#[derive(Debug)]
pub struct TaskHandle {
    handle: JoinHandle<()>,
}

impl TaskHandle {
    /// Spawn `future` on the runtime and wrap its handle.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }

    /// Cancel the task.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Debug, Default)]
pub(super) struct AutoplayTasks {
    pub(super) advance: Option<TaskHandle>,
    pub(super) progress: Option<TaskHandle>,
}

impl SliderInner {
    /// Stop any running autoplay, then start a fresh countdown and
    /// progress ticker. Manual navigation calls this so the next automatic
    /// advance is pushed back by the full interval.
    pub(super) async fn start_autoplay(self: Arc<Self>) {
        self.stop_autoplay().await;

        {
            let mut state = self.state.lock().await;
            state.autoplay_on = true;
            state.progress = 0.0;
        }
        if let Some(bar) = self.progress_bar {
            self.doc.write().await.set_style(bar, "width", "0%");
        }

        let advance = {
            let inner = Arc::clone(&self);
            TaskHandle::spawn(async move {
                loop {
                    tokio::time::sleep(inner.settings.autoplay_interval()).await;
                    // Automatic advances do not reset the countdown; the
                    // loop itself provides the next full interval.
                    inner.navigate(Nav::Next).await;
                }
            })
        };

        let progress = {
            let inner = Arc::clone(&self);
            TaskHandle::spawn(async move {
                loop {
                    tokio::time::sleep(inner.settings.progress_tick()).await;
                    if !inner.tick_progress().await {
                        break;
                    }
                }
            })
        };

        let mut tasks = self.tasks.lock().await;
        tasks.advance = Some(advance);
        tasks.progress = Some(progress);
    }

    /// Cancel the autoplay countdown and mark autoplay stopped. The
    /// progress ticker observes the flag and cancels itself as well.
    pub(super) async fn stop_autoplay(&self) {
        {
            let mut state = self.state.lock().await;
            state.autoplay_on = false;
        }
        let mut tasks = self.tasks.lock().await;
        if let Some(task) = tasks.advance.take() {
            task.cancel();
        }
        if let Some(task) = tasks.progress.take() {
            task.cancel();
        }
    }

    /// Advance the progress bar by one step. Returns false once autoplay
    /// has stopped, telling the ticker to cancel itself.
    async fn tick_progress(&self) -> bool {
        let percent = {
            let mut state = self.state.lock().await;
            if !state.autoplay_on {
                return false;
            }
            state.progress += self.settings.progress_step;
            if state.progress > 100.0 {
                state.progress = 0.0;
            }
            state.progress
        };
        if let Some(bar) = self.progress_bar {
            self.doc
                .write()
                .await
                .set_style(bar, "width", &format!("{}%", percent));
        }
        true
    }
}
