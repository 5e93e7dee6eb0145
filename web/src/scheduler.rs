use gloo::timers::callback::Timeout;
use memento_core::{PendingResolution, Scheduler};
use yew::Callback;

/// Fires pending resolutions from a browser timer; dropping the handle cancels it.
#[derive(Debug)]
pub(crate) struct TimeoutScheduler {
    on_due: Callback<PendingResolution>,
    timeout: Option<Timeout>,
}

impl TimeoutScheduler {
    pub(crate) fn new(on_due: Callback<PendingResolution>) -> Self {
        Self {
            on_due,
            timeout: None,
        }
    }
}

impl Scheduler for TimeoutScheduler {
    fn schedule(&mut self, task: PendingResolution) {
        let on_due = self.on_due.clone();
        log::trace!("resolution due in {}ms", task.delay_ms());
        self.timeout = Some(Timeout::new(task.delay_ms(), move || on_due.emit(task)));
    }

    fn cancel(&mut self) {
        if self.timeout.take().is_some() {
            log::debug!("pending resolution cancelled");
        }
    }
}
