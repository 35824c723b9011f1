use crate::executor::ExecutorHandle;
use crate::task::Task;
use crate::time::Timer;

use std::time::Duration;

/// Creates a task that succeeds once `duration` has elapsed.
///
/// The task is completed by a one-shot callback fired by `timer`; it
/// never completes before the duration has elapsed.
///
/// # Examples
///
/// ```rust,ignore
/// use std::time::Duration;
///
/// delay(&timer, &handle, Duration::from_millis(100)).wait()?;
/// ```
pub fn delay(timer: &Timer, executor: &ExecutorHandle, duration: Duration) -> Task {
    let task = Task::new(executor);
    let settle = task.clone();

    timer.schedule_once(duration, move || {
        let _ = settle.signal_success();
    });

    task
}
