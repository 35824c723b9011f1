//! Console demo: a delay-driven ticker followed by labelled fan-out.
//!
//! Mirrors the two classic scenarios a manual task runtime is built to
//! demonstrate: chained delays printing a counter, and ambient-context
//! propagation across a batch of pool-scheduled tasks.

use segue::{ExecutorBuilder, TaskLabel, Timer, delay, run, when_all};

use std::sync::Arc;
use std::time::Duration;

fn main() {
    let executor = ExecutorBuilder::new()
        .ambient_context(Arc::new(TaskLabel))
        .build();
    let handle = executor.handle();
    let timer = Timer::new();

    // Tick five times, one second apart, each tick chained behind the
    // previous delay.
    for i in 0..5 {
        delay(&timer, &handle, Duration::from_secs(1))
            .wait()
            .expect("delay failed");
        println!("{i}");
    }

    // Each spawned task sees the label that was ambient when it was
    // submitted, no matter which worker runs it.
    let tasks: Vec<_> = (0..10)
        .map(|i| {
            TaskLabel::set(format!("flow-{i}"));
            run(&handle, || {
                println!("{}", TaskLabel::get().unwrap_or_default());
                Ok(())
            })
        })
        .collect();
    TaskLabel::clear();

    when_all(&handle, tasks).wait().expect("when_all failed");
}
