//! Runs submitted jobs one at a time, in submission order

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::mpsc;

type Job = BoxFuture<'static, ()>;

/// Queue that keeps at most one job in flight
///
/// A job submitted while another runs waits for it to finish; nothing is
/// interrupted. A job that panics is logged and skipped; the worker keeps
/// draining the queue. The worker exits once the limiter is dropped and the
/// queue has drained.
pub struct AsyncLimiter {
    jobs: mpsc::UnboundedSender<Job>,
}

impl AsyncLimiter {
    pub fn new(runtime: &tokio::runtime::Handle) -> Self {
        let (jobs, mut rx) = mpsc::unbounded_channel::<Job>();

        runtime.spawn(async move {
            while let Some(job) = rx.recv().await {
                if let Err(payload) = AssertUnwindSafe(job).catch_unwind().await {
                    tracing::warn!(panic = panic_message(&*payload), "async limiter job panicked");
                }
            }
        });

        Self { jobs }
    }

    pub fn schedule(&self, job: Job) {
        if self.jobs.send(job).is_err() {
            tracing::warn!("async limiter worker has stopped; dropping job");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
