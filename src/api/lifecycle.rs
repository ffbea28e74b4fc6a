//! Keeps at most one breakdown request in flight.

use std::sync::Arc;

use tokio::{
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
    task::JoinHandle,
};

use crate::{
    api::breakdown::{Breakdown, BreakdownService, CalculateRequest},
    core::error::Error,
    prelude::*,
};

/// Finished request, to be passed back into [`Requests::resolve`].
#[must_use]
pub struct Completion {
    generation: u64,
    result: Result<Breakdown, Error>,
}

#[must_use]
#[derive(Debug)]
pub enum Outcome {
    Fresh(Breakdown),
    Failed(Error),

    /// The request has been superseded or cancelled, the result must be dropped.
    Stale,
}

pub struct Requests<S> {
    service: Arc<S>,
    sender: UnboundedSender<Completion>,

    /// Generation of the latest submitted request.
    generation: u64,

    /// Generation of the request which is still awaited, if any.
    pending: Option<u64>,

    task: Option<JoinHandle<()>>,
}

impl<S: BreakdownService + 'static> Requests<S> {
    pub fn new(service: S) -> (Self, UnboundedReceiver<Completion>) {
        let (sender, receiver) = unbounded_channel();
        let this =
            Self { service: Arc::new(service), sender, generation: 0, pending: None, task: None };
        (this, receiver)
    }

    /// Submit the request, cancelling the outstanding one.
    ///
    /// Must be called within a Tokio runtime.
    #[instrument(skip_all, fields(generation = self.generation + 1))]
    pub fn submit(&mut self, request: CalculateRequest) -> u64 {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        let service = Arc::clone(&self.service);
        let sender = self.sender.clone();
        self.task = Some(tokio::spawn(async move {
            let result = service.calculate(&request).await;
            // The receiver is only gone on shutdown, nobody is interested in the result then.
            let _ = sender.send(Completion { generation, result });
        }));
        self.pending = Some(generation);
        debug!("submitted");
        generation
    }

    /// Abort the outstanding request, returns whether there was one.
    pub fn cancel(&mut self) -> bool {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        let was_pending = self.pending.take();
        if let Some(generation) = was_pending {
            info!(generation, "cancelled the outstanding request");
        }
        was_pending.is_some()
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Classify the completion, only the latest pending request is fresh.
    pub fn resolve(&mut self, completion: Completion) -> Outcome {
        if self.pending != Some(completion.generation) {
            debug!(
                generation = completion.generation,
                latest = self.generation,
                "dropping the stale response",
            );
            return Outcome::Stale;
        }
        self.pending = None;
        self.task = None;
        match completion.result {
            Ok(breakdown) => Outcome::Fresh(breakdown),
            Err(error) => Outcome::Failed(error),
        }
    }
}
