// crates/zonium-core/src/stream.rs

//! # Latest-wins stream
//!
//! A single-slot async pipeline: every [`submit`](LatestWinsStream::submit)
//! starts a new *generation*, maps its input on the Tokio runtime, and hands
//! the outcome to the handler only if that generation is still the current
//! one when the outcome arrives. Outcomes of superseded, aborted or destroyed
//! generations are dropped on arrival, never queued and never delivered late.
//!
//! Cancellation is by identity of the submission, not by time, so it stays
//! correct however much mapper latency varies between submissions.
//!
//! ```no_run
//! use zonium_core::stream::LatestWinsStream;
//!
//! # async fn demo() {
//! let stream = LatestWinsStream::new(
//!     |text: String| async move { Ok::<_, std::convert::Infallible>(text.len()) },
//!     |outcome| println!("latest: {outcome:?}"),
//! );
//! stream.submit("l".to_string());
//! stream.submit("lo".to_string());
//! stream.submit("lon".to_string()); // only this one can reach the handler
//! # }
//! ```

use futures::future::{self, BoxFuture, FutureExt};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::trace;

/// Identity of one submission (or abort) to a [`LatestWinsStream`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// What happens to superseded work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelMode {
    /// Superseded work runs to completion; its outcome is dropped on arrival.
    #[default]
    Discard,
    /// Superseded work is also aborted at its next suspension point.
    Interrupt,
}

type Mapper<In, Out, E> = Box<dyn Fn(In) -> BoxFuture<'static, Result<Out, E>> + Send + Sync>;
type Handler<Out, E> = Box<dyn Fn(Result<Out, E>) + Send + Sync>;

struct Slot {
    generation: Generation,
    active: bool,
    in_flight: Option<AbortHandle>,
}

impl Slot {
    fn is_current(&self, generation: Generation) -> bool {
        self.active && self.generation == generation
    }

    fn advance(&mut self) -> Generation {
        self.generation = Generation(self.generation.0.wrapping_add(1));
        self.generation
    }
}

struct Shared<In, Out, E> {
    slot: Mutex<Slot>,
    mapper: Mapper<In, Out, E>,
    handler: Handler<Out, E>,
}

impl<In, Out, E> Shared<In, Out, E> {
    fn is_current(&self, generation: Generation) -> bool {
        self.slot.lock().is_current(generation)
    }

    /// The check and the handler call happen under the slot lock, so once
    /// `abort`/`destroy` has returned no stale outcome can be delivered.
    fn deliver(&self, generation: Generation, outcome: Result<Out, E>) {
        let mut slot = self.slot.lock();
        if !slot.is_current(generation) {
            trace!(generation = generation.0, current = slot.generation.0, "discarding stale outcome");
            return;
        }
        slot.in_flight = None;
        (self.handler)(outcome);
    }
}

/// Delivers only the outcome of the most recent submission.
///
/// One instance per logical input (a search box, say). Dropping the stream
/// destroys it: work still in flight completes but is never delivered.
///
/// The handler runs on a runtime worker while the stream's internal lock is
/// held; it must not block and must not call back into the same stream.
pub struct LatestWinsStream<In, Out, E> {
    shared: Arc<Shared<In, Out, E>>,
    runtime: Handle,
    cancel_mode: CancelMode,
}

impl<In, Out, E> LatestWinsStream<In, Out, E>
where
    In: Send + 'static,
    Out: Send + 'static,
    E: Send + 'static,
{
    /// Creates a stream that runs its work on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime, like [`tokio::spawn`].
    pub fn new<M, Fut, H>(mapper: M, handler: H) -> Self
    where
        M: Fn(In) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Out, E>> + Send + 'static,
        H: Fn(Result<Out, E>) + Send + Sync + 'static,
    {
        Self::with_runtime(Handle::current(), mapper, handler)
    }

    /// Creates a stream that runs its work on `runtime`.
    pub fn with_runtime<M, Fut, H>(runtime: Handle, mapper: M, handler: H) -> Self
    where
        M: Fn(In) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Out, E>> + Send + 'static,
        H: Fn(Result<Out, E>) + Send + Sync + 'static,
    {
        let shared = Shared {
            slot: Mutex::new(Slot {
                generation: Generation::default(),
                active: true,
                in_flight: None,
            }),
            mapper: Box::new(move |input| mapper(input).boxed()),
            handler: Box::new(handler),
        };
        Self {
            shared: Arc::new(shared),
            runtime,
            cancel_mode: CancelMode::default(),
        }
    }

    pub fn with_cancel_mode(mut self, cancel_mode: CancelMode) -> Self {
        self.cancel_mode = cancel_mode;
        self
    }

    /// Submits a ready input. See [`submit_future`](Self::submit_future).
    pub fn submit(&self, input: In) -> Option<Generation> {
        self.submit_future(future::ready(Ok(input)))
    }

    /// Submits an input that still has to be resolved.
    ///
    /// Starts a new generation and returns it, or returns `None` without doing
    /// anything once the stream is destroyed. The input is awaited, then
    /// mapped if the generation is still current, then the outcome (value or
    /// error from either step) is delivered if the generation is *still*
    /// current. Never panics and never fails synchronously.
    pub fn submit_future<F>(&self, input: F) -> Option<Generation>
    where
        F: Future<Output = Result<In, E>> + Send + 'static,
    {
        let mut slot = self.shared.slot.lock();
        if !slot.active {
            return None;
        }

        let generation = slot.advance();
        self.interrupt(&mut slot);

        let task = self
            .runtime
            .spawn(run_generation(Arc::clone(&self.shared), generation, input));
        slot.in_flight = Some(task.abort_handle());
        Some(generation)
    }
}

impl<In, Out, E> LatestWinsStream<In, Out, E> {
    /// Invalidates the in-flight generation without submitting new work.
    ///
    /// Idempotent; harmless with nothing in flight.
    pub fn abort(&self) {
        let mut slot = self.shared.slot.lock();
        let generation = slot.advance();
        trace!(generation = generation.0, "stream aborted");
        self.interrupt(&mut slot);
    }

    /// Permanently deactivates the stream. Idempotent.
    pub fn destroy(&self) {
        let mut slot = self.shared.slot.lock();
        if slot.active {
            trace!(generation = slot.generation.0, "stream destroyed");
        }
        slot.active = false;
        self.interrupt(&mut slot);
    }

    fn interrupt(&self, slot: &mut Slot) {
        if self.cancel_mode == CancelMode::Interrupt {
            if let Some(task) = slot.in_flight.take() {
                task.abort();
            }
        }
    }

    /// The current generation: the last submission or abort.
    pub fn generation(&self) -> Generation {
        self.shared.slot.lock().generation
    }

    pub fn is_active(&self) -> bool {
        self.shared.slot.lock().active
    }

    pub fn cancel_mode(&self) -> CancelMode {
        self.cancel_mode
    }
}

impl<In, Out, E> Drop for LatestWinsStream<In, Out, E> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<In, Out, E> std::fmt::Debug for LatestWinsStream<In, Out, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.shared.slot.lock();
        f.debug_struct("LatestWinsStream")
            .field("generation", &slot.generation)
            .field("active", &slot.active)
            .field("cancel_mode", &self.cancel_mode)
            .finish_non_exhaustive()
    }
}

async fn run_generation<In, Out, E, F>(shared: Arc<Shared<In, Out, E>>, generation: Generation, input: F)
where
    F: Future<Output = Result<In, E>>,
{
    let outcome = match input.await {
        Ok(input) => {
            if !shared.is_current(generation) {
                trace!(generation = generation.0, "skipping map for stale input");
                return;
            }
            (shared.mapper)(input).await
        }
        Err(e) => Err(e),
    };
    shared.deliver(generation, outcome);
}
