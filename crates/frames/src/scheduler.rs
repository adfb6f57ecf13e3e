use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

/// Idle callbacks get this much time, measured from when they were requested.
pub const IDLE_BUDGET: Duration = Duration::from_millis(50);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IdleHandle(u64);

type FrameCallback = Box<dyn FnOnce(Duration)>;
type IdleCallback = Box<dyn FnOnce(&IdleDeadline)>;

struct IdleEntry {
    handle: IdleHandle,
    requested_at: Duration,
    timeout: Option<Duration>,
    callback: IdleCallback,
}

#[derive(Default)]
struct State {
    next_id: u64,
    frames: Vec<(FrameHandle, FrameCallback)>,
    /// Handles of the batch currently running; cancelling removes them.
    in_flight: HashSet<u64>,
    idle: Vec<IdleEntry>,
}

/// Single-threaded frame and idle queue driven by the host.
///
/// Nothing runs on its own: the host calls [`run_frame`](Self::run_frame)
/// once per display frame and [`run_idle`](Self::run_idle) when it has
/// spare time, passing its clock reading. Callbacks requested while a batch
/// runs wait for the next call. Clones share the same queues.
#[derive(Clone, Default)]
pub struct FrameScheduler {
    state: Rc<RefCell<State>>,
    clock: Rc<Cell<Duration>>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last clock reading seen by the scheduler.
    pub fn now(&self) -> Duration {
        self.clock.get()
    }

    /// Advance the clock without running anything. Readings never go back.
    pub fn set_time(&self, now: Duration) {
        if now > self.clock.get() {
            self.clock.set(now);
        }
    }

    fn next_id(&self) -> u64 {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        state.next_id
    }

    pub fn request_animation_frame<F>(&self, callback: F) -> FrameHandle
    where
        F: FnOnce(Duration) + 'static,
    {
        let handle = FrameHandle(self.next_id());
        self.state
            .borrow_mut()
            .frames
            .push((handle, Box::new(callback)));
        handle
    }

    /// Returns `false` if the callback already ran or was never queued.
    pub fn cancel_animation_frame(&self, handle: FrameHandle) -> bool {
        let mut state = self.state.borrow_mut();
        if state.in_flight.remove(&handle.0) {
            return true;
        }
        let before = state.frames.len();
        state.frames.retain(|(h, _)| *h != handle);
        before != state.frames.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    /// Run every frame callback queued before this call with timestamp
    /// `now`. Returns how many ran.
    pub fn run_frame(&self, now: Duration) -> usize {
        self.set_time(now);
        let batch = {
            let mut state = self.state.borrow_mut();
            let batch = std::mem::take(&mut state.frames);
            state.in_flight = batch.iter().map(|(h, _)| h.0).collect();
            batch
        };
        log::trace!(target: "frames", "frame at {now:?}: {} callback(s)", batch.len());

        let mut ran = 0;
        for (handle, callback) in batch {
            if !self.state.borrow_mut().in_flight.remove(&handle.0) {
                continue;
            }
            callback(now);
            ran += 1;
        }
        ran
    }

    /// Queue an idle callback. With a `timeout`, the deadline reports
    /// `did_timeout` once that much time has passed since the request.
    pub fn request_idle_callback<F>(&self, callback: F, timeout: Option<Duration>) -> IdleHandle
    where
        F: FnOnce(&IdleDeadline) + 'static,
    {
        let handle = IdleHandle(self.next_id());
        let requested_at = self.now();
        self.state.borrow_mut().idle.push(IdleEntry {
            handle,
            requested_at,
            timeout,
            callback: Box::new(callback),
        });
        handle
    }

    pub fn cancel_idle_callback(&self, handle: IdleHandle) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.idle.len();
        state.idle.retain(|e| e.handle != handle);
        before != state.idle.len()
    }

    pub fn pending_idle(&self) -> usize {
        self.state.borrow().idle.len()
    }

    /// Run the idle callbacks queued before this call. Returns how many ran.
    pub fn run_idle(&self, now: Duration) -> usize {
        self.set_time(now);
        let batch = std::mem::take(&mut self.state.borrow_mut().idle);
        log::trace!(target: "frames", "idle at {now:?}: {} callback(s)", batch.len());

        let ran = batch.len();
        for entry in batch {
            let elapsed = now.saturating_sub(entry.requested_at);
            let deadline = IdleDeadline {
                did_timeout: entry.timeout.is_some_and(|t| elapsed >= t),
                ends_at: entry.requested_at + IDLE_BUDGET,
                clock: Rc::clone(&self.clock),
            };
            (entry.callback)(&deadline);
        }
        ran
    }
}

impl std::fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("FrameScheduler")
            .field("now", &self.clock.get())
            .field("frames", &state.frames.len())
            .field("idle", &state.idle.len())
            .finish()
    }
}

/// Passed to idle callbacks.
pub struct IdleDeadline {
    pub did_timeout: bool,
    ends_at: Duration,
    clock: Rc<Cell<Duration>>,
}

impl IdleDeadline {
    /// Budget left at the scheduler's current clock reading; zero once spent.
    pub fn time_remaining(&self) -> Duration {
        self.ends_at.saturating_sub(self.clock.get())
    }
}
