use crate::{FrameHandle, FrameScheduler};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// Wrap `f` so that each call defers it, with its argument, to the next
/// frame.
pub fn raf_closure<A, F>(scheduler: &FrameScheduler, f: F) -> impl Fn(A) -> FrameHandle
where
    A: 'static,
    F: Fn(A) + 'static,
{
    let scheduler = scheduler.clone();
    let f = Rc::new(f);
    move |arg| {
        let f = Rc::clone(&f);
        scheduler.request_animation_frame(move |_| f(arg))
    }
}

struct TimeoutState {
    start: Duration,
    delay: Duration,
    frame: Cell<Option<FrameHandle>>,
    cancelled: Cell<bool>,
    callback: RefCell<Option<Box<dyn FnOnce()>>>,
}

/// Handle to a pending [`request_animation_timeout`].
pub struct AnimationTimeout {
    scheduler: FrameScheduler,
    state: Rc<TimeoutState>,
}

impl AnimationTimeout {
    /// Stop the timeout. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&self) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.state.cancelled.set(true);
        self.state.callback.borrow_mut().take();
        if let Some(frame) = self.state.frame.take() {
            self.scheduler.cancel_animation_frame(frame);
        }
        true
    }

    pub fn is_pending(&self) -> bool {
        !self.state.cancelled.get() && self.state.callback.borrow().is_some()
    }
}

/// Run `f` on the first frame at least `delay` after now. The wait is
/// checked once per frame, so `f` always runs inside a frame callback.
pub fn request_animation_timeout<F>(scheduler: &FrameScheduler, delay: Duration, f: F) -> AnimationTimeout
where
    F: FnOnce() + 'static,
{
    let callback: Box<dyn FnOnce()> = Box::new(f);
    let state = Rc::new(TimeoutState {
        start: scheduler.now(),
        delay,
        frame: Cell::new(None),
        cancelled: Cell::new(false),
        callback: RefCell::new(Some(callback)),
    });
    arm(scheduler, Rc::clone(&state));
    AnimationTimeout {
        scheduler: scheduler.clone(),
        state,
    }
}

fn arm(scheduler: &FrameScheduler, state: Rc<TimeoutState>) {
    let next = scheduler.clone();
    let st = Rc::clone(&state);
    let handle = scheduler.request_animation_frame(move |now| {
        st.frame.set(None);
        if st.cancelled.get() {
            return;
        }
        if now.saturating_sub(st.start) < st.delay {
            arm(&next, st);
            return;
        }
        let callback = st.callback.borrow_mut().take();
        if let Some(callback) = callback {
            log::trace!(target: "frames", "animation timeout fired at {now:?}");
            callback();
        }
    });
    state.frame.set(Some(handle));
}
