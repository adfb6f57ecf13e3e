mod scheduler;
mod timeout;

pub use scheduler::{FrameHandle, FrameScheduler, IDLE_BUDGET, IdleDeadline, IdleHandle};
pub use timeout::{AnimationTimeout, raf_closure, request_animation_timeout};
