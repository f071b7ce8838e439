/// Identifies one requested frame callback.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameHandle(pub u64);

/// Host frame loop seam.
///
/// The coordinator never runs work inline on scroll or resize; it asks the
/// host for a frame callback and does everything there. Browsers map this to
/// `requestAnimationFrame`; tests and the CLI use [`ManualScheduler`].
pub trait FrameScheduler {
    /// Ask the host to invoke
    /// [`ScrollEffects::on_frame`](crate::effects::ScrollEffects::on_frame)
    /// once, soon.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a requested frame if it has not fired yet.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Deterministic scheduler: records requests and lets the driver drain and
/// dispatch them explicitly.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next: u64,
    pending: Vec<FrameHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending handle, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next);
        self.next += 1;
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
    }
}
