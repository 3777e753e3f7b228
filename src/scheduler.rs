use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use winit::window::Window;

/// Identifies one requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// The host's per-frame callback primitive. At most one frame is in flight;
/// the renderer requests the next one only after the current tick returns.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Default)]
struct ManualState {
    next_id: u64,
    pending: Option<FrameHandle>,
    requested: usize,
    cancelled: usize,
}

/// Scheduler driven by hand. Clones share state, so a test can keep one
/// clone and hand the other to the renderer.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.state.borrow().pending
    }

    /// Consumes the pending request, as the host does right before it runs
    /// the callback.
    pub fn take_pending(&self) -> Option<FrameHandle> {
        self.state.borrow_mut().pending.take()
    }

    pub fn requested_count(&self) -> usize {
        self.state.borrow().requested
    }

    pub fn cancelled_count(&self) -> usize {
        self.state.borrow().cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let handle = FrameHandle(state.next_id);
        state.pending = Some(handle);
        state.requested += 1;
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut state = self.state.borrow_mut();
        if state.pending == Some(handle) {
            state.pending = None;
            state.cancelled += 1;
        }
    }
}

/// Maps frame requests onto winit redraw requests.
///
/// winit cannot revoke a redraw request, so cancelling only disarms the
/// scheduler and a redraw already queued still arrives. The host ignores
/// redraws once the cube is disposed.
pub struct RedrawScheduler {
    window: Arc<Window>,
    next_id: u64,
    armed: Option<FrameHandle>,
}

impl RedrawScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next_id: 0,
            armed: None,
        }
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.armed = Some(handle);
        self.window.request_redraw();
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.armed == Some(handle) {
            self.armed = None;
        }
    }
}
