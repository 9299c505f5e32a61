//! Window shell for the demo
//!
//! Only the bookkeeping the render loop needs: an `Arc` handle for
//! surface creation and resize coalescing, so a burst of resize events
//! costs one surface reconfigure per frame. All other input is handled
//! directly by the event loop in `main`.

use std::sync::Arc;
use winit::{
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::EventLoop,
    window::{Window as WinitWindow, WindowBuilder},
};

/// Coalesces resize events until the render loop consumes them
#[derive(Default)]
struct ResizeTracker {
    pending: Option<(u32, u32)>,
}

impl ResizeTracker {
    fn note(&mut self, width: u32, height: u32) {
        self.pending = Some((width, height));
    }

    fn take(&mut self) -> Option<(u32, u32)> {
        self.pending.take()
    }
}

/// The demo window plus pending-resize state
pub struct Window {
    window: Arc<WinitWindow>,
    resize: ResizeTracker,
}

impl Window {
    pub fn new(event_loop: &EventLoop<()>, title: &str, width: u32, height: u32) -> Self {
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(title)
                .with_inner_size(PhysicalSize::new(width, height))
                .build(event_loop)
                .expect("Failed to create window"),
        );

        Self {
            window,
            resize: ResizeTracker::default(),
        }
    }

    /// Shared handle for surface creation
    pub fn window_arc(&self) -> Arc<WinitWindow> {
        Arc::clone(&self.window)
    }

    /// Record window events the render loop reacts to later
    pub fn handle_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::Resized(size) = event {
            self.resize.note(size.width, size.height);
        }
    }

    /// The latest resize since the last call, if any
    pub fn take_resize(&mut self) -> Option<(u32, u32)> {
        self.resize.take()
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resizes_coalesce_to_the_latest() {
        let mut tracker = ResizeTracker::default();
        assert_eq!(tracker.take(), None);

        tracker.note(800, 600);
        tracker.note(1920, 1080);
        assert_eq!(tracker.take(), Some((1920, 1080)));
        assert_eq!(tracker.take(), None);
    }
}
