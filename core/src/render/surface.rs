//! Render surface size and resize notification
//!
//! The surface publishes its size on a watch channel. Each live scene holds
//! one [`ResizeListener`]; dropping the listener unsubscribes it, so the
//! receiver count is the number of scenes still listening.

use tokio::sync::watch;

/// Pixel size of the render surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height; a zero height is treated as one pixel.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// The drawable area scenes render into.
#[derive(Debug)]
pub struct Surface {
    tx: watch::Sender<SurfaceSize>,
}

impl Surface {
    pub fn new(size: SurfaceSize) -> Self {
        let (tx, _rx) = watch::channel(size);
        Self { tx }
    }

    pub fn size(&self) -> SurfaceSize {
        *self.tx.borrow()
    }

    /// Publish a new size. Listeners are only woken when it actually changes.
    pub fn resize(&self, size: SurfaceSize) {
        self.tx.send_if_modified(|current| {
            if *current == size {
                false
            } else {
                *current = size;
                true
            }
        });
    }

    /// Register a resize listener.
    pub fn subscribe(&self) -> ResizeListener {
        ResizeListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live resize listeners.
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Resize subscription owned by a scene.
#[derive(Debug)]
pub struct ResizeListener {
    rx: watch::Receiver<SurfaceSize>,
}

impl ResizeListener {
    /// Take the latest size if it changed since the last poll.
    pub fn poll(&mut self) -> Option<SurfaceSize> {
        match self.rx.has_changed() {
            Ok(true) => Some(*self.rx.borrow_and_update()),
            // Closed surface keeps the last size
            Ok(false) | Err(_) => None,
        }
    }

    pub fn current(&self) -> SurfaceSize {
        *self.rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listeners_are_counted_and_dropped() {
        let surface = Surface::new(SurfaceSize::new(800, 600));
        assert_eq!(surface.listener_count(), 0);
        let a = surface.subscribe();
        let b = surface.subscribe();
        assert_eq!(surface.listener_count(), 2);
        drop(a);
        assert_eq!(surface.listener_count(), 1);
        drop(b);
        assert_eq!(surface.listener_count(), 0);
    }

    #[test]
    fn poll_sees_only_changes() {
        let surface = Surface::new(SurfaceSize::new(800, 600));
        let mut listener = surface.subscribe();
        assert_eq!(listener.poll(), None);

        surface.resize(SurfaceSize::new(1024, 768));
        assert_eq!(listener.poll(), Some(SurfaceSize::new(1024, 768)));
        assert_eq!(listener.poll(), None);

        surface.resize(SurfaceSize::new(1024, 768));
        assert_eq!(listener.poll(), None);
    }

    #[test]
    fn aspect_guards_zero_height() {
        assert_eq!(SurfaceSize::new(100, 0).aspect(), 100.0);
        assert_eq!(SurfaceSize::new(1600, 800).aspect(), 2.0);
    }
}
