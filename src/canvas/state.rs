//! Scoped save/restore of canvas state

use std::ops::{Deref, DerefMut};

use crate::error::Result;

use super::Canvas;

/// Guard that restores the canvas state when dropped.
///
/// Draw through the guard (it derefs to the canvas). The restore runs on every
/// exit path, including early returns through `?`, so the state stack stays
/// balanced when a draw call fails.
pub struct CanvasState<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
}

impl<'a, C: Canvas + ?Sized> CanvasState<'a, C> {
    /// Save the current state; it is restored when the guard goes away
    pub fn save(canvas: &'a mut C) -> Result<Self> {
        canvas.save_state()?;
        Ok(Self { canvas })
    }
}

impl<C: Canvas + ?Sized> Deref for CanvasState<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> DerefMut for CanvasState<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> Drop for CanvasState<'_, C> {
    fn drop(&mut self) {
        if let Err(err) = self.canvas.restore_state() {
            log::warn!("failed to restore canvas state: {}", err);
        }
    }
}
