//! Hierarchical model-matrix stack.
//!
//! The working matrix is mutated in place by post-multiplication, so the
//! operation applied last acts first on child coordinates:
//!
//! ```
//! use room3d_core::stack::TransformStack;
//!
//! let mut stack = TransformStack::new();
//! stack.push();
//! stack.translate(0.0, -2.5, 0.0).scale(12.0, 1.0, 10.0);
//! // ... draw the floor with stack.current() ...
//! stack.pop().unwrap();
//! assert_eq!(stack.depth(), 0);
//! ```

use crate::error::{Result, SceneError};
use crate::transform::{rotation, scaling, translation, Mat4};

/// Working model matrix plus the snapshots saved by [`push`](TransformStack::push)
#[derive(Debug, Clone)]
pub struct TransformStack {
    current: Mat4,
    saved: Vec<Mat4>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self::with_matrix(Mat4::identity())
    }

    pub fn with_matrix(current: Mat4) -> Self {
        Self {
            current,
            saved: Vec::with_capacity(8),
        }
    }

    #[inline]
    pub fn current(&self) -> &Mat4 {
        &self.current
    }

    /// Replace the working matrix without touching the saved snapshots
    pub fn set(&mut self, m: Mat4) -> &mut Self {
        self.current = m;
        self
    }

    /// Save a copy of the working matrix
    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Restore the most recently saved matrix as the working matrix and return it.
    pub fn pop(&mut self) -> Result<Mat4> {
        let top = self.saved.pop().ok_or(SceneError::StackUnderflow)?;
        self.current = top;
        Ok(top)
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Error unless every push has been matched by a pop
    pub fn ensure_empty(&self) -> Result<()> {
        match self.depth() {
            0 => Ok(()),
            depth => Err(SceneError::StackImbalance { depth }),
        }
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.concat(&translation(x, y, z))
    }

    pub fn rotate(&mut self, degrees: f32, x: f32, y: f32, z: f32) -> &mut Self {
        self.concat(&rotation(degrees, x, y, z))
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.concat(&scaling(x, y, z))
    }

    /// `M' = M * other`
    pub fn concat(&mut self, other: &Mat4) -> &mut Self {
        self.current = self.current * other;
        self
    }

    /// Run `f` between a push and a pop. The pop happens on every exit path.
    pub fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.push();
        let result = f(self);
        self.pop()?;
        result
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}
