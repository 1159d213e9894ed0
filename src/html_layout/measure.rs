//! Layout measurement boundary
//!
//! Pagination needs rendered heights, which only a layout engine can
//! provide. The engine talks to it through these traits: a `LayoutMeasurer`
//! opens one `MeasureScope` per pagination call, and the scope is the
//! off-screen container that fragments are laid out in. Dropping the scope
//! tears the container down.

use thiserror::Error;

use crate::models::Node;

#[derive(Debug, Clone, Error)]
pub enum MeasureError {
    /// No document to attach a measurement container to
    #[error("no document available for measurement")]
    NoDocument,

    /// The host layout engine rejected an operation
    #[error("layout engine error: {0}")]
    Host(String),
}

/// Opens measurement scopes
pub trait LayoutMeasurer {
    type Scope: MeasureScope;

    /// Create a fresh off-screen container, exclusively owned by the caller
    fn open_scope(&self) -> Result<Self::Scope, MeasureError>;
}

/// A live off-screen container; torn down on drop
pub trait MeasureScope {
    /// Rendered border-box height of `node` laid out alone in the container
    fn height(&mut self, node: &Node) -> Result<f32, MeasureError>;

    /// Computed top + bottom margin of `node` (zero for text)
    fn vertical_margin(&mut self, node: &Node) -> Result<f32, MeasureError>;

    /// Height including vertical margins
    fn outer_height(&mut self, node: &Node) -> Result<f32, MeasureError> {
        Ok(self.height(node)? + self.vertical_margin(node)?)
    }
}

impl<M: LayoutMeasurer + ?Sized> LayoutMeasurer for &M {
    type Scope = M::Scope;

    fn open_scope(&self) -> Result<Self::Scope, MeasureError> {
        (**self).open_scope()
    }
}
