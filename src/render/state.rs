//! Per-pass renderer state.

/// One SELECT being emitted.
#[derive(Debug, Default)]
pub(crate) struct Frame {
    /// Output set aside while this statement's text is staged
    pub(crate) outer: Option<String>,
}

/// Mutable state of a single render pass. Never shared between passes.
#[derive(Debug, Default)]
pub(crate) struct RenderState {
    /// Statements currently open, innermost last
    pub(crate) frames: Vec<Frame>,
    /// Script/block nesting
    pub(crate) script_depth: usize,
}

impl RenderState {
    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }
}
