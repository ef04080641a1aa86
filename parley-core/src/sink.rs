//! Output seam for incremental text.

/// Receives decoded deltas, one call per delta, in arrival order.
///
/// Implemented for any `FnMut(&str) + Send` closure.
pub trait DeltaSink: Send {
    /// Append one fragment of output.
    fn push(&mut self, delta: &str);
}

impl<F> DeltaSink for F
where
    F: FnMut(&str) + Send,
{
    fn push(&mut self, delta: &str) {
        self(delta)
    }
}
