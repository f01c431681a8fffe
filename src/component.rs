//! Component trait.

/// Renderable component interface.
///
/// Widgets render to plain lines; the terminal engine that flushes lines is
/// external to this crate.
pub trait Component {
    /// Render to a list of lines at the given width.
    fn render(&mut self, width: usize) -> Vec<String>;

    /// Invalidate any cached state.
    fn invalidate(&mut self) {}
}
