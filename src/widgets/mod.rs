//! Interactive widgets rendered above the transcript.

pub mod mode_toggle;
pub mod thinking;
pub mod validation_banner;

pub use mode_toggle::{AgentMode, ModeToggle};
pub use thinking::Thinking;
pub use validation_banner::{banner_lines, render_validation_banner};
