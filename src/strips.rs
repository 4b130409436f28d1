//! Strip assignment, blending and composition of the output image.

pub mod blend;
pub mod compositor;
pub mod layout;

pub use blend::{blend, blend_window, BlendMethod};
pub use compositor::{
    CompositionOptions, ProgressObserver, StdoutProgress, StripCompositor, StripReport,
};
pub use layout::StripLayout;
