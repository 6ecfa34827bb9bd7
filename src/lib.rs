//! Immersive 360° video viewer.
//!
//! Frames from a [`video::VideoSurface`] are mapped onto the inside of a
//! sphere seen from its centre. A flat strip along the bottom of the window
//! shows the whole equirectangular frame and doubles as a direct-jump control.

pub mod camera;
pub mod config;
pub mod error;
pub mod frame_ready;
pub mod input;
pub mod mesh;
pub mod renderer;
pub mod shader;
pub mod video;

pub use camera::{Orientation, Viewport};
pub use config::ViewerConfig;
pub use error::{ConfigError, MediaError, RenderError};
pub use frame_ready::FrameReady;
pub use input::{PointerEvent, PointerKind, TouchController};
pub use renderer::{RenderSettings, SphereRenderer};
pub use video::{MediaSource, VideoPlayer, VideoSurface};
