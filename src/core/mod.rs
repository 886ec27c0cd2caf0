pub mod constants;
pub mod plane;
pub mod scene;
pub mod scroll;
pub mod tween;
pub mod viewport;
pub mod visibility;

pub use constants::*;
pub use plane::*;
pub use scene::*;
pub use scroll::*;
pub use tween::*;
pub use viewport::*;
pub use visibility::*;

// Shaders bundled as string constants
pub static PLANE_WGSL: &str = include_str!("../../shaders/plane.wgsl");
