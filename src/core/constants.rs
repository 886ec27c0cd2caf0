// Scene and scroll tuning constants shared by the core and the web frontend.

// Camera
pub const CAMERA_FOV_DEG: f32 = 75.0;
pub const CAMERA_DISTANCE: f32 = 10.0; // world units from the origin along +Z
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;

// Output surface
pub const MAX_PIXEL_RATIO: f32 = 2.0;
pub const MIN_WINDOW_PX: f32 = 1.0; // guards aspect-ratio and px->world divisions

// Reveal transition
pub const REVEAL_DURATION_SEC: f32 = 1.6;
pub const PLANE_BASE_COLOR_HEX: u32 = 0x242424; // shown before the reveal wipes in

// Smooth scroll
pub const SCROLL_LERP: f32 = 0.1; // fraction per 60 Hz frame
pub const SCROLL_SNAP_PX: f32 = 0.5;
pub const SCROLL_ECHO_PX: f32 = 1.0; // scroll events this close to our own scrollTo are echoes
pub const WHEEL_LINE_PX: f32 = 16.0;
pub const WHEEL_MULTIPLIER: f32 = 1.0;
