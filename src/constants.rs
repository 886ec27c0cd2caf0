// DOM contract for the page hosting the scene.

pub const CANVAS_ID: &str = "webgl";
pub const IMAGE_SELECTOR: &str = "img";
