// DOM contract and loop tuning for the web front-end

pub const CANVAS_ID: &str = "wall-canvas";

// Nav buttons; the suffix after `nav-` names the mode
pub const NAV_IDS: [&str; 4] = ["nav-home", "nav-about", "nav-works", "nav-contacts"];

// Canvas attributes
pub const ATTR_STYLE: &str = "data-style"; // "relief" | "wave"
pub const ATTR_RELIEF: &str = "data-relief"; // relief image url

// Hover targets: any element carrying data-freq and data-bpm, optionally data-images
pub const HOVER_SELECTOR: &str = "[data-freq][data-bpm], [data-project]";
pub const ATTR_FREQ: &str = "data-freq";
pub const ATTR_BPM: &str = "data-bpm";
pub const ATTR_PROJECT: &str = "data-project"; // product | graphic | sound
pub const ATTR_IMAGES: &str = "data-images"; // comma separated urls

// Long stalls (tab in background) are clamped so tweens don't jump
pub const MAX_FRAME_DT_SEC: f32 = 0.1;
