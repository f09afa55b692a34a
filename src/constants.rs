// DOM hooks and bundled assets used by the web frontend.
// Scene tuning lives in `globe_core::config`.

// Element ids
pub const CANVAS_ID: &str = "globe-canvas";
pub const POPUP_ID: &str = "popup";
pub const POPUP_HEADER_ID: &str = "populationHeader";
pub const POPUP_VALUE_ID: &str = "populationValue";
pub const CONFIG_ELEMENT_ID: &str = "globe-config"; // optional JSON override

// Tooltip offset from the pointer, in CSS pixels
pub const POPUP_OFFSET_PX: [f32; 2] = [12.0, 12.0];

// Default feed: [{ "name", "latlng": [lat, lng], "population" }]
pub static COUNTRY_DATA_JSON: &str = include_str!("../data/countries.json");

// Shaders bundled as string constants
pub static GLOBE_WGSL: &str = include_str!("../shaders/globe.wgsl");
