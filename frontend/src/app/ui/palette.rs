use egui::Color32;

pub const EMPTY: Color32 = Color32::from_rgb(0xff, 0xff, 0xff);
pub const VISITED: Color32 = Color32::from_rgb(0xff, 0xe1, 0xa6);
pub const BLOCKED: Color32 = Color32::from_rgb(0x47, 0x47, 0xab);
pub const START: Color32 = Color32::from_rgb(0x55, 0xa5, 0x55);
pub const END: Color32 = Color32::from_rgb(0x8c, 0x2e, 0x2e);
pub const GRID_LINE: Color32 = Color32::from_rgb(0xbb, 0xbb, 0xc4);
pub const HOVER: Color32 = Color32::from_rgb(0xfd, 0xbd, 0x14);
pub const FRONTIER: Color32 = Color32::from_rgb(0xba, 0x4a, 0xec);
pub const PATH: Color32 = Color32::from_rgb(0x2e, 0x9c, 0x3a);
pub const DISTANCE_TEXT: Color32 = Color32::from_rgb(0x15, 0x45, 0x1d);
pub const ORDER_TEXT: Color32 = Color32::from_rgb(0x16, 0x48, 0x2d);
