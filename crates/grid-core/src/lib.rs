pub mod config;
pub mod constants;
pub mod effects;
pub mod field;
pub mod font;
pub mod glyph;
pub mod noise;
pub mod particles;
pub mod render;
pub mod session;
pub mod timers;

pub use config::*;
pub use field::IntensityField;
pub use glyph::{Bitmap, BlockFontRaster, GlyphData, GlyphRaster};
pub use render::Surface;
pub use session::{GridSession, Mode};
