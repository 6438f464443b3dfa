pub mod caption;
pub use caption::{CaptionFont, FontError, TextExtent, draw_caption, place_caption};
pub mod outline;
pub use outline::draw_outline;
pub mod veil;
pub use veil::{BlendError, add_weighted, draw_veil};
