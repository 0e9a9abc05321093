pub mod surface;

pub use surface::{TextSurface, render_text_pixmap};
