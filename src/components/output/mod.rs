pub mod render;
pub mod writer;

pub use render::render_html;
pub use writer::{read_archive, write_archive};
