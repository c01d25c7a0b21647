//! Audio I/O: decoding and click-track rendering

pub mod clicks;
pub mod decoder;

pub use clicks::{mix_clicks, render_clicks, write_wav};
pub use decoder::decode;
