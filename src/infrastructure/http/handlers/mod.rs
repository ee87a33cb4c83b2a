//! HTTP Handlers

mod books;
mod ping;

pub use books::*;
pub use ping::*;
