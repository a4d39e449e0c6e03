mod slides;
pub use slides::*;
