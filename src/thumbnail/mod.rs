mod cache;
mod loader;

pub use cache::*;
pub use loader::*;
