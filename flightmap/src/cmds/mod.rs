pub use fetch::*;
pub use render::*;
pub use serve::*;

mod fetch;
mod render;
mod serve;
