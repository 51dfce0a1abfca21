pub mod parsing;
pub mod persistence;
pub mod rendering;
pub mod scoring;

pub use parsing::*;
pub use persistence::*;
pub use rendering::*;
pub use scoring::*;
