pub mod assets;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod tasks;

pub use assets::*;
pub use engine::*;
pub use error::*;
pub use pipeline::*;
pub use prompts::*;
pub use tasks::*;
