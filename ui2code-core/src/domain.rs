pub mod config;
pub mod generation;
pub mod item;
pub mod metrics;
pub mod summary;

pub use config::*;
pub use generation::*;
pub use item::*;
pub use metrics::*;
pub use summary::*;
