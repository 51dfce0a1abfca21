pub mod aggregators;
pub mod calculators;
pub mod error;

pub use aggregators::*;
pub use calculators::*;
pub use error::*;
