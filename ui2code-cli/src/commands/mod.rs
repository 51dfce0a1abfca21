//! CLI commands

pub mod fix_encoding;
pub mod run;
pub mod score;

pub use fix_encoding::FixEncodingArgs;
pub use run::RunArgs;
pub use score::ScoreArgs;
