//! CLI command handling

pub mod output;
pub mod parse;
pub mod scan;
pub mod settings;
pub mod setup;

pub use output::*;
pub use parse::*;
pub use scan::*;
pub use settings::*;
pub use setup::*;
