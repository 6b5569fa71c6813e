mod args;
mod error;
mod logger;

pub use args::{CliArgs, Command, ConvertArgs};
pub use error::TabconvError;
pub use logger::setup_logging;
