pub mod logging;

pub use logging::{JsonlOutputChannel, LogLevel, LoggedLine, MemoryOutputChannel, OutputChannel};
