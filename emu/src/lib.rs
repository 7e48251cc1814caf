pub mod console;
pub mod error;
pub mod hooks;
pub mod model;

pub use console::{Console, Script, Stdio};
pub use error::{Error, Fault};
pub use hooks::Hook;
pub use model::{Exit, State};
