pub use content::*;
pub use error::*;
pub use memory::*;
pub use minefield::*;
pub use path::*;
pub use profile::*;
pub use quiz::*;
pub use scramble::*;
pub use session::*;
pub use store::*;
pub use timer::*;
pub use types::*;

mod content;
mod error;
mod memory;
mod minefield;
mod path;
mod profile;
mod quiz;
mod scramble;
mod session;
mod store;
mod timer;
mod types;
