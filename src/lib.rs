extern crate alloc;

pub mod cmds;
pub mod conductors;
mod constructors;
pub mod directory;
pub mod entities;
pub mod error;
pub mod ids;
pub mod intake;
pub mod interactors;
pub mod presenters;
pub mod repositories;
pub mod session;
pub(crate) mod utils;

pub use constructors::*;
pub use error::{FeedError, Result};
pub use interactors::{FeedManager, PostQuery};
