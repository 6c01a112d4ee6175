pub mod constants;
pub mod error;
pub mod event;
pub mod operation;
pub mod permission;
pub mod records;
pub mod types;

pub use constants::*;
pub use error::{ErrorKind, MintgateError};
pub use event::*;
pub use operation::*;
pub use permission::Permission;
pub use records::*;
pub use types::*;
