pub mod candidates;
pub mod context;
pub mod session;

pub use candidates::*;
pub use context::*;
pub use session::*;
