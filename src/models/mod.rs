pub mod advisory;
pub mod comparison;
pub mod dates;
pub mod log;
pub mod rainfall;
pub mod recommendation;
pub mod season;

pub use advisory::*;
pub use comparison::*;
pub use dates::*;
pub use log::*;
pub use rainfall::*;
pub use recommendation::*;
pub use season::*;
