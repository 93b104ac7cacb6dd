#![allow(unused_imports)]

pub use tracing::{Level, debug, instrument, trace, warn};

pub use crate::error::{Argument, Error};

pub type Result<T = (), E = Error> = std::result::Result<T, E>;
