//! Handler 公共辅助

pub mod response;
pub mod validation;

pub use validation::*;
