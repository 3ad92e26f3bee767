pub mod normalize;
pub mod types;

pub use normalize::{normalize, parse_instant};
pub use types::*;
