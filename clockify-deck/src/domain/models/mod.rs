mod filter;
mod ids;
mod outcome;
mod resolution;

pub use filter::*;
pub use ids::*;
pub use outcome::*;
pub use resolution::*;
