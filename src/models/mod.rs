pub mod product;
pub mod selectors;

pub use product::*;
pub use selectors::*;
