pub mod handlers;
pub mod model;
mod tests;

pub use handlers::*;
pub use model::*;
