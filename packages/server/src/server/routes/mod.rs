// HTTP routes
pub mod health;
pub mod index;
pub mod media;

pub use health::*;
pub use index::*;
pub use media::*;
