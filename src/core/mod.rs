pub mod encoding;
pub mod error;
pub mod logger;
pub mod normalize;
pub mod render;
pub mod select;
pub mod validate;

pub use encoding::*;
pub use error::*;
pub use normalize::*;
pub use render::*;
pub use select::*;
pub use validate::*;
