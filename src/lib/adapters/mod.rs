pub mod http;
pub mod render;

pub use http::*;
pub use render::Templates;
