pub mod flow;
pub mod tokens;

pub use flow::{AuthorizeRedirect, CallbackRedirect};
pub use tokens::{IntrospectionDto, TokenResponseDto};
