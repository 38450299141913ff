// src/domain/oauth/mod.rs
pub mod entity;
pub mod value_objects;

pub use entity::{AuthorizationCode, AuthorizationState};
pub use value_objects::{CodeChallengeMethod, CompositeState, GrantType, RedirectUri, ResponseType};
