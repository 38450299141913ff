// src/application/ports/mod.rs
pub mod flow_store;
pub mod refresh_replay;
pub mod time;
pub mod token_info;
pub mod upstream;

// Type aliases to make port injection sites more descriptive and reduce `dyn` noise
pub type FlowStorePort = dyn flow_store::FlowStore;
pub type RefreshReplayStorePort = dyn refresh_replay::RefreshReplayStore;
pub type TokenInfoStorePort = dyn token_info::TokenInfoStore;
pub type UpstreamAuthorizerPort = dyn upstream::UpstreamAuthorizer;
pub type ClockPort = dyn time::Clock;
