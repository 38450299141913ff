// src/application/services/mod.rs
use std::sync::Arc;

use crate::{
    application::{
        commands::flow::{FlowCommandService, FlowSettings},
        ports::{
            flow_store::FlowStore, refresh_replay::RefreshReplayStore, time::Clock,
            token_info::TokenInfoStore, upstream::UpstreamAuthorizer,
        },
    },
    infrastructure::security::state_codec::StateCodec,
};

pub struct ApplicationServices {
    pub flow_commands: Arc<FlowCommandService>,
}

impl ApplicationServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        flow_store: Arc<dyn FlowStore>,
        refresh_store: Arc<dyn RefreshReplayStore>,
        token_store: Arc<dyn TokenInfoStore>,
        upstream: Arc<dyn UpstreamAuthorizer>,
        codec: Arc<StateCodec>,
        clock: Arc<dyn Clock>,
        settings: FlowSettings,
    ) -> Self {
        let flow_commands = Arc::new(FlowCommandService::new(
            flow_store,
            refresh_store,
            token_store,
            upstream,
            codec,
            clock,
            settings,
        ));

        Self { flow_commands }
    }

    pub fn flow_commands(&self) -> Arc<FlowCommandService> {
        Arc::clone(&self.flow_commands)
    }
}
