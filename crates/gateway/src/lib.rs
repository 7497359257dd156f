#![deny(unsafe_code)]

//! Send-capability seam for the Parlor demo panel.
//!
//! The panel depends only on the [`MessageGateway`] trait; the REST adapter
//! here is the concrete capability the showcase app injects.

use std::sync::Arc;

mod capability;
mod rest;

pub use capability::{
    AttemptOutcome, DEFAULT_BASE_URL, GatewayConfig, GatewayError, GatewayResult, GatewayWorker,
    MessageGateway, SendAttemptHandle, SendOutcome, SendRequest, WIDGET_ID,
    resolve_messages_endpoint,
};
pub use rest::{REST_GATEWAY_ID, RestGateway};

pub fn create_gateway(config: GatewayConfig) -> GatewayResult<Arc<dyn MessageGateway>> {
    Ok(Arc::new(RestGateway::new(config)?))
}
