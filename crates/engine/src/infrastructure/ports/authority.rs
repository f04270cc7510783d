//! Authority channel port.
//!
//! Any participant may ask for a privileged mutation; only the participant
//! holding the authority role executes it against canonical state.

use std::sync::Arc;

use async_trait::async_trait;
use veilkeep_domain::{ParticipantId, RequestId};
use veilkeep_shared::{AuthorityRequest, ResponseResult};

use super::error::ChannelError;

/// Facts about the participant running a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerContext {
    /// Whether the executing participant currently holds authority
    pub is_authority: bool,
    /// Participant that initiated the request
    pub origin: ParticipantId,
    pub request_id: RequestId,
}

impl HandlerContext {
    pub fn new(is_authority: bool, origin: ParticipantId, request_id: RequestId) -> Self {
        Self {
            is_authority,
            origin,
            request_id,
        }
    }
}

/// Local implementation of one or more named operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorityHandler: Send + Sync {
    async fn handle(&self, request: AuthorityRequest, ctx: HandlerContext) -> ResponseResult;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorityChannel: Send + Sync {
    /// Bind `operation` to a local handler. Only used once this participant
    /// holds authority.
    fn register(&self, operation: &'static str, handler: Arc<dyn AuthorityHandler>);

    /// Ask the current authority to execute `request`.
    ///
    /// `Ok` carries the handler's response, which may itself be an error
    /// response. Transport-level failures are `Err`.
    async fn invoke_as_authority(
        &self,
        request: AuthorityRequest,
    ) -> Result<ResponseResult, ChannelError>;

    fn is_authority(&self) -> bool;
}
