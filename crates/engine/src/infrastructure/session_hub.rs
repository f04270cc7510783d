//! In-process session hub.
//!
//! Connects any number of participants living in one process. At most one
//! of them holds the authority role; requests from every participant
//! (the authority included) are queued to the authority's worker and
//! processed one at a time, so canonical mutations are serialized.
//!
//! A reachability switch lets tests and tools simulate the authority being
//! partitioned away.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot, RwLock};
use uuid::Uuid;
use veilkeep_domain::{ParticipantId, RequestId};
use veilkeep_shared::{AuthorityEnvelope, AuthorityRequest, ErrorCode, ResponseResult};

use super::ports::{
    AuthorityChannel, AuthorityHandler, ChannelError, HandlerContext, SessionError,
};
use super::request_ledger::RequestLedger;

/// Queue depth of the authority's inbox.
const INBOX_CAPACITY: usize = 64;

/// A participant's role in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantRole {
    /// Executes privileged operations against canonical state
    Authority,
    Player,
}

type HandlerMap = DashMap<&'static str, Arc<dyn AuthorityHandler>>;

struct Delivery {
    envelope: AuthorityEnvelope,
    reply: oneshot::Sender<ResponseResult>,
}

struct AuthoritySlot {
    participant_id: ParticipantId,
    inbox: mpsc::Sender<Delivery>,
    holds_authority: Arc<AtomicBool>,
}

pub struct SessionHub {
    participants: DashMap<ParticipantId, ParticipantRole>,
    authority: RwLock<Option<AuthoritySlot>>,
    reachable: AtomicBool,
    timeout: Duration,
    ledger_capacity: usize,
}

impl SessionHub {
    pub fn new(timeout: Duration, ledger_capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            participants: DashMap::new(),
            authority: RwLock::new(None),
            reachable: AtomicBool::new(true),
            timeout,
            ledger_capacity,
        })
    }

    /// Join the session. Fails if an authority is requested while another
    /// participant already holds the role.
    pub async fn join(self: &Arc<Self>, role: ParticipantRole) -> Result<HubChannel, SessionError> {
        let participant_id = ParticipantId::new();
        let handlers: Arc<HandlerMap> = Arc::new(DashMap::new());
        let holds_authority = Arc::new(AtomicBool::new(false));

        if role == ParticipantRole::Authority {
            let mut slot = self.authority.write().await;
            if slot.is_some() {
                return Err(SessionError::AuthorityAlreadyConnected);
            }

            let (inbox, rx) = mpsc::channel(INBOX_CAPACITY);
            holds_authority.store(true, Ordering::SeqCst);
            let dispatcher = AuthorityDispatcher {
                handlers: handlers.clone(),
                holds_authority: holds_authority.clone(),
                ledger: RequestLedger::new(self.ledger_capacity),
            };
            tokio::spawn(run_authority(rx, dispatcher));

            *slot = Some(AuthoritySlot {
                participant_id,
                inbox,
                holds_authority: holds_authority.clone(),
            });
        }

        self.participants.insert(participant_id, role);
        tracing::info!(participant_id = %participant_id, role = ?role, "Participant joined session");

        Ok(HubChannel {
            hub: self.clone(),
            participant_id,
            handlers,
            holds_authority,
        })
    }

    /// Leave the session. An authority leaving frees the role and stops its
    /// worker; requests still queued are answered with `Closed`.
    pub async fn leave(&self, participant_id: ParticipantId) -> Result<(), SessionError> {
        self.participants
            .remove(&participant_id)
            .ok_or_else(|| SessionError::NotFound(participant_id.to_string()))?;

        let mut slot = self.authority.write().await;
        if slot
            .as_ref()
            .is_some_and(|current| current.participant_id == participant_id)
        {
            if let Some(previous) = slot.take() {
                previous.holds_authority.store(false, Ordering::SeqCst);
            }
            tracing::info!(participant_id = %participant_id, "Authority left session");
        } else {
            tracing::info!(participant_id = %participant_id, "Participant left session");
        }
        Ok(())
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
        tracing::info!(reachable, "Authority reachability changed");
    }

    pub fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub async fn authority_id(&self) -> Option<ParticipantId> {
        self.authority
            .read()
            .await
            .as_ref()
            .map(|slot| slot.participant_id)
    }

    /// Hand an envelope to the authority and wait for its answer.
    ///
    /// An operation the authority has no handler for comes back as
    /// [`ChannelError::Rejected`]. Delivering the same envelope twice returns the first answer without
    /// re-applying the operation, as long as it is still in the ledger.
    pub async fn deliver(&self, envelope: AuthorityEnvelope) -> Result<ResponseResult, ChannelError> {
        if !self.is_reachable() {
            return Err(ChannelError::Unavailable(
                "authority is unreachable".to_string(),
            ));
        }

        let inbox = self
            .authority
            .read()
            .await
            .as_ref()
            .map(|slot| slot.inbox.clone())
            .ok_or_else(|| ChannelError::Unavailable("no authority connected".to_string()))?;

        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        let round_trip = async {
            let (reply, response) = oneshot::channel();
            inbox
                .send(Delivery { envelope, reply })
                .await
                .map_err(|_| ChannelError::Closed)?;
            response.await.map_err(|_| ChannelError::Closed)
        };

        // Queueing counts against the timeout too: a stuck authority must not
        // park requesters on a full inbox.
        let result = tokio::time::timeout(self.timeout, round_trip)
            .await
            .map_err(|_| ChannelError::Timeout { timeout_ms })??;

        match result {
            ResponseResult::Error {
                code: ErrorCode::UnknownOperation,
                message,
            } => Err(ChannelError::Rejected {
                code: ErrorCode::UnknownOperation,
                message,
            }),
            other => Ok(other),
        }
    }
}

/// A participant's handle on the hub.
pub struct HubChannel {
    hub: Arc<SessionHub>,
    participant_id: ParticipantId,
    handlers: Arc<HandlerMap>,
    holds_authority: Arc<AtomicBool>,
}

impl HubChannel {
    pub fn participant_id(&self) -> ParticipantId {
        self.participant_id
    }

    pub fn hub(&self) -> &Arc<SessionHub> {
        &self.hub
    }

    /// Wrap a request in an envelope originating from this participant.
    pub fn envelope(&self, request: AuthorityRequest) -> AuthorityEnvelope {
        AuthorityEnvelope {
            request_id: Uuid::new_v4(),
            origin: self.participant_id.to_uuid(),
            request,
        }
    }
}

#[async_trait]
impl AuthorityChannel for HubChannel {
    fn register(&self, operation: &'static str, handler: Arc<dyn AuthorityHandler>) {
        self.handlers.insert(operation, handler);
        tracing::debug!(participant_id = %self.participant_id, operation, "Registered authority handler");
    }

    async fn invoke_as_authority(
        &self,
        request: AuthorityRequest,
    ) -> Result<ResponseResult, ChannelError> {
        let envelope = self.envelope(request);
        tracing::debug!(
            request_id = %envelope.request_id,
            operation = envelope.request.operation(),
            origin = %self.participant_id,
            "Invoking as authority"
        );
        self.hub.deliver(envelope).await
    }

    fn is_authority(&self) -> bool {
        self.holds_authority.load(Ordering::SeqCst)
    }
}

/// The authority side: looks up handlers and suppresses duplicates.
struct AuthorityDispatcher {
    handlers: Arc<HandlerMap>,
    holds_authority: Arc<AtomicBool>,
    ledger: RequestLedger,
}

impl AuthorityDispatcher {
    async fn dispatch(&mut self, envelope: AuthorityEnvelope) -> ResponseResult {
        let request_id = RequestId::from_uuid(envelope.request_id);
        if let Some(previous) = self.ledger.lookup(&request_id) {
            tracing::debug!(request_id = %request_id, "Duplicate request; returning recorded response");
            return previous.clone();
        }

        let operation = envelope.request.operation();
        let handler = self.handlers.get(operation).map(|entry| entry.value().clone());
        let response = match handler {
            Some(handler) => {
                let ctx = HandlerContext::new(
                    self.holds_authority.load(Ordering::SeqCst),
                    ParticipantId::from_uuid(envelope.origin),
                    request_id,
                );
                handler.handle(envelope.request, ctx).await
            }
            None => {
                tracing::warn!(operation, "No handler registered for operation");
                ResponseResult::error(
                    ErrorCode::UnknownOperation,
                    format!("No handler registered for {}", operation),
                )
            }
        };

        self.ledger.record(request_id, response.clone());
        response
    }
}

async fn run_authority(mut inbox: mpsc::Receiver<Delivery>, mut dispatcher: AuthorityDispatcher) {
    while let Some(delivery) = inbox.recv().await {
        if !dispatcher.holds_authority.load(Ordering::SeqCst) {
            // Dropping the reply answers every queued requester with `Closed`
            break;
        }
        let response = dispatcher.dispatch(delivery.envelope).await;
        if delivery.reply.send(response).is_err() {
            tracing::debug!("Requester stopped waiting before the authority answered");
        }
    }
    tracing::debug!("Authority worker stopped");
}
