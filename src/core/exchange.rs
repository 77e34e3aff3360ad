//! One ask/answer cycle between the user and the chat endpoint.
//!
//! The controller is either idle or awaiting a response. Submitting appends
//! the user message without saving it; the conversation is committed only
//! once a usable answer arrives, so a failed exchange never touches saved
//! history.
//!
//! Each request is tagged with the conversation it came from. If the user
//! has switched conversations by the time the answer lands, the answer is
//! saved into the originating conversation instead of being drawn into the
//! one on screen.

use crate::client::{AskReply, AskRequest, ChatEndpoint};
use crate::core::conversation::Role;
use crate::core::store::ConversationStore;
use crate::error::{Error, Result};
use crate::render::{self, BubbleId, BubbleKind, TYPING_TEXT, View};
use tracing::{debug, warn};

/// Shown when the endpoint answers without an `ai_response`.
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong.";

/// Shown when the request fails in transport.
pub const NETWORK_ERROR: &str = "Network error. Please try again.";

/// An exchange awaiting its response.
#[derive(Debug, Clone)]
struct PendingExchange {
    request: AskRequest,
    placeholder: BubbleId,
}

#[derive(Debug, Clone, Default)]
enum ExchangeState {
    #[default]
    Idle,
    AwaitingResponse(PendingExchange),
}

/// How a completed exchange was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// Answer drawn and the conversation committed.
    Answered,

    /// The user had switched away; the answer was saved into the
    /// originating conversation without being drawn.
    Rerouted,

    /// The originating conversation was deleted; the answer was dropped.
    Discarded,

    /// The endpoint replied without a usable answer.
    MissingAnswer,

    /// The request failed in transport.
    NetworkError,
}

/// Drives the idle / awaiting-response state machine.
#[derive(Debug, Default)]
pub struct ExchangeController {
    state: ExchangeState,
}

impl ExchangeController {
    /// Create an idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no request is outstanding.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.state, ExchangeState::Idle)
    }

    /// Start an exchange for `input`.
    ///
    /// Whitespace-only input changes nothing and yields `None`. Otherwise the
    /// user message is appended (unsaved) and drawn, a typing placeholder is
    /// drawn, and the request to send is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExchangeInFlight`] if a request is already outstanding.
    pub fn submit(
        &mut self,
        store: &mut ConversationStore,
        view: &mut dyn View,
        input: &str,
    ) -> Result<Option<AskRequest>> {
        if let ExchangeState::AwaitingResponse(pending) = &self.state {
            return Err(Error::ExchangeInFlight(
                pending.request.conversation_id.clone(),
            ));
        }

        let text = input.trim();
        if text.is_empty() {
            return Ok(None);
        }

        store.append(Role::User, text);
        view.push_bubble(BubbleKind::User, text);
        let placeholder = view.push_bubble(BubbleKind::Typing, TYPING_TEXT);

        let request = AskRequest {
            message: text.to_string(),
            conversation_id: store.current_id().to_string(),
        };
        debug!(conversation = %request.conversation_id, "exchange awaiting response");
        self.state = ExchangeState::AwaitingResponse(PendingExchange {
            request: request.clone(),
            placeholder,
        });
        Ok(Some(request))
    }

    /// Finish the outstanding exchange with the endpoint's result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if no exchange is outstanding.
    pub fn complete(
        &mut self,
        store: &mut ConversationStore,
        view: &mut dyn View,
        result: Result<AskReply>,
    ) -> Result<ExchangeOutcome> {
        let ExchangeState::AwaitingResponse(pending) = std::mem::take(&mut self.state) else {
            return Err(Error::InvalidState(
                "no exchange is awaiting a response".to_string(),
            ));
        };
        view.remove_bubble(pending.placeholder);

        let origin = pending.request.conversation_id.as_str();
        let still_current = store.current_id() == origin;

        let outcome = match result {
            Ok(reply) => match reply.usable_answer() {
                Some(answer) if still_current => {
                    store.append(Role::Assistant, answer);
                    view.push_bubble(BubbleKind::Bot, answer);
                    store.commit();
                    render::render_sidebar(view, store);
                    ExchangeOutcome::Answered
                }
                Some(answer) => {
                    if store.append_to(origin, Role::Assistant, answer).is_ok() {
                        warn!(conversation = %origin, "answer arrived after switching; saved without rendering");
                        render::render_sidebar(view, store);
                        ExchangeOutcome::Rerouted
                    } else {
                        warn!(conversation = %origin, "answer arrived for a deleted conversation; dropped");
                        ExchangeOutcome::Discarded
                    }
                }
                None => {
                    warn!(conversation = %origin, "response is missing ai_response");
                    if still_current {
                        view.push_bubble(BubbleKind::Bot, SOMETHING_WENT_WRONG);
                    }
                    ExchangeOutcome::MissingAnswer
                }
            },
            Err(e) => {
                warn!(conversation = %origin, error = %e, "chat request failed");
                if still_current {
                    view.push_bubble(BubbleKind::Bot, NETWORK_ERROR);
                }
                ExchangeOutcome::NetworkError
            }
        };

        debug!(conversation = %origin, ?outcome, "exchange complete");
        Ok(outcome)
    }

    /// Submit `input`, call `endpoint`, and complete the exchange.
    ///
    /// Returns `None` when the input was blank and nothing was sent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExchangeInFlight`] if a request is already outstanding.
    /// Endpoint failures are not errors; they resolve the exchange.
    pub fn run(
        &mut self,
        store: &mut ConversationStore,
        view: &mut dyn View,
        endpoint: &dyn ChatEndpoint,
        input: &str,
    ) -> Result<Option<ExchangeOutcome>> {
        let Some(request) = self.submit(store, view, input)? else {
            return Ok(None);
        };
        let result = endpoint.ask(&request);
        self.complete(store, view, result).map(Some)
    }
}
