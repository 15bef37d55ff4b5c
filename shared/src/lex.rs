//! Lex V2 event and response models.
//!
//! The inbound intent-recognition event and the two legal dialog responses
//! (`ElicitSlot` and `Close`) are modeled as explicit structs so that a
//! malformed event fails at the deserialization boundary instead of at an
//! arbitrary field access inside a handler.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Slot elicited by the shipment clarification flow.
pub const ITEM_SLOT: &str = "item";
/// Intent name for shipment-status lookups.
pub const SHIPMENT_INTENT: &str = "Shipment";
/// Intent name for product recommendations.
pub const RECOMMEND_INTENT: &str = "Recommend";

/// Inbound Lex V2 intent-recognition event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    pub session_state: SessionState,
    pub session_id: String,
    /// Non-empty whenever Lex dispatches a slot-bearing intent
    #[serde(default)]
    pub interpretations: Vec<Interpretation>,
    #[serde(default)]
    pub request_attributes: Option<HashMap<String, String>>,
}

/// Session state carried on the inbound event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub intent: Intent,
    #[serde(default)]
    pub session_attributes: Option<HashMap<String, String>>,
}

/// A recognized intent with its slot values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub name: String,
    /// Slot name to slot value; an unfilled slot is an explicit `null`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<HashMap<String, Option<Slot>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<FulfillmentState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_state: Option<String>,
}

/// One NLU interpretation of the user utterance.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interpretation {
    pub intent: Intent,
}

/// A filled slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<SlotValue>,
}

/// Value of a filled slot; `original_value` is the raw user text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreted_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_values: Option<Vec<String>>,
}

/// Terminal state of an intent turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FulfillmentState {
    InProgress,
    Fulfilled,
    Failed,
}

/// Dialog action kind on the outbound response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DialogActionType {
    ElicitSlot,
    Close,
}

/// Dialog action on the outbound response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogAction {
    #[serde(rename = "type")]
    pub action_type: DialogActionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_to_elicit: Option<String>,
}

/// A single message shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub content_type: String,
    pub content: String,
}

impl Message {
    /// Plain-text message.
    pub fn plain_text(content: impl Into<String>) -> Self {
        Self {
            content_type: "PlainText".to_string(),
            content: content.into(),
        }
    }
}

/// Outbound Lex V2 dialog response.
///
/// `messages` and `request_attributes` serialize as JSON `null` when absent;
/// `session_id` is only present on `Close` responses and is omitted entirely
/// otherwise.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResponse {
    pub session_state: ResponseSessionState,
    pub messages: Option<Vec<Message>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub request_attributes: Option<HashMap<String, String>>,
}

/// Session state on the outbound response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSessionState {
    pub dialog_action: DialogAction,
    pub intent: Intent,
    pub session_attributes: HashMap<String, String>,
}

/// Session attributes carried on the request, or an empty map when absent.
pub fn session_attributes(request: &IntentRequest) -> HashMap<String, String> {
    request
        .session_state
        .session_attributes
        .clone()
        .unwrap_or_default()
}

/// Build an `ElicitSlot` response asking the user for the `item` slot.
///
/// Carries the slot map from the first interpretation so the re-prompted
/// intent keeps whatever was already filled. `message` is optional; when
/// absent the `messages` field round-trips as JSON `null`.
pub fn elicit_slot(
    request: &IntentRequest,
    session_attributes: HashMap<String, String>,
    message: Option<Message>,
) -> Result<IntentResponse> {
    let interpretation = request
        .interpretations
        .first()
        .ok_or_else(|| Error::MalformedEvent("event carries no interpretations".to_string()))?;

    Ok(IntentResponse {
        session_state: ResponseSessionState {
            dialog_action: DialogAction {
                action_type: DialogActionType::ElicitSlot,
                slot_to_elicit: Some(ITEM_SLOT.to_string()),
            },
            intent: Intent {
                name: SHIPMENT_INTENT.to_string(),
                slots: interpretation.intent.slots.clone(),
                state: None,
                confirmation_state: None,
            },
            session_attributes,
        },
        messages: message.map(|m| vec![m]),
        session_id: None,
        request_attributes: request.request_attributes.clone(),
    })
}

/// Build a `Close` response ending the turn with `fulfillment_state`.
///
/// The request intent is carried on the response with its `state` set to
/// `fulfillment_state`, along with the original session id.
pub fn close(
    request: &IntentRequest,
    session_attributes: HashMap<String, String>,
    fulfillment_state: FulfillmentState,
    message: Message,
) -> IntentResponse {
    let mut intent = request.session_state.intent.clone();
    intent.state = Some(fulfillment_state);

    IntentResponse {
        session_state: ResponseSessionState {
            dialog_action: DialogAction {
                action_type: DialogActionType::Close,
                slot_to_elicit: None,
            },
            intent,
            session_attributes,
        },
        messages: Some(vec![message]),
        session_id: Some(request.session_id.clone()),
        request_attributes: request.request_attributes.clone(),
    }
}
