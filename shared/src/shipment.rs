//! Shipment-status intent handler.
//!
//! Looks up the `item` slot against the purchase catalog and either closes
//! the turn with a tracking status or re-prompts the user for a known item.

use rand::Rng;

use crate::lex::{self, FulfillmentState, IntentRequest, IntentResponse, Message};
use crate::{Error, Result};

/// Items with purchase history eligible for a status lookup.
const ITEMS: [&str; 3] = ["아이폰", "매직키보드", "포카리스웨트"];

/// Tracking statuses, one picked at random per lookup.
const TRACKING_STATUSES: [&str; 4] = ["상품준비중", "배송준비중", "배송중", "배송완료"];

/// Handle a `Shipment` intent with the process-wide randomness source.
pub fn handle(request: &IntentRequest) -> Result<IntentResponse> {
    handle_with_rng(request, &mut rand::thread_rng())
}

/// Handle a `Shipment` intent, picking the tracking status with `rng`.
pub fn handle_with_rng<R: Rng>(request: &IntentRequest, rng: &mut R) -> Result<IntentResponse> {
    let session_attributes = lex::session_attributes(request);

    match item_slot_value(request)? {
        Some(item) if ITEMS.contains(&item.as_str()) => {
            let status = TRACKING_STATUSES[rng.gen_range(0..TRACKING_STATUSES.len())];
            let message = Message::plain_text(format!("{}는 {} 입니다", item, status));
            Ok(lex::close(
                request,
                session_attributes,
                FulfillmentState::Fulfilled,
                message,
            ))
        }
        Some(item) => {
            let mut text = format!(
                "{}에 대한 구매이력이 없습니다. 어떤 상품에 대한 배송상태를 확인하고 싶으신가요? \n \n",
                item
            );
            for item in ITEMS {
                text.push_str(&format!("{} \n", item));
            }
            lex::elicit_slot(request, session_attributes, Some(Message::plain_text(text)))
        }
        None => {
            let mut text =
                "어떤 상품에 대한 배송상태를 확인하고 싶으신가요? \n \n".to_string();
            for item in ITEMS {
                text.push_str(&format!("{} \n", item));
            }
            lex::elicit_slot(request, session_attributes, Some(Message::plain_text(text)))
        }
    }
}

/// Raw user text of the `item` slot from the first interpretation.
///
/// Returns `None` when the slot is present but unfilled; a missing slot map,
/// a missing `item` entry, or a filled slot without an `originalValue` is a
/// malformed event.
fn item_slot_value(request: &IntentRequest) -> Result<Option<String>> {
    let interpretation = request
        .interpretations
        .first()
        .ok_or_else(|| Error::MalformedEvent("event carries no interpretations".to_string()))?;

    let slots = interpretation
        .intent
        .slots
        .as_ref()
        .ok_or_else(|| Error::MalformedEvent("intent carries no slot map".to_string()))?;

    let slot = slots
        .get(lex::ITEM_SLOT)
        .ok_or_else(|| Error::MalformedEvent("slot map has no item entry".to_string()))?;

    match slot {
        None => Ok(None),
        Some(slot) => slot
            .value
            .as_ref()
            .and_then(|value| value.original_value.clone())
            .map(Some)
            .ok_or_else(|| {
                Error::MalformedEvent("filled item slot has no originalValue".to_string())
            }),
    }
}
