//! Inbound event decoding for the quote stream.
//!
//! The aggregation service pushes one JSON object per event. Three shapes
//! are recognized:
//!
//! ```jsonc
//! { "type": "connected" }          // handshake, carries no data
//! { "error": "no_route" }          // application-level error outcome
//! { "quoteId": "...", ... }        // a full trade quote
//! ```
//!
//! Anything else — unparseable JSON, an unrecognized shape, or a quote whose
//! settlement payload is not valid hex — is a parse error. The connection
//! stays open on parse errors; the next valid message recovers.

use corelib::models::swap_models::SwapQuote;
use serde_json::Value;

use crate::error::QuoteStreamError;

/// Typed outcome of one inbound stream event.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// Handshake emitted right after the connection opens.
    Connected,
    /// Application-level error reported by the service.
    ServiceError(String),
    /// A fresh trade quote.
    Quote(Box<SwapQuote>),
}

pub fn parse_stream_event(raw: &str) -> Result<StreamEvent, QuoteStreamError> {
    let json: Value =
        serde_json::from_str(raw).map_err(|e| QuoteStreamError::Parse(e.to_string()))?;

    if json.get("type").and_then(Value::as_str) == Some("connected") {
        return Ok(StreamEvent::Connected);
    }

    if let Some(message) = json.get("error").and_then(Value::as_str) {
        return Ok(StreamEvent::ServiceError(message.to_string()));
    }

    let quote: SwapQuote =
        serde_json::from_value(json).map_err(|e| QuoteStreamError::Parse(e.to_string()))?;

    // A quote whose settlement payload cannot be decoded is unusable and
    // must not surface as a valid confirmation.
    for message in &quote.messages {
        if message.payload_bytes().is_err() {
            return Err(QuoteStreamError::Parse(format!(
                "invalid settlement payload for {}",
                message.target_address
            )));
        }
    }

    Ok(StreamEvent::Quote(Box::new(quote)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quote_json() -> Value {
        json!({
            "messages": [{
                "targetAddress": "EQRouter",
                "sendAmount": "1000000000",
                "payload": "b5ee9c72"
            }],
            "quoteId": "QID1",
            "resolverName": "resolver-one",
            "askUnits": "2500000",
            "bidUnits": "1000000000",
            "protocolFeeUnits": "1000",
            "tradeStartDeadline": "4102444800",
            "gasBudget": "300000000",
            "estimatedGasConsumption": "120000000",
            "slippage": 50
        })
    }

    #[test]
    fn handshake_is_recognized() {
        let event = parse_stream_event(r#"{ "type": "connected" }"#).unwrap();
        assert!(matches!(event, StreamEvent::Connected));
    }

    #[test]
    fn error_payload_becomes_service_error() {
        let event = parse_stream_event(r#"{ "error": "no_route" }"#).unwrap();
        match event {
            StreamEvent::ServiceError(message) => assert_eq!(message, "no_route"),
            other => panic!("expected ServiceError, got {other:?}"),
        }
    }

    #[test]
    fn quote_payload_is_decoded() {
        let raw = quote_json().to_string();
        let event = parse_stream_event(&raw).unwrap();
        match event {
            StreamEvent::Quote(quote) => {
                assert_eq!(quote.quote_id, "QID1");
                assert_eq!(quote.resolver_name, "resolver-one");
                assert_eq!(quote.slippage, 50);
            }
            other => panic!("expected Quote, got {other:?}"),
        }
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = parse_stream_event("{ not json").unwrap_err();
        assert!(matches!(err, QuoteStreamError::Parse(_)));
    }

    #[test]
    fn unrecognized_shape_is_a_parse_error() {
        let err = parse_stream_event(r#"{ "something": "else" }"#).unwrap_err();
        assert!(matches!(err, QuoteStreamError::Parse(_)));
    }

    #[test]
    fn quote_with_undecodable_payload_is_rejected() {
        let mut raw = quote_json();
        raw["messages"][0]["payload"] = json!("zzzz");
        let err = parse_stream_event(&raw.to_string()).unwrap_err();
        assert!(matches!(err, QuoteStreamError::Parse(_)));
    }
}
