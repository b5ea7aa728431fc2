//! Wire handlers - decode, dispatch to the registry, encode.

use crate::application::SessionRegistry;
use crate::domain::foundation::SessionId;
use crate::domain::transcript::{Speaker, TranscriptLine};

use super::dto::{ErrorResponse, SubmitTurnRequest, SubmitTurnResponse};

/// Submits one turn described by a wire request.
pub async fn submit_turn(
    registry: &SessionRegistry,
    request: SubmitTurnRequest,
) -> Result<SubmitTurnResponse, ErrorResponse> {
    let session_id = request
        .session_id
        .parse::<SessionId>()
        .map_err(|_| ErrorResponse::bad_request(format!("Invalid session id: {}", request.session_id)))?;
    let speaker = request
        .speaker
        .parse::<Speaker>()
        .map_err(|e| ErrorResponse::bad_request(e.to_string()))?;

    let outcome = registry
        .submit(session_id, TranscriptLine::new(speaker, request.text))
        .await?;
    Ok(outcome.into())
}

/// JSON-in, JSON-out variant of [`submit_turn`]. Errors are encoded as
/// `ErrorResponse` bodies.
pub async fn submit_turn_json(registry: &SessionRegistry, body: &str) -> String {
    let result = match serde_json::from_str::<SubmitTurnRequest>(body) {
        Ok(request) => submit_turn(registry, request).await,
        Err(e) => Err(ErrorResponse::bad_request(format!("Malformed request: {}", e))),
    };

    let encoded = match &result {
        Ok(response) => serde_json::to_string(response),
        Err(error) => serde_json::to_string(error),
    };
    encoded.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to encode wire response");
        r#"{"code":"INTERNAL_ERROR","message":"encoding failed"}"#.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryTranscriptStore;
    use crate::application::{RegistrySettings, TurnLogger};
    use crate::domain::analysis::{CallPhase, ConversationAnalyzer};
    use crate::domain::foundation::SessionStatus;
    use std::sync::Arc;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(
            TurnLogger::new(
                ConversationAnalyzer::default(),
                Arc::new(InMemoryTranscriptStore::new()),
            ),
            RegistrySettings::default(),
        )
    }

    fn request(id: &str, speaker: &str, text: &str) -> SubmitTurnRequest {
        SubmitTurnRequest {
            session_id: id.to_string(),
            speaker: speaker.to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn valid_request_returns_state() {
        let registry = registry();
        let id = registry.create(20).await.unwrap();

        let response = submit_turn(&registry, request(&id.to_string(), "user", "Tell me about your team."))
            .await
            .unwrap();
        assert_eq!(response.phase, CallPhase::Discovery);
        assert_eq!(response.lifecycle_state, SessionStatus::Active);
        assert!(!response.force_wrap_up);
    }

    #[tokio::test]
    async fn unknown_speaker_is_a_validation_error() {
        let registry = registry();
        let id = registry.create(20).await.unwrap();

        let error = submit_turn(&registry, request(&id.to_string(), "buyer", "Hi"))
            .await
            .unwrap_err();
        assert_eq!(error.code, "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn malformed_session_id_is_a_validation_error() {
        let error = submit_turn(&registry(), request("not-a-uuid", "user", "Hi"))
            .await
            .unwrap_err();
        assert_eq!(error.code, "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn unknown_session_maps_to_not_found() {
        let error = submit_turn(&registry(), request(&SessionId::new().to_string(), "user", "Hi"))
            .await
            .unwrap_err();
        assert_eq!(error.code, "SESSION_NOT_FOUND");
    }

    #[tokio::test]
    async fn json_round_trip() {
        let registry = registry();
        let id = registry.create(20).await.unwrap();

        let body = format!(r#"{{"session_id":"{}","speaker":"user","text":"How are you?"}}"#, id);
        let reply = submit_turn_json(&registry, &body).await;
        let response: SubmitTurnResponse = serde_json::from_str(&reply).unwrap();
        assert_eq!(response.rapport_score, 0);

        let reply = submit_turn_json(&registry, "{not json").await;
        let error: ErrorResponse = serde_json::from_str(&reply).unwrap();
        assert_eq!(error.code, "VALIDATION_FAILED");
    }
}
