use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::state::{Session, SharedSession, TurnPhase};
use super::transcript::Turn;
use crate::app::Config;
use crate::constants::APOLOGY_PREFIX;
use crate::dialogue::{CandidateSet, PromptComposer};
use crate::extraction::{EntityExtractor, Intent, IntentClassifier};
use crate::models::{build_messages, CompletionClient, SamplingParams, TokenUsage};
use crate::utils::FoodScoutError;

/// What one turn produced, for hosts that report more than the reply
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    /// Text appended as the assistant side of the turn
    pub reply: String,
    /// Description of the completion failure, if the reply is an apology
    pub error: Option<String>,
    pub candidates: CandidateSet,
    pub intent: Intent,
    pub usage: Option<TokenUsage>,
    pub duration_ms: u128,
}

impl TurnOutcome {
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// The session loop: extract, update state, compose, complete, append.
///
/// Holds no conversation state of its own, so one `Assistant` can serve
/// any number of sessions.
pub struct Assistant {
    client: Arc<dyn CompletionClient>,
    extractor: EntityExtractor,
    classifier: IntentClassifier,
    composer: PromptComposer,
    params: SamplingParams,
}

impl Assistant {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        extractor: EntityExtractor,
        params: SamplingParams,
    ) -> Self {
        Self {
            client,
            extractor,
            classifier: IntentClassifier::new(),
            composer: PromptComposer::new(),
            params,
        }
    }

    /// Assistant wired from configuration
    pub fn from_config(client: Arc<dyn CompletionClient>, config: &Config) -> Self {
        Self::new(
            client,
            EntityExtractor::from_config(&config.extraction),
            SamplingParams::from(&config.completion),
        )
    }

    pub fn model_name(&self) -> String {
        self.client.name()
    }

    pub fn composer(&self) -> &PromptComposer {
        &self.composer
    }

    /// Run one turn against `session`.
    ///
    /// Completion failures never escape: they become an apology reply and
    /// the turn is still appended, so the session stays usable.
    pub async fn process_turn(&self, session: &mut Session, utterance: &str) -> TurnOutcome {
        let started = Instant::now();

        if !session.phase().is_idle() {
            warn!(
                "Previous turn was abandoned in {:?}; resetting to idle",
                session.phase()
            );
        }

        session.set_phase(TurnPhase::Extracting);
        let candidates = self.extractor.extract(utterance);
        let intent = self.classifier.predict(utterance);
        debug!("Intent: {}", intent);

        session.slots_mut().apply(&candidates);
        session.set_phase(TurnPhase::StateUpdated);
        debug!("Missing slots: {:?}", session.slots().missing());

        let system_prompt = self.composer.compose(session.slots());
        let messages = build_messages(&system_prompt, session.transcript().turns(), utterance);
        session.set_phase(TurnPhase::PromptComposed);

        session.set_phase(TurnPhase::AwaitingCompletion);
        let (reply, error, usage) = match self.client.complete(&messages, &self.params).await {
            Ok(response) => (response.content, None, response.usage),
            Err(e) => {
                let e = as_completion_failure(e);
                warn!("Error processing query: {}", e);
                (format!("{} {}", APOLOGY_PREFIX, e), Some(e.to_string()), None)
            }
        };

        session.finish_turn(Turn::new(utterance, reply.clone(), error.is_some()));
        info!(
            "Turn {} complete ({} ms)",
            session.transcript().len(),
            started.elapsed().as_millis()
        );

        TurnOutcome {
            reply,
            error,
            candidates,
            intent,
            usage,
            duration_ms: started.elapsed().as_millis(),
        }
    }

    /// Run one turn on a shared session, holding its lock for the whole turn
    pub async fn process_shared(&self, session: &SharedSession, utterance: &str) -> TurnOutcome {
        let mut guard = session.lock().await;
        self.process_turn(&mut guard, utterance).await
    }
}

/// Anything a client raises during `complete` counts as a completion failure
fn as_completion_failure(err: FoodScoutError) -> FoodScoutError {
    if err.is_completion_failure() {
        err
    } else {
        FoodScoutError::Completion(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::SlotName;
    use crate::models::{ChatMessage, CompletionResponse, MessageRole, MockCompletionClient};
    use pretty_assertions::assert_eq;

    fn reply(text: &str) -> Result<CompletionResponse, FoodScoutError> {
        Ok(CompletionResponse {
            content: text.to_string(),
            usage: None,
            model_name: "mock".to_string(),
        })
    }

    fn assistant_with(mock: MockCompletionClient) -> Assistant {
        Assistant::new(
            Arc::new(mock),
            EntityExtractor::default(),
            SamplingParams::default(),
        )
    }

    #[tokio::test]
    async fn test_vegan_brunch_in_austin_end_to_end() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .withf(|messages: &[ChatMessage], _params: &SamplingParams| {
                messages.len() == 2
                    && messages[0].role == MessageRole::System
                    && messages[0].content.contains("\"location\":\"Austin\"")
                    && messages[1].content == "Find vegan brunch in Austin"
            })
            .times(1)
            .returning(|_, _| reply("What kind of cuisine are you craving?"));

        let assistant = assistant_with(mock);
        let mut session = Session::new();
        let outcome = assistant
            .process_turn(&mut session, "Find vegan brunch in Austin")
            .await;

        assert_eq!(outcome.candidates.location, vec!["Austin".to_string()]);
        assert_eq!(outcome.candidates.diet_restrictions, vec!["vegan".to_string()]);
        assert_eq!(session.slots().location(), Some("Austin"));
        assert_eq!(session.slots().diet_restrictions(), ["vegan".to_string()]);

        let missing = assistant.composer().missing_info(session.slots());
        for slot in [SlotName::CuisineType, SlotName::Budget, SlotName::Mood] {
            assert!(missing.get(slot.as_str()).is_some(), "{} should be missing", slot);
        }
        for slot in [SlotName::Location, SlotName::DietRestrictions] {
            assert!(missing.get(slot.as_str()).is_none(), "{} should be filled", slot);
        }

        assert!(!outcome.failed());
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(
            session.transcript().turns()[0].assistant,
            "What kind of cuisine are you craving?"
        );
        assert!(session.phase().is_idle());
    }

    #[tokio::test]
    async fn test_history_is_sent_in_order() {
        let mut mock = MockCompletionClient::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| reply("Where are you?"));
        mock.expect_complete()
            .withf(|messages: &[ChatMessage], _params: &SamplingParams| {
                let roles: Vec<MessageRole> = messages.iter().map(|m| m.role).collect();
                roles
                    == vec![
                        MessageRole::System,
                        MessageRole::User,
                        MessageRole::Assistant,
                        MessageRole::User,
                    ]
                    && messages[1].content == "hi"
                    && messages[2].content == "Where are you?"
                    && messages[3].content == "Dallas"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| reply("Dallas it is."));

        let assistant = assistant_with(mock);
        let mut session = Session::new();
        assistant.process_turn(&mut session, "hi").await;
        assistant.process_turn(&mut session, "Dallas").await;

        assert_eq!(session.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_completion_failure_appends_apology_and_session_continues() {
        let mut mock = MockCompletionClient::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Err(FoodScoutError::Api {
                    status: 429,
                    body: "quota exceeded".to_string(),
                })
            });
        mock.expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| reply("Back on track!"));

        let assistant = assistant_with(mock);
        let mut session = Session::new();

        let outcome = assistant.process_turn(&mut session, "thai in Austin").await;
        assert!(outcome.failed());
        assert_eq!(session.transcript().len(), 1);
        let failed_turn = &session.transcript().turns()[0];
        assert!(failed_turn.failed);
        assert!(failed_turn.assistant.starts_with(APOLOGY_PREFIX));
        assert!(failed_turn.assistant.contains("quota exceeded"));
        // Slot updates from the failed turn are kept
        assert_eq!(session.slots().cuisine_type(), Some("thai"));

        let outcome = assistant.process_turn(&mut session, "anything cozy").await;
        assert!(!outcome.failed());
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.slots().mood(), ["cozy".to_string()]);
    }

    #[tokio::test]
    async fn test_unclassified_client_error_reported_as_completion_failure() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete().times(1).returning(|_, _| {
            Err(FoodScoutError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "socket closed",
            )))
        });

        let assistant = assistant_with(mock);
        let mut session = Session::new();
        let outcome = assistant.process_turn(&mut session, "hello").await;

        assert_eq!(
            outcome.error.as_deref(),
            Some("Completion error: IO error: socket closed")
        );
        assert!(session.transcript().turns()[0].failed);
        assert!(session.phase().is_idle());
    }

    #[tokio::test]
    async fn test_scalar_slot_keeps_first_value_across_turns() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .times(2)
            .returning(|_, _| reply("Noted."));

        let assistant = assistant_with(mock);
        let mut session = Session::new();
        assistant.process_turn(&mut session, "Dinner in Austin").await;
        assistant
            .process_turn(&mut session, "actually, Dallas instead")
            .await;

        assert_eq!(session.slots().location(), Some("Austin"));
    }

    #[tokio::test]
    async fn test_clear_after_turns() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete().returning(|_, _| reply("Sure."));

        let assistant = assistant_with(mock);
        let session = Session::new().shared();
        assistant
            .process_shared(&session, "cheap halal food under $15 in Chicago")
            .await;

        let mut guard = session.lock().await;
        assert_eq!(guard.slots().budget(), Some("under $15"));
        guard.clear().unwrap();
        assert!(guard.slots().is_empty());
        assert!(guard.transcript().is_empty());
    }
}
