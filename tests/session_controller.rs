use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use polychat::core::error::{InvalidTransition, ProviderError};
use polychat::providers::{ClientRegistry, Provider, ProviderClient, SimulatedClient};
use polychat::session::{
    ChatSessionController, Message, Resolution, Role, SessionMode, THINKING_SUFFIX,
};

/// Replays scripted outcomes and records every call it receives.
#[derive(Default)]
struct ScriptedClient {
    outcomes: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedClient {
    fn with(outcomes: Vec<Result<String, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl ProviderClient for ScriptedClient {
    fn provider(&self) -> Provider {
        Provider::OpenAI
    }

    async fn send(&self, prompt: &str, credential: &str) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((prompt.to_string(), credential.to_string()));
        self.outcomes
            .lock()
            .expect("outcomes lock")
            .pop_front()
            .unwrap_or(Err(ProviderError::EmptyResponse))
    }
}

fn simulated_controller() -> ChatSessionController {
    ChatSessionController::new(Arc::new(ClientRegistry::simulated()))
}

fn scripted_controller(
    outcomes: Vec<Result<String, ProviderError>>,
) -> (ChatSessionController, Arc<ScriptedClient>) {
    let client = ScriptedClient::with(outcomes);
    let mut registry = ClientRegistry::simulated();
    registry.register(Provider::OpenAI, client.clone());
    (ChatSessionController::new(Arc::new(registry)), client)
}

fn chatting(controller: &mut ChatSessionController, provider: Provider, key: &str) {
    controller.select_provider(provider);
    controller.submit_credential(key).expect("credential accepted");
}

fn texts(controller: &ChatSessionController) -> Vec<(Role, String)> {
    controller
        .state()
        .transcript()
        .iter()
        .map(|m| (m.role, m.text().into_owned()))
        .collect()
}

#[test]
fn starts_out_needing_a_provider() {
    let controller = simulated_controller();
    assert_eq!(controller.mode(), SessionMode::NeedsProvider);
    assert!(controller.state().transcript().is_empty());
    assert!(!controller.state().has_credential());
}

#[tokio::test]
async fn openai_end_to_end_with_simulated_client() {
    let mut controller = simulated_controller();

    controller.select_provider(Provider::OpenAI);
    controller.submit_credential("sk-test").unwrap();
    assert_eq!(controller.mode(), SessionMode::Chatting);
    assert!(controller.state().transcript().is_empty());

    controller.submit_message("Hello").unwrap();
    assert_eq!(
        texts(&controller),
        vec![
            (Role::User, "Hello".to_string()),
            (Role::Assistant, "OpenAI is thinking...".to_string()),
        ]
    );

    assert_eq!(controller.resolve_pending().await, Resolution::Resolved);
    let transcript = controller.state().transcript();
    assert_eq!(transcript.len(), 2);
    let last = transcript.last().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert!(!last.is_pending());
    assert_eq!(last.text(), SimulatedClient::reply_for(Provider::OpenAI, "Hello"));
    assert!(last.text().contains("OpenAI"));
    assert!(last.text().contains("Hello"));
}

#[test]
fn changing_provider_resets_credential_transcript_and_flags() {
    let mut controller = simulated_controller();
    chatting(&mut controller, Provider::Claude, "key-1");
    controller.submit_message("hi").unwrap();
    controller.toggle_settings().unwrap();

    for provider in [Provider::Gemini, Provider::Groq, Provider::Claude] {
        assert!(controller.select_provider(provider));
        let state = controller.state();
        assert_eq!(state.provider(), Some(provider));
        assert!(!state.has_credential());
        assert!(state.transcript().is_empty());
        assert!(!state.settings_visible());
        assert!(!state.credential_just_set());
        assert_eq!(controller.mode(), SessionMode::NeedsCredential);
    }
}

#[test]
fn reselecting_the_current_provider_is_a_no_op() {
    let mut controller = simulated_controller();
    chatting(&mut controller, Provider::Gemini, "g-key");
    controller.submit_message("hi").unwrap();
    let before = texts(&controller);
    let generation = controller.state().generation();

    assert!(!controller.select_provider(Provider::Gemini));
    assert_eq!(texts(&controller), before);
    assert!(controller.state().has_credential());
    assert_eq!(controller.state().generation(), generation);
    assert_eq!(controller.mode(), SessionMode::Chatting);
}

#[test]
fn empty_credential_never_changes_state() {
    let mut controller = simulated_controller();
    controller.select_provider(Provider::Groq);

    assert_eq!(
        controller.submit_credential(""),
        Err(InvalidTransition::EmptyCredential)
    );
    assert!(!controller.state().has_credential());
    assert!(!controller.state().credential_just_set());
    assert_eq!(controller.mode(), SessionMode::NeedsCredential);
}

#[test]
fn credential_requires_a_provider_and_an_open_credential_prompt() {
    let mut controller = simulated_controller();
    assert_eq!(
        controller.submit_credential("key"),
        Err(InvalidTransition::NoProvider)
    );

    chatting(&mut controller, Provider::OpenAI, "key");
    assert_eq!(
        controller.submit_credential("other"),
        Err(InvalidTransition::SettingsClosed)
    );
}

#[test]
fn credential_notice_is_one_shot() {
    let mut controller = simulated_controller();
    chatting(&mut controller, Provider::OpenAI, "sk-test");

    assert!(controller.state().credential_just_set());
    assert!(controller.take_credential_notice());
    assert!(!controller.take_credential_notice());
}

#[test]
fn settings_toggle_only_once_a_credential_exists() {
    let mut controller = simulated_controller();
    assert_eq!(controller.toggle_settings(), Err(InvalidTransition::NoProvider));

    controller.select_provider(Provider::Claude);
    assert_eq!(controller.toggle_settings(), Err(InvalidTransition::NoCredential));

    controller.submit_credential("key").unwrap();
    controller.toggle_settings().unwrap();
    assert_eq!(controller.mode(), SessionMode::SettingsOpen);
    controller.toggle_settings().unwrap();
    assert_eq!(controller.mode(), SessionMode::Chatting);
}

#[test]
fn new_credential_from_settings_returns_to_chat_and_keeps_transcript() {
    let mut controller = simulated_controller();
    chatting(&mut controller, Provider::OpenAI, "old");
    controller.take_credential_notice();
    controller.submit_message("hi").unwrap();

    controller.toggle_settings().unwrap();
    controller.submit_credential("new").unwrap();

    assert_eq!(controller.mode(), SessionMode::Chatting);
    assert!(!controller.state().settings_visible());
    assert!(controller.state().credential_just_set());
    assert_eq!(controller.state().transcript().len(), 2);
}

#[tokio::test]
async fn clear_chat_empties_transcript_and_keeps_provider_and_credential() {
    let (mut controller, client) = scripted_controller(vec![Ok("first".to_string())]);
    chatting(&mut controller, Provider::OpenAI, "sk-test");
    controller.submit_message("one").unwrap();
    controller.resolve_pending().await;

    controller.clear_chat().unwrap();
    assert!(controller.state().transcript().is_empty());
    assert_eq!(controller.state().provider(), Some(Provider::OpenAI));
    assert_eq!(controller.mode(), SessionMode::Chatting);

    controller.toggle_settings().unwrap();
    controller.clear_chat().unwrap();
    assert_eq!(controller.mode(), SessionMode::SettingsOpen);

    assert_eq!(client.calls().len(), 1);
}

#[test]
fn phase_one_appends_exactly_user_and_placeholder() {
    let mut controller = simulated_controller();
    chatting(&mut controller, Provider::Claude, "key");

    controller.submit_message("first question").unwrap();
    let transcript = controller.state().transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0], Message::user("first question"));
    assert!(transcript[1].is_pending());
    assert!(transcript[1].text().ends_with(THINKING_SUFFIX));
    assert!(controller.state().is_awaiting_response());
}

#[test]
fn submissions_are_rejected_while_a_placeholder_is_pending() {
    let mut controller = simulated_controller();
    chatting(&mut controller, Provider::Claude, "key");
    controller.submit_message("first").unwrap();

    assert_eq!(
        controller.submit_message("second"),
        Err(InvalidTransition::ResponsePending)
    );
    assert_eq!(controller.state().transcript().len(), 2);
}

#[test]
fn messages_need_chat_mode_and_text() {
    let mut controller = simulated_controller();
    assert_eq!(controller.submit_message("hi"), Err(InvalidTransition::NoProvider));

    controller.select_provider(Provider::OpenAI);
    assert_eq!(controller.submit_message("hi"), Err(InvalidTransition::NoCredential));

    controller.submit_credential("key").unwrap();
    assert_eq!(controller.submit_message("   "), Err(InvalidTransition::EmptyMessage));

    controller.toggle_settings().unwrap();
    assert_eq!(controller.submit_message("hi"), Err(InvalidTransition::SettingsOpen));
    assert!(controller.state().transcript().is_empty());
}

#[tokio::test]
async fn phase_two_replaces_in_place_with_the_exact_answer() {
    let (mut controller, client) = scripted_controller(vec![
        Ok("answer one".to_string()),
        Ok("answer two".to_string()),
    ]);
    chatting(&mut controller, Provider::OpenAI, "sk-test");

    controller.submit_message("q1").unwrap();
    assert_eq!(controller.resolve_pending().await, Resolution::Resolved);
    controller.submit_message("q2").unwrap();
    assert_eq!(controller.state().transcript().len(), 4);
    assert_eq!(controller.resolve_pending().await, Resolution::Resolved);

    assert_eq!(
        texts(&controller),
        vec![
            (Role::User, "q1".to_string()),
            (Role::Assistant, "answer one".to_string()),
            (Role::User, "q2".to_string()),
            (Role::Assistant, "answer two".to_string()),
        ]
    );
    // Only the latest user message is sent, with the session's credential.
    assert_eq!(
        client.calls(),
        vec![
            ("q1".to_string(), "sk-test".to_string()),
            ("q2".to_string(), "sk-test".to_string()),
        ]
    );
}

#[tokio::test]
async fn phase_two_without_a_placeholder_is_a_no_op() {
    let (mut controller, client) = scripted_controller(vec![Ok("unused".to_string())]);
    assert_eq!(controller.resolve_pending().await, Resolution::Idle);

    chatting(&mut controller, Provider::OpenAI, "sk-test");
    assert_eq!(controller.resolve_pending().await, Resolution::Idle);

    controller.submit_message("q").unwrap();
    controller.resolve_pending().await;
    assert_eq!(controller.resolve_pending().await, Resolution::Idle);

    assert_eq!(client.calls().len(), 1);
    assert_eq!(controller.state().transcript().len(), 2);
}

#[tokio::test]
async fn request_failures_become_the_reply_and_keep_chatting() {
    let (mut controller, _client) =
        scripted_controller(vec![Err(ProviderError::RequestFailed("timeout".to_string()))]);
    chatting(&mut controller, Provider::OpenAI, "sk-test");

    controller.submit_message("Hello").unwrap();
    assert_eq!(controller.resolve_pending().await, Resolution::Resolved);

    let last = controller.state().transcript().last().unwrap().clone();
    assert_eq!(last.role, Role::Assistant);
    assert!(last.text().contains("OpenAI"));
    assert!(last.text().contains("timeout"));
    assert_eq!(controller.mode(), SessionMode::Chatting);
    assert!(controller.state().has_credential());

    // The user can retry straight away.
    controller.submit_message("Hello again").unwrap();
    assert_eq!(controller.state().transcript().len(), 4);
}

#[tokio::test]
async fn unavailable_and_empty_responses_are_reported_inline() {
    let (mut controller, _client) = scripted_controller(vec![
        Err(ProviderError::ClientUnavailable),
        Err(ProviderError::EmptyResponse),
    ]);
    chatting(&mut controller, Provider::OpenAI, "sk-test");

    controller.submit_message("a").unwrap();
    controller.resolve_pending().await;
    controller.submit_message("b").unwrap();
    controller.resolve_pending().await;

    let transcript = controller.state().transcript();
    assert_eq!(
        transcript[1].text(),
        ProviderError::ClientUnavailable.user_message(Provider::OpenAI)
    );
    assert_eq!(
        transcript[3].text(),
        ProviderError::EmptyResponse.user_message(Provider::OpenAI)
    );
}

#[tokio::test]
async fn provider_switch_mid_flight_discards_the_stale_answer() {
    let (mut controller, _client) = scripted_controller(vec![Ok("late answer".to_string())]);
    chatting(&mut controller, Provider::OpenAI, "sk-test");
    controller.submit_message("Hello").unwrap();

    let request = controller.begin_resolution().expect("placeholder pending");
    assert_eq!(request.provider(), Provider::OpenAI);
    assert_eq!(request.prompt(), "Hello");
    let outcome = request.execute().await;

    controller.select_provider(Provider::Gemini);
    assert_eq!(
        controller.complete_resolution(request, outcome),
        Resolution::Discarded
    );
    assert!(controller.state().transcript().is_empty());
    assert_eq!(controller.state().provider(), Some(Provider::Gemini));
}

#[tokio::test]
async fn credential_change_mid_flight_retries_with_the_new_key() {
    let (mut controller, client) = scripted_controller(vec![
        Ok("answer for old key".to_string()),
        Ok("answer for new key".to_string()),
    ]);
    chatting(&mut controller, Provider::OpenAI, "old-key");
    controller.submit_message("Hello").unwrap();

    let request = controller.begin_resolution().unwrap();
    let outcome = request.execute().await;
    controller.toggle_settings().unwrap();
    controller.submit_credential("new-key").unwrap();

    assert_eq!(
        controller.complete_resolution(request, outcome),
        Resolution::Discarded
    );
    assert!(controller.state().is_awaiting_response());

    assert_eq!(controller.resolve_pending().await, Resolution::Resolved);
    assert_eq!(
        controller.state().transcript()[1].text(),
        "answer for new key"
    );
    assert_eq!(client.calls()[1], ("Hello".to_string(), "new-key".to_string()));
}

#[tokio::test]
async fn clear_then_resubmit_mid_flight_does_not_cross_wires() {
    let (mut controller, _client) = scripted_controller(vec![
        Ok("answer to first".to_string()),
        Ok("answer to second".to_string()),
    ]);
    chatting(&mut controller, Provider::OpenAI, "sk-test");
    controller.submit_message("first").unwrap();

    let stale = controller.begin_resolution().unwrap();
    let stale_outcome = stale.execute().await;

    controller.clear_chat().unwrap();
    controller.submit_message("second").unwrap();

    assert_eq!(
        controller.complete_resolution(stale, stale_outcome),
        Resolution::Discarded
    );
    assert!(controller.state().is_awaiting_response());

    controller.resolve_pending().await;
    assert_eq!(
        texts(&controller),
        vec![
            (Role::User, "second".to_string()),
            (Role::Assistant, "answer to second".to_string()),
        ]
    );
}

#[test]
fn sessions_are_isolated() {
    let registry = Arc::new(ClientRegistry::simulated());
    let mut first = ChatSessionController::new(registry.clone());
    let mut second = ChatSessionController::new(registry);

    chatting(&mut first, Provider::Claude, "first-key");
    first.submit_message("hi").unwrap();

    assert_eq!(second.mode(), SessionMode::NeedsProvider);
    assert!(second.state().transcript().is_empty());
    second.select_provider(Provider::Claude);
    assert!(!second.state().has_credential());
}
