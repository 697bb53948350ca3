use crate::core::error::ProviderError;
use crate::providers::base_client::HttpClient;
use crate::providers::{Provider, ProviderClient, non_empty};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatCompletionMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    content: Option<String>,
}

/// Client for the `chat/completions` protocol spoken by OpenAI and Groq
#[derive(Clone)]
pub struct OpenAICompatibleClient {
    provider: Provider,
    client: HttpClient,
    model: String,
}

impl OpenAICompatibleClient {
    pub fn new(provider: Provider, client: reqwest::Client, base_url: String, model: String) -> Self {
        Self {
            provider,
            client: HttpClient::new(client, base_url, None),
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn build_request<'a>(model: &'a str, prompt: &'a str) -> ChatCompletionRequest<'a> {
    ChatCompletionRequest {
        model,
        messages: vec![ChatCompletionMessage {
            role: "user",
            content: prompt,
        }],
    }
}

fn extract_answer(response: ChatCompletionResponse) -> Result<String, ProviderError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(ProviderError::EmptyResponse)?;

    non_empty(content.trim().to_string())
}

#[async_trait]
impl ProviderClient for OpenAICompatibleClient {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn send(&self, prompt: &str, credential: &str) -> Result<String, ProviderError> {
        let payload = build_request(&self.model, prompt);
        let auth = ("Authorization", format!("Bearer {}", credential));
        let response: ChatCompletionResponse = self
            .client
            .post_json("chat/completions", auth, &payload)
            .await?;

        extract_answer(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> ChatCompletionResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn sends_only_the_latest_prompt_as_a_user_message() {
        let body = serde_json::to_value(build_request("gpt-3.5-turbo", "Hello")).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "gpt-3.5-turbo",
                "messages": [{"role": "user", "content": "Hello"}]
            })
        );
    }

    #[test]
    fn extracts_first_choice_content() {
        let response = parse(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "  Hi there!\n"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        }));
        assert_eq!(extract_answer(response).unwrap(), "Hi there!");
    }

    #[test]
    fn missing_or_blank_content_is_an_empty_response() {
        let no_choices = parse(json!({"choices": []}));
        assert_eq!(extract_answer(no_choices), Err(ProviderError::EmptyResponse));

        let null_content = parse(json!({"choices": [{"message": {"content": null}}]}));
        assert_eq!(extract_answer(null_content), Err(ProviderError::EmptyResponse));

        let blank = parse(json!({"choices": [{"message": {"content": "   "}}]}));
        assert_eq!(extract_answer(blank), Err(ProviderError::EmptyResponse));
    }
}
