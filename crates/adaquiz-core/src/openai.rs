use crate::llm_config::LlmConfig;
use crate::openai::error::{FunctionCallError, OpenAiError};
use async_openai::Client;
use async_openai::types::{
    ChatCompletionNamedToolChoice, ChatCompletionRequestMessage, ChatCompletionTool, ChatCompletionToolChoiceOption,
    ChatCompletionToolType, CreateChatCompletionRequestArgs, CreateChatCompletionResponse, FunctionName,
    FunctionObject,
};
use backoff::ExponentialBackoffBuilder;
use serde_json::Value;
use std::error::Error;
use std::time::Duration;
use tracing::instrument;
use typed_builder::TypedBuilder;

pub mod error;

#[derive(TypedBuilder, Debug, Clone)]
pub struct CallConfig {
    timeout: Duration,
    #[builder(default = 2048)]
    max_tokens: u32,
    #[builder(default)]
    temperature: Option<f32>,
}

impl CallConfig {
    #[must_use]
    pub fn for_config(llm_config: &LlmConfig) -> Self {
        CallConfig::builder()
            .timeout(llm_config.request_timeout())
            .temperature(llm_config.temperature())
            .build()
    }
}

/// A structured answer the model has to return through a forced function call.
pub trait FunctionResponse: serde::de::DeserializeOwned {
    fn function_name() -> &'static str;
    fn function_description() -> &'static str;

    fn function_definition() -> Value;

    /// Models sometimes return html entities instead of plain characters.
    fn fix_escapes(&mut self);
}

pub(crate) fn decode_entities(text: &mut String) {
    if text.contains('&') {
        *text = html_escape::decode_html_entities(text).into_owned();
    }
}

#[instrument(skip(llm_config, messages), fields(function = T::function_name(), model = llm_config.get_model()))]
pub async fn openai_call_function<T: FunctionResponse>(
    llm_config: &LlmConfig,
    config: CallConfig,
    messages: Vec<ChatCompletionRequestMessage>,
) -> Result<T, OpenAiError> {
    let name = T::function_name();

    let mut request = CreateChatCompletionRequestArgs::default();
    request
        .model(llm_config.get_model())
        .messages(messages)
        .max_completion_tokens(config.max_tokens)
        .tools(vec![ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: name.to_string(),
                description: Some(T::function_description().to_string()),
                parameters: Some(T::function_definition()),
                strict: None,
            },
        }])
        .tool_choice(ChatCompletionToolChoiceOption::Named(ChatCompletionNamedToolChoice {
            r#type: ChatCompletionToolType::Function,
            function: FunctionName { name: name.to_string() },
        }));

    if let Some(temperature) = config.temperature {
        request.temperature(temperature);
    }

    let request = request.build()?;

    let http_client = reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|error| {
            tracing::error!(error = &error as &dyn Error, "failed to build http client for openai");
            OpenAiError::HttpClientBuild(error)
        })?;

    // A zero budget means a failed call is surfaced right away instead of being retried
    let backoff = ExponentialBackoffBuilder::default()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build();

    let client = Client::with_config(llm_config.get_openai_config())
        .with_http_client(http_client)
        .with_backoff(backoff);

    tracing::debug!("sending openai request");
    let chat_completion = client.chat().create(request).await.map_err(|error| {
        tracing::warn!(error = &error as &dyn Error, "open AI call failed");
        OpenAiError::Api(error)
    })?;

    if let Some(usage) = &chat_completion.usage {
        tracing::debug!(tokens = usage.total_tokens, "openai call finished");
    }

    check_function_call(&chat_completion)
}

#[instrument(skip_all)]
fn check_function_call<T: FunctionResponse>(chat_completion: &CreateChatCompletionResponse) -> Result<T, OpenAiError> {
    let choice = chat_completion.choices.first().ok_or(OpenAiError::EmptyResponse)?;
    let message = &choice.message;

    let function_call = message
        .tool_calls
        .as_ref()
        .ok_or(FunctionCallError::Missing)?
        .first()
        .ok_or(FunctionCallError::Missing)?;

    if function_call.function.name != T::function_name() {
        tracing::warn!(
            expected_function = T::function_name(),
            called_function = &function_call.function.name,
            "assistant tried to call the wrong function"
        );
        return Err(FunctionCallError::WrongFunction.into());
    }

    let mut res: T = serde_json::from_str(&function_call.function.arguments).map_err(|error| {
        tracing::warn!(
            error = &error as &dyn Error,
            arguments = function_call.function.arguments,
            "failed to parse function call arguments"
        );
        FunctionCallError::InvalidSyntax
    })?;
    res.fix_escapes();
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Echo {
        text: String,
    }

    impl FunctionResponse for Echo {
        fn function_name() -> &'static str {
            "echo"
        }

        fn function_description() -> &'static str {
            "Echoes the text"
        }

        fn function_definition() -> Value {
            json!({ "type": "object", "properties": { "text": { "type": "string" } }, "required": ["text"] })
        }

        fn fix_escapes(&mut self) {
            decode_entities(&mut self.text);
        }
    }

    fn completion(name: &str, arguments: &str) -> CreateChatCompletionResponse {
        serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1,
            "model": "test",
            "choices": [{
                "index": 0,
                "finish_reason": "tool_calls",
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": name, "arguments": arguments }
                    }]
                }
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_function_call_is_parsed_and_unescaped() {
        let echo: Echo = check_function_call(&completion("echo", r#"{"text": "salt &amp; pepper"}"#)).unwrap();
        assert_eq!(echo.text, "salt & pepper");
    }

    #[test]
    fn test_wrong_function() {
        let res = check_function_call::<Echo>(&completion("other", r#"{"text": ""}"#));
        assert!(matches!(
            res,
            Err(OpenAiError::FunctionCall(FunctionCallError::WrongFunction))
        ));
    }

    #[test]
    fn test_invalid_arguments() {
        let res = check_function_call::<Echo>(&completion("echo", "{not json"));
        assert!(matches!(
            res,
            Err(OpenAiError::FunctionCall(FunctionCallError::InvalidSyntax))
        ));
    }
}
