//! Upstream events to a single non-streaming `OpenAI` completion

use futures_util::{Stream, TryStreamExt};

use crate::error::LlmError;
use crate::identity::ResponseIdentity;
use crate::protocol::openai::{FinishReason, OpenAiChoice, OpenAiChoiceMessage, OpenAiResponse};
use crate::types::{ToolCall, UpstreamEvent};

/// Running fold over an upstream event sequence
#[derive(Debug, Default)]
struct Aggregate {
    text: String,
    tool_calls: Vec<ToolCall>,
}

impl Aggregate {
    fn push(mut self, event: UpstreamEvent) -> Self {
        match event {
            UpstreamEvent::Text(text) => self.text.push_str(&text),
            UpstreamEvent::Reasoning(_) => {}
            UpstreamEvent::ToolInvocation { name, args } => {
                self.tool_calls.push(ToolCall::from_invocation(&name, &args));
            }
        }
        self
    }

    fn into_response(self, model: &str, identity: ResponseIdentity) -> OpenAiResponse {
        let finish_reason = FinishReason::for_tool_calls(!self.tool_calls.is_empty());

        let message = OpenAiChoiceMessage {
            role: "assistant".to_owned(),
            content: (!self.text.is_empty()).then_some(self.text),
            tool_calls: (!self.tool_calls.is_empty())
                .then(|| self.tool_calls.into_iter().map(Into::into).collect()),
        };

        OpenAiResponse {
            id: identity.id,
            object: "chat.completion".to_owned(),
            created: identity.created,
            model: model.to_owned(),
            choices: vec![OpenAiChoice {
                index: 0,
                message,
                finish_reason,
            }],
        }
    }
}

/// Drain `events` to completion and fold them into one completion
///
/// The first error from the sequence aborts the fold and is returned as is.
pub async fn aggregate<S>(model: &str, events: S) -> Result<OpenAiResponse, LlmError>
where
    S: Stream<Item = Result<UpstreamEvent, LlmError>>,
{
    let identity = ResponseIdentity::new();

    let aggregate = events
        .try_fold(Aggregate::default(), |acc, event| async move { Ok(acc.push(event)) })
        .await?;

    Ok(aggregate.into_response(model, identity))
}
