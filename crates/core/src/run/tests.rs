use std::future::ready;
use std::sync::{Arc, Mutex};

use chatline_model::{ErrorKind, ModelMessage, ToolCallRequest};
use chatline_test_model::{PresetResponse, TestModelProvider};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::conversation::Turn;
use crate::tool::{Error as ToolError, ToolResult};
use crate::{Agent, ModelClient, RunConfig, RunContext, RunError, Runner, Tool};

struct Visitor {
    name: &'static str,
}

#[derive(Deserialize, JsonSchema)]
struct CityInput {
    city: String,
}

struct CityTool {
    parameter_schema: Value,
}

impl CityTool {
    fn new() -> Self {
        Self {
            parameter_schema: schema_for!(CityInput).to_value(),
        }
    }
}

impl Tool<Visitor> for CityTool {
    type Input = CityInput;

    fn name(&self) -> &str {
        "city_fact"
    }

    fn description(&self) -> &str {
        "Returns a fact about a city."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn execute(
        &self,
        context: RunContext<Visitor>,
        input: CityInput,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let result = if input.city.is_empty() {
            Err(ToolError::execution_error().with_reason("empty city"))
        } else {
            Ok(format!("{} asked about {}", context.name, input.city))
        };
        ready(result)
    }
}

fn call(id: &str, name: &str, arguments: Value) -> ToolCallRequest {
    ToolCallRequest {
        id: id.to_owned(),
        name: name.to_owned(),
        arguments,
    }
}

fn agent(provider: &TestModelProvider) -> Agent<Visitor> {
    Agent::builder("Guide")
        .with_instructions("You know cities.")
        .with_model_provider(provider.clone())
        .with_tool(CityTool::new())
        .build()
}

fn visitor() -> Visitor {
    Visitor { name: "Ahmed" }
}

#[tokio::test]
async fn test_text_answer() {
    let provider = TestModelProvider::with_script([PresetResponse::text("Hi!")]);
    let agent = agent(&provider);

    let result = Runner::run(&agent, &[Turn::user("Hello")], &RunConfig::new(), visitor())
        .await
        .unwrap();
    assert_eq!(result.final_output, "Hi!");
    assert_eq!(result.turns, 1);
    assert!(result.tool_calls.is_empty());

    let requests = provider.requests();
    assert_eq!(
        requests[0].messages,
        vec![
            ModelMessage::System("You know cities.".to_owned()),
            ModelMessage::User("Hello".to_owned()),
        ]
    );
    assert_eq!(requests[0].tools.len(), 1);
    assert_eq!(requests[0].tools[0].name, "city_fact");
}

#[tokio::test]
async fn test_history_is_forwarded_in_order() {
    let provider = TestModelProvider::with_script([PresetResponse::text("Fine.")]);
    let agent = agent(&provider);
    let history = [
        Turn::user("Hi"),
        Turn::assistant("Hello!"),
        Turn::user("How are you?"),
    ];

    Runner::run(&agent, &history, &RunConfig::new(), visitor())
        .await
        .unwrap();
    let messages = &provider.requests()[0].messages;
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[2], ModelMessage::Assistant("Hello!".to_owned()));
    assert_eq!(messages[3], ModelMessage::User("How are you?".to_owned()));
}

#[tokio::test]
async fn test_tool_round_trip() {
    let provider = TestModelProvider::with_script([
        PresetResponse::tool_calls([call("call_0", "city_fact", json!({ "city": "Lahore" }))]),
        PresetResponse::text("Lahore is lovely."),
    ]);
    let agent = agent(&provider);

    let result = Runner::run(
        &agent,
        &[Turn::user("Tell me about Lahore")],
        &RunConfig::new(),
        visitor(),
    )
    .await
    .unwrap();
    assert_eq!(result.final_output, "Lahore is lovely.");
    assert_eq!(result.turns, 2);
    assert_eq!(result.tool_calls.len(), 1);
    assert_eq!(result.tool_calls[0].output, "Ahmed asked about Lahore");

    let second = &provider.requests()[1].messages;
    assert!(matches!(second[2], ModelMessage::Opaque(_)));
    let ModelMessage::Tool(tool_result) = &second[3] else {
        panic!("expected a tool result, got {:?}", second[3]);
    };
    assert_eq!(tool_result.id, "call_0");
    assert_eq!(tool_result.content, "Ahmed asked about Lahore");
}

#[tokio::test]
async fn test_tool_errors_are_sent_back() {
    let provider = TestModelProvider::with_script([
        PresetResponse::tool_calls([
            call("call_0", "city_fact", json!({ "town": "Lahore" })),
            call("call_1", "city_fact", json!({ "city": "" })),
        ]),
        PresetResponse::text("Sorry, I could not look that up."),
    ]);
    let agent = agent(&provider);

    let result = Runner::run(&agent, &[Turn::user("?")], &RunConfig::new(), visitor())
        .await
        .unwrap();
    assert_eq!(result.final_output, "Sorry, I could not look that up.");
    assert!(result.tool_calls[0].output.starts_with("Tool error: Invalid input"));
    assert_eq!(
        result.tool_calls[1].output,
        "Tool error: Execution error: empty city"
    );
}

#[tokio::test]
async fn test_unknown_tool() {
    let provider = TestModelProvider::with_script([PresetResponse::tool_calls([call(
        "call_0",
        "get_stock_price",
        json!({}),
    )])]);
    let agent = agent(&provider);

    let err = Runner::run(&agent, &[Turn::user("?")], &RunConfig::new(), visitor())
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::UnknownTool(name) if name == "get_stock_price"));
}

#[tokio::test]
async fn test_max_turns() {
    let provider = TestModelProvider::default();
    for i in 0..3 {
        provider.push_response(PresetResponse::tool_calls([call(
            &format!("call_{i}"),
            "city_fact",
            json!({ "city": "Paris" }),
        )]));
    }
    let agent = agent(&provider);
    let config = RunConfig::new().with_max_turns(2);

    let err = Runner::run(&agent, &[Turn::user("?")], &config, visitor())
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::MaxTurnsExceeded(2)));
    assert_eq!(provider.remaining(), 1);
}

#[tokio::test]
async fn test_model_error() {
    let provider = TestModelProvider::with_script([PresetResponse::failure(
        "quota exhausted",
        ErrorKind::RateLimitExceeded,
    )]);
    let agent = agent(&provider);

    let err = Runner::run(&agent, &[Turn::user("?")], &RunConfig::new(), visitor())
        .await
        .unwrap_err();
    assert_eq!(err.model_error_kind(), Some(ErrorKind::RateLimitExceeded));
    assert_eq!(err.to_string(), "quota exhausted (rate limit exceeded)");
}

#[tokio::test]
async fn test_tool_calls_reported_before_failure() {
    let provider = TestModelProvider::with_script([
        PresetResponse::tool_calls([call("call_0", "city_fact", json!({ "city": "Lahore" }))]),
        PresetResponse::failure("boom", ErrorKind::Other),
    ]);
    let agent = agent(&provider);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let config = RunConfig::new().on_tool_call({
        let seen = Arc::clone(&seen);
        move |record| seen.lock().unwrap().push(record.clone())
    });

    let err = Runner::run(&agent, &[Turn::user("?")], &config, visitor())
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::Model(_)));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].name, "city_fact");
    assert_eq!(seen[0].output, "Ahmed asked about Lahore");
}

#[tokio::test]
async fn test_config_model_takes_precedence() {
    let agent_provider = TestModelProvider::with_script([PresetResponse::text("agent")]);
    let config_provider = TestModelProvider::with_script([PresetResponse::text("config")]);
    let agent = agent(&agent_provider);
    let config = RunConfig::new()
        .with_model(ModelClient::new(config_provider.clone()))
        .with_tracing_disabled(true);

    let result = Runner::run(&agent, &[Turn::user("?")], &config, visitor())
        .await
        .unwrap();
    assert_eq!(result.final_output, "config");
    assert!(agent_provider.requests().is_empty());
}

#[tokio::test]
async fn test_no_model() {
    let agent: Agent<Visitor> = Agent::builder("Nobody").build();
    let err = Runner::run(&agent, &[Turn::user("?")], &RunConfig::new(), visitor())
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::ModelNotConfigured));
}

#[test]
fn test_run_sync() {
    let provider = TestModelProvider::with_script([PresetResponse::text("done")]);
    let agent = agent(&provider);
    let result = Runner::run_sync(&agent, &[Turn::user("?")], &RunConfig::new(), visitor())
        .unwrap();
    assert_eq!(result.final_output, "done");
}
