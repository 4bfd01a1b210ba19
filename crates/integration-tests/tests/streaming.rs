mod harness;

use harness::config::ConfigBuilder;
use harness::mock_gemini::{MockGemini, finish_chunk, function_call_chunk, text_chunk, thought_chunk};
use harness::server::{TestServer, parse_sse_data};
use serde_json::{Value, json};

fn streaming_body(model: &str) -> Value {
    json!({
        "model": model,
        "messages": [{"role": "user", "content": "Hello"}],
        "stream": true
    })
}

fn chunks(data: &[String]) -> Vec<Value> {
    data.iter()
        .filter(|d| d.as_str() != "[DONE]")
        .map(|d| serde_json::from_str(d).unwrap())
        .collect()
}

#[tokio::test]
async fn streaming_returns_sse_headers() {
    let mock = MockGemini::streaming(vec![text_chunk("Hi")]).await.unwrap();
    let server = TestServer::start(ConfigBuilder::new(&mock.base_url()).build())
        .await
        .unwrap();

    let resp = server.chat(&streaming_body("gemini-2.5-flash")).await;

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "text/event-stream");
    assert_eq!(resp.headers()["cache-control"], "no-cache");
}

#[tokio::test]
async fn text_stream_is_translated() {
    let mock = MockGemini::streaming(vec![text_chunk("The sky "), text_chunk("is blue."), finish_chunk()])
        .await
        .unwrap();
    let server = TestServer::start(ConfigBuilder::new(&mock.base_url()).build())
        .await
        .unwrap();

    let text = server.chat(&streaming_body("gemini-2.5-flash")).await.text().await.unwrap();
    let data = parse_sse_data(&text);

    assert_eq!(data.last().map(String::as_str), Some("[DONE]"));

    let chunks = chunks(&data);
    assert_eq!(chunks.len(), 3);

    let id = chunks[0]["id"].as_str().unwrap();
    assert!(id.starts_with("chatcmpl-"));
    for chunk in &chunks {
        assert_eq!(chunk["id"], id);
        assert_eq!(chunk["created"], chunks[0]["created"]);
        assert_eq!(chunk["model"], "gemini-2.5-flash");
        assert_eq!(chunk["object"], "chat.completion.chunk");
    }

    assert_eq!(chunks[0]["choices"][0]["delta"], json!({"role": "assistant", "content": "The sky "}));
    assert_eq!(chunks[1]["choices"][0]["delta"], json!({"content": "is blue."}));
    assert_eq!(chunks[2]["choices"][0]["delta"], json!({}));
    assert_eq!(chunks[2]["choices"][0]["finish_reason"], "stop");
}

#[tokio::test]
async fn streaming_is_the_default() {
    let mock = MockGemini::streaming(vec![text_chunk("Hi")]).await.unwrap();
    let server = TestServer::start(ConfigBuilder::new(&mock.base_url()).build())
        .await
        .unwrap();

    let body = json!({"model": "gemini-2.5-pro", "messages": [{"role": "user", "content": "Hello"}]});
    let resp = server.chat(&body).await;

    assert_eq!(resp.headers()["content-type"], "text/event-stream");
    assert!(resp.text().await.unwrap().ends_with("data: [DONE]\n\n"));
}

#[tokio::test]
async fn tool_call_is_split_into_two_chunks() {
    let mock = MockGemini::streaming(vec![function_call_chunk("get_weather", json!({"city": "Paris"}))])
        .await
        .unwrap();
    let server = TestServer::start(ConfigBuilder::new(&mock.base_url()).build())
        .await
        .unwrap();

    let text = server.chat(&streaming_body("gemini-2.5-flash")).await.text().await.unwrap();
    let chunks = chunks(&parse_sse_data(&text));

    assert_eq!(chunks.len(), 3);

    let header = &chunks[0]["choices"][0]["delta"]["tool_calls"][0];
    assert_eq!(header["index"], 0);
    assert_eq!(header["type"], "function");
    assert_eq!(header["function"]["name"], "get_weather");
    assert_eq!(header["function"]["arguments"], "");
    assert!(header["id"].as_str().unwrap().starts_with("call_get_weather_"));

    let args = &chunks[1]["choices"][0]["delta"]["tool_calls"][0];
    assert_eq!(args, &json!({"index": 0, "function": {"arguments": "{\"city\":\"Paris\"}"}}));

    assert_eq!(chunks[2]["choices"][0]["finish_reason"], "tool_calls");
}

#[tokio::test]
async fn reasoning_never_reaches_the_client() {
    let mock = MockGemini::streaming(vec![
        text_chunk("a"),
        thought_chunk("private scratch work"),
        text_chunk("b"),
    ])
    .await
    .unwrap();
    let server = TestServer::start(ConfigBuilder::new(&mock.base_url()).build())
        .await
        .unwrap();

    let text = server.chat(&streaming_body("gemini-2.5-flash")).await.text().await.unwrap();
    assert!(!text.contains("private scratch work"));

    let chunks = chunks(&parse_sse_data(&text));
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[1]["choices"][0]["delta"], json!({"content": "b"}));
}

#[tokio::test]
async fn several_parts_in_one_backend_chunk_keep_their_order() {
    let mock = MockGemini::streaming(vec![json!({"candidates": [{"content": {"role": "model", "parts": [
        {"text": "Checking."},
        {"functionCall": {"name": "a", "args": {}}},
        {"functionCall": {"name": "b", "args": {"x": 1}}}
    ]}}]})])
    .await
    .unwrap();
    let server = TestServer::start(ConfigBuilder::new(&mock.base_url()).build())
        .await
        .unwrap();

    let text = server.chat(&streaming_body("gemini-2.5-flash")).await.text().await.unwrap();
    let chunks = chunks(&parse_sse_data(&text));

    assert_eq!(chunks.len(), 6);
    assert_eq!(chunks[0]["choices"][0]["delta"]["content"], "Checking.");
    assert_eq!(chunks[1]["choices"][0]["delta"]["tool_calls"][0]["function"]["name"], "a");
    assert_eq!(chunks[3]["choices"][0]["delta"]["tool_calls"][0]["index"], 1);
    assert_eq!(chunks[3]["choices"][0]["delta"]["tool_calls"][0]["function"]["name"], "b");
    assert_eq!(chunks[4]["choices"][0]["delta"]["tool_calls"][0]["function"]["arguments"], "{\"x\":1}");
}

#[tokio::test]
async fn backend_receives_converted_request() {
    let mock = MockGemini::streaming(vec![text_chunk("ok")]).await.unwrap();
    let server = TestServer::start(ConfigBuilder::new(&mock.base_url()).build())
        .await
        .unwrap();

    let body = json!({
        "model": "gemini-2.5-pro",
        "stream": true,
        "messages": [
            {"role": "system", "content": "Be terse."},
            {"role": "user", "content": "Weather in Paris?"}
        ],
        "tools": [{
            "type": "function",
            "function": {
                "name": "get_weather",
                "description": "Get current weather",
                "parameters": {"type": "object", "properties": {"city": {"type": "string"}}}
            }
        }],
        "tool_choice": "required"
    });

    let resp = server.chat(&body).await;
    let request_id = resp.headers()["x-request-id"].to_str().unwrap().to_owned();
    resp.text().await.unwrap();

    let recorded = mock.single_request();
    assert_eq!(recorded.target, "gemini-2.5-pro:streamGenerateContent");
    assert_eq!(recorded.query.as_deref(), Some("alt=sse"));
    assert_eq!(recorded.api_key.as_deref(), Some("test-key"));
    assert_eq!(recorded.request_id.as_deref(), Some(request_id.as_str()));

    assert_eq!(recorded.body["systemInstruction"], json!({"parts": [{"text": "Be terse."}]}));
    assert_eq!(
        recorded.body["contents"],
        json!([{"role": "user", "parts": [{"text": "Weather in Paris?"}]}])
    );
    assert_eq!(recorded.body["tools"][0]["functionDeclarations"][0]["name"], "get_weather");
    assert_eq!(recorded.body["toolConfig"]["functionCallingConfig"]["mode"], "ANY");
}

#[tokio::test]
async fn tool_results_are_sent_back_by_function_name() {
    let mock = MockGemini::streaming(vec![function_call_chunk("get_weather", json!({"city": "Paris"}))])
        .await
        .unwrap();
    let server = TestServer::start(ConfigBuilder::new(&mock.base_url()).build())
        .await
        .unwrap();

    // First turn: collect the minted tool call id
    let text = server.chat(&streaming_body("gemini-2.5-flash")).await.text().await.unwrap();
    let chunks = chunks(&parse_sse_data(&text));
    let call_id = chunks[0]["choices"][0]["delta"]["tool_calls"][0]["id"].as_str().unwrap().to_owned();

    // Second turn: the client only sends the id with the result
    let follow_up = json!({
        "model": "gemini-2.5-flash",
        "stream": true,
        "messages": [
            {"role": "user", "content": "Weather in Paris?"},
            {"role": "tool", "tool_call_id": call_id, "content": "{\"temp\": 21}"}
        ]
    });
    server.chat(&follow_up).await.text().await.unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[1].body["contents"][1],
        json!({"role": "user", "parts": [
            {"functionResponse": {"name": "get_weather", "response": {"temp": 21}}}
        ]})
    );
}
