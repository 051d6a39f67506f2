use mailmind::{InputState, Message, OutputState};
use serde_json::json;

#[test]
fn merging_input_records_upserts_by_message_id() {
    let mut first = InputState::default()
        .with_messages(vec![Message::human("find invoices from March").with_id("1")]);
    let second = InputState::default().with_messages(vec![
        Message::human("find invoices from March, edited").with_id("1"),
        Message::ai("Found 3 invoices").with_id("2"),
    ]);

    first.merge(second).unwrap();

    let ids: Vec<_> = first.messages.iter().map(|m| m.id.as_deref()).collect();
    assert_eq!(ids, [Some("1"), Some("2")]);
    assert_eq!(first.messages[0].content, "find invoices from March, edited");
}

#[test]
fn successive_steps_accumulate_messages() {
    let mut state = InputState::new("carol");
    for step in ["read inbox", "summarize", "draft reply"] {
        state
            .merge(InputState::new("carol").with_messages(vec![Message::ai(step)]))
            .unwrap();
    }

    let contents: Vec<_> = state.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["read inbox", "summarize", "draft reply"]);
}

#[test]
fn output_state_serializes_boundary_shape() {
    let mut result = serde_json::Map::new();
    result.insert("emails".to_string(), json!([{ "subject": "Hello" }]));

    let output = OutputState::success(result, "1 email found");

    assert_eq!(
        serde_json::to_value(&output).unwrap(),
        json!({
            "result": { "emails": [{ "subject": "Hello" }] },
            "status": "success",
            "message": "1 email found"
        })
    );
}
