//! Tests for result extraction over service-shaped message lists.

use pretty_assertions::assert_eq;
use serde_json::json;

use foundry_agents::extract::*;
use foundry_agents::types::{MessageList, MessageRole};

fn thread_listing() -> MessageList {
    serde_json::from_value(json!({
        "data": [
            {
                "id": "msg_3",
                "role": "assistant",
                "content": [
                    {"type": "text", "text": {
                        "value": "Here is the chart 【4:0†source】",
                        "annotations": [{
                            "type": "file_citation",
                            "text": "【4:0†source】",
                            "file_citation": {"file_id": "file_doc", "quote": "tents"},
                            "start_index": 18,
                            "end_index": 30
                        }]
                    }},
                    {"type": "image_file", "image_file": {"file_id": "file_img"}}
                ]
            },
            {
                "id": "msg_2",
                "role": "user",
                "content": [{"type": "text", "text": {"value": "Draw a chart", "annotations": []}}]
            },
            {
                "id": "msg_1",
                "role": "assistant",
                "content": [{"type": "text", "text": {
                    "value": "Older answer",
                    "annotations": [{
                        "type": "url_citation",
                        "text": "[1]",
                        "url_citation": {"url": "https://example.com", "title": "Example"}
                    }]
                }}]
            }
        ],
        "has_more": false
    }))
    .unwrap()
}

#[test]
fn last_message_is_the_newest_match() {
    let list = thread_listing();
    assert_eq!(last_message_by_role(&list, MessageRole::Assistant).unwrap().id, "msg_3");
    assert_eq!(last_message_by_role(&list, MessageRole::User).unwrap().id, "msg_2");
}

#[test]
fn empty_thread_has_no_last_message() {
    let list = MessageList::default();
    assert!(last_message_by_role(&list, MessageRole::Assistant).is_none());
    assert_eq!(extract_last(&list, MessageRole::Assistant), ExtractedParts::default());
    assert!(last_text_by_role(&list, MessageRole::User).is_none());
}

#[test]
fn text_then_image_keeps_order() {
    let list = thread_listing();
    let parts = extract_last(&list, MessageRole::Assistant);

    assert_eq!(
        parts.parts,
        vec![
            MessagePart::Text {
                text: "Here is the chart 【4:0†source】".into()
            },
            MessagePart::Image {
                file_id: "file_img".into()
            },
        ]
    );
    assert_eq!(parts.image_file_ids(), vec!["file_img"]);
    assert_eq!(
        parts.citations,
        vec![Citation {
            text: "【4:0†source】".into(),
            source: CitationSource::File {
                file_id: "file_doc".into(),
                quote: Some("tents".into()),
            },
            start_index: Some(18),
            end_index: Some(30),
        }]
    );
}

#[test]
fn file_citations_skip_urls() {
    let list = thread_listing();
    let citations = file_citations(&list);
    assert_eq!(citations.len(), 1);
    assert_eq!(citations[0].file_id(), Some("file_doc"));
}

#[test]
fn image_ids_of_a_single_message() {
    let list = thread_listing();
    assert_eq!(image_file_ids(&list.data[0]), vec!["file_img".to_string()]);
    assert!(image_file_ids(&list.data[2]).is_empty());
}

#[test]
fn image_only_reply_has_no_last_text() {
    let list: MessageList = serde_json::from_value(json!({
        "data": [
            {"id": "msg_2", "role": "assistant", "content": [
                {"type": "image_file", "image_file": {"file_id": "file_img"}}
            ]},
            {"id": "msg_1", "role": "user", "content": [
                {"type": "text", "text": {"value": "Plot it", "annotations": []}}
            ]}
        ]
    }))
    .unwrap();

    assert_eq!(last_text_by_role(&list, MessageRole::Assistant), None);
    assert_eq!(last_text_by_role(&list, MessageRole::User).as_deref(), Some("Plot it"));
}
