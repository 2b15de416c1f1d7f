//! Pulling answers out of a thread's message history.
//!
//! Message lists come from the service newest first, so "last" means the
//! first match when scanning forward.

use serde::{Deserialize, Serialize};

use crate::types::{Annotation, MessageContent, MessageList, MessageRole, ThreadMessage};

/// One renderable piece of a message, in content order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    Text { text: String },
    Image { file_id: String },
}

/// Where a cited span points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CitationSource {
    File { file_id: String, quote: Option<String> },
    FilePath { file_id: String },
    Url { url: String, title: Option<String> },
}

/// A span of message text backed by a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Placeholder text in the message (e.g. `【4:0†source】`).
    pub text: String,
    pub source: CitationSource,
    pub start_index: Option<u32>,
    pub end_index: Option<u32>,
}

impl Citation {
    fn from_annotation(annotation: &Annotation) -> Option<Self> {
        let (text, source, start_index, end_index) = match annotation {
            Annotation::FileCitation {
                text,
                file_citation,
                start_index,
                end_index,
            } => (
                text,
                CitationSource::File {
                    file_id: file_citation.file_id.clone(),
                    quote: file_citation.quote.clone(),
                },
                start_index,
                end_index,
            ),
            Annotation::FilePath {
                text,
                file_path,
                start_index,
                end_index,
            } => (
                text,
                CitationSource::FilePath {
                    file_id: file_path.file_id.clone(),
                },
                start_index,
                end_index,
            ),
            Annotation::UrlCitation {
                text,
                url_citation,
                start_index,
                end_index,
            } => (
                text,
                CitationSource::Url {
                    url: url_citation.url.clone(),
                    title: url_citation.title.clone(),
                },
                start_index,
                end_index,
            ),
            Annotation::Unknown => return None,
        };
        Some(Self {
            text: text.clone(),
            source,
            start_index: *start_index,
            end_index: *end_index,
        })
    }

    /// Id of the cited file, if the source is a file.
    pub fn file_id(&self) -> Option<&str> {
        match &self.source {
            CitationSource::File { file_id, .. } | CitationSource::FilePath { file_id } => {
                Some(file_id.as_str())
            }
            CitationSource::Url { .. } => None,
        }
    }
}

/// Text and images of one message, plus the citations found in its text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedParts {
    pub parts: Vec<MessagePart>,
    pub citations: Vec<Citation>,
}

impl ExtractedParts {
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty() && self.citations.is_empty()
    }

    /// All text parts joined with newlines.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                MessagePart::Text { text } => Some(text.as_str()),
                MessagePart::Image { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn image_file_ids(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                MessagePart::Image { file_id } => Some(file_id.as_str()),
                MessagePart::Text { .. } => None,
            })
            .collect()
    }
}

/// Most recent message written by `role`.
pub fn last_message_by_role(messages: &MessageList, role: MessageRole) -> Option<&ThreadMessage> {
    messages.data.iter().find(|m| m.role == role)
}

/// Split a message into text and image parts, keeping their order.
///
/// Content kinds this client does not know are skipped.
pub fn extract_parts(message: &ThreadMessage) -> ExtractedParts {
    let mut extracted = ExtractedParts::default();
    for content in &message.content {
        match content {
            MessageContent::Text { text } => {
                extracted.parts.push(MessagePart::Text {
                    text: text.value.clone(),
                });
                extracted
                    .citations
                    .extend(text.annotations.iter().filter_map(Citation::from_annotation));
            }
            MessageContent::ImageFile { image_file } => {
                extracted.parts.push(MessagePart::Image {
                    file_id: image_file.file_id.clone(),
                });
            }
            MessageContent::Unknown => {}
        }
    }
    extracted
}

/// [`extract_parts`] of the latest message by `role`; empty when there is none.
pub fn extract_last(messages: &MessageList, role: MessageRole) -> ExtractedParts {
    last_message_by_role(messages, role)
        .map(extract_parts)
        .unwrap_or_default()
}

/// Text of the latest message by `role`; `None` when that message has no text parts.
pub fn last_text_by_role(messages: &MessageList, role: MessageRole) -> Option<String> {
    let parts = extract_parts(last_message_by_role(messages, role)?);
    parts
        .parts
        .iter()
        .any(|part| matches!(part, MessagePart::Text { .. }))
        .then(|| parts.text())
}

/// Every file citation in the list, newest message first.
///
/// Covers the messages in `messages` only; listings from
/// [`AgentService::list_messages`](crate::service::AgentService::list_messages)
/// already hold every page of the thread.
pub fn file_citations(messages: &MessageList) -> Vec<Citation> {
    messages
        .data
        .iter()
        .flat_map(|m| extract_parts(m).citations)
        .filter(|c| matches!(c.source, CitationSource::File { .. }))
        .collect()
}

pub fn image_file_ids(message: &ThreadMessage) -> Vec<String> {
    message
        .content
        .iter()
        .filter_map(|content| match content {
            MessageContent::ImageFile { image_file } => Some(image_file.file_id.clone()),
            _ => None,
        })
        .collect()
}
