//! Core entity types for responder.
//!
//! A [`Question`] owns an ordered list of [`Answer`]s, and the persisted
//! [`Document`] is simply the ordered list of every question. Identifiers are
//! opaque strings; new ones are UUID v4 values rendered as hyphenated text.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The entire persisted state: every question, in insertion order.
pub type Document = Vec<Question>;

/// Message carried by validation failures on create.
pub const INVALID_DRAFT: &str = "Invalid author or summary";

/// Identifier of a [`Question`], unique across the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

/// Identifier of an [`Answer`], unique among its siblings only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerId(String);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            /// Draws a fresh random (UUID v4) identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

impl_id!(QuestionId);
impl_id!(AnswerId);

/// Caller-supplied fields for a new question or answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub author: String,
    pub summary: String,
}

impl Draft {
    pub fn new(author: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            summary: summary.into(),
        }
    }

    /// Rejects an empty author or summary. Whitespace-only text is accepted.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.author.is_empty() || self.summary.is_empty() {
            return Err(StoreError::Validation(INVALID_DRAFT));
        }
        Ok(())
    }
}

/// A question and the answers posted under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub author: String,
    pub summary: String,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

impl Question {
    /// Creates a question with the given id and no answers.
    pub fn with_id(id: QuestionId, draft: Draft) -> Self {
        Self {
            id,
            author: draft.author,
            summary: draft.summary,
            answers: Vec::new(),
        }
    }

    /// First answer whose id equals `answer_id`.
    pub fn answer(&self, answer_id: &str) -> Option<&Answer> {
        self.answers.iter().find(|a| a.id == *answer_id)
    }

    /// Draws an answer id not already used by any sibling.
    pub(crate) fn fresh_answer_id(&self) -> AnswerId {
        loop {
            let id = AnswerId::random();
            if self.answer(id.as_str()).is_none() {
                return id;
            }
        }
    }
}

/// A single answer, owned by exactly one [`Question`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    pub author: String,
    pub summary: String,
}

impl Answer {
    pub fn with_id(id: AnswerId, draft: Draft) -> Self {
        Self {
            id,
            author: draft.author,
            summary: draft.summary,
        }
    }
}

/// First question in `document` whose id equals `question_id`.
pub fn find_question<'a>(document: &'a [Question], question_id: &str) -> Option<&'a Question> {
    document.iter().find(|q| q.id == *question_id)
}

/// Draws a question id not already used in `document`.
pub(crate) fn fresh_question_id(document: &[Question]) -> QuestionId {
    loop {
        let id = QuestionId::random();
        if find_question(document, id.as_str()).is_none() {
            return id;
        }
    }
}
