//! Question repository: create/read operations over the whole document.
//!
//! Every call reloads the document from its [`DocumentStorage`]; nothing is
//! cached between calls. Mutations run a full load → mutate → save cycle
//! while holding the repository's write gate, so two writers going through
//! the same repository never overwrite each other's appends. Readers never
//! take the gate.

use crate::document::{
    find_question, fresh_question_id, Answer, Document, Draft, Question, QuestionId,
};
use crate::error::StoreError;
use crate::storage::DocumentStorage;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Durable store of questions and their nested answers.
pub struct QuestionRepository {
    storage: Arc<dyn DocumentStorage>,
    write_gate: Mutex<()>,
}

impl fmt::Debug for QuestionRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestionRepository").finish_non_exhaustive()
    }
}

impl QuestionRepository {
    pub fn new(storage: impl DocumentStorage + 'static) -> Self {
        Self::with_storage(Arc::new(storage))
    }

    pub fn with_storage(storage: Arc<dyn DocumentStorage>) -> Self {
        Self {
            storage,
            write_gate: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<Document, StoreError> {
        self.storage.load()
    }

    /// All questions, with their answers, in insertion order.
    pub fn list_questions(&self) -> Result<Vec<Question>, StoreError> {
        self.load()
    }

    /// The question with id `question_id`, if any.
    pub fn get_question(&self, question_id: &str) -> Result<Option<Question>, StoreError> {
        let document = self.load()?;
        Ok(find_question(&document, question_id).cloned())
    }

    /// Validates `draft`, appends a new question with no answers, and persists.
    pub fn add_question(&self, draft: Draft) -> Result<Question, StoreError> {
        draft.validate()?;

        let _gate = self.write_gate.lock();
        let mut document = self.load()?;
        let question = Question::with_id(fresh_question_id(&document), draft);
        document.push(question.clone());
        self.storage.save(&document)?;

        tracing::debug!(question_id = %question.id, "Question appended");
        Ok(question)
    }

    /// Answers of the question with id `question_id`, or `None` if it does not exist.
    pub fn list_answers(&self, question_id: &str) -> Result<Option<Vec<Answer>>, StoreError> {
        Ok(self.get_question(question_id)?.map(|q| q.answers))
    }

    /// The answer `answer_id` under question `question_id`.
    ///
    /// `None` when either the question or the answer is absent; an answer id
    /// that exists only under another question is not found.
    pub fn get_answer(
        &self,
        question_id: &str,
        answer_id: &str,
    ) -> Result<Option<Answer>, StoreError> {
        let document = self.load()?;
        Ok(find_question(&document, question_id)
            .and_then(|q| q.answer(answer_id))
            .cloned())
    }

    /// Validates `draft` and appends a new answer to question `question_id`.
    ///
    /// Fails with [`StoreError::InvalidParent`] if the question does not exist.
    pub fn add_answer(&self, question_id: &str, draft: Draft) -> Result<Answer, StoreError> {
        draft.validate()?;

        let _gate = self.write_gate.lock();
        let mut document = self.load()?;
        let question = document
            .iter_mut()
            .find(|q| q.id == *question_id)
            .ok_or_else(|| StoreError::InvalidParent(QuestionId::from(question_id)))?;
        let answer = Answer::with_id(question.fresh_answer_id(), draft);
        question.answers.push(answer.clone());
        self.storage.save(&document)?;

        tracing::debug!(question_id, answer_id = %answer.id, "Answer appended");
        Ok(answer)
    }
}
