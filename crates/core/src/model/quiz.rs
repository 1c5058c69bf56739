use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ids::{ChoiceId, QuestionId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: ChoiceId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub choices: Vec<Choice>,
}

impl Question {
    #[must_use]
    pub fn has_choice(&self, id: &ChoiceId) -> bool {
        self.choices.iter().any(|choice| &choice.id == id)
    }
}

/// Multiple-choice quiz attached to a `quiz` lesson. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Quiz {
    questions: Vec<Question>,
}

impl Quiz {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == id)
    }
}

/// One graded answer as the backend expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAnswer {
    pub question: QuestionId,
    pub selected_choice_id: ChoiceId,
}

/// The learner's current choice per question. At most one choice per question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedAnswers {
    by_question: BTreeMap<QuestionId, ChoiceId>,
}

impl SelectedAnswers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a choice, replacing any earlier choice for the same question.
    pub fn select(&mut self, question: QuestionId, choice: ChoiceId) {
        self.by_question.insert(question, choice);
    }

    #[must_use]
    pub fn selected(&self, question: &QuestionId) -> Option<&ChoiceId> {
        self.by_question.get(question)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_question.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_question.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_question.clear();
    }

    /// One entry per answered question; unanswered questions are omitted.
    #[must_use]
    pub fn to_answers(&self) -> Vec<QuizAnswer> {
        self.by_question
            .iter()
            .map(|(question, choice)| QuizAnswer {
                question: question.clone(),
                selected_choice_id: choice.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reselecting_replaces_previous_choice() {
        let mut answers = SelectedAnswers::new();
        answers.select(QuestionId::new("q1"), ChoiceId::new("a"));
        answers.select(QuestionId::new("q1"), ChoiceId::new("b"));

        assert_eq!(answers.len(), 1);
        assert_eq!(
            answers.selected(&QuestionId::new("q1")),
            Some(&ChoiceId::new("b"))
        );
    }

    #[test]
    fn answers_serialize_in_backend_shape() {
        let mut answers = SelectedAnswers::new();
        answers.select(QuestionId::new("q1"), ChoiceId::new("c1"));

        let json = serde_json::to_value(answers.to_answers()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "question": "q1", "selected_choice_id": "c1" }])
        );
    }
}
