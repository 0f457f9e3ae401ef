use rand::seq::SliceRandom;
use rand::Rng;

use crate::quiz::{Difficulty, Question, QuizError, QUIZ_LENGTH};

/// An option as it is shown on screen, remembering where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownOption {
    pub original_index: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HistoryEntry {
    pub prompt: String,
    pub options: Vec<String>,
    pub chosen: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: String,
    pub difficulty: Difficulty,
}

/// Progress of one chat through one quiz.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct QuizSession {
    questions: Vec<Question>,
    index: usize,
    score: usize,
    history: Vec<HistoryEntry>,
    // Options of the question currently on screen, in their original order
    shown_options: Option<Vec<String>>,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            ..Default::default()
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.is_finished() {
            return None;
        }
        self.questions.get(self.index)
    }

    /// 1-based number of the current question.
    pub fn position(&self) -> usize {
        self.index + 1
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        QUIZ_LENGTH
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.questions.len() || self.index >= QUIZ_LENGTH
    }

    /// Shuffles the options of the current question for display. The answer is
    /// later checked against the original order, so the buttons carry the
    /// original indexes.
    pub fn present_current<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Vec<ShownOption>> {
        let options = self.current_question()?.options.clone();

        let mut shown = options
            .iter()
            .enumerate()
            .map(|(original_index, text)| ShownOption {
                original_index,
                text: text.clone(),
            })
            .collect::<Vec<_>>();
        shown.shuffle(rng);

        self.shown_options = Some(options);
        Some(shown)
    }

    pub fn answer(&mut self, original_index: usize) -> Result<HistoryEntry, QuizError> {
        let question = self
            .current_question()
            .ok_or(QuizError::NoQuestionShown)?
            .clone();
        let options = self
            .shown_options
            .as_ref()
            .ok_or(QuizError::NoQuestionShown)?;
        let chosen = options
            .get(original_index)
            .ok_or(QuizError::InvalidOption(original_index))?
            .clone();

        let is_correct = question.is_correct(&chosen);
        if is_correct {
            self.score += 1;
        }

        let entry = HistoryEntry {
            options: options.clone(),
            prompt: question.prompt,
            chosen,
            correct_answer: question.answer,
            is_correct,
            explanation: question.explanation,
            difficulty: question.difficulty,
        };
        self.history.push(entry.clone());
        self.index += 1;
        self.shown_options = None;

        Ok(entry)
    }
}
