use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::path::Path;

use crate::quiz::{Difficulty, Question, QuizError, QUIZ_COMPOSITION};

const BUNDLED_QUESTIONS: &str = include_str!("../../data/questions.json");

/// The full set of questions the quizzes are drawn from.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    pub questions: Vec<Question>,
}

impl QuestionBank {
    pub fn from_json(json: &str) -> Result<Self, QuizError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        for (index, question) in questions.iter().enumerate() {
            question
                .validate()
                .map_err(|reason| QuizError::InvalidQuestion { index, reason })?;
        }
        Ok(Self { questions })
    }

    /// The bank compiled into the binary.
    pub fn bundled() -> Result<Self, QuizError> {
        Self::from_json(BUNDLED_QUESTIONS)
    }

    pub fn load(path: &Path) -> Result<Self, QuizError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn count(&self, difficulty: Difficulty) -> usize {
        self.of_difficulty(difficulty).count()
    }

    fn of_difficulty(&self, difficulty: Difficulty) -> impl Iterator<Item = &Question> {
        self.questions
            .iter()
            .filter(move |q| q.difficulty == difficulty)
    }

    /// Picks a fresh quiz: a fixed number of questions per difficulty, sampled
    /// without replacement, then shuffled together.
    pub fn compose<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Question>, QuizError> {
        let mut quiz = Vec::new();
        for (difficulty, needed) in QUIZ_COMPOSITION {
            let pool = self.of_difficulty(difficulty).collect::<Vec<_>>();
            if pool.len() < needed {
                return Err(QuizError::InsufficientQuestions {
                    difficulty,
                    needed,
                    available: pool.len(),
                });
            }
            quiz.extend(pool.choose_multiple(rng, needed).map(|q| (*q).clone()));
        }
        quiz.shuffle(rng);
        Ok(quiz)
    }
}
