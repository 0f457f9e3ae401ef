pub mod bank;
pub mod grading;
pub mod review;
pub mod session;

use std::fmt;

pub const QUIZ_LENGTH: usize = 20;

// How many questions of each difficulty go into one quiz
pub const QUIZ_COMPOSITION: [(Difficulty, usize); 3] = [
    (Difficulty::Easy, 7),
    (Difficulty::Medium, 7),
    (Difficulty::Hard, 6),
];

#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question #{index} is invalid: {reason}")]
    InvalidQuestion { index: usize, reason: String },
    #[error("not enough {difficulty} questions: need {needed}, have {available}")]
    InsufficientQuestions {
        difficulty: Difficulty,
        needed: usize,
        available: usize,
    },
    #[error("option {0} does not exist for the current question")]
    InvalidOption(usize),
    #[error("there is no question on screen to answer")]
    NoQuestionShown,
    #[error("unknown callback data: {0:?}")]
    UnknownCallback(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub difficulty: Difficulty,
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub source: String,
}

impl Question {
    pub const OPTION_COUNT: usize = 4;

    pub fn is_correct(&self, text: &str) -> bool {
        self.answer == text
    }

    fn validate(&self) -> Result<(), String> {
        if self.prompt.trim().is_empty() {
            return Err("empty question text".to_string());
        }
        if self.options.len() != Self::OPTION_COUNT {
            return Err(format!(
                "expected {} options, found {}",
                Self::OPTION_COUNT,
                self.options.len()
            ));
        }
        for (i, option) in self.options.iter().enumerate() {
            if self.options[..i].contains(option) {
                return Err(format!("duplicate option {:?}", option));
            }
        }
        if !self.options.contains(&self.answer) {
            return Err(format!("answer {:?} is not one of the options", self.answer));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sample_question(difficulty: Difficulty, n: usize) -> Question {
    Question {
        difficulty,
        prompt: format!("{} question {}", difficulty, n),
        options: vec![
            "alpha".to_string(),
            "beta".to_string(),
            "gamma".to_string(),
            "delta".to_string(),
        ],
        answer: "gamma".to_string(),
        explanation: "because gamma".to_string(),
        source: "test".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composition_adds_up_to_quiz_length() {
        let total: usize = QUIZ_COMPOSITION.iter().map(|(_, n)| n).sum();
        assert_eq!(total, QUIZ_LENGTH);
    }

    #[test]
    fn difficulty_is_capitalized_for_display() {
        assert_eq!(Difficulty::Medium.to_string(), "Medium");
    }

    #[test]
    fn validation_rejects_answer_outside_options() {
        let mut question = sample_question(Difficulty::Easy, 0);
        question.answer = "omega".to_string();
        assert!(question.validate().is_err());
    }

    #[test]
    fn validation_rejects_wrong_option_count() {
        let mut question = sample_question(Difficulty::Easy, 0);
        question.options.pop();
        assert!(question.validate().is_err());
    }

    #[test]
    fn validation_rejects_duplicate_options() {
        let mut question = sample_question(Difficulty::Easy, 0);
        question.options[0] = "beta".to_string();
        assert!(question.validate().is_err());
    }

    #[test]
    fn correctness_is_exact_text_match() {
        let question = sample_question(Difficulty::Hard, 0);
        assert!(question.is_correct("gamma"));
        assert!(!question.is_correct("Gamma"));
        assert!(!question.is_correct("gamma "));
    }
}
