use std::str::FromStr;

use crate::quiz::QuizError;

/// What an inline button asks the bot to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    StartQuiz,
    NewQuiz,
    Answer(usize),
    ReviewStart,
    ReviewNext,
    ReviewPrev,
    ReviewEnd,
    EndSession,
}

impl CallbackAction {
    pub fn data(&self) -> String {
        match self {
            CallbackAction::StartQuiz => "initiate_quiz_setup".to_string(),
            CallbackAction::NewQuiz => "new_quiz_from_results".to_string(),
            CallbackAction::Answer(index) => index.to_string(),
            CallbackAction::ReviewStart => "review_start".to_string(),
            CallbackAction::ReviewNext => "review_next".to_string(),
            CallbackAction::ReviewPrev => "review_prev".to_string(),
            CallbackAction::ReviewEnd => "review_end".to_string(),
            CallbackAction::EndSession => "end_session".to_string(),
        }
    }
}

impl FromStr for CallbackAction {
    type Err = QuizError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let action = match data {
            "initiate_quiz_setup" => CallbackAction::StartQuiz,
            "new_quiz_from_results" => CallbackAction::NewQuiz,
            "review_start" => CallbackAction::ReviewStart,
            "review_next" => CallbackAction::ReviewNext,
            "review_prev" => CallbackAction::ReviewPrev,
            "review_end" => CallbackAction::ReviewEnd,
            "end_session" => CallbackAction::EndSession,
            other => other
                .parse::<usize>()
                .map(CallbackAction::Answer)
                .map_err(|_| QuizError::UnknownCallback(other.to_string()))?,
        };
        Ok(action)
    }
}
