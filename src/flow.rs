// Which way the conversation goes when a button is pressed. Nothing here talks
// to Telegram; `main.rs` carries the resulting transition out.
use crate::callback::CallbackAction;
use crate::quiz::review::ReviewCursor;
use crate::quiz::session::{HistoryEntry, QuizSession};
use crate::quiz::QuizError;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum State {
    #[default]
    Start,
    Welcome,
    InQuiz {
        session: QuizSession,
    },
    ResultsDisplayed {
        session: QuizSession,
    },
    ReviewQuestions {
        session: QuizSession,
        cursor: ReviewCursor,
    },
}

#[derive(Debug)]
pub enum Transition {
    /// No conversation yet, the user is pointed to /start
    NotStarted,
    /// The button does not belong to the current state
    Ignore,
    BeginQuiz,
    Answered {
        session: QuizSession,
        position: usize,
        entry: HistoryEntry,
    },
    /// The answer could not be processed, the quiz is dropped
    AbortQuiz(QuizError),
    Review {
        session: QuizSession,
        cursor: ReviewCursor,
    },
    NoHistory,
    EndReview {
        session: QuizSession,
    },
    EndSession,
}

pub fn transition(state: State, action: Result<CallbackAction, QuizError>) -> Transition {
    use CallbackAction::*;

    match (state, action) {
        (State::Start, _) => Transition::NotStarted,

        (State::Welcome, Ok(StartQuiz)) => Transition::BeginQuiz,

        (State::InQuiz { mut session }, Ok(Answer(index))) => {
            let position = session.position();
            match session.answer(index) {
                Ok(entry) => Transition::Answered {
                    session,
                    position,
                    entry,
                },
                Err(err) => Transition::AbortQuiz(err),
            }
        }
        (State::InQuiz { .. }, Err(err)) => Transition::AbortQuiz(err),

        (State::ResultsDisplayed { session }, Ok(ReviewStart)) => {
            match ReviewCursor::new(session.history().len()) {
                Some(cursor) => Transition::Review { session, cursor },
                None => Transition::NoHistory,
            }
        }
        (State::ResultsDisplayed { .. }, Ok(NewQuiz)) => Transition::BeginQuiz,
        (State::ResultsDisplayed { .. }, Ok(EndSession)) => Transition::EndSession,

        (State::ReviewQuestions { session, mut cursor }, Ok(ReviewNext)) => {
            cursor.next();
            Transition::Review { session, cursor }
        }
        (State::ReviewQuestions { session, mut cursor }, Ok(ReviewPrev)) => {
            cursor.prev();
            Transition::Review { session, cursor }
        }
        (State::ReviewQuestions { session, .. }, Ok(ReviewEnd)) => {
            Transition::EndReview { session }
        }

        _ => Transition::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{sample_question, Difficulty};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn shown_session() -> QuizSession {
        let mut session = QuizSession::new(
            (0..3)
                .map(|i| sample_question(Difficulty::Medium, i))
                .collect(),
        );
        session.present_current(&mut StdRng::seed_from_u64(1));
        session
    }

    fn finished_session() -> QuizSession {
        let mut session = shown_session();
        let mut rng = StdRng::seed_from_u64(2);
        session.answer(2).unwrap();
        while session.present_current(&mut rng).is_some() {
            session.answer(0).unwrap();
        }
        session
    }

    fn review_state(index: usize) -> State {
        let mut cursor = ReviewCursor::new(3).unwrap();
        for _ in 0..index {
            cursor.next();
        }
        State::ReviewQuestions {
            session: finished_session(),
            cursor,
        }
    }

    #[test]
    fn any_button_before_start_asks_for_start() {
        assert!(matches!(
            transition(State::Start, Ok(CallbackAction::StartQuiz)),
            Transition::NotStarted
        ));
        assert!(matches!(
            transition(State::Start, "nonsense".parse()),
            Transition::NotStarted
        ));
    }

    #[test]
    fn welcome_starts_the_quiz() {
        assert!(matches!(
            transition(State::Welcome, Ok(CallbackAction::StartQuiz)),
            Transition::BeginQuiz
        ));
        assert!(matches!(
            transition(State::Welcome, Ok(CallbackAction::ReviewNext)),
            Transition::Ignore
        ));
    }

    #[test]
    fn answer_in_quiz_is_graded() {
        let state = State::InQuiz {
            session: shown_session(),
        };
        match transition(state, Ok(CallbackAction::Answer(2))) {
            Transition::Answered {
                session,
                position,
                entry,
            } => {
                assert_eq!(position, 1);
                assert!(entry.is_correct);
                assert_eq!(session.score(), 1);
            }
            other => panic!("unexpected transition: {:?}", other),
        }
    }

    #[test]
    fn old_named_button_in_quiz_is_ignored() {
        for action in [
            CallbackAction::ReviewStart,
            CallbackAction::NewQuiz,
            CallbackAction::StartQuiz,
            CallbackAction::ReviewEnd,
        ] {
            let state = State::InQuiz {
                session: shown_session(),
            };
            assert!(matches!(transition(state, Ok(action)), Transition::Ignore));
        }
    }

    #[test]
    fn unparseable_payload_in_quiz_aborts() {
        let state = State::InQuiz {
            session: shown_session(),
        };
        assert!(matches!(
            transition(state, "garbage".parse()),
            Transition::AbortQuiz(QuizError::UnknownCallback(_))
        ));
    }

    #[test]
    fn out_of_range_option_in_quiz_aborts() {
        let state = State::InQuiz {
            session: shown_session(),
        };
        assert!(matches!(
            transition(state, Ok(CallbackAction::Answer(9))),
            Transition::AbortQuiz(QuizError::InvalidOption(9))
        ));
    }

    #[test]
    fn review_starts_at_first_answer() {
        let state = State::ResultsDisplayed {
            session: finished_session(),
        };
        match transition(state, Ok(CallbackAction::ReviewStart)) {
            Transition::Review { cursor, .. } => {
                assert_eq!(cursor.index(), 0);
                assert_eq!(cursor.len(), 3);
            }
            other => panic!("unexpected transition: {:?}", other),
        }
    }

    #[test]
    fn review_without_history_reports_it() {
        let state = State::ResultsDisplayed {
            session: QuizSession::default(),
        };
        assert!(matches!(
            transition(state, Ok(CallbackAction::ReviewStart)),
            Transition::NoHistory
        ));
    }

    #[test]
    fn results_offer_new_quiz_and_end() {
        let state = State::ResultsDisplayed {
            session: finished_session(),
        };
        assert!(matches!(
            transition(state.clone(), Ok(CallbackAction::NewQuiz)),
            Transition::BeginQuiz
        ));
        assert!(matches!(
            transition(state.clone(), Ok(CallbackAction::EndSession)),
            Transition::EndSession
        ));
        assert!(matches!(
            transition(state, Ok(CallbackAction::Answer(0))),
            Transition::Ignore
        ));
    }

    #[test]
    fn review_navigation_stays_in_bounds() {
        let cursor_after = |state: State, action: CallbackAction| match transition(state, Ok(action)) {
            Transition::Review { cursor, .. } => cursor.index(),
            other => panic!("unexpected transition: {:?}", other),
        };
        assert_eq!(cursor_after(review_state(0), CallbackAction::ReviewPrev), 0);
        assert_eq!(cursor_after(review_state(0), CallbackAction::ReviewNext), 1);
        assert_eq!(cursor_after(review_state(2), CallbackAction::ReviewNext), 2);
        assert_eq!(cursor_after(review_state(2), CallbackAction::ReviewPrev), 1);
    }

    #[test]
    fn ending_review_returns_to_results() {
        match transition(review_state(1), Ok(CallbackAction::ReviewEnd)) {
            Transition::EndReview { session } => assert_eq!(session.history().len(), 3),
            other => panic!("unexpected transition: {:?}", other),
        }
    }
}
