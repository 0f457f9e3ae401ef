// Texts and keyboards shown to the user. Everything coming from the question
// bank is HTML-escaped, messages are sent with `ParseMode::Html`.
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::utils::html;

use crate::callback::CallbackAction;
use crate::quiz::grading::{self, Proficiency};
use crate::quiz::review::ReviewCursor;
use crate::quiz::session::{HistoryEntry, ShownOption};
use crate::quiz::{Difficulty, Question, QUIZ_COMPOSITION, QUIZ_LENGTH};

const MAX_BUTTON_LABEL: usize = 63;
const TRUNCATED_BUTTON_LABEL: usize = 60;

pub const RESTART_TEXT: &str = "❌ Something went wrong with your quiz. Please try /start again.";
pub const INVALID_ANSWER_TEXT: &str = "Error processing your answer. Please try /start again.";
pub const NOT_STARTED_TEXT: &str = "Type /start to begin a GMP assessment.";
const NO_HISTORY_TEXT: &str = "No quiz history found to review. Try a new quiz with /start!";
pub const CANCEL_TEXT: &str = "❌ Assessment cancelled. Type /start to begin again.";
pub const END_SESSION_TEXT: &str =
    "Thanks for taking the GMP assessment! Type /start to begin a new one anytime. Keep learning! ✨";
pub const END_REVIEW_TEXT: &str = "Review finished! We hope this was helpful. 👍\n\n\
    Ready for another round or want to explore more? \
    Type /start to begin a new GMP assessment anytime. Keep learning and growing! 🌟";

pub fn welcome() -> String {
    let composition = QUIZ_COMPOSITION
        .iter()
        .map(|(difficulty, count)| {
            format!("• {} {} questions", html::bold(&format!("{}:", difficulty)), count)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "🌟 {} 🌟\n\n\
        This tool will test your knowledge of Good Manufacturing Practices (GMP) \
        with a random selection of {} questions.\n\n\
        The quiz includes questions from three difficulty levels:\n{}\n\n\
        Ready to challenge your GMP knowledge? Click 'Start Assessment' below!\n\
        You can type /cancel at any point to stop the current assessment.",
        html::bold("Welcome to the GMP Proficiency Assessment Bot!"),
        QUIZ_LENGTH,
        composition
    )
}

pub fn welcome_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button(
        "Start Assessment ✅",
        CallbackAction::StartQuiz,
    )]])
}

pub fn insufficient_questions() -> String {
    format!(
        "❌ {} Insufficient questions. Please contact admin.",
        html::bold("Error:")
    )
}

fn question_header(position: usize, difficulty: Difficulty, prompt: &str) -> String {
    format!(
        "🎓 {} (Difficulty: {})\n\n{}",
        html::bold(&format!("Question {}/{}", position, QUIZ_LENGTH)),
        difficulty,
        html::escape(prompt)
    )
}

pub fn question(position: usize, question: &Question) -> String {
    question_header(position, question.difficulty, &question.prompt)
}

pub fn question_keyboard(options: &[ShownOption]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        options
            .iter()
            .map(|option| {
                vec![button(
                    &button_label(&option.text),
                    CallbackAction::Answer(option.original_index),
                )]
            })
            .collect::<Vec<_>>(),
    )
}

/// The question again, followed by whether the answer was right.
pub fn answer_feedback(position: usize, entry: &HistoryEntry) -> String {
    let feedback = if entry.is_correct {
        "✅ Correct!".to_string()
    } else {
        format!(
            "❌ Incorrect. The correct answer was: {}",
            html::bold(&html::escape(&entry.correct_answer))
        )
    };
    format!(
        "{}\n\n{}",
        question_header(position, entry.difficulty, &entry.prompt),
        feedback
    )
}

pub fn results(score: usize, total: usize, encouragement: &str) -> String {
    let percentage = grading::percentage(score, total);
    let level = Proficiency::from_percentage(percentage);

    format!(
        "📊 {} 📊\n\n\
        ✅ {} {}/{}\n\
        📈 {} {:.1}%\n\
        🏆 {} {} {}\n\n\
        💡 {} {}\n\n\
        \"{}\"\n\n\
        What would you like to do next?",
        html::bold("Assessment Complete"),
        html::bold("Correct Answers:"),
        score,
        total,
        html::bold("Percentage:"),
        percentage,
        html::bold("Proficiency Level:"),
        level.icon(),
        html::bold(level.label()),
        html::bold("Recommendation:"),
        level.comment(),
        encouragement
    )
}

pub fn results_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button("🔍 Review Answers", CallbackAction::ReviewStart)],
        vec![button("🚀 New Quiz", CallbackAction::NewQuiz)],
        vec![button("🏁 End Session", CallbackAction::EndSession)],
    ])
}

/// Shown instead of a review when nothing was answered. The results buttons
/// stay so the user can carry on.
pub fn no_history() -> (String, InlineKeyboardMarkup) {
    (NO_HISTORY_TEXT.to_string(), results_keyboard())
}

pub fn review(cursor: &ReviewCursor, entry: &HistoryEntry) -> String {
    let icon = if entry.is_correct { "✅" } else { "❌" };
    let mut text = format!(
        "🔍 {}\n{}\n\n{}\n\nYour Answer: {} {}\n",
        html::bold(&format!(
            "Review: Question {}/{}",
            cursor.index() + 1,
            cursor.len()
        )),
        html::bold(&format!("(Difficulty: {})", entry.difficulty)),
        html::bold(&html::escape(&entry.prompt)),
        html::escape(&entry.chosen),
        icon
    );
    if !entry.is_correct {
        text.push_str(&format!(
            "Correct Answer: {}\n",
            html::bold(&html::escape(&entry.correct_answer))
        ));
    }
    if !entry.explanation.is_empty() {
        text.push_str(&format!(
            "\n{}\n{}",
            html::bold("Explanation:"),
            html::italic(&html::escape(&entry.explanation))
        ));
    }
    text
}

pub fn review_keyboard(cursor: &ReviewCursor) -> InlineKeyboardMarkup {
    let mut row = Vec::new();
    if cursor.has_prev() {
        row.push(button("⬅️ Previous", CallbackAction::ReviewPrev));
    }
    row.push(button("🏁 End Review", CallbackAction::ReviewEnd));
    if cursor.has_next() {
        row.push(button("➡️ Next", CallbackAction::ReviewNext));
    }
    InlineKeyboardMarkup::new(vec![row])
}

fn button(label: &str, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, action.data())
}

// Long labels are cut to fit on a button
fn button_label(text: &str) -> String {
    if text.chars().count() > MAX_BUTTON_LABEL {
        let cut = text.chars().take(TRUNCATED_BUTTON_LABEL).collect::<String>();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
