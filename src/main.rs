mod callback;
mod config;
mod flow;
mod messages;
mod quiz;

use std::sync::Arc;

use callback::CallbackAction;
use config::Config;
use dotenv::dotenv;
use flow::{State, Transition};
use quiz::{bank::QuestionBank, grading, review::ReviewCursor, session::QuizSession, Difficulty, QuizError};
use teloxide::{
    dispatching::{
        dialogue::{self, ErasedStorage, InMemStorage, Storage},
        UpdateHandler,
    },
    prelude::*,
    types::{InlineKeyboardMarkup, ParseMode},
    update_listeners::Polling,
    utils::command::BotCommands,
    ApiError, RequestError,
};

type QuizDialogue = Dialogue<State, ErasedStorage<State>>;
type HandlerError = Box<dyn std::error::Error + Send + Sync>;
type HandlerResult = Result<(), HandlerError>;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
enum Command {
    #[command(description = "🚀 Begin/Restart GMP Assessment")]
    Start,
    #[command(description = "❌ Cancel current action")]
    Cancel,
}

type QuizStorage = Arc<ErasedStorage<State>>;

#[tokio::main]
async fn main() {
    // The variables may just as well come from the environment
    dotenv().ok();
    init_logging();
    log::info!("Starting GMP assessment bot...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("{}. Please check your .env file or environment variables.", err);
            return;
        }
    };

    let bank = match &config.questions_path {
        Some(path) => {
            log::info!("Loading questions from {}", path.display());
            QuestionBank::load(path)
        }
        None => QuestionBank::bundled(),
    };
    let bank = match bank {
        Ok(bank) => bank,
        Err(err) => {
            log::error!("Unable to load the question bank: {}", err);
            return;
        }
    };
    log::info!(
        "Question bank loaded: {} questions (easy: {}, medium: {}, hard: {})",
        bank.len(),
        bank.count(Difficulty::Easy),
        bank.count(Difficulty::Medium),
        bank.count(Difficulty::Hard)
    );

    let bot = Bot::new(config.bot_token.clone());

    match bot.set_my_commands(Command::bot_commands()).await {
        Ok(_) => log::info!("Bot commands set successfully."),
        Err(err) => log::warn!("Unable to register bot commands: {}", err),
    }

    let storage: QuizStorage = InMemStorage::<State>::new().erase();

    // Updates sent while the bot was down are not replayed
    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![storage, Arc::new(bank), Arc::new(config)])
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;
}

fn init_logging() {
    let mut builder = pretty_env_logger::formatted_timed_builder();
    builder.filter_level(log::LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn schema() -> UpdateHandler<HandlerError> {
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start].endpoint(start))
        .branch(case![Command::Cancel].endpoint(cancel));

    // Plain text is left alone, the conversation runs on buttons
    let message_handler = Update::filter_message().branch(command_handler);

    let callback_query_handler = Update::filter_callback_query().endpoint(on_callback);

    dialogue::enter::<Update, ErasedStorage<State>, State, _>()
        .branch(message_handler)
        .branch(callback_query_handler)
}

async fn start(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, messages::welcome())
        .parse_mode(ParseMode::Html)
        .reply_markup(messages::welcome_keyboard())
        .await?;

    // Restarting drops whatever quiz was running
    dialogue.update(State::Welcome).await?;
    Ok(())
}

async fn cancel(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    reset_dialogue(&dialogue).await;
    bot.send_message(msg.chat.id, messages::CANCEL_TEXT).await?;

    log::info!("Chat {} cancelled the assessment", msg.chat.id.0);
    Ok(())
}

/// Every button press ends up here. When carrying out the transition fails the
/// user is asked to start over and the session is dropped.
async fn on_callback(
    bot: Bot,
    dialogue: QuizDialogue,
    bank: Arc<QuestionBank>,
    config: Arc<Config>,
    state: State,
    q: CallbackQuery,
) -> HandlerResult {
    let step = flow::transition(state, parse_action(&q));

    match apply(&bot, &dialogue, &bank, &config, &q, step).await {
        Ok(()) => Ok(()),
        Err(err) => {
            log::error!("Chat {}: {}", dialogue.chat_id().0, err);
            if let Err(send_err) = bot
                .send_message(dialogue.chat_id(), messages::RESTART_TEXT)
                .await
            {
                log::warn!("Unable to send restart notice: {}", send_err);
            }
            reset_dialogue(&dialogue).await;
            Err(err)
        }
    }
}

/// Drops the chat's session so the next button press starts from scratch.
/// Storage complains when there is no session to drop, which only gets logged.
async fn reset_dialogue(dialogue: &QuizDialogue) {
    if let Err(err) = dialogue.exit().await {
        log::debug!("Nothing to reset in chat {}: {}", dialogue.chat_id().0, err);
    }
}

async fn apply(
    bot: &Bot,
    dialogue: &QuizDialogue,
    bank: &QuestionBank,
    config: &Config,
    q: &CallbackQuery,
    step: Transition,
) -> HandlerResult {
    let mut ack = bot.answer_callback_query(q.id.clone());
    if let Transition::NotStarted = step {
        ack = ack.text(messages::NOT_STARTED_TEXT);
    }
    // An expired query cannot be answered, the button still gets handled
    if let Err(err) = ack.await {
        log::warn!("Unable to answer callback query: {}", err);
    }

    match step {
        Transition::NotStarted => Ok(()),
        Transition::Ignore => {
            log::debug!(
                "Ignoring {:?} in chat {}, it does not apply here",
                q.data,
                dialogue.chat_id().0
            );
            Ok(())
        }
        Transition::BeginQuiz => begin_quiz(bot, dialogue, bank, q).await,
        Transition::Answered {
            session,
            position,
            entry,
        } => {
            show(
                bot,
                dialogue,
                q,
                messages::answer_feedback(position, &entry),
                None,
            )
            .await?;

            tokio::time::sleep(config.feedback_delay).await;

            ask_question(bot, dialogue, q, session).await
        }
        Transition::AbortQuiz(err) => {
            log::error!(
                "Error processing answer in chat {}: {}",
                dialogue.chat_id().0,
                err
            );
            show(bot, dialogue, q, messages::INVALID_ANSWER_TEXT.to_string(), None).await?;
            dialogue.exit().await?;
            Ok(())
        }
        Transition::Review { session, cursor } => {
            show_review(bot, dialogue, q, session, cursor).await
        }
        Transition::NoHistory => {
            let (text, keyboard) = messages::no_history();
            show(bot, dialogue, q, text, Some(keyboard)).await
        }
        Transition::EndReview { session } => {
            show(bot, dialogue, q, messages::END_REVIEW_TEXT.to_string(), None).await?;

            // The review message keeps the farewell, the results come back below it
            let encouragement = grading::encouragement(&mut rand::thread_rng());
            bot.send_message(
                dialogue.chat_id(),
                messages::results(session.score(), session.total(), encouragement),
            )
            .parse_mode(ParseMode::Html)
            .reply_markup(messages::results_keyboard())
            .await?;

            dialogue.update(State::ResultsDisplayed { session }).await?;
            Ok(())
        }
        Transition::EndSession => {
            show(bot, dialogue, q, messages::END_SESSION_TEXT.to_string(), None).await?;
            dialogue.exit().await?;
            log::info!("Chat {} ended the session", dialogue.chat_id().0);
            Ok(())
        }
    }
}

async fn begin_quiz(
    bot: &Bot,
    dialogue: &QuizDialogue,
    bank: &QuestionBank,
    q: &CallbackQuery,
) -> HandlerResult {
    let composed = bank.compose(&mut rand::thread_rng());
    let session = match composed {
        Ok(questions) => QuizSession::new(questions),
        Err(err) => {
            log::error!("Cannot compose a quiz for chat {}: {}", dialogue.chat_id().0, err);
            show(bot, dialogue, q, messages::insufficient_questions(), None).await?;
            dialogue.exit().await?;
            return Ok(());
        }
    };

    log::info!("Chat {} started a new quiz", dialogue.chat_id().0);
    ask_question(bot, dialogue, q, session).await
}

/// Shows the next question, or the results once every question is answered.
async fn ask_question(
    bot: &Bot,
    dialogue: &QuizDialogue,
    q: &CallbackQuery,
    mut session: QuizSession,
) -> HandlerResult {
    let options = session.present_current(&mut rand::thread_rng());
    let (Some(options), Some(question)) = (options, session.current_question()) else {
        return show_results(bot, dialogue, q, session).await;
    };

    let text = messages::question(session.position(), question);
    show(
        bot,
        dialogue,
        q,
        text,
        Some(messages::question_keyboard(&options)),
    )
    .await?;

    dialogue.update(State::InQuiz { session }).await?;
    Ok(())
}

async fn show_results(
    bot: &Bot,
    dialogue: &QuizDialogue,
    q: &CallbackQuery,
    session: QuizSession,
) -> HandlerResult {
    log::info!(
        "Chat {} finished a quiz with {}/{}",
        dialogue.chat_id().0,
        session.score(),
        session.total()
    );

    let encouragement = grading::encouragement(&mut rand::thread_rng());
    let text = messages::results(session.score(), session.total(), encouragement);
    show(bot, dialogue, q, text, Some(messages::results_keyboard())).await?;

    dialogue.update(State::ResultsDisplayed { session }).await?;
    Ok(())
}

async fn show_review(
    bot: &Bot,
    dialogue: &QuizDialogue,
    q: &CallbackQuery,
    session: QuizSession,
    cursor: ReviewCursor,
) -> HandlerResult {
    let Some(entry) = session.history().get(cursor.index()) else {
        log::warn!(
            "Review index {} is out of range in chat {}",
            cursor.index(),
            dialogue.chat_id().0
        );
        return show_results(bot, dialogue, q, session).await;
    };

    show(
        bot,
        dialogue,
        q,
        messages::review(&cursor, entry),
        Some(messages::review_keyboard(&cursor)),
    )
    .await?;

    dialogue
        .update(State::ReviewQuestions { session, cursor })
        .await?;
    Ok(())
}

fn parse_action(q: &CallbackQuery) -> Result<CallbackAction, QuizError> {
    q.data.as_deref().unwrap_or_default().parse()
}

/// Replaces the message the pressed button belongs to. If that fails the text
/// is sent as a new message instead.
async fn show(
    bot: &Bot,
    dialogue: &QuizDialogue,
    q: &CallbackQuery,
    text: String,
    keyboard: Option<InlineKeyboardMarkup>,
) -> HandlerResult {
    if let Some(message) = &q.message {
        let mut edit = bot
            .edit_message_text(message.chat.id, message.id, text.clone())
            .parse_mode(ParseMode::Html);
        if let Some(keyboard) = keyboard.clone() {
            edit = edit.reply_markup(keyboard);
        }

        match edit.await {
            Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => return Ok(()),
            Err(err) => log::error!(
                "Unable to edit message in chat {}: {}",
                message.chat.id.0,
                err
            ),
        }
    }

    let mut send = bot
        .send_message(dialogue.chat_id(), text)
        .parse_mode(ParseMode::Html);
    if let Some(keyboard) = keyboard {
        send = send.reply_markup(keyboard);
    }
    send.await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::{ChatId, Me};

    #[tokio::test]
    async fn reset_leaves_no_session_behind() {
        let storage: QuizStorage = InMemStorage::<State>::new().erase();
        let dialogue = QuizDialogue::new(storage, ChatId(42));
        dialogue
            .update(State::InQuiz {
                session: QuizSession::default(),
            })
            .await
            .unwrap();

        reset_dialogue(&dialogue).await;

        assert!(dialogue.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reset_without_session_is_harmless() {
        let storage: QuizStorage = InMemStorage::<State>::new().erase();
        let dialogue = QuizDialogue::new(storage, ChatId(7));

        reset_dialogue(&dialogue).await;

        assert!(dialogue.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn plain_text_is_left_unhandled() {
        let update: Update = serde_json::from_str(
            r#"{
                "update_id": 1,
                "message": {
                    "message_id": 10,
                    "date": 1700000000,
                    "chat": {"id": 42, "type": "private", "first_name": "Ann"},
                    "from": {"id": 42, "is_bot": false, "first_name": "Ann"},
                    "text": "what now?"
                }
            }"#,
        )
        .unwrap();
        let me: Me = serde_json::from_str(
            r#"{
                "id": 1,
                "is_bot": true,
                "first_name": "Quiz",
                "username": "gmp_quiz_bot",
                "can_join_groups": true,
                "can_read_all_group_messages": false,
                "supports_inline_queries": false
            }"#,
        )
        .unwrap();
        let storage: QuizStorage = InMemStorage::<State>::new().erase();

        let outcome = schema()
            .dispatch(dptree::deps![update, me, storage, Bot::new("0:test")])
            .await;

        assert!(matches!(outcome, std::ops::ControlFlow::Continue(_)));
    }

    #[test]
    fn restart_notice_points_to_start() {
        assert!(messages::RESTART_TEXT.contains("/start"));
    }
}
