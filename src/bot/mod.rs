//! Telegram bot module - generate a circuit and train through it from the chat

use std::collections::HashMap;
use std::sync::Arc;
use teloxide::{
    prelude::*,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup},
    utils::command::BotCommands,
    dispatching::dialogue::{InMemStorage, Dialogue},
};
use tokio::sync::Mutex;
use tracing::{info, error};

use crate::config::WeightUnit;
use crate::exercises::find_exercise;
use crate::goals::Goal;
use crate::service::WorkoutService;
use crate::session::{format_clock, parse_weight, Phase, RestKind, RestTimer, Session};
use crate::workout::Workout;

type MyDialogue = Dialogue<State, InMemStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type SharedService = Arc<Mutex<WorkoutService>>;
type Timers = Arc<Mutex<HashMap<ChatId, RestTimer>>>;

/// Workouts shown by /history
const HISTORY_LIMIT: usize = 5;

#[derive(Clone, Default)]
pub enum State {
    #[default]
    Idle,
    /// A workout is being performed
    Training { session: Session },
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Commands:")]
pub enum Command {
    #[command(description = "Pick a goal and generate a workout")]
    Start,
    #[command(description = "Show help")]
    Help,
    #[command(description = "Recent workouts")]
    History,
    #[command(description = "Continue the last unfinished workout")]
    Resume,
}

/// One button per goal
fn make_goals_keyboard() -> InlineKeyboardMarkup {
    let buttons: Vec<Vec<InlineKeyboardButton>> = Goal::all()
        .iter()
        .map(|goal| {
            let c = goal.config();
            let label = format!("{} · {}-{} reps", c.label, c.reps_min, c.reps_max);
            vec![InlineKeyboardButton::callback(label, format!("goal:{}", goal.key()))]
        })
        .collect();

    InlineKeyboardMarkup::new(buttons)
}

fn make_exercise_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("✅ Done", "done"),
        InlineKeyboardButton::callback("🏁 Finish early", "finish"),
    ]])
}

fn make_rest_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("⏭ Skip rest", "skip"),
        InlineKeyboardButton::callback("🏁 Finish early", "finish"),
    ]])
}

fn exercise_text(session: &Session, unit: WeightUnit) -> String {
    let workout = session.workout();
    let Some(exercise) = session.current() else {
        return "This circuit has no exercises.".to_string();
    };

    let mut text = format!(
        "{} · round {}/{} · exercise {}/{}\n\n{} - {} reps\nWeight: {}",
        workout.goal_label,
        session.round(),
        workout.rounds,
        session.exercise_index() + 1,
        workout.exercises.len(),
        exercise.name,
        exercise.reps,
        unit.format(session.weight())
    );
    if let Some(last) = exercise.suggested_weight {
        text.push_str(&format!(" (last: {})", unit.format(Some(last))));
    }
    if let Some(cue) = find_exercise(&exercise.exercise_id).and_then(|e| e.description) {
        text.push_str(&format!("\n{}", cue));
    }
    text.push_str("\n\nSend a number to set the weight, - to clear it.");
    text
}

fn rest_text(session: &Session) -> Option<String> {
    let Phase::Resting { remaining, kind } = session.phase() else {
        return None;
    };
    let title = match kind {
        RestKind::BetweenExercises => "Rest".to_string(),
        RestKind::BetweenRounds => format!("Rest before round {}", session.round()),
    };
    let next = session.current().map(|e| e.name.as_str()).unwrap_or("-");
    Some(format!("⏱ {} {}\n\nNext: {}", title, format_clock(remaining), next))
}

fn summary_text(workout: &Workout, unit: WeightUnit) -> String {
    let mut text = format!(
        "🏆 Workout complete!\n\n{} - {} rounds\n\n",
        workout.goal_label, workout.rounds
    );
    for e in &workout.exercises {
        text.push_str(&format!(
            "{} {} - {} reps, {}\n",
            if e.completed { "✓" } else { "•" },
            e.name,
            e.reps,
            unit.format(e.weight)
        ));
    }
    text.push_str("\n/start - next workout");
    text
}

fn history_text(workouts: &[Workout], unit: WeightUnit) -> String {
    if workouts.is_empty() {
        return "No workouts yet. Press /start!".to_string();
    }

    let mut text = String::from("📊 Recent workouts:\n");
    for w in workouts.iter().take(HISTORY_LIMIT) {
        text.push_str(&format!(
            "\n{} - {} ({})\n{}\n",
            w.date.format("%Y-%m-%d"),
            w.goal_label,
            w.status_label(),
            w.circuit_line()
        ));
        let weights: Vec<_> = w
            .weighted_exercises()
            .map(|(name, weight)| format!("{} {}", name, unit.format(Some(weight))))
            .collect();
        if !weights.is_empty() {
            text.push_str(&format!("Weights: {}\n", weights.join(", ")));
        }
    }
    text
}

fn failure_text(err: &(dyn std::error::Error + Send + Sync)) -> String {
    format!("⚠️ That did not go through: {}\n\nNothing was lost, press the button again.", err)
}

/// Start the Telegram bot
pub async fn run_bot(token: String, service: WorkoutService, unit: WeightUnit) -> anyhow::Result<()> {
    let bot = Bot::new(token);
    let service: SharedService = Arc::new(Mutex::new(service));
    let timers: Timers = Arc::new(Mutex::new(HashMap::new()));

    info!("Bot started");

    let handler = dptree::entry()
        .enter_dialogue::<Update, InMemStorage<State>, State>()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(
            Update::filter_message()
                .endpoint(handle_message),
        )
        .branch(
            Update::filter_callback_query()
                .endpoint(handle_callback),
        );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![InMemStorage::<State>::new(), service, timers, unit])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn cancel_rest(timers: &Timers, chat_id: ChatId) {
    if let Some(timer) = timers.lock().await.get_mut(&chat_id) {
        timer.cancel();
    }
}

/// Forget the chat's timer once its workout is over; dropping cancels it
async fn drop_rest(timers: &Timers, chat_id: ChatId) {
    timers.lock().await.remove(&chat_id);
}

/// Show the next exercise once the countdown runs out
async fn rest_over(bot: Bot, dialogue: MyDialogue, unit: WeightUnit) -> HandlerResult {
    let Some(State::Training { mut session }) = dialogue.get().await? else {
        return Ok(());
    };
    if !session.is_resting() {
        return Ok(());
    }

    session.skip_rest();
    let text = format!("Rest over!\n\n{}", exercise_text(&session, unit));
    dialogue.update(State::Training { session }).await?;
    bot.send_message(dialogue.chat_id(), text)
        .reply_markup(make_exercise_keyboard())
        .await?;
    Ok(())
}

async fn start_session(
    bot: &Bot,
    dialogue: &MyDialogue,
    timers: &Timers,
    workout: Workout,
    unit: WeightUnit,
) -> HandlerResult {
    drop_rest(timers, dialogue.chat_id()).await;
    let session = Session::start(workout);
    let text = exercise_text(&session, unit);
    dialogue.update(State::Training { session }).await?;
    bot.send_message(dialogue.chat_id(), text)
        .reply_markup(make_exercise_keyboard())
        .await?;
    Ok(())
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    dialogue: MyDialogue,
    service: SharedService,
    timers: Timers,
    unit: WeightUnit,
) -> HandlerResult {
    match cmd {
        Command::Start => {
            let text = "🏋 гиря girya\n\n\
                Kettlebell circuits, one exercise at a time.\n\n\
                Pick a goal:";
            bot.send_message(msg.chat.id, text)
                .reply_markup(make_goals_keyboard())
                .await?;
        }

        Command::Help => {
            let text = format!(
                "{}\n\nDuring a workout send a number to set the weight for the \
                current exercise, or - to clear it.",
                Command::descriptions()
            );
            bot.send_message(msg.chat.id, text).await?;
        }

        Command::History => {
            let workouts = service.lock().await.list_workouts();
            bot.send_message(msg.chat.id, history_text(&workouts, unit)).await?;
        }

        Command::Resume => {
            let unfinished = service.lock().await.latest_unfinished();
            match unfinished {
                Some(workout) => {
                    info!("Chat {} resumed workout {}", msg.chat.id, workout.id);
                    start_session(&bot, &dialogue, &timers, workout, unit).await?;
                }
                None => {
                    bot.send_message(msg.chat.id, "Nothing to resume. Press /start!").await?;
                }
            }
        }
    }

    Ok(())
}

async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    dialogue: MyDialogue,
    service: SharedService,
    timers: Timers,
    unit: WeightUnit,
) -> HandlerResult {
    let chat_id = dialogue.chat_id();

    if let Some(data) = q.data.as_deref()
        && let Err(e) = on_button(&bot, data, &dialogue, &service, &timers, unit).await
    {
        error!("Button {} failed for {}: {}", data, chat_id, e);
        bot.send_message(chat_id, failure_text(e.as_ref())).await?;
    }

    bot.answer_callback_query(q.id).await?;
    Ok(())
}

/// Apply one inline button press
async fn on_button(
    bot: &Bot,
    data: &str,
    dialogue: &MyDialogue,
    service: &SharedService,
    timers: &Timers,
    unit: WeightUnit,
) -> HandlerResult {
    let chat_id = dialogue.chat_id();

    if let Some(goal) = data.strip_prefix("goal:") {
        let workout = service.lock().await.create_workout(goal)?;
        info!("Chat {} started {} workout {}", chat_id, workout.goal, workout.id);
        return start_session(bot, dialogue, timers, workout, unit).await;
    }

    let Some(State::Training { mut session }) = dialogue.get().await? else {
        bot.send_message(chat_id, "No workout in progress. Press /start!").await?;
        return Ok(());
    };

    match data {
        "done" => {
            let phase = {
                let service = service.lock().await;
                session.complete_exercise(service.store())?
            };
            match phase {
                Phase::Resting { remaining, .. } => {
                    let text = rest_text(&session).unwrap_or_default();
                    dialogue.update(State::Training { session }).await?;
                    bot.send_message(chat_id, text)
                        .reply_markup(make_rest_keyboard())
                        .await?;

                    let (timer_bot, timer_dialogue) = (bot.clone(), dialogue.clone());
                    timers.lock().await.entry(chat_id).or_default().start(
                        remaining,
                        move || async move {
                            if let Err(e) = rest_over(timer_bot, timer_dialogue, unit).await {
                                error!("Failed to end rest for {}: {}", chat_id, e);
                            }
                        },
                    );
                }
                Phase::Active => {
                    let text = exercise_text(&session, unit);
                    dialogue.update(State::Training { session }).await?;
                    bot.send_message(chat_id, text)
                        .reply_markup(make_exercise_keyboard())
                        .await?;
                }
                Phase::Completed => {
                    drop_rest(timers, chat_id).await;
                    dialogue.reset().await?;
                    bot.send_message(chat_id, summary_text(&session.snapshot(), unit)).await?;
                }
            }
        }

        "skip" => {
            cancel_rest(timers, chat_id).await;
            if session.is_resting() {
                session.skip_rest();
                let text = exercise_text(&session, unit);
                dialogue.update(State::Training { session }).await?;
                bot.send_message(chat_id, text)
                    .reply_markup(make_exercise_keyboard())
                    .await?;
            }
        }

        "finish" => {
            {
                let service = service.lock().await;
                session.finish_early(service.store())?;
            }
            drop_rest(timers, chat_id).await;
            dialogue.reset().await?;
            bot.send_message(chat_id, summary_text(&session.snapshot(), unit)).await?;
        }

        _ => {}
    }

    Ok(())
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    dialogue: MyDialogue,
    unit: WeightUnit,
) -> HandlerResult {
    let state = dialogue.get().await?.unwrap_or_default();

    match state {
        State::Training { mut session } => {
            if let Some(text) = msg.text() {
                match parse_weight(text) {
                    Some(weight) => {
                        session.set_weight(weight);
                        let name = session.current().map(|e| e.name.clone()).unwrap_or_default();
                        dialogue.update(State::Training { session }).await?;
                        let response = match weight {
                            Some(_) => format!("{}: {}", name, unit.format(weight)),
                            None => format!("{}: weight cleared", name),
                        };
                        bot.send_message(msg.chat.id, response).await?;
                    }
                    None => {
                        bot.send_message(msg.chat.id, "Send a weight like 24, or - to clear it")
                            .await?;
                    }
                }
            }
        }

        State::Idle => {
            // Unknown message, suggest /start
            bot.send_message(msg.chat.id, "Press /start to pick a goal")
                .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::workout::fixtures::{exercise, workout};

    fn session() -> Session {
        let mut w = workout("w", vec![exercise("kb_swing", None), exercise("halo", None)]);
        w.exercises[0].suggested_weight = Some(24.0);
        w.rounds = 2;
        w.rest_between_exercises = 20;
        w.rest_between_rounds = 90;
        Session::start(w)
    }

    #[test]
    fn test_goals_keyboard_has_every_goal() {
        let keyboard = make_goals_keyboard();
        assert_eq!(keyboard.inline_keyboard.len(), Goal::all().len());
    }

    #[test]
    fn test_exercise_text_shows_weights() {
        let text = exercise_text(&session(), WeightUnit::Kg);
        assert!(text.contains("round 1/2"));
        assert!(text.contains("exercise 1/2"));
        assert!(text.contains("Weight: 24 kg (last: 24 kg)"));
    }

    #[test]
    fn test_rest_text() {
        let store = MemoryStore::new();
        let mut session = session();
        assert_eq!(rest_text(&session), None);

        session.complete_exercise(&store).unwrap();
        let text = rest_text(&session).unwrap();
        assert!(text.starts_with("⏱ Rest 0:20"));

        session.skip_rest();
        session.complete_exercise(&store).unwrap();
        let text = rest_text(&session).unwrap();
        assert!(text.contains("Rest before round 2 1:30"));
        assert!(text.ends_with(&format!("Next: {}", session.workout().exercises[0].name)));
    }

    #[test]
    fn test_summary_lists_weights() {
        let mut w = workout("w", vec![exercise("kb_swing", Some(20.0)), exercise("halo", None)]);
        w.exercises[0].completed = true;
        let text = summary_text(&w, WeightUnit::Lb);
        assert!(text.contains("✓"));
        assert!(text.contains("20 lb"));
        assert!(text.contains("—"));
    }

    #[test]
    fn test_failure_text_names_the_error() {
        let err: Box<dyn std::error::Error + Send + Sync> = Box::new(crate::db::StoreError::Io(
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only disk"),
        ));
        let text = failure_text(err.as_ref());
        assert!(text.contains("read-only disk"));
        assert!(text.contains("press the button again"));
    }

    #[tokio::test]
    async fn test_drop_rest_forgets_chat_and_cancels() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let timers: Timers = Arc::new(Mutex::new(HashMap::new()));
        timers.lock().await.entry(ChatId(7)).or_default().start(1, move || async move {
            flag.store(true, Ordering::SeqCst);
        });

        cancel_rest(&timers, ChatId(7)).await;
        assert_eq!(timers.lock().await.len(), 1);

        drop_rest(&timers, ChatId(7)).await;
        drop_rest(&timers, ChatId(8)).await;
        assert!(timers.lock().await.is_empty());

        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[test]
    fn test_history_text() {
        assert_eq!(history_text(&[], WeightUnit::Kg), "No workouts yet. Press /start!");

        let workouts: Vec<_> = (0..8)
            .map(|i| workout(&format!("w{i}"), vec![exercise("kb_swing", Some(16.0))]))
            .collect();
        let text = history_text(&workouts, WeightUnit::Kg);
        assert_eq!(text.matches("Weights:").count(), HISTORY_LIMIT);
        assert!(text.contains("16 kg"));
    }
}
