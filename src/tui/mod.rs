//! TUI module - Terminal dashboard with ratatui

mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};
use tracing::warn;

use crate::config::WeightUnit;
use crate::goals::Goal;
use crate::service::WorkoutService;
use crate::session::{parse_weight, Phase, Session};
use crate::workout::Workout;

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Goals,
    History,
    Session,
    /// Asked before dropping an unfinished session
    ConfirmLeave,
    Summary,
}

/// App state for TUI
pub struct App {
    service: WorkoutService,
    unit: WeightUnit,
    screen: Screen,
    goal_index: usize,
    history: Vec<Workout>,
    history_index: usize,
    session: Option<Session>,
    /// Text typed into the weight field, `Some` while editing
    weight_input: Option<String>,
    status: Option<String>,
    last_tick: Instant,
    should_quit: bool,
}

impl App {
    pub fn new(service: WorkoutService, unit: WeightUnit) -> Self {
        let history = service.list_workouts();
        Self {
            service,
            unit,
            screen: Screen::Goals,
            goal_index: 0,
            history,
            history_index: 0,
            session: None,
            weight_input: None,
            status: None,
            last_tick: Instant::now(),
            should_quit: false,
        }
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;

        let result = self.event_loop(&mut terminal);

        restore_terminal()?;
        result
    }

    fn event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::render(self, frame))?;
            self.handle_events()?;
            self.on_tick();
        }
        Ok(())
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            self.on_key(key.code);
        }
        Ok(())
    }

    /// Counts rest down once per elapsed second
    fn on_tick(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.is_resting() {
            self.last_tick = Instant::now();
            return;
        }
        if self.last_tick.elapsed() >= Duration::from_secs(1) {
            self.last_tick = Instant::now();
            session.tick();
        }
    }

    fn on_key(&mut self, code: KeyCode) {
        if self.weight_input.is_some() {
            self.on_weight_key(code);
            return;
        }

        match self.screen {
            Screen::Goals => self.on_goals_key(code),
            Screen::History => self.on_history_key(code),
            Screen::Session => self.on_session_key(code),
            Screen::ConfirmLeave => self.on_confirm_key(code),
            Screen::Summary => self.on_summary_key(code),
        }
    }

    fn on_goals_key(&mut self, code: KeyCode) {
        let goals = Goal::all();
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.goal_index = self.goal_index.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.goal_index = (self.goal_index + 1).min(goals.len() - 1)
            }
            KeyCode::Char('h') => self.show_history(),
            KeyCode::Enter => {
                let goal = goals[self.goal_index];
                match self.service.create_workout(goal.key()) {
                    Ok(workout) => self.open(workout),
                    Err(err) => self.status = Some(format!("Could not create workout: {}", err)),
                }
            }
            _ => {}
        }
    }

    fn on_history_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Char('g') => self.screen = Screen::Goals,
            KeyCode::Up | KeyCode::Char('k') => {
                self.history_index = self.history_index.saturating_sub(1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.history_index = (self.history_index + 1).min(self.history.len().saturating_sub(1))
            }
            KeyCode::Char('r') => self.refresh_history(),
            KeyCode::Enter => {
                if let Some(workout) = self.history.get(self.history_index).cloned() {
                    self.open(workout);
                }
            }
            KeyCode::Char('d') => {
                let Some(id) = self.history.get(self.history_index).map(|w| w.id.clone()) else {
                    return;
                };
                match self.service.delete_workout(&id) {
                    Ok(_) => self.status = Some("Workout deleted".to_string()),
                    Err(err) => self.status = Some(format!("Could not delete: {}", err)),
                }
                self.refresh_history();
            }
            _ => {}
        }
    }

    fn on_session_key(&mut self, code: KeyCode) {
        let Some(session) = self.session.as_mut() else {
            self.screen = Screen::Goals;
            return;
        };
        let store = self.service.store();

        match code {
            KeyCode::Enter | KeyCode::Char(' ') => match session.complete_exercise(store) {
                Ok(Phase::Completed) => self.screen = Screen::Summary,
                Ok(_) => {}
                Err(err) => {
                    warn!("Saving workout failed: {}", err);
                    self.status = Some(format!("Could not save workout: {}", err));
                }
            },
            KeyCode::Char('s') => session.skip_rest(),
            KeyCode::Char('w') => {
                self.weight_input = Some(session.weight().map(|w| w.to_string()).unwrap_or_default())
            }
            KeyCode::Char('f') => match session.finish_early(store) {
                Ok(()) => self.screen = Screen::Summary,
                Err(err) => {
                    warn!("Saving workout failed: {}", err);
                    self.status = Some(format!("Could not save workout: {}", err));
                }
            },
            KeyCode::Esc | KeyCode::Char('q') => self.screen = Screen::ConfirmLeave,
            _ => {}
        }
    }

    fn on_weight_key(&mut self, code: KeyCode) {
        let Some(input) = self.weight_input.as_mut() else {
            return;
        };
        match code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == ',' || c == '-' => input.push(c),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Esc => self.weight_input = None,
            KeyCode::Enter => match parse_weight(input) {
                Some(weight) => {
                    if let Some(session) = self.session.as_mut() {
                        session.set_weight(weight);
                    }
                    self.weight_input = None;
                    self.status = None;
                }
                None => self.status = Some(format!("Not a weight: {}", input)),
            },
            _ => {}
        }
    }

    fn on_confirm_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y') => {
                self.session = None;
                self.refresh_history();
                self.screen = Screen::Goals;
            }
            KeyCode::Char('n') | KeyCode::Esc => self.screen = Screen::Session,
            _ => {}
        }
    }

    fn on_summary_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('h') => {
                self.session = None;
                self.show_history();
            }
            KeyCode::Enter | KeyCode::Esc => {
                self.session = None;
                self.refresh_history();
                self.screen = Screen::Goals;
            }
            _ => {}
        }
    }

    fn open(&mut self, workout: Workout) {
        let session = Session::start(workout);
        self.screen = if session.is_completed() {
            Screen::Summary
        } else {
            Screen::Session
        };
        self.session = Some(session);
        self.status = None;
    }

    fn show_history(&mut self) {
        self.refresh_history();
        self.screen = Screen::History;
    }

    fn refresh_history(&mut self) {
        self.history = self.service.list_workouts();
        self.history_index = self.history_index.min(self.history.len().saturating_sub(1));
    }
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn app() -> App {
        App::new(WorkoutService::new(Box::new(MemoryStore::new())), WeightUnit::Kg)
    }

    fn press(app: &mut App, keys: &str) {
        for c in keys.chars() {
            app.on_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn test_enter_on_goal_starts_session() {
        let mut app = app();
        app.on_key(KeyCode::Down);
        app.on_key(KeyCode::Enter);

        assert_eq!(app.screen, Screen::Session);
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.workout().goal, Goal::all()[1]);
        assert_eq!(app.service.list_workouts().len(), 1);
    }

    #[test]
    fn test_leaving_session_asks_first() {
        let mut app = app();
        app.on_key(KeyCode::Enter);
        app.on_key(KeyCode::Esc);
        assert_eq!(app.screen, Screen::ConfirmLeave);

        press(&mut app, "n");
        assert_eq!(app.screen, Screen::Session);
        assert!(app.session.is_some());

        app.on_key(KeyCode::Esc);
        press(&mut app, "y");
        assert_eq!(app.screen, Screen::Goals);
        assert!(app.session.is_none());
        assert!(!app.service.list_workouts()[0].completed);
    }

    #[test]
    fn test_weight_entry() {
        let mut app = app();
        app.on_key(KeyCode::Enter);

        press(&mut app, "w");
        assert!(app.weight_input.is_some());
        press(&mut app, "20x");
        app.on_key(KeyCode::Enter);

        assert!(app.weight_input.is_none());
        assert_eq!(app.session.as_ref().unwrap().weight(), Some(20.0));

        press(&mut app, "w");
        app.on_key(KeyCode::Backspace);
        app.on_key(KeyCode::Backspace);
        app.on_key(KeyCode::Enter);
        assert_eq!(app.session.as_ref().unwrap().weight(), None);
    }

    #[test]
    fn test_rest_keys() {
        let mut app = app();
        app.on_key(KeyCode::Enter);
        app.on_key(KeyCode::Enter);
        assert!(app.session.as_ref().unwrap().is_resting());

        press(&mut app, "s");
        let session = app.session.as_ref().unwrap();
        assert!(!session.is_resting());
        assert_eq!(session.exercise_index(), 1);
    }

    #[test]
    fn test_finish_early_shows_summary() {
        let mut app = app();
        app.on_key(KeyCode::Enter);
        press(&mut app, "w");
        press(&mut app, "16");
        app.on_key(KeyCode::Enter);
        press(&mut app, "f");

        assert_eq!(app.screen, Screen::Summary);
        let saved = &app.service.list_workouts()[0];
        assert!(saved.completed);
        assert_eq!(saved.exercises[0].weight, Some(16.0));
    }

    #[test]
    fn test_history_open_and_delete() {
        let mut app = app();
        app.service.create_workout("strength").unwrap();
        app.service.create_workout("endurance").unwrap();

        press(&mut app, "h");
        assert_eq!(app.screen, Screen::History);
        assert_eq!(app.history.len(), 2);

        press(&mut app, "d");
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history[0].goal, Goal::Strength);

        app.on_key(KeyCode::Enter);
        assert_eq!(app.screen, Screen::Session);
    }

    #[test]
    fn test_completed_workout_opens_summary() {
        let mut app = app();
        let mut done = app.service.create_workout("strength").unwrap();
        done.completed = true;
        app.service.update_workout(&done.id.clone(), done).unwrap();

        press(&mut app, "h");
        app.on_key(KeyCode::Enter);
        assert_eq!(app.screen, Screen::Summary);
    }
}
