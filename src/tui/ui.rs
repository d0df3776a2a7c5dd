//! Drawing for each dashboard screen

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, Wrap},
};

use super::{App, Screen};
use crate::exercises::find_exercise;
use crate::goals::Goal;
use crate::session::{format_clock, Phase, RestKind, Session};

pub(super) fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(area);

    // Header
    let header = Paragraph::new("гиря girya - Kettlebell Circuits")
        .style(Style::default().fg(Color::Cyan).bold())
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    match (app.screen, app.session.as_ref()) {
        (Screen::Goals, _) => render_goals(app, frame, chunks[1]),
        (Screen::History, _) => render_history(app, frame, chunks[1]),
        (Screen::Session, Some(session)) => render_session(app, session, frame, chunks[1]),
        (Screen::ConfirmLeave, Some(session)) => {
            render_session(app, session, frame, chunks[1]);
            render_confirm(frame, chunks[1]);
        }
        (Screen::Summary, Some(session)) => render_summary(app, session, frame, chunks[1]),
        _ => render_goals(app, frame, chunks[1]),
    }

    // Footer
    let footer = Paragraph::new(app.status.clone().unwrap_or_else(|| footer_keys(app).to_string()))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[2]);
}

fn footer_keys(app: &App) -> &'static str {
    if app.weight_input.is_some() {
        return "0-9: type weight | enter: save | empty or -: clear | esc: cancel";
    }
    match app.screen {
        Screen::Goals => "↑↓: choose goal | enter: generate | h: history | q: quit",
        Screen::History => "↑↓: select | enter: open | d: delete | r: refresh | g: goals | q: quit",
        Screen::Session => "enter: done | w: weight | s: skip rest | f: finish early | esc: leave",
        Screen::ConfirmLeave => "y: leave without saving | n: stay",
        Screen::Summary => "enter: new workout | h: history | q: quit",
    }
}

fn selected(is_selected: bool) -> Style {
    if is_selected {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn render_goals(app: &App, frame: &mut Frame, area: Rect) {
    let rows: Vec<Row> = Goal::all()
        .iter()
        .enumerate()
        .map(|(i, goal)| {
            let c = goal.config();
            Row::new(vec![
                Cell::from(c.label),
                Cell::from(format!("{}-{}", c.reps_min, c.reps_max)),
                Cell::from(c.rounds.to_string()),
                Cell::from(format!("{}s / {}s", c.rest_between_exercises, c.rest_between_rounds)),
                Cell::from(c.description),
            ])
            .style(selected(i == app.goal_index))
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(11),
            Constraint::Min(20),
        ],
    )
    .header(Row::new(vec!["Goal", "Reps", "Rounds", "Rest", ""]).style(Style::default().bold()))
    .block(Block::default().borders(Borders::ALL).title("New workout"));

    frame.render_widget(table, area);
}

fn render_history(app: &App, frame: &mut Frame, area: Rect) {
    if app.history.is_empty() {
        let empty = Paragraph::new("No workouts yet. Press g and pick a goal.")
            .block(Block::default().borders(Borders::ALL).title("History"));
        frame.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = app
        .history
        .iter()
        .enumerate()
        .map(|(i, w)| {
            Row::new(vec![
                Cell::from(w.date.format("%Y-%m-%d %H:%M").to_string()),
                Cell::from(w.goal_label.clone()),
                Cell::from(w.status_label()),
                Cell::from(w.circuit_line()),
            ])
            .style(selected(i == app.history_index))
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(17),
            Constraint::Length(16),
            Constraint::Length(12),
            Constraint::Min(20),
        ],
    )
    .header(Row::new(vec!["Date", "Goal", "Status", "Circuit"]).style(Style::default().bold()))
    .block(Block::default().borders(Borders::ALL).title("History"));

    frame.render_widget(table, area);
}

fn render_session(app: &App, session: &Session, frame: &mut Frame, area: Rect) {
    let [main, gauge] = Layout::vertical([Constraint::Min(7), Constraint::Length(3)]).areas(area);
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(main);

    match session.phase() {
        Phase::Resting { remaining, kind } => render_rest(session, remaining, kind, frame, left),
        _ => render_exercise(app, session, frame, left),
    }

    // Circuit with done / current markers
    let index = session.exercise_index();
    let lines: Vec<Line> = session
        .workout()
        .exercises
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let (marker, style) = if session.is_completed() || i < index {
                ("✓", Style::default().fg(Color::Green))
            } else if i == index {
                ("▶", Style::default().fg(Color::Yellow).bold())
            } else {
                (" ", Style::default())
            };
            Line::styled(format!("{} {}. {}", marker, i + 1, e.name), style)
        })
        .collect();
    let circuit = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Round {}/{}", session.round(), session.workout().rounds)),
    );
    frame.render_widget(circuit, right);

    let progress = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(session.progress().clamp(0.0, 1.0));
    frame.render_widget(progress, gauge);
}

fn render_exercise(app: &App, session: &Session, frame: &mut Frame, area: Rect) {
    let Some(exercise) = session.current() else {
        return;
    };

    let weight = match &app.weight_input {
        Some(input) => Span::styled(format!("{}_ {}", input, app.unit), Style::default().fg(Color::Yellow)),
        None => Span::raw(app.unit.format(session.weight())),
    };
    let last = exercise
        .suggested_weight
        .map(|w| format!("   last time: {}", app.unit.format(Some(w))))
        .unwrap_or_default();

    let mut lines = vec![
        Line::styled(exercise.name.clone(), Style::default().bold()),
        Line::from(format!("{} reps", exercise.reps)),
        Line::from(vec![Span::raw("Weight: "), weight, Span::styled(last, Style::default().fg(Color::DarkGray))]),
    ];
    if let Some(cue) = find_exercise(&exercise.exercise_id).and_then(|e| e.description) {
        lines.push(Line::default());
        lines.push(Line::styled(cue, Style::default().fg(Color::DarkGray)));
    }

    let title = format!(
        "{} - exercise {}/{}",
        session.workout().goal_label,
        session.exercise_index() + 1,
        session.workout().exercises.len()
    );
    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(panel, area);
}

fn render_rest(session: &Session, remaining: u32, kind: RestKind, frame: &mut Frame, area: Rect) {
    let title = match kind {
        RestKind::BetweenExercises => "Rest".to_string(),
        RestKind::BetweenRounds => format!("Rest before round {}", session.round()),
    };
    let next = session.current().map(|e| e.name.clone()).unwrap_or_default();

    let lines = vec![
        Line::styled(format_clock(remaining), Style::default().fg(Color::Green).bold()),
        Line::default(),
        Line::from(format!("Next: {}", next)),
        Line::styled("s: skip rest", Style::default().fg(Color::DarkGray)),
    ];
    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(panel, area);
}

fn render_confirm(frame: &mut Frame, area: Rect) {
    let popup = centered(area, 44, 5);
    let text = Paragraph::new(vec![
        Line::from("Leave this workout?"),
        Line::styled("Progress since the last save is lost.", Style::default().fg(Color::DarkGray)),
        Line::from("y / n"),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Yellow)));
    frame.render_widget(Clear, popup);
    frame.render_widget(text, popup);
}

fn render_summary(app: &App, session: &Session, frame: &mut Frame, area: Rect) {
    let workout = session.snapshot();

    let rows: Vec<Row> = workout
        .exercises
        .iter()
        .map(|e| {
            Row::new(vec![
                Cell::from(if e.completed { "✓" } else { " " }),
                Cell::from(e.name.clone()),
                Cell::from(e.reps.to_string()),
                Cell::from(app.unit.format(e.weight)),
            ])
        })
        .collect();

    let title = format!(
        "{} - {} rounds - {}",
        workout.goal_label,
        workout.rounds,
        workout.status_label()
    );
    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Min(20),
            Constraint::Length(6),
            Constraint::Length(10),
        ],
    )
    .header(Row::new(vec!["", "Exercise", "Reps", "Weight"]).style(Style::default().bold()))
    .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(table, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width),
        Constraint::Fill(1),
    ])
    .areas(middle);
    center
}
