//! TUI rendering using ratatui.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap};

use hoop_core::plan::WorkoutPlan;
use hoop_core::profile::Day;
use hoop_core::prompt::format_hours;
use hoop_core::{Level, Position, Step, TimeOfDay};

use super::app::App;

const ACCENT: Color = Color::Rgb(249, 115, 22);

/// Render the current step.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // title
            Constraint::Min(6),    // step content
            Constraint::Length(2), // error + progress dots
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    render_title(f, app, chunks[0]);

    if app.wizard.is_loading() {
        render_loading(f, app, chunks[1]);
    } else {
        match app.wizard.step() {
            Step::Name => render_text_input(f, app.wizard.draft().name.as_str(), "Name", chunks[1]),
            Step::Age => render_text_input(f, app.wizard.draft().age.as_str(), "Age", chunks[1]),
            Step::Improvement => render_text_input(
                f,
                app.wizard.draft().improvement.as_str(),
                "Areas for improvement",
                chunks[1],
            ),
            Step::Position => render_positions(f, app, chunks[1]),
            Step::Level => render_levels(f, app, chunks[1]),
            Step::Schedule => render_schedule(f, app, chunks[1]),
            Step::Result => render_result(f, app, chunks[1]),
        }
    }

    render_footer(f, app, chunks[2]);
    render_status_bar(f, app, chunks[3]);
}

fn render_title(f: &mut Frame, app: &App, area: Rect) {
    let step = app.wizard.step();
    let (title, description) = if app.wizard.is_loading() {
        (
            "Creating Your Custom Workout Plan",
            "Our AI coach is designing exercises for your profile",
        )
    } else {
        (step.title(), step.description())
    };
    let text = vec![
        Line::from(Span::styled(
            title,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(description, Style::default().fg(Color::DarkGray))),
    ];
    let header =
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" HoopBuddy "));
    f.render_widget(header, area);
}

fn render_text_input(f: &mut Frame, value: &str, label: &str, area: Rect) {
    let line = Line::from(vec![
        Span::raw(value.to_string()),
        Span::styled("_", Style::default().fg(ACCENT).add_modifier(Modifier::SLOW_BLINK)),
    ]);
    let input = Paragraph::new(line)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(format!(" {label} ")));
    f.render_widget(input, area);
}

fn choice_line(selected: bool, under_cursor: bool, label: &str, detail: &str) -> Line<'static> {
    let marker = if selected { "(•) " } else { "( ) " };
    let style = if under_cursor {
        Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let mut spans = vec![Span::styled(format!("{marker}{label}"), style)];
    if !detail.is_empty() {
        spans.push(Span::styled(
            format!("  {detail}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn render_positions(f: &mut Frame, app: &App, area: Rect) {
    let chosen = app.wizard.draft().position;
    let lines: Vec<Line> = Position::ALL
        .iter()
        .enumerate()
        .map(|(i, p)| {
            choice_line(
                chosen == Some(*p),
                i == app.position_cursor,
                p.label(),
                p.description(),
            )
        })
        .collect();
    let list =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Position "));
    f.render_widget(list, area);
}

fn render_levels(f: &mut Frame, app: &App, area: Rect) {
    let chosen = app.wizard.draft().level;
    let lines: Vec<Line> = Level::ALL
        .iter()
        .enumerate()
        .map(|(i, l)| choice_line(chosen == Some(*l), i == app.level_cursor, l.label(), ""))
        .collect();
    let list = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Level "));
    f.render_widget(list, area);
}

fn render_schedule(f: &mut Frame, app: &App, area: Rect) {
    let header_cells = ["", "Day", "Hours", "Morning", "Afternoon", "Evening"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1);

    let schedule = &app.wizard.draft().schedule;
    let rows = Day::ALL.iter().enumerate().map(|(i, day)| {
        let availability = schedule.get(*day);
        let check = |t: TimeOfDay| {
            if availability.time_of_day.contains(&t) { "[x]" } else { "[ ]" }
        };
        let style = if i == app.day_cursor {
            Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
        } else if !availability.selected {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(if availability.selected { "[x]" } else { "[ ]" }),
            Cell::from(day.label()),
            Cell::from(format_hours(availability.hours)),
            Cell::from(check(TimeOfDay::Morning)),
            Cell::from(check(TimeOfDay::Afternoon)),
            Cell::from(check(TimeOfDay::Evening)),
        ])
        .style(style)
    });

    let title = format!(" Schedule ({} days selected) ", schedule.selected_count());
    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(11),
            Constraint::Length(6),
            Constraint::Length(9),
            Constraint::Length(11),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(table, area);
}

fn render_loading(f: &mut Frame, app: &App, area: Rect) {
    let draft = app.wizard.draft();
    let position = draft.position.map(|p| p.name()).unwrap_or("player");
    let level = draft.level.map(|l| l.label()).unwrap_or("your");
    let dots = ".".repeat(app.tick % 4);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            app.loading_message.to_string(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "Tailoring exercises to your position as a {position}, at {level} level,"
        )),
        Line::from("focusing on the areas you want to improve."),
        Line::from(""),
        Line::from(Span::styled(format!("Working{dots}"), Style::default().fg(Color::DarkGray))),
    ];
    let loading = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(loading, area);
}

fn render_result(f: &mut Frame, app: &App, area: Rect) {
    let Some(plan) = app.wizard.workout_plan() else {
        let raw = app
            .wizard
            .plan()
            .and_then(|v| serde_json::to_string_pretty(v).ok())
            .unwrap_or_default();
        let fallback = Paragraph::new(raw)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(" Plan (raw) "));
        f.render_widget(fallback, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // profile + focus
            Constraint::Length(3), // day tabs
            Constraint::Min(3),    // exercises
            Constraint::Length(1), // summary
        ])
        .split(area);

    render_plan_header(f, &plan, chunks[0]);

    let titles: Vec<Line> = plan
        .workout_schedule
        .iter()
        .map(|d| Line::from(d.day_label()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.result_day)
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title(" Days "));
    f.render_widget(tabs, chunks[1]);

    let mut lines = Vec::new();
    let mut title = " Exercises ".to_string();
    if let Some(day) = plan.workout_schedule.get(app.result_day) {
        title = format!(
            " {} | {} hours | {} ",
            day.day_label(),
            day.hours,
            if day.time_of_day.is_empty() {
                "any time".to_string()
            } else {
                day.time_of_day.join(", ")
            }
        );
        for exercise in &day.exercises {
            lines.push(Line::from(vec![
                Span::styled(exercise.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!("  {}", exercise.duration), Style::default().fg(ACCENT)),
            ]));
            lines.push(Line::from(Span::styled(
                exercise.description.clone(),
                Style::default().fg(Color::Gray),
            )));
            lines.push(Line::from(""));
        }
    }
    let exercises = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(exercises, chunks[2]);

    f.render_widget(
        Paragraph::new(Span::styled(plan.summary(), Style::default().fg(Color::DarkGray))),
        chunks[3],
    );
}

fn render_plan_header(f: &mut Frame, plan: &WorkoutPlan, area: Rect) {
    let text = vec![
        Line::from(vec![
            Span::styled("Name: ", Style::default().fg(Color::DarkGray)),
            Span::raw(plan.name.clone()),
            Span::styled("  Age: ", Style::default().fg(Color::DarkGray)),
            Span::raw(plan.age.clone()),
            Span::raw("  "),
            Span::styled(
                format!(" {} ", plan.position_name()),
                Style::default().fg(ACCENT),
            ),
            Span::raw(" "),
            Span::styled(
                format!(" {} ", plan.level_label()),
                Style::default().bg(Color::Black).fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled("Focus: ", Style::default().fg(Color::DarkGray)),
            Span::raw(plan.focus_areas.clone()),
        ]),
    ];
    let header = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Your Plan "));
    f.render_widget(header, area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    if let Some(error) = app.wizard.error() {
        f.render_widget(
            Paragraph::new(Span::styled(
                format!(" Error: {error}"),
                Style::default().fg(Color::Red),
            )),
            chunks[0],
        );
    }

    let step = app.wizard.step();
    if step != Step::Result && !app.wizard.is_loading() {
        let dots: Vec<Span> = (0..Step::INPUT_STEPS)
            .map(|i| {
                if i == step.index() {
                    Span::styled("━━ ", Style::default().fg(ACCENT))
                } else {
                    Span::styled("• ", Style::default().fg(Color::DarkGray))
                }
            })
            .collect();
        f.render_widget(Paragraph::new(Line::from(dots)), chunks[1]);
    }
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let step = app.wizard.step();
    let hints = if app.wizard.is_loading() {
        "Ctrl+C:quit"
    } else {
        match step {
            Step::Name | Step::Age => "Enter:next  Esc:back  Ctrl+C:quit",
            Step::Improvement => "Enter:generate plan  Esc:back  Ctrl+C:quit",
            Step::Position | Step::Level => "Up/Down:choose  Enter:next  Esc:back",
            Step::Schedule => "Up/Down:day  Space:toggle  Left/Right:hours  m/a/e:time  Enter:next",
            Step::Result => "Left/Right:day  e:export md  x:export json  r:restart  q:quit",
        }
    };

    let status_msg = app.status_message.as_deref().unwrap_or("");

    let bar = Line::from(vec![
        Span::styled(format!(" {step} "), Style::default().bg(ACCENT).fg(Color::Black)),
        Span::raw("  "),
        Span::styled(status_msg, Style::default().fg(Color::Green)),
        Span::raw("  "),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]);

    f.render_widget(Paragraph::new(bar), area);
}
