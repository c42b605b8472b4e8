use std::borrow::Cow;

use super::state::{AppState, Phase};
use super::view::{self, ErrorView, MetricLeader, PredictionView};
use crate::engine::form::FormField;
use crate::service::types::AnalysisMode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const MAX_SUGGESTIONS: usize = 5;
const HELPER_TEAMS: usize = 10;
const VALUE_W: usize = 10;
const WINNER_W: usize = 20;
const COLUMN_SPACING: u16 = 1;

pub fn draw(f: &mut Frame, state: &AppState, spinner_frame: u8) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(7),
            Constraint::Length(1),
        ])
        .split(f.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    draw_header(f, state, chunks[0], spinner_frame);
    draw_form(f, state, body[0], spinner_frame);
    draw_result(f, state, body[1], spinner_frame);
    draw_logs(f, state, chunks[2]);
    draw_footer(f, chunks[3]);
}

fn spinner(spinner_frame: u8) -> char {
    SPINNER_FRAMES[(spinner_frame as usize) % SPINNER_FRAMES.len()]
}

fn draw_header(f: &mut Frame, state: &AppState, area: Rect, spinner_frame: u8) {
    let activity = if state.view.is_loading() {
        Span::styled(
            format!(" {} BUSY", spinner(spinner_frame)),
            Style::default().fg(Color::Cyan),
        )
    } else {
        Span::styled(" READY", Style::default().fg(Color::Green))
    };

    let catalog = match &state.catalog {
        Some(c) => format!("{} teams", c.len()),
        None => "free text".to_string(),
    };

    let line = Line::from(vec![
        Span::raw(format!(
            " Service: {} | Catalog: {} | Up: {} |",
            state.service_label,
            catalog,
            state.uptime()
        )),
        activity,
    ]);

    let (title, title_style) = if state.sim_mode {
        (
            " Premier League Match Predictor [SIMULATION] ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )
    } else {
        (" Premier League Match Predictor ", Style::default().add_modifier(Modifier::BOLD))
    };

    let block = Block::default()
        .title(Span::styled(title, title_style))
        .borders(Borders::ALL);
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn field_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn mode_span(state: &AppState, mode: AnalysisMode) -> Span<'static> {
    let selected = state.form.mode == mode;
    let color = match mode {
        AnalysisMode::Basic => Color::Green,
        AnalysisMode::Advanced => Color::Blue,
    };
    let style = if selected {
        Style::default().fg(color).add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(format!(" {} ", mode.label()), style)
}

fn input_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let cursor = if focused { "▏" } else { "" };
    let shown = if value.is_empty() && !focused {
        Span::styled("Type team name...", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(value)
    };
    Line::from(vec![
        Span::styled(label, field_style(focused)),
        shown,
        Span::styled(cursor, Style::default().fg(Color::Yellow)),
    ])
}

fn draw_form(f: &mut Frame, state: &AppState, area: Rect, spinner_frame: u8) {
    let form = &state.form;
    let mut lines = vec![
        Line::from(Span::styled(
            "Prediction Type",
            field_style(form.focus == FormField::Mode),
        )),
        Line::from(vec![
            mode_span(state, AnalysisMode::Basic),
            Span::raw("  "),
            mode_span(state, AnalysisMode::Advanced),
        ]),
        Line::from(Span::styled(
            form.mode.description(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        input_line("Team 1: ", &form.team1, form.focus == FormField::Team1),
        input_line("Team 2: ", &form.team2, form.focus == FormField::Team2),
    ];

    if let Some(catalog) = &state.catalog {
        if form.focus != FormField::Mode {
            let candidates = form.candidates(catalog, form.focus);
            if !candidates.is_empty() {
                let mut text = candidates
                    .iter()
                    .take(MAX_SUGGESTIONS)
                    .copied()
                    .collect::<Vec<_>>()
                    .join(", ");
                if candidates.len() > MAX_SUGGESTIONS {
                    text.push_str(&format!(" (+{})", candidates.len() - MAX_SUGGESTIONS));
                }
                lines.push(Line::from(vec![
                    Span::styled("  → ", Style::default().fg(Color::Yellow)),
                    Span::styled(text, Style::default().fg(Color::DarkGray)),
                ]));
            }
        }
    }

    lines.push(Line::from(""));
    let submit = if state.view.is_loading() {
        Span::styled(
            format!("{} Analyzing...", spinner(spinner_frame)),
            Style::default().fg(Color::Cyan),
        )
    } else if state.can_submit() {
        Span::styled(
            "[Enter] Predict Match Outcome",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            "[Enter] Predict Match Outcome",
            Style::default().fg(Color::DarkGray),
        )
    };
    lines.push(Line::from(submit));

    if let Some(msg) = &state.form_message {
        lines.push(Line::from(Span::styled(
            msg.as_str(),
            Style::default().fg(Color::Red),
        )));
    }

    if form.is_filled() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{} vs {}", form.team1.trim(), form.team2.trim()),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("{} Analysis", form.mode.label()),
            Style::default().fg(Color::DarkGray),
        )));
    }

    if let Some(catalog) = state.catalog.as_ref().filter(|c| !c.is_empty()) {
        let mut text = catalog.sample(HELPER_TEAMS).join(", ");
        if catalog.len() > HELPER_TEAMS {
            text.push_str(&format!(", ... and {} more", catalog.len() - HELPER_TEAMS));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Available Teams:",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(text, Style::default().fg(Color::DarkGray))));
    }

    let block = Block::default().title(" Enter Teams ").borders(Borders::ALL);
    let para = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(para, area);
}

fn draw_result(f: &mut Frame, state: &AppState, area: Rect, spinner_frame: u8) {
    match &state.view.phase {
        Phase::Idle => draw_placeholder(
            f,
            area,
            "Ready for Analysis",
            "Select two Premier League teams to get detailed match predictions",
            Color::DarkGray,
        ),
        Phase::Loading => draw_placeholder(
            f,
            area,
            &format!("{} Analyzing Match Data", spinner(spinner_frame)),
            "Processing team statistics...",
            Color::Cyan,
        ),
        Phase::Success(p) => draw_prediction(f, &view::build_prediction(p), area),
        Phase::Failure(failure) => draw_error(f, &view::build_error(failure), area),
    }
}

fn draw_placeholder(f: &mut Frame, area: Rect, title: &str, subtitle: &str, color: Color) {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            subtitle.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let para = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().title(" Prediction ").borders(Borders::ALL));
    f.render_widget(para, area);
}

fn draw_error(f: &mut Frame, error: &ErrorView, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from("❌"),
        Line::from(""),
        Line::from(Span::styled(
            error.message.as_str(),
            Style::default().fg(Color::Red),
        )),
    ];
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", error.title),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let para = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(para, area);
}

fn draw_prediction(f: &mut Frame, pv: &PredictionView, area: Rect) {
    // Sections in fixed order; optional ones take no space when absent.
    let mut constraints = vec![Constraint::Length(4), Constraint::Length(6)];
    if !pv.comparisons.is_empty() {
        constraints.push(Constraint::Length(table_height(pv.comparisons.len())));
    }
    if !pv.stats.is_empty() {
        constraints.push(Constraint::Min(4));
    }
    if pv.disclaimer.is_some() {
        constraints.push(Constraint::Length(4));
    }
    if pv.stats.is_empty() {
        constraints.push(Constraint::Min(0));
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    let mut next = 0;
    let mut take = || {
        let r = chunks[next];
        next += 1;
        r
    };

    draw_result_header(f, pv, take());
    draw_score(f, pv, take());
    if !pv.comparisons.is_empty() {
        draw_comparisons(f, pv, take());
    }
    if !pv.stats.is_empty() {
        draw_stats(f, pv, take());
    }
    if let Some(disclaimer) = &pv.disclaimer {
        draw_disclaimer(f, disclaimer, take());
    }
}

fn draw_result_header(f: &mut Frame, pv: &PredictionView, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            pv.header.matchup.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            pv.header.mode.as_str(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let block = Block::default()
        .title(" Match Analysis Results ")
        .borders(Borders::ALL);
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
}

fn draw_score(f: &mut Frame, pv: &PredictionView, area: Rect) {
    let score = &pv.score;
    let team_span = |name: &str, is_winner: bool| {
        if is_winner {
            Span::styled(
                format!("🏆 {}", name),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(name.to_string(), Style::default().add_modifier(Modifier::BOLD))
        }
    };
    let (accent, middle) = if score.is_draw {
        (Color::Yellow, "  🤝  ")
    } else {
        (Color::Green, "  vs  ")
    };

    let lines = vec![
        Line::from(vec![
            team_span(&score.team1.name, score.team1.is_winner),
            Span::styled(middle, Style::default().fg(Color::DarkGray)),
            team_span(&score.team2.name, score.team2.is_winner),
        ]),
        Line::from(Span::styled(
            score.scoreline.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            score.announcement.as_str(),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
    ];
    let block = Block::default()
        .title(" Match Result ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
}

/// Rows plus header and borders.
fn table_height(rows: usize) -> u16 {
    u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(3)
}

/// Metric column gets whatever the fixed columns and the gaps between the
/// four columns leave over.
fn metric_width(inner_width: usize) -> usize {
    let gaps = COLUMN_SPACING as usize * 3;
    inner_width
        .saturating_sub(VALUE_W * 2 + WINNER_W + gaps)
        .max(6)
}

fn draw_comparisons(f: &mut Frame, pv: &PredictionView, area: Rect) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let value_w = VALUE_W;
    let winner_w = WINNER_W;
    let metric_w = metric_width(inner_width);

    let team1 = &pv.score.team1.name;
    let team2 = &pv.score.team2.name;
    let header = Row::new(vec![
        Cell::from("Metric"),
        Cell::from(truncate_with_ellipsis(team1, value_w).into_owned()),
        Cell::from(truncate_with_ellipsis(team2, value_w).into_owned()),
        Cell::from("Winner"),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let lead = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    let rows: Vec<Row> = pv
        .comparisons
        .iter()
        .map(|c| {
            let (s1, s2) = match c.leader {
                MetricLeader::Team1 => (lead, Style::default()),
                MetricLeader::Team2 => (Style::default(), lead),
                MetricLeader::Draw | MetricLeader::Other => (Style::default(), Style::default()),
            };
            let winner_color = if c.leader == MetricLeader::Draw {
                Color::Yellow
            } else {
                Color::Cyan
            };
            Row::new(vec![
                Cell::from(truncate_with_ellipsis(&c.metric, metric_w).into_owned()),
                Cell::from(c.team1_value.clone()).style(s1),
                Cell::from(c.team2_value.clone()).style(s2),
                Cell::from(truncate_with_ellipsis(&c.winner_label, winner_w).into_owned())
                    .style(Style::default().fg(winner_color)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(metric_w as u16),
            Constraint::Length(value_w as u16),
            Constraint::Length(value_w as u16),
            Constraint::Length(winner_w as u16),
        ],
    )
    .header(header)
    .column_spacing(COLUMN_SPACING)
    .block(
        Block::default()
            .title(" Statistical Breakdown ")
            .borders(Borders::ALL),
    );
    f.render_widget(table, area);
}

fn draw_stats(f: &mut Frame, pv: &PredictionView, area: Rect) {
    let mut lines = Vec::new();
    for (i, block) in pv.stats.iter().enumerate() {
        let color = if i == 0 { Color::Green } else { Color::Blue };
        lines.push(Line::from(vec![
            Span::styled("● ", Style::default().fg(color)),
            Span::styled(block.squad.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        ]));
        let mut spans = Vec::new();
        for (j, (key, value)) in block.entries.iter().enumerate() {
            if j > 0 {
                spans.push(Span::styled(" · ", Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(
                format!("{}: ", key),
                Style::default().fg(Color::DarkGray),
            ));
            spans.push(Span::raw(value.as_str()));
        }
        lines.push(Line::from(spans));
    }
    let para = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Team Statistics Summary ")
                .borders(Borders::ALL),
        );
    f.render_widget(para, area);
}

fn draw_disclaimer(f: &mut Frame, disclaimer: &str, area: Rect) {
    let block = Block::default()
        .title(Span::styled(
            " ⚠ Important Note ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let para = Paragraph::new(disclaimer)
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(para, area);
}

fn draw_logs(f: &mut Frame, state: &AppState, area: Rect) {
    let max_width = area.width.saturating_sub(2) as usize; // borders
    let visible_lines = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = state
        .logs
        .iter()
        .rev()
        .take(visible_lines)
        .map(|l| {
            let color = match l.level.as_str() {
                "ERROR" => Color::Red,
                "WARN" => Color::Yellow,
                _ => Color::DarkGray,
            };
            let prefix = format!(" {} [{}] ", l.time, l.level);
            let msg_max = max_width.saturating_sub(prefix.len());
            let msg = truncate_with_ellipsis(&l.message, msg_max);
            Line::from(vec![
                Span::styled(prefix, Style::default().fg(color)),
                Span::raw(msg.into_owned()),
            ])
        })
        .collect();

    let block = Block::default().title(" Activity Log ").borders(Borders::ALL);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let key = Style::default().fg(Color::Yellow);
    let line = Line::from(vec![
        Span::styled("  [Tab]", key),
        Span::raw(" next field  "),
        Span::styled("[→]", key),
        Span::raw(" complete  "),
        Span::styled("[Space]", key),
        Span::raw(" mode  "),
        Span::styled("[Enter]", key),
        Span::raw(" predict  "),
        Span::styled("[Esc]", key),
        Span::raw(" dismiss  "),
        Span::styled("[Ctrl-C]", key),
        Span::raw(" quit  "),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn truncate_with_ellipsis(s: &str, max_width: usize) -> Cow<'_, str> {
    let char_count = s.chars().count();
    if char_count <= max_width {
        Cow::Borrowed(s)
    } else if max_width <= 3 {
        Cow::Owned(".".repeat(max_width))
    } else {
        let end = s
            .char_indices()
            .nth(max_width - 3)
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        Cow::Owned(format!("{}...", &s[..end]))
    }
}
