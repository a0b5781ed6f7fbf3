use std::collections::VecDeque;

use ratatui::layout::{Constraint, Direction, Layout, Margin};
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use stash_core::{HexHash, MapDefinition, MapOverlay, SpeciesNames, StashReport};

pub struct UiState {
    pub source: String,
    pub config_source: String,
    pub watching: bool,
    pub report: Option<StashReport>,
    /// Species display names, parallel to the report's records.
    pub names: Vec<String>,
    pub error: Option<String>,
    pub selected: usize,
    pub overlay: Option<MapOverlay>,
    pub logs: VecDeque<String>,
    pub max_logs: usize,
}

impl UiState {
    pub fn new(source: String, config_source: String, watching: bool) -> Self {
        Self {
            source,
            config_source,
            watching,
            report: None,
            names: Vec::new(),
            error: None,
            selected: 0,
            overlay: None,
            logs: VecDeque::new(),
            max_logs: 6,
        }
    }

    pub fn set_report(&mut self, report: StashReport, names: &SpeciesNames) {
        self.names = report
            .records
            .iter()
            .map(|resolved| names.display_name(resolved.record.species_id))
            .collect();
        if self.selected >= report.len() {
            self.selected = 0;
        }
        self.report = Some(report);
        self.error = None;
    }

    pub fn set_error(&mut self, message: String) {
        self.report = None;
        self.names.clear();
        self.overlay = None;
        self.selected = 0;
        self.error = Some(message);
    }

    pub fn record_count(&self) -> usize {
        self.report.as_ref().map_or(0, StashReport::len)
    }

    pub fn push_log<S: Into<String>>(&mut self, line: S) {
        let mut text: String = line.into();
        while text.ends_with('\n') || text.ends_with('\r') {
            text.pop();
        }
        if text.is_empty() {
            return;
        }
        self.logs.push_front(text);
        while self.logs.len() > self.max_logs {
            self.logs.pop_back();
        }
    }

    fn status(&self) -> (String, Color) {
        match (&self.report, &self.error) {
            (_, Some(error)) => (error.clone(), Color::Red),
            (Some(report), None) => (report.status_line(), Color::Green),
            (None, None) => ("No snapshot read yet".to_string(), Color::Gray),
        }
    }
}

pub fn draw_ui(frame: &mut Frame, state: &UiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(8),
        ])
        .split(frame.size());

    draw_header(frame, rows[0], state);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);
    draw_records(frame, columns[0], state);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(4)])
        .split(columns[1]);
    draw_details(frame, right[0], state);
    draw_map(frame, right[1], state);

    draw_logs(frame, rows[2], state);
}

fn inner(area: Rect) -> Rect {
    area.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    })
}

fn draw_header(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Shiny Stash Inspector");
    let (status, color) = state.status();
    let watch = if state.watching { "watching" } else { "static" };
    let lines = vec![
        Line::from(vec![
            Span::styled(status, Style::default().fg(color)),
            Span::raw(format!(
                " | {} ({}) | config: {}",
                state.source, watch, state.config_source
            )),
        ]),
        Line::from(vec![
            Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
            Span::raw(" select  "),
            Span::styled("r", Style::default().fg(Color::Yellow)),
            Span::raw(" reload  "),
            Span::styled("q", Style::default().fg(Color::Yellow)),
            Span::raw(" exit"),
        ]),
    ];
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}

fn draw_records(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default().borders(Borders::ALL).title("Stash");
    let Some(report) = state.report.as_ref() else {
        frame.render_widget(block, area);
        return;
    };

    let items: Vec<ListItem> = report
        .records
        .iter()
        .zip(state.names.iter())
        .map(|(resolved, name)| {
            let place = match resolved.location.as_ref() {
                Some(location) => Span::styled(
                    MapDefinition::lookup(location.map)
                        .map(|map| map.name.to_string())
                        .unwrap_or_else(|| format!("map {}", location.map)),
                    Style::default().fg(Color::Cyan),
                ),
                None => Span::styled("unknown location", Style::default().fg(Color::DarkGray)),
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        format!("#{:04} ", resolved.record.species_id),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::raw(name.clone()),
                ]),
                Line::from(vec![Span::raw("      "), place]),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    if !report.is_empty() {
        list_state.select(Some(state.selected));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_details(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default().borders(Borders::ALL).title("Selected");
    let selected = state
        .report
        .as_ref()
        .and_then(|report| report.get(state.selected));

    let lines = match selected {
        None => vec![Line::from(Span::styled(
            "No location selected",
            Style::default().fg(Color::DarkGray),
        ))],
        Some(resolved) => {
            let record = resolved.record;
            let mut lines = vec![Line::from(format!(
                "hash {}  species {} (internal {})",
                HexHash(record.hash),
                record.species_id,
                record.species_internal
            ))];
            match (resolved.location.as_ref(), state.overlay.as_ref()) {
                (Some(location), Some(overlay)) => {
                    lines.push(Line::from(vec![
                        Span::styled(overlay.map.name, Style::default().fg(Color::Cyan)),
                        Span::raw(format!("  {}", location.label)),
                    ]));
                    lines.push(Line::from(format!(
                        "world ({:.1}, {:.1}, {:.1})  pixel ({:.0}, {:.0})",
                        location.x, location.y, location.z, overlay.focus.x, overlay.focus.y
                    )));
                }
                (Some(location), None) => {
                    lines.push(Line::from(format!(
                        "{} on unknown map {}",
                        location.label, location.map
                    )));
                }
                (None, _) => lines.push(Line::from(Span::styled(
                    "Unknown spawn location",
                    Style::default().fg(Color::DarkGray),
                ))),
            }
            lines
        }
    };

    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner(area));
}

fn draw_map(frame: &mut Frame, area: Rect, state: &UiState) {
    let Some(overlay) = state.overlay.as_ref() else {
        frame.render_widget(Block::default().borders(Borders::ALL).title("Map"), area);
        return;
    };

    let map = overlay.map;
    // Canvas y grows upwards, image y grows downwards.
    let flip = |x: f64, y: f64| (x, map.image_height - y);
    let spawners: Vec<(f64, f64)> = overlay
        .spawner_points
        .iter()
        .map(|p| flip(p.x, p.y))
        .collect();
    let others: Vec<(f64, f64)> = overlay
        .stash_points
        .iter()
        .map(|(_, p)| flip(p.x, p.y))
        .collect();
    let focus = [flip(overlay.focus.x, overlay.focus.y)];

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(map.name))
        .marker(Marker::Braille)
        .x_bounds([0.0, map.image_width])
        .y_bounds([0.0, map.image_height])
        .paint(move |ctx| {
            ctx.draw(&Points {
                coords: &spawners,
                color: Color::DarkGray,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &others,
                color: Color::Yellow,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &focus,
                color: Color::Red,
            });
        });
    frame.render_widget(canvas, area);
}

fn draw_logs(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default().borders(Borders::ALL).title("Logs");
    let lines: Vec<Line> = state
        .logs
        .iter()
        .map(|entry| Line::from(Span::raw(entry)))
        .collect();
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner(area));
}
