use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode};
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use stash_core::MapOverlay;
use tracing::{info, warn};

use crate::inspection::Inspection;
use crate::ui::{draw_ui, UiState};
use crate::watch::SnapshotWatcher;

pub struct InspectorApp {
    terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
    ui_state: UiState,
    inspection: Inspection,
    watcher: Option<SnapshotWatcher>,
    log_receiver: Receiver<String>,
}

impl InspectorApp {
    pub fn new(
        inspection: Inspection,
        watcher: Option<SnapshotWatcher>,
        log_receiver: Receiver<String>,
    ) -> Result<Self> {
        let stdout = std::io::stdout();
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        crossterm::terminal::enable_raw_mode()?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        let ui_state = UiState::new(
            inspection.snapshot_path().display().to_string(),
            inspection.config_source().to_string(),
            watcher.is_some(),
        );
        Ok(Self {
            terminal,
            ui_state,
            inspection,
            watcher,
            log_receiver,
        })
    }

    pub fn run(mut self) -> Result<()> {
        self.reload();
        let mut last_draw = Instant::now() - Duration::from_secs(1);

        loop {
            while let Ok(line) = self.log_receiver.try_recv() {
                self.ui_state.push_log(line);
            }

            if self.watcher.as_ref().is_some_and(SnapshotWatcher::changed) {
                info!("Snapshot changed on disk, reloading");
                self.reload();
            }

            if last_draw.elapsed() >= Duration::from_millis(100) {
                self.terminal.draw(|frame| draw_ui(frame, &self.ui_state))?;
                last_draw = Instant::now();
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Char('r') => {
                            info!("Manual reload requested");
                            self.reload();
                        }
                        KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
                        KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
                        KeyCode::Home => self.select(0),
                        KeyCode::End => {
                            let last = self.ui_state.record_count().saturating_sub(1);
                            self.select(last);
                        }
                        _ => {}
                    }
                }
            }
        }

        self.terminal.show_cursor()?;
        crossterm::terminal::disable_raw_mode()?;
        Ok(())
    }

    fn reload(&mut self) {
        match self.inspection.read() {
            Ok(report) => {
                info!("{}", report.status_line());
                self.ui_state.set_report(report, self.inspection.names());
                self.refresh_overlay();
            }
            Err(err) => {
                warn!("Read failed: {:#}", err);
                self.ui_state.set_error(format!("{:#}", err));
            }
        }
    }

    fn move_selection(&mut self, step: isize) {
        let count = self.ui_state.record_count();
        if count == 0 {
            return;
        }
        let current = self.ui_state.selected as isize;
        let next = (current + step).clamp(0, count as isize - 1);
        self.select(next as usize);
    }

    fn select(&mut self, index: usize) {
        if index >= self.ui_state.record_count() || index == self.ui_state.selected {
            return;
        }
        self.ui_state.selected = index;
        self.refresh_overlay();
    }

    fn refresh_overlay(&mut self) {
        self.ui_state.overlay = self.ui_state.report.as_ref().and_then(|report| {
            MapOverlay::for_focus(report, self.ui_state.selected, self.inspection.catalog())
        });
    }
}
