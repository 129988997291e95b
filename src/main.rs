use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use statsbomb_viewer::catalog::Catalog;
use statsbomb_viewer::config::AppConfig;
use statsbomb_viewer::export;
use statsbomb_viewer::grid::{
    ScoreOutcome, away_outcome, format_match_date, home_outcome, visible_columns,
};
use statsbomb_viewer::http_client::HttpJsonSource;
use statsbomb_viewer::match_list::MatchRecord;
use statsbomb_viewer::session::{Controller, SessionState, Transition};
use statsbomb_viewer::telemetry;

struct App {
    state: SessionState,
    controller: Controller<HttpJsonSource>,
    config: AppConfig,
    should_quit: bool,
}

impl App {
    fn new(config: AppConfig, controller: Controller<HttpJsonSource>) -> Self {
        Self {
            state: SessionState::new(),
            controller,
            config,
            should_quit: false,
        }
    }

    fn dispatch(&mut self, transition: Transition) {
        if let Err(err) = self.controller.apply(&mut self.state, transition) {
            tracing::warn!(%err, "transition rejected");
            self.state.push_log(format!("[WARN] {err}"));
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('l') | KeyCode::Char('L') => {
                let next = self.state.league.next();
                self.dispatch(Transition::ChooseLeague(next));
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                let season = self.state.league.season_after(&self.state.season);
                self.dispatch(Transition::ChooseSeason(season.to_string()));
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let Some(match_id) = self.state.cursor_match_id() else {
                    self.state.push_log("[INFO] No match to select");
                    return;
                };
                self.dispatch(Transition::SelectMatchRow(match_id));
            }
            KeyCode::Char('o') | KeyCode::Char('O') => self.state.cycle_sort(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.dispatch(Transition::Refresh),
            KeyCode::Char('e') | KeyCode::Char('E') => self.export(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn export(&mut self) {
        let path = self.config.export_path.clone();
        match export::export_session(&path, &self.state) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} matches, {} starters to {}",
                report.matches,
                report.starters,
                path.display()
            )),
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "export failed");
                self.state.push_log(format!("[WARN] Export failed: {err:#}"));
            }
        }
    }
}

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    if let Err(err) = telemetry::init_tracing(&config.log_path) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let catalog = Catalog::load(&config.catalog_path)
        .with_context(|| format!("load catalog {}", config.catalog_path.display()))?;
    tracing::info!(entries = catalog.len(), "catalog loaded");
    let source = HttpJsonSource::new(config.http_timeout_secs)?;
    let controller = Controller::new(
        catalog,
        source,
        config.base_url.clone(),
        config.cache_max_entries,
    );

    let mut app = App::new(config, controller);
    app.dispatch(Transition::Refresh);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let poll_rate = Duration::from_millis(250);

    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(poll_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    // Match grid gets two thirds of the width, the starting eleven the rest.
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(2, 3), Constraint::Ratio(1, 3)])
        .split(chunks[1]);
    render_match_grid(frame, body[0], &app.state);
    render_starting_eleven(frame, body[1], &app.state);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text()).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &SessionState) -> String {
    let line1 = format!(
        "FOOTBALL ANALYSIS | {} | {} | Sort: {}",
        state.league.competition_name(),
        state.season,
        state.sort.label()
    );
    let line2 = format!(
        "You selected: {} and {}",
        state.league.competition_name(),
        state.season
    );
    format!("{line1}\n{line2}")
}

fn footer_text() -> &'static str {
    "l League | s Season | j/k/↑/↓ Move | Enter Select | o Sort | r Reload | e Export | ? Help | q Quit"
}

fn render_match_grid(frame: &mut Frame, area: Rect, state: &SessionState) {
    let block = Block::default().title("Matches").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let widths = match_columns();
    render_grid_header(frame, sections[0], &widths);

    let list_area = sections[1];
    let rows = state.sorted_rows();
    if rows.is_empty() {
        let text = match &state.last_error {
            Some(err) => format!("No matches: {err}"),
            None => "No matches for this season".to_string(),
        };
        let empty = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }
    if list_area.height == 0 {
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.cursor, rows.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };

        let under_cursor = idx == state.cursor;
        let row_style = if under_cursor {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if under_cursor {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths.clone())
            .split(row_area);

        let m = rows[idx];
        let marker = if state.selected_match_id == Some(m.match_id) {
            "> "
        } else {
            "  "
        };
        let date = format!("{marker}{}", format_match_date(m.match_date));
        render_cell_text(frame, cols[0], &date, row_style);
        render_cell_text(frame, cols[1], &m.home_team, row_style);
        render_cell_text(
            frame,
            cols[2],
            &m.home_score.to_string(),
            score_style(home_outcome(m), row_style),
        );
        render_cell_text(
            frame,
            cols[3],
            &m.away_score.to_string(),
            score_style(away_outcome(m), row_style),
        );
        render_cell_text(frame, cols[4], &m.away_team, row_style);
    }
}

fn match_columns() -> Vec<Constraint> {
    visible_columns()
        .map(|c| Constraint::Percentage(c.width_pct))
        .collect()
}

fn render_grid_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths.to_vec())
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);
    for (col, spec) in cols.iter().zip(visible_columns()) {
        let header = if spec.field == "match_date" {
            format!("  {}", spec.header)
        } else {
            spec.header.to_string()
        };
        render_cell_text(frame, *col, &header, style);
    }
}

fn score_style(outcome: ScoreOutcome, base: Style) -> Style {
    let style = base.add_modifier(Modifier::BOLD);
    match outcome {
        ScoreOutcome::Win => style.fg(Color::Green),
        ScoreOutcome::Loss => style.fg(Color::Red),
        ScoreOutcome::Draw => style,
    }
}

fn render_starting_eleven(frame: &mut Frame, area: Rect, state: &SessionState) {
    let title = match state.selected_match() {
        Some(m) => starting_title(m),
        None => "Starting XI".to_string(),
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    if !state.is_match_selected() {
        frame.render_widget(Paragraph::new("No match selected"), inner);
        return;
    }
    let view = &state.starting_eleven;
    if view.is_empty() {
        let empty =
            Paragraph::new("No lineup available").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let teams = view.teams();
    let constraints = teams
        .iter()
        .map(|_| Constraint::Ratio(1, teams.len() as u32))
        .collect::<Vec<_>>();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(inner);

    for ((team, players), col) in teams.iter().zip(cols.iter()) {
        let mut lines = vec![Line::styled(
            team.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if players.is_empty() {
            lines.push(Line::styled("-", Style::default().fg(Color::DarkGray)));
        }
        lines.extend(players.iter().map(|p| Line::raw(p.clone())));
        frame.render_widget(Paragraph::new(lines), *col);
    }
}

fn starting_title(m: &MatchRecord) -> String {
    format!(
        "Starting XI | {} {}-{} {}",
        m.home_team, m.home_score, m.away_score, m.away_team
    )
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let paragraph = Paragraph::new(text.to_string()).style(style);
    frame.render_widget(paragraph, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &SessionState) -> String {
    let lines = state.log.lines();
    if lines.is_empty() {
        return "No alerts yet".to_string();
    }
    let skip = lines.len().saturating_sub(3);
    lines
        .iter()
        .skip(skip)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Football Analysis - Help",
        "",
        "Selection:",
        "  l            Next league",
        "  s            Next season for this league",
        "  Enter/Space  Load starting XI for the row",
        "",
        "Grid:",
        "  j/k or ↑/↓   Move",
        "  o            Cycle sort (date, teams)",
        "  r            Reload match list",
        "  e            Export to xlsx",
        "",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

