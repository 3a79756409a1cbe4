use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant, SystemTime};

use anyhow::{Context, Result};
use chrono::Utc;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tracing::{info, warn};

use gamelayer_terminal::api::HttpApi;
use gamelayer_terminal::auth::LocalLinkProvider;
use gamelayer_terminal::config::{AuthMode, Config};
use gamelayer_terminal::models::{Mission, Stock};
use gamelayer_terminal::persist::CacheStore;
use gamelayer_terminal::provider::{Provider, spawn_provider};
use gamelayer_terminal::state::{
    AppState, AuthField, AuthFormMode, Delta, ProviderCommand, Screen, Section, apply_delta,
    leaderboard, player_rank,
};

#[derive(Clone)]
struct ChannelWriter {
    sender: Sender<String>,
}

impl io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(text) = String::from_utf8(buf.to_vec()) {
            let _ = self.sender.send(text);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Sender<ProviderCommand>,
    store: CacheStore,
    auth_mode: AuthMode,
}

impl App {
    fn new(
        state: AppState,
        cmd_tx: Sender<ProviderCommand>,
        store: CacheStore,
        auth_mode: AuthMode,
    ) -> Self {
        Self {
            state,
            should_quit: false,
            cmd_tx,
            store,
            auth_mode,
        }
    }

    fn send(&mut self, cmd: ProviderCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Provider unavailable");
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.state.screen == Screen::Login {
            self.on_login_key(key);
            return;
        }
        if self.state.player_input.is_some() {
            self.on_player_input_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(c @ '1'..='5') => {
                let idx = c as usize - '1' as usize;
                self.state.set_section(Section::ALL[idx]);
            }
            KeyCode::Tab => {
                let idx = Section::ALL
                    .iter()
                    .position(|s| *s == self.state.section)
                    .unwrap_or(0);
                self.state
                    .set_section(Section::ALL[(idx + 1) % Section::ALL.len()]);
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Enter => self.activate_selection(),
            KeyCode::Char('p') => self.state.player_input = Some(String::new()),
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('a') => {
                self.state.affordable_only = !self.state.affordable_only;
                self.state.clamp_selection();
            }
            KeyCode::Char('o') if self.auth_mode != AuthMode::None => {
                self.send(ProviderCommand::SignOut)
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn activate_selection(&mut self) {
        match self.state.section {
            Section::Missions => self.complete_selected_mission(),
            Section::Players | Section::Leaderboard => {
                let Some(player_id) = self.state.selected_player().map(|p| p.id.clone()) else {
                    return;
                };
                self.send(ProviderCommand::SwitchPlayer { player_id });
            }
            Section::Profile | Section::Prizes => {}
        }
    }

    fn complete_selected_mission(&mut self) {
        let Some(mission) = self.state.selected_mission().cloned() else {
            return;
        };
        let Some(player_id) = self.state.player_id.clone() else {
            self.state.action_error = Some("Select a player first (p)".to_string());
            return;
        };
        if self.state.completing.is_some() {
            self.state.push_log("[INFO] Completion already in progress");
            return;
        }
        self.send(ProviderCommand::CompleteMission { mission, player_id });
    }

    fn reload(&mut self) {
        let player_id = self.state.player_id.clone();
        self.send(ProviderCommand::LoadDashboard { player_id });
    }

    fn on_player_input_key(&mut self, key: KeyEvent) {
        let Some(input) = self.state.player_input.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.state.player_input = None,
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            KeyCode::Enter => {
                let player_id = input.trim().to_string();
                self.state.player_input = None;
                self.send(ProviderCommand::SwitchPlayer { player_id });
            }
            _ => {}
        }
    }

    fn on_login_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
            self.state.auth_form.toggle_mode();
            return;
        }
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.state.auth_form.focus_next(),
            KeyCode::Backspace => {
                self.state.auth_form.focused_mut().pop();
            }
            KeyCode::Char(c) => self.state.auth_form.focused_mut().push(c),
            KeyCode::Enter => self.submit_auth_form(),
            _ => {}
        }
    }

    fn submit_auth_form(&mut self) {
        if self.state.auth_form.pending {
            return;
        }
        let form = &self.state.auth_form;
        let cmd = match form.mode {
            AuthFormMode::Login => ProviderCommand::LogIn {
                email: form.email.clone(),
            },
            AuthFormMode::SignUp => ProviderCommand::SignUp {
                email: form.email.clone(),
                username: form.username.clone(),
            },
            AuthFormMode::EmailLink if !form.link.trim().is_empty() => {
                ProviderCommand::CompleteSignIn {
                    link: form.link.clone(),
                    username: form.username.clone(),
                }
            }
            AuthFormMode::EmailLink => ProviderCommand::SendSignInLink {
                email: form.email.clone(),
            },
        };
        self.state.auth_form.pending = true;
        self.state.auth_form.error = None;
        self.send(cmd);
    }

    fn persist_if_dirty(&mut self) {
        if !self.state.cache_dirty || self.state.loading {
            return;
        }
        self.state.cache_dirty = false;
        if let Err(err) = self.store.save_from_state(&self.state, SystemTime::now()) {
            warn!(%err, "failed to write cache");
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let (log_tx, log_rx) = mpsc::channel::<String>();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .with_ansi(false)
        .with_writer(move || ChannelWriter {
            sender: log_tx.clone(),
        })
        .init();

    let config = Config::from_env();
    let store = CacheStore::default_location();
    let api = HttpApi::new(&config).context("init api client")?;

    let mut state = AppState::new();
    state.flash_duration = config.flash_duration;
    state.auth_required = config.auth_mode != AuthMode::None;
    state.session = if state.auth_required {
        store.load_session()
    } else {
        None
    };
    state.player_id = state
        .session
        .as_ref()
        .map(|s| s.player_id.clone())
        .or_else(|| config.player_id.clone());
    store.load_into_state(&mut state, config.cache_ttl, SystemTime::now());

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let provider = Provider {
        api: Arc::new(api),
        identity: Box::new(LocalLinkProvider::new()),
        store: store.clone(),
        default_event: config.default_event.clone(),
    };
    let _provider = spawn_provider(provider, tx, cmd_rx);

    let mut app = App::new(state, cmd_tx, store, config.auth_mode);
    if !config.api_key.is_empty() {
        app.send(ProviderCommand::Authenticate);
    }
    if app.state.auth_required && app.state.session.is_none() {
        let mode = match config.auth_mode {
            AuthMode::Link => AuthFormMode::EmailLink,
            _ => AuthFormMode::Login,
        };
        app.state.open_login(mode);
    } else {
        app.reload();
    }
    info!(base = %config.api_base, account = %config.account, "started");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, rx, log_rx);

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

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: Receiver<Delta>,
    log_rx: Receiver<String>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }
        while let Ok(line) = log_rx.try_recv() {
            let line = line.trim_end();
            if !line.is_empty() {
                app.state.push_log(line.to_string());
            }
        }
        app.persist_if_dirty();
        app.state.clear_expired_flash(Instant::now());

        terminal.draw(|f| ui(f, &app.state))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match state.screen {
        Screen::Login => render_login(frame, chunks[1], state),
        Screen::Dashboard => render_dashboard(frame, chunks[1], state),
    }

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let tabs = Section::ALL
        .iter()
        .enumerate()
        .map(|(idx, section)| {
            let label = section_label(*section);
            if *section == state.section {
                format!("[{} {}]", idx + 1, label)
            } else {
                format!(" {} {} ", idx + 1, label)
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let player = match &state.active_player {
        Some(p) => format!(
            "{} | {} pts | {} cr | L{}",
            p.name, p.points, p.credits, p.level.current
        ),
        None => match &state.player_id {
            Some(id) => format!("{id} (not loaded)"),
            None => "No active player".to_string(),
        },
    };
    let status = if state.loading {
        " | Loading..."
    } else if state.switching.is_some() {
        " | Switching..."
    } else {
        ""
    };
    format!("GAMELAYER | {player}{status}\n{tabs}")
}

fn footer_text(state: &AppState) -> String {
    if state.screen == Screen::Login {
        return "Tab Field | Enter Submit | Ctrl-t Login/Sign up | Esc Quit".to_string();
    }
    if state.player_input.is_some() {
        return "Type a player id | Enter Load | Esc Cancel".to_string();
    }
    match state.section {
        Section::Missions => {
            "1-5 Section | j/k Move | Enter Complete | p Player | r Reload | ? Help | q Quit"
                .to_string()
        }
        Section::Prizes => {
            "1-5 Section | j/k Move | a Affordable only | p Player | r Reload | ? Help | q Quit"
                .to_string()
        }
        Section::Players | Section::Leaderboard => {
            "1-5 Section | j/k Move | Enter View player | p Player | r Reload | ? Help | q Quit"
                .to_string()
        }
        Section::Profile => "1-5 Section | p Player | r Reload | o Sign out | ? Help | q Quit".to_string(),
    }
}

fn render_dashboard(frame: &mut Frame, area: Rect, state: &AppState) {
    if let Some(err) = &state.page_error {
        let mut text = format!("{err}\n\nPress r to retry or p to pick another player.");
        if let Some(switch_err) = &state.switch_error {
            text.push_str(&format!("\n{switch_err}"));
        }
        let error = Paragraph::new(text)
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Error").borders(Borders::ALL));
        frame.render_widget(error, area);
        render_player_input(frame, area, state);
        return;
    }
    if state.loading && state.active_player.is_none() && state.players.is_empty() {
        let loading = Paragraph::new("Loading...").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(loading, area);
        render_player_input(frame, area, state);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);
    frame.render_widget(Paragraph::new(status_line(state)), rows[0]);

    let (title, body) = match state.section {
        Section::Profile => ("Profile", profile_text(state)),
        Section::Missions => ("Missions", missions_text(state)),
        Section::Prizes => ("Prizes", prizes_text(state)),
        Section::Players => ("Players", players_text(state)),
        Section::Leaderboard => ("Leaderboard", leaderboard_text(state)),
    };
    let section = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(section, rows[1]);
    render_player_input(frame, area, state);
}

fn render_player_input(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(input) = &state.player_input else {
        return;
    };
    let popup = centered_rect(50, 20, area);
    frame.render_widget(Clear, popup);
    let prompt = Paragraph::new(format!("{input}_"))
        .block(Block::default().title("Player id").borders(Borders::ALL));
    frame.render_widget(prompt, popup);
}

fn status_line(state: &AppState) -> Line<'static> {
    if let Some(flash) = &state.flash {
        return Line::styled(flash.message.clone(), Style::default().fg(Color::Green));
    }
    if let Some(err) = state.switch_error.as_ref().or(state.action_error.as_ref()) {
        return Line::styled(err.clone(), Style::default().fg(Color::Red));
    }
    if let Some(id) = &state.completing {
        return Line::styled(
            format!("Completing {id}..."),
            Style::default().fg(Color::Yellow),
        );
    }
    Line::default()
}

fn profile_text(state: &AppState) -> String {
    let Some(player) = &state.active_player else {
        return "No active player. Press p to enter a player id.".to_string();
    };
    let rank = player_rank(&state.players, &player.id)
        .map(|r| format!("#{r} of {}", state.players.len()))
        .unwrap_or_else(|| "-".to_string());
    let now = Utc::now();
    let active_missions = state.missions.iter().filter(|m| m.is_active(now)).count();
    let completed = state.missions.iter().filter(|m| m.is_completed()).count();
    let mut lines = vec![
        format!("Name:     {}", player.name),
        format!("Id:       {}", player.id),
        format!("Team:     {}", state.team_label(player)),
        format!("Points:   {}", player.points),
        format!("Credits:  {}", player.credits),
        format!(
            "Level:    {} ({} xp)",
            player.level.current, player.level.experience
        ),
        format!("Rank:     {rank}"),
        format!(
            "Missions: {active_missions} active, {completed} completed, {} total",
            state.missions.len()
        ),
    ];
    if let Some(image) = &player.image {
        lines.push(format!("Avatar:   {image}"));
    }
    if let Some(session) = &state.session {
        lines.push(String::new());
        lines.push(format!("Signed in as {} <{}>", session.username, session.email));
    }
    lines.join("\n")
}

fn missions_text(state: &AppState) -> String {
    if state.missions.is_empty() {
        return "No missions available".to_string();
    }
    let now = Utc::now();
    let mut lines = Vec::new();
    for (idx, m) in state.missions.iter().enumerate() {
        let prefix = if idx == state.selected { "> " } else { "  " };
        let (done, total) = m.progress();
        let progress = if total == 0 {
            String::new()
        } else {
            format!(" [{done}/{total}]")
        };
        let status = if m.is_completed() {
            " DONE"
        } else if !m.is_active(now) {
            " inactive"
        } else {
            ""
        };
        lines.push(format!(
            "{prefix}{} +{} pts +{} cr{progress}{status}",
            m.name, m.reward.points, m.reward.credits
        ));
    }
    if let Some(m) = state.missions.get(state.selected) {
        lines.push(String::new());
        lines.extend(mission_detail_lines(m));
    }
    lines.join("\n")
}

fn mission_detail_lines(m: &Mission) -> Vec<String> {
    let mut lines = Vec::new();
    if !m.description.is_empty() {
        lines.push(m.description.clone());
    }
    let window = match (m.active_from, m.active_to) {
        (Some(from), Some(to)) => format!(
            "Active {} to {}",
            from.format("%Y-%m-%d"),
            to.format("%Y-%m-%d")
        ),
        (Some(from), None) => format!("Active from {}", from.format("%Y-%m-%d")),
        (None, Some(to)) => format!("Active until {}", to.format("%Y-%m-%d")),
        (None, None) => String::new(),
    };
    if !window.is_empty() {
        lines.push(window);
    }
    for step in &m.steps {
        let mark = if step.completed { "x" } else { " " };
        lines.push(format!("  [{mark}] {}", step.name));
    }
    lines
}

fn prizes_text(state: &AppState) -> String {
    let prizes = state.visible_prizes();
    if prizes.is_empty() {
        return if state.affordable_only {
            "No affordable prizes".to_string()
        } else {
            "No prizes available".to_string()
        };
    }
    let credits = state.active_credits();
    let mut lines = Vec::new();
    if state.affordable_only {
        lines.push(format!("Affordable with {credits} credits"));
    }
    for (idx, p) in prizes.iter().enumerate() {
        let prefix = if idx == state.selected { "> " } else { "  " };
        let stock = match p.stock {
            Stock::Limited(n) => format!("{n} left"),
            Stock::Unlimited => "unlimited".to_string(),
        };
        let mark = if p.cost <= credits { "" } else { " (need more credits)" };
        lines.push(format!("{prefix}{} | {} cr | {stock}{mark}", p.name, p.cost));
    }
    if let Some(p) = prizes.get(state.selected)
        && !p.description.is_empty()
    {
        lines.push(String::new());
        lines.push(p.description.clone());
    }
    lines.join("\n")
}

fn players_text(state: &AppState) -> String {
    if state.players.is_empty() {
        return "No players".to_string();
    }
    state
        .players
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            let prefix = if idx == state.selected { "> " } else { "  " };
            format!(
                "{prefix}{} | {} | {} pts | L{}",
                p.name,
                state.team_label(p),
                p.points,
                p.level.current
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn leaderboard_text(state: &AppState) -> String {
    let ranked = leaderboard(&state.players);
    if ranked.is_empty() {
        return "No players".to_string();
    }
    let active_id = state.player_id.as_deref();
    ranked
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            let prefix = if idx == state.selected { ">" } else { " " };
            let me = if Some(p.id.as_str()) == active_id { " *" } else { "" };
            format!("{prefix}{:>3}. {} {} pts{me}", idx + 1, p.name, p.points)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_login(frame: &mut Frame, area: Rect, state: &AppState) {
    let form = &state.auth_form;
    let title = match form.mode {
        AuthFormMode::Login => "Login",
        AuthFormMode::SignUp => "Sign Up",
        AuthFormMode::EmailLink => "Sign in with email link",
    };
    let mut lines = Vec::new();
    for field in form.fields() {
        let (label, value) = match field {
            AuthField::Email => ("Email", &form.email),
            AuthField::Username => ("Username", &form.username),
            AuthField::Link => ("Link", &form.link),
        };
        let cursor = if *field == form.focus { "_" } else { "" };
        let marker = if *field == form.focus { "> " } else { "  " };
        lines.push(format!("{marker}{label:<9} {value}{cursor}"));
    }
    lines.push(String::new());
    if form.pending {
        lines.push("Working...".to_string());
    }
    if let Some(notice) = &form.notice {
        lines.push(notice.clone());
    }
    if let Some(err) = &form.error {
        lines.push(format!("Error: {err}"));
    }
    lines.push(String::new());
    lines.push(match form.mode {
        AuthFormMode::Login => "Need an account? Ctrl-t to sign up".to_string(),
        AuthFormMode::SignUp => "Already have an account? Ctrl-t to log in".to_string(),
        AuthFormMode::EmailLink => {
            "Enter sends a link; paste it into Link and press Enter again".to_string()
        }
    });

    let popup = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup);
    let body = Paragraph::new(lines.join("\n"))
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(body, popup);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = state.logs.len().saturating_sub(2);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn section_label(section: Section) -> &'static str {
    match section {
        Section::Profile => "Profile",
        Section::Missions => "Missions",
        Section::Prizes => "Prizes",
        Section::Players => "Players",
        Section::Leaderboard => "Leaderboard",
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "GameLayer Terminal - Help",
        "",
        "Global:",
        "  1-5 / Tab    Sections",
        "  p            Enter player id",
        "  r            Reload",
        "  o            Sign out",
        "  ?            Toggle help",
        "  q / Ctrl-c   Quit",
        "",
        "Lists:",
        "  j/k or ↑/↓   Move",
        "  Enter        Complete mission / view player",
        "  a            Prizes: affordable only",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default().add_modifier(Modifier::BOLD));
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
