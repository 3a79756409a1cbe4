use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use crate::auth::Session;
use crate::models::{Mission, Player, Prize, Team};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Profile,
    Missions,
    Prizes,
    Players,
    Leaderboard,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Profile,
        Section::Missions,
        Section::Prizes,
        Section::Players,
        Section::Leaderboard,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Login,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFormMode {
    Login,
    SignUp,
    EmailLink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Email,
    Username,
    Link,
}

#[derive(Debug, Clone)]
pub struct AuthForm {
    pub mode: AuthFormMode,
    pub email: String,
    pub username: String,
    pub link: String,
    pub focus: AuthField,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub pending: bool,
}

impl AuthForm {
    pub fn new(mode: AuthFormMode) -> Self {
        Self {
            mode,
            email: String::new(),
            username: String::new(),
            link: String::new(),
            focus: AuthField::Email,
            error: None,
            notice: None,
            pending: false,
        }
    }

    pub fn fields(&self) -> &'static [AuthField] {
        match self.mode {
            AuthFormMode::Login => &[AuthField::Email],
            AuthFormMode::SignUp => &[AuthField::Username, AuthField::Email],
            AuthFormMode::EmailLink => &[AuthField::Username, AuthField::Email, AuthField::Link],
        }
    }

    pub fn focus_next(&mut self) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(idx + 1) % fields.len()];
    }

    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            AuthField::Email => &mut self.email,
            AuthField::Username => &mut self.username,
            AuthField::Link => &mut self.link,
        }
    }

    /// Login and sign-up toggle; the email-link form stays as is.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthFormMode::Login => AuthFormMode::SignUp,
            AuthFormMode::SignUp => AuthFormMode::Login,
            AuthFormMode::EmailLink => AuthFormMode::EmailLink,
        };
        if !self.fields().contains(&self.focus) {
            self.focus = self.fields()[0];
        }
        self.error = None;
    }
}

#[derive(Debug, Clone)]
pub struct Flash {
    pub message: String,
    pub expires_at: Instant,
}

/// Responses are applied in arrival order. Switching players quickly can let a slower,
/// earlier response overwrite a newer one.
#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub section: Section,
    pub selected: usize,
    pub player_id: Option<String>,
    pub active_player: Option<Player>,
    pub missions: Vec<Mission>,
    pub prizes: Vec<Prize>,
    pub players: Vec<Player>,
    pub teams: HashMap<String, Team>,
    pub loading: bool,
    pub page_error: Option<String>,
    pub switching: Option<String>,
    pub switch_error: Option<String>,
    pub action_error: Option<String>,
    pub completing: Option<String>,
    pub flash: Option<Flash>,
    pub flash_duration: Duration,
    pub affordable_only: bool,
    pub player_input: Option<String>,
    pub session: Option<Session>,
    pub auth_required: bool,
    pub auth_form: AuthForm,
    pub cache_dirty: bool,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Dashboard,
            section: Section::Profile,
            selected: 0,
            player_id: None,
            active_player: None,
            missions: Vec::new(),
            prizes: Vec::new(),
            players: Vec::with_capacity(64),
            teams: HashMap::with_capacity(16),
            loading: false,
            page_error: None,
            switching: None,
            switch_error: None,
            action_error: None,
            completing: None,
            flash: None,
            flash_duration: Duration::from_secs(3),
            affordable_only: false,
            player_input: None,
            session: None,
            auth_required: false,
            auth_form: AuthForm::new(AuthFormMode::Login),
            cache_dirty: false,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn set_section(&mut self, section: Section) {
        if self.section != section {
            self.section = section;
            self.selected = 0;
        }
    }

    pub fn section_len(&self) -> usize {
        match self.section {
            Section::Profile => 0,
            Section::Missions => self.missions.len(),
            Section::Prizes => self.visible_prizes().len(),
            Section::Players | Section::Leaderboard => self.players.len(),
        }
    }

    pub fn select_next(&mut self) {
        let len = self.section_len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn clamp_selection(&mut self) {
        let len = self.section_len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn selected_mission(&self) -> Option<&Mission> {
        if self.section != Section::Missions {
            return None;
        }
        self.missions.get(self.selected)
    }

    /// Player row under the cursor in the roster or leaderboard.
    pub fn selected_player(&self) -> Option<&Player> {
        match self.section {
            Section::Players => self.players.get(self.selected),
            Section::Leaderboard => leaderboard(&self.players).get(self.selected).copied(),
            _ => None,
        }
    }

    pub fn visible_prizes(&self) -> Vec<&Prize> {
        if self.affordable_only {
            affordable_prizes(&self.prizes, self.active_credits())
        } else {
            self.prizes.iter().collect()
        }
    }

    pub fn active_credits(&self) -> i64 {
        self.active_player.as_ref().map(|p| p.credits).unwrap_or(0)
    }

    /// Display label for a player's team: the loaded name, `Team <id>` when the team
    /// could not be resolved, `No team` without a reference.
    pub fn team_label(&self, player: &Player) -> String {
        match player.team.as_deref() {
            Some(id) => match self.teams.get(id) {
                Some(team) => team.name.clone(),
                None => format!("Team {id}"),
            },
            None => "No team".to_string(),
        }
    }

    pub fn clear_expired_flash(&mut self, now: Instant) {
        if let Some(flash) = &self.flash
            && now >= flash.expires_at
        {
            self.flash = None;
        }
    }

    pub fn open_login(&mut self, mode: AuthFormMode) {
        self.screen = Screen::Login;
        self.auth_form = AuthForm::new(mode);
    }
}

/// Players ordered by points, highest first. Equal scores keep their loaded order.
pub fn leaderboard(players: &[Player]) -> Vec<&Player> {
    let mut ranked: Vec<&Player> = players.iter().collect();
    ranked.sort_by(|a, b| b.points.cmp(&a.points));
    ranked
}

pub fn player_rank(players: &[Player], player_id: &str) -> Option<usize> {
    leaderboard(players)
        .iter()
        .position(|p| p.id == player_id)
        .map(|idx| idx + 1)
}

pub fn affordable_prizes(prizes: &[Prize], credits: i64) -> Vec<&Prize> {
    prizes.iter().filter(|p| p.cost <= credits).collect()
}

pub fn resolve_team_name(teams: &HashMap<String, Team>, team_id: &str) -> String {
    teams
        .get(team_id)
        .map(|team| team.name.clone())
        .unwrap_or_else(|| team_id.to_string())
}

#[derive(Debug, Clone)]
pub enum Delta {
    LoadStarted {
        player_id: Option<String>,
    },
    TeamsLoaded(Vec<Team>),
    TeamResolved(Team),
    ActivePlayerLoaded(Player),
    PlayerContentLoaded {
        missions: Vec<Mission>,
        prizes: Vec<Prize>,
    },
    MissionsLoaded(Vec<Mission>),
    PlayersLoaded(Vec<Player>),
    PageError(String),
    LoadFinished,
    SwitchStarted {
        player_id: String,
    },
    PlayerSwitched {
        player: Player,
        missions: Vec<Mission>,
        prizes: Vec<Prize>,
    },
    SwitchFailed {
        player_id: String,
        message: String,
    },
    CompletionStarted {
        mission_id: String,
    },
    MissionCompleted {
        mission_id: String,
        event_id: String,
    },
    ActionFailed(String),
    SessionChanged(Option<Session>),
    SignInLinkSent {
        email: String,
        link: Option<String>,
    },
    AuthError(String),
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    LoadDashboard { player_id: Option<String> },
    SwitchPlayer { player_id: String },
    CompleteMission { mission: Mission, player_id: String },
    SignUp { email: String, username: String },
    LogIn { email: String },
    SendSignInLink { email: String },
    CompleteSignIn { link: String, username: String },
    SignOut,
    Authenticate,
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::LoadStarted { player_id } => {
            state.loading = true;
            state.page_error = None;
            state.switch_error = None;
            state.action_error = None;
            if player_id.is_some() {
                state.player_id = player_id;
            }
        }
        Delta::TeamsLoaded(teams) => {
            state.teams = teams.into_iter().map(|t| (t.id.clone(), t)).collect();
        }
        Delta::TeamResolved(team) => {
            state.teams.insert(team.id.clone(), team);
        }
        Delta::ActivePlayerLoaded(player) => {
            set_active_player(state, player);
        }
        Delta::PlayerContentLoaded { missions, prizes } => {
            state.missions = missions;
            state.prizes = prizes;
            state.cache_dirty = true;
            state.clamp_selection();
        }
        Delta::MissionsLoaded(missions) => {
            state.missions = missions;
            state.cache_dirty = true;
            state.clamp_selection();
        }
        Delta::PlayersLoaded(players) => {
            for player in &players {
                remember_embedded_team(state, player);
            }
            if let Some(active) = state
                .active_player
                .as_ref()
                .and_then(|a| players.iter().find(|p| p.id == a.id))
                .cloned()
            {
                set_active_player(state, active);
            }
            state.players = players;
            state.clamp_selection();
        }
        Delta::PageError(message) => {
            state.push_log(format!("[WARN] {message}"));
            if state.page_error.is_none() {
                state.page_error = Some(message);
            }
        }
        Delta::LoadFinished => {
            state.loading = false;
        }
        Delta::SwitchStarted { player_id } => {
            state.switching = Some(player_id);
            state.switch_error = None;
        }
        Delta::PlayerSwitched {
            player,
            missions,
            prizes,
        } => {
            state.switching = None;
            state.switch_error = None;
            state.page_error = None;
            state.player_id = Some(player.id.clone());
            set_active_player(state, player);
            state.missions = missions;
            state.prizes = prizes;
            state.cache_dirty = true;
            state.clamp_selection();
        }
        Delta::SwitchFailed { player_id, message } => {
            state.switching = None;
            state.push_log(format!("[WARN] Switch to {player_id} failed: {message}"));
            state.switch_error = Some(format!("Could not load player {player_id}: {message}"));
        }
        Delta::CompletionStarted { mission_id } => {
            state.completing = Some(mission_id);
            state.action_error = None;
        }
        Delta::MissionCompleted {
            mission_id,
            event_id,
        } => {
            state.completing = None;
            let name = state
                .missions
                .iter()
                .find(|m| m.id == mission_id)
                .map(|m| m.name.clone())
                .unwrap_or(mission_id);
            state.push_log(format!("[INFO] Completed {name} via {event_id}"));
            state.flash = Some(Flash {
                message: format!("Mission completed: {name}"),
                expires_at: Instant::now() + state.flash_duration,
            });
        }
        Delta::ActionFailed(message) => {
            state.completing = None;
            state.push_log(format!("[WARN] {message}"));
            state.action_error = Some(message);
        }
        Delta::SessionChanged(session) => {
            state.auth_form.pending = false;
            match session {
                Some(session) => {
                    state.player_id = Some(session.player_id.clone());
                    state.session = Some(session);
                    state.screen = Screen::Dashboard;
                    state.auth_form.error = None;
                }
                None => {
                    state.session = None;
                    state.active_player = None;
                    state.missions.clear();
                    state.prizes.clear();
                    if state.auth_required {
                        state.open_login(AuthFormMode::Login);
                    }
                }
            }
        }
        Delta::SignInLinkSent { email, link } => {
            state.auth_form.pending = false;
            state.auth_form.error = None;
            state.auth_form.notice = Some(format!("Sign-in link sent to {email}"));
            if let Some(link) = link {
                state.auth_form.link = link;
                state.auth_form.focus = AuthField::Link;
            }
        }
        Delta::AuthError(message) => {
            state.auth_form.pending = false;
            state.auth_form.error = Some(message);
        }
        Delta::Log(message) => state.push_log(message),
    }
}

fn set_active_player(state: &mut AppState, player: Player) {
    remember_embedded_team(state, &player);
    if let Some(session) = state.session.as_mut() {
        session.mirror(&player);
    }
    if let Some(existing) = state.players.iter_mut().find(|p| p.id == player.id) {
        *existing = player.clone();
    }
    state.active_player = Some(player);
    state.cache_dirty = true;
}

/// Entries from the teams endpoint take precedence over names embedded in player records.
fn remember_embedded_team(state: &mut AppState, player: &Player) {
    if let Some(team) = player.embedded_team() {
        state.teams.entry(team.id.clone()).or_insert(team);
    }
}
