// Per-frame authority split between AI, local and online play

use tracing::{debug, info, warn};

use super::engine::{MatchRules, Simulation, StepEvents};
use crate::ai::{self, Bot, BotType};
use crate::game::input::{FrameInput, InputState};
use crate::game::powerups::PowerUpType;
use crate::game::rules;
use crate::game::state::{MatchState, Phase, PlayerId};
use crate::network::client::ConnectionStatus;
use crate::network::protocol::{InputPayload, RelayMessage};
use crate::replay::ReplayLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    /// Player 2 is driven by a bot every tick
    Ai(BotType),
    /// Both players share one keyboard
    Local,
    /// Relay room; the role arrives with GAME_START
    Online,
}

/// Drives one session.
///
/// AI, local and online-host sessions own the authoritative `Simulation`.
/// An online guest never simulates: it mirrors the latest `GAME_STATE` and
/// reports its own key transitions as `PLAYER_INPUT`.
pub struct Coordinator {
    mode: PlayMode,
    role: Option<PlayerId>,
    sim: Simulation,
    mirror: MatchState,
    bot: Option<Box<dyn Bot>>,

    // host side
    remote_input: InputState,
    remote_power_up: Option<PowerUpType>,
    last_input_seq: u64,

    // guest side
    last_state_seq: u64,
    last_sent_input: Option<InputState>,
    input_seq: u64,

    room_code: Option<String>,
    notice: Option<String>,
    finished: bool,
    recorder: Option<ReplayLog>,
}

impl Coordinator {
    fn with_mode(mode: PlayMode, role: Option<PlayerId>, seed: u64, rules: MatchRules) -> Self {
        let sim = Simulation::new(seed, rules);
        let bot = match mode {
            PlayMode::Ai(bot_type) => Some(ai::create_bot(bot_type, seed.wrapping_add(1))),
            _ => None,
        };

        Self {
            mode,
            role,
            mirror: sim.state().clone(),
            sim,
            bot,
            remote_input: InputState::default(),
            remote_power_up: None,
            last_input_seq: 0,
            last_state_seq: 0,
            last_sent_input: None,
            input_seq: 0,
            room_code: None,
            notice: None,
            finished: false,
            recorder: None,
        }
    }

    /// AI match, starts PLAYING immediately
    pub fn vs_ai(bot_type: BotType, seed: u64, rules: MatchRules) -> Self {
        let mut coordinator = Self::with_mode(PlayMode::Ai(bot_type), Some(PlayerId::Player1), seed, rules);
        coordinator.sim.start();
        coordinator
    }

    /// Two players on one keyboard, starts PLAYING immediately
    pub fn local(seed: u64, rules: MatchRules) -> Self {
        let mut coordinator = Self::with_mode(PlayMode::Local, Some(PlayerId::Player1), seed, rules);
        coordinator.sim.start();
        coordinator
    }

    /// Online session waiting for the relay to assign a role
    pub fn online(seed: u64, rules: MatchRules) -> Self {
        Self::with_mode(PlayMode::Online, None, seed, rules)
    }

    /// Keep every simulated tick's inputs in a replay log
    pub fn record(&mut self) {
        self.recorder = Some(ReplayLog::new(self.sim.seed(), self.sim.rules()));
    }

    pub fn take_replay(&mut self) -> Option<ReplayLog> {
        self.recorder.take()
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    pub fn role(&self) -> Option<PlayerId> {
        self.role
    }

    pub fn is_authoritative(&self) -> bool {
        match self.mode {
            PlayMode::Online => self.role == Some(PlayerId::Player1),
            _ => true,
        }
    }

    fn is_guest(&self) -> bool {
        self.mode == PlayMode::Online && self.role == Some(PlayerId::Player2)
    }

    /// State to render this frame
    pub fn view(&self) -> &MatchState {
        if self.is_guest() {
            &self.mirror
        } else {
            self.sim.state()
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn room_code(&self) -> Option<&str> {
        self.room_code.as_deref()
    }

    pub fn set_room_code(&mut self, code: String) {
        self.room_code = Some(code);
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// The session is over and the UI should go back to the menu
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Apply one message from the relay
    pub fn handle_message(&mut self, msg: RelayMessage) {
        match msg {
            RelayMessage::RoomCreated { code } => {
                info!("Room {} created, waiting for opponent", code);
                self.room_code = Some(code);
                self.sim.enter_lobby();
                rules::enter_lobby(&mut self.mirror);
            }
            RelayMessage::GameStart { role } => {
                info!("Game starting as {}", role.label());
                self.role = Some(role);
                self.notice = None;
                if role == PlayerId::Player1 {
                    self.sim.start();
                } else {
                    rules::start_match(&mut self.mirror);
                }
            }
            RelayMessage::PlayerJoined => {
                debug!("Opponent joined the room");
            }
            RelayMessage::GameState(payload) => {
                if !self.is_guest() {
                    warn!("Ignoring GAME_STATE while not a guest");
                } else if payload.seq > self.last_state_seq {
                    self.last_state_seq = payload.seq;
                    self.mirror.apply_snapshot(&payload);
                } else {
                    debug!("Dropping stale GAME_STATE seq={}", payload.seq);
                }
            }
            RelayMessage::PlayerInput(payload) => {
                if !(self.mode == PlayMode::Online && self.is_authoritative()) {
                    warn!("Ignoring PLAYER_INPUT while not hosting");
                } else if payload.seq > self.last_input_seq {
                    self.last_input_seq = payload.seq;
                    self.remote_input = InputState {
                        power_up: None,
                        ..payload.input_state()
                    };
                    if payload.power_up.is_some() {
                        self.remote_power_up = payload.power_up;
                    }
                } else {
                    debug!("Dropping stale PLAYER_INPUT seq={}", payload.seq);
                }
            }
            RelayMessage::PlayerDisconnected => {
                info!("Opponent disconnected");
                self.abandon("Opponent disconnected");
            }
            RelayMessage::Error { message } => {
                warn!("Relay error: {}", message);
                self.abandon(&message);
            }
        }
    }

    /// The relay connection ended or never opened
    pub fn handle_connection_lost(&mut self, status: &ConnectionStatus) {
        if self.finished {
            return;
        }
        let message = match status {
            ConnectionStatus::Error(msg) => msg.clone(),
            _ => "Connection closed".to_string(),
        };
        self.abandon(&message);
    }

    /// Match abandoned: back to MENU, no resume
    fn abandon(&mut self, message: &str) {
        self.notice = Some(message.to_string());
        self.finished = true;
        self.sim.reset(self.sim.seed());
        self.mirror = self.sim.state().clone();
    }

    /// Run one gated frame. Returns the messages to send to the relay.
    pub fn frame(&mut self, input: &FrameInput) -> (StepEvents, Vec<RelayMessage>) {
        let mut outgoing = Vec::new();

        if self.is_guest() {
            let local = input.player1;
            let changed = self
                .last_sent_input
                .map_or(true, |last| last.movement_changed(&local));
            if changed || local.power_up.is_some() {
                self.input_seq += 1;
                outgoing.push(RelayMessage::PlayerInput(InputPayload::new(self.input_seq, &local)));
                self.last_sent_input = Some(local);
            }
            return (StepEvents::default(), outgoing);
        }

        let playing = self.sim.state().phase == Phase::Playing;
        let p1 = input.player1;
        let p2 = match self.mode {
            PlayMode::Local => input.player2,
            PlayMode::Ai(_) => match (&mut self.bot, playing) {
                (Some(bot), true) => bot.next_input(self.sim.state(), PlayerId::Player2),
                _ => InputState::default(),
            },
            PlayMode::Online => {
                let mut remote = self.remote_input;
                if playing {
                    remote.power_up = self.remote_power_up.take();
                }
                remote
            }
        };

        if playing {
            if let Some(log) = self.recorder.as_mut() {
                log.record(p1, p2);
            }
        }

        let events = self.sim.step(&p1, &p2);

        if self.mode == PlayMode::Online
            && self.role == Some(PlayerId::Player1)
            && !matches!(self.sim.state().phase, Phase::Menu | Phase::Lobby)
        {
            outgoing.push(RelayMessage::GameState(self.sim.snapshot()));
        }

        (events, outgoing)
    }

    /// PLAYING <-> PAUSED, only for the side that simulates
    pub fn toggle_pause(&mut self) -> bool {
        self.is_authoritative() && self.sim.toggle_pause()
    }

    /// New match after GAME_OVER with a fresh seed
    pub fn restart(&mut self, seed: u64) -> bool {
        if !self.is_authoritative() || self.sim.state().phase != Phase::GameOver {
            return false;
        }

        self.sim.reset(seed);
        self.sim.start();
        if let Some(bot) = self.bot.as_mut() {
            bot.reset();
        }
        if self.recorder.is_some() {
            self.recorder = Some(ReplayLog::new(seed, self.sim.rules()));
        }
        info!("Restarted match with seed {}", seed);
        true
    }

    /// Final (player 1, player 2) score once the match is over
    pub fn final_score(&self) -> Option<(u32, u32)> {
        let state = self.view();
        (state.phase == Phase::GameOver).then_some((state.player1.score, state.player2.score))
    }
}
