//! Lifecycle state machine and fixed-step tick driver
//!
//! The controller owns one simulation, its seeded RNG and every timer that
//! lives outside the simulation. Display frames report elapsed time; the
//! controller turns that into whole simulation ticks.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{LEVEL_COMPLETE_MS, MAX_FRAME_MS, MAX_SUBSTEPS};
use crate::highscores::HighScores;
use crate::input::{GameKind, Intent};
use crate::sim::{GameEvent, Simulation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Fresh game, waiting for start
    Idle,
    Playing,
    Paused,
    /// Level cleared; the next one starts after a short pause
    LevelComplete,
    /// Run ended; only a reset leaves this phase
    GameOver,
}

/// Lifecycle requests from the keyboard or the surrounding page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Start,
    Pause,
    Resume,
    TogglePause,
    Reset,
}

/// Next phase for a command, or `None` when the command does not apply
pub fn transition(phase: Phase, command: Command) -> Option<Phase> {
    match (phase, command) {
        (_, Command::Reset) => Some(Phase::Idle),
        (Phase::Idle, Command::Start | Command::TogglePause) => Some(Phase::Playing),
        (Phase::Playing, Command::Pause | Command::TogglePause) => Some(Phase::Paused),
        (Phase::Paused, Command::Resume | Command::TogglePause) => Some(Phase::Playing),
        _ => None,
    }
}

/// Wall-clock countdown tagged with the generation that armed it.
/// Kept in fractional milliseconds so 60 Hz frames add up exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Armed {
    generation: u32,
    remaining_ms: f64,
}

/// Read-only view for the page shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub game: GameKind,
    pub phase: Phase,
    pub score: u64,
    /// `None` for games without lives
    pub lives: Option<u8>,
    pub level: u32,
    pub high_score: u64,
}

impl Snapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

pub struct Controller<S: Simulation> {
    settings: S::Settings,
    rng: Pcg32,
    state: S,
    phase: Phase,
    accumulator_ms: f64,
    /// Bumped on every reset; timers armed earlier are ignored
    generation: u32,
    level_timer: Option<Armed>,
    high_scores: HighScores,
    runs: u32,
}

impl<S: Simulation> Controller<S> {
    pub fn new(settings: S::Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = S::new_game(&settings, &mut rng);
        Self {
            settings,
            rng,
            state,
            phase: Phase::Idle,
            accumulator_ms: 0.0,
            generation: 0,
            level_timer: None,
            high_scores: HighScores::new(),
            runs: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Apply a lifecycle command. Returns false if it was rejected.
    pub fn command(&mut self, command: Command) -> bool {
        let Some(next) = transition(self.phase, command) else {
            log::debug!("Ignoring {command:?} while {:?}", self.phase);
            return false;
        };
        log::info!("{:?} -> {next:?} ({command:?})", self.phase);

        if command == Command::Reset {
            self.reset();
        }
        if self.phase == Phase::Idle && next == Phase::Playing {
            self.runs += 1;
        }
        // Leaving or entering Playing always restarts the tick clock
        self.accumulator_ms = 0.0;
        self.level_timer = None;
        self.phase = next;
        true
    }

    /// Route an input intent to the lifecycle or the simulation
    pub fn handle_intent(&mut self, intent: Intent) {
        if !intent.is_lifecycle() {
            if self.phase == Phase::Playing {
                self.state.apply_intent(intent);
            }
            return;
        }
        match intent {
            Intent::Start | Intent::TogglePause
                if matches!(self.phase, Phase::Idle | Phase::GameOver) =>
            {
                if self.phase == Phase::GameOver {
                    self.command(Command::Reset);
                }
                self.command(Command::Start);
            }
            Intent::Start => {}
            Intent::TogglePause => {
                self.command(Command::TogglePause);
            }
            Intent::Reset => {
                self.command(Command::Reset);
            }
            _ => {}
        }
    }

    /// Fresh simulation from the continuing RNG stream
    fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.state = S::new_game(&self.settings, &mut self.rng);
        self.level_timer = None;
        self.accumulator_ms = 0.0;
    }

    /// Advance by one display frame
    pub fn update(&mut self, elapsed_ms: f64) -> Vec<GameEvent> {
        let elapsed = elapsed_ms.clamp(0.0, MAX_FRAME_MS);
        match self.phase {
            Phase::Playing => self.run_ticks(elapsed),
            Phase::LevelComplete => {
                self.tick_level_timer(elapsed);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn run_ticks(&mut self, elapsed: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.accumulator_ms += elapsed;

        let mut substeps = 0;
        loop {
            // Tick length may change after a level-up
            let tick_ms = f64::from(self.state.tick_ms().max(1));
            if self.accumulator_ms < tick_ms {
                break;
            }
            if substeps >= MAX_SUBSTEPS {
                // Drop the backlog rather than spiral
                self.accumulator_ms = self.accumulator_ms.min(tick_ms);
                break;
            }
            self.accumulator_ms -= tick_ms;
            substeps += 1;

            events.extend(self.state.tick(&mut self.rng));
            if self.state.is_over() {
                self.finish();
                break;
            }
            if self.state.level_cleared() {
                self.begin_level_transition();
                break;
            }
        }
        events
    }

    fn begin_level_transition(&mut self) {
        log::info!("Level {} complete", self.state.level());
        self.phase = Phase::LevelComplete;
        self.accumulator_ms = 0.0;
        self.level_timer = Some(Armed {
            generation: self.generation,
            remaining_ms: f64::from(LEVEL_COMPLETE_MS),
        });
    }

    fn tick_level_timer(&mut self, elapsed: f64) {
        let Some(mut armed) = self.level_timer.take() else {
            return;
        };
        if armed.generation != self.generation {
            log::debug!("Discarding stale level timer");
            return;
        }
        armed.remaining_ms -= elapsed;
        if armed.remaining_ms <= 0.0 {
            self.state.advance_level();
            self.accumulator_ms = 0.0;
            self.phase = if self.state.is_over() {
                Phase::GameOver
            } else {
                Phase::Playing
            };
            log::info!("Starting level {}", self.state.level());
        } else {
            self.level_timer = Some(armed);
        }
    }

    fn finish(&mut self) {
        self.phase = Phase::GameOver;
        self.accumulator_ms = 0.0;
        self.level_timer = None;

        let score = self.state.score();
        match self
            .high_scores
            .add_score(score, self.state.level(), self.runs)
        {
            Some(rank) => log::info!("Game over: {score} points, rank #{rank}"),
            None => log::info!("Game over: {score} points"),
        }
    }

    pub fn snapshot(&self, game: GameKind) -> Snapshot {
        Snapshot {
            game,
            phase: self.phase,
            score: self.state.score(),
            lives: self.state.lives(),
            level: self.state.level(),
            high_score: self.high_scores.top_score().unwrap_or(0),
        }
    }
}
