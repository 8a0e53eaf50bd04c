//! Pac-Man rules
//!
//! Positions are sub-cell `Vec2`s measured in cells. Entities only turn at
//! cell centres, and a move that would overshoot a centre snaps to it, so
//! every tick length and speed lands on the same centres.

use glam::{IVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Simulation;
use super::collision::{Wrap, is_valid_move, resolve};
use super::countdown::Countdown;
use super::event::GameEvent;
use super::ghost::{Ghost, GhostKind, GhostMode, TargetContext, chase_target};
use super::grid::{Direction, Grid, Tile};
use super::maze::{CLASSIC_LAYOUT, Maze, MazeError};
use crate::input::Intent;
use crate::settings::PacmanSettings;

/// Distance under which a position counts as sitting on a cell centre
const CENTER_EPSILON: f32 = 1e-3;

pub fn cell_of(pos: Vec2) -> IVec2 {
    pos.round().as_ivec2()
}

pub fn is_centered(pos: Vec2) -> bool {
    (pos - pos.round()).abs().max_element() < CENTER_EPSILON
}

/// Move `speed` cells along `dir`, stopping on the next centre if it is
/// closer. Leaving through the side tunnel re-enters on the far edge.
pub fn advance(pos: Vec2, dir: Direction, speed: f32, width: i32) -> Vec2 {
    let offset = dir.offset().as_vec2();
    let sign = offset.x + offset.y;
    let along = if dir.is_horizontal() { pos.x } else { pos.y };
    let next_center = if sign > 0.0 {
        (along + CENTER_EPSILON).floor() + 1.0
    } else {
        (along - CENTER_EPSILON).ceil() - 1.0
    };
    let moved = if (next_center - along).abs() <= speed + CENTER_EPSILON {
        next_center
    } else {
        along + sign * speed
    };

    let mut out = if dir.is_horizontal() {
        Vec2::new(moved, pos.y.round())
    } else {
        Vec2::new(pos.x.round(), moved)
    };
    let w = width as f32;
    if out.x <= -1.0 + CENTER_EPSILON {
        out.x += w;
    } else if out.x >= w - CENTER_EPSILON {
        out.x -= w;
    }
    out
}

fn is_open(grid: &Grid<Tile>, cell: IVec2, dir: Direction) -> bool {
    is_valid_move(grid, cell + dir.offset(), Wrap::Horizontal)
}

fn load_maze(settings: &PacmanSettings) -> Result<Maze, MazeError> {
    Maze::parse(settings.layout.as_deref().unwrap_or(CLASSIC_LAYOUT))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUp {
    /// Ate an energizer; ghosts are frightened
    Energized,
    /// Debug toggle; ghosts pass through harmlessly
    Invincible,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub dir: Direction,
    /// Turn waiting for an open cell centre
    pub requested: Option<Direction>,
    pub moving: bool,
    pub energized: Countdown,
    pub invincible: Countdown,
}

impl Player {
    pub fn spawn(at: IVec2) -> Self {
        Self {
            pos: at.as_vec2(),
            dir: Direction::Left,
            requested: None,
            moving: true,
            energized: Countdown::idle(),
            invincible: Countdown::idle(),
        }
    }

    pub fn cell(&self) -> IVec2 {
        cell_of(self.pos)
    }

    /// Active power-up; invincibility wins when both run
    pub fn power(&self) -> Option<PowerUp> {
        if self.invincible.is_active() {
            Some(PowerUp::Invincible)
        } else if self.energized.is_active() {
            Some(PowerUp::Energized)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PacmanState {
    pub settings: PacmanSettings,
    pub maze: Maze,
    pub player: Player,
    pub ghosts: Vec<Ghost>,
    /// Position in the scatter/chase schedule
    pub schedule_index: usize,
    pub schedule_timer: Countdown,
    /// Post-death pause before everyone respawns
    pub freeze: Countdown,
    /// Invincibility toggle requested since the last tick
    pub toggle_invincible: bool,
    pub score: u64,
    pub lives: u8,
    pub level: u32,
    pub level_cleared: bool,
    pub over: bool,
}

impl PacmanState {
    pub fn new(settings: &PacmanSettings) -> Self {
        let (maze, over) = match load_maze(settings) {
            Ok(maze) => (maze, false),
            Err(err) => {
                log::error!("Rejected Pac-Man maze: {err}");
                (Maze::sealed(), true)
            }
        };

        let mut state = Self {
            settings: settings.clone(),
            player: Player::spawn(maze.player_spawn),
            maze,
            ghosts: Vec::new(),
            schedule_index: 0,
            schedule_timer: Countdown::idle(),
            freeze: Countdown::idle(),
            toggle_invincible: false,
            score: 0,
            lives: settings.lives,
            level: 1,
            level_cleared: false,
            over,
        };
        state.reset_positions();
        state
    }

    /// Mode every non-frightened ghost follows right now
    pub fn schedule_mode(&self) -> GhostMode {
        match self.schedule_index {
            i if i >= self.settings.mode_schedule_ms.len() => GhostMode::Chase,
            i if i % 2 == 0 => GhostMode::Scatter,
            _ => GhostMode::Chase,
        }
    }

    pub fn ghost_speed(&self, mode: GhostMode) -> f32 {
        if mode == GhostMode::Frightened {
            return self.settings.frightened_speed;
        }
        let boost = 1.0 + self.settings.ghost_speedup_per_level * self.level.saturating_sub(1) as f32;
        (self.settings.ghost_speed * boost).min(self.settings.player_speed)
    }

    fn release_delay(&self, kind: GhostKind) -> u32 {
        self.settings.release_delays_ms[kind as usize]
    }

    fn restart_schedule(&mut self) {
        self.schedule_index = 0;
        self.schedule_timer = self
            .settings
            .mode_schedule_ms
            .first()
            .map(|ms| Countdown::new(*ms))
            .unwrap_or_default();
    }

    /// Player and ghosts back on their spawn cells, timed modes cleared
    fn reset_positions(&mut self) {
        self.restart_schedule();
        self.freeze.cancel();
        self.player = Player::spawn(self.maze.player_spawn);
        let mode = self.schedule_mode();
        self.ghosts = self
            .maze
            .ghost_homes
            .iter()
            .map(|(kind, home)| Ghost::new(*kind, *home, self.release_delay(*kind), mode))
            .collect();
    }

    fn energize(&mut self) {
        self.player.energized.start(self.settings.frightened_ms);
        for ghost in &mut self.ghosts {
            ghost.frighten();
        }
    }

    fn tick_powers(&mut self, dt: u32, events: &mut Vec<GameEvent>) {
        if std::mem::take(&mut self.toggle_invincible) {
            if self.player.invincible.is_active() {
                self.player.invincible.cancel();
            } else {
                self.player.invincible.start(self.settings.invincible_ms);
            }
            log::debug!("Invincible: {}", self.player.invincible.is_active());
        } else {
            self.player.invincible.tick(dt);
        }

        if self.player.energized.tick(dt) {
            let mode = self.schedule_mode();
            for ghost in self.ghosts.iter_mut().filter(|g| g.is_frightened()) {
                ghost.mode = mode;
            }
            events.push(GameEvent::FrightenedEnded);
        }
    }

    /// Scatter/chase clock; frozen while ghosts are frightened
    fn tick_schedule(&mut self, dt: u32, events: &mut Vec<GameEvent>) {
        if self.player.energized.is_active() || !self.schedule_timer.tick(dt) {
            return;
        }

        self.schedule_index += 1;
        if let Some(ms) = self.settings.mode_schedule_ms.get(self.schedule_index) {
            self.schedule_timer.start(*ms);
        }
        let mode = self.schedule_mode();
        for ghost in self.ghosts.iter_mut().filter(|g| !g.is_frightened()) {
            ghost.mode = mode;
            if !ghost.in_house {
                ghost.dir = ghost.dir.opposite();
            }
        }
        log::debug!("Ghosts switched to {mode:?}");
        events.push(GameEvent::ModeSwitched);
    }

    fn move_player(&mut self) {
        let grid = &self.maze.grid;
        let player = &mut self.player;

        if player.requested == Some(player.dir.opposite()) {
            player.dir = player.dir.opposite();
            player.requested = None;
            player.moving = true;
        }
        if is_centered(player.pos) {
            let cell = player.cell();
            if let Some(dir) = player.requested
                && is_open(grid, cell, dir)
            {
                player.dir = dir;
                player.requested = None;
            }
            player.moving = is_open(grid, cell, player.dir);
        }
        if player.moving {
            player.pos = advance(player.pos, player.dir, self.settings.player_speed, grid.width());
        }
    }

    /// Eat whatever sits on the player's cell centre
    fn collect(&mut self, events: &mut Vec<GameEvent>) {
        if !is_centered(self.player.pos) {
            return;
        }
        let Some(cell) = resolve(&self.maze.grid, self.player.cell(), Wrap::Horizontal) else {
            return;
        };

        match self.maze.grid.get(cell).copied() {
            Some(Tile::Dot) => {
                self.maze.grid.set(cell, Tile::Empty);
                self.score += self.settings.dot_points as u64;
                events.push(GameEvent::DotEaten);
            }
            Some(Tile::Energizer) => {
                self.maze.grid.set(cell, Tile::Empty);
                self.score += self.settings.energizer_points as u64;
                self.energize();
                events.push(GameEvent::EnergizerEaten);
            }
            _ => {}
        }
    }

    fn move_ghosts<R: Rng + ?Sized>(&mut self, dt: u32, rng: &mut R) {
        let width = self.maze.width();
        let exit = self.maze.house_exit;
        let player = self.player.cell();
        let player_dir = self.player.dir;

        for i in 0..self.ghosts.len() {
            let blinky = self
                .ghosts
                .iter()
                .find(|g| g.kind == GhostKind::Blinky && !g.in_house)
                .map(Ghost::cell)
                .unwrap_or(player);
            let speed = self.ghost_speed(self.ghosts[i].mode);
            let corner = self.maze.scatter_corner(self.ghosts[i].kind);
            let grid = &self.maze.grid;
            let ghost = &mut self.ghosts[i];

            if ghost.in_house {
                ghost.release.tick(dt);
                if ghost.release.is_active() {
                    continue;
                }
                ghost.in_house = false;
                ghost.pos = exit.as_vec2();
                ghost.dir = Direction::Left;
            }

            ghost.target = match ghost.mode {
                GhostMode::Scatter => corner,
                GhostMode::Chase => chase_target(
                    ghost.kind,
                    &TargetContext {
                        player,
                        player_dir,
                        blinky,
                        ghost: ghost.cell(),
                        corner,
                    },
                ),
                // Random walk; the target is unused
                GhostMode::Frightened => ghost.cell(),
            };

            if is_centered(ghost.pos) {
                ghost.dir = ghost.choose_direction(grid, rng);
                if !is_open(grid, ghost.cell(), ghost.dir) {
                    continue;
                }
            }
            ghost.pos = advance(ghost.pos, ghost.dir, speed, width);
        }
    }

    fn resolve_collisions(&mut self, events: &mut Vec<GameEvent>) {
        let radius = self.settings.collision_radius;
        let respawn_ms = self.settings.respawn_delay_ms;
        let points = self.settings.ghost_points;
        let mode = self.schedule_mode();
        let player = self.player.pos;
        let invincible = self.player.invincible.is_active();
        let mut caught = false;

        for ghost in &mut self.ghosts {
            if ghost.in_house || ghost.pos.distance(player) >= radius {
                continue;
            }
            if ghost.is_frightened() {
                ghost.send_home(respawn_ms, mode);
                self.score += points as u64;
                log::debug!("{} captured", ghost.kind.name());
                events.push(GameEvent::GhostCaptured {
                    ghost: ghost.kind,
                    points,
                });
            } else if !invincible {
                caught = true;
            }
        }

        if caught {
            self.lose_life(events);
        }
    }

    fn lose_life(&mut self, events: &mut Vec<GameEvent>) {
        self.lives = self.lives.saturating_sub(1);
        events.push(GameEvent::LifeLost {
            lives_left: self.lives,
        });
        if self.lives == 0 {
            self.over = true;
            log::info!("Pac-Man out of lives with score {}", self.score);
            events.push(GameEvent::GameOver { score: self.score });
            return;
        }
        self.freeze.start(self.settings.death_freeze_ms);
        if !self.freeze.is_active() {
            self.reset_positions();
        }
    }

    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.over || self.level_cleared {
            return events;
        }
        let dt = self.settings.tick_ms;

        if self.freeze.is_active() {
            if self.freeze.tick(dt) {
                self.reset_positions();
            }
            return events;
        }

        self.tick_powers(dt, &mut events);
        self.tick_schedule(dt, &mut events);

        self.move_player();
        self.collect(&mut events);
        self.resolve_collisions(&mut events);
        if self.over || self.freeze.is_active() {
            return events;
        }

        self.move_ghosts(dt, rng);
        self.resolve_collisions(&mut events);
        if self.over || self.freeze.is_active() {
            return events;
        }

        if self.maze.collectibles_left() == 0 {
            self.level_cleared = true;
            log::info!("Pac-Man level {} cleared", self.level);
            events.push(GameEvent::LevelCleared);
        }
        events
    }
}

impl Simulation for PacmanState {
    type Settings = PacmanSettings;

    fn new_game<R: Rng + ?Sized>(settings: &PacmanSettings, _rng: &mut R) -> Self {
        PacmanState::new(settings)
    }

    fn tick_ms(&self) -> u32 {
        self.settings.tick_ms
    }

    fn apply_intent(&mut self, intent: Intent) {
        match intent {
            Intent::Steer(dir) => self.player.requested = Some(dir),
            Intent::ToggleInvincible => self.toggle_invincible = !self.toggle_invincible,
            _ => {}
        }
    }

    fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<GameEvent> {
        self.step(rng)
    }

    /// Next level on the same layout; score and lives carry over
    fn advance_level(&mut self) {
        match load_maze(&self.settings) {
            Ok(maze) => self.maze = maze,
            Err(err) => {
                log::error!("Rejected Pac-Man maze: {err}");
                self.over = true;
                return;
            }
        }
        self.level += 1;
        self.level_cleared = false;
        self.reset_positions();
        log::info!("Pac-Man level {}", self.level);
    }

    fn is_over(&self) -> bool {
        self.over
    }

    fn level_cleared(&self) -> bool {
        self.level_cleared
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn lives(&self) -> Option<u8> {
        Some(self.lives)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn with_layout(layout: &str) -> PacmanState {
        PacmanState::new(&PacmanSettings {
            layout: Some(layout.to_string()),
            ..PacmanSettings::default()
        })
    }

    fn run(s: &mut PacmanState, rng: &mut Pcg32, ticks: usize) -> Vec<GameEvent> {
        (0..ticks).flat_map(|_| s.step(rng)).collect()
    }

    /// Player on row 1 next to an energizer; Blinky shut in a pocket below
    const POCKET: &str = "#####\n#Po##\n#####\n#1.##\n#####";

    #[test]
    fn test_classic_start() {
        let s = PacmanState::new(&PacmanSettings::default());
        assert!(!s.over);
        assert_eq!(s.lives, 3);
        assert_eq!(s.level, 1);
        assert_eq!(s.player.pos, Vec2::new(13.0, 23.0));
        assert_eq!(s.ghosts.len(), 4);
        assert!(s.ghosts.iter().all(|g| g.in_house));
        assert_eq!(s.schedule_mode(), GhostMode::Scatter);
    }

    #[test]
    fn test_advance_snaps_to_centres() {
        let mut pos = Vec2::new(1.0, 1.0);
        for _ in 0..3 {
            pos = advance(pos, Direction::Right, 0.4, 10);
        }
        // 1.4, 1.8, then snaps onto 2.0 rather than overshooting
        assert_eq!(pos, Vec2::new(2.0, 1.0));
        assert!(is_centered(pos));
    }

    #[test]
    fn test_dots_score_and_clear_level() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut s = with_layout("#####\n#P..#\n#####");
        s.apply_intent(Intent::Steer(Direction::Right));

        let events = run(&mut s, &mut rng, 8);
        assert_eq!(s.player.pos, Vec2::new(2.0, 1.0));
        assert_eq!(s.score, 10);
        assert!(events.contains(&GameEvent::DotEaten));
        assert!(!s.level_cleared);

        let events = run(&mut s, &mut rng, 8);
        assert_eq!(s.score, 20);
        assert!(events.contains(&GameEvent::LevelCleared));
        assert!(s.level_cleared);

        let frozen = s.clone();
        assert!(s.step(&mut rng).is_empty());
        assert_eq!(s, frozen);
    }

    #[test]
    fn test_advance_level_restores_maze() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut s = with_layout("####\n#P.#\n####");
        s.apply_intent(Intent::Steer(Direction::Right));
        run(&mut s, &mut rng, 8);
        assert!(s.level_cleared);

        s.advance_level();
        assert_eq!(s.level, 2);
        assert!(!s.level_cleared);
        assert_eq!(s.maze.collectibles_left(), 1);
        assert_eq!(s.player.pos, Vec2::new(1.0, 1.0));
        assert_eq!(s.score, 10);
        assert_eq!(s.lives, 3);
    }

    #[test]
    fn test_frightened_lasts_configured_duration() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut s = with_layout(POCKET);
        s.apply_intent(Intent::Steer(Direction::Right));

        let events = run(&mut s, &mut rng, 8);
        assert!(events.contains(&GameEvent::EnergizerEaten));
        assert_eq!(s.score, 50);
        assert_eq!(s.player.power(), Some(PowerUp::Energized));
        assert!(s.ghosts[0].is_frightened());

        // 10 000 ms at 16 ms per tick
        let events = run(&mut s, &mut rng, 624);
        assert!(!events.contains(&GameEvent::FrightenedEnded));
        assert!(s.ghosts[0].is_frightened());

        let events = s.step(&mut rng);
        assert!(events.contains(&GameEvent::FrightenedEnded));
        assert_eq!(s.ghosts[0].mode, GhostMode::Scatter);
        assert_eq!(s.player.power(), None);
    }

    #[test]
    fn test_schedule_flips_to_chase() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut s = with_layout("#####\n#P.##\n#####\n#1.##\n#####");
        // 7000 ms of scatter is 437.5 ticks
        let events = run(&mut s, &mut rng, 437);
        assert!(!events.contains(&GameEvent::ModeSwitched));
        assert_eq!(s.ghosts[0].mode, GhostMode::Scatter);

        let events = s.step(&mut rng);
        assert!(events.contains(&GameEvent::ModeSwitched));
        assert_eq!(s.ghosts[0].mode, GhostMode::Chase);
        assert_eq!(s.schedule_mode(), GhostMode::Chase);
    }

    /// Blinky out in the maze heading left, the others still housed
    fn blinky_roaming() -> PacmanState {
        let mut s = PacmanState::new(&PacmanSettings::default());
        s.ghosts[0].in_house = false;
        s.ghosts[0].pos = Vec2::new(13.0, 11.0);
        s.ghosts[0].dir = Direction::Left;
        s
    }

    #[test]
    fn test_energizer_reverses_roaming_ghosts() {
        let mut s = blinky_roaming();
        let housed = s.ghosts[1].dir;
        s.energize();
        assert_eq!(s.ghosts[0].dir, Direction::Right);
        assert_eq!(s.ghosts[1].dir, housed);
        assert!(s.ghosts.iter().all(Ghost::is_frightened));
    }

    #[test]
    fn test_schedule_switch_reverses_roaming_ghosts() {
        let mut s = blinky_roaming();
        let housed = s.ghosts[1].dir;
        s.schedule_timer = Countdown::new(16);
        let mut events = Vec::new();
        s.tick_schedule(16, &mut events);

        assert_eq!(events, vec![GameEvent::ModeSwitched]);
        assert_eq!(s.ghosts[0].mode, GhostMode::Chase);
        assert_eq!(s.ghosts[0].dir, Direction::Right);
        assert_eq!(s.ghosts[1].dir, housed);
    }

    #[test]
    fn test_frightened_ghost_is_captured() {
        let mut s = PacmanState::new(&PacmanSettings::default());
        let home = s.ghosts[0].home;
        s.ghosts[0].in_house = false;
        s.ghosts[0].pos = s.player.pos + Vec2::new(0.2, 0.0);
        s.ghosts[0].frighten();

        let mut events = Vec::new();
        s.resolve_collisions(&mut events);

        assert_eq!(s.score, 200);
        assert_eq!(s.lives, 3);
        assert_eq!(s.ghosts[0].pos, home.as_vec2());
        assert!(!s.ghosts[0].is_frightened());
        assert!(s.ghosts[0].in_house);
        assert_eq!(
            events,
            vec![GameEvent::GhostCaptured {
                ghost: GhostKind::Blinky,
                points: 200
            }]
        );
    }

    #[test]
    fn test_ghost_contact_costs_one_life() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut s = PacmanState::new(&PacmanSettings::default());
        let spawn = s.player.pos;
        s.player.pos += Vec2::new(-0.5, 0.0);
        s.ghosts[0].in_house = false;
        s.ghosts[0].mode = GhostMode::Chase;
        s.ghosts[0].pos = s.player.pos;

        let mut events = Vec::new();
        s.resolve_collisions(&mut events);
        assert_eq!(s.lives, 2);
        assert_eq!(events, vec![GameEvent::LifeLost { lives_left: 2 }]);
        assert!(s.freeze.is_active());

        // Nothing moves during the freeze
        let frozen = s.player.pos;
        run(&mut s, &mut rng, 62);
        assert_eq!(s.player.pos, frozen);

        s.step(&mut rng);
        assert!(!s.freeze.is_active());
        assert_eq!(s.player.pos, spawn);
        assert!(s.ghosts.iter().all(|g| g.in_house && g.pos == g.home.as_vec2()));
        assert_eq!(s.lives, 2);
    }

    #[test]
    fn test_invincible_ignores_ghosts() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut s = with_layout(POCKET);
        s.apply_intent(Intent::ToggleInvincible);
        s.step(&mut rng);
        assert_eq!(s.player.power(), Some(PowerUp::Invincible));

        s.ghosts[0].in_house = false;
        s.ghosts[0].mode = GhostMode::Chase;
        s.ghosts[0].pos = s.player.pos;
        let mut events = Vec::new();
        s.resolve_collisions(&mut events);
        assert_eq!(s.lives, 3);
        assert!(events.is_empty());

        s.ghosts[0].pos = Vec2::new(1.0, 3.0);
        s.apply_intent(Intent::ToggleInvincible);
        s.step(&mut rng);
        assert_eq!(s.player.power(), None);
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut s = PacmanState::new(&PacmanSettings::default());
        s.lives = 1;
        s.ghosts[0].in_house = false;
        s.ghosts[0].pos = s.player.pos;

        let mut events = Vec::new();
        s.resolve_collisions(&mut events);
        assert!(s.over);
        assert_eq!(s.lives, 0);
        assert!(events.contains(&GameEvent::GameOver { score: 0 }));
    }

    #[test]
    fn test_tunnel_wraps_player() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut s = with_layout("#####\n P . \n#####");
        assert_eq!(s.player.dir, Direction::Left);
        run(&mut s, &mut rng, 8);
        assert_eq!(s.player.pos, Vec2::new(0.0, 1.0));
        run(&mut s, &mut rng, 8);
        assert_eq!(s.player.pos, Vec2::new(4.0, 1.0));
    }

    #[test]
    fn test_turn_waits_for_open_centre() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut s = with_layout("#####\n##.##\n#P..#\n#####");
        s.apply_intent(Intent::Steer(Direction::Right));
        s.step(&mut rng);
        assert_eq!(s.player.dir, Direction::Right);

        s.apply_intent(Intent::Steer(Direction::Up));
        run(&mut s, &mut rng, 7);
        assert_eq!(s.player.pos, Vec2::new(2.0, 2.0));
        assert_eq!(s.player.dir, Direction::Right);

        s.step(&mut rng);
        assert_eq!(s.player.dir, Direction::Up);
        assert_eq!(s.player.pos, Vec2::new(2.0, 1.875));
    }

    #[test]
    fn test_blocked_player_halts() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut s = with_layout("####\n#P.#\n####");
        // Facing the left wall at spawn
        s.step(&mut rng);
        assert_eq!(s.player.pos, Vec2::new(1.0, 1.0));
        assert!(!s.player.moving);
    }

    #[test]
    fn test_malformed_maze_is_game_over() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut s = with_layout("#P\n###");
        assert!(s.over);
        assert!(s.step(&mut rng).is_empty());
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = PacmanState::new(&PacmanSettings::default());
        let mut b = a.clone();
        let mut rng_a = Pcg32::seed_from_u64(77);
        let mut rng_b = Pcg32::seed_from_u64(77);
        for i in 0..3000 {
            if i % 200 == 0 {
                let dir = Direction::ALL[(i / 200) % 4];
                a.apply_intent(Intent::Steer(dir));
                b.apply_intent(Intent::Steer(dir));
            }
            assert_eq!(a.step(&mut rng_a), b.step(&mut rng_b));
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_ghost_speed_capped() {
        let mut s = PacmanState::new(&PacmanSettings::default());
        assert_eq!(s.ghost_speed(GhostMode::Chase), 0.1);
        s.level = 50;
        assert_eq!(s.ghost_speed(GhostMode::Chase), s.settings.player_speed);
        assert_eq!(s.ghost_speed(GhostMode::Frightened), 0.0625);
    }
}
