//! Snake rules
//!
//! Grid-locked: the head moves one whole cell per tick. The body is stored
//! head-first and only the direction buffered before the tick is used.

use std::collections::VecDeque;

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Simulation;
use super::collision::{Wrap, is_valid_move};
use super::countdown::Countdown;
use super::event::GameEvent;
use super::grid::{Direction, Grid, Tile};
use crate::input::Intent;
use crate::settings::SnakeSettings;

/// Food flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodKind {
    Regular,
    Bonus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub pos: IVec2,
    pub kind: FoodKind,
}

/// Configured first food if it fits the field, else three quarters
/// across the middle row, else the first free cell
fn first_food_cell(field: &Grid<Tile>, head: IVec2, settings: &SnakeSettings) -> Option<IVec2> {
    let size = settings.grid_size;
    let configured = IVec2::new(settings.first_food.0, settings.first_food.1);
    let usable = |pos: &IVec2| field.in_bounds(*pos) && *pos != head;
    [configured, IVec2::new(size * 3 / 4, size / 2)]
        .into_iter()
        .find(&usable)
        .or_else(|| field.iter().map(|(pos, _)| pos).find(&usable))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakeState {
    pub settings: SnakeSettings,
    /// Open field; only its bounds matter
    pub field: Grid<Tile>,
    /// Head first
    pub body: VecDeque<IVec2>,
    /// Direction committed by the last tick
    pub direction: Direction,
    /// Direction requested since the last tick
    pub next_direction: Direction,
    pub food: Option<Food>,
    /// Time left before bonus food reverts to regular
    pub bonus_timer: Countdown,
    pub score: u64,
    pub ticks_survived: u64,
    pub over: bool,
}

impl SnakeState {
    pub fn new(settings: &SnakeSettings) -> Self {
        let size = settings.grid_size;
        let head = IVec2::splat(size / 2);
        let field = Grid::new(size, size);
        let food = first_food_cell(&field, head, settings).map(|pos| Food {
            pos,
            kind: FoodKind::Regular,
        });
        Self {
            settings: settings.clone(),
            field,
            body: VecDeque::from([head]),
            direction: Direction::Right,
            next_direction: Direction::Right,
            food,
            bonus_timer: Countdown::idle(),
            score: 0,
            ticks_survived: 0,
            over: false,
        }
    }

    pub fn head(&self) -> IVec2 {
        self.body[0]
    }

    /// Level is a pure function of ticks survived
    pub fn level(&self) -> u32 {
        (self.ticks_survived / self.settings.ticks_per_level.max(1) as u64) as u32
    }

    /// Non-increasing in level, floored at the minimum interval
    pub fn interval_ms(&self) -> u32 {
        let step = self.settings.speedup_per_level_ms.saturating_mul(self.level());
        self.settings
            .base_interval_ms
            .saturating_sub(step)
            .max(self.settings.min_interval_ms)
    }

    /// Queue a turn. Reversing onto the neck is ignored.
    pub fn steer(&mut self, dir: Direction) {
        if dir != self.direction.opposite() {
            self.next_direction = dir;
        }
    }

    /// Wall or body hit. The current head is excluded; the tail is not.
    fn collides(&self, pos: IVec2) -> bool {
        !is_valid_move(&self.field, pos, Wrap::None) || self.body.iter().skip(1).any(|s| *s == pos)
    }

    /// Put food on a random free cell. Returns false when the field is full.
    pub fn place_food<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let free: Vec<IVec2> = self
            .field
            .iter()
            .map(|(pos, _)| pos)
            .filter(|pos| !self.body.contains(pos))
            .collect();
        if free.is_empty() {
            self.food = None;
            return false;
        }

        let pos = free[rng.random_range(0..free.len())];
        let bonus = rng.random_bool(self.settings.bonus_chance.clamp(0.0, 1.0));
        self.food = Some(Food {
            pos,
            kind: if bonus { FoodKind::Bonus } else { FoodKind::Regular },
        });
        if bonus {
            self.bonus_timer.start(self.settings.bonus_duration_ms);
        } else {
            self.bonus_timer.cancel();
        }
        true
    }

    /// Advance the snake by one cell
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.over {
            return events;
        }

        let dt = self.interval_ms();
        if self.bonus_timer.tick(dt) {
            if let Some(food) = self.food.as_mut() {
                food.kind = FoodKind::Regular;
            }
            events.push(GameEvent::BonusExpired);
        }

        let direction = self.next_direction;
        let head = self.head() + direction.offset();
        if self.collides(head) {
            self.over = true;
            log::info!("Snake crashed at ({}, {}) with score {}", head.x, head.y, self.score);
            events.push(GameEvent::GameOver { score: self.score });
            return events;
        }

        let level_before = self.level();
        self.direction = direction;
        self.ticks_survived += 1;
        self.body.push_front(head);

        match self.food {
            Some(food) if food.pos == head => {
                let bonus = food.kind == FoodKind::Bonus;
                let points = if bonus {
                    self.settings.bonus_points
                } else {
                    self.settings.regular_points
                };
                self.score += points as u64;
                events.push(GameEvent::FoodEaten { points, bonus });

                if !self.place_food(rng) {
                    self.over = true;
                    log::info!("Snake filled the field with score {}", self.score);
                    events.push(GameEvent::BoardFilled);
                    events.push(GameEvent::GameOver { score: self.score });
                }
            }
            _ => {
                self.body.pop_back();
            }
        }

        if self.level() > level_before {
            events.push(GameEvent::LevelUp { level: self.level() });
        }
        events
    }
}

impl Simulation for SnakeState {
    type Settings = SnakeSettings;

    fn new_game<R: Rng + ?Sized>(settings: &SnakeSettings, _rng: &mut R) -> Self {
        SnakeState::new(settings)
    }

    fn tick_ms(&self) -> u32 {
        self.interval_ms()
    }

    fn apply_intent(&mut self, intent: Intent) {
        if let Intent::Steer(dir) = intent {
            self.steer(dir);
        }
    }

    fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<GameEvent> {
        self.step(rng)
    }

    fn is_over(&self) -> bool {
        self.over
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn level(&self) -> u32 {
        SnakeState::level(self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn state() -> SnakeState {
        SnakeState::new(&SnakeSettings::default())
    }

    #[test]
    fn test_initial_layout() {
        let s = state();
        assert_eq!(s.head(), IVec2::new(10, 10));
        assert_eq!(s.body.len(), 1);
        assert_eq!(s.food.unwrap().pos, IVec2::new(15, 10));
        assert_eq!(s.direction, Direction::Right);
    }

    #[test]
    fn test_small_field_moves_first_food_inside() {
        let settings = crate::settings::Settings::from_json(r#"{"snake": {"grid_size": 10}}"#)
            .unwrap()
            .snake;
        let mut s = SnakeState::new(&settings);
        let food = s.food.unwrap();
        assert!(s.field.in_bounds(food.pos));
        assert_eq!(food.pos, IVec2::new(7, 5));

        let mut rng = Pcg32::seed_from_u64(3);
        let events: Vec<_> = (0..2).flat_map(|_| s.step(&mut rng)).collect();
        assert!(events.contains(&GameEvent::FoodEaten {
            points: 1,
            bonus: false
        }));
        assert_eq!(s.body.len(), 2);
    }

    #[test]
    fn test_first_food_never_on_head() {
        let settings = SnakeSettings {
            first_food: (10, 10),
            ..SnakeSettings::default()
        };
        let s = SnakeState::new(&settings);
        assert_ne!(s.food.unwrap().pos, s.head());
        assert_eq!(s.food.unwrap().pos, IVec2::new(15, 10));
    }

    #[test]
    fn test_eat_food_scenario() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut s = state();
        s.food = Some(Food {
            pos: IVec2::new(11, 10),
            kind: FoodKind::Regular,
        });

        let events = s.step(&mut rng);

        assert_eq!(s.head(), IVec2::new(11, 10));
        assert_eq!(s.score, 1);
        assert_eq!(s.body.len(), 2);
        assert!(events.contains(&GameEvent::FoodEaten {
            points: 1,
            bonus: false
        }));
        let food = s.food.unwrap();
        assert!(!s.body.contains(&food.pos));
        assert!(s.field.in_bounds(food.pos));
    }

    #[test]
    fn test_bonus_food_scores_five() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut s = state();
        s.food = Some(Food {
            pos: IVec2::new(11, 10),
            kind: FoodKind::Bonus,
        });
        s.step(&mut rng);
        assert_eq!(s.score, 5);
    }

    #[test]
    fn test_move_without_food_keeps_length() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut s = state();
        s.step(&mut rng);
        assert_eq!(s.head(), IVec2::new(11, 10));
        assert_eq!(s.body.len(), 1);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn test_reverse_request_ignored() {
        let mut s = state();
        s.steer(Direction::Left);
        assert_eq!(s.next_direction, Direction::Right);
        s.steer(Direction::Up);
        assert_eq!(s.next_direction, Direction::Up);
        // Direction is not committed until the tick
        assert_eq!(s.direction, Direction::Right);
        assert_eq!(s.head(), IVec2::new(10, 10));
    }

    #[test]
    fn test_wall_is_terminal() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut s = state();
        s.food = None;
        for _ in 0..9 {
            s.step(&mut rng);
            assert!(!s.over);
        }
        assert_eq!(s.head(), IVec2::new(19, 10));
        let events = s.step(&mut rng);
        assert!(s.over);
        assert!(matches!(events.last(), Some(GameEvent::GameOver { .. })));
        // State is frozen after the crash
        assert_eq!(s.head(), IVec2::new(19, 10));
    }

    #[test]
    fn test_self_collision_counts_tail() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut s = state();
        // Square loop: head (5,5) heading down into its own tail at (5,6)
        s.body = VecDeque::from([
            IVec2::new(5, 5),
            IVec2::new(6, 5),
            IVec2::new(6, 6),
            IVec2::new(5, 6),
        ]);
        s.direction = Direction::Left;
        s.next_direction = Direction::Down;
        s.step(&mut rng);
        assert!(s.over);
    }

    #[test]
    fn test_bonus_expires_to_regular() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut s = state();
        s.food = Some(Food {
            pos: IVec2::new(0, 0),
            kind: FoodKind::Bonus,
        });
        s.bonus_timer.start(200);
        s.steer(Direction::Down);
        s.step(&mut rng);
        assert_eq!(s.food.unwrap().kind, FoodKind::Bonus);
        let events = s.step(&mut rng);
        assert!(events.contains(&GameEvent::BonusExpired));
        assert_eq!(s.food.unwrap().kind, FoodKind::Regular);
    }

    #[test]
    fn test_full_field_ends_game() {
        let mut rng = Pcg32::seed_from_u64(3);
        let settings = SnakeSettings {
            grid_size: 2,
            first_food: (1, 1),
            ..SnakeSettings::default()
        };
        let mut s = SnakeState::new(&settings);
        // 2x2 field: head at (1,1) already, so seed a three-cell body
        s.body = VecDeque::from([IVec2::new(0, 1), IVec2::new(0, 0), IVec2::new(1, 0)]);
        s.direction = Direction::Down;
        s.next_direction = Direction::Right;
        let events = s.step(&mut rng);
        assert!(events.contains(&GameEvent::BoardFilled));
        assert!(s.over);
    }

    #[test]
    fn test_interval_never_increases() {
        let mut s = state();
        let mut last = s.interval_ms();
        for ticks in (0..20_000).step_by(600) {
            s.ticks_survived = ticks;
            let interval = s.interval_ms();
            assert!(interval <= last);
            assert!(interval >= s.settings.min_interval_ms);
            last = interval;
        }
    }

    proptest! {
        #[test]
        fn prop_length_tracks_food_eaten(n in 1usize..9) {
            let mut rng = Pcg32::seed_from_u64(n as u64);
            let mut s = state();
            for i in 0..n {
                let ahead = s.head() + Direction::Right.offset();
                s.food = Some(Food { pos: ahead, kind: FoodKind::Regular });
                s.step(&mut rng);
                prop_assert!(!s.over);
                prop_assert_eq!(s.body.len(), i + 2);
                let unique: HashSet<_> = s.body.iter().collect();
                prop_assert_eq!(unique.len(), s.body.len());
            }
        }
    }
}
