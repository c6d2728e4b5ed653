use super::{
    config::GameConfig,
    direction::Direction,
    state::{CollisionType, GameState, Phase, Position, Snake},
};
use log::{debug, info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashSet;

/// What happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// The game was already over; nothing changed
    Idle,
    /// The snake moved one cell without growing
    Moved,
    /// The snake ate the food and grew
    Ate { score: u32 },
    /// The snake hit something; the game is over
    Collided(CollisionType),
    /// The snake grew to cover every cell; the game is over
    BoardFilled,
}

impl TickEvent {
    /// Whether this tick ended the game
    pub fn ended_game(&self) -> bool {
        matches!(self, TickEvent::Collided(_) | TickEvent::BoardFilled)
    }
}

/// Result of a game tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    /// The state to commit in place of the previous one
    pub state: GameState,
    pub event: TickEvent,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    ///
    /// The configuration is expected to have passed [`GameConfig::validate`].
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a new game from the configured initial values
    pub fn new_game(&mut self) -> GameState {
        let board_size = self.config.board_size;
        let snake = Snake::new(self.config.start);

        let fixed_food = self
            .config
            .initial_food
            .filter(|food| food.is_within(board_size) && !snake.contains(*food));
        let food = fixed_food.or_else(|| self.spawn_food(&snake, board_size));

        info!(
            "new game on a {}x{} board, start {}, food {:?}",
            board_size, board_size, self.config.start, food
        );

        match food {
            Some(food) => GameState::new(snake, self.config.initial_direction, food, board_size),
            None => {
                warn!("no free cell for food; board is already full");
                let mut state = GameState::new(
                    snake,
                    self.config.initial_direction,
                    self.config.start,
                    board_size,
                );
                state.phase = Phase::GameOver;
                state
            }
        }
    }

    /// Advance the game by one tick
    ///
    /// `state` is never modified; the returned state replaces it.
    pub fn tick(&mut self, state: &GameState) -> TickResult {
        if state.is_game_over() {
            return TickResult {
                state: state.clone(),
                event: TickEvent::Idle,
            };
        }

        let direction = state.pending_direction;
        let new_head = state.snake.head().moved_in_direction(direction);

        if let Some(collision_type) = self.check_collision(state, new_head) {
            info!(
                "game over: {:?} at {} after {} steps, score {}",
                collision_type, new_head, state.steps, state.score
            );

            // Snake, food and score stay as they were so the last frame can be shown.
            let mut next = state.clone();
            next.phase = Phase::GameOver;

            return TickResult {
                state: next,
                event: TickEvent::Collided(collision_type),
            };
        }

        let ate_food = new_head == state.food;
        let mut next = GameState {
            snake: state.snake.advanced(new_head, ate_food),
            direction,
            pending_direction: direction,
            food: state.food,
            board_size: state.board_size,
            score: state.score,
            steps: state.steps + 1,
            phase: Phase::Running,
        };

        if !ate_food {
            return TickResult {
                state: next,
                event: TickEvent::Moved,
            };
        }

        next.score += 1;
        debug!("ate food at {}, score {}", new_head, next.score);

        // Free cells are counted against the grown body.
        let event = match self.spawn_food(&next.snake, next.board_size) {
            Some(food) => {
                next.food = food;
                TickEvent::Ate { score: next.score }
            }
            None => {
                info!("board filled after {} steps, score {}", next.steps, next.score);
                next.phase = Phase::GameOver;
                TickEvent::BoardFilled
            }
        };

        TickResult { state: next, event }
    }

    /// Convenience for hosts: apply a direction request to `state`
    pub fn set_direction(&self, state: &GameState, requested: Direction) -> GameState {
        state.with_direction(requested)
    }

    /// Check if the new head position causes a collision
    ///
    /// The body is checked before the tail moves, so entering the cell the
    /// tail is about to leave is fatal.
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if state.snake.contains(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Pick a cell uniformly at random among those the snake does not cover
    ///
    /// Returns `None` when the snake covers the whole board.
    fn spawn_food(&mut self, snake: &Snake, board_size: usize) -> Option<Position> {
        let cells = board_size * board_size;
        let free = cells.saturating_sub(snake.len());
        if free == 0 {
            return None;
        }

        // While at least half the board is free, sampling finishes in a couple of draws.
        if snake.len() * 2 <= cells {
            loop {
                let row = self.rng.gen_range(0..board_size) as i32;
                let col = self.rng.gen_range(0..board_size) as i32;
                let pos = Position::new(row, col);

                if !snake.contains(pos) {
                    return Some(pos);
                }
            }
        }

        let occupied: HashSet<Position> = snake.segments().iter().copied().collect();
        let pick = self.rng.gen_range(0..free);

        (0..board_size)
            .flat_map(|row| (0..board_size).map(move |col| Position::new(row as i32, col as i32)))
            .filter(|pos| !occupied.contains(pos))
            .nth(pick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::default(), 7)
    }

    fn state_with(
        segments: &[(i32, i32)],
        direction: Direction,
        food: (i32, i32),
        size: usize,
    ) -> GameState {
        let snake = Snake::from_segments(
            segments
                .iter()
                .map(|&(row, col)| Position::new(row, col))
                .collect(),
        )
        .unwrap();
        GameState::new(snake, direction, Position::new(food.0, food.1), size)
    }

    #[test]
    fn test_new_game() {
        let state = engine().new_game();

        assert!(!state.is_game_over());
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.segments(), &[Position::new(5, 5)]);
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.food, Position::new(10, 10));
        assert_eq!(state.board_size, 20);
    }

    #[test]
    fn test_new_game_random_food_avoids_start() {
        let mut config = GameConfig::default();
        config.initial_food = None;
        let mut engine = GameEngine::with_seed(config, 1);

        for _ in 0..50 {
            let state = engine.new_game();
            assert_ne!(state.food, Position::new(5, 5));
            assert!(state.is_in_bounds(state.food));
        }
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine();
        let state = engine.new_game();

        let result = engine.tick(&state);

        assert_eq!(result.event, TickEvent::Moved);
        assert_eq!(result.state.snake.segments(), &[Position::new(5, 6)]);
        assert_eq!(result.state.steps, 1);
        // The previous state is untouched.
        assert_eq!(state.snake.segments(), &[Position::new(5, 5)]);
    }

    #[test]
    fn test_growth() {
        let mut engine = engine();
        let state = state_with(&[(5, 5)], Direction::Right, (5, 6), 20);

        let result = engine.tick(&state);

        assert_eq!(result.event, TickEvent::Ate { score: 1 });
        assert_eq!(
            result.state.snake.segments(),
            &[Position::new(5, 5), Position::new(5, 6)]
        );
        assert_eq!(result.state.score, 1);
        assert!(result.state.is_in_bounds(result.state.food));
        assert!(!result.state.is_occupied_by_snake(result.state.food));
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut engine = engine();
        let state = engine.new_game();

        let state = engine.set_direction(&state, Direction::Left);
        let result = engine.tick(&state);

        assert_eq!(result.state.snake.head(), Position::new(5, 6));
        assert_eq!(result.state.direction, Direction::Right);
    }

    #[test]
    fn test_turn_applies_on_next_tick() {
        let mut engine = engine();
        let state = engine.new_game();

        let state = state.with_direction(Direction::Up);
        assert_eq!(state.snake.head(), Position::new(5, 5));

        let result = engine.tick(&state);
        assert_eq!(result.state.snake.head(), Position::new(4, 5));
        assert_eq!(result.state.direction, Direction::Up);
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine();
        let mut state = engine.new_game();

        for _ in 0..14 {
            let result = engine.tick(&state);
            assert_eq!(result.event, TickEvent::Moved);
            state = result.state;
        }
        assert_eq!(state.snake.head(), Position::new(5, 19));

        let result = engine.tick(&state);

        assert_eq!(result.event, TickEvent::Collided(CollisionType::Wall));
        assert!(result.state.is_game_over());
        assert_eq!(result.state.snake, state.snake);
        assert_eq!(result.state.food, state.food);
        assert_eq!(result.state.score, state.score);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine();

        // Length 5 heading right along row 5, head at (5,5)
        let mut state = state_with(
            &[(5, 1), (5, 2), (5, 3), (5, 4), (5, 5)],
            Direction::Right,
            (9, 9),
            10,
        );

        // Down to (6,5), Left to (6,4), Up into (5,4)
        for direction in [Direction::Down, Direction::Left] {
            let result = engine.tick(&state.with_direction(direction));
            assert_eq!(result.event, TickEvent::Moved);
            state = result.state;
        }

        let result = engine.tick(&state.with_direction(Direction::Up));

        assert_eq!(
            result.event,
            TickEvent::Collided(CollisionType::SelfCollision)
        );
        assert!(result.state.is_game_over());
        assert_eq!(result.state.snake.len(), 5);
    }

    #[test]
    fn test_entering_vacating_tail_cell_is_fatal() {
        let mut engine = engine();

        // A 2x2 loop: tail (5,5), head (6,5) having just moved left
        let state = state_with(&[(5, 5), (5, 6), (6, 6), (6, 5)], Direction::Left, (0, 0), 20);

        let result = engine.tick(&state.with_direction(Direction::Up));

        assert_eq!(
            result.event,
            TickEvent::Collided(CollisionType::SelfCollision)
        );
        assert!(result.state.is_game_over());
    }

    #[test]
    fn test_tick_after_game_over_is_noop() {
        let mut engine = engine();
        let mut state = engine.new_game();
        state.phase = Phase::GameOver;

        let result = engine.tick(&state);

        assert_eq!(result.event, TickEvent::Idle);
        assert_eq!(result.state, state);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut engine = engine();
        let state = state_with(&[(0, 1), (0, 0)], Direction::Left, (3, 3), 20);

        let over = engine.tick(&state).state;
        assert!(over.is_game_over());

        let fresh = engine.new_game();
        assert!(!fresh.is_game_over());
        assert_eq!(fresh.snake.segments(), &[Position::new(5, 5)]);
        assert_eq!(fresh.direction, Direction::Right);
        assert_eq!(fresh.pending_direction, Direction::Right);
        assert_eq!(fresh.score, 0);
        assert_eq!(fresh.steps, 0);
    }

    #[test]
    fn test_last_free_cell_gets_food() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 3);

        // 3x3 board, seven segments, head at (2,0) moving down
        let state = state_with(
            &[(0, 0), (0, 1), (0, 2), (1, 2), (1, 1), (1, 0), (2, 0)],
            Direction::Down,
            (2, 1),
            3,
        );

        let result = engine.tick(&state.with_direction(Direction::Right));

        assert_eq!(result.event, TickEvent::Ate { score: 1 });
        assert_eq!(result.state.food, Position::new(2, 2));
        assert!(!result.state.is_game_over());
    }

    #[test]
    fn test_board_filled_ends_game() {
        let mut engine = engine();
        let state = state_with(&[(0, 0), (0, 1), (1, 1)], Direction::Down, (1, 0), 2);

        let result = engine.tick(&state.with_direction(Direction::Left));

        assert_eq!(result.event, TickEvent::BoardFilled);
        assert!(result.event.ended_game());
        assert!(result.state.is_game_over());
        assert_eq!(result.state.snake.len(), 4);
        assert_eq!(result.state.score, 1);
    }

    #[test]
    fn test_random_play_keeps_invariants() {
        let mut config = GameConfig::new(8);
        config.start = Position::new(3, 3);
        config.initial_food = None;
        let mut engine = GameEngine::with_seed(config, 42);
        let mut rng = StdRng::seed_from_u64(99);
        let mut state = engine.new_game();

        for _ in 0..2000 {
            if state.is_game_over() {
                state = engine.new_game();
            }

            let direction = Direction::ALL[rng.gen_range(0..4)];
            let before = state.with_direction(direction);
            let result = engine.tick(&before);

            assert!(result.state.snake.len() >= before.snake.len());
            if !result.state.is_game_over() {
                for segment in result.state.snake.segments() {
                    assert!(result.state.is_in_bounds(*segment));
                }
                assert!(!result.state.is_occupied_by_snake(result.state.food));
            }

            let segments: HashSet<_> = result.state.snake.segments().iter().collect();
            assert_eq!(segments.len(), result.state.snake.len());

            state = result.state;
        }
    }
}
