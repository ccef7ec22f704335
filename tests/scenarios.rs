use level_snake::collision::{
    CollisionKind, Effect, check_all_collisions, check_wall_collision, get_new_head,
};
use level_snake::food::Food;
use level_snake::game::{Engine, GameState};
use level_snake::input::Direction;
use level_snake::level::{LevelCatalog, get_level};
use level_snake::snake::{Position, Snake};

fn engine(seed: u64) -> Engine {
    Engine::with_seed(LevelCatalog::builtin().clone(), seed)
}

fn open_state(engine: &mut Engine) -> GameState {
    let mut state = engine.initialize_game(1);
    state.snake = Snake::from_segments(vec![
        Position::new(5, 5),
        Position::new(4, 5),
        Position::new(3, 5),
    ]);
    state.obstacles.clear();
    state
}

#[test]
fn scenario_a_eating_straight_ahead() {
    let mut engine = engine(100);
    let mut state = open_state(&mut engine);
    state.food = Food::regular(Position::new(6, 5));

    let next = engine.update_game_state(&state);

    assert_eq!(
        next.snake.as_slice(),
        &[
            Position::new(6, 5),
            Position::new(5, 5),
            Position::new(4, 5),
            Position::new(3, 5),
        ]
    );
    assert_eq!(next.score, state.score + 1);
    assert_ne!(next.food.position, Position::new(6, 5));
    assert!(!next.snake.occupies(next.food.position));
    assert!(!next.is_game_over);
}

#[test]
fn scenario_b_wall_hit_freezes_snake() {
    let head = get_new_head(Position::new(19, 5), Direction::Right, 20, true);
    assert_eq!(head, Position::new(20, 5));
    let collision = check_wall_collision(head, 20, true).expect("wall hit");
    assert_eq!(collision.effect, Effect::Die);

    // Level 4 is the first procedural level with walls.
    let mut engine = engine(101);
    let mut state = engine.initialize_game(4);
    state.snake = Snake::from_segments(vec![Position::new(19, 5), Position::new(18, 5)]);
    state.obstacles.clear();
    state.food = Food::regular(Position::new(0, 0));

    let next = engine.update_game_state(&state);

    assert!(next.is_game_over);
    assert_eq!(next.snake, state.snake);
}

#[test]
fn scenario_c_obstacle_shadows_food() {
    let head = Position::new(5, 5);
    let snake = Snake::from_segments(vec![head, Position::new(4, 5)]);

    let collision =
        check_all_collisions(&snake, &Food::regular(head), 20, false, &[head]).expect("hit");

    assert_eq!(collision.kind, CollisionKind::Obstacle);
    assert_eq!(collision.effect, Effect::Die);
}

#[test]
fn scenario_d_catalog_and_procedural_levels() {
    let first = get_level(1);
    assert_eq!(first, LevelCatalog::builtin().level(1, &mut rand::thread_rng()));
    assert_eq!(first.id, 1);
    assert!(!first.has_walls);
    assert_eq!(first.required_score, 5);

    let fiftieth = get_level(50);
    assert!(fiftieth.has_walls);
    assert_eq!(fiftieth.required_score, 250);
    assert_eq!(fiftieth.speed, 50);
}

#[test]
fn finished_and_paused_states_absorb_ticks() {
    let mut engine = engine(102);
    let mut state = open_state(&mut engine);

    state.is_paused = true;
    assert_eq!(engine.update_game_state(&state), state);

    state.is_paused = false;
    state.is_game_over = true;
    assert_eq!(engine.update_game_state(&state), state);
}

#[test]
fn movement_keeps_length_and_drops_old_tail() {
    let mut engine = engine(103);
    let mut state = open_state(&mut engine);
    state.food = Food::regular(Position::new(15, 15));

    for direction in [Direction::Down, Direction::Left, Direction::Up, Direction::Up] {
        assert!(state.set_next_direction(direction));
        let next = engine.update_game_state(&state);
        let expected_head = get_new_head(state.snake.head(), direction, 20, false);

        let body = state.snake.as_slice();
        let mut expected = vec![expected_head];
        expected.extend_from_slice(&body[..body.len() - 1]);

        assert_eq!(next.snake.as_slice(), expected.as_slice());
        assert_eq!(body[body.len() - 1], state.snake.tail());
        state = next;
    }
}

#[test]
fn score_and_level_never_decrease() {
    let mut engine = engine(104);
    let mut state = open_state(&mut engine);

    for _ in 0..400 {
        let next = engine.update_game_state(&state);
        assert!(next.score >= state.score);
        assert!(next.level >= state.level);
        if next.is_game_over {
            break;
        }
        // Food straight ahead pushes the score through the first thresholds.
        state = next;
        if state.score < 12 {
            state.food = Food::regular(get_new_head(
                state.snake.head(),
                state.direction,
                20,
                false,
            ));
        }
    }

    assert!(state.level >= 2);
}
