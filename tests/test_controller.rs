use bridge_duel::controller::{Command, GameController, PLAYER_1_ICON, PLAYER_2_ICON};
use bridge_duel::entities::{GameEntity, PlayerState, PLAYER_LIVES};
use bridge_duel::events::Event;
use bridge_duel::registry::EntityId;
use bridge_duel::surface::Canvas;
use bridge_duel::vector::Vector;
use bridge_duel::world::Phase;

use rand::rngs::StdRng;
use rand::SeedableRng;

const SCREEN: Vector = Vector::new(40, 20);

fn new_game(seed: u64) -> GameController {
    GameController::new(SCREEN, StdRng::seed_from_u64(seed))
}

/// A started game whose roster is already live.
fn started(seed: u64) -> GameController {
    let mut game = new_game(seed);
    game.handle_command(Command::StartGame).unwrap();
    game.tick().unwrap();
    game
}

/// A started game with the ship taken out, so no stray shot interferes.
fn started_without_ship() -> GameController {
    let mut game = started(1);
    let ship = game.roster().unwrap().ship;
    game.registry_mut().remove(ship);
    game.tick().unwrap();
    assert!(game.ship().is_none());
    game
}

fn canvas(game: &GameController) -> Canvas {
    let mut canvas = Canvas::new(SCREEN);
    game.draw(&mut canvas);
    canvas
}

/// Drop `player` through the bridge and run until the fall is over.
fn fall(game: &mut GameController, player: EntityId) {
    let landed = Event::PlayerFallingComplete { player };
    let landings_before = game.event_log().iter().filter(|&&e| e == landed).count();

    let x = game.player(player).unwrap().position().x;
    game.bridge_mut().unwrap().lose_piece(x).unwrap();
    game.tick().unwrap();
    assert_eq!(game.phase(), Phase::Falling);
    assert_eq!(game.player(player).unwrap().state(), PlayerState::Falling);

    for _ in 0..SCREEN.y {
        game.tick().unwrap();
    }
    let landings = game.event_log().iter().filter(|&&e| e == landed).count();
    assert_eq!(landings, landings_before + 1);
}

// ── Start screen & input ──────────────────────────────────────────────────────

#[test]
fn keys_map_to_commands() {
    assert_eq!(Command::from_key('q'), Some(Command::Quit));
    assert_eq!(Command::from_key('a'), Some(Command::TogglePlayer1));
    assert_eq!(Command::from_key('l'), Some(Command::TogglePlayer2));
    assert_eq!(Command::from_key(' '), Some(Command::StartGame));
    assert_eq!(Command::from_key('x'), None);
}

#[test]
fn start_screen_shows_the_prompt() {
    let mut game = new_game(1);
    assert_eq!(game.phase(), Phase::StartScreen);
    assert!(game.roster().is_none());

    game.tick().unwrap();
    game.tick().unwrap();
    assert!(canvas(&game).row_text(4).contains("Press Space To Begin."));
    assert_eq!(game.phase(), Phase::StartScreen);
}

#[test]
fn toggles_before_the_game_starts_are_ignored() {
    let mut game = new_game(1);
    game.handle_command(Command::TogglePlayer1).unwrap();
    game.handle_command(Command::TogglePlayer2).unwrap();
    assert_eq!(game.phase(), Phase::StartScreen);
    assert!(game.event_log().is_empty());
}

#[test]
fn started_roster_goes_live_on_the_next_tick() {
    let mut game = new_game(1);
    game.handle_command(Command::StartGame).unwrap();
    assert_eq!(game.phase(), Phase::Playing);

    let roster = game.roster().unwrap();
    assert!(!game.registry().is_live(roster.player1));

    game.tick().unwrap();
    for id in [roster.player1, roster.player2, roster.bridge, roster.ship] {
        assert!(game.registry().is_live(id), "{id} is not live");
    }
    // players, bridge, ship, two life counters, two power counters, narrator
    assert_eq!(game.registry().len(), 9);
    assert_eq!(game.event_log(), &[Event::GameStart]);
}

#[test]
fn players_appear_on_the_second_frame() {
    let mut game = new_game(1);
    game.handle_command(Command::StartGame).unwrap();
    game.tick().unwrap();
    assert!(!canvas(&game).row_text(10).contains(PLAYER_1_ICON));

    game.tick().unwrap();
    let canvas = canvas(&game);
    let standing = canvas.row_text(10);
    assert!(standing.contains(PLAYER_1_ICON));
    assert!(standing.contains(PLAYER_2_ICON));
    assert!(canvas.row_text(11).chars().all(|c| c == '='));
}

#[test]
fn toggling_flips_a_players_direction() {
    let mut game = started(1);
    let roster = game.roster().unwrap();

    game.handle_command(Command::TogglePlayer1).unwrap();
    assert_eq!(game.player(roster.player1).unwrap().move_dir(), -1);
    assert_eq!(game.player(roster.player2).unwrap().move_dir(), 1);

    game.handle_command(Command::TogglePlayer2).unwrap();
    assert_eq!(game.player(roster.player2).unwrap().move_dir(), -1);
}

#[test]
fn quitting_is_final() {
    let mut game = started(1);
    let roster = game.roster().unwrap();

    game.handle_command(Command::Quit).unwrap();
    assert_eq!(game.phase(), Phase::Exit);

    game.handle_command(Command::TogglePlayer1).unwrap();
    assert_eq!(game.player(roster.player1).unwrap().move_dir(), 1);

    game.handle_command(Command::StartGame).unwrap();
    game.tick().unwrap();
    assert_eq!(game.phase(), Phase::Exit);
}

#[test]
fn restarting_discards_the_running_match() {
    let mut game = started(1);
    let old = game.roster().unwrap();
    for _ in 0..5 {
        game.tick().unwrap();
    }

    game.handle_command(Command::StartGame).unwrap();
    let new = game.roster().unwrap();
    assert!(game.registry().is_empty());
    assert!(game.player(old.player1).is_none());
    assert_ne!(old.player1, new.player1);

    game.tick().unwrap();
    assert!(game.registry().is_live(new.player1));
    assert_eq!(
        game.player(new.player1).unwrap().position(),
        Vector::new(10, 10)
    );
}

// ── Falling & losing ──────────────────────────────────────────────────────────

#[test]
fn a_fall_costs_a_life_and_rebuilds_the_bridge() {
    let mut game = started_without_ship();
    let roster = game.roster().unwrap();

    fall(&mut game, roster.player1);

    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.player(roster.player1).unwrap().lives(), PLAYER_LIVES - 1);
    assert_eq!(game.player(roster.player2).unwrap().lives(), PLAYER_LIVES);
    assert!(game.bridge().unwrap().pieces().iter().all(|&p| p));

    let log = game.event_log();
    let falling = log
        .iter()
        .position(|&e| e == Event::PlayerFalling { player: roster.player1 });
    let complete = log
        .iter()
        .position(|&e| e == Event::PlayerFallingComplete { player: roster.player1 });
    assert!(falling.is_some() && falling < complete);
}

#[test]
fn losing_every_life_ends_the_match_without_a_phase_change() {
    let mut game = started_without_ship();
    let roster = game.roster().unwrap();

    for _ in 0..PLAYER_LIVES {
        fall(&mut game, roster.player1);
    }

    assert_eq!(game.phase(), Phase::Playing);
    assert!(game
        .event_log()
        .contains(&Event::PlayerLoses { player: roster.player1 }));
    assert_eq!(game.player(roster.player1).unwrap().state(), PlayerState::Exploding);
    assert_eq!(game.player(roster.player2).unwrap().state(), PlayerState::Winning);

    // still Playing, so a flip is honored even though the winner only jumps
    let dir = game.player(roster.player2).unwrap().move_dir();
    game.handle_command(Command::TogglePlayer2).unwrap();
    assert_eq!(game.player(roster.player2).unwrap().move_dir(), -dir);

    let announced = game.registry().live_ids().find_map(|id| {
        game.registry()
            .get(id)
            .and_then(GameEntity::as_narrator)
            .map(|n| n.message().to_string())
    });
    assert_eq!(
        announced,
        Some(format!("{PLAYER_1_ICON} Has Died! {PLAYER_2_ICON} Wins!"))
    );
}

// ── Determinism & log ─────────────────────────────────────────────────────────

#[test]
fn same_seed_plays_the_same_match() {
    let mut first = started(99);
    let mut second = started(99);
    for _ in 0..600 {
        first.tick().unwrap();
        second.tick().unwrap();
        assert_eq!(
            first.ship().map(|s| s.position()),
            second.ship().map(|s| s.position())
        );
    }
    assert_eq!(first.event_log(), second.event_log());
    assert!(first.event_log().len() > 1);
}

#[test]
fn event_log_only_grows() {
    let mut game = started(5);
    for _ in 0..200 {
        game.tick().unwrap();
    }
    let snapshot = game.event_log().to_vec();
    for _ in 0..200 {
        game.tick().unwrap();
    }
    assert!(game.event_log().starts_with(&snapshot));
    assert!(game.turn() >= 400);
}
