use std::sync::Arc;

use platformer_engine::core::{Sound, Vec2};
use platformer_engine::domain::Save;
use platformer_engine::{CollisionTables, Level, PhysicsConfig, World};

fn map(extra: &[(usize, usize, char)]) -> String {
    let mut out = String::new();
    for row in 0..15 {
        for col in 0..20 {
            let code = extra
                .iter()
                .find(|&&(c, r, _)| c == col && r == row)
                .map(|&(_, _, code)| code)
                .unwrap_or(if row == 14 { 'W' } else { '.' });
            out.push(code);
        }
        out.push('\n');
    }
    out
}

fn level(map: &str) -> Level {
    Level::from_tilemap(Arc::new(PhysicsConfig::default()), Arc::new(CollisionTables::standard()), map)
}

#[test]
fn spikes_kill_and_reset_returns_to_checkpoint() {
    let mut level = level(&map(&[(3, 13, 'C'), (10, 13, '*')]));
    let spawn = level.player.body().pos;

    let mut ticks = 0;
    while level.player.alive() && ticks < 400 {
        level.player.request_run(1.0);
        level.update();
        ticks += 1;
    }
    assert!(!level.player.alive());
    assert!(level.drain_sounds().contains(Sound::Die));

    level.reset();
    assert!(level.player.alive());
    assert_eq!(level.player.body().pos, spawn);
    assert_eq!(level.player.body().vel, Vec2::zero());
}

#[test]
fn leaving_through_the_right_edge_enters_the_next_room() {
    let config = Arc::new(PhysicsConfig::default());
    let mut level = Level::new(Arc::clone(&config), Arc::new(CollisionTables::standard()), 600.0, 100.0);
    level.player.body_mut().vel.x = 16.0;

    for _ in 0..5 {
        level.update();
        if level.player.room_x == 1 {
            break;
        }
    }
    assert_eq!((level.player.room_x, level.player.room_y), (1, 0));
    assert!(level.room(1, 0).is_some());
    assert!(level.player.body().center().x < config.tile_size);
    assert!(level.player.bullets.is_empty());
}

#[test]
fn room_reset_restores_enemies() {
    let mut level = level(&map(&[(2, 12, 'C'), (12, 13, 'c')]));
    let room = level.current_room();
    let start = room.enemies()[0].rect();
    for _ in 0..30 {
        room.update(None);
    }
    assert_ne!(room.enemies()[0].rect(), start);

    room.reset();
    assert_eq!(room.enemies()[0].rect(), start);
    assert!(room.enemies()[0].alive());
}

#[test]
fn saves_survive_json() {
    let level = level(&map(&[(5, 13, 'C')]));
    let json = level.player.save.to_json();
    let back = Save::from_json(&json).unwrap();
    assert_eq!(back, level.player.save);
    assert!(Save::from_json("{not json").is_err());
}

#[test]
fn world_facade_steps_a_level() {
    let mut world = World::new(&map(&[(4, 13, 'C'), (15, 13, 'c')]));
    world.enable_perf_metrics(true);
    for _ in 0..10 {
        world.request_run(-1.0);
        world.step();
    }
    assert_eq!(world.frame(), 10);
    assert!(world.player_alive());
    assert_eq!((world.room_x(), world.room_y()), (0, 0));
    assert!(world.get_perf_stats().query_calls() > 0);

    assert!(world.add_object(8, 12, 'W'));
    assert!(world.remove_object(8, 12, 1, 1));

    world.reset();
    assert!(world.player_alive());
}
