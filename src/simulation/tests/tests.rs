use super::effects::apply_effects;
use super::*;
use crate::core::{Sound, Vec2};
use crate::domain::Ability;
use crate::systems::entities::{EnemyProjectile, Player};
use crate::systems::physics::{Effect, EntityRef};

fn floor_room() -> Room {
    let mut room = Room::new(20, 15);
    for col in 0..20 {
        room.add_object(col, 10, 'W');
    }
    room
}

fn tick(room: &mut Room, player: &mut Player) {
    room.update(Some(player));
    room.update_player(player);
}

#[test]
fn unknown_codes_and_out_of_range_cells_are_ignored() {
    let mut room = Room::new(4, 4);
    assert!(!room.add_object(0, 0, '?'));
    assert!(!room.add_object(4, 0, 'W'));
    assert!(!room.add_object(-1, 2, 'c'));
    assert!(room.add_object(3, 3, 'W'));
    assert!(!room.add_object(3, 3, 'W'));
    assert!(!room.add_object(3, 3, 'I'));
    assert_eq!(room.walls.count(), 1);
    assert_eq!(room.walls.get(3, 3).map(|w| w.kind), Some(WallKind::Wall));
}

#[test]
fn entity_codes_stack_on_one_cell() {
    let mut room = Room::new(4, 4);
    assert!(room.add_object(1, 2, 'c'));
    assert!(room.add_object(1, 2, 'c'));
    assert_eq!(room.enemies.len(), 2);
    assert!(room.add_object(2, 2, '*'));
    assert!(room.add_object(2, 2, 'W'));
    assert_eq!(room.hazards.len(), 1);
    assert_eq!(room.walls.count(), 1);
}

#[test]
fn tilemap_fills_every_list() {
    let map = "\
W#..C.....
W#.^..c..B
W~~D..>..0
WWWWWWWWWW";
    let mut room = Room::new(10, 4);
    room.load_tilemap(map);
    assert_eq!(room.walls.count(), 13);
    assert_eq!(room.ladders.len(), 2);
    assert_eq!(room.water.len(), 2);
    assert_eq!(room.checkpoints.len(), 1);
    assert_eq!(room.dynamic_objects.len(), 1);
    assert_eq!(room.devices.len(), 2);
    assert_eq!(room.enemies.len(), 1);
    assert!(room.boss.is_some());
    assert_eq!(room.powerups.len(), 1);
    assert_eq!(room.powerups[0].ability, Ability::Run);
}

#[test]
fn autotile_masks_follow_neighbours() {
    let mut room = Room::new(6, 6);
    for col in 1..4 {
        room.add_object(col, 1, 'W');
    }
    room.add_object(2, 2, 'R');
    assert_eq!(room.walls.get(2, 1).map(|w| w.autotile), Some(2 | 4 | 8));
    assert_eq!(room.walls.get(1, 1).map(|w| w.autotile), Some(2));

    assert!(room.remove_object(3, 1, 1, 1));
    assert_eq!(room.walls.get(2, 1).map(|w| w.autotile), Some(4 | 8));
    assert!(room.walls.get(3, 1).is_none());
}

#[test]
fn water_surface_and_ladder_tops() {
    let mut room = Room::new(8, 8);
    room.add_object(2, 6, '~');
    room.add_object(2, 5, '~');
    room.add_object(4, 3, '#');
    room.add_object(4, 4, '#');

    let surface = |room: &Room, row: f32| room.water.iter().find(|w| w.rect.top() == row * 32.0).map(|w| w.surface);
    assert_eq!(surface(&room, 5.0), Some(true));
    assert_eq!(surface(&room, 6.0), Some(false));
    let top = |room: &Room, row: f32| room.ladders.iter().find(|l| l.rect.top() == row * 32.0).map(|l| l.top);
    assert_eq!(top(&room, 3.0), Some(true));
    assert_eq!(top(&room, 4.0), Some(false));

    room.remove_object(2, 5, 1, 1);
    assert_eq!(surface(&room, 6.0), Some(true));
}

#[test]
fn remove_object_takes_everything_in_the_area() {
    let mut room = floor_room();
    room.add_object(5, 9, 'c');
    room.add_object(6, 9, 'D');
    room.add_object(7, 9, '^');
    room.add_object(12, 9, 'D');
    assert!(room.remove_object(5, 9, 3, 1));
    assert!(room.enemies.is_empty());
    assert_eq!(room.dynamic_objects.len(), 1);
    assert!(room.devices.is_empty());
    assert_eq!(room.walls.count(), 20);
    assert!(!room.remove_object(0, 0, 2, 2));
}

#[test]
fn destroy_effect_breaks_block_until_reset() {
    let mut room = floor_room();
    room.add_object(6, 9, 'D');
    let mut effects = vec![Effect::Destroy { target: EntityRef::Dynamic(0) }, Effect::Destroy { target: EntityRef::Dynamic(0) }];
    let applied = apply_effects(&mut room, None, &mut effects);
    assert_eq!(applied, 1);
    assert!(effects.is_empty());
    assert!(matches!(&room.dynamic_objects[0], DynamicObject::Destructible(d) if d.destroyed));
    assert!(room.drain_sounds().contains(Sound::Break));

    room.reset();
    assert!(matches!(&room.dynamic_objects[0], DynamicObject::Destructible(d) if !d.destroyed));
    assert_eq!(room.walls.count(), 20);
}

#[test]
fn checkpoint_activation_is_exclusive() {
    let mut room = floor_room();
    room.add_object(2, 8, 'C');
    room.add_object(12, 8, 'C');
    let mut effects = vec![Effect::ActivateCheckpoint { index: 1 }];
    apply_effects(&mut room, None, &mut effects);
    assert!(!room.checkpoints[0].active && room.checkpoints[1].active);
    let mut effects = vec![Effect::ActivateCheckpoint { index: 0 }, Effect::ActivateCheckpoint { index: 7 }];
    assert_eq!(apply_effects(&mut room, None, &mut effects), 1);
    assert!(room.checkpoints[0].active && !room.checkpoints[1].active);
}

#[test]
fn effects_for_missing_targets_are_skipped() {
    let mut room = floor_room();
    let mut effects = vec![
        Effect::Damage { target: EntityRef::Enemy(3), amount: 1, knockback: Vec2::zero() },
        Effect::Damage { target: EntityRef::Player, amount: 1, knockback: Vec2::zero() },
        Effect::SpringBounce { target: EntityRef::Device(0) },
        Effect::Carry { target: EntityRef::Player, velocity: Vec2::new(2.0, 0.0) },
    ];
    assert_eq!(apply_effects(&mut room, None, &mut effects), 0);
}

#[test]
fn shooting_a_block_breaks_it() {
    let mut room = floor_room();
    room.add_object(8, 8, 'D');
    let config = room.config().clone();
    let mut player = Player::new(&config, 100.0, 260.0);
    player.abilities.insert(Ability::Gun);
    player.request_shoot();
    for _ in 0..20 {
        tick(&mut room, &mut player);
    }
    assert!(matches!(&room.dynamic_objects[0], DynamicObject::Destructible(d) if d.destroyed));
    assert!(room.drain_sounds().contains(Sound::Break));
    assert!(player.alive());
}

#[test]
fn landing_on_a_spring_launches_and_animates_it() {
    let mut room = floor_room();
    room.add_object(5, 9, '^');
    let config = room.config().clone();
    let mut player = Player::new(&config, 164.0, 200.0);
    let mut launched = false;
    for _ in 0..20 {
        tick(&mut room, &mut player);
        launched |= player.body().vel.y < -config.spring_launch_velocity * 0.5;
    }
    assert!(launched);
    assert!(room.drain_sounds().contains(Sound::Spring));
}

#[test]
fn cannon_fire_kills_the_player() {
    let mut room = floor_room();
    room.add_object(1, 9, '>');
    let config = room.config().clone();
    let mut player = Player::new(&config, 200.0, 260.0);
    for _ in 0..crate::systems::entities::CANNON_INTERVAL + 30 {
        tick(&mut room, &mut player);
    }
    assert!(!player.alive());
    assert!(player.drain_sounds().contains(Sound::Die));
}

#[test]
fn damage_reaches_chasers_inside_spawner_lists() {
    let mut room = Room::new(20, 15);
    let config = room.config().clone();
    let mut spawner = Enemy::spawner(&config, 200.0, 100.0);
    spawner.projectiles.push(EnemyProjectile::Chaser(Box::new(Enemy::chaser(&config, 260.0, 100.0))));
    room.spawn_enemy(spawner);
    let target = EntityRef::EnemyProjectile { enemy: 0, index: 0 };
    let mut effects = vec![Effect::Damage { target, amount: 5, knockback: Vec2::zero() }];
    assert_eq!(apply_effects(&mut room, None, &mut effects), 1);
    assert!(matches!(&room.enemies[0].projectiles[0], EnemyProjectile::Chaser(c) if !c.alive()));
}

#[test]
fn identical_rooms_stay_identical() {
    let map = "\
..........
..c...z...
WWWWWWWWWW";
    let mut a = Room::new(10, 3);
    let mut b = Room::new(10, 3);
    a.load_tilemap(map);
    b.load_tilemap(map);
    let mut hit = vec![Effect::Damage { target: EntityRef::Enemy(0), amount: 1, knockback: Vec2::new(1.0, -1.0) }];
    apply_effects(&mut a, None, &mut hit.clone());
    apply_effects(&mut b, None, &mut hit);
    for _ in 0..60 {
        a.update(None);
        b.update(None);
    }
    let rects = |room: &Room| -> Vec<_> {
        room.enemies.iter().flat_map(|e| std::iter::once(e.rect()).chain(e.projectiles.iter().map(|p| p.rect()))).collect()
    };
    assert_eq!(rects(&a), rects(&b));
    assert_eq!(a.frame(), 60);
}

#[test]
fn perf_metrics_are_opt_in() {
    let mut room = floor_room();
    room.add_object(5, 9, 'c');
    room.update(None);
    assert_eq!(room.perf_stats().query_calls(), 0);

    room.enable_perf_metrics(true);
    room.update(None);
    let stats = room.perf_stats();
    assert!(stats.query_calls() > 0);
    assert_eq!(stats.enemy_count(), 1);

    room.enable_perf_metrics(false);
    assert_eq!(room.perf_stats().query_calls(), 0);
}
