use std::mem;

use crate::systems::entities::{Device, DynamicObject, Enemy, Player};
use crate::systems::physics::{
    reset_query_perf_counters, take_query_perf_counters, Effect, EntityRef, StepContext, WorldView,
};

use super::effects::apply_effects;
use super::{PerfTimer, Room};

/// Runs `turn` with the room as a read-only world. The room's RNG is lent
/// out as a copy and written back afterwards.
fn with_context<R>(
    room: &mut Room,
    player: Option<&Player>,
    effects: &mut Vec<Effect>,
    turn: impl FnOnce(&mut StepContext<'_>) -> R,
) -> R {
    let mut rng = room.rng_state;
    let result = {
        let mut ctx = StepContext::new(WorldView::new(room, player), effects, &mut rng);
        turn(&mut ctx)
    };
    room.rng_state = rng;
    result
}

/// One tick of everything but the player: enemies, checkpoints, powerups,
/// dynamic objects, devices, water, boss. Every entity is taken out of its
/// slot for its turn and put back before its effects are applied.
pub(super) fn update(room: &mut Room, mut player: Option<&mut Player>) {
    let perf_on = room.perf_enabled;
    if perf_on {
        room.perf_stats.reset();
        reset_query_perf_counters();
    }
    let step_timer = PerfTimer::start_if(perf_on);
    let mut phase = PerfTimer::start_if(perf_on);
    let mut effects = Vec::new();
    let mut applied = 0usize;

    for i in 0..room.enemies.len() {
        let mut enemy = mem::replace(&mut room.enemies[i], Enemy::inert());
        with_context(room, player.as_deref(), &mut effects, |ctx| enemy.update(ctx, EntityRef::Enemy(i)));
        room.enemies[i] = enemy;
        applied += apply_effects(room, player.as_deref_mut(), &mut effects);
    }
    if let Some(t) = phase.as_mut() {
        room.perf_stats.enemies_ms = t.lap_ms();
    }

    for checkpoint in room.checkpoints.iter_mut() {
        checkpoint.update();
    }
    let abilities = player.as_deref().map(|p| p.abilities).unwrap_or_default();
    for powerup in room.powerups.iter_mut() {
        powerup.update(abilities.contains(powerup.ability));
    }

    for i in 0..room.dynamic_objects.len() {
        let mut object = mem::replace(&mut room.dynamic_objects[i], DynamicObject::Vacant);
        with_context(room, player.as_deref(), &mut effects, |ctx| object.update(ctx, EntityRef::Dynamic(i)));
        room.dynamic_objects[i] = object;
        applied += apply_effects(room, player.as_deref_mut(), &mut effects);
    }
    if let Some(t) = phase.as_mut() {
        room.perf_stats.objects_ms = t.lap_ms();
    }

    for i in 0..room.devices.len() {
        let mut device = mem::replace(&mut room.devices[i], Device::Vacant);
        with_context(room, player.as_deref(), &mut effects, |ctx| device.update(ctx, EntityRef::Device(i)));
        room.devices[i] = device;
        applied += apply_effects(room, player.as_deref_mut(), &mut effects);
    }
    if let Some(t) = phase.as_mut() {
        room.perf_stats.devices_ms = t.lap_ms();
    }

    for water in room.water.iter_mut() {
        water.update();
    }

    if let Some(mut boss) = room.boss.take() {
        with_context(room, player.as_deref(), &mut effects, |ctx| boss.update(ctx));
        room.boss = Some(boss);
        applied += apply_effects(room, player.as_deref_mut(), &mut effects);
    }
    if let Some(t) = phase.as_mut() {
        room.perf_stats.boss_ms = t.lap_ms();
    }

    room.frame += 1;

    if let Some(t) = step_timer {
        let stats = &mut room.perf_stats;
        stats.step_ms = t.elapsed_ms();
        stats.add_queries(take_query_perf_counters());
        stats.effects_applied = applied as u32;
        stats.enemy_count = room.enemies.iter().filter(|e| e.alive()).count() as u32;
        stats.projectile_count = room.enemies.iter().map(|e| e.projectiles.len()).sum::<usize>() as u32
            + room.devices.iter().map(|d| d.projectiles().len()).sum::<usize>() as u32;
        stats.object_count = (room.dynamic_objects.len() + room.devices.len()) as u32;
    }
}

/// The player's turn, after the room's. Nothing else moves meanwhile, so the
/// player is resolved against a world that already took this tick's step.
pub(super) fn update_player(room: &mut Room, player: &mut Player) {
    let timer = PerfTimer::start_if(room.perf_enabled);
    let mut effects = Vec::new();
    with_context(room, None, &mut effects, |ctx| player.update(ctx));
    let applied = apply_effects(room, Some(&mut *player), &mut effects);

    if let Some(t) = timer {
        let stats = &mut room.perf_stats;
        stats.player_ms = t.elapsed_ms();
        stats.step_ms += stats.player_ms;
        stats.add_queries(take_query_perf_counters());
        stats.effects_applied += applied as u32;
        stats.projectile_count += player.bullets.len() as u32;
    }
}
