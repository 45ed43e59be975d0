//! The player: a creature driven by control requests instead of AI.
//!
//! Requests (`request_run`, `request_jump`, `release_jump`, `request_shoot`)
//! are issued by the host before the tick; `update` then moves the body and
//! applies everything the room does to the player: harm, water, checkpoints
//! and powerups.

use crate::core::{Animation, Rect, Sound, SoundSet, Vec2};
use crate::domain::{Ability, AbilitySet, CollisionGroup, Facing, PhysicsConfig, Save};
use crate::systems::physics::{
    Body, BodyHooks, Collider, Contact, Effect, EntityRef, StepContext, CAP_DAMAGEABLE, CAP_HARMFUL,
};

use super::creature::Creature;
use super::projectile::Bullet;

pub const PLAYER_GIBS: usize = 5;
pub const GUN_COOLDOWN: u32 = 12;
pub const FULL_AUTO_COOLDOWN: u32 = 6;
/// Maximum deviation of a shot with the spread upgrade, in degrees.
const SPREAD_DEGREES: f32 = 10.0;

/// Speeds and impulses, all derived from the config scale.
#[derive(Clone, Copy, Debug)]
struct Tuning {
    walk: f32,
    run: f32,
    water: f32,
    accel_ground: f32,
    accel_air: f32,
    jump: f32,
    double_jump: f32,
    wall_jump: f32,
    wall_slide: f32,
    bullet_speed: f32,
    bullet_size: f32,
    ladder_friction: f32,
}

impl Tuning {
    fn new(config: &PhysicsConfig) -> Self {
        let s = config.scale;
        Self {
            walk: 0.5 * s,
            run: s,
            water: 0.5 * s,
            accel_ground: 0.25 * s,
            accel_air: 0.125 * s,
            jump: -2.25 * s,
            double_jump: -2.5 * s,
            wall_jump: -2.25 * s,
            wall_slide: 0.25 * s,
            bullet_speed: 4.0 * s,
            bullet_size: 2.0 * s,
            ladder_friction: 0.125 * s,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct PlayerMotion {
    tuning: Tuning,
    moving: bool,
    jump_held: bool,
    jump_count: u8,
    hugging: bool,
    wall_jump: bool,
}

impl BodyHooks for PlayerMotion {
    /// No braking while the player is steering.
    fn apply_friction(&mut self, body: &mut Body) {
        if !self.moving {
            body.apply_friction();
        }
    }

    fn apply_gravity(&mut self, body: &mut Body, gravity: f32) {
        self.hugging = self.wall_jump && body.wall_collision && !body.ground_collision && body.vel.y > 0.0;
        if self.hugging {
            body.vel.y = (body.vel.y + gravity * 0.5).min(self.tuning.wall_slide);
        } else if self.jump_held && body.vel.y < 0.0 {
            body.vel.y += gravity * 0.5;
        } else {
            body.apply_gravity(gravity);
        }
    }

    /// Top rungs of ladders hold the player up when falling onto them.
    fn on_tick(&mut self, body: &mut Body, ctx: &mut StepContext<'_>) {
        if body.ground_collision || body.vel.y < 0.0 {
            return;
        }
        let rect = body.rect();
        let prev_bottom = body.prev_pos.y + body.size.y;
        let landing = ctx.world.room.ladders.iter().filter(|l| l.top).find(|l| {
            rect.right() > l.rect.left()
                && rect.left() < l.rect.right()
                && prev_bottom <= l.rect.top()
                && rect.bottom() > l.rect.top()
        });
        if let Some(ladder) = landing {
            body.pos.y = ladder.rect.top() - body.size.y;
            body.vel.y = 0.0;
            body.ground_collision = true;
            body.friction = self.tuning.ladder_friction;
        }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub creature: Creature,
    pub facing: Facing,
    pub abilities: AbilitySet,
    pub bullets: Vec<Bullet>,
    pub save: Save,
    pub room_x: i32,
    pub room_y: i32,
    pub submerged: bool,
    pub animation: Animation,
    motion: PlayerMotion,
    shoot_requested: bool,
    cooldown: u32,
}

impl Player {
    pub fn new(config: &PhysicsConfig, x: f32, y: f32) -> Self {
        let s = config.scale;
        let body = Body::new(Rect::new(x, y, 6.0 * s, 15.0 * s), CollisionGroup::Player)
            .with_friction(0.125 * s)
            .with_caps(CAP_DAMAGEABLE);
        let tuning = Tuning::new(config);
        Self {
            creature: Creature::new(body, 1),
            facing: Facing::Right,
            abilities: AbilitySet::default(),
            bullets: Vec::new(),
            save: Save::new(x, y, 0, 0, Facing::Right, AbilitySet::default()),
            room_x: 0,
            room_y: 0,
            submerged: false,
            animation: Animation::new("idle", 4, 8, true),
            motion: PlayerMotion { tuning, moving: false, jump_held: false, jump_count: 0, hugging: false, wall_jump: false },
            shoot_requested: false,
            cooldown: 0,
        }
    }

    pub fn alive(&self) -> bool {
        self.creature.alive
    }

    pub fn body(&self) -> &Body {
        &self.creature.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.creature.body
    }

    pub fn rect(&self) -> Rect {
        self.creature.rect()
    }

    /// Accelerates towards walking (or running) speed in the sign of `dir`; 0 lets friction act.
    pub fn request_run(&mut self, dir: f32) {
        self.motion.moving = dir != 0.0;
        if !self.creature.alive {
            return;
        }
        let tuning = self.motion.tuning;
        let speed = if self.abilities.contains(Ability::Run) { tuning.run } else { tuning.walk };
        let body = &mut self.creature.body;
        let acceleration = if body.ground_collision { tuning.accel_ground } else { tuning.accel_air };
        if dir > 0.0 {
            body.vel.x = (body.vel.x + acceleration).min(speed).max(body.vel.x.min(speed));
        } else if dir < 0.0 {
            body.vel.x = (body.vel.x - acceleration).max(-speed).min(body.vel.x.max(-speed));
        }
        if let Some(facing) = Facing::from_sign(dir) {
            self.facing = facing;
        }
    }

    /// Jumps from the ground, off a wall, or in the air with the double jump.
    /// Holding the button keeps the jump high; a new jump needs a release first.
    pub fn request_jump(&mut self) {
        if self.motion.jump_held || !self.creature.alive {
            return;
        }
        self.motion.jump_held = true;
        let tuning = self.motion.tuning;
        let body = &mut self.creature.body;
        if body.ground_collision {
            body.vel.y = tuning.jump;
            self.motion.jump_count = 1;
        } else if self.motion.hugging && self.abilities.contains(Ability::WallJump) {
            self.facing = self.facing.flip();
            let speed = if self.abilities.contains(Ability::Run) { tuning.run } else { tuning.walk };
            body.vel.x = self.facing.sign() * speed;
            body.vel.y = tuning.wall_jump;
            self.motion.hugging = false;
        } else if self.abilities.contains(Ability::DoubleJump) && self.motion.jump_count < 2 {
            body.vel.y = tuning.double_jump;
            self.motion.jump_count = 2;
        }
    }

    pub fn release_jump(&mut self) {
        self.motion.jump_held = false;
    }

    /// Fires on the next update if the gun is owned and cooled down.
    pub fn request_shoot(&mut self) {
        self.shoot_requested = true;
    }

    pub fn update(&mut self, ctx: &mut StepContext<'_>) {
        self.motion.wall_jump = self.abilities.contains(Ability::WallJump);
        if std::mem::take(&mut self.shoot_requested) {
            self.shoot(ctx);
        }

        let was_alive = self.creature.alive;
        self.creature.step(ctx, EntityRef::Player, &mut self.motion);
        if was_alive && !self.creature.alive {
            self.on_death(ctx.config(), &mut *ctx.rng);
        }

        if self.creature.alive {
            self.apply_harm(ctx);
            self.apply_water(ctx);
            self.apply_saving(ctx);
            self.apply_powerups(ctx);
            if self.creature.body.ground_collision {
                self.motion.jump_count = 0;
            }
        }

        for (index, bullet) in self.bullets.iter_mut().enumerate() {
            bullet.update(ctx, EntityRef::PlayerProjectile(index));
        }
        self.bullets.retain(|b| !b.is_finished());

        self.cooldown = self.cooldown.saturating_sub(1);
        self.animate();
    }

    fn shoot(&mut self, ctx: &mut StepContext<'_>) {
        if !self.creature.alive || self.cooldown > 0 || !self.abilities.contains(Ability::Gun) {
            return;
        }
        let tuning = self.motion.tuning;
        let spread = if self.abilities.contains(Ability::Spread) {
            ctx.random(-SPREAD_DEGREES, SPREAD_DEGREES).to_radians()
        } else {
            0.0
        };
        let vel = Vec2::new(self.facing.sign() * spread.cos(), spread.sin()) * tuning.bullet_speed;
        let rect = self.rect();
        let muzzle = Vec2::new(rect.center().x + self.facing.sign() * rect.size().x * 0.5, rect.top() + rect.size().y * 0.4);
        self.bullets.push(Bullet::new(EntityRef::Player, muzzle, vel, CollisionGroup::Bullets, -1, tuning.bullet_size));
        self.creature.body.sounds.insert(Sound::Shoot);
        self.cooldown = if self.abilities.contains(Ability::FullAuto) { FULL_AUTO_COOLDOWN } else { GUN_COOLDOWN };
    }

    /// Anything harmful the player bumped into or overlaps kills them.
    fn apply_harm(&mut self, ctx: &mut StepContext<'_>) {
        let bumped = self.creature.body.collisions.iter().any(|c| c.contact.has(CAP_HARMFUL));
        let touching = || {
            ctx.query(&self.rect(), EntityRef::Player, None)
                .iter()
                .any(|c| c.has(CAP_HARMFUL))
        };
        if bumped || touching() {
            self.die(ctx.config(), &mut *ctx.rng);
        }
    }

    fn apply_water(&mut self, ctx: &mut StepContext<'_>) {
        let rect = self.rect();
        self.submerged = ctx.world.room.water.iter().any(|w| w.rect.overlaps(&rect));
        if !self.submerged {
            return;
        }
        if !self.abilities.contains(Ability::Rebreather) {
            log::info!("player drowned");
            self.die(ctx.config(), &mut *ctx.rng);
            return;
        }
        let limit = self.motion.tuning.water;
        let drag = self.motion.tuning.accel_air;
        let vel = &mut self.creature.body.vel;
        if vel.x > limit {
            vel.x = (vel.x - drag).max(limit);
        } else if vel.x < -limit {
            vel.x = (vel.x + drag).min(-limit);
        }
        if vel.y > limit {
            vel.y = (vel.y - drag).max(limit);
        }
    }

    fn apply_saving(&mut self, ctx: &mut StepContext<'_>) {
        let rect = self.rect();
        let room = ctx.world.room;
        let (room_x, room_y) = room.coords();
        let reached = room.checkpoints.iter().enumerate().find(|(_, cp)| cp.rect.overlaps(&rect));
        if let Some((index, checkpoint)) = reached {
            let spawn = checkpoint.spawn_point(self.creature.body.size);
            self.save = Save::new(spawn.x, spawn.y, room_x, room_y, self.facing, self.abilities);
            if !checkpoint.active {
                log::info!("checkpoint {} in room ({}, {})", index, room_x, room_y);
                self.creature.body.sounds.insert(Sound::Save);
            }
            ctx.emit(Effect::ActivateCheckpoint { index });
        }
    }

    fn apply_powerups(&mut self, ctx: &mut StepContext<'_>) {
        let rect = self.rect();
        for powerup in ctx.world.room.powerups.iter().filter(|p| p.rect.overlaps(&rect)) {
            if self.abilities.insert(powerup.ability) {
                log::info!("unlocked {:?}", powerup.ability);
                self.creature.body.sounds.insert(Sound::Powerup);
            }
        }
    }

    /// Anything that deals damage is lethal to the player.
    pub fn hurt(&mut self, amount: i32, knockback: Vec2, config: &PhysicsConfig, rng: &mut u32) {
        if self.creature.damage(amount, knockback) {
            self.on_death(config, rng);
        }
    }

    pub fn die(&mut self, config: &PhysicsConfig, rng: &mut u32) {
        if self.creature.alive {
            self.creature.die();
            self.on_death(config, rng);
        }
    }

    fn on_death(&mut self, config: &PhysicsConfig, rng: &mut u32) {
        log::info!("player died at {:?}", self.creature.body.pos);
        self.creature.body.sounds.insert(Sound::Die);
        self.creature.spawn_gibs(config, rng, PLAYER_GIBS);
    }

    fn animate(&mut self) {
        let body = &self.creature.body;
        let action = if !self.creature.alive {
            "dead"
        } else if self.motion.hugging {
            "wall"
        } else if !body.ground_collision {
            if body.vel.y < 0.0 {
                "jump"
            } else {
                "fall"
            }
        } else if body.vel.x != 0.0 {
            "run"
        } else {
            "idle"
        };
        self.animation.play(action);
        self.animation.advance();
    }

    /// Leaves the room through an edge, wrapping to the opposite side of the neighbour.
    /// Returns the new room coordinates when it happened.
    pub fn change_room(&mut self, config: &PhysicsConfig) -> Option<(i32, i32)> {
        let width = config.room_pixel_width();
        let height = config.room_pixel_height();
        let center = self.creature.body.center();
        if center.x > 0.0 && center.x < width && center.y > 0.0 && center.y < height {
            return None;
        }
        self.bullets.clear();
        let mut center = center;
        let margin = config.scale;
        if center.x >= width {
            self.room_x += 1;
            center.x = margin;
        } else if center.x <= 0.0 {
            self.room_x -= 1;
            center.x = width - margin;
        }
        if center.y >= height {
            self.room_y += 1;
            center.y = margin;
        } else if center.y <= 0.0 {
            self.room_y -= 1;
            center.y = height - margin;
        }
        let size = self.creature.body.size;
        self.creature.body.teleport(Vec2::new(center.x - size.x * 0.5, center.y - size.y * 0.5));
        Some((self.room_x, self.room_y))
    }

    /// Back to the last save: position, room, facing and abilities.
    pub fn reset(&mut self) {
        let save = self.save;
        self.creature.set_spawn(Vec2::new(save.x, save.y));
        self.creature.reset();
        self.room_x = save.room_x;
        self.room_y = save.room_y;
        self.facing = save.facing;
        self.abilities = save.abilities;
        self.bullets.clear();
        self.submerged = false;
        self.cooldown = 0;
        self.shoot_requested = false;
        self.motion.jump_held = false;
        self.motion.jump_count = 0;
        self.motion.hugging = false;
    }

    pub fn drain_sounds(&mut self) -> SoundSet {
        let mut sounds = self.creature.body.sounds.drain();
        for bullet in self.bullets.iter_mut() {
            sounds.merge(bullet.body.sounds.drain());
        }
        sounds
    }
}

impl Collider for Player {
    fn contact(&self, entity: EntityRef) -> Option<Contact> {
        self.creature.contact(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Room;
    use crate::systems::physics::WorldView;

    fn tick(room: &Room, player: &mut Player) -> Vec<Effect> {
        let mut effects = Vec::new();
        let mut rng = 17;
        let mut ctx = StepContext::new(WorldView::new(room, None), &mut effects, &mut rng);
        player.update(&mut ctx);
        effects
    }

    fn floor_room() -> Room {
        let mut room = Room::new(20, 15);
        for col in 0..20 {
            room.add_object(col, 10, 'W');
        }
        room
    }

    fn grounded_player(room: &Room) -> Player {
        let config = room.config().clone();
        let mut player = Player::new(&config, 100.0, 320.0 - 60.0);
        tick(room, &mut player);
        tick(room, &mut player);
        assert!(player.body().ground_collision);
        player
    }

    #[test]
    fn jump_needs_release() {
        let room = floor_room();
        let mut player = grounded_player(&room);
        player.request_jump();
        assert_eq!(player.body().vel.y, -9.0);
        tick(&room, &mut player);
        assert!(player.body().pos.y < 260.0);
        let vy = player.body().vel.y;
        player.request_jump();
        assert_eq!(player.body().vel.y, vy);
    }

    #[test]
    fn double_jump_once_per_flight() {
        let room = floor_room();
        let mut player = grounded_player(&room);
        player.abilities.insert(Ability::DoubleJump);
        player.request_jump();
        tick(&room, &mut player);
        player.release_jump();
        player.request_jump();
        assert_eq!(player.body().vel.y, -10.0);
        tick(&room, &mut player);
        player.release_jump();
        let vy = player.body().vel.y;
        player.request_jump();
        assert_eq!(player.body().vel.y, vy);
    }

    #[test]
    fn run_speed_caps_at_walk_without_upgrade() {
        let room = floor_room();
        let mut player = grounded_player(&room);
        for _ in 0..10 {
            player.request_run(1.0);
            tick(&room, &mut player);
        }
        assert_eq!(player.body().vel.x, 2.0);
        assert_eq!(player.facing, Facing::Right);
        player.request_run(0.0);
        tick(&room, &mut player);
        assert!(player.body().vel.x < 2.0);
    }

    #[test]
    fn spikes_kill() {
        let mut room = floor_room();
        room.add_object(3, 9, '*');
        let config = room.config().clone();
        let mut player = Player::new(&config, 100.0, 200.0);
        for _ in 0..20 {
            tick(&room, &mut player);
        }
        assert!(!player.alive());
        assert!(player.drain_sounds().contains(Sound::Die));
    }

    #[test]
    fn water_drowns_without_rebreather() {
        let mut room = floor_room();
        room.add_object(3, 9, '~');
        let config = room.config().clone();
        let mut player = Player::new(&config, 100.0, 320.0 - 60.0);
        player.abilities.insert(Ability::Rebreather);
        tick(&room, &mut player);
        assert!(player.alive());
        assert!(player.submerged);

        let mut player = Player::new(&config, 100.0, 320.0 - 60.0);
        tick(&room, &mut player);
        assert!(!player.alive());
    }

    #[test]
    fn checkpoint_saves_and_reset_restores() {
        let mut room = floor_room();
        room.add_object(5, 8, 'C');
        room.add_object(8, 9, '1');
        let config = room.config().clone();
        let mut player = Player::new(&config, 168.0, 320.0 - 60.0);
        let effects = tick(&room, &mut player);
        assert!(effects.contains(&Effect::ActivateCheckpoint { index: 0 }));
        assert_eq!(player.save.x, 176.0 - 12.0);
        assert_eq!(player.save.y, 260.0);

        player.creature.body.teleport(Vec2::new(260.0, 260.0));
        tick(&room, &mut player);
        assert!(player.abilities.contains(Ability::DoubleJump));

        let mut rng = 1;
        player.die(&config, &mut rng);
        player.reset();
        assert!(player.alive());
        assert_eq!(player.body().pos, Vec2::new(164.0, 260.0));
        assert!(!player.abilities.contains(Ability::DoubleJump));
    }

    #[test]
    fn shooting_needs_the_gun_and_cools_down() {
        let room = floor_room();
        let mut player = grounded_player(&room);
        player.request_shoot();
        tick(&room, &mut player);
        assert!(player.bullets.is_empty());

        player.abilities.insert(Ability::Gun);
        player.request_shoot();
        tick(&room, &mut player);
        assert_eq!(player.bullets.len(), 1);
        assert_eq!(player.bullets[0].body.vel, Vec2::new(16.0, 0.0));
        player.request_shoot();
        tick(&room, &mut player);
        assert_eq!(player.bullets.len(), 1);
    }

    #[test]
    fn leaving_right_edge_enters_next_room() {
        let config = PhysicsConfig::default();
        let mut player = Player::new(&config, 640.0 - 4.0, 100.0);
        assert_eq!(player.change_room(&config), Some((1, 0)));
        assert_eq!(player.body().center().x, 4.0);
        assert_eq!(player.change_room(&config), None);
    }
}
