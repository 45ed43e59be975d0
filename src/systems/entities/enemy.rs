//! Enemies: one creature body plus a behaviour tag and the projectiles it owns.

use crate::core::{random_range, Animation, Rect, Sound, SoundSet, Vec2};
use crate::domain::{CollisionGroup, Facing, PhysicsConfig};
use crate::systems::physics::{
    Body, BodyHooks, Capabilities, Collider, Contact, EntityRef, StepContext, CAP_DAMAGEABLE, CAP_HARMFUL,
    CAP_HAZARD, CAP_KNOCKBACK,
};

use super::creature::Creature;
use super::debris::Gib;
use super::projectile::Bullet;

const ENEMY_CAPS: Capabilities = CAP_DAMAGEABLE | CAP_KNOCKBACK | CAP_HARMFUL;
pub const MAX_CHASERS: usize = 3;
pub const SPAWN_INTERVAL: u32 = 60;
pub const ZOMBIE_COOLDOWN: u32 = 30;

/// Behaviour and per-kind state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyKind {
    /// Patrols, turning at walls and ledges.
    Crawler { speed: f32 },
    /// Walks and shoots along its line of sight.
    Zombie { speed: f32, cooldown: u32 },
    /// Crawls along walls by rotating its velocity on every contact.
    Flyer,
    /// Floats in place and releases chasers.
    Spawner { cooldown: u32 },
    /// Homes on the player through walls.
    Chaser { speed: f32 },
    /// Charges the player once it sees them.
    Charger { goal: f32 },
}

impl EnemyKind {
    fn action(&self) -> &'static str {
        match self {
            EnemyKind::Crawler { .. } => "crawler",
            EnemyKind::Zombie { .. } => "zombie",
            EnemyKind::Flyer => "flyer",
            EnemyKind::Spawner { .. } => "spawner",
            EnemyKind::Chaser { .. } => "chaser",
            EnemyKind::Charger { .. } => "charger",
        }
    }
}

/// Enemies keep their speed in the air and on the ground alike.
impl BodyHooks for EnemyKind {
    fn apply_friction(&mut self, _body: &mut Body) {}
}

#[derive(Clone, Debug)]
pub enum EnemyProjectile {
    Bullet(Bullet),
    /// Crawler remains. Harmful to the touch, pass through everything else.
    Shrapnel(Gib),
    Chaser(Box<Enemy>),
}

impl EnemyProjectile {
    fn update(&mut self, ctx: &mut StepContext<'_>, me: EntityRef) {
        match self {
            EnemyProjectile::Bullet(b) => b.update(ctx, me),
            EnemyProjectile::Shrapnel(g) => g.update(ctx),
            EnemyProjectile::Chaser(c) => c.update(ctx, me),
        }
    }

    fn is_finished(&self) -> bool {
        match self {
            EnemyProjectile::Bullet(b) => b.is_finished(),
            EnemyProjectile::Shrapnel(g) => g.is_finished(),
            EnemyProjectile::Chaser(c) => !c.alive() && c.creature.gibs.is_empty(),
        }
    }

    pub fn rect(&self) -> Rect {
        match self {
            EnemyProjectile::Bullet(b) => b.rect(),
            EnemyProjectile::Shrapnel(g) => g.body.rect(),
            EnemyProjectile::Chaser(c) => c.rect(),
        }
    }

    pub fn body(&self) -> &Body {
        match self {
            EnemyProjectile::Bullet(b) => &b.body,
            EnemyProjectile::Shrapnel(g) => &g.body,
            EnemyProjectile::Chaser(c) => &c.creature.body,
        }
    }

    fn body_mut(&mut self) -> &mut Body {
        match self {
            EnemyProjectile::Bullet(b) => &mut b.body,
            EnemyProjectile::Shrapnel(g) => &mut g.body,
            EnemyProjectile::Chaser(c) => &mut c.creature.body,
        }
    }
}

impl Collider for EnemyProjectile {
    fn contact(&self, entity: EntityRef) -> Option<Contact> {
        match self {
            EnemyProjectile::Bullet(b) => b.contact(entity),
            EnemyProjectile::Shrapnel(g) => g.contact(entity),
            EnemyProjectile::Chaser(c) => c.contact(entity),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub creature: Creature,
    pub kind: EnemyKind,
    pub projectiles: Vec<EnemyProjectile>,
    pub facing: Facing,
    pub sees_player: bool,
    pub animation: Animation,
    initial: EnemyKind,
}

impl Enemy {
    fn new(body: Body, health: i32, kind: EnemyKind) -> Self {
        Self {
            creature: Creature::new(body, health),
            kind,
            projectiles: Vec::new(),
            facing: Facing::Right,
            sees_player: false,
            animation: Animation::new(kind.action(), 4, 8, true),
            initial: kind,
        }
    }

    fn body_at(config: &PhysicsConfig, x: f32, y: f32, w: f32, h: f32, group: CollisionGroup) -> Body {
        let s = config.scale;
        Body::new(Rect::new(x, y, w * s, h * s), group).with_caps(ENEMY_CAPS)
    }

    pub fn crawler(config: &PhysicsConfig, x: f32, y: f32) -> Self {
        let body = Self::body_at(config, x, y, 8.0, 8.0, CollisionGroup::Enemies);
        Self::new(body, 1, EnemyKind::Crawler { speed: 0.25 * config.scale })
    }

    pub fn zombie(config: &PhysicsConfig, x: f32, y: f32) -> Self {
        let body = Self::body_at(config, x, y, 8.0, 16.0, CollisionGroup::Enemies);
        Self::new(body, 5, EnemyKind::Zombie { speed: 0.25 * config.scale, cooldown: 0 })
    }

    pub fn flyer(config: &PhysicsConfig, x: f32, y: f32) -> Self {
        let body = Self::body_at(config, x, y, 8.0, 8.0, CollisionGroup::Flyer)
            .with_gravity_scale(0.0)
            .with_velocity(Vec2::new(0.5 * config.scale, 0.0))
            .with_caps(CAP_HARMFUL);
        Self::new(body, 1, EnemyKind::Flyer)
    }

    pub fn spawner(config: &PhysicsConfig, x: f32, y: f32) -> Self {
        let body = Self::body_at(config, x, y, 16.0, 16.0, CollisionGroup::Enemies).with_gravity_scale(0.0);
        Self::new(body, 5, EnemyKind::Spawner { cooldown: 0 })
    }

    pub fn chaser(config: &PhysicsConfig, x: f32, y: f32) -> Self {
        let body = Self::body_at(config, x, y, 8.0, 8.0, CollisionGroup::Chaser).with_gravity_scale(0.0);
        Self::new(body, 1, EnemyKind::Chaser { speed: 0.25 * config.scale })
    }

    pub fn charger(config: &PhysicsConfig, x: f32, y: f32) -> Self {
        let body = Self::body_at(config, x, y, 16.0, 16.0, CollisionGroup::Enemies);
        Self::new(body, 6, EnemyKind::Charger { goal: 0.0 })
    }

    /// Enemy for a tile-map code, standing on the bottom of its cell.
    pub fn from_code(config: &PhysicsConfig, code: char, col: i32, row: i32) -> Option<Self> {
        let constructor: fn(&PhysicsConfig, f32, f32) -> Self = match code {
            'c' => Self::crawler,
            'z' => Self::zombie,
            'f' => Self::flyer,
            's' => Self::spawner,
            'h' => Self::charger,
            _ => return None,
        };
        let t = config.tile_size;
        let mut enemy = constructor(config, col as f32 * t, row as f32 * t);
        let bottom = (row + 1) as f32 * t;
        let spawn = Vec2::new(enemy.creature.body.pos.x, bottom - enemy.creature.body.size.y);
        enemy.creature.body.teleport(spawn);
        enemy.creature.set_spawn(spawn);
        Some(enemy)
    }

    /// Dead body with nothing attached. Holds an enemy's slot while the enemy steps.
    pub fn inert() -> Self {
        let mut enemy = Self::new(Body::default(), 0, EnemyKind::Flyer);
        enemy.creature.alive = false;
        enemy
    }

    pub fn alive(&self) -> bool {
        self.creature.alive
    }

    pub fn rect(&self) -> Rect {
        self.creature.rect()
    }

    pub fn is_vulnerable(&self) -> bool {
        !matches!(self.kind, EnemyKind::Flyer)
    }

    pub fn update(&mut self, ctx: &mut StepContext<'_>, me: EntityRef) {
        let was_alive = self.creature.alive;
        if was_alive {
            self.steer();
        }

        self.creature.step(ctx, me, &mut self.kind);

        if self.creature.alive {
            let body = &self.creature.body;
            if body.collisions.iter().any(|c| c.contact.has(CAP_HAZARD)) {
                let knockback = -body.vel;
                self.hurt(1, knockback, ctx.config(), &mut *ctx.rng);
            }
        }

        if self.creature.alive {
            self.react(ctx, me);
        } else if was_alive {
            self.on_death(ctx.config(), &mut *ctx.rng);
        }

        let owner = match me {
            EntityRef::Enemy(i) => Some(i),
            _ => None,
        };
        for (index, projectile) in self.projectiles.iter_mut().enumerate() {
            let slot = owner.map_or(EntityRef::Detached, |enemy| EntityRef::EnemyProjectile { enemy, index });
            projectile.update(ctx, slot);
        }
        self.projectiles.retain(|p| !p.is_finished());

        self.animate();
    }

    /// Velocity the kind asks for before moving.
    fn steer(&mut self) {
        let body = &mut self.creature.body;
        match self.kind {
            EnemyKind::Crawler { speed } => body.vel.x = speed,
            EnemyKind::Zombie { speed, .. } => {
                let shooting = self.projectiles.iter().any(|p| matches!(p, EnemyProjectile::Bullet(b) if b.alive));
                body.vel.x = if body.ground_collision && !shooting { speed } else { 0.0 };
            }
            _ => {}
        }
    }

    /// Kind logic that reads this tick's resolution.
    fn react(&mut self, ctx: &mut StepContext<'_>, me: EntityRef) {
        match self.kind {
            EnemyKind::Crawler { speed } => {
                if self.creature.body.wall_collision || self.on_edge(ctx) {
                    self.kind = EnemyKind::Crawler { speed: -speed };
                }
            }
            EnemyKind::Zombie { speed, cooldown } => {
                let mut speed = speed;
                if self.creature.body.wall_collision || self.on_edge(ctx) {
                    speed = -speed;
                    self.facing = self.facing.flip();
                }
                let cooldown = self.zombie_fire(ctx, me, cooldown);
                self.kind = EnemyKind::Zombie { speed, cooldown };
            }
            EnemyKind::Flyer => {
                let body = &mut self.creature.body;
                if body.wall_collision {
                    body.vel.y = body.vel.x;
                    body.vel.x = 0.0;
                }
                if body.ground_collision || body.ceiling_collision {
                    body.vel.x = -body.vel.y;
                    body.vel.y = 0.0;
                }
            }
            EnemyKind::Spawner { cooldown } => {
                let live = self
                    .projectiles
                    .iter()
                    .filter(|p| matches!(p, EnemyProjectile::Chaser(c) if c.alive()))
                    .count();
                let mut cooldown = cooldown;
                if live < MAX_CHASERS && cooldown == SPAWN_INTERVAL {
                    let rect = self.rect();
                    let chaser = Enemy::chaser(ctx.config(), rect.left() + 0.25 * rect.size().x, rect.top() + 0.25 * rect.size().y);
                    self.projectiles.push(EnemyProjectile::Chaser(Box::new(chaser)));
                    cooldown = 0;
                }
                if cooldown < SPAWN_INTERVAL {
                    cooldown += 1;
                }
                self.kind = EnemyKind::Spawner { cooldown };
            }
            EnemyKind::Chaser { .. } => {
                let scale = ctx.config().scale;
                let speed = if self.creature.body.collisions.is_empty() { 0.25 * scale } else { 0.1 * scale };
                self.kind = EnemyKind::Chaser { speed };
                self.chase(ctx, speed);
            }
            EnemyKind::Charger { goal } => {
                let mut goal = goal;
                let speed = ctx.config().scale;
                if let Some(dir) = self.see_player(ctx, me) {
                    self.facing = dir;
                    goal = dir.sign() * speed;
                }
                if self.creature.body.wall_collision {
                    goal = 0.0;
                }
                if goal != 0.0 {
                    let body = &mut self.creature.body;
                    let acceleration = body.friction;
                    if goal < body.vel.x {
                        body.vel.x = (body.vel.x - acceleration).max(goal);
                    } else if goal > body.vel.x {
                        body.vel.x = (body.vel.x + acceleration).min(goal);
                    }
                }
                self.kind = EnemyKind::Charger { goal };
            }
        }
    }

    fn zombie_fire(&mut self, ctx: &mut StepContext<'_>, me: EntityRef, cooldown: u32) -> u32 {
        let dir = self.see_player(ctx, me);
        match dir {
            Some(dir) if cooldown == 0 => {
                self.facing = dir;
                let scale = ctx.config().scale;
                let rect = self.rect();
                let size = 2.0 * scale;
                let muzzle = Vec2::new(rect.center().x + dir.sign() * 8.0 * scale, rect.top() + 2.0 * scale);
                let vel = Vec2::new(dir.sign() * 2.0 * scale, 0.0);
                let bullet = Bullet::new(me, muzzle, vel, CollisionGroup::EnemyBullets, -1, size);
                self.projectiles.push(EnemyProjectile::Bullet(bullet));
                self.creature.body.sounds.insert(Sound::Shoot);
                ZOMBIE_COOLDOWN
            }
            _ => cooldown.saturating_sub(1),
        }
    }

    /// Horizontal line of sight to the player at body height. Any wall-group
    /// contact on the probe blocks it.
    pub fn see_player(&mut self, ctx: &StepContext<'_>, me: EntityRef) -> Option<Facing> {
        self.sees_player = false;
        let player = ctx.world.player.filter(|p| p.alive())?;
        let own = self.rect();
        let target = player.rect();
        let dir = Facing::from_sign(target.left() - own.left())?;

        let gap = (own.left() - target.left()).abs();
        let tile = ctx.config().tile_size;
        let probe = match dir {
            Facing::Right => Rect::new(own.left(), own.center().y, gap + target.size().x, tile),
            Facing::Left => Rect::new(own.left() - gap, own.center().y, gap, tile),
        };
        if !probe.overlaps(&target) {
            return None;
        }
        let blocked = ctx
            .query(&probe, me, None)
            .iter()
            .any(|c| c.entity != EntityRef::Player && c.group == CollisionGroup::Walls);
        self.sees_player = !blocked;
        (!blocked).then_some(dir)
    }

    fn chase(&mut self, ctx: &StepContext<'_>, speed: f32) {
        let body = &mut self.creature.body;
        let Some(player) = ctx.world.player.filter(|p| p.alive()) else {
            body.vel = Vec2::zero();
            return;
        };
        let offset = player.body().pos - body.pos;
        let distance = offset.length();
        body.vel = if distance > 0.0 { offset * (speed / distance) } else { Vec2::zero() };
    }

    /// Grounded and about to walk off: no wall under the leading bottom corner.
    fn on_edge(&self, ctx: &StepContext<'_>) -> bool {
        let body = &self.creature.body;
        if !body.ground_collision {
            return false;
        }
        let rect = body.rect();
        let x = if body.vel.x > 0.0 {
            rect.right()
        } else if body.vel.x < 0.0 {
            rect.left() - 1.0
        } else {
            return false;
        };
        !ctx.world.room.wall_at_point(x, rect.bottom())
    }

    /// Damage plus knockback. Invulnerable kinds ignore it.
    pub fn hurt(&mut self, amount: i32, knockback: Vec2, config: &PhysicsConfig, rng: &mut u32) {
        if !self.is_vulnerable() {
            return;
        }
        if self.creature.damage(amount, knockback) {
            self.on_death(config, rng);
        }
    }

    fn on_death(&mut self, config: &PhysicsConfig, rng: &mut u32) {
        log::debug!("{:?} died at {:?}", self.kind, self.creature.body.pos);
        self.creature.body.sounds.insert(Sound::Die);
        match self.kind {
            EnemyKind::Crawler { .. } => {
                let s = config.scale;
                let pos = self.creature.body.pos;
                for (dx, dy) in [(-1.25, -3.0), (-0.75, -3.5), (0.0, -3.75), (0.75, -3.5), (1.25, -3.0)] {
                    let vel = Vec2::new(random_range(rng, dx - 1.0, dx + 1.0) * s, dy * s);
                    let size = 8.0 * s;
                    let mut shrapnel = Gib::new(config, pos + Vec2::new(size * 0.5, size * 0.5), vel);
                    shrapnel.body.size = Vec2::new(size, size);
                    shrapnel.body.teleport(pos);
                    shrapnel.body.caps = CAP_HARMFUL;
                    self.projectiles.push(EnemyProjectile::Shrapnel(shrapnel));
                }
            }
            EnemyKind::Zombie { .. } => self.creature.spawn_gibs(config, rng, 3),
            EnemyKind::Charger { .. } => self.creature.spawn_gibs(config, rng, 2),
            EnemyKind::Flyer | EnemyKind::Spawner { .. } | EnemyKind::Chaser { .. } => {}
        }
    }

    fn animate(&mut self) {
        let action = if !self.creature.alive {
            "die"
        } else {
            match self.kind {
                EnemyKind::Charger { goal } if goal != 0.0 => "charge",
                EnemyKind::Zombie { .. } if self.creature.body.vel.x == 0.0 => "idle",
                EnemyKind::Zombie { .. } => "walk",
                _ => "idle",
            }
        };
        self.animation.play(action);
        self.animation.advance();
    }

    /// Sounds of the enemy and everything it owns.
    pub fn drain_sounds(&mut self) -> SoundSet {
        let mut sounds = self.creature.body.sounds.drain();
        for projectile in self.projectiles.iter_mut() {
            sounds.merge(projectile.body_mut().sounds.drain());
            if let EnemyProjectile::Chaser(chaser) = projectile {
                sounds.merge(chaser.drain_sounds());
            }
        }
        sounds
    }

    pub fn reset(&mut self) {
        self.creature.reset();
        self.kind = self.initial;
        self.projectiles.clear();
        self.facing = Facing::Right;
        self.sees_player = false;
        self.animation = Animation::new(self.kind.action(), 4, 8, true);
    }
}

impl Collider for Enemy {
    fn contact(&self, entity: EntityRef) -> Option<Contact> {
        self.creature.contact(entity)
    }
}
