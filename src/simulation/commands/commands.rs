use crate::core::Rect;
use crate::systems::entities::{tile_rect, Device, DynamicObject};

use super::init::{refresh_autotile, refresh_ladders, refresh_water};
use super::Room;

/// Editor removal. Everything whose rectangle overlaps the area goes; list
/// indices after the removed entries shift, so this never runs mid-tick.
pub(super) fn remove_object(room: &mut Room, col: i32, row: i32, width: u32, height: u32) -> bool {
    let width = width.max(1);
    let height = height.max(1);
    let area = tile_rect(&room.config, col, row, width as f32, height as f32);
    let hit = |rect: &Rect| rect.overlaps(&area);
    let mut removed = 0usize;

    for r in row..row + height as i32 {
        for c in col..col + width as i32 {
            if room.walls.remove(c, r).is_some() {
                refresh_autotile(room, c, r);
                removed += 1;
            }
        }
    }

    removed += retain_count(&mut room.hazards, |h| !hit(&h.rect));
    removed += retain_count(&mut room.checkpoints, |cp| !hit(&cp.rect));
    removed += retain_count(&mut room.powerups, |p| !hit(&p.rect));

    let ladders = retain_count(&mut room.ladders, |l| !hit(&l.rect));
    if ladders > 0 {
        refresh_ladders(room);
    }
    let water = retain_count(&mut room.water, |w| !hit(&w.rect));
    if water > 0 {
        refresh_water(room);
    }
    removed += ladders + water;

    removed += retain_count(&mut room.dynamic_objects, |o: &DynamicObject| !o.rect().map_or(false, |r| hit(&r)));
    removed += retain_count(&mut room.devices, |d: &Device| !d.rect().map_or(false, |r| hit(&r)));
    removed += retain_count(&mut room.enemies, |e| !hit(&e.rect()));
    if room.boss.as_ref().map_or(false, |b| hit(&b.rect())) {
        room.boss = None;
        removed += 1;
    }

    if removed > 0 {
        log::debug!("removed {} objects at ({}, {}) {}x{}", removed, col, row, width, height);
    }
    removed > 0
}

fn retain_count<T>(list: &mut Vec<T>, keep: impl FnMut(&T) -> bool) -> usize {
    let before = list.len();
    list.retain(keep);
    before - list.len()
}
