use wasm_bindgen::prelude::*;

/// Timings and counters of the last tick. Zeros while metrics are off.
#[wasm_bindgen]
#[derive(Clone, Debug, Default)]
pub struct PerfStats {
    pub(crate) step_ms: f64,
    pub(crate) enemies_ms: f64,
    pub(crate) objects_ms: f64,
    pub(crate) devices_ms: f64,
    pub(crate) boss_ms: f64,
    pub(crate) player_ms: f64,
    pub(crate) query_calls: u32,
    pub(crate) query_contacts: u32,
    pub(crate) effects_applied: u32,
    pub(crate) enemy_count: u32,
    pub(crate) projectile_count: u32,
    pub(crate) object_count: u32,
}

impl PerfStats {
    pub(crate) fn reset(&mut self) {
        *self = PerfStats::default();
    }

    pub(crate) fn add_queries(&mut self, (calls, contacts): (u64, u64)) {
        self.query_calls = self.query_calls.saturating_add(calls.min(u32::MAX as u64) as u32);
        self.query_contacts = self.query_contacts.saturating_add(contacts.min(u32::MAX as u64) as u32);
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    #[wasm_bindgen(getter)]
    pub fn enemies_ms(&self) -> f64 { self.enemies_ms }
    #[wasm_bindgen(getter)]
    pub fn objects_ms(&self) -> f64 { self.objects_ms }
    #[wasm_bindgen(getter)]
    pub fn devices_ms(&self) -> f64 { self.devices_ms }
    #[wasm_bindgen(getter)]
    pub fn boss_ms(&self) -> f64 { self.boss_ms }
    #[wasm_bindgen(getter)]
    pub fn player_ms(&self) -> f64 { self.player_ms }
    #[wasm_bindgen(getter)]
    pub fn query_calls(&self) -> u32 { self.query_calls }
    #[wasm_bindgen(getter)]
    pub fn query_contacts(&self) -> u32 { self.query_contacts }
    #[wasm_bindgen(getter)]
    pub fn effects_applied(&self) -> u32 { self.effects_applied }
    #[wasm_bindgen(getter)]
    pub fn enemy_count(&self) -> u32 { self.enemy_count }
    #[wasm_bindgen(getter)]
    pub fn projectile_count(&self) -> u32 { self.projectile_count }
    #[wasm_bindgen(getter)]
    pub fn object_count(&self) -> u32 { self.object_count }
}
