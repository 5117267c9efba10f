use sodyn::{
    step_response, DynamicsParams, Key, KeyframeCurve, NoOpTickObserver, RootSample, ShakeConfig,
    SideBendConfig, StackBendController, StackConfig, Tracker2D, Vec2, Vec3,
};
use wasm_bindgen::prelude::*;

fn js_error(err: sodyn::DynamicsError) -> JsError {
    JsError::new(&err.to_string())
}

// ---- Trackers Demo ----

#[wasm_bindgen]
pub struct TrackersDemo {
    critical: Tracker2D<f32>,
    underdamped: Tracker2D<f32>,
    anticipating: Tracker2D<f32>,
    target: Vec2<f32>,
}

#[wasm_bindgen]
impl TrackersDemo {
    #[wasm_bindgen(constructor)]
    pub fn new(frequency: f32) -> Result<TrackersDemo, JsError> {
        let start = Vec2::new(300.0f32, 300.0);
        let tracker = |z: f32, r: f32| {
            Tracker2D::new(DynamicsParams::fzr(frequency, z, r), start).map_err(js_error)
        };
        Ok(TrackersDemo {
            critical: tracker(1.0, 0.0)?,
            underdamped: tracker(0.2, 0.0)?,
            anticipating: tracker(0.5, -2.0)?,
            target: start,
        })
    }

    pub fn set_target(&mut self, x: f32, y: f32) {
        self.target = Vec2::new(x, y);
    }

    pub fn update(&mut self, dt: f32) {
        self.critical.update(dt, self.target);
        self.underdamped.update(dt, self.target);
        self.anticipating.update(dt, self.target);
    }

    /// Returns [cx, cy, ux, uy, ax, ay] -- critical, underdamped, anticipating
    pub fn positions(&self) -> Vec<f32> {
        let c = self.critical.position();
        let u = self.underdamped.position();
        let a = self.anticipating.position();
        vec![c.x, c.y, u.x, u.y, a.x, a.y]
    }
}

// ---- Stack Demo ----

#[wasm_bindgen]
pub struct StackDemo {
    stack: StackBendController<f32, KeyframeCurve<f32>>,
    position: Vec3<f32>,
    yaw: f32,
}

#[wasm_bindgen]
impl StackDemo {
    /// `items` equal boxes of `item_height`, bending more towards the top.
    #[wasm_bindgen(constructor)]
    pub fn new(items: usize, item_height: f32, bending_force: f32) -> Result<StackDemo, JsError> {
        let config = StackConfig::new()
            .with_bending_force(bending_force)
            .with_items_spacing(0.02)
            .with_max_velocity(4.0)
            .with_shake(ShakeConfig::default())
            .with_side_bending(SideBendConfig::default())
            .with_dynamics(DynamicsParams::fzr(2.5, 0.35, 0.0));
        let curve = KeyframeCurve::new(vec![
            Key::new(0.0, 0.0),
            Key::new(0.3, 0.1),
            Key::new(1.0, 1.0),
        ]);
        let mut stack = StackBendController::new(config, curve, RootSample::at(Vec3::new(0.0, 0.0, 0.0)))
            .map_err(js_error)?;
        for _ in 0..items {
            stack.push_item(item_height).map_err(js_error)?;
        }
        Ok(StackDemo { stack, position: Vec3::new(0.0, 0.0, 0.0), yaw: 0.0 })
    }

    /// Move the root by `speed` along its heading while turning at `turn_rate` deg/s.
    pub fn update(&mut self, dt: f32, speed: f32, turn_rate: f32) {
        self.yaw += turn_rate * dt;
        let (s, c) = self.yaw.to_radians().sin_cos();
        let forward = Vec3::new(s, 0.0, c);
        let right = Vec3::new(c, 0.0, -s);
        self.position.x += forward.x * speed * dt;
        self.position.z += forward.z * speed * dt;

        let sample = RootSample::at(self.position).with_orientation(forward, right);
        self.stack.tick(dt, sample, &mut NoOpTickObserver);
    }

    pub fn push_item(&mut self, height: f32) -> Result<usize, JsError> {
        self.stack.push_item(height).map_err(js_error)
    }

    pub fn remove_item(&mut self, index: usize) -> Result<(), JsError> {
        self.stack.remove_item(index).map(|_| ()).map_err(js_error)
    }

    /// Returns flat [x0, y0, z0, x1, y1, z1, ...] in the root's local frame
    pub fn positions(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.stack.len() * 3);
        for item in self.stack.items() {
            let p = item.local_position();
            out.extend_from_slice(&[p.x, p.y, p.z]);
        }
        out
    }

    /// Returns flat [ux0, uy0, uz0, ...] item up axes
    pub fn up_axes(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.stack.len() * 3);
        for item in self.stack.items() {
            let up = item.facing().up;
            out.extend_from_slice(&[up.x, up.y, up.z]);
        }
        out
    }

    /// Returns [axial, lateral]
    pub fn drive(&self) -> Vec<f32> {
        let drive = self.stack.drive();
        vec![drive.axial, drive.lateral]
    }

    pub fn item_count(&self) -> usize {
        self.stack.len()
    }
}

/// Returns flat [x0, y0, x1, y1, ...] of a step response for previewing a tuning.
#[wasm_bindgen]
pub fn step_preview(frequency: f32, damping: f32, response: f32) -> Result<Vec<f32>, JsError> {
    let params = DynamicsParams::fzr(frequency, damping, response);
    let series = step_response(params, 1.0 / 60.0, 240, 2.0, 1.0).map_err(js_error)?;
    let mut out = Vec::with_capacity(series.len() * 2);
    for p in series.points() {
        out.push(p.x);
        out.push(p.y);
    }
    Ok(out)
}
