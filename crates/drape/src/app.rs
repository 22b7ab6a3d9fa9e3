//! App driver.
//!
//! The [`App`] owns the [`World`] and the [`Schedule`] and advances them one
//! frame at a time. It does not open a window or poll devices: the host
//! writes input into the world's resources between frames and calls
//! [`step`](App::step) (fixed timestep) or [`tick`](App::tick) (wall clock).
//!
//! ## Example
//!
//! ```ignore
//! use drape::prelude::*;
//!
//! let mut app = App::from_scene(&SceneDesc::default())?;
//! app.world.resource_mut::<Input<KeyCode>>().press(KeyCode::ArrowLeft);
//! app.run_frames(120, 1.0 / 60.0);
//! ```

use crate::ecs::{Schedule, System, World};
use crate::error::SceneError;
use crate::scene::{self, SceneDesc, SceneHandles};
use crate::time::{FrameTime, Time};

pub struct App {
    pub world: World,
    pub schedule: Schedule,
    handles: Option<SceneHandles>,
    clock: Time,
    frame: u64,
    elapsed: f32,
}

impl App {
    /// An empty world with no systems.
    pub fn new() -> Self {
        Self {
            world: World::new(),
            schedule: Schedule::new(),
            handles: None,
            clock: Time::new(),
            frame: 0,
            elapsed: 0.0,
        }
    }

    /// Spawn `desc` and install the default schedule for it.
    pub fn from_scene(desc: &SceneDesc) -> Result<Self, SceneError> {
        let mut app = Self::new();
        let handles = desc.spawn(&mut app.world)?;
        app.schedule = scene::default_schedule(&handles);
        log::info!("App ready with {} systems", app.schedule.len());
        app.handles = Some(handles);
        Ok(app)
    }

    /// Insert a resource into the world.
    pub fn insert_resource<T: 'static + Send + Sync>(mut self, value: T) -> Self {
        self.world.insert_resource(value);
        self
    }

    /// Append a system to the end of the schedule.
    pub fn add_system<S: System + 'static>(mut self, system: S) -> Self {
        self.schedule.add_system(system);
        self
    }

    /// What [`from_scene`](Self::from_scene) spawned.
    pub fn handles(&self) -> Option<&SceneHandles> {
        self.handles.as_ref()
    }

    /// Frames run so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Simulated seconds so far.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Run one frame of `dt` seconds.
    pub fn step(&mut self, dt: f32) -> FrameTime {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        let time = FrameTime::new(self.frame, dt, self.elapsed);
        self.schedule.run_frame(&mut self.world, &time);
        self.frame += 1;
        time
    }

    /// Run one frame timed by the wall clock.
    pub fn tick(&mut self) -> FrameTime {
        let delta = self.clock.tick().delta;
        self.step(delta)
    }

    /// Run `count` frames of `dt` seconds each.
    pub fn run_frames(&mut self, count: usize, dt: f32) {
        for _ in 0..count {
            self.step(dt);
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
