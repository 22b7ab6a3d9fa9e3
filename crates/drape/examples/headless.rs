//! Headless cloth run: simulate a scene without a window and log the result.
//!
//! ```text
//! cargo run -p drape --example headless [scene.json] [frames]
//! ```
//!
//! With no scene file, runs the demo scene with the sphere sliding left under
//! the cloth (as if ArrowLeft were held). Set `RUST_LOG=debug` for setup
//! detail or `RUST_LOG=trace` for per-frame contact counts.

use drape::cloth::solver::max_link_error;
use drape::prelude::*;

const DT: f32 = 1.0 / 60.0;

fn main() -> Result<(), SceneError> {
    drape::init_logger();

    let mut args = std::env::args().skip(1);
    let desc = match args.next() {
        Some(path) => SceneDesc::from_file(path)?,
        None => SceneDesc::default(),
    };
    let frames: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(300);

    let mut app = App::from_scene(&desc)?;
    app.world.resource_mut::<Input<KeyCode>>().press(KeyCode::ArrowLeft);

    for chunk in 0..frames.div_ceil(60) {
        let run = (frames - chunk * 60).min(60);
        app.run_frames(run, DT);
        report(&app);
    }

    #[cfg(feature = "diagnostics")]
    {
        for timing in app.schedule.timings() {
            log::info!("{:>22}: {:8.1} us", timing.name, timing.duration_us);
        }
    }
    Ok(())
}

fn report(app: &App) {
    let Some(handles) = app.handles() else {
        return;
    };
    for &entity in &handles.cloths {
        let Some(cloth) = app.world.get::<Cloth>(entity) else {
            continue;
        };
        let Some((lo, hi)) = cloth.bounds() else {
            continue;
        };
        log::info!(
            "t={:5.2}s {:?}: bounds y [{:+.3}, {:+.3}], max link error {:.4}",
            app.elapsed(),
            entity,
            lo.y,
            hi.y,
            max_link_error(cloth)
        );
    }
    for &entity in &handles.spheres {
        if let Some(t) = app.world.get::<Transform>(entity) {
            log::info!("t={:5.2}s sphere {:?} at {:?}", app.elapsed(), entity, t.translation);
        }
    }
}
