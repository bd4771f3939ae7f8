//! Portfolio FX entry point
//!
//! On web, mounts every effect on the page. On native, runs a short headless
//! walk-through of the core against a virtual clock.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    portfolio_fx::platform::init_logging();
    log::info!("Portfolio FX starting...");
    portfolio_fx::platform::mount();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Portfolio FX (native) starting...");
    log::info!("Native mode is a headless demo - serve the wasm build for the real page");

    let settings = portfolio_fx::MotionSettings::default();
    if let Err(e) = demo::run(&settings) {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use portfolio_fx::scene::{Camera, Frame, Renderer, portfolio_scene};
    use portfolio_fx::{
        BoundingBox, DeviceProfileSelector, MotionSettings, PointerTiltTracker, Result,
        SceneAnimator, TypingEffect, VirtualTimers,
    };

    /// Logs what a real renderer would draw
    struct LogRenderer;

    impl Renderer for LogRenderer {
        fn configure_camera(&mut self, camera: &Camera) {
            log::info!(
                "camera at z={:.1}, fov {:.0}°",
                camera.position.z,
                camera.field_of_view
            );
        }

        fn submit(&mut self, frame: &Frame) {
            if let Some(first) = frame.poses.first() {
                let p = first.pose.position;
                log::info!(
                    "t={:.1}s: {} poses, first at ({:.2}, {:.2}, {:.2})",
                    frame.elapsed_seconds,
                    frame.poses.len(),
                    p.x,
                    p.y,
                    p.z
                );
            }
        }
    }

    pub fn run(settings: &MotionSettings) -> Result<()> {
        typing(settings)?;
        tilt(settings)?;
        scene(settings)?;
        Ok(())
    }

    fn typing(settings: &MotionSettings) -> Result<()> {
        let mut effect = TypingEffect::new(&settings.typing)?;
        let mut timers = VirtualTimers::new();
        effect.start(&mut timers);

        let mut last = String::new();
        while let Some(id) = timers.pop_due(6_000) {
            if effect.fire(id, &mut timers) && effect.displayed() != last {
                last = effect.displayed().to_string();
                log::info!("{:>5}ms  I'm a {}|", timers.now_ms(), last);
            }
        }
        effect.teardown(&mut timers);
        Ok(())
    }

    fn tilt(settings: &MotionSettings) -> Result<()> {
        let mut tracker = PointerTiltTracker::from_config(&settings.tilt)?;
        let card = tracker.register();
        let bbox = BoundingBox::new(0.0, 0.0, 200.0, 100.0);
        for (x, y) in [(100.0, 50.0), (0.0, 0.0), (200.0, 100.0)] {
            if let Some(tilt) = tracker.on_pointer_move(card, x, y, bbox) {
                let css = tilt.to_css(settings.tilt.perspective_px);
                log::info!("pointer ({}, {}) -> {}", x, y, css);
            }
        }
        if let Some(tilt) = tracker.on_pointer_leave(card) {
            log::info!("leave -> {}", tilt.to_css(settings.tilt.perspective_px));
        }
        Ok(())
    }

    fn scene(settings: &MotionSettings) -> Result<()> {
        let mut selector = DeviceProfileSelector::new(settings.device)?;
        let mut renderer = LogRenderer;
        let profile = selector.update(1440.0).unwrap_or_default();
        let mut animator = SceneAnimator::with_entities(profile, portfolio_scene());

        for (i, width) in [1440.0, 1280.0, 390.0, 390.0, 1024.0].into_iter().enumerate() {
            if let Some(profile) = selector.update(width) {
                animator.set_profile(profile);
            }
            animator.tick(i as f64 * 2.5, &mut renderer);
        }
        Ok(())
    }
}
