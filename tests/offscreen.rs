//! End-to-end frames on a real device, drawn into an offscreen texture.
//!
//! Skipped (with a note on stderr) when no adapter is available.

use std::time::Duration;

use sdf_worms::gpu::{GpuWorms, TextureTarget};
use sdf_worms::prelude::*;
use sdf_worms::uniforms::{RenderParameters, WORM_RECORD_SIZE};

fn context() -> Option<GpuContext> {
    match GpuContext::request_blocking(&wgpu::Instance::default(), None) {
        Ok(context) => Some(context),
        Err(err) => {
            eprintln!("skipping GPU test: {}", err);
            None
        }
    }
}

fn offscreen_simulation(
    context: &GpuContext,
    config: &WormsConfig,
) -> Result<Simulation<GpuWorms, ManualDriver>, SimulationError> {
    let target = TextureTarget::new(&context.device, 64, 48);
    assert_eq!(target.texture().width(), 64);
    assert_eq!(target.texture().height(), 48);
    assert_eq!(target.texture().format(), TextureTarget::FORMAT);
    make_simulation(context, config, Box::new(target), ManualDriver::new())
}

#[test]
fn test_offscreen_frames() {
    let Some(context) = context() else { return };
    let config = WormsConfig::new().with_agent_count(20).with_seed(11);

    let mut sim = offscreen_simulation(&context, &config).unwrap();
    assert_eq!(sim.passes().agents(), 20);
    assert_eq!(sim.passes().buffers().byte_len(), 20 * WORM_RECORD_SIZE as u64);
    assert_eq!(
        sim.passes().render().parameters(),
        &RenderParameters::new(&config.state.render)
    );

    sim.play();
    for dt in [0, 16, 16] {
        sim.driver_mut().advance(Duration::from_millis(dt));
        assert!(sim.driver_mut().take_request());
        assert!(sim.tick().unwrap());
    }
    assert_eq!(sim.ping_pong(), PingPong::Second);
    assert_eq!(sim.frames(), 3);
    assert!((sim.passes().compute().parameters().delta_time - 0.016).abs() < 1e-6);

    // Updates leave the elapsed time alone.
    let state = config.clone().with_compute(|c| c.speed = 3.0).state;
    sim.update(&state);
    let parameters = sim.passes().compute().parameters();
    assert_eq!(parameters.speed, 3.0);
    assert!((parameters.delta_time - 0.016).abs() < 1e-6);

    context.device.poll(wgpu::Maintain::Wait);

    sim.dispose();
    assert!(sim.passes().buffers().is_destroyed());
}

#[test]
fn test_zero_agents_is_rejected() {
    let Some(context) = context() else { return };
    let config = WormsConfig::new().with_agent_count(0);

    let result = offscreen_simulation(&context, &config);
    assert!(matches!(result, Err(SimulationError::NoAgents)));
}
