// main.rs
//
// Headless run of the classic nested mechanism: ten stages, each a third the
// size of the one it rolls on, speeds growing as powers of -4.
// Ticks at a fixed frame rate and writes the accumulated trace to a PNG.
//
// Usage: trochograph [frames] [output.png]

use std::env;
use std::process::ExitCode;

use trochograph::{Chain, Spirograph, float_types::Real};

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 900;
const FRAME_RATE: Real = 120.0;
const DEFAULT_FRAMES: usize = 2400;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args().skip(1);
    let frames = match args.next().map(|s| s.parse::<usize>()) {
        None => DEFAULT_FRAMES,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            log::error!("frame count must be a non-negative integer: {}", e);
            return ExitCode::FAILURE;
        },
    };
    let output = args.next().unwrap_or_else(|| "trace.png".to_string());

    let base_radius = 200.0;
    let chain = Chain::nested_preset(base_radius, 10, 3.0, -4.0);
    let mut spirograph = Spirograph::with_surface(base_radius, chain, WIDTH, HEIGHT);

    let mut skipped = 0usize;
    for frame in 0..=frames {
        let t = frame as Real / FRAME_RATE;
        if spirograph.tick(t).mechanism.is_none() {
            skipped += 1;
        }
    }

    let trace = spirograph.trace();
    log::info!(
        "{} frames, {} skipped, {:.0}px of path in {} run(s)",
        frames,
        skipped,
        trace.path_length(),
        trace.path().runs().len()
    );
    if let Some(bounds) = trace.path().bounding_rect() {
        log::info!(
            "trace bounds: ({:.1}, {:.1}) .. ({:.1}, {:.1})",
            bounds.min().x,
            bounds.min().y,
            bounds.max().x,
            bounds.max().y
        );
    }

    match trace.surface().save_png(&output) {
        Ok(()) => {
            println!("wrote {}", output);
            ExitCode::SUCCESS
        },
        Err(e) => {
            log::error!("failed to write {}: {}", output, e);
            ExitCode::FAILURE
        },
    }
}
