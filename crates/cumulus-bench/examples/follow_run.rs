//! End-to-end run with a viewer following from the main thread.
//!
//! Demonstrates: reference profile → Simulation on a worker thread →
//! ChannelController progress events → Viewer reads ranges and snapshots.

use std::thread;
use std::time::Duration;

use cumulus_bench::{reference_profile, reference_simulation};
use cumulus_engine::{ChannelController, Viewer};
use cumulus_test_utils::{init_tracing, GRID_PRODUCT, SCALAR_PRODUCT};

fn main() {
    init_tracing();
    println!("=== Cumulus follow-run example ===\n");

    let settings = reference_profile().unwrap();
    let mut sim = reference_simulation(settings, 42).unwrap();
    let mut viewer = Viewer::new(sim.storage().reader());
    let (mut controller, rx) = ChannelController::new();
    let cancel = controller.cancel_handle();

    let worker = thread::spawn(move || {
        let report = sim.run(&mut controller);
        (sim, report)
    });

    let mut last_printed = None;
    while viewer.finished().is_none() && viewer.failure().is_none() {
        viewer.poll(&rx);
        let step = viewer.latest_step();
        if step != last_printed {
            if let Some(step) = step {
                let range = viewer.color_range(GRID_PRODUCT);
                let snapshot = viewer.snapshot(GRID_PRODUCT, step).unwrap();
                println!(
                    "  step {:>5}: {:>5.1}% done, {} range={:?}, snapshot={}",
                    step,
                    viewer.fraction() * 100.0,
                    GRID_PRODUCT,
                    range.map(|r| r.as_tuple()),
                    if snapshot.is_some() { "ready" } else { "pending" },
                );
            }
            last_printed = step;
        }
        if viewer.fraction() >= 0.5 && std::env::var_os("CUMULUS_CANCEL_HALFWAY").is_some() {
            cancel.cancel();
        }
        thread::sleep(Duration::from_millis(5));
    }

    let (sim, report) = worker.join().unwrap();
    let report = report.unwrap();
    println!("\n{report:?}");

    let series = viewer.series(SCALAR_PRODUCT).unwrap().unwrap_or_default();
    println!("{SCALAR_PRODUCT}: {} samples", series.len());
    println!("stored in {}", sim.storage().dir().display());
}
