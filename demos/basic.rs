//! Demo: one bar driven to completion, then three concurrent bars.
//!
//! Run with `cargo run --example basic`.

use std::thread;
use std::time::Duration;

use bartrack::{BarMetadata, MultiTracker, SingleTracker, TrackerError};

fn single_bar_demo() -> Result<(), TrackerError> {
    println!("=== Single Progress Bar Demo ===");

    let mut bar = SingleTracker::new()?;
    bar.start(10, "1")?;

    let mut current = 0;
    while current < 10 {
        thread::sleep(Duration::from_millis(300));
        current += 2;
        bar.update(current)?;
    }
    bar.stop()?;

    println!("Single bar demo completed!");
    Ok(())
}

fn multi_bar_demo() -> Result<(), TrackerError> {
    println!("=== Multiple Progress Bars Demo ===");

    let tracker = MultiTracker::new()?;
    let first = tracker.create_bar(10, 1, BarMetadata::new())?;
    let second = tracker.create_bar(15, 2, BarMetadata::new().with("stage", "copy"))?;
    let third = tracker.create_bar(5, 3, BarMetadata::new().with("stage", "verify"))?;

    // Each worker drives its own bar at a different rate, then retries
    // stop(): only the worker that observes the last finish tears the
    // container down.
    thread::scope(|scope| {
        let workers: Vec<_> = [(first, 10, 120), (second, 15, 80), (third, 5, 200)]
            .into_iter()
            .map(|(id, steps, pace)| {
                let tracker = &tracker;
                scope.spawn(move || -> Result<(), TrackerError> {
                    for _ in 0..steps {
                        thread::sleep(Duration::from_millis(pace));
                        tracker.increment_bar(id, 1, BarMetadata::new())?;
                    }
                    if tracker.stop()? {
                        println!("Multi-bar demo completed!");
                    }
                    Ok(())
                })
            })
            .collect();

        for worker in workers {
            match worker.join() {
                Ok(Ok(())) => {}
                Ok(Err(err)) => eprintln!("worker failed: {err}"),
                Err(_) => eprintln!("worker panicked"),
            }
        }
    });

    Ok(())
}

fn main() {
    println!("bartrack demo");
    println!("=============");

    if let Err(err) = single_bar_demo().and_then(|()| multi_bar_demo()) {
        eprintln!("demo failed: {err}");
        std::process::exit(1);
    }
}
