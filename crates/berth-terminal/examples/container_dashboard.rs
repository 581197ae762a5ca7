//! Render a few frames of a simulated two-container host.
//!
//! Run with: cargo run -p berth-terminal --example container_dashboard

use berth_core::{init_logging, EntityId, LogConfig, Metric, Session, SessionConfig};
use berth_terminal::{time_markers, ColorMode, Graph, GraphWithGrid, Sparkline, Theme};
use std::time::Duration;

const WIDTH: usize = 60;
const ROWS: usize = 8;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LogConfig::default())?;

    let config = SessionConfig::from_yaml_str("metric_history: 120\ncpu_limit: 200.0\n")?;
    let mut session = Session::new(config);
    let api = EntityId::new("api");
    let worker = EntityId::new("worker");

    for tick in 0..120u32 {
        let t = f64::from(tick);
        session.push_sample(api.clone(), Metric::Cpu, 40.0 + 30.0 * (t / 9.0).sin());
        session.push_sample(worker.clone(), Metric::Cpu, if tick % 40 < 8 { 150.0 } else { 20.0 });
        session.push_sample(api.clone(), Metric::Memory, 2.0e8 + t * 1.5e6);
    }

    let theme = Theme::default().with_mode(ColorMode::detect());
    let markers = time_markers(Duration::from_secs(1), 120, Duration::from_secs(30));

    let total = session.aggregate(Metric::Cpu, [&api, &worker]);
    let ceiling = session.scale_policy(Metric::Cpu).ceiling_for(&total);
    println!("cpu (api + worker), ceiling {ceiling}%");
    println!(
        "{}",
        GraphWithGrid::new(
            Graph::new(&total, WIDTH, ROWS)
                .with_ceiling(ceiling)
                .with_theme(theme.clone())
        )
        .with_gridlines([50.0, 80.0])
        .with_vlines(markers)
        .render()
    );

    let memory = session.snapshot(&api, Metric::Memory);
    let ceiling = session.scale_policy(Metric::Memory).ceiling_for(&memory);
    println!("\napi memory, ceiling {ceiling} bytes");
    println!(
        "{}",
        Sparkline::new(&memory, WIDTH)
            .with_ceiling(ceiling)
            .with_theme(theme)
            .render()
    );
    Ok(())
}
