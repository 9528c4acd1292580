/// Loading screen simulator
/// Drives the loading screen through a synthetic world load with headless
/// collaborators and the real clock, then prints what was presented.
///
/// Usage: loading_sim [config.toml]

use std::thread;
use std::time::Duration;

use anyhow::Context;
use loading_screen::backend::headless::{HeadlessCatalog, HeadlessRenderer, HeadlessWidgets};
use loading_screen::{LoadingScreen, LoadingScreenConfig, SystemClock};

const CELLS: u32 = 4;
const REF_LISTS_PER_CELL: u32 = 3;
const REFS_PER_LIST: u32 = 40;
const WORK_PER_REF: Duration = Duration::from_millis(2);

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info,loading_screen=debug"))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => LoadingScreenConfig::load(&path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => LoadingScreenConfig::default(),
    };

    println!("Loading Screen Simulator");
    println!("========================");

    let catalog = HeadlessCatalog::new().with_resources(
        &config.resource_group,
        &["splash_harbor.dds", "Splash_Ruins.dds", "menu_background.dds"],
    );
    let renderer = HeadlessRenderer::new()
        .with_stage("ssao", &[])
        .with_stage(&config.final_compositor, &[config.final_compositor_output.as_str()]);

    let mut screen = LoadingScreen::new(
        &config,
        renderer,
        catalog,
        HeadlessWidgets::new(),
        SystemClock::new(),
    )?;
    screen.on_resize(1280, 720);

    for load in 1..=2 {
        println!("\nLoad #{}", load);
        simulate_world_load(&mut screen)?;
        let stats = screen.stats();
        screen.loading_done();

        println!(
            "  frames presented: {}, skipped: {}, wallpapers bound: {}",
            stats.frames_presented,
            stats.frames_skipped,
            screen.catalog().bound().len()
        );
    }

    println!("\nTotal frames presented: {}", screen.renderer().frames().len());
    Ok(())
}

fn simulate_world_load(
    screen: &mut LoadingScreen<HeadlessRenderer, HeadlessCatalog, HeadlessWidgets, SystemClock>,
) -> anyhow::Result<()> {
    for cell in 0..CELLS {
        screen.report_progress("Loading cells", 0, cell, CELLS)?;

        for _ in 0..REF_LISTS_PER_CELL {
            for reference in 0..REFS_PER_LIST {
                thread::sleep(WORK_PER_REF);
                screen.report_progress("Loading references", 1, reference, REFS_PER_LIST)?;
            }
        }

        println!("  cell {}/{}: bar at {}", cell + 1, CELLS, screen.widgets().progress);
    }
    Ok(())
}
