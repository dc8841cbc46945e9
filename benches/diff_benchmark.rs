//! Diffing engine benchmark: Measure buffer diff performance.
//!
//! Frames are composed by the app itself, so the numbers reflect what a
//! race tick actually costs the renderer.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use paddock::buffer::diff::{render_diff, render_full, DiffState};
use paddock::surface::SurfaceUpdate;
use paddock::{App, Buffer, Config, Horse};

fn roster_config() -> Config {
    let mut config = Config::default();
    config.race.length = 40;
    config.roster = vec![
        Horse::new('♘', "Pegasus", 0.7),
        Horse::new('♞', "Nightmare", 0.5),
        Horse::new('♜', "Rook", 0.3),
    ];
    config
}

/// Compose a screen showing a track frame with lane 1 at `distance`.
fn compose(app: &mut App, buffer: &mut Buffer, distance: usize) {
    let lane = |d: usize, s: char| format!("|{}{s}{}|", " ".repeat(d), " ".repeat(40 - d));
    let frame = format!(
        "{edge}\n{}\n{}\n{}\n{edge}\n",
        lane(distance, '♘'),
        lane(distance / 2, '♞'),
        lane(distance / 3, '♜'),
        edge = "=".repeat(20),
    );
    app.handle_race_event(paddock::RaceEvent::Surface(SurfaceUpdate::Clear));
    app.handle_race_event(paddock::RaceEvent::Surface(SurfaceUpdate::Append(frame)));
    app.render(buffer);
}

fn diff_identical_frames(c: &mut Criterion) {
    let mut app = App::new(roster_config(), 120, 40);
    let mut current = Buffer::new(120, 40);
    compose(&mut app, &mut current, 10);
    let next = current.clone();

    c.bench_function("diff_120x40_identical", |b| {
        b.iter(|| {
            let mut output = Vec::with_capacity(4096);
            let mut state = DiffState::new();
            render_diff(black_box(&current), black_box(&next), &mut output, &mut state)
        });
    });
}

fn diff_race_tick(c: &mut Criterion) {
    let mut app = App::new(roster_config(), 120, 40);
    let mut current = Buffer::new(120, 40);
    let mut next = Buffer::new(120, 40);
    compose(&mut app, &mut current, 10);
    compose(&mut app, &mut next, 11);

    c.bench_function("diff_120x40_race_tick", |b| {
        b.iter(|| {
            let mut output = Vec::with_capacity(4096);
            let mut state = DiffState::new();
            render_diff(black_box(&current), black_box(&next), &mut output, &mut state)
        });
    });
}

fn full_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_full_by_size");

    for (width, height) in [(80, 24), (120, 40), (200, 50)] {
        let mut app = App::new(roster_config(), width, height);
        let mut buffer = Buffer::new(width, height);
        compose(&mut app, &mut buffer, 20);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &buffer,
            |b, buffer| {
                b.iter(|| {
                    let mut output = Vec::with_capacity(65536);
                    let mut state = DiffState::new();
                    render_full(black_box(buffer), &mut output, &mut state)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, diff_identical_frames, diff_race_tick, full_render);
criterion_main!(benches);
