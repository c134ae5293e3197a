use criterion::{black_box, criterion_group, criterion_main, Criterion};
use waypath::{solve_subpath, CostSurface, Planner, PlannerConfig, Point, RouteOutcome};

/// A bumpy surface with a ridge of expensive cells through the middle
fn load_base_surface_scaled(factor: usize) -> (CostSurface, Point, Point) {
    let cells = (0..24)
        .map(|row| {
            (0..24)
                .map(|col| {
                    if col == 12 && row > 2 {
                        40.0
                    } else {
                        ((row * 13 + col * 7) % 9 + 1) as f64
                    }
                })
                .collect()
        })
        .collect();
    let surface = CostSurface::new(cells).unwrap().scaled(factor);

    let start = Point::new(20 * factor, 1);
    let goal = Point::new(20 * factor, 23 * factor);

    (surface, start, goal)
}

fn bench_surface_scaled(c: &mut Criterion, factor: usize) {
    let (surface, start, goal) = load_base_surface_scaled(factor);

    c.bench_function(&format!("subpath_scaled_{}", factor), |b| {
        b.iter(|| {
            let res = solve_subpath(&surface, black_box(start), black_box(goal)).unwrap();
            assert!(res.cost > 0.0);
        })
    });
}

pub fn subpath_small(c: &mut Criterion) {
    bench_surface_scaled(c, 1);
}

pub fn subpath_medium(c: &mut Criterion) {
    bench_surface_scaled(c, 2);
}

pub fn subpath_large(c: &mut Criterion) {
    bench_surface_scaled(c, 4);
}

pub fn planner_route(c: &mut Criterion) {
    let (surface, _, _) = load_base_surface_scaled(2);
    let positions = (0..12)
        .map(|i| Point::new((i * 17) % 48, (i * 29) % 48))
        .collect();
    let planner = Planner::new(
        surface,
        positions,
        PlannerConfig {
            max_nodes: 6,
            ..Default::default()
        },
    )
    .unwrap();

    c.bench_function("planner_route", |b| {
        b.iter(|| {
            let res = planner.route(black_box(0), black_box(11)).unwrap();
            black_box(matches!(res, RouteOutcome::PathFound(_)))
        })
    });
}

criterion_group!(
    benches,
    subpath_small,
    subpath_medium,
    subpath_large,
    planner_route
);
criterion_main!(benches);
