use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ghcn_anomaly::grid::{assign_stations, SphereGrid};
use ghcn_anomaly::models::{
    StationLocation, StationLocations, StationRecord, StationYear, StationsData,
};
use ghcn_anomaly::processors::{global_anomalies, AnomalyEngine, BaselineEngine};

// Stations spread over the globe with a simple seasonal cycle
fn create_test_stations(station_count: usize, years: i32) -> (StationLocations, StationsData) {
    let mut locations = StationLocations::new();
    let mut stations = StationsData::new();

    for i in 0..station_count {
        let id = format!("BENCH{:06}", i);
        let latitude = -85.0 + (i as f64 * 37.0) % 170.0;
        let longitude = -175.0 + (i as f64 * 53.0) % 350.0;
        locations.insert(
            id.clone(),
            StationLocation::new(id.clone(), format!("Station {}", i), latitude, longitude, 0.0),
        );

        let mut record = StationRecord::new(&id);
        for year in 0..years {
            let mut values = [None; 12];
            for (month, value) in values.iter_mut().enumerate() {
                let seasonal = 10.0 * ((month as f64) / 12.0 * std::f64::consts::TAU).sin();
                *value = Some(seasonal + year as f64 * 0.01 + (i % 7) as f64);
            }
            record.insert_year(1900 + year, StationYear::from_values("TAVG", values));
        }
        stations.insert(id, record);
    }

    (locations, stations)
}

fn benchmark_grid_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_generation");

    for (h, v) in [(36, 18), (72, 36), (144, 72)] {
        group.bench_with_input(
            BenchmarkId::new("generate", h * v),
            &(h, v),
            |b, &(h, v)| b.iter(|| SphereGrid::generate(black_box(h), black_box(v))),
        );
    }

    group.finish();
}

fn benchmark_nearest_cell(c: &mut Criterion) {
    let grid = SphereGrid::generate(72, 36);

    c.bench_function("nearest_cell", |b| {
        b.iter(|| {
            let mut found = 0;
            for lat in (-80..=80).step_by(20) {
                for lon in (-170..=170).step_by(20) {
                    if grid.nearest_cell(black_box(lon as f64), black_box(lat as f64)).is_some() {
                        found += 1;
                    }
                }
            }
            found
        })
    });

    let (locations, _) = create_test_stations(1000, 1);
    c.bench_function("assign_1000_stations", |b| {
        b.iter(|| assign_stations(grid.clone(), black_box(locations.clone())))
    });
}

fn benchmark_baseline_and_anomaly(c: &mut Criterion) {
    let (locations, stations) = create_test_stations(500, 60);
    let assignment = assign_stations(SphereGrid::generate(72, 36), locations);
    let baseline = BaselineEngine::new(1920, 1950);
    let anomaly = AnomalyEngine::new(1900, 1959);

    c.bench_function("cell_baselines", |b| {
        b.iter(|| baseline.update_grid_baselines(assignment.grid.clone(), black_box(&stations)))
    });

    let (with_baseline, _) = baseline.update_grid_baselines(assignment.grid.clone(), &stations);
    c.bench_function("cell_anomalies", |b| {
        b.iter(|| anomaly.update_grid_anomalies(with_baseline.clone(), black_box(&stations), None))
    });

    let (with_anomalies, _) = anomaly.update_grid_anomalies(with_baseline, &stations, None);
    c.bench_function("global_reduction", |b| {
        b.iter(|| global_anomalies(black_box(&with_anomalies), 1900, 1959))
    });
}

criterion_group!(
    benches,
    benchmark_grid_generation,
    benchmark_nearest_cell,
    benchmark_baseline_and_anomaly
);
criterion_main!(benches);
