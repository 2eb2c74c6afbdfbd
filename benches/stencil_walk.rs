//! Compares the cache-oblivious drivers against the serial reference walker
//! on a 1-D periodic heat equation: a number backing the cache-oblivious
//! claim instead of an assertion.

use std::sync::Mutex;

use cosched::{config::RecursionThresholds, run_bicut, walk_serial, Config, Kernels, RunStats, Zoid};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const WIDTH: i64 = 1024;

struct HeatKernel<'a> {
    cur: &'a Mutex<Vec<f64>>,
    next: &'a Mutex<Vec<f64>>,
}

impl<'a> Kernels<1> for HeatKernel<'a> {
    fn apply(&self, zoid: &Zoid<1>, _t: i64, lt: i64) {
        let mut cur = self.cur.lock().unwrap();
        let mut next = self.next.lock().unwrap();
        for _ in 0..lt {
            for x in zoid.x0[0]..zoid.x1[0] {
                let left = cur[(x - 1).rem_euclid(WIDTH) as usize];
                let right = cur[(x + 1).rem_euclid(WIDTH) as usize];
                let mid = cur[x.rem_euclid(WIDTH) as usize];
                next[x.rem_euclid(WIDTH) as usize] = 0.25 * left + 0.5 * mid + 0.25 * right;
            }
            for x in zoid.x0[0]..zoid.x1[0] {
                let idx = x.rem_euclid(WIDTH) as usize;
                cur[idx] = next[idx];
            }
        }
    }
}

fn config() -> Config<1> {
    let thresholds = RecursionThresholds {
        dt_recursive: 4,
        dt_recursive_boundary: 4,
        dt_homo: 4,
        lcm_unroll: 1,
        time_shift: 0,
        dx_recursive: [16],
        dx_recursive_boundary: [16],
        dx_homo: [16],
    };
    Config::<1>::new::<9>([1], [WIDTH], [true], thresholds, 1, 100).unwrap()
}

fn bench_walks(c: &mut Criterion) {
    let mut group = c.benchmark_group("heat_1024x100");

    group.bench_function(BenchmarkId::new("run_bicut", WIDTH), |b| {
        b.iter(|| {
            let cur = Mutex::new(vec![0.0f64; WIDTH as usize]);
            let next = Mutex::new(vec![0.0f64; WIDTH as usize]);
            let kernel = HeatKernel { cur: &cur, next: &next };
            let zoid: Zoid<1> = Zoid::new([0], [WIDTH], [0], [0]);
            black_box(run_bicut::<1, 9, _>(&config(), &kernel, &zoid, 0, 100));
        })
    });

    group.bench_function(BenchmarkId::new("walk_serial", WIDTH), |b| {
        b.iter(|| {
            let cur = Mutex::new(vec![0.0f64; WIDTH as usize]);
            let next = Mutex::new(vec![0.0f64; WIDTH as usize]);
            let kernel = HeatKernel { cur: &cur, next: &next };
            let zoid: Zoid<1> = Zoid::new([0], [WIDTH], [0], [0]);
            let mut stats = RunStats::default();
            walk_serial(&config(), &kernel, &zoid, 0, 100, &mut stats);
            black_box(stats);
        })
    });

    group.finish();
}

criterion_group!(benches, bench_walks);
criterion_main!(benches);
