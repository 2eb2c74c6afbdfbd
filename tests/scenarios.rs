//! End-to-end testable properties: round-trip agreement between the
//! parallel drivers and the serial reference walker, and the plan
//! builder/executor visiting every point the direct driver does.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use cosched::config::RecursionThresholds;
use cosched::{build_plan, execute_plan, run_bicut, walk_serial, Config, Kernels, RunStats, Zoid};

const WIDTH: i64 = 1024;

/// Records every cell written, keyed by final array state, so two runs can be
/// compared for bitwise equality.
struct HeatKernel {
    cur: Mutex<Vec<f64>>,
    next: Mutex<Vec<f64>>,
}

impl HeatKernel {
    fn new(seed: f64) -> Self {
        let mut init = vec![0.0f64; WIDTH as usize];
        init[0] = seed;
        HeatKernel {
            cur: Mutex::new(init),
            next: Mutex::new(vec![0.0f64; WIDTH as usize]),
        }
    }

    fn snapshot(&self) -> Vec<f64> {
        self.cur.lock().unwrap().clone()
    }
}

impl Kernels<1> for HeatKernel {
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

fn heat_config() -> Config<1> {
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

#[test]
fn bicut_matches_serial_walk_over_a_periodic_heat_equation() {
    let config = heat_config();
    let zoid: Zoid<1> = Zoid::new([0], [WIDTH], [0], [0]);

    let parallel = HeatKernel::new(1.0);
    run_bicut::<1, 9, _>(&config, &parallel, &zoid, 0, 100);

    let serial = HeatKernel::new(1.0);
    let mut stats = RunStats::default();
    walk_serial(&config, &serial, &zoid, 0, 100, &mut stats);

    assert_eq!(parallel.snapshot(), serial.snapshot());
}

struct CountingKernel(AtomicU64);
impl Kernels<1> for CountingKernel {
    fn apply(&self, _zoid: &Zoid<1>, _t: i64, _lt: i64) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn executing_a_plan_visits_exactly_as_many_leaves_as_it_recorded() {
    let thresholds = RecursionThresholds {
        dt_recursive: 4,
        dt_recursive_boundary: 4,
        dt_homo: 4,
        lcm_unroll: 1,
        time_shift: 0,
        dx_recursive: [8],
        dx_recursive_boundary: [8],
        dx_homo: [8],
    };
    let config = Config::<1>::new::<9>([1], [64], [true], thresholds, 1, 16).unwrap();
    let zoid: Zoid<1> = Zoid::new([0], [64], [0], [0]);

    let kernel = CountingKernel(AtomicU64::new(0));
    let plan = build_plan(&config, &kernel, &zoid, 0, 16);
    let expected = plan.root.spawn_count() as u64;

    let mut stats = RunStats::default();
    execute_plan(&plan, &kernel, &mut stats);
    assert_eq!(kernel.0.load(Ordering::SeqCst), expected);
    assert!(expected > 0);
}

#[test]
#[should_panic(expected = "CircularQueue overflow")]
fn undersized_queue_capacity_aborts_instead_of_corrupting() {
    // A queue capacity too small for a 2-D run must abort via the ring
    // buffer's assertion, not silently drop work.
    let thresholds = RecursionThresholds {
        dt_recursive: 2,
        dt_recursive_boundary: 2,
        dt_homo: 2,
        lcm_unroll: 1,
        time_shift: 0,
        dx_recursive: [4, 4],
        dx_recursive_boundary: [4, 4],
        dx_homo: [4, 4],
    };
    let config = Config::<2>::new::<9>([1, 1], [16, 16], [false, false], thresholds, 1, 4).unwrap();
    let kernel = CountingKernel(AtomicU64::new(0));
    let zoid: Zoid<2> = Zoid::new([0, 0], [16, 16], [0, 0], [0, 0]);
    run_bicut::<2, 3, _>(&config, &kernel, &zoid, 0, 2);
}
