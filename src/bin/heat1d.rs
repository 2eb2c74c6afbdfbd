//! Manual inspection demo: runs a periodic 1-D heat
//! equation through `run_bicut` and prints the final state next to a run
//! count, with `env_logger` wired up so `RUST_LOG=cosched=trace` shows the
//! recursion's SPACE/TIME/LEAF transitions.

use std::error::Error;
use std::sync::Mutex;

use cosched::config::RecursionThresholds;
use cosched::{run_bicut, Config, Kernels, Zoid};

const WIDTH: i64 = 64;
const STEPS: i64 = 16;

struct HeatKernel {
    cur: Mutex<Vec<f64>>,
    next: Mutex<Vec<f64>>,
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
            // Only this zoid's own index range was just written into `next`;
            // a whole-array swap would pull in stale neighbor state that
            // other, still-pending zoids haven't written their own step into
            // yet. Copy back just the range this call owns.
            for x in zoid.x0[0]..zoid.x1[0] {
                let idx = x.rem_euclid(WIDTH) as usize;
                cur[idx] = next[idx];
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let thresholds = RecursionThresholds {
        dt_recursive: 2,
        dt_recursive_boundary: 2,
        dt_homo: 2,
        lcm_unroll: 1,
        time_shift: 0,
        dx_recursive: [8],
        dx_recursive_boundary: [8],
        dx_homo: [8],
    };
    let config = Config::<1>::new::<9>([1], [WIDTH], [true], thresholds, 1, STEPS)?;

    let mut init = vec![0.0f64; WIDTH as usize];
    init[WIDTH as usize / 2] = 1.0;
    let kernel = HeatKernel {
        cur: Mutex::new(init),
        next: Mutex::new(vec![0.0f64; WIDTH as usize]),
    };

    let zoid: Zoid<1> = Zoid::new([0], [WIDTH], [0], [0]);
    let stats = run_bicut::<1, 9, _>(&config, &kernel, &zoid, 0, STEPS);
    println!("{:?}", stats);
    println!("{:?}", kernel.cur.lock().unwrap());
    Ok(())
}
