//! Schedules a space cut's children honoring the two-color dependency
//! discipline: same-color children are independent and run
//! concurrently; the opposite color is drained only once every entry of the
//! first has finished, via a `rayon::scope`/`spawn` fork-join.

use crate::queue::Color;
use crate::regime::ColoredZoid;

/// Runs `children` through `recurse`, respecting dependency order: every
/// [`Color::A`] child is spawned concurrently, joined, and only then are the
/// [`Color::B`] children spawned concurrently and joined. `recurse` must be
/// `Sync` because independent children may run on different worker threads.
///
/// Under the `disable-par` feature every child runs serially in queue order,
/// which is both correct (dependency order is preserved a fortiori) and
/// useful for deterministic single-threaded debugging.
pub fn schedule_children<const N: usize, F>(children: &[ColoredZoid<N>], recurse: F)
where
    F: Fn(&ColoredZoid<N>) + Sync,
{
    #[cfg(feature = "disable-par")]
    {
        for child in children {
            recurse(child);
        }
        return;
    }

    #[cfg(not(feature = "disable-par"))]
    {
        let (first, second): (Vec<_>, Vec<_>) = children.iter().partition(|c| c.color == Color::A);
        run_generation(&first, &recurse);
        run_generation(&second, &recurse);
    }
}

#[cfg(not(feature = "disable-par"))]
fn run_generation<const N: usize, F>(generation: &[&ColoredZoid<N>], recurse: &F)
where
    F: Fn(&ColoredZoid<N>) + Sync,
{
    match generation.len() {
        0 => {}
        1 => recurse(generation[0]),
        _ => {
            rayon::scope(|s| {
                for child in generation {
                    s.spawn(move |_| recurse(child));
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Zoid;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[test]
    fn runs_color_a_before_color_b() {
        let children: Vec<ColoredZoid<1>> = vec![
            ColoredZoid {
                zoid: Zoid::new([0], [1], [0], [0]),
                color: Color::B,
            },
            ColoredZoid {
                zoid: Zoid::new([1], [2], [0], [0]),
                color: Color::A,
            },
        ];
        let a_done = AtomicUsize::new(0);
        let b_saw_a_done = AtomicBool::new(false);
        schedule_children(&children, |child| match child.color {
            Color::A => {
                a_done.fetch_add(1, Ordering::SeqCst);
            }
            Color::B => {
                b_saw_a_done.store(a_done.load(Ordering::SeqCst) == 1, Ordering::SeqCst);
            }
        });
        assert!(b_saw_a_done.load(Ordering::SeqCst));
    }
}
