use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::matrix::{Distance, Matrix};

/// Best move found while scanning a range: the gain plus the two
/// anchor vertices identifying it. A default candidate (gain 0) means
/// the range holds no improving move.
#[derive(Clone, Copy, Debug, Default)]
struct CandidateMove {
    gain: Distance,
    first_anchor: usize,
    second_anchor: usize,
}

/// Parallel local-search engine over a successor-array tour.
///
/// Each operator step scans every candidate move exactly once: static
/// anchor ranges fan out over an engine-local thread pool, every range
/// reports its best move, and the winner is applied single-threaded
/// afterwards. Scans only read `next` and the matrix, so they are race
/// free, and the static ranges plus first-winner tie-breaks keep the
/// outcome identical for any thread count, including one.
pub struct LocalSearch<'a> {
    matrix: &'a Matrix,
    /// `next[v]` is the vertex following `v` in the tour.
    next: Vec<usize>,
    thread_count: usize,
    pool: rayon::ThreadPool,
    /// Uniform cut points for the linear-scan operators.
    rank_limits: Vec<usize>,
    /// Workload-balanced cut points for the triangular 2-opt scan.
    two_opt_rank_limits: Vec<usize>,
}

impl<'a> LocalSearch<'a> {
    /// Build the engine from an ordered tour. `threads` is clamped to
    /// the number of vertices and to at least one.
    pub fn new(matrix: &'a Matrix, tour: &[usize], threads: usize) -> Result<Self> {
        let n = tour.len();
        let thread_count = threads.max(1).min(n.max(1));

        let mut next = vec![0usize; n];
        for (rank, &vertex) in tour.iter().enumerate() {
            next[vertex] = tour[(rank + 1) % n];
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(thread_count)
            .build()
            .map_err(|e| Error::other(format!("local search thread pool: {e}")))?;

        Ok(Self {
            matrix,
            next,
            thread_count,
            pool,
            rank_limits: uniform_rank_limits(n, thread_count),
            two_opt_rank_limits: two_opt_rank_limits(n, thread_count),
        })
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Tour cost along the successor array.
    pub fn cost(&self) -> Distance {
        self.next
            .iter()
            .enumerate()
            .map(|(v, &succ)| self.matrix.at(v, succ))
            .sum()
    }

    /// Ordered tour starting from `first`.
    pub fn tour(&self, first: usize) -> Vec<usize> {
        let mut tour = Vec::with_capacity(self.next.len());
        let mut current = first;
        loop {
            tour.push(current);
            current = self.next[current];
            if current == first {
                break;
            }
        }
        tour
    }

    /// Scan every pair of non-adjacent tour edges `(a -> b)`, `(c -> d)`
    /// with `a < c` once, and apply the best crossing exchange:
    /// `(a -> c)`, `(b -> d)` with the path from `b` to `c` reversed.
    /// Returns the gain, 0 when nothing improves.
    pub fn two_opt_step(&mut self) -> Distance {
        let n = self.next.len();
        if n < 4 {
            return 0;
        }

        let next = &self.next;
        let matrix = self.matrix;
        let best = self.scan_ranges(&self.two_opt_rank_limits, |start, end| {
            let mut best = CandidateMove::default();
            for a in start..end {
                let b = next[a];
                let row_a = matrix.row(a);
                let row_b = matrix.row(b);
                let edge_ab = row_a.at(b);
                for c in (a + 1)..n {
                    let d = next[c];
                    // Adjacent edges share a vertex; the exchange is void.
                    if c == b || d == a {
                        continue;
                    }
                    let before = edge_ab + matrix.at(c, d);
                    let after = row_a.at(c) + row_b.at(d);
                    if before > after {
                        let gain = before - after;
                        if gain > best.gain {
                            best = CandidateMove {
                                gain,
                                first_anchor: a,
                                second_anchor: c,
                            };
                        }
                    }
                }
            }
            best
        });

        if best.gain > 0 {
            self.apply_two_opt(best.first_anchor, best.second_anchor);
        }
        best.gain
    }

    /// Scan every vertex for a cheaper insertion point between two
    /// others, and apply the best relocation. Returns the gain, 0 when
    /// nothing improves.
    pub fn relocate_step(&mut self) -> Distance {
        let n = self.next.len();
        if n < 3 {
            return 0;
        }

        let next = &self.next;
        let matrix = self.matrix;
        let best = self.scan_ranges(&self.rank_limits, |start, end| {
            let mut best = CandidateMove::default();
            for a in start..end {
                // a -> b -> after_b collapses to a -> after_b, and b is
                // reinserted between some c and d = next[c].
                let b = next[a];
                let after_b = next[b];
                let row_b = matrix.row(b);
                let closing_edge = matrix.at(a, after_b);
                let edge_ab = matrix.at(a, b);
                let edge_b_out = row_b.at(after_b);

                let mut c = after_b;
                while c != a {
                    let d = next[c];
                    let before = edge_ab + edge_b_out + matrix.at(c, d);
                    let after = closing_edge + row_b.at(c) + row_b.at(d);
                    if before > after {
                        let gain = before - after;
                        if gain > best.gain {
                            best = CandidateMove {
                                gain,
                                first_anchor: a,
                                second_anchor: c,
                            };
                        }
                    }
                    c = d;
                }
            }
            best
        });

        if best.gain > 0 {
            let a = best.first_anchor;
            let c = best.second_anchor;
            let b = self.next[a];
            self.next[a] = self.next[b];
            self.next[b] = self.next[c];
            self.next[c] = b;
        }
        best.gain
    }

    /// Scan every pair of consecutive vertices for a cheaper insertion
    /// point, and apply the best segment move. The pair keeps its
    /// internal edge. Returns the gain, 0 when nothing improves.
    pub fn or_opt_step(&mut self) -> Distance {
        let n = self.next.len();
        if n < 4 {
            return 0;
        }

        let next = &self.next;
        let matrix = self.matrix;
        let best = self.scan_ranges(&self.rank_limits, |start, end| {
            let mut best = CandidateMove::default();
            for a in start..end {
                // a -> b -> m -> after_pair collapses to a -> after_pair,
                // and (b, m) is spliced between some c and d = next[c].
                let b = next[a];
                let m = next[b];
                let after_pair = next[m];
                let row_b = matrix.row(b);
                let row_m = matrix.row(m);
                let closing_edge = matrix.at(a, after_pair);
                let edge_ab = matrix.at(a, b);
                let edge_m_out = row_m.at(after_pair);

                let mut c = after_pair;
                while c != a {
                    let d = next[c];
                    let before = edge_ab + edge_m_out + matrix.at(c, d);
                    let after = closing_edge + row_b.at(c) + row_m.at(d);
                    if before > after {
                        let gain = before - after;
                        if gain > best.gain {
                            best = CandidateMove {
                                gain,
                                first_anchor: a,
                                second_anchor: c,
                            };
                        }
                    }
                    c = d;
                }
            }
            best
        });

        if best.gain > 0 {
            let a = best.first_anchor;
            let c = best.second_anchor;
            let b = self.next[a];
            let m = self.next[b];
            self.next[a] = self.next[m];
            self.next[m] = self.next[c];
            self.next[c] = b;
        }
        best.gain
    }

    /// Repeat `two_opt_step` until no improving move remains; returns
    /// the accumulated gain.
    pub fn perform_all_two_opt_steps(&mut self) -> Distance {
        self.perform_all("2-opt", Self::two_opt_step)
    }

    /// Repeat `relocate_step` until no improving move remains; returns
    /// the accumulated gain.
    pub fn perform_all_relocate_steps(&mut self) -> Distance {
        self.perform_all("relocate", Self::relocate_step)
    }

    /// Repeat `or_opt_step` until no improving move remains; returns
    /// the accumulated gain.
    pub fn perform_all_or_opt_steps(&mut self) -> Distance {
        self.perform_all("or-opt", Self::or_opt_step)
    }

    fn perform_all(&mut self, operator: &str, step: fn(&mut Self) -> Distance) -> Distance {
        let mut total_gain = 0;
        let mut steps = 0u32;
        loop {
            let gain = step(self);
            if gain == 0 {
                break;
            }
            total_gain += gain;
            steps += 1;
        }
        if total_gain > 0 {
            log::trace!("local search: operator={operator} steps={steps} gain={total_gain}");
        }
        total_gain
    }

    /// Fan the ranges between `limits` out over the pool and keep the
    /// first strict maximum: inside a range the first discovered move
    /// wins ties, across ranges the lowest range index does. Collection
    /// preserves range order, so the reduction is scheduling-free.
    fn scan_ranges(
        &self,
        limits: &[usize],
        scan: impl Fn(usize, usize) -> CandidateMove + Sync,
    ) -> CandidateMove {
        let ranges: Vec<(usize, usize)> = limits.windows(2).map(|w| (w[0], w[1])).collect();
        let per_range: Vec<CandidateMove> = self
            .pool
            .install(|| ranges.par_iter().map(|&(start, end)| scan(start, end)).collect());

        per_range
            .into_iter()
            .reduce(|best, candidate| if candidate.gain > best.gain { candidate } else { best })
            .unwrap_or_default()
    }

    fn apply_two_opt(&mut self, a: usize, c: usize) {
        let b = self.next[a];
        let d = self.next[c];

        // One-shot buffer for the path b -> .. -> c, rewired backwards.
        let mut to_reverse = Vec::new();
        let mut current = b;
        while current != c {
            to_reverse.push(current);
            current = self.next[current];
        }

        self.next[a] = c;
        let mut current = c;
        for &vertex in to_reverse.iter().rev() {
            self.next[current] = vertex;
            current = vertex;
        }
        self.next[current] = d;
    }
}

/// Cut points dividing `[0, n)` into `threads` contiguous ranges whose
/// lengths differ by at most one; the first `n % threads` ranges take
/// the extra element.
fn uniform_rank_limits(n: usize, threads: usize) -> Vec<usize> {
    let range_width = n / threads;
    let remainder = n % threads;
    let mut limits: Vec<usize> = (0..threads).map(|rank| rank * range_width).collect();
    let mut shift = 0;
    for limit in limits.iter_mut().skip(1) {
        if shift < remainder {
            shift += 1;
        }
        *limit += shift;
    }
    limits.push(n);
    limits
}

/// Cut points for the 2-opt scan. Anchor `a` examines pairs `(a, c)`
/// with `a < c`, so early anchors carry more lookups; ranges are cut
/// where the cumulative lookup count crosses each thread's share of
/// the `n * (n - 3) / 2` total. Below four vertices the operator exits
/// before scanning, so a single range suffices.
fn two_opt_rank_limits(n: usize, threads: usize) -> Vec<usize> {
    let mut limits = vec![0usize];
    if threads > 1 && n >= 4 {
        let mut lookups = vec![0u64; n - 1];
        lookups[0] = (n - 3) as u64;
        for (value, slot) in lookups[1..].iter_mut().rev().enumerate() {
            *slot = value as u64;
        }

        let mut cumulated = Vec::with_capacity(lookups.len());
        let mut sum = 0u64;
        for lookup in lookups {
            sum += lookup;
            cumulated.push(sum);
        }

        let total = (n * (n - 3) / 2) as u64;
        let share = total / threads as u64;

        let mut rank = 0usize;
        for thread in 1..threads as u64 {
            while cumulated[rank] < thread * share {
                rank += 1;
            }
            rank += 1;
            limits.push(rank);
        }
    }
    limits.push(n);
    limits
}
