//! Comparing a tree's cophenetic matrix against raw dissimilarities.
//!
//! A matrix is ultrametric when every triangle is isosceles with the two
//! longest sides equal:
//!
//! ```text
//! d(x, z) <= max(d(x, y), d(y, z))   for all x, y, z
//! ```
//!
//! Cophenetic matrices of trees whose merge heights never decrease towards
//! the root are ultrametric. Single linkage reproduces the subdominant
//! ultrametric of its input exactly; centroid and median linkage can
//! invert and then break the inequality.

/// Subdominant ultrametric of a square dissimilarity matrix: the largest
/// ultrametric that stays pointwise at or below `distances`.
///
/// Entry `(i, j)` is the minimax path cost between `i` and `j`, read off a
/// minimum spanning tree grown from item 0.
pub fn subdominant_ultrametric(distances: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = distances.len();
    let mut out = vec![vec![0.0; n]; n];
    if n == 0 {
        return out;
    }

    // Prim: each newly attached item inherits the bottleneck of its parent.
    let mut in_tree = vec![false; n];
    let mut best = vec![f64::INFINITY; n];
    let mut parent = vec![0usize; n];
    let mut attached: Vec<usize> = Vec::with_capacity(n);
    best[0] = 0.0;

    for _ in 0..n {
        let next = (0..n)
            .filter(|&v| !in_tree[v])
            .min_by(|&a, &b| best[a].total_cmp(&best[b]));
        let Some(v) = next else { break };
        in_tree[v] = true;

        for &u in &attached {
            let via = if u == parent[v] {
                best[v]
            } else {
                out[u][parent[v]].max(best[v])
            };
            out[u][v] = via;
            out[v][u] = via;
        }
        attached.push(v);

        for w in 0..n {
            if !in_tree[w] && distances[v][w] < best[w] {
                best[w] = distances[v][w];
                parent[w] = v;
            }
        }
    }
    out
}

/// Whether a square matrix satisfies the ultrametric inequality within
/// `tolerance`.
pub fn is_ultrametric(distances: &[Vec<f64>], tolerance: f64) -> bool {
    let n = distances.len();
    for x in 0..n {
        for y in (x + 1)..n {
            for z in (y + 1)..n {
                let mut sides = [distances[x][y], distances[y][z], distances[x][z]];
                sides.sort_by(f64::total_cmp);
                // The two longest sides of every triangle coincide.
                if sides[2] - sides[1] > tolerance {
                    return false;
                }
            }
        }
    }
    true
}

/// Pearson correlation between the off-diagonal entries of two square
/// matrices (the cophenetic correlation when `b` is a cophenetic matrix).
///
/// Returns `None` when sizes differ, fewer than three items exist, or
/// either side is constant.
pub fn cophenetic_correlation(a: &[Vec<f64>], b: &[Vec<f64>]) -> Option<f64> {
    let n = a.len();
    if n != b.len() || n < 3 {
        return None;
    }
    let pairs: Vec<(f64, f64)> = (1..n)
        .flat_map(|i| (0..i).map(move |j| (i, j)))
        .map(|(i, j)| (a[i][j], b[i][j]))
        .collect();
    let m = pairs.len() as f64;
    let mean_a = pairs.iter().map(|p| p.0).sum::<f64>() / m;
    let mean_b = pairs.iter().map(|p| p.1).sum::<f64>() / m;
    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        cov += (x - mean_a) * (y - mean_b);
        var_a += (x - mean_a) * (x - mean_a);
        var_b += (y - mean_b) * (y - mean_b);
    }
    if var_a == 0.0 || var_b == 0.0 {
        return None;
    }
    Some(cov / (var_a * var_b).sqrt())
}
