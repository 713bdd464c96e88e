//! CART classification tree with Gini impurity and per-node feature sampling.

use ndarray::{ArrayView1, ArrayView2};
use rand::{rngs::StdRng, seq::SliceRandom};

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub n_classes: usize,
    /// Candidate features examined per split (non-constant ones only).
    pub max_features: usize,
    pub min_samples_split: usize,
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        /// Class distribution of the training rows reaching this leaf.
        proba: Vec<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A fitted tree plus the unnormalised impurity decrease per feature.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    root: Node,
    importances: Vec<f64>,
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    improvement: f64,
    impurity_decrease: f64,
}

struct Builder<'a, 'r> {
    x: ArrayView2<'a, f64>,
    y: &'a [usize],
    weights: &'a [f64],
    params: TreeParams,
    rng: &'r mut StdRng,
    importances: Vec<f64>,
}

impl DecisionTree {
    /// Grow a tree on the rows of `x` with non-zero `weights`.
    pub fn fit<'a>(
        x: ArrayView2<'a, f64>,
        y: &'a [usize],
        weights: &'a [f64],
        params: TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let indices: Vec<usize> = (0..x.nrows()).filter(|&i| weights[i] > 0.0).collect();
        let mut builder = Builder {
            x,
            y,
            weights,
            params,
            rng,
            importances: vec![0.0; x.ncols()],
        };
        let root = builder.grow(indices, 0);
        Self {
            root,
            importances: builder.importances,
        }
    }

    /// Class distribution of the leaf `sample` lands in.
    pub fn predict_proba(&self, sample: ArrayView1<'_, f64>) -> &[f64] {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { proba } => return proba,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if sample[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Impurity-based importances scaled to sum to one; all zero for a stump.
    pub fn feature_importances(&self) -> Vec<f64> {
        let total: f64 = self.importances.iter().sum();
        if total > 0.0 {
            self.importances.iter().map(|v| v / total).collect()
        } else {
            vec![0.0; self.importances.len()]
        }
    }

    pub fn depth(&self) -> usize {
        fn walk(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(left).max(walk(right)),
            }
        }
        walk(&self.root)
    }
}

fn gini(distribution: &[f64], total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - distribution
        .iter()
        .map(|w| {
            let p = w / total;
            p * p
        })
        .sum::<f64>()
}

impl Builder<'_, '_> {
    fn distribution(&self, indices: &[usize]) -> (Vec<f64>, f64) {
        let mut dist = vec![0.0; self.params.n_classes];
        for &i in indices {
            dist[self.y[i]] += self.weights[i];
        }
        let total = dist.iter().sum();
        (dist, total)
    }

    fn grow(&mut self, indices: Vec<usize>, depth: usize) -> Node {
        let (dist, total) = self.distribution(&indices);
        let impurity = gini(&dist, total);

        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);
        if indices.len() < self.params.min_samples_split || impurity <= 1e-12 || depth_reached {
            return leaf(dist, total);
        }

        let Some(split) = self.best_split(&indices, &dist, total, impurity) else {
            return leaf(dist, total);
        };
        self.importances[split.feature] += split.impurity_decrease;

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.x[[i, split.feature]] <= split.threshold);
        Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: Box::new(self.grow(left, depth + 1)),
            right: Box::new(self.grow(right, depth + 1)),
        }
    }

    fn best_split(
        &mut self,
        indices: &[usize],
        parent: &[f64],
        total: f64,
        impurity: f64,
    ) -> Option<SplitCandidate> {
        let mut features: Vec<usize> = (0..self.x.ncols()).collect();
        features.shuffle(&mut *self.rng);

        let mut best: Option<SplitCandidate> = None;
        let mut visited = 0usize;
        let mut column: Vec<(f64, usize)> = Vec::with_capacity(indices.len());
        for feature in features {
            if visited >= self.params.max_features {
                break;
            }
            column.clear();
            column.extend(indices.iter().map(|&i| (self.x[[i, feature]], i)));
            column.sort_by(|a, b| a.0.total_cmp(&b.0));
            let (first, last) = (column[0].0, column[column.len() - 1].0);
            if first == last {
                continue;
            }
            visited += 1;

            let mut left = vec![0.0; self.params.n_classes];
            let mut left_total = 0.0;
            for k in 0..column.len() - 1 {
                let (value, row) = column[k];
                left[self.y[row]] += self.weights[row];
                left_total += self.weights[row];
                let next = column[k + 1].0;
                if value == next {
                    continue;
                }
                let right: Vec<f64> = parent.iter().zip(&left).map(|(p, l)| p - l).collect();
                let right_total = total - left_total;
                let children =
                    left_total * gini(&left, left_total) + right_total * gini(&right, right_total);
                let improvement = -children;
                if best.map_or(true, |b| improvement > b.improvement) {
                    let mut threshold = value + (next - value) / 2.0;
                    if threshold >= next {
                        threshold = value;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        improvement,
                        impurity_decrease: total * impurity - children,
                    });
                }
            }
        }
        best
    }
}

fn leaf(dist: Vec<f64>, total: f64) -> Node {
    let proba = if total > 0.0 {
        dist.into_iter().map(|w| w / total).collect()
    } else {
        dist
    };
    Node::Leaf { proba }
}
