//! Bagged random forest classifier fitted through linfa's `Fit` trait.

use linfa::{dataset::DatasetBase, traits::Fit, traits::PredictInplace};
use ndarray::{Array1, Array2, ArrayView2};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use crate::{
    config::ForestConfig,
    error::ClassifierError,
    model::tree::{DecisionTree, TreeParams},
};

/// Unfitted forest hyper-parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomForestParams {
    config: ForestConfig,
}

impl RandomForestParams {
    pub fn new(config: ForestConfig) -> Self {
        Self { config }
    }

    pub fn n_estimators(mut self, n: usize) -> Self {
        self.config.n_estimators = n;
        self
    }
}

/// Fitted ensemble; probabilities are the mean of per-tree leaf distributions.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_classes: usize,
    n_features: usize,
}

impl Fit<Array2<f64>, Array1<usize>, ClassifierError> for RandomForestParams {
    type Object = RandomForest;

    fn fit(
        &self,
        dataset: &DatasetBase<Array2<f64>, Array1<usize>>,
    ) -> Result<Self::Object, ClassifierError> {
        let x = &dataset.records;
        let y = &dataset.targets;
        let (n_samples, n_features) = x.dim();
        if n_samples == 0 {
            return Err(ClassifierError::EmptyDataset);
        }
        if y.len() != n_samples {
            return Err(ClassifierError::ShapeMismatch {
                rows: n_samples,
                labels: y.len(),
            });
        }
        if self.config.n_estimators == 0 {
            return Err(ClassifierError::NoEstimators);
        }
        let first = y[0];
        if y.iter().all(|&label| label == first) {
            return Err(ClassifierError::SingleClass { class: first });
        }

        let n_classes = y.iter().copied().max().unwrap_or(0) + 1;
        let labels = y.to_vec();
        let params = TreeParams {
            n_classes,
            max_features: ((n_features as f64).sqrt() as usize).max(1),
            min_samples_split: self.config.min_samples_split.max(2),
            max_depth: self.config.max_depth,
        };

        let mut seeder = StdRng::seed_from_u64(self.config.random_seed);
        let trees = (0..self.config.n_estimators)
            .map(|_| {
                let mut rng = StdRng::seed_from_u64(seeder.gen());
                let weights = if self.config.bootstrap {
                    bootstrap_weights(n_samples, &mut rng)
                } else {
                    vec![1.0; n_samples]
                };
                DecisionTree::fit(x.view(), &labels, &weights, params, &mut rng)
            })
            .collect::<Vec<_>>();
        debug!(
            trees = trees.len(),
            n_samples,
            n_features,
            max_features = params.max_features,
            "fitted random forest"
        );

        Ok(RandomForest {
            trees,
            n_classes,
            n_features,
        })
    }
}

/// Row multiplicities of one draw-with-replacement resample.
fn bootstrap_weights(n_samples: usize, rng: &mut StdRng) -> Vec<f64> {
    let mut weights = vec![0.0; n_samples];
    for _ in 0..n_samples {
        weights[rng.gen_range(0..n_samples)] += 1.0;
    }
    weights
}

impl RandomForest {
    /// Class-membership probabilities, one row per sample.
    pub fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Array2<f64> {
        let mut proba = Array2::<f64>::zeros((x.nrows(), self.n_classes));
        for (row, sample) in x.outer_iter().enumerate() {
            for tree in &self.trees {
                for (class, p) in tree.predict_proba(sample).iter().enumerate() {
                    proba[[row, class]] += p;
                }
            }
        }
        proba.mapv_inplace(|v| v / self.trees.len() as f64);
        proba
    }

    /// Probability of `class` for every sample.
    pub fn class_probability(&self, x: ArrayView2<'_, f64>, class: usize) -> Array1<f64> {
        self.predict_proba(x).column(class).to_owned()
    }

    /// Mean of per-tree normalised impurity decreases, normalised again.
    pub fn feature_importances(&self) -> Array1<f64> {
        let mut total = Array1::<f64>::zeros(self.n_features);
        for tree in &self.trees {
            total += &Array1::from(tree.feature_importances());
        }
        total /= self.trees.len() as f64;
        let sum = total.sum();
        if sum > 0.0 {
            total /= sum;
        }
        total
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

impl PredictInplace<Array2<f64>, Array1<usize>> for RandomForest {
    fn predict_inplace(&self, x: &Array2<f64>, y: &mut Array1<usize>) {
        let proba = self.predict_proba(x.view());
        for (target, row) in y.iter_mut().zip(proba.outer_iter()) {
            // First class wins ties, matching argmax.
            let mut best = 0;
            for (class, p) in row.iter().enumerate() {
                if *p > row[best] {
                    best = class;
                }
            }
            *target = best;
        }
    }

    fn default_target(&self, x: &Array2<f64>) -> Array1<usize> {
        Array1::zeros(x.nrows())
    }
}

#[cfg(test)]
mod tests {
    use linfa::traits::Predict;
    use ndarray::array;

    use super::*;

    fn toy() -> DatasetBase<Array2<f64>, Array1<usize>> {
        let x = array![
            [0.9, 0.0, 0.1],
            [0.8, 0.1, 0.0],
            [0.7, 0.0, 0.2],
            [0.0, 0.9, 0.1],
            [0.1, 0.8, 0.0],
            [0.0, 0.7, 0.3],
        ];
        let y = array![0, 0, 0, 1, 1, 1];
        DatasetBase::new(x, y)
    }

    #[test]
    fn probabilities_are_distributions() {
        let forest = RandomForestParams::default().fit(&toy()).unwrap();
        let proba = forest.predict_proba(toy().records.view());
        for row in proba.outer_iter() {
            assert!((row.sum() - 1.0).abs() < 1e-9);
            assert!(row.iter().all(|p| (0.0..=1.0).contains(p)));
        }
    }

    #[test]
    fn learns_a_separable_problem() {
        let dataset = toy();
        let forest = RandomForestParams::default().fit(&dataset).unwrap();
        let predicted: Array1<usize> = forest.predict(&dataset.records);
        assert_eq!(predicted, dataset.targets);
    }

    #[test]
    fn importances_sum_to_one() {
        let forest = RandomForestParams::default().fit(&toy()).unwrap();
        let importances = forest.feature_importances();
        assert_eq!(importances.len(), 3);
        assert!((importances.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn single_class_is_rejected() {
        let dataset = DatasetBase::new(array![[0.0], [1.0], [2.0]], array![1, 1, 1]);
        let err = RandomForestParams::default().fit(&dataset).unwrap_err();
        assert!(matches!(err, ClassifierError::SingleClass { class: 1 }));
    }

    #[test]
    fn zero_trees_is_rejected() {
        let err = RandomForestParams::default()
            .n_estimators(0)
            .fit(&toy())
            .unwrap_err();
        assert!(matches!(err, ClassifierError::NoEstimators));
    }
}
