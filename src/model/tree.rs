//! Regression tree nodes

use serde::{Deserialize, Serialize};

/// A node of a serialized regression tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    /// `sample[feature] <= threshold` goes left.
    ///
    /// Returns `None` when a split reads a feature the sample does not have.
    pub fn predict(&self, sample: &[f64]) -> Option<f64> {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { value } => return Some(*value),
                TreeNode::Split { feature, threshold, left, right } => {
                    node = if *sample.get(*feature)? <= *threshold { left } else { right };
                }
            }
        }
    }

    /// Largest feature index referenced by any split.
    pub fn max_feature(&self) -> Option<usize> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Split { feature, left, right, .. } => [Some(*feature), left.max_feature(), right.max_feature()]
                .into_iter()
                .flatten()
                .max(),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Count splits per feature, for split-count importances.
    pub fn count_splits(&self, counts: &mut [f64]) {
        if let TreeNode::Split { feature, left, right, .. } = self {
            if let Some(c) = counts.get_mut(*feature) {
                *c += 1.0;
            }
            left.count_splits(counts);
            right.count_splits(counts);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, lo: f64, hi: f64) -> TreeNode {
        TreeNode::Split {
            feature,
            threshold,
            left: Box::new(TreeNode::Leaf { value: lo }),
            right: Box::new(TreeNode::Leaf { value: hi }),
        }
    }

    #[test]
    fn test_threshold_goes_left() {
        let tree = stump(0, 2015.0, 1.0, 2.0);
        assert_eq!(tree.predict(&[2015.0]), Some(1.0));
        assert_eq!(tree.predict(&[2016.0]), Some(2.0));
    }

    #[test]
    fn test_missing_feature_does_not_panic() {
        let tree = stump(30, 0.0, 1.0, 2.0);
        assert_eq!(tree.predict(&[0.0; 22]), None);
    }

    #[test]
    fn test_max_feature_and_depth() {
        let tree = TreeNode::Split {
            feature: 1,
            threshold: 0.5,
            left: Box::new(stump(7, 1.0, 0.0, 0.0)),
            right: Box::new(TreeNode::Leaf { value: 3.0 }),
        };
        assert_eq!(tree.max_feature(), Some(7));
        assert_eq!(tree.depth(), 2);
        assert_eq!(TreeNode::Leaf { value: 1.0 }.max_feature(), None);
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{"Split": {"feature": 0, "threshold": 1.5,
            "left": {"Leaf": {"value": -1.0}}, "right": {"Leaf": {"value": 1.0}}}}"#;
        let tree: TreeNode = serde_json::from_str(json).unwrap();
        assert_eq!(tree.predict(&[2.0]), Some(1.0));
    }
}
