//! N-ary combination of sibling nodes.

use crate::error::{NoiseError, NoiseResult};
use crate::modifiers::Modifier;
use crate::source::{expect_dimension, Dimension, NoiseSource, SharedSource};

/// Reduction applied across children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combiner {
    Sum,
    Product,
    Min,
    Max,
    /// Left-to-right sign-preserving power: the first child raised to the
    /// second, that result raised to the third, and so on.
    Pow,
}

impl Combiner {
    #[inline]
    fn fold(self, acc: f64, x: f64) -> f64 {
        match self {
            Combiner::Sum => acc + x,
            Combiner::Product => acc * x,
            Combiner::Min => acc.min(x),
            Combiner::Max => acc.max(x),
            Combiner::Pow => Modifier::Power { exponent: x }.apply(acc),
        }
    }
}

/// Checks that `children` is non-empty and shares one dimension.
pub(crate) fn common_dimension(children: &[SharedSource]) -> NoiseResult<Dimension> {
    let first = children
        .first()
        .ok_or_else(|| NoiseError::config("at least one child is required"))?;
    let dimension = first.dimension();
    for child in &children[1..] {
        expect_dimension(child.as_ref(), dimension, "child")?;
    }
    Ok(dimension)
}

/// Combines every child's value with a [`Combiner`].
#[derive(Debug, Clone)]
pub struct Combine {
    op: Combiner,
    children: Vec<SharedSource>,
    dimension: Dimension,
}

impl Combine {
    pub fn new(op: Combiner, children: Vec<SharedSource>) -> NoiseResult<Self> {
        let dimension = common_dimension(&children)?;
        Ok(Self {
            op,
            children,
            dimension,
        })
    }

    pub fn op(&self) -> Combiner {
        self.op
    }

    pub fn children(&self) -> &[SharedSource] {
        &self.children
    }
}

impl NoiseSource for Combine {
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[inline]
    fn eval(&self, coords: &[f64]) -> f64 {
        let mut iter = self.children.iter();
        let first = match iter.next() {
            Some(child) => child.eval(coords),
            None => return 0.0,
        };
        iter.fold(first, |acc, child| self.op.fold(acc, child.eval(coords)))
    }
}
