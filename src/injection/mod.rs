/// Dataset injections: composable `matrix -> matrix` transforms.
///
/// ```text
///   catalog matrix
///        │
///        ▼
///   ┌──────────────────┐
///   │ FilteredInjection │  AxisFilter first, then the wrapped injection
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ KeplerInjection   │  append mean motion
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ ResonanceJoin     │  resonance columns + labels, cached
///   └──────────────────┘
/// ```
///
/// Stages never know about each other; [`Pipeline`] runs any ordered list.
pub mod decorator;
pub mod kepler;

pub use decorator::FilteredInjection;
pub use kepler::KeplerInjection;

use crate::data::model::FeatureMatrix;
use crate::error::Result;

/// A unary transform over a feature matrix.
pub trait Injection {
    fn update_data(&self, matrix: FeatureMatrix) -> Result<FeatureMatrix>;

    /// Names of the columns this injection appends.
    fn headers(&self) -> &[String] {
        &[]
    }
}

impl<T: Injection + ?Sized> Injection for Box<T> {
    fn update_data(&self, matrix: FeatureMatrix) -> Result<FeatureMatrix> {
        (**self).update_data(matrix)
    }

    fn headers(&self) -> &[String] {
        (**self).headers()
    }
}

// ---------------------------------------------------------------------------
// Pipeline – ordered stages
// ---------------------------------------------------------------------------

/// Runs its stages in insertion order, feeding each the previous output.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Injection>>,
    headers: Vec<String>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage, builder style.
    pub fn then(mut self, stage: impl Injection + 'static) -> Self {
        self.push(Box::new(stage));
        self
    }

    pub fn push(&mut self, stage: Box<dyn Injection>) {
        self.headers.extend(stage.headers().iter().cloned());
        self.stages.push(stage);
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Injection for Pipeline {
    fn update_data(&self, matrix: FeatureMatrix) -> Result<FeatureMatrix> {
        self.stages
            .iter()
            .try_fold(matrix, |acc, stage| stage.update_data(acc))
    }

    fn headers(&self) -> &[String] {
        &self.headers
    }
}
