use super::Injection;
use crate::data::filter::AxisFilter;
use crate::data::model::FeatureMatrix;
use crate::error::Result;

/// Clears off rows outside an axis window, then hands the rest to the
/// wrapped injection.
///
/// Decorators nest freely; the outermost filter runs first.
pub struct FilteredInjection {
    filter: AxisFilter,
    inner: Box<dyn Injection>,
}

impl FilteredInjection {
    pub fn new(inner: impl Injection + 'static, filter: AxisFilter) -> Self {
        Self {
            filter,
            inner: Box::new(inner),
        }
    }

    pub fn filter(&self) -> &AxisFilter {
        &self.filter
    }
}

impl Injection for FilteredInjection {
    fn update_data(&self, matrix: FeatureMatrix) -> Result<FeatureMatrix> {
        let kept = self.filter.apply(&matrix)?;
        self.inner.update_data(kept)
    }

    fn headers(&self) -> &[String] {
        self.inner.headers()
    }
}
