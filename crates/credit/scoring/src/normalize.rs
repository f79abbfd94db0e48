//! Feature normalisation into bounded, comparable model units.

use credit_types::{ApplicantFeatures, Feature, ValidationError};

/// Monetary features are expressed in thousands.
pub const MONETARY_REFERENCE: f64 = 1_000.0;

/// Address tenure is expressed in years.
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Maps validated raw features into model units.
///
/// Ratios pass through; monetary flows are divided by [`MONETARY_REFERENCE`];
/// tenure is divided by [`MONTHS_PER_YEAR`]. Volatility and overdraft counts
/// pass through unchanged and carry negative weights in the table.
#[derive(Clone, Copy, Debug, Default)]
pub struct FeatureNormalizer;

impl FeatureNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Divisor applied to `feature` before weighting.
    pub fn reference_scale(feature: Feature) -> f64 {
        match feature {
            Feature::RentOnTimeRatio12m
            | Feature::UtilitiesOnTimeRatio12m
            | Feature::IncomeStability6m
            | Feature::CashflowVolatility90d
            | Feature::OverdraftCount12m => 1.0,
            Feature::AvgMonthlyNetInflow6m | Feature::AvgDailyBalance90d => MONETARY_REFERENCE,
            Feature::MonthsAtAddress => MONTHS_PER_YEAR,
        }
    }

    /// Validate, then normalise. Out-of-domain input is rejected, never clamped.
    pub fn normalize(
        &self,
        features: &ApplicantFeatures,
    ) -> Result<NormalizedFeatures, ValidationError> {
        features.validate()?;

        let mut values = [0.0; Feature::ALL.len()];
        for (slot, (feature, value)) in values.iter_mut().zip(features.iter()) {
            *slot = value / Self::reference_scale(feature);
        }
        Ok(NormalizedFeatures(values))
    }
}

/// Normalised values in `Feature::ALL` order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedFeatures([f64; 8]);

impl NormalizedFeatures {
    pub fn get(&self, feature: Feature) -> f64 {
        self.0[index_of(feature)]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.iter().copied().zip(self.0.iter().copied())
    }
}

/// Position of `feature` in `Feature::ALL`; variants are declared in that order.
pub(crate) fn index_of(feature: Feature) -> usize {
    feature as usize
}
