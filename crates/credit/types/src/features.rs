use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Named applicant feature, in declaration order.
///
/// The declaration order is load-bearing: explanations break ties between
/// equally sized contributions by it, and the feature schema hash is computed
/// over it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Feature {
    #[serde(rename = "rent_on_time_ratio_12m")]
    RentOnTimeRatio12m,
    #[serde(rename = "utilities_on_time_ratio_12m")]
    UtilitiesOnTimeRatio12m,
    #[serde(rename = "cashflow_volatility_90d")]
    CashflowVolatility90d,
    #[serde(rename = "income_stability_6m")]
    IncomeStability6m,
    #[serde(rename = "avg_monthly_net_inflow_6m")]
    AvgMonthlyNetInflow6m,
    #[serde(rename = "avg_daily_balance_90d")]
    AvgDailyBalance90d,
    #[serde(rename = "overdraft_count_12m")]
    OverdraftCount12m,
    #[serde(rename = "months_at_address")]
    MonthsAtAddress,
}

impl Feature {
    pub const ALL: [Feature; 8] = [
        Feature::RentOnTimeRatio12m,
        Feature::UtilitiesOnTimeRatio12m,
        Feature::CashflowVolatility90d,
        Feature::IncomeStability6m,
        Feature::AvgMonthlyNetInflow6m,
        Feature::AvgDailyBalance90d,
        Feature::OverdraftCount12m,
        Feature::MonthsAtAddress,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Feature::RentOnTimeRatio12m => "rent_on_time_ratio_12m",
            Feature::UtilitiesOnTimeRatio12m => "utilities_on_time_ratio_12m",
            Feature::CashflowVolatility90d => "cashflow_volatility_90d",
            Feature::IncomeStability6m => "income_stability_6m",
            Feature::AvgMonthlyNetInflow6m => "avg_monthly_net_inflow_6m",
            Feature::AvgDailyBalance90d => "avg_daily_balance_90d",
            Feature::OverdraftCount12m => "overdraft_count_12m",
            Feature::MonthsAtAddress => "months_at_address",
        }
    }

    /// Declared input domain for this feature.
    pub fn domain(self) -> FeatureDomain {
        match self {
            Feature::RentOnTimeRatio12m
            | Feature::UtilitiesOnTimeRatio12m
            | Feature::IncomeStability6m => FeatureDomain::Ratio,
            Feature::CashflowVolatility90d | Feature::MonthsAtAddress => {
                FeatureDomain::NonNegative
            }
            Feature::AvgMonthlyNetInflow6m | Feature::AvgDailyBalance90d => FeatureDomain::Signed,
            Feature::OverdraftCount12m => FeatureDomain::Count,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepted value range of a feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureDomain {
    /// Closed interval [0, 1].
    Ratio,
    /// Any finite value >= 0.
    NonNegative,
    /// Any finite value.
    Signed,
    /// Whole number >= 0.
    Count,
}

impl FeatureDomain {
    pub fn contains(self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self {
            FeatureDomain::Ratio => (0.0..=1.0).contains(&value),
            FeatureDomain::NonNegative => value >= 0.0,
            FeatureDomain::Signed => true,
            FeatureDomain::Count => value >= 0.0 && value.fract() == 0.0,
        }
    }
}

impl fmt::Display for FeatureDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FeatureDomain::Ratio => "ratio in [0, 1]",
            FeatureDomain::NonNegative => "non-negative",
            FeatureDomain::Signed => "finite",
            FeatureDomain::Count => "non-negative whole count",
        };
        f.write_str(text)
    }
}

/// Alternative-data features for one applicant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplicantFeatures {
    pub rent_on_time_ratio_12m: f64,
    pub utilities_on_time_ratio_12m: f64,
    pub cashflow_volatility_90d: f64,
    pub income_stability_6m: f64,
    pub avg_monthly_net_inflow_6m: f64,
    pub avg_daily_balance_90d: f64,
    pub overdraft_count_12m: f64,
    pub months_at_address: f64,
}

impl ApplicantFeatures {
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::RentOnTimeRatio12m => self.rent_on_time_ratio_12m,
            Feature::UtilitiesOnTimeRatio12m => self.utilities_on_time_ratio_12m,
            Feature::CashflowVolatility90d => self.cashflow_volatility_90d,
            Feature::IncomeStability6m => self.income_stability_6m,
            Feature::AvgMonthlyNetInflow6m => self.avg_monthly_net_inflow_6m,
            Feature::AvgDailyBalance90d => self.avg_daily_balance_90d,
            Feature::OverdraftCount12m => self.overdraft_count_12m,
            Feature::MonthsAtAddress => self.months_at_address,
        }
    }

    /// `(feature, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.iter().map(move |&feature| (feature, self.get(feature)))
    }

    /// Reject the first value that falls outside its declared domain.
    ///
    /// Values are never clamped; an out-of-domain input is the caller's error.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (feature, value) in self.iter() {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite { feature });
            }
            let domain = feature.domain();
            if !domain.contains(value) {
                return Err(ValidationError::OutOfDomain {
                    feature,
                    value,
                    domain,
                });
            }
        }
        Ok(())
    }
}
