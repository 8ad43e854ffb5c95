//! Resource fractions: how full each dimension of a node would be with the
//! candidate pod placed on it.

use shared::models::{ResourceList, ResourceName};

use super::ResourceSpec;

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceFraction {
    pub resource: ResourceName,
    pub weight: u32,
    /// Always in [0, 1].
    pub fraction: f64,
}

/// Fractions of the tracked dimensions, in configuration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceFractions(Vec<ResourceFraction>);

impl ResourceFractions {
    pub fn get(&self, resource: &ResourceName) -> Option<f64> {
        self.0
            .iter()
            .find(|f| &f.resource == resource)
            .map(|f| f.fraction)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceFraction> {
        self.0.iter()
    }

    /// Weighted mean of the fractions. 0 when nothing is tracked.
    pub fn weighted_average(&self) -> f64 {
        let total_weight: f64 = self.0.iter().map(|f| f64::from(f.weight)).sum();
        if total_weight == 0.0 {
            return 0.0;
        }
        let weighted: f64 = self
            .0
            .iter()
            .map(|f| f64::from(f.weight) * f.fraction)
            .sum();
        weighted / total_weight
    }

    /// Distance between the most and least used dimension. For two
    /// dimensions this is `|a - b|`.
    pub fn spread(&self) -> f64 {
        let mut fractions = self.0.iter().map(|f| f.fraction);
        let Some(first) = fractions.next() else {
            return 0.0;
        };
        let (lo, hi) = fractions.fold((first, first), |(lo, hi), f| (lo.min(f), hi.max(f)));
        hi - lo
    }
}

/// Fraction of one dimension once `candidate` is added to `existing`.
///
/// Zero capacity yields 0 so the dimension carries no influence. Demand
/// above capacity, including a sum past `u64::MAX`, is clamped to 1.
pub fn fraction(allocatable: u64, existing: u64, candidate: u64) -> f64 {
    if allocatable == 0 {
        return 0.0;
    }
    let requested = existing.saturating_add(candidate);
    (requested as f64 / allocatable as f64).min(1.0)
}

/// Computes the fraction of every tracked dimension for a node holding
/// `requested` out of `allocatable`, with `pod_requests` added on top.
pub fn compute_fractions(
    allocatable: &ResourceList,
    requested: &ResourceList,
    pod_requests: &ResourceList,
    resources: &[ResourceSpec],
) -> ResourceFractions {
    ResourceFractions(
        resources
            .iter()
            .map(|spec| ResourceFraction {
                resource: spec.name.clone(),
                weight: spec.weight,
                fraction: fraction(
                    allocatable.get(&spec.name),
                    requested.get(&spec.name),
                    pod_requests.get(&spec.name),
                ),
            })
            .collect(),
    )
}
