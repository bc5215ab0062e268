//! Concrete travelling thief instance.

use std::fmt;

use super::{Item, ThiefProblem};
use crate::distance::Distances;

const SYMMETRY_TOL: f64 = 1e-9;

/// Knapsack and travel parameters of an instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnapsackParams {
    /// Maximum carried weight.
    pub capacity: i64,
    /// Speed at full capacity.
    pub min_speed: f64,
    /// Speed with an empty knapsack.
    pub max_speed: f64,
    /// Rent per unit of travel time.
    pub rent_rate: f64,
}

/// Reason an instance was rejected at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceError {
    /// Fewer than two cities.
    TooFewCities(usize),
    /// Capacity is zero or negative.
    NonPositiveCapacity(i64),
    /// Speeds are not `0 < min_speed <= max_speed`.
    InvalidSpeeds {
        /// Speed at full capacity.
        min_speed: f64,
        /// Speed when empty.
        max_speed: f64,
    },
    /// Rent rate is negative or not finite.
    InvalidRentRate(f64),
    /// An item refers to a city outside the instance.
    UnknownCity {
        /// Item index.
        item: usize,
        /// Referenced city.
        city: usize,
    },
    /// An item has a negative weight or profit.
    NegativeItem(usize),
    /// An explicit distance matrix differs from its transpose.
    AsymmetricDistances,
}

impl fmt::Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceError::TooFewCities(n) => write!(f, "instance needs at least 2 cities, got {n}"),
            InstanceError::NonPositiveCapacity(c) => {
                write!(f, "knapsack capacity must be positive, got {c}")
            }
            InstanceError::InvalidSpeeds {
                min_speed,
                max_speed,
            } => write!(
                f,
                "speeds must satisfy 0 < min <= max, got min={min_speed} max={max_speed}"
            ),
            InstanceError::InvalidRentRate(r) => write!(f, "invalid renting rate {r}"),
            InstanceError::UnknownCity { item, city } => {
                write!(f, "item {item} is assigned to unknown city {city}")
            }
            InstanceError::NegativeItem(item) => {
                write!(f, "item {item} has a negative weight or profit")
            }
            InstanceError::AsymmetricDistances => write!(f, "distance matrix is not symmetric"),
        }
    }
}

impl std::error::Error for InstanceError {}

/// An immutable travelling thief instance.
///
/// # Examples
///
/// ```
/// use u_ttp::distance::{DistanceMatrix, Distances};
/// use u_ttp::models::{Item, KnapsackParams, ThiefProblem, TtpInstance};
///
/// let dm = DistanceMatrix::from_data(2, vec![0.0, 4.0, 4.0, 0.0]).unwrap();
/// let params = KnapsackParams { capacity: 10, min_speed: 0.1, max_speed: 1.0, rent_rate: 1.0 };
/// let instance = TtpInstance::new(Distances::Matrix(dm), vec![Item::new(10, 5, 1)], params)
///     .unwrap()
///     .with_name("tiny");
///
/// assert_eq!(instance.num_cities(), 2);
/// assert_eq!(instance.availability(0), 1);
/// assert_eq!(instance.name(), "tiny");
/// ```
#[derive(Debug, Clone)]
pub struct TtpInstance {
    name: String,
    knapsack_type: String,
    distances: Distances,
    items: Vec<Item>,
    params: KnapsackParams,
}

impl TtpInstance {
    /// Creates a validated instance.
    pub fn new(
        distances: Distances,
        items: Vec<Item>,
        params: KnapsackParams,
    ) -> Result<Self, InstanceError> {
        let num_cities = distances.size();
        if num_cities < 2 {
            return Err(InstanceError::TooFewCities(num_cities));
        }
        if let Distances::Matrix(dm) = &distances {
            if !dm.is_symmetric(SYMMETRY_TOL) {
                return Err(InstanceError::AsymmetricDistances);
            }
        }
        if params.capacity <= 0 {
            return Err(InstanceError::NonPositiveCapacity(params.capacity));
        }
        if !(params.min_speed > 0.0 && params.min_speed <= params.max_speed)
            || !params.max_speed.is_finite()
        {
            return Err(InstanceError::InvalidSpeeds {
                min_speed: params.min_speed,
                max_speed: params.max_speed,
            });
        }
        if !(params.rent_rate >= 0.0 && params.rent_rate.is_finite()) {
            return Err(InstanceError::InvalidRentRate(params.rent_rate));
        }
        for (idx, item) in items.iter().enumerate() {
            if item.city() >= num_cities {
                return Err(InstanceError::UnknownCity {
                    item: idx,
                    city: item.city(),
                });
            }
            if item.weight() < 0 || item.profit() < 0 {
                return Err(InstanceError::NegativeItem(idx));
            }
        }

        Ok(Self {
            name: String::new(),
            knapsack_type: String::new(),
            distances,
            items,
            params,
        })
    }

    /// Sets the instance name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the knapsack data type label (e.g. "bounded strongly corr").
    pub fn with_knapsack_type(mut self, label: impl Into<String>) -> Self {
        self.knapsack_type = label.into();
        self
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Knapsack data type label.
    pub fn knapsack_type(&self) -> &str {
        &self.knapsack_type
    }

    /// All items, indexed by item id.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Distance source.
    pub fn distances(&self) -> &Distances {
        &self.distances
    }

    /// Knapsack and travel parameters.
    pub fn params(&self) -> KnapsackParams {
        self.params
    }
}

impl ThiefProblem for TtpInstance {
    fn num_cities(&self) -> usize {
        self.distances.size()
    }

    fn num_items(&self) -> usize {
        self.items.len()
    }

    fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to)
    }

    fn weight(&self, item: usize) -> i64 {
        self.items[item].weight()
    }

    fn profit(&self, item: usize) -> i64 {
        self.items[item].profit()
    }

    fn availability(&self, item: usize) -> usize {
        self.items[item].city()
    }

    fn capacity(&self) -> i64 {
        self.params.capacity
    }

    fn min_speed(&self) -> f64 {
        self.params.min_speed
    }

    fn max_speed(&self) -> f64 {
        self.params.max_speed
    }

    fn rent_rate(&self) -> f64 {
        self.params.rent_rate
    }
}
