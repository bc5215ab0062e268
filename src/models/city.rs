//! City and item types.

use serde::{Deserialize, Serialize};

/// A city on the tour.
///
/// City 0 is where every tour starts and ends.
///
/// # Examples
///
/// ```
/// use u_ttp::models::City;
///
/// let c = City::new(1, 41.0, 49.0);
/// assert_eq!(c.id(), 1);
/// assert_eq!(c.x(), 41.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    id: usize,
    x: f64,
    y: f64,
}

impl City {
    /// Creates a new city.
    pub fn new(id: usize, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    /// City index.
    pub fn id(&self) -> usize {
        self.id
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean distance to another city.
    pub fn distance_to(&self, other: &City) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An item that can be stolen at a given city.
///
/// An item's index in the instance's item list is its identifier.
///
/// # Examples
///
/// ```
/// use u_ttp::models::Item;
///
/// let item = Item::new(100, 20, 3);
/// assert_eq!(item.profit(), 100);
/// assert_eq!(item.weight(), 20);
/// assert_eq!(item.city(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    profit: i64,
    weight: i64,
    city: usize,
}

impl Item {
    /// Creates a new item located at `city`.
    pub fn new(profit: i64, weight: i64, city: usize) -> Self {
        Self {
            profit,
            weight,
            city,
        }
    }

    /// Profit collected when the item is carried.
    pub fn profit(&self) -> i64 {
        self.profit
    }

    /// Weight added to the knapsack.
    pub fn weight(&self) -> i64 {
        self.weight
    }

    /// City where the item becomes available.
    pub fn city(&self) -> usize {
        self.city
    }
}
