//! Travelling thief problem trait.

/// Defines a travelling thief problem instance.
///
/// This trait is the interface the solvers use to read instance data.
/// Cities and items are indexed from zero. Travel speed falls linearly with
/// the carried weight, from `max_speed` when empty to `min_speed` at full
/// capacity.
///
/// # Examples
///
/// ```
/// use u_ttp::models::ThiefProblem;
/// use u_ttp::distance::DistanceMatrix;
///
/// struct Tiny {
///     distances: DistanceMatrix,
/// }
///
/// impl ThiefProblem for Tiny {
///     fn num_cities(&self) -> usize { 2 }
///     fn num_items(&self) -> usize { 1 }
///     fn distance(&self, from: usize, to: usize) -> f64 { self.distances.get(from, to) }
///     fn weight(&self, _item: usize) -> i64 { 5 }
///     fn profit(&self, _item: usize) -> i64 { 10 }
///     fn availability(&self, _item: usize) -> usize { 1 }
///     fn capacity(&self) -> i64 { 10 }
///     fn min_speed(&self) -> f64 { 0.1 }
///     fn max_speed(&self) -> f64 { 1.0 }
///     fn rent_rate(&self) -> f64 { 1.0 }
/// }
///
/// let p = Tiny { distances: DistanceMatrix::from_data(2, vec![0.0, 4.0, 4.0, 0.0]).unwrap() };
/// assert!((p.speed(5) - 0.55).abs() < 1e-12);
/// assert!((p.leg_time(1, 0, 0) - 4.0).abs() < 1e-12);
/// ```
pub trait ThiefProblem: Send + Sync {
    /// Number of cities.
    fn num_cities(&self) -> usize;

    /// Number of items.
    fn num_items(&self) -> usize;

    /// Travel distance from city `from` to city `to`.
    fn distance(&self, from: usize, to: usize) -> f64;

    /// Weight of `item`.
    fn weight(&self, item: usize) -> i64;

    /// Profit of `item`.
    fn profit(&self, item: usize) -> i64;

    /// City where `item` can be picked.
    fn availability(&self, item: usize) -> usize;

    /// Knapsack capacity.
    fn capacity(&self) -> i64;

    /// Speed at full capacity.
    fn min_speed(&self) -> f64;

    /// Speed with an empty knapsack.
    fn max_speed(&self) -> f64;

    /// Rent paid per unit of travel time.
    fn rent_rate(&self) -> f64;

    /// Speed lost per unit of carried weight.
    fn speed_coefficient(&self) -> f64 {
        (self.max_speed() - self.min_speed()) / self.capacity() as f64
    }

    /// Travel speed while carrying `weight`.
    fn speed(&self, weight: i64) -> f64 {
        self.max_speed() - weight as f64 * self.speed_coefficient()
    }

    /// Time to travel from `from` to `to` while carrying `weight`.
    fn leg_time(&self, from: usize, to: usize, weight: i64) -> f64 {
        self.distance(from, to) / self.speed(weight)
    }
}
