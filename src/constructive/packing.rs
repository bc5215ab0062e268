//! Density-ordered greedy packing for a fixed tour.

use crate::models::ThiefProblem;

/// Scores each item by `profit / (weight × remaining distance)`, where the
/// remaining distance runs from the item's city to the end of the closed
/// tour.
///
/// Items picked late are carried over a short distance and slow the thief
/// less, so they score higher. Zero weights and distances are clamped to
/// keep scores finite.
pub fn item_scores<P: ThiefProblem + ?Sized>(problem: &P, tour: &[usize]) -> Vec<f64> {
    let n = tour.len();
    // remaining[pos] = distance from tour[pos] back to the start
    let mut remaining = vec![0.0; n];
    let mut acc = 0.0;
    for pos in (0..n).rev() {
        acc += problem.distance(tour[pos], tour[(pos + 1) % n]);
        remaining[pos] = acc;
    }
    let mut position = vec![0; problem.num_cities()];
    for (pos, &city) in tour.iter().enumerate() {
        position[city] = pos;
    }

    (0..problem.num_items())
        .map(|item| {
            let dist = remaining[position[problem.availability(item)]].max(1e-9);
            let weight = problem.weight(item).max(1) as f64;
            problem.profit(item) as f64 / (weight * dist)
        })
        .collect()
}

/// Item indices sorted by descending score, ties by index.
pub fn items_by_score(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
    order
}

/// Builds a picking plan for `tour` by packing items in descending
/// [`item_scores`] order while they fit the knapsack.
///
/// # Examples
///
/// ```
/// use u_ttp::constructive::density_packing;
/// use u_ttp::distance::{DistanceMatrix, Distances};
/// use u_ttp::models::{Item, KnapsackParams, TtpInstance};
///
/// let dm = DistanceMatrix::from_data(3, vec![0.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0]).unwrap();
/// let items = vec![Item::new(10, 6, 1), Item::new(10, 6, 2)];
/// let params = KnapsackParams { capacity: 10, min_speed: 0.1, max_speed: 1.0, rent_rate: 1.0 };
/// let instance = TtpInstance::new(Distances::Matrix(dm), items, params).unwrap();
///
/// // The item at city 2 is picked later, so it wins the only slot.
/// assert_eq!(density_packing(&instance, &[0, 1, 2]), vec![None, Some(2)]);
/// ```
pub fn density_packing<P: ThiefProblem + ?Sized>(
    problem: &P,
    tour: &[usize],
) -> Vec<Option<usize>> {
    let scores = item_scores(problem, tour);
    let mut plan = vec![None; problem.num_items()];
    let mut load = 0i64;
    for item in items_by_score(&scores) {
        let w = problem.weight(item);
        if load + w <= problem.capacity() {
            load += w;
            plan[item] = Some(problem.availability(item));
        }
    }
    plan
}
