//! Nearest-neighbor tour construction.
//!
//! Builds a tour greedily: starting from city 0, always travel to the
//! nearest unvisited city.
//!
//! # Complexity
//!
//! O(n²) where n = number of cities.
//!
//! # Reference
//!
//! The simplest constructive heuristic for the TSP. Tours are typically
//! 15-25% above optimal, which the 2-opt phase then repairs.

use crate::models::ThiefProblem;

/// Constructs a tour starting at city 0 with the nearest-neighbor rule.
///
/// Ties are broken by the lowest city index.
///
/// # Examples
///
/// ```
/// use u_ttp::constructive::nearest_neighbor_tour;
/// use u_ttp::distance::{Distances, EdgeWeight};
/// use u_ttp::models::{City, KnapsackParams, TtpInstance};
///
/// let cities = vec![
///     City::new(0, 0.0, 0.0),
///     City::new(1, 10.0, 0.0),
///     City::new(2, 1.0, 0.0),
///     City::new(3, 2.0, 0.0),
/// ];
/// let distances = Distances::Coordinates { cities, rule: EdgeWeight::Euclidean };
/// let params = KnapsackParams { capacity: 1, min_speed: 0.1, max_speed: 1.0, rent_rate: 1.0 };
/// let instance = TtpInstance::new(distances, vec![], params).unwrap();
///
/// assert_eq!(nearest_neighbor_tour(&instance), vec![0, 2, 3, 1]);
/// ```
pub fn nearest_neighbor_tour<P: ThiefProblem + ?Sized>(problem: &P) -> Vec<usize> {
    let n = problem.num_cities();
    if n == 0 {
        return Vec::new();
    }

    let mut visited = vec![false; n];
    visited[0] = true;
    let mut tour = Vec::with_capacity(n);
    tour.push(0);
    let mut current = 0;

    for _ in 1..n {
        let mut best: Option<(usize, f64)> = None;
        for (city, &seen) in visited.iter().enumerate() {
            if seen {
                continue;
            }
            let d = problem.distance(current, city);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((city, d));
            }
        }

        match best {
            Some((next, _)) => {
                visited[next] = true;
                tour.push(next);
                current = next;
            }
            None => break,
        }
    }

    tour
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{DistanceMatrix, Distances};
    use crate::models::{KnapsackParams, TtpInstance};

    fn instance(n: usize, data: Vec<f64>) -> TtpInstance {
        let params = KnapsackParams {
            capacity: 10,
            min_speed: 0.1,
            max_speed: 1.0,
            rent_rate: 1.0,
        };
        let dm = DistanceMatrix::from_data(n, data).expect("valid");
        TtpInstance::new(Distances::Matrix(dm), vec![], params).expect("valid")
    }

    #[test]
    fn test_nn_visits_every_city_once() {
        #[rustfmt::skip]
        let inst = instance(4, vec![
            0.0, 5.0, 1.0, 9.0,
            5.0, 0.0, 2.0, 1.0,
            1.0, 2.0, 0.0, 8.0,
            9.0, 1.0, 8.0, 0.0,
        ]);
        let tour = nearest_neighbor_tour(&inst);
        assert_eq!(tour, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_nn_tie_breaks_on_lowest_index() {
        #[rustfmt::skip]
        let inst = instance(3, vec![
            0.0, 1.0, 1.0,
            1.0, 0.0, 1.0,
            1.0, 1.0, 0.0,
        ]);
        assert_eq!(nearest_neighbor_tour(&inst), vec![0, 1, 2]);
    }

    #[test]
    fn test_nn_two_cities() {
        let inst = instance(2, vec![0.0, 3.0, 3.0, 0.0]);
        assert_eq!(nearest_neighbor_tour(&inst), vec![0, 1]);
    }
}
