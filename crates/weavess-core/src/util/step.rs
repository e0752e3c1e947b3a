//! Staircase point lists
//!
//! Turns `(x, value)` points into a right-continuous step function so a line
//! renderer draws flat runs and vertical edges instead of ramps.

/// Insert `(x[i], value[i-1])` before every point whose value changed
///
/// Every input point is kept in order; the output is never shorter than the
/// input. Non-monotonic x and empty input are passed through as-is.
pub fn create_step_points(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut stepped = Vec::with_capacity(points.len() * 2);
    let mut previous: Option<f64> = None;

    for &(x, value) in points {
        if let Some(prev) = previous {
            if value != prev {
                stepped.push((x, prev));
            }
        }
        stepped.push((x, value));
        previous = Some(value);
    }

    stepped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_points_insert_at_transitions() {
        let input = [
            (0.0, 0.0),
            (1.0, 1.0),
            (2.0, 1.0),
            (3.0, 1.0),
            (4.0, 1.0),
            (5.0, 1.0),
            (6.0, 0.0),
        ];
        let stepped = create_step_points(&input);

        assert_eq!(stepped.len(), input.len() + 2);
        assert_eq!(stepped[0], (0.0, 0.0));
        assert_eq!(stepped[1], (1.0, 0.0));
        assert_eq!(stepped[2], (1.0, 1.0));
        assert_eq!(stepped[7], (6.0, 1.0));
        assert_eq!(stepped[8], (6.0, 0.0));

        // Distinct values appear as 0 then 1
        let mut distinct: Vec<f64> = stepped.iter().map(|p| p.1).collect();
        distinct.dedup();
        assert_eq!(&distinct[..2], &[0.0, 1.0]);
    }

    #[test]
    fn test_step_points_preserve_originals_in_order() {
        let input = [(0.0, 3.0), (0.5, -1.0), (1.0, -1.0), (1.5, 2.0)];
        let stepped = create_step_points(&input);
        let originals: Vec<(f64, f64)> = stepped
            .iter()
            .copied()
            .filter(|p| input.contains(p))
            .collect();
        assert_eq!(originals, input);
    }

    #[test]
    fn test_step_points_empty_and_single() {
        assert!(create_step_points(&[]).is_empty());
        assert_eq!(create_step_points(&[(2.0, 5.0)]), vec![(2.0, 5.0)]);
    }

    #[test]
    fn test_step_points_accept_non_monotonic_x() {
        let stepped = create_step_points(&[(3.0, 1.0), (1.0, 2.0)]);
        assert_eq!(stepped, vec![(3.0, 1.0), (1.0, 1.0), (1.0, 2.0)]);
    }
}
