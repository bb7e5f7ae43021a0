use nalgebra::Point3;
use surfconn::{KdTree, PointCloud, SurfconnError};

mod util;

use util::XorShift;

fn brute_force(points: &[Point3<f64>], q: &Point3<f64>) -> usize {
    let mut best = (f64::INFINITY, usize::MAX);
    for (i, p) in points.iter().enumerate() {
        let d = (p - q).norm_squared();
        if d < best.0 {
            best = (d, i);
        }
    }
    best.1
}

#[test]
fn equidistant_points_resolve_to_lower_index() {
    let q = Point3::new(0.5, 0.5, 0.5);
    // the same two equidistant points, built in both orders and amid filler
    let near_a = [0., 0.5, 0.5];
    let near_b = [1., 0.5, 0.5];
    let mut rows = vec![[9., 9., 9.]; 20];
    rows.push(near_b);
    rows.push(near_a);
    let tree = KdTree::build(PointCloud::from_rows(&rows).unwrap()).unwrap();
    assert_eq!(tree.query(&q).unwrap().index, 20);

    let mut rows = vec![[9., 9., 9.]; 20];
    rows.push(near_a);
    rows.push(near_b);
    let tree = KdTree::build(PointCloud::from_rows(&rows).unwrap()).unwrap();
    assert_eq!(tree.query(&q).unwrap().index, 20);
}

#[test]
fn duplicate_heavy_cloud_matches_brute_force() {
    let mut rng = XorShift(5);
    // coordinates on a coarse grid, so exact ties are common
    let points: Vec<Point3<f64>> = (0..3000)
        .map(|_| {
            Point3::new(
                rng.below(6) as f64,
                rng.below(6) as f64,
                rng.below(6) as f64,
            )
        })
        .collect();
    let tree = KdTree::build(PointCloud::new(points.clone()).unwrap()).unwrap();
    let queries: Vec<Point3<f64>> = (0..400)
        .map(|_| {
            Point3::new(
                rng.below(13) as f64 * 0.5,
                rng.below(13) as f64 * 0.5,
                rng.below(13) as f64 * 0.5,
            )
        })
        .collect();
    let hits = tree.batch_query(&queries).unwrap();
    for (q, hit) in queries.iter().zip(&hits) {
        assert_eq!(hit.index, brute_force(&points, q), "query {:?}", q);
    }
}

#[test]
fn empty_cloud_has_no_index() {
    match KdTree::build(PointCloud::default()) {
        Err(SurfconnError::InvalidInput(what, _)) => assert_eq!(what, "point cloud"),
        other => panic!("unexpected result {:?}", other),
    }
}
