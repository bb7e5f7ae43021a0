#![no_main]
use libfuzzer_sys::fuzz_target;
use nalgebra::Point3;
use surfconn::{KdTree, PointCloud};

// Small integer coordinates keep exact ties frequent.
fuzz_target!(|data: &[u8]| {
    if data.len() < 6 {
        return;
    }
    let (query, cloud) = data.split_at(3);
    let q = Point3::new(query[0] as f64, query[1] as f64, query[2] as f64);
    let points: Vec<_> = cloud
        .chunks_exact(3)
        .map(|c| Point3::new((c[0] % 16) as f64, (c[1] % 16) as f64, (c[2] % 16) as f64))
        .collect();
    let tree = KdTree::build(PointCloud::new(points.clone()).unwrap()).unwrap();
    let hit = tree.query(&q).unwrap();

    let mut best = (f64::INFINITY, usize::MAX);
    for (i, p) in points.iter().enumerate() {
        let d = (p - q).norm_squared();
        if d < best.0 {
            best = (d, i);
        }
    }
    assert_eq!(hit.index, best.1);
});
