use nalgebra::Point3;
use ndarray::Array3;
use surfconn::{EndpointPair, HemisphereProjector, HemisphereSurfacePair, PointCloud};

/// Route `log` output through the test harness.
#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Small xorshift generator for reproducible scattered data.
#[allow(dead_code)]
pub struct XorShift(pub u64);

#[allow(dead_code)]
impl XorShift {
    pub fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    pub fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    pub fn point(&mut self, lo: f64, hi: f64) -> Point3<f64> {
        let mut c = || lo + (hi - lo) * self.next_f64();
        Point3::new(c(), c(), c())
    }
}

/// A hemisphere whose inner and outer surfaces are the same cloud.
#[allow(dead_code)]
pub fn flat_hemisphere(rows: &[[f64; 3]], labels: Vec<u32>) -> HemisphereProjector {
    let cloud = PointCloud::from_rows(rows).unwrap();
    let pair = HemisphereSurfacePair::new(cloud.clone(), cloud, labels).unwrap();
    HemisphereProjector::new(pair).unwrap()
}

/// A random hemisphere of `v` vertices inside the given box, with the pial
/// surface shifted outward along x and labels in `1..=regions`.
#[allow(dead_code)]
pub fn random_hemisphere(
    rng: &mut XorShift,
    v: usize,
    lo: f64,
    hi: f64,
    regions: u32,
) -> HemisphereProjector {
    let inner: Vec<Point3<f64>> = (0..v).map(|_| rng.point(lo, hi)).collect();
    let outer: Vec<Point3<f64>> = inner.iter().map(|p| Point3::new(p.x + 1.5, p.y, p.z)).collect();
    let labels: Vec<u32> = (0..v).map(|_| 1 + rng.below(regions as u64) as u32).collect();
    let pair = HemisphereSurfacePair::new(
        PointCloud::new(inner).unwrap(),
        PointCloud::new(outer).unwrap(),
        labels,
    )
    .unwrap();
    HemisphereProjector::new(pair).unwrap()
}

/// A random atlas volume with labels in `1..=regions` on about half of the
/// voxels.
#[allow(dead_code)]
pub fn random_atlas(rng: &mut XorShift, shape: (usize, usize, usize), regions: u32) -> Array3<u32> {
    let mut atlas = Array3::<u32>::zeros(shape);
    for v in atlas.iter_mut() {
        if rng.below(2) == 0 {
            *v = 1 + rng.below(regions as u64) as u32;
        }
    }
    atlas
}

/// Random endpoint pairs inside the given box.
#[allow(dead_code)]
pub fn random_endpoints(rng: &mut XorShift, count: usize, lo: f64, hi: f64) -> Vec<EndpointPair> {
    (0..count)
        .map(|_| EndpointPair::new(rng.point(lo, hi), rng.point(lo, hi)))
        .collect()
}
