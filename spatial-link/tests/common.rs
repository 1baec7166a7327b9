//! Test utilities for spatial-link integration tests.
//!
//! Minimal track/cluster element types and seeded random generators.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spatial_link::{
    Bounds, FieldId, FieldLink, Granule, GranuleSample, LinkField, LinkTarget, Point2D,
};

/// Track extrapolated to the linking surface.
#[derive(Clone, Debug, Default)]
pub struct Track {
    pub impact: Option<Point2D>,
    /// Links handed over at publish.
    pub links: Vec<FieldLink>,
}

impl Track {
    pub fn at(eta: f64, phi: f64) -> Self {
        Self {
            impact: Some(Point2D::new(eta, phi)),
            links: Vec::new(),
        }
    }

    /// Track that never reaches the surface.
    pub fn lost() -> Self {
        Self::default()
    }
}

impl LinkTarget for Track {
    fn link_position(&self) -> Option<Point2D> {
        self.impact
    }

    fn record_links(&mut self, links: &[FieldLink]) {
        self.links = links.to_vec();
    }
}

/// Cluster made of rechits.
#[derive(Clone, Debug, Default)]
pub struct Cluster {
    pub hits: Vec<GranuleSample>,
    pub extent: Option<Bounds>,
}

impl Cluster {
    /// Cluster whose hits are fully owned: `(eta, phi, energy)`.
    pub fn of(hits: &[(f64, f64, f64)]) -> Self {
        Self {
            hits: hits
                .iter()
                .map(|&(x, y, e)| GranuleSample::new(Point2D::new(x, y), e))
                .collect(),
            extent: None,
        }
    }

    pub fn single(eta: f64, phi: f64, energy: f64) -> Self {
        Self::of(&[(eta, phi, energy)])
    }

    pub fn with_extent(mut self, extent: Bounds) -> Self {
        self.extent = Some(extent);
        self
    }
}

impl LinkField for Cluster {
    fn samples(&self) -> impl Iterator<Item = GranuleSample> + '_ {
        self.hits.iter().copied()
    }

    fn extent(&self) -> Option<Bounds> {
        self.extent
    }
}

/// Uniform random point inside `area`.
pub fn random_point(rng: &mut StdRng, area: &Bounds) -> Point2D {
    Point2D::new(
        rng.random_range(area.min.x..=area.max.x),
        rng.random_range(area.min.y..=area.max.y),
    )
}

/// `n` random granules, owners cycling over `fields` handles.
pub fn random_granules(n: usize, fields: usize, seed: u64) -> Vec<Granule> {
    let mut rng = StdRng::seed_from_u64(seed);
    let area = Bounds::from_extents(-2.5, 2.5, -3.0, 3.0);
    (0..n)
        .map(|i| {
            Granule::new(
                random_point(&mut rng, &area),
                rng.random_range(0.0..10.0),
                FieldId::new(i % fields.max(1)),
            )
        })
        .collect()
}

/// Random clusters of 1..=`max_hits` hits each around random centers.
pub fn random_clusters(n: usize, max_hits: usize, seed: u64) -> Vec<Cluster> {
    let mut rng = StdRng::seed_from_u64(seed);
    let area = Bounds::from_extents(-2.5, 2.5, -3.0, 3.0);
    (0..n)
        .map(|_| {
            let center = random_point(&mut rng, &area);
            let hits = rng.random_range(1..=max_hits.max(1));
            let hits: Vec<_> = (0..hits)
                .map(|_| {
                    let dx = rng.random_range(-0.05..0.05);
                    let dy = rng.random_range(-0.05..0.05);
                    (center.x + dx, center.y + dy, rng.random_range(0.1..5.0))
                })
                .collect();
            Cluster::of(&hits)
        })
        .collect()
}

/// Random tracks inside the same area as the clusters.
pub fn random_tracks(n: usize, seed: u64) -> Vec<Track> {
    let mut rng = StdRng::seed_from_u64(seed);
    let area = Bounds::from_extents(-2.5, 2.5, -3.0, 3.0);
    (0..n)
        .map(|_| {
            let p = random_point(&mut rng, &area);
            Track::at(p.x, p.y)
        })
        .collect()
}
