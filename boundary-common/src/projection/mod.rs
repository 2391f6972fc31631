/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 05/03/2026
Last Modified: 02/09/2026
License: MIT

Notes: Coordinate conversion between geographic coordinates (EPSG:4326,
longitude/latitude in degrees) and a planar metric space, plus geodesic
distance and interpolation. The ring algorithms only see the
`ProjectionProvider` trait, so any backend can stand in for the built-in ones.
*/

mod geodesic;

pub use self::geodesic::{haversine_distance, Geodesic, WGS84};

use crate::error::{Error, Result};
use crate::structures::Point2D;
use std::f64::consts::PI;

/// Authority id of the geographic CRS every operation expects.
pub const GEOGRAPHIC_CRS: &str = "EPSG:4326";

/// Converts between geographic and planar coordinates and measures along
/// the geodesic.
pub trait ProjectionProvider {
    /// Geographic (lon, lat) to planar (x, y).
    fn to_metric(&self, p: &Point2D) -> Result<Point2D>;

    /// Planar (x, y) back to geographic (lon, lat).
    fn to_geographic(&self, p: &Point2D) -> Result<Point2D>;

    /// Geodesic distance between two geographic points, in metres.
    fn geodesic_distance(&self, p1: &Point2D, p2: &Point2D) -> Result<f64>;

    /// `n` points strictly between p1 and p2, evenly spaced along the
    /// geodesic, ordered from p1 towards p2. The endpoints are not included.
    fn geodesic_interpolate(&self, p1: &Point2D, p2: &Point2D, n: usize) -> Result<Vec<Point2D>>;
}

/// Spherical Web Mercator (EPSG:3857) for the planar space and the WGS84
/// ellipsoid for geodesics.
#[derive(Clone, Debug)]
pub struct WebMercator {
    radius: f64,
    geodesic: Geodesic,
}

impl Default for WebMercator {
    fn default() -> Self {
        WebMercator {
            radius: WGS84.a,
            geodesic: WGS84,
        }
    }
}

impl WebMercator {
    pub fn new() -> WebMercator {
        WebMercator::default()
    }
}

impl ProjectionProvider for WebMercator {
    fn to_metric(&self, p: &Point2D) -> Result<Point2D> {
        if !p.is_finite() || p.y.abs() >= 90f64 {
            return Err(Error::Transform(format!(
                "cannot project {} to EPSG:3857",
                p
            )));
        }
        let x = self.radius * p.x.to_radians();
        let y = self.radius * (PI / 4f64 + p.y.to_radians() / 2f64).tan().ln();
        Ok(Point2D::new(x, y))
    }

    fn to_geographic(&self, p: &Point2D) -> Result<Point2D> {
        if !p.is_finite() {
            return Err(Error::Transform(format!(
                "cannot unproject {} from EPSG:3857",
                p
            )));
        }
        let lon = (p.x / self.radius).to_degrees();
        let lat = (2f64 * (p.y / self.radius).exp().atan() - PI / 2f64).to_degrees();
        Ok(Point2D::new(lon, lat))
    }

    fn geodesic_distance(&self, p1: &Point2D, p2: &Point2D) -> Result<f64> {
        check_geographic(p1)?;
        check_geographic(p2)?;
        Ok(self.geodesic.distance(p1, p2))
    }

    fn geodesic_interpolate(&self, p1: &Point2D, p2: &Point2D, n: usize) -> Result<Vec<Point2D>> {
        check_geographic(p1)?;
        check_geographic(p2)?;
        Ok(self.geodesic.intermediate_points(p1, p2, n))
    }
}

/// Treats coordinates as already planar: both transforms are the identity
/// and the "geodesic" is the straight segment. Useful when the input is
/// projected already, and in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlanarIdentity;

impl ProjectionProvider for PlanarIdentity {
    fn to_metric(&self, p: &Point2D) -> Result<Point2D> {
        Ok(*p)
    }

    fn to_geographic(&self, p: &Point2D) -> Result<Point2D> {
        Ok(*p)
    }

    fn geodesic_distance(&self, p1: &Point2D, p2: &Point2D) -> Result<f64> {
        Ok(p1.distance(p2))
    }

    fn geodesic_interpolate(&self, p1: &Point2D, p2: &Point2D, n: usize) -> Result<Vec<Point2D>> {
        let step = 1f64 / (n + 1) as f64;
        Ok((1..=n).map(|i| p1.lerp(p2, i as f64 * step)).collect())
    }
}

fn check_geographic(p: &Point2D) -> Result<()> {
    if !p.is_finite() || p.y.abs() > 90f64 {
        return Err(Error::Transform(format!(
            "{} is not a valid longitude/latitude",
            p
        )));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{PlanarIdentity, ProjectionProvider, WebMercator};
    use crate::structures::Point2D;

    #[test]
    fn test_web_mercator_known_values() {
        let wm = WebMercator::new();
        let p = wm.to_metric(&Point2D::new(180.0, 0.0)).unwrap();
        assert!((p.x - 20037508.342789244).abs() < 1e-6);
        assert!(p.y.abs() < 1e-9);

        let p = wm.to_metric(&Point2D::new(0.0, 85.0511287798066)).unwrap();
        assert!((p.y - 20037508.342789244).abs() < 1e-3);
    }

    #[test]
    fn test_web_mercator_round_trip() {
        let wm = WebMercator::new();
        let g = Point2D::new(-73.5673, 45.5017);
        let back = wm.to_geographic(&wm.to_metric(&g).unwrap()).unwrap();
        assert!((back.x - g.x).abs() < 1e-9);
        assert!((back.y - g.y).abs() < 1e-9);
    }

    #[test]
    fn test_web_mercator_rejects_poles() {
        let wm = WebMercator::new();
        assert!(wm.to_metric(&Point2D::new(0.0, 90.0)).is_err());
        assert!(wm.to_metric(&Point2D::new(f64::NAN, 0.0)).is_err());
        assert!(wm
            .geodesic_distance(&Point2D::new(0.0, 91.0), &Point2D::new(0.0, 0.0))
            .is_err());
    }

    #[test]
    fn test_planar_identity_interpolate() {
        let pts = PlanarIdentity
            .geodesic_interpolate(&Point2D::new(0.0, 0.0), &Point2D::new(9.0, 0.0), 2)
            .unwrap();
        assert_eq!(pts, vec![Point2D::new(3.0, 0.0), Point2D::new(6.0, 0.0)]);
    }
}
