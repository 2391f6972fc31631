/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 05/03/2026
Last Modified: 02/09/2026
License: MIT
*/

use crate::structures::Point2D;

/// Mean earth radius (m), used by the spherical fallback.
const MEAN_RADIUS: f64 = 6_371_008.8;
const MAX_ITERATIONS: usize = 200;
const CONVERGENCE: f64 = 1e-12;

/// An ellipsoid of revolution, used for Vincenty's inverse and direct
/// geodesic solutions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geodesic {
    /// semi-major axis (m)
    pub a: f64,
    /// flattening
    pub f: f64,
}

pub const WGS84: Geodesic = Geodesic {
    a: 6_378_137.0,
    f: 1.0 / 298.257_223_563,
};

impl Geodesic {
    fn b(&self) -> f64 {
        (1f64 - self.f) * self.a
    }

    /// Vincenty's inverse solution. Returns the distance (m) and the forward
    /// azimuth at p1 (radians, clockwise from north), or `None` when the
    /// iteration fails to converge (nearly antipodal points).
    pub fn inverse(&self, p1: &Point2D, p2: &Point2D) -> Option<(f64, f64)> {
        let f = self.f;
        let b = self.b();
        let l = (p2.x - p1.x).to_radians();
        let u1 = ((1f64 - f) * p1.y.to_radians().tan()).atan();
        let u2 = ((1f64 - f) * p2.y.to_radians().tan()).atan();
        let (sin_u1, cos_u1) = u1.sin_cos();
        let (sin_u2, cos_u2) = u2.sin_cos();

        let mut lambda = l;
        let mut converged = false;
        let (mut sin_sigma, mut cos_sigma, mut sigma) = (0f64, 0f64, 0f64);
        let (mut cos_sq_alpha, mut cos_2sigma_m) = (0f64, 0f64);
        let (mut sin_lambda, mut cos_lambda) = (0f64, 0f64);
        for _ in 0..MAX_ITERATIONS {
            let sc = lambda.sin_cos();
            sin_lambda = sc.0;
            cos_lambda = sc.1;
            let t1 = cos_u2 * sin_lambda;
            let t2 = cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda;
            sin_sigma = (t1 * t1 + t2 * t2).sqrt();
            if sin_sigma == 0f64 {
                // coincident points
                return Some((0f64, 0f64));
            }
            cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
            sigma = sin_sigma.atan2(cos_sigma);
            let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
            cos_sq_alpha = 1f64 - sin_alpha * sin_alpha;
            cos_2sigma_m = if cos_sq_alpha != 0f64 {
                cos_sigma - 2f64 * sin_u1 * sin_u2 / cos_sq_alpha
            } else {
                // equatorial line
                0f64
            };
            let c = f / 16f64 * cos_sq_alpha * (4f64 + f * (4f64 - 3f64 * cos_sq_alpha));
            let lambda_prev = lambda;
            lambda = l
                + (1f64 - c)
                    * f
                    * sin_alpha
                    * (sigma
                        + c * sin_sigma
                            * (cos_2sigma_m
                                + c * cos_sigma * (-1f64 + 2f64 * cos_2sigma_m * cos_2sigma_m)));
            if (lambda - lambda_prev).abs() < CONVERGENCE {
                converged = true;
                break;
            }
        }
        if !converged {
            return None;
        }

        let u_sq = cos_sq_alpha * (self.a * self.a - b * b) / (b * b);
        let (big_a, big_b) = series_coefficients(u_sq);
        let delta_sigma = delta_sigma(big_b, sin_sigma, cos_sigma, cos_2sigma_m);
        let s = b * big_a * (sigma - delta_sigma);
        let azimuth = (cos_u2 * sin_lambda).atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda);
        Some((s, azimuth))
    }

    /// Vincenty's direct solution: the point reached from p1 after travelling
    /// `distance` metres along the geodesic with initial azimuth `azimuth`
    /// (radians, clockwise from north).
    pub fn direct(&self, p1: &Point2D, azimuth: f64, distance: f64) -> Point2D {
        let f = self.f;
        let b = self.b();
        let (sin_alpha1, cos_alpha1) = azimuth.sin_cos();
        let tan_u1 = (1f64 - f) * p1.y.to_radians().tan();
        let cos_u1 = 1f64 / (1f64 + tan_u1 * tan_u1).sqrt();
        let sin_u1 = tan_u1 * cos_u1;
        let sigma1 = tan_u1.atan2(cos_alpha1);
        let sin_alpha = cos_u1 * sin_alpha1;
        let cos_sq_alpha = 1f64 - sin_alpha * sin_alpha;
        let u_sq = cos_sq_alpha * (self.a * self.a - b * b) / (b * b);
        let (big_a, big_b) = series_coefficients(u_sq);

        let mut sigma = distance / (b * big_a);
        let (mut sin_sigma, mut cos_sigma, mut cos_2sigma_m) = (0f64, 0f64, 0f64);
        for _ in 0..MAX_ITERATIONS {
            cos_2sigma_m = (2f64 * sigma1 + sigma).cos();
            let sc = sigma.sin_cos();
            sin_sigma = sc.0;
            cos_sigma = sc.1;
            let sigma_prev = sigma;
            sigma = distance / (b * big_a)
                + delta_sigma(big_b, sin_sigma, cos_sigma, cos_2sigma_m);
            if (sigma - sigma_prev).abs() < CONVERGENCE {
                break;
            }
        }
        let sc = sigma.sin_cos();
        sin_sigma = sc.0;
        cos_sigma = sc.1;
        cos_2sigma_m = (2f64 * sigma1 + sigma).cos();

        let tmp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
        let phi2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
            .atan2((1f64 - f) * (sin_alpha * sin_alpha + tmp * tmp).sqrt());
        let lambda =
            (sin_sigma * sin_alpha1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);
        let c = f / 16f64 * cos_sq_alpha * (4f64 + f * (4f64 - 3f64 * cos_sq_alpha));
        let big_l = lambda
            - (1f64 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1f64 + 2f64 * cos_2sigma_m * cos_2sigma_m)));
        let lon = normalize_longitude(p1.x + big_l.to_degrees());
        Point2D::new(lon, phi2.to_degrees())
    }

    /// Geodesic distance in metres. Falls back to the great-circle distance
    /// on the mean sphere when Vincenty does not converge.
    pub fn distance(&self, p1: &Point2D, p2: &Point2D) -> f64 {
        match self.inverse(p1, p2) {
            Some((s, _)) => s,
            None => haversine_distance(p1, p2),
        }
    }

    /// `n` points evenly spaced along the geodesic strictly between p1 and
    /// p2, excluding both endpoints.
    pub fn intermediate_points(&self, p1: &Point2D, p2: &Point2D, n: usize) -> Vec<Point2D> {
        if n == 0 {
            return vec![];
        }
        match self.inverse(p1, p2) {
            Some((s, azimuth)) => {
                let step = s / (n + 1) as f64;
                (1..=n)
                    .map(|i| self.direct(p1, azimuth, step * i as f64))
                    .collect()
            }
            None => great_circle_points(p1, p2, n),
        }
    }
}

fn series_coefficients(u_sq: f64) -> (f64, f64) {
    let big_a =
        1f64 + u_sq / 16384f64 * (4096f64 + u_sq * (-768f64 + u_sq * (320f64 - 175f64 * u_sq)));
    let big_b = u_sq / 1024f64 * (256f64 + u_sq * (-128f64 + u_sq * (74f64 - 47f64 * u_sq)));
    (big_a, big_b)
}

fn delta_sigma(big_b: f64, sin_sigma: f64, cos_sigma: f64, cos_2sigma_m: f64) -> f64 {
    big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4f64
                * (cos_sigma * (-1f64 + 2f64 * cos_2sigma_m * cos_2sigma_m)
                    - big_b / 6f64
                        * cos_2sigma_m
                        * (-3f64 + 4f64 * sin_sigma * sin_sigma)
                        * (-3f64 + 4f64 * cos_2sigma_m * cos_2sigma_m)))
}

fn normalize_longitude(lon: f64) -> f64 {
    let mut l = (lon + 180f64) % 360f64;
    if l < 0f64 {
        l += 360f64;
    }
    l - 180f64
}

/// Great-circle distance (m) on the mean sphere.
pub fn haversine_distance(p1: &Point2D, p2: &Point2D) -> f64 {
    let phi1 = p1.y.to_radians();
    let phi2 = p2.y.to_radians();
    let d_phi = phi2 - phi1;
    let d_lambda = (p2.x - p1.x).to_radians();
    let h = (d_phi / 2f64).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2f64).sin().powi(2);
    2f64 * MEAN_RADIUS * h.sqrt().min(1f64).asin()
}

/// Spherical linear interpolation between two geographic points.
fn great_circle_points(p1: &Point2D, p2: &Point2D, n: usize) -> Vec<Point2D> {
    let to_vec = |p: &Point2D| {
        let (lat, lon) = (p.y.to_radians(), p.x.to_radians());
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    };
    let v1 = to_vec(p1);
    let v2 = to_vec(p2);
    let dot = (v1[0] * v2[0] + v1[1] * v2[1] + v1[2] * v2[2]).clamp(-1f64, 1f64);
    let omega = dot.acos();
    let sin_omega = omega.sin();
    (1..=n)
        .map(|i| {
            let t = i as f64 / (n + 1) as f64;
            let (w1, w2) = if sin_omega.abs() < 1e-15 {
                (1f64 - t, t)
            } else {
                (
                    ((1f64 - t) * omega).sin() / sin_omega,
                    (t * omega).sin() / sin_omega,
                )
            };
            let x = w1 * v1[0] + w2 * v2[0];
            let y = w1 * v1[1] + w2 * v2[1];
            let z = w1 * v1[2] + w2 * v2[2];
            let lat = z.atan2((x * x + y * y).sqrt());
            let lon = y.atan2(x);
            Point2D::new(lon.to_degrees(), lat.to_degrees())
        })
        .collect()
}
