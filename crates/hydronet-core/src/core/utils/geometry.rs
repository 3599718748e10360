use nalgebra::{Point3, Vector3};

pub fn place_along(origin: &Point3<f64>, unit_direction: &Vector3<f64>, length: f64) -> Point3<f64> {
    origin + unit_direction * length
}

/// Position of a massless virtual site as a linear combination of two bond vectors:
/// `origin + a * (p1 - origin) + b * (p2 - origin)`.
pub fn virtual_site(
    origin: &Point3<f64>,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    a: f64,
    b: f64,
) -> Point3<f64> {
    origin + (p1 - origin) * a + (p2 - origin) * b
}

pub fn bisector_sum(directions: &[Vector3<f64>]) -> Vector3<f64> {
    directions.iter().fold(Vector3::zeros(), |acc, d| acc + d)
}
