use nalgebra::{Matrix3, Point3, Vector3};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum LatticeError {
    #[error("Box extent along axis {axis} must be positive and finite (got {extent})")]
    DegenerateBox { axis: usize, extent: f64 },
    #[error("A lattice requires at least one oxygen site")]
    Empty,
}

/// An axis-aligned (orthorhombic) periodic simulation box.
///
/// The box is stored as the diagonal cell matrix `h` together with its inverse, so that
/// displacements can be converted to fractional coordinates, wrapped to the nearest
/// periodic image and converted back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimBox {
    h: Matrix3<f64>,
    hinv: Matrix3<f64>,
}

impl SimBox {
    /// Creates a box from its three edge lengths.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::DegenerateBox`] if any length is zero, negative or not
    /// finite, since the cell matrix would not be invertible.
    pub fn orthorhombic(lengths: Vector3<f64>) -> Result<Self, LatticeError> {
        for (axis, &extent) in lengths.iter().enumerate() {
            if !(extent.is_finite() && extent > 0.0) {
                return Err(LatticeError::DegenerateBox { axis, extent });
            }
        }
        let h = Matrix3::from_diagonal(&lengths);
        let hinv = Matrix3::from_diagonal(&lengths.map(|l| 1.0 / l));
        Ok(Self { h, hinv })
    }

    /// Creates a cubic box with edge length `length`.
    pub fn cubic(length: f64) -> Result<Self, LatticeError> {
        Self::orthorhombic(Vector3::repeat(length))
    }

    /// Derives the box from the per-axis span (max - min) of a set of coordinates.
    ///
    /// This assumes the coordinates already span the full periodic cell.
    pub fn from_extents(points: &[Point3<f64>]) -> Result<Self, LatticeError> {
        let first = points.first().ok_or(LatticeError::Empty)?;
        let (min, max) = points
            .iter()
            .fold((first.coords, first.coords), |(min, max), p| {
                (min.inf(&p.coords), max.sup(&p.coords))
            });
        Self::orthorhombic(max - min)
    }

    pub fn h(&self) -> &Matrix3<f64> {
        &self.h
    }

    pub fn hinv(&self) -> &Matrix3<f64> {
        &self.hinv
    }

    /// The three edge lengths of the box.
    pub fn lengths(&self) -> Vector3<f64> {
        self.h.diagonal()
    }

    /// Maps a Cartesian displacement to its shortest periodic image.
    ///
    /// Fractional components are shifted by their nearest integer, with exact halves
    /// rounded to even.
    pub fn minimum_image(&self, displacement: &Vector3<f64>) -> Vector3<f64> {
        let s = self.hinv * displacement;
        let wrapped = s.map(|c| c - c.round_ties_even());
        self.h * wrapped
    }
}

/// Oxygen coordinates of an ice structure together with its periodic box.
///
/// The index of a site in [`Lattice::sites`] is its oxygen index for the rest of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    sites: Vec<Point3<f64>>,
    cell: SimBox,
}

impl Lattice {
    pub fn new(sites: Vec<Point3<f64>>, cell: SimBox) -> Result<Self, LatticeError> {
        if sites.is_empty() {
            return Err(LatticeError::Empty);
        }
        Ok(Self { sites, cell })
    }

    /// Builds a lattice whose box is the coordinate span of the given oxygens.
    pub fn from_coordinates(sites: Vec<Point3<f64>>) -> Result<Self, LatticeError> {
        let cell = SimBox::from_extents(&sites)?;
        Self::new(sites, cell)
    }

    pub fn sites(&self) -> &[Point3<f64>] {
        &self.sites
    }

    pub fn site(&self, index: usize) -> Option<&Point3<f64>> {
        self.sites.get(index)
    }

    pub fn cell(&self) -> &SimBox {
        &self.cell
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Minimum-image displacement pointing from oxygen `from` to oxygen `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn displacement(&self, from: usize, to: usize) -> Vector3<f64> {
        self.cell
            .minimum_image(&(self.sites[to] - self.sites[from]))
    }

    /// Unit vector pointing from oxygen `from` toward the nearest image of oxygen `to`.
    ///
    /// Returns `None` when the two sites coincide under periodic boundaries.
    pub fn direction(&self, from: usize, to: usize) -> Option<Vector3<f64>> {
        self.displacement(from, to).try_normalize(f64::EPSILON)
    }
}
