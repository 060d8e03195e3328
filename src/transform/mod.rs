//! Minna datum to WGS84 coordinate transformation.
//!
//! Each supported zone is a UTM projection on the Clarke 1880 (RGS)
//! ellipsoid. Conversion runs the transverse-mercator inverse, then a
//! geocentric datum shift onto WGS84.

mod ellipsoid;
mod tmerc;
mod transformer;

pub use ellipsoid::{DatumShift, Ellipsoid};
pub use tmerc::TransverseMercator;
pub use transformer::{CoordinateTransformer, PlanarBounds};
