//! Coordinate types and spatial utilities.
//!
//! A node carries two positions:
//!
//! - [`Point`]: the *working* coordinate `(x, y)`.  For synthetic or
//!   unprojected networks this is simply `(lon, lat)`; for projected
//!   networks it is in projection units (usually metres).
//! - [`GeoPoint`]: the optional WGS-84 coordinate preserved at load time so
//!   output can always be expressed geographically.
//!
//! Both use `f64`: grid spacings of 0.001° around longitudes > 100° lose
//! visible precision in single-precision floats.

/// A working-space coordinate pair.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// `[x, y]`, the order every output geometry uses.
    #[inline]
    pub fn to_xy(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    /// `[lon, lat]`: geographic x before y.
    #[inline]
    pub fn to_xy(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    /// The working-space point for an unprojected network.
    #[inline]
    pub fn as_point(self) -> Point {
        Point::new(self.lon, self.lat)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
