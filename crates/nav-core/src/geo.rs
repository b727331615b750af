//! Geographic coordinate type and spatial utilities.
//!
//! `GeoPoint` stores WGS-84 latitude/longitude as `f64`.  Route offsets are
//! compared at sub-metre resolution (arrival at "distance remaining == 0"),
//! which single precision cannot represent far from the equator.
//!
//! Nearest-point searches run in a [`LocalFrame`]: an equirectangular
//! projection anchored at one point of the route.  Within a few hundred
//! kilometres of the anchor the planar error stays well below GPS noise.

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

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

    /// `true` if both components are finite and inside the WGS-84 ranges.
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Initial bearing from `self` to `other` in degrees, `[0, 360)`.
    pub fn bearing_deg(self, other: GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

        (y.atan2(x).to_degrees() + 360.0) % 360.0
    }

    /// Linear interpolation in lat/lon space; `t` is clamped to `[0, 1]`.
    ///
    /// Adequate for the short segments of a road polyline.
    #[inline]
    pub fn lerp(self, other: GeoPoint, t: f64) -> GeoPoint {
        if t <= 0.0 {
            return self;
        }
        if t >= 1.0 {
            return other;
        }
        GeoPoint {
            lat: self.lat + (other.lat - self.lat) * t,
            lon: self.lon + (other.lon - self.lon) * t,
        }
    }

    /// The point `distance_m` metres away along `bearing_deg`.
    pub fn destination(self, bearing_deg: f64, distance_m: f64) -> GeoPoint {
        let delta = distance_m / EARTH_RADIUS_M;
        let theta = bearing_deg.to_radians();
        let lat1 = self.lat.to_radians();
        let lon1 = self.lon.to_radians();

        let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
        let lon2 = lon1
            + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

        GeoPoint {
            lat: lat2.to_degrees(),
            lon: (lon2.to_degrees() + 540.0) % 360.0 - 180.0,
        }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── LocalFrame ────────────────────────────────────────────────────────────────

/// Equirectangular projection to planar metres around an anchor point.
///
/// `x` grows east, `y` grows north.  Cheap to copy; holds no heap data.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocalFrame {
    anchor:  GeoPoint,
    cos_lat: f64,
}

impl LocalFrame {
    pub fn new(anchor: GeoPoint) -> Self {
        Self {
            anchor,
            cos_lat: anchor.lat.to_radians().cos(),
        }
    }

    #[inline]
    pub fn anchor(&self) -> GeoPoint {
        self.anchor
    }

    /// Project `p` to planar `[x, y]` metres.
    #[inline]
    pub fn to_xy(&self, p: GeoPoint) -> [f64; 2] {
        [
            (p.lon - self.anchor.lon).to_radians() * EARTH_RADIUS_M * self.cos_lat,
            (p.lat - self.anchor.lat).to_radians() * EARTH_RADIUS_M,
        ]
    }

    /// Inverse of [`to_xy`][Self::to_xy].
    #[inline]
    pub fn to_geo(&self, xy: [f64; 2]) -> GeoPoint {
        GeoPoint {
            lat: self.anchor.lat + (xy[1] / EARTH_RADIUS_M).to_degrees(),
            lon: self.anchor.lon + (xy[0] / (EARTH_RADIUS_M * self.cos_lat)).to_degrees(),
        }
    }
}
