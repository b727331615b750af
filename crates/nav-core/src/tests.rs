//! Unit tests for nav-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ManeuverIndex, StopIndex};

    #[test]
    fn index_roundtrip() {
        let id = StopIndex(4);
        assert_eq!(id.index(), 4);
        assert_eq!(StopIndex::try_from(4usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(StopIndex(1) < StopIndex(2));
        assert!(ManeuverIndex(0) < ManeuverIndex(1));
    }

    #[test]
    fn display() {
        assert_eq!(StopIndex(7).to_string(), "StopIndex(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{GeoPoint, LocalFrame};

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(33.979, -81.257);
        assert!(p.distance_m(p) < 0.001);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111 km
        let a = GeoPoint::new(30.0, -88.0);
        let b = GeoPoint::new(31.0, -88.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
    }

    #[test]
    fn bearings() {
        let o = GeoPoint::new(0.0, 0.0);
        assert!((o.bearing_deg(GeoPoint::new(0.0, 1.0)) - 90.0).abs() < 0.01);
        assert!(o.bearing_deg(GeoPoint::new(1.0, 0.0)).abs() < 0.01);
        assert!((o.bearing_deg(GeoPoint::new(-1.0, 0.0)) - 180.0).abs() < 0.01);
    }

    #[test]
    fn destination_matches_distance_and_bearing() {
        let o = GeoPoint::new(33.979, -81.257);
        let p = o.destination(45.0, 1_000.0);
        assert!((o.distance_m(p) - 1_000.0).abs() < 0.5);
        assert!((o.bearing_deg(p) - 45.0).abs() < 0.1);
    }

    #[test]
    fn lerp_clamps() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 2.0);
        assert_eq!(a.lerp(b, 0.5), GeoPoint::new(0.0, 1.0));
        assert_eq!(a.lerp(b, 3.0), b);
    }

    #[test]
    fn validity() {
        assert!(GeoPoint::new(45.0, 170.0).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn local_frame_roundtrip_and_scale() {
        let frame = LocalFrame::new(GeoPoint::new(33.979, -81.257));
        let p = GeoPoint::new(33.989, -81.247);
        let xy = frame.to_xy(p);
        let back = frame.to_geo(xy);
        assert!((back.lat - p.lat).abs() < 1e-9);
        assert!((back.lon - p.lon).abs() < 1e-9);

        let planar = (xy[0] * xy[0] + xy[1] * xy[1]).sqrt();
        let great_circle = frame.anchor().distance_m(p);
        assert!((planar - great_circle).abs() < 1.0, "{planar} vs {great_circle}");
    }
}

#[cfg(test)]
mod time {
    use crate::FixTime;

    #[test]
    fn arithmetic() {
        let t = FixTime::from_secs(10);
        assert_eq!(t + 500, FixTime(10_500));
        assert_eq!((t + 1_500).as_secs_f64(), 11.5);
    }

    #[test]
    fn display() {
        assert_eq!(FixTime(12_345).to_string(), "12.345s");
    }
}

#[cfg(test)]
mod transport {
    use crate::TravelMode;

    #[test]
    fn default_is_drive() {
        assert_eq!(TravelMode::default(), TravelMode::Drive);
        assert!(TravelMode::Drive.default_speed_mps() > TravelMode::Bike.default_speed_mps());
        assert_eq!(TravelMode::Walk.to_string(), "walk");
    }
}

#[cfg(test)]
mod rng {
    use crate::NoiseRng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = NoiseRng::new(42);
        let mut b = NoiseRng::new(42);
        for _ in 0..16 {
            assert_eq!(a.normal(5.0), b.normal(5.0));
        }
    }

    #[test]
    fn zero_sigma_is_zero() {
        let mut r = NoiseRng::new(1);
        assert_eq!(r.normal(0.0), 0.0);
    }

    #[test]
    fn normal_is_roughly_centered() {
        let mut r = NoiseRng::new(7);
        let n = 4_000;
        let mean: f64 = (0..n).map(|_| r.normal(3.0)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.3, "mean {mean}");
    }
}

#[cfg(test)]
mod display {
    use crate::{format_distance, format_duration};

    #[test]
    fn distances() {
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(-5.0), "0 m");
        assert_eq!(format_distance(994.0), "990 m");
        assert_eq!(format_distance(5_000.0), "5.0 km");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(0.0), "00:00");
        assert_eq!(format_duration(59.4), "00:59");
        assert_eq!(format_duration(3_600.0), "1:00:00");
        assert_eq!(format_duration(f64::INFINITY), "00:00");
    }
}
