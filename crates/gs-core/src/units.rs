// gs-core/src/units.rs

use uom::si::f64::{Length as UomLength, Mass as UomMass, Time as UomTime};

// Public canonical unit types (SI, f64)
pub type Length = UomLength;
pub type Mass = UomMass;
pub type Time = UomTime;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

/// Julian years (365.25 days each) as an SI time.
#[inline]
pub fn years(v: f64) -> Time {
    s(constants::years_to_seconds(v))
}

/// Raw seconds held by a [`Time`].
#[inline]
pub fn as_seconds(t: Time) -> f64 {
    use uom::si::time::second;
    t.get::<second>()
}

pub mod constants {
    use super::*;

    /// Gravitational constant (m³ kg⁻¹ s⁻²)
    pub const G: f64 = 6.674_30e-11;
    /// kg
    pub const SOLAR_MASS: f64 = 1.989e30;
    /// kg
    pub const EARTH_MASS: f64 = 5.972e24;
    /// Astronomical unit (m)
    pub const AU: f64 = 1.496e11;
    pub const DAY_SECONDS: f64 = 86_400.0;
    pub const JULIAN_YEAR_SECONDS: f64 = 365.25 * DAY_SECONDS;

    #[inline]
    pub fn years_to_seconds(years: f64) -> f64 {
        years * JULIAN_YEAR_SECONDS
    }

    #[inline]
    pub fn seconds_to_years(seconds: f64) -> f64 {
        seconds / JULIAN_YEAR_SECONDS
    }

    #[inline]
    pub fn solar_mass() -> Mass {
        kg(SOLAR_MASS)
    }

    #[inline]
    pub fn earth_mass() -> Mass {
        kg(EARTH_MASS)
    }

    #[inline]
    pub fn au() -> Length {
        m(AU)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _l = m(2.0);
        let _m = kg(1.0);
        let _dt = s(0.1);
        let _au = constants::au();
        let _sun = constants::solar_mass();
        let _earth = constants::earth_mass();
    }

    #[test]
    fn one_year_is_julian() {
        assert_eq!(constants::years_to_seconds(1.0), 31_557_600.0);
        assert_eq!(as_seconds(years(2.0)), 63_115_200.0);
    }

    #[test]
    fn year_conversion_round_trips() {
        let secs = constants::years_to_seconds(3.5);
        assert!((constants::seconds_to_years(secs) - 3.5).abs() < 1e-12);
    }
}
