//! Equilibrium carrier statistics
//!
//! Closed-form Boltzmann relations between a band edge, a Fermi level and the
//! carrier density the band holds in equilibrium. These are shared by the
//! parameter set (doping, boundary and intrinsic densities) and the device
//! array builder (trap occupancies), and are pure functions of their
//! arguments.

use crate::constants::BOLTZMANN;
use crate::error::{as_f64, DomainError};
use nalgebra::RealField;

/// Equilibrium electron density in a band of `dos` available states
///
/// `n = dos * exp((fermi_energy - band_edge_energy) / kB T)`. The density
/// increases monotonically as the Fermi level approaches the band edge from
/// below, reaching `dos` when the two coincide.
pub fn equilibrium_electron_density<T: Copy + RealField>(
    dos: T,
    band_edge_energy: T,
    fermi_energy: T,
    temperature: T,
) -> Result<T, DomainError> {
    let thermal_energy = thermal_energy(dos, temperature)?;
    Ok(dos * ((fermi_energy - band_edge_energy) / thermal_energy).exp())
}

/// Equilibrium hole density in a band of `dos` available states
///
/// The complementary relation for the valence-side band edge:
/// `p = dos * exp((band_edge_energy - fermi_energy) / kB T)`.
pub fn equilibrium_hole_density<T: Copy + RealField>(
    dos: T,
    band_edge_energy: T,
    fermi_energy: T,
    temperature: T,
) -> Result<T, DomainError> {
    let thermal_energy = thermal_energy(dos, temperature)?;
    Ok(dos * ((band_edge_energy - fermi_energy) / thermal_energy).exp())
}

fn thermal_energy<T: Copy + RealField>(dos: T, temperature: T) -> Result<T, DomainError> {
    if dos <= T::zero() {
        return Err(DomainError::NonPositiveDensityOfStates { dos: as_f64(dos) });
    }
    if temperature <= T::zero() {
        return Err(DomainError::NonPositiveTemperature {
            temperature: as_f64(temperature),
        });
    }
    Ok(T::from_f64(BOLTZMANN).expect("Must be able to fit the Boltzmann constant in T") * temperature)
}

#[cfg(test)]
mod test {
    use super::{equilibrium_electron_density, equilibrium_hole_density};
    use crate::error::DomainError;
    use approx::assert_relative_eq;

    #[test]
    fn electron_density_reaches_the_density_of_states_at_the_band_edge() {
        let dos = 1e19f64;
        let n = equilibrium_electron_density(dos, -3.8, -3.8, 300.0).unwrap();
        assert_relative_eq!(n, dos);
    }

    #[test]
    fn electron_density_increases_towards_the_band_edge() {
        let dos = 1e19f64;
        let band_edge = -3.8;
        let mut previous = 0.0;
        for fermi in [-5.0, -4.8, -4.6, -4.4, -4.2, -4.0] {
            let n = equilibrium_electron_density(dos, band_edge, fermi, 300.0).unwrap();
            assert!(n > previous);
            previous = n;
        }
    }

    #[test]
    fn hole_density_mirrors_electron_density_about_the_gap_centre() {
        let dos = 1e19f64;
        let (band_edge, valence_edge) = (-3.8, -5.4);
        let midgap = 0.5 * (band_edge + valence_edge);
        let n = equilibrium_electron_density(dos, band_edge, midgap, 300.0).unwrap();
        let p = equilibrium_hole_density(dos, valence_edge, midgap, 300.0).unwrap();
        assert_relative_eq!(n, p, max_relative = 1e-12);
    }

    #[test]
    fn invalid_inputs_raise_domain_errors() {
        let result = equilibrium_electron_density(0.0, -3.8, -4.5, 300.0);
        assert!(matches!(
            result,
            Err(DomainError::NonPositiveDensityOfStates { .. })
        ));
        let result = equilibrium_hole_density(1e19, -5.4, -4.5, 0.0);
        assert!(matches!(
            result,
            Err(DomainError::NonPositiveTemperature { .. })
        ));
        let result = equilibrium_hole_density(1e19, -5.4, -4.5, -10.0);
        assert!(matches!(
            result,
            Err(DomainError::NonPositiveTemperature { .. })
        ));
    }
}
