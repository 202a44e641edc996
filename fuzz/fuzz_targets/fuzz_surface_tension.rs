#![no_main]

use libfuzzer_sys::fuzz_target;

use mbsim_core::{MarmottantShell, PhysicalConstants, RuptureModel, ShellParameters};

fuzz_target!(|data: &[u8]| {
    if data.len() < 17 {
        return;
    }
    let elasticity = f64::from_le_bytes(data[0..8].try_into().unwrap());
    let radius = f64::from_le_bytes(data[8..16].try_into().unwrap());
    let rupture = if data[16] & 1 == 0 {
        RuptureModel::Linear
    } else {
        RuptureModel::Matched
    };

    // Non-positive or non-finite χ must be rejected, never panic
    let Ok(shell) = ShellParameters::with_rupture(elasticity, rupture) else {
        return;
    };
    let constants = PhysicalConstants::default();
    let law = MarmottantShell::new(&constants, &shell);
    if !law.rupture_radius().is_finite() || !radius.is_finite() {
        return;
    }

    let sigma = law.tension(radius);
    assert!(sigma >= 0.0);
    assert!(sigma <= constants.surface_tension.max(law.elastic_tension(law.rupture_radius())));
    if radius <= law.buckling_radius() {
        assert_eq!(sigma, 0.0);
    }
    if radius >= law.rupture_radius() {
        assert_eq!(sigma, constants.surface_tension);
    }
});
