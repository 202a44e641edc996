#![no_main]

use libfuzzer_sys::fuzz_target;

use mbsim_spectral::SpectrumAnalyzer;

fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }
    let dt = f64::from_le_bytes(data[0..8].try_into().unwrap());
    // Cap the signal length for speed
    let signal: Vec<f64> = data[8..]
        .chunks_exact(8)
        .take(4096)
        .map(|c| f64::from_le_bytes(c.try_into().unwrap()))
        .collect();

    let analyzer = SpectrumAnalyzer::new();
    let Ok(spectrum) = analyzer.analyze(&signal, dt) else {
        return;
    };
    assert_eq!(spectrum.len(), signal.len() / 2 + 1);
    assert_eq!(spectrum.sample_count(), signal.len());
    assert_eq!(spectrum.frequencies().len(), spectrum.magnitudes().len());
});
