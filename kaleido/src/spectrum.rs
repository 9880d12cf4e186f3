use crate::Float;

/// Map a wavelength in nanometers to an approximate `[r, g, b]` triple
/// in `[0, 1]`.
///
/// Piecewise-linear ramps over the visible bands delimited by
/// 380/440/490/510/580/645/750 nm, with the violet (< 420 nm) and red
/// (> 700 nm) tails dimmed linearly from 0.3 up to full brightness.
/// Wavelengths outside `[380, 750]` map to black.
///
/// This is a visualization aid, not a colorimetric transform.
#[must_use]
pub fn wavelength_to_rgb(wavelength: Float) -> [Float; 3] {
    if !(380.0..=750.0).contains(&wavelength) {
        return [0.0, 0.0, 0.0];
    }

    let (r, g, b) = if wavelength < 440.0 {
        (-(wavelength - 440.0) / (440.0 - 380.0), 0.0, 1.0)
    } else if wavelength < 490.0 {
        (0.0, (wavelength - 440.0) / (490.0 - 440.0), 1.0)
    } else if wavelength < 510.0 {
        (0.0, 1.0, -(wavelength - 510.0) / (510.0 - 490.0))
    } else if wavelength < 580.0 {
        ((wavelength - 510.0) / (580.0 - 510.0), 1.0, 0.0)
    } else if wavelength < 645.0 {
        (1.0, -(wavelength - 645.0) / (645.0 - 580.0), 0.0)
    } else {
        (1.0, 0.0, 0.0)
    };

    // dim the ends of the visible range
    let factor = if wavelength < 420.0 {
        0.3 + 0.7 * (wavelength - 380.0) / (420.0 - 380.0)
    } else if wavelength > 700.0 {
        0.3 + 0.7 * (750.0 - wavelength) / (750.0 - 700.0)
    } else {
        1.0
    };

    [r * factor, g * factor, b * factor]
}
