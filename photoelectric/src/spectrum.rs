//! Approximate display colour of light by wavelength
//!
//! Piecewise-linear fit after Dan Bruton's spectrum approximation. Light
//! below 350 nm is invisible and drawn as neutral grey.

/// RGB in `[0, 1]`
pub fn wavelength_to_rgb(wavelength_nm: f32) -> [f32; 3] {
    let w = wavelength_nm;
    let (r, g, b) = if w < 350.0 {
        (0.5, 0.5, 0.5)
    } else if w < 380.0 {
        ((w - 350.0) / 60.0 + 0.5, (380.0 - w) / 60.0, (w - 350.0) / 60.0 + 0.5)
    } else if w < 440.0 {
        ((440.0 - w) / 60.0, 0.0, 1.0)
    } else if w < 490.0 {
        (0.0, (w - 440.0) / 50.0, 1.0)
    } else if w < 510.0 {
        (0.0, 1.0, (510.0 - w) / 20.0)
    } else if w < 580.0 {
        ((w - 510.0) / 70.0, 1.0, 0.0)
    } else if w < 645.0 {
        (1.0, (645.0 - w) / 65.0, 0.0)
    } else if w <= 780.0 {
        (1.0, 0.0, 0.0)
    } else {
        (0.0, 0.0, 0.0)
    };
    [r, g, b]
}

/// RGBA with the given alpha
pub fn wavelength_to_rgba(wavelength_nm: f32, alpha: f32) -> [f32; 4] {
    let [r, g, b] = wavelength_to_rgb(wavelength_nm);
    [r, g, b, alpha]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn test_ultraviolet_is_grey() {
        assert_eq!(wavelength_to_rgb(100.0), [0.5, 0.5, 0.5]);
        assert_eq!(wavelength_to_rgb(349.0), [0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_visible_bands() {
        assert!(close(wavelength_to_rgb(440.0), [0.0, 0.0, 1.0]));
        assert!(close(wavelength_to_rgb(500.0), [0.0, 1.0, 0.5]));
        assert!(close(wavelength_to_rgb(580.0), [1.0, 1.0, 0.0]));
        assert!(close(wavelength_to_rgb(700.0), [1.0, 0.0, 0.0]));
        assert!(close(wavelength_to_rgb(900.0), [0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_components_stay_in_unit_range() {
        for w in (100..=800).step_by(5) {
            for c in wavelength_to_rgb(w as f32) {
                assert!((0.0..=1.0).contains(&c), "{} nm -> {}", w, c);
            }
        }
    }
}
