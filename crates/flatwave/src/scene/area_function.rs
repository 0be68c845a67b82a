//! Vocal-tract area functions.
//!
//! Each vowel is described by 44 equispaced cross-sectional areas in cm²,
//! glottis first, lips last. Sections are [`SECTION_LEN_M`] long, giving a
//! tract of about 17.5 cm.

use crate::config::Vowel;

/// Number of sections in every area function.
pub const SECTIONS: usize = 44;

/// Axial length of one section in meters.
pub const SECTION_LEN_M: f32 = 0.003_968_25;

/// Open back /a/: tight pharynx opening into a wide front cavity.
const AREA_A: [f32; SECTIONS] = [
    0.56, 0.65, 0.65, 0.79, 1.00, 1.10, 1.06, 1.12, 1.25, 1.37, 1.51, 1.33, 1.20, 1.13, 1.10,
    1.06, 1.03, 1.01, 0.98, 0.97, 1.02, 1.16, 1.43, 1.80, 2.30, 2.90, 3.51, 4.11, 4.68, 5.20,
    5.72, 6.22, 6.72, 7.21, 7.65, 8.01, 8.27, 8.39, 8.34, 8.12, 7.74, 7.23, 6.62, 5.95,
];

/// Close back rounded /u/: velar constriction and tight lip rounding.
const AREA_U: [f32; SECTIONS] = [
    0.40, 0.50, 0.66, 0.88, 1.12, 1.40, 1.74, 2.10, 2.45, 2.78, 3.06, 3.26, 3.36, 3.34, 3.18,
    2.88, 2.46, 1.96, 1.44, 0.96, 0.58, 0.35, 0.26, 0.24, 0.30, 0.46, 0.76, 1.18, 1.72, 2.34,
    2.98, 3.60, 4.14, 4.56, 4.84, 4.96, 4.90, 4.64, 4.18, 3.52, 2.70, 1.80, 0.94, 0.32,
];

/// Close front /i/: wide pharynx narrowing to a palatal constriction.
const AREA_I: [f32; SECTIONS] = [
    0.33, 0.45, 0.68, 1.02, 1.44, 1.94, 2.49, 3.07, 3.67, 4.25, 4.79, 5.28, 5.69, 6.02, 6.25,
    6.38, 6.41, 6.33, 6.15, 5.87, 5.50, 5.05, 4.52, 3.94, 3.32, 2.69, 2.08, 1.52, 1.06, 0.71,
    0.48, 0.36, 0.32, 0.33, 0.38, 0.45, 0.53, 0.62, 0.70, 0.78, 0.85, 0.91, 0.96, 1.00,
];

/// Cross-sectional areas in cm² for a vowel, glottis to lips.
pub fn areas(vowel: Vowel) -> &'static [f32; SECTIONS] {
    match vowel {
        Vowel::A => &AREA_A,
        Vowel::U => &AREA_U,
        Vowel::I => &AREA_I,
    }
}

/// Equivalent circular diameters in meters, one per section.
pub fn diameters_m(vowel: Vowel) -> [f32; SECTIONS] {
    let mut out = [0.0; SECTIONS];
    for (d, &area_cm2) in out.iter_mut().zip(areas(vowel)) {
        let area_m2 = area_cm2 * 1e-4;
        *d = 2.0 * (area_m2 / std::f32::consts::PI).sqrt();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_vowel_has_positive_sections() {
        for vowel in [Vowel::A, Vowel::U, Vowel::I] {
            let areas = areas(vowel);
            assert_eq!(areas.len(), SECTIONS);
            assert!(areas.iter().all(|&a| a > 0.0));
        }
    }

    #[test]
    fn vowels_are_distinct() {
        assert_ne!(areas(Vowel::A), areas(Vowel::I));
        assert_ne!(areas(Vowel::U), areas(Vowel::I));
    }

    #[test]
    fn diameters_match_areas() {
        let d = diameters_m(Vowel::A);
        // A = pi (d/2)^2 must invert back to the table entry.
        for (i, &di) in d.iter().enumerate() {
            let area_cm2 = std::f32::consts::PI * (di / 2.0).powi(2) * 1e4;
            assert!(
                (area_cm2 - areas(Vowel::A)[i]).abs() < 1e-3,
                "section {i}: {area_cm2} vs {}",
                areas(Vowel::A)[i]
            );
        }
    }

    #[test]
    fn tract_length_is_anatomical() {
        let length = SECTIONS as f32 * SECTION_LEN_M;
        assert!((length - 0.1746).abs() < 1e-3, "tract length {length} m");
    }
}
