//! Spectra and MS data attached to aligned features.

use serde::{Deserialize, Serialize};

use crate::api::DataResponse;

/// A single peak.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SimplePeak {
    /// The mass-to-charge ratio.
    pub mz: f64,
    /// The (possibly normalized) intensity.
    pub intensity: f64,
}

/// A mass spectrum.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicSpectrum {
    /// An optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The MS level (1 or 2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ms_level: Option<i32>,
    /// The collision energy, e.g. `20 eV` or `20-40 eV`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collision_energy: Option<String>,
    /// The instrument the spectrum was measured with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument: Option<String>,
    /// The precursor m/z of MS/MS spectra.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precursor_mz: Option<f64>,
    /// The scan number within its run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_number: Option<i32>,
    /// True if this spectrum is used as the query for spectral library
    /// search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cosine_query: Option<bool>,
    /// The peaks.
    #[serde(default)]
    pub peaks: Vec<SimplePeak>,
    /// Multiply by this factor to restore absolute intensities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abs_intensity_factor: Option<f64>,
    /// Factor to normalize intensities to a maximum of 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_norm_factor: Option<f64>,
    /// Factor to normalize intensities to a sum of 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum_norm_factor: Option<f64>,
}

/// The spectra measured for an aligned feature.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MsData {
    /// The isotope pattern extracted from MS1 data.
    pub isotope_pattern: Option<BasicSpectrum>,
    /// All MS1 spectra merged into one.
    pub merged_ms1: Option<BasicSpectrum>,
    /// All MS/MS spectra merged into one.
    pub merged_ms2: Option<BasicSpectrum>,
    /// The individual MS1 spectra.
    #[serde(default)]
    pub ms1_spectra: Vec<BasicSpectrum>,
    /// The individual MS/MS spectra.
    #[serde(default)]
    pub ms2_spectra: Vec<BasicSpectrum>,
}

impl DataResponse for MsData {}

/// The fragment a peak was explained by, in the fragmentation tree of a
/// formula candidate.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakAnnotation {
    /// The fragment in the tree.
    pub fragment_id: i32,
    /// The formula of the fragment.
    pub molecular_formula: Option<String>,
    /// The ion type of the fragment.
    pub adduct: Option<String>,
    /// The theoretical mass of the fragment ion.
    pub exact_mass: Option<f64>,
    /// The mass deviation in Dalton.
    pub mass_deviation_mz: Option<f64>,
    /// The mass deviation in ppm.
    pub mass_deviation_ppm: Option<f64>,
    /// The mass deviation after recalibration, in Dalton.
    pub recalibrated_mass_deviation_mz: Option<f64>,
    /// The mass deviation after recalibration, in ppm.
    pub recalibrated_mass_deviation_ppm: Option<f64>,
    /// The edge to the parent fragment. Unset for the root.
    pub parent_peak: Option<ParentPeak>,
    /// Atom indices of the substructure explaining the fragment. Only set
    /// when the spectrum was annotated for a structure candidate.
    pub substructure_atoms: Option<Vec<i32>>,
    /// Bond indices of that substructure.
    pub substructure_bonds: Option<Vec<i32>>,
    /// Bonds cut to produce the substructure.
    pub substructure_bonds_cut: Option<Vec<i32>>,
    /// The score of the substructure assignment.
    pub substructure_score: Option<f32>,
    /// Hydrogen rearrangements needed to explain the fragment.
    pub hydrogen_rearrangements: Option<i32>,
}

/// A loss edge to the parent of an annotated peak.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentPeak {
    /// The formula of the neutral loss.
    pub loss_formula: Option<String>,
    /// The peak index of the parent.
    pub parent_idx: Option<i32>,
    /// The fragment id of the parent.
    pub parent_fragment_id: Option<i32>,
}

/// A peak, and the fragment explaining it if there is one.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedPeak {
    /// The mass-to-charge ratio.
    pub mz: f64,
    /// The (possibly normalized) intensity.
    pub intensity: f64,
    /// Unset for peaks the tree does not explain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak_annotation: Option<PeakAnnotation>,
}

/// What a whole spectrum was annotated with.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectrumAnnotation {
    /// The formula of the precursor.
    pub molecular_formula: Option<String>,
    /// The ion type of the precursor.
    pub adduct: Option<String>,
    /// The theoretical precursor mass.
    pub exact_mass: Option<f64>,
    /// The precursor mass deviation in Dalton.
    pub mass_deviation_mz: Option<f64>,
    /// The precursor mass deviation in ppm.
    pub mass_deviation_ppm: Option<f64>,
    /// SMILES of the structure used for substructure annotation.
    pub structure_annotation_smiles: Option<String>,
    /// Name of that structure.
    pub structure_annotation_name: Option<String>,
    /// SVG depiction of that structure.
    pub structure_annotation_svg: Option<String>,
    /// Score of the substructure annotation.
    pub structure_annotation_score: Option<f64>,
}

/// A spectrum whose peaks are annotated with the fragments of a formula
/// candidate, and optionally the substructures of a structure candidate.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedSpectrum {
    /// An optional display name.
    pub name: Option<String>,
    /// The MS level (1 or 2).
    pub ms_level: Option<i32>,
    /// The collision energy.
    pub collision_energy: Option<String>,
    /// The instrument.
    pub instrument: Option<String>,
    /// The precursor m/z of MS/MS spectra.
    pub precursor_mz: Option<f64>,
    /// The scan number within its run.
    pub scan_number: Option<i32>,
    /// True for the spectrum used as spectral library query.
    pub cosine_query: Option<bool>,
    /// The peaks.
    #[serde(default)]
    pub peaks: Vec<AnnotatedPeak>,
    /// Multiply by this factor to restore absolute intensities.
    pub abs_intensity_factor: Option<f64>,
    /// Factor to normalize intensities to a maximum of 1.
    pub max_norm_factor: Option<f64>,
    /// Factor to normalize intensities to a sum of 1.
    pub sum_norm_factor: Option<f64>,
    /// The annotation of the spectrum as a whole.
    pub spectrum_annotation: Option<SpectrumAnnotation>,
}

impl DataResponse for AnnotatedSpectrum {}

impl AnnotatedSpectrum {
    /// The peaks explained by a fragment.
    pub fn explained_peaks(&self) -> impl Iterator<Item = &AnnotatedPeak> {
        self.peaks.iter().filter(|p| p.peak_annotation.is_some())
    }
}

/// All MS/MS spectra of a feature, annotated.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedMsMsData {
    /// The merged MS/MS spectrum.
    pub merged_ms2: Option<AnnotatedSpectrum>,
    /// The individual MS/MS spectra.
    #[serde(default)]
    pub ms2_spectra: Vec<AnnotatedSpectrum>,
}

impl DataResponse for AnnotatedMsMsData {}

/// The measured isotope pattern of a feature next to the one simulated for a
/// formula candidate.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IsotopePatternAnnotation {
    /// The measured pattern.
    pub isotope_pattern: Option<BasicSpectrum>,
    /// The simulated pattern.
    pub simulated_pattern: Option<BasicSpectrum>,
}

impl DataResponse for IsotopePatternAnnotation {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::test::respond;

    #[test]
    fn parse_ms_data() {
        let body = r#"{
            "mergedMs1": {"msLevel": 1, "peaks": [{"mz": 181.07, "intensity": 1.0}]},
            "ms2Spectra": [
                {"msLevel": 2, "collisionEnergy": "20 eV", "precursorMz": 181.07, "peaks": []}
            ]
        }"#;

        let data = respond::<MsData>(200, body).unwrap();
        assert_eq!(data.merged_ms1.unwrap().peaks[0].mz, 181.07);
        assert!(data.ms1_spectra.is_empty());
        assert_eq!(
            data.ms2_spectra[0].collision_energy.as_deref(),
            Some("20 eV")
        );
    }

    #[test]
    fn parse_annotated_spectrum() {
        let body = r#"{
            "msLevel": 2,
            "precursorMz": 195.0877,
            "peaks": [
                {"mz": 138.0662, "intensity": 0.4, "peakAnnotation": {
                    "fragmentId": 1,
                    "molecularFormula": "C6H7N3O",
                    "massDeviationPpm": 1.2,
                    "parentPeak": {"lossFormula": "C2H3NO", "parentIdx": 1, "parentFragmentId": 0},
                    "substructureAtoms": [0, 1, 2]
                }},
                {"mz": 110.07, "intensity": 0.1}
            ],
            "spectrumAnnotation": {"molecularFormula": "C8H10N4O2", "adduct": "[M+H]+"}
        }"#;

        let spectrum = respond::<AnnotatedSpectrum>(200, body).unwrap();
        let explained: Vec<_> = spectrum.explained_peaks().collect();
        assert_eq!(explained.len(), 1);

        let annotation = explained[0].peak_annotation.as_ref().unwrap();
        assert_eq!(annotation.molecular_formula.as_deref(), Some("C6H7N3O"));
        assert_eq!(
            annotation.parent_peak.as_ref().unwrap().loss_formula.as_deref(),
            Some("C2H3NO")
        );
        assert_eq!(annotation.substructure_atoms, Some(vec![0, 1, 2]));
        assert_eq!(
            spectrum.spectrum_annotation.unwrap().adduct.as_deref(),
            Some("[M+H]+")
        );
    }
}
