//! API operations concerning aligned features and their annotations:
//! formula candidates, structure candidates, compound classes and spectral
//! library matches.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::api::{
    ApiRequest, DataResponse, PagedModel, PlainText, QueryParams,
    compound::InstrumentProfile,
    quant::{QuantificationMeasure, QuantificationTable, TraceSet},
    segment,
    spectrum::{
        AnnotatedMsMsData, AnnotatedSpectrum, BasicSpectrum, IsotopePatternAnnotation, MsData,
    },
    tag::Tag,
};

api_enum! {
    /// The quality of the data underlying a feature.
    pub enum DataQuality {
        "NOT_APPLICABLE" => NotApplicable,
        "LOWEST" => Lowest,
        "BAD" => Bad,
        "DECENT" => Decent,
        "GOOD" => Good,
    }
}

api_enum! {
    /// Optional fields of an [AlignedFeature].
    pub enum AlignedFeatureOptField {
        "msData" => MsData,
        "topAnnotations" => TopAnnotations,
        "topAnnotationsDeNovo" => TopAnnotationsDeNovo,
        "computedTools" => ComputedTools,
        "tags" => Tags,
    }
}

api_enum! {
    /// Optional fields of a [FormulaCandidate].
    pub enum FormulaCandidateOptField {
        "statistics" => Statistics,
        "fragmentationTree" => FragmentationTree,
        "annotatedSpectrum" => AnnotatedSpectrum,
        "isotopePattern" => IsotopePattern,
        "lipidAnnotation" => LipidAnnotation,
        "predictedFingerprint" => PredictedFingerprint,
        "compoundClasses" => CompoundClasses,
        "canopusPredictions" => CanopusPredictions,
    }
}

api_enum! {
    /// Optional fields of a [StructureCandidate].
    pub enum StructureCandidateOptField {
        "fingerprint" => Fingerprint,
        "dbLinks" => DbLinks,
        "libraryMatches" => LibraryMatches,
        "structureSvg" => StructureSvg,
    }
}

api_enum! {
    /// Optional fields of a [SpectralLibraryMatch].
    pub enum SpectralLibraryMatchOptField {
        "referenceSpectrum" => ReferenceSpectrum,
    }
}

api_enum! {
    /// How much a quality check weighs into the overall quality.
    pub enum QualityWeight {
        "MINOR" => Minor,
        "MAJOR" => Major,
        "CRITICAL" => Critical,
    }
}

api_enum! {
    /// Whether a library match is an identity or an analog hit.
    pub enum SpectralMatchType {
        "IDENTITY" => Identity,
        "ANALOG" => Analog,
    }
}

/// Which tools have results for a feature.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComputedSubtools {
    /// Spectral library search.
    pub library_search: bool,
    /// Molecular formula identification.
    pub formula_search: bool,
    /// ZODIAC re-ranking.
    pub zodiac: bool,
    /// Fingerprint prediction.
    pub fingerprint: bool,
    /// CANOPUS compound class prediction.
    pub canopus: bool,
    /// Database structure search.
    pub structure_search: bool,
    /// De novo structure generation.
    pub de_novo_search: bool,
}

/// The top-ranked annotations of a feature.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureAnnotations {
    /// The best formula candidate.
    pub formula_annotation: Option<FormulaCandidate>,
    /// The best structure candidate.
    pub structure_annotation: Option<StructureCandidate>,
    /// The predicted compound classes of the best formula.
    pub compound_class_annotation: Option<CompoundClasses>,
    /// Confidence that the structure is an exact match.
    pub confidence_exact_match: Option<f64>,
    /// Confidence that the structure is an approximate match.
    pub confidence_approx_match: Option<f64>,
    /// Whether the structure was found by expanding the searched databases.
    pub expansive_search_state: Option<String>,
}

/// A feature aligned across the runs of a project.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignedFeature {
    /// The feature id, unique within the project.
    pub aligned_feature_id: String,
    /// The compound the feature belongs to.
    pub compound_id: Option<String>,
    /// An optional display name.
    pub name: Option<String>,
    /// An id assigned by external tools.
    pub external_feature_id: Option<String>,
    /// The m/z of the ion.
    pub ion_mass: Option<f64>,
    /// The charge of the ion.
    pub charge: Option<i32>,
    /// Adducts detected during preprocessing.
    #[serde(default)]
    pub detected_adducts: Vec<String>,
    /// The retention time at which the feature starts.
    pub rt_start_seconds: Option<f64>,
    /// The retention time at which the feature ends.
    pub rt_end_seconds: Option<f64>,
    /// The retention time of the apex.
    pub rt_apex_seconds: Option<f64>,
    /// The quality of the underlying data.
    pub quality: Option<DataQuality>,
    /// True if the feature has MS1 data.
    pub has_ms1: Option<bool>,
    /// True if the feature has MS/MS data.
    pub has_ms_ms: Option<bool>,
    /// Only set with [AlignedFeatureOptField::MsData].
    pub ms_data: Option<MsData>,
    /// Only set with [AlignedFeatureOptField::TopAnnotations].
    pub top_annotations: Option<FeatureAnnotations>,
    /// Only set with [AlignedFeatureOptField::TopAnnotationsDeNovo].
    pub top_annotations_de_novo: Option<FeatureAnnotations>,
    /// True while a job is computing this feature.
    pub computing: Option<bool>,
    /// Only set with [AlignedFeatureOptField::ComputedTools].
    pub computed_tools: Option<ComputedSubtools>,
    /// Tags by tag name. Only set with [AlignedFeatureOptField::Tags].
    pub tags: Option<BTreeMap<String, Tag>>,
}

impl DataResponse for AlignedFeature {}

/// A feature to import.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureImport {
    /// An optional display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// An id assigned by external tools.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_feature_id: Option<String>,
    /// The m/z of the ion.
    pub ion_mass: f64,
    /// The charge of the ion.
    pub charge: i32,
    /// Adducts already known for the feature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_adducts: Option<Vec<String>>,
    /// The retention time at which the feature starts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rt_start_seconds: Option<f64>,
    /// The retention time at which the feature ends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rt_end_seconds: Option<f64>,
    /// The retention time of the apex.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rt_apex_seconds: Option<f64>,
    /// The quality of the data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_quality: Option<DataQuality>,
    /// A merged MS1 spectrum.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged_ms1: Option<BasicSpectrum>,
    /// Individual MS1 spectra.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ms1_spectra: Option<Vec<BasicSpectrum>>,
    /// MS/MS spectra.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ms2_spectra: Option<Vec<BasicSpectrum>>,
}

/// A mass deviation.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct Deviation {
    /// In parts per million.
    pub ppm: Option<f64>,
    /// In Dalton.
    pub absolute: Option<f64>,
}

/// A candidate molecular formula and ion type for a feature.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaCandidate {
    /// The candidate id, unique within the feature.
    pub formula_id: String,
    /// The neutral molecular formula.
    pub molecular_formula: Option<String>,
    /// The adduct, e.g. `[M+H]+`.
    pub adduct: Option<String>,
    /// The rank among all candidates of the feature.
    pub rank: Option<u32>,
    /// The SIRIUS score normalized to a probability.
    pub sirius_score_normalized: Option<f64>,
    /// The SIRIUS score.
    pub sirius_score: Option<f64>,
    /// The isotope pattern score.
    pub isotope_score: Option<f64>,
    /// The fragmentation tree score.
    pub tree_score: Option<f64>,
    /// The ZODIAC score, if ZODIAC was run.
    pub zodiac_score: Option<f64>,
    /// Only set with [FormulaCandidateOptField::Statistics].
    pub num_of_explained_peaks: Option<u32>,
    /// The number of peaks that could have been explained.
    pub num_of_explainable_peaks: Option<u32>,
    /// The share of intensity explained by the tree.
    pub total_explained_intensity: Option<f64>,
    /// The median mass deviation of explained peaks.
    pub median_mass_deviation: Option<Deviation>,
    /// Only set with [FormulaCandidateOptField::FragmentationTree].
    pub fragmentation_tree: Option<FragmentationTree>,
    /// Only set with [FormulaCandidateOptField::AnnotatedSpectrum].
    pub annotated_spectrum: Option<AnnotatedSpectrum>,
    /// Only set with [FormulaCandidateOptField::IsotopePattern].
    pub isotope_pattern_annotation: Option<IsotopePatternAnnotation>,
    /// Only set with [FormulaCandidateOptField::LipidAnnotation].
    pub lipid_annotation: Option<LipidAnnotation>,
    /// Only set with [FormulaCandidateOptField::PredictedFingerprint].
    pub predicted_fingerprint: Option<Vec<f64>>,
    /// Only set with [FormulaCandidateOptField::CompoundClasses].
    pub compound_classes: Option<CompoundClasses>,
    /// Only set with [FormulaCandidateOptField::CanopusPredictions].
    pub canopus_prediction: Option<CanopusPrediction>,
}

impl DataResponse for FormulaCandidate {}

/// A link to an entry in a structure database.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DbLink {
    /// The database name.
    pub name: String,
    /// The id within that database.
    pub id: Option<String>,
}

/// A candidate structure for a feature, from a database search or de novo
/// generation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureCandidate {
    /// The 2D InChIKey.
    pub inchi_key: String,
    /// The SMILES.
    pub smiles: Option<String>,
    /// The name, if a database provided one.
    pub structure_name: Option<String>,
    /// Only set with [StructureCandidateOptField::StructureSvg].
    pub structure_svg: Option<String>,
    /// The partition coefficient.
    #[serde(rename = "xlogP")]
    pub xlog_p: Option<f64>,
    /// Only set with [StructureCandidateOptField::DbLinks].
    pub db_links: Option<Vec<DbLink>>,
    /// Only set with [StructureCandidateOptField::LibraryMatches].
    pub spectral_library_matches: Option<Vec<SpectralLibraryMatch>>,
    /// The rank among all candidates.
    pub rank: Option<u32>,
    /// The CSI:FingerID score.
    pub csi_score: Option<f64>,
    /// The Tanimoto similarity of the candidate's fingerprint to the
    /// predicted one.
    pub tanimoto_similarity: Option<f64>,
    /// The MCES distance to the top-ranked candidate.
    pub mces_dist_to_top_hit: Option<f64>,
    /// Only set with [StructureCandidateOptField::Fingerprint].
    pub fingerprint: Option<serde_json::Value>,
    /// The molecular formula of the candidate. Set when listing candidates
    /// across all formulas.
    pub molecular_formula: Option<String>,
    /// The adduct the candidate was found for.
    pub adduct: Option<String>,
    /// The formula candidate the structure belongs to.
    pub formula_id: Option<String>,
}

impl DataResponse for StructureCandidate {}

/// A node of a fragmentation tree.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentNode {
    /// The index of the fragment within the tree.
    pub fragment_id: i32,
    /// The formula of the fragment.
    pub molecular_formula: Option<String>,
    /// The ion type of the fragment.
    pub adduct: Option<String>,
    /// The mass deviation in Dalton.
    pub mass_deviation_da: Option<f64>,
    /// The mass deviation in ppm.
    pub mass_deviation_ppm: Option<f64>,
    /// The score of the fragment.
    pub score: Option<f64>,
    /// The intensity of the explained peak.
    pub intensity: Option<f64>,
    /// The m/z of the explained peak.
    pub mz: Option<f64>,
}

/// An edge of a fragmentation tree.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LossEdge {
    /// The parent fragment.
    pub source_fragment_idx: i32,
    /// The child fragment.
    pub target_fragment_idx: i32,
    /// The formula of the neutral loss.
    pub molecular_formula: Option<String>,
    /// The score of the loss.
    pub score: Option<f64>,
}

/// A fragmentation tree explaining the MS/MS data of a feature.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentationTree {
    /// The fragments.
    #[serde(default)]
    pub fragments: Vec<FragmentNode>,
    /// The losses between fragments.
    #[serde(default)]
    pub losses: Vec<LossEdge>,
    /// The total score of the tree.
    pub tree_score: Option<f64>,
    /// The formula of the root.
    pub molecular_formula: Option<String>,
    /// The ion type of the root.
    pub adduct: Option<String>,
}

impl DataResponse for FragmentationTree {}

/// A lipid class annotation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LipidAnnotation {
    /// The lipid species, e.g. `PC(34:1)`.
    pub lipid_species: Option<String>,
    /// The LIPID MAPS id of the class.
    pub lipid_maps_id: Option<String>,
    /// The name of the lipid class.
    pub lipid_class_name: Option<String>,
    /// A SMILES for a hypothetical structure of the species.
    pub hypothetical_structure: Option<String>,
    /// True if the chain composition could not be determined.
    pub chains_unknown: Option<bool>,
}

impl DataResponse for LipidAnnotation {}

/// A compound class from the ClassyFire or NPC ontology.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundClass {
    /// The ontology, `ClassyFire` or `NPC`.
    #[serde(rename = "type")]
    pub class_type: Option<String>,
    /// The level within the ontology, e.g. `Superclass`.
    pub level: Option<String>,
    /// The numeric level.
    pub level_index: Option<i32>,
    /// The class name.
    pub name: String,
    /// A description of the class.
    pub description: Option<String>,
    /// The id within the ontology.
    pub id: Option<i32>,
    /// The predicted probability.
    pub probability: Option<f64>,
    /// The index in the prediction vector.
    pub index: Option<i32>,
    /// The id of the parent class.
    pub parent_id: Option<i32>,
    /// The name of the parent class.
    pub parent_name: Option<String>,
}

/// The most likely compound classes of a formula candidate.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundClasses {
    /// The NPC pathway.
    pub npc_pathway: Option<CompoundClass>,
    /// The NPC superclass.
    pub npc_superclass: Option<CompoundClass>,
    /// The NPC class.
    pub npc_class: Option<CompoundClass>,
    /// The most specific ClassyFire class and its ancestors.
    #[serde(default)]
    pub classy_fire_lineage: Vec<CompoundClass>,
    /// Alternative ClassyFire classes.
    #[serde(default)]
    pub classy_fire_alternatives: Vec<CompoundClass>,
}

impl DataResponse for CompoundClasses {}

/// All class probabilities predicted by CANOPUS.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanopusPrediction {
    /// ClassyFire classes.
    #[serde(default)]
    pub classy_fire_classes: Vec<CompoundClass>,
    /// NPC classes.
    #[serde(default)]
    pub npc_classes: Vec<CompoundClass>,
}

impl DataResponse for CanopusPrediction {}

/// A match of a feature's spectrum against a reference library.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectralLibraryMatch {
    /// The match id.
    pub spec_match_id: Option<String>,
    /// The rank among all matches of the feature.
    pub rank: Option<u32>,
    /// The spectral similarity.
    pub similarity: f64,
    /// The number of shared peaks.
    pub shared_peaks: Option<u32>,
    /// The index of the query spectrum in the feature's MS/MS data.
    pub query_spectrum_index: Option<i32>,
    /// The library.
    pub db_name: Option<String>,
    /// The id of the reference within the library.
    pub db_id: Option<String>,
    /// The UUID of the reference spectrum.
    pub uuid: Option<i64>,
    /// The SPLASH of the reference spectrum.
    pub splash: Option<String>,
    /// The formula of the reference.
    pub molecular_formula: Option<String>,
    /// The adduct of the reference.
    pub adduct: Option<String>,
    /// The exact mass of the reference.
    pub exact_mass: Option<f64>,
    /// The SMILES of the reference.
    pub smiles: Option<String>,
    /// The 2D InChIKey of the reference.
    pub inchi_key: String,
    /// Whether this is an identity or an analog match.
    #[serde(rename = "type")]
    pub match_type: Option<SpectralMatchType>,
    /// Only set with [SpectralLibraryMatchOptField::ReferenceSpectrum].
    pub reference_spectrum: Option<BasicSpectrum>,
}

impl DataResponse for SpectralLibraryMatch {}

/// Counts and the best hit of a feature's library matches.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectralLibraryMatchSummary {
    /// The best match.
    pub best_match: Option<SpectralLibraryMatch>,
    /// The number of matches.
    pub spectral_match_count: u64,
    /// The number of distinct reference spectra matched.
    pub reference_spectra_count: u64,
    /// The number of distinct database compounds matched.
    pub database_compound_count: u64,
}

impl DataResponse for SpectralLibraryMatchSummary {}

/// A single quality check of a feature.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityItem {
    /// What was checked.
    pub description: String,
    /// The outcome.
    pub quality: Option<DataQuality>,
    /// How much the check counts.
    pub weight: Option<QualityWeight>,
}

/// A group of related quality checks, e.g. peak shape or MS/MS quality.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityCategory {
    /// The category name.
    pub category_name: String,
    /// The combined outcome of the category.
    pub overall_quality: Option<DataQuality>,
    /// The individual checks.
    #[serde(default)]
    pub items: Vec<QualityItem>,
}

/// The data quality report of an aligned feature.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignedFeatureQuality {
    /// The feature.
    pub aligned_feature_id: String,
    /// The combined outcome of all categories.
    pub overall_quality: Option<DataQuality>,
    /// Categories by name.
    #[serde(default)]
    pub categories: BTreeMap<String, QualityCategory>,
}

impl DataResponse for AlignedFeatureQuality {}

impl AlignedFeatureQuality {
    /// The checks that weigh at least as much as `min`, with their
    /// category name, that did not come out good.
    pub fn issues(&self, min: QualityWeight) -> Vec<(&str, &QualityItem)> {
        let rank = |w: &QualityWeight| match w {
            QualityWeight::Minor => 0,
            QualityWeight::Major => 1,
            QualityWeight::Critical => 2,
            QualityWeight::Unknown(_) => 0,
        };

        self.categories
            .values()
            .flat_map(|c| c.items.iter().map(move |i| (c.category_name.as_str(), i)))
            .filter(|(_, i)| i.weight.as_ref().is_some_and(|w| rank(w) >= rank(&min)))
            .filter(|(_, i)| !matches!(i.quality, Some(DataQuality::Good)))
            .collect()
    }
}

fn feature_path(project_id: &str, feature_id: &str) -> String {
    format!(
        "/api/projects/{}/aligned-features/{}",
        segment(project_id),
        segment(feature_id)
    )
}

fn formula_path(project_id: &str, feature_id: &str, formula_id: &str) -> String {
    format!(
        "{}/formulas/{}",
        feature_path(project_id, feature_id),
        segment(formula_id)
    )
}

fn structures_segment(de_novo: bool) -> &'static str {
    if de_novo {
        "denovo-structures"
    } else {
        "db-structures"
    }
}

/// Import aligned features into a project. Each feature becomes its own
/// compound.
#[derive(Debug, Clone)]
pub struct AddAlignedFeatures<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The features to import.
    pub features: &'a [FeatureImport],
    /// The instrument the data was measured with.
    pub profile: Option<InstrumentProfile>,
    /// Optional fields of the returned features.
    pub opt_fields: Option<&'a [AlignedFeatureOptField]>,
}

impl ApiRequest for AddAlignedFeatures<'_> {
    type Response = Vec<AlignedFeature>;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn path(&self) -> String {
        format!("/api/projects/{}/aligned-features", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .opt_param("profile", self.profile.as_ref())
                .opt_fields("optFields", self.opt_fields),
        )
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(self.features)
    }
}

/// Delete an aligned feature.
#[derive(Debug, Clone)]
pub struct DeleteAlignedFeature<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature to delete.
    pub aligned_feature_id: &'a str,
}

impl ApiRequest for DeleteAlignedFeature<'_> {
    type Response = ();

    fn method(&self) -> http::Method {
        http::Method::DELETE
    }

    fn path(&self) -> String {
        feature_path(self.project_id, self.aligned_feature_id)
    }
}

/// Delete several aligned features at once.
#[derive(Debug, Clone)]
pub struct DeleteAlignedFeatures<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The features to delete.
    pub aligned_feature_ids: &'a [&'a str],
}

impl ApiRequest for DeleteAlignedFeatures<'_> {
    type Response = ();

    fn method(&self) -> http::Method {
        http::Method::PUT
    }

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/aligned-features/delete",
            segment(self.project_id)
        )
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(self.aligned_feature_ids)
    }
}

/// Get a single aligned feature.
#[derive(Debug, Clone)]
pub struct GetAlignedFeature<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature to fetch.
    pub aligned_feature_id: &'a str,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [AlignedFeatureOptField]>,
}

impl ApiRequest for GetAlignedFeature<'_> {
    type Response = AlignedFeature;

    fn path(&self) -> String {
        feature_path(self.project_id, self.aligned_feature_id)
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_fields("optFields", self.opt_fields))
    }
}

/// List all aligned features of a project.
#[derive(Debug, Clone)]
pub struct GetAlignedFeatures<'a> {
    /// The project.
    pub project_id: &'a str,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [AlignedFeatureOptField]>,
}

impl ApiRequest for GetAlignedFeatures<'_> {
    type Response = Vec<AlignedFeature>;

    fn path(&self) -> String {
        format!("/api/projects/{}/aligned-features", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_fields("optFields", self.opt_fields))
    }
}

/// List the aligned features of a project, page by page.
#[derive(Debug, Clone)]
pub struct GetAlignedFeaturesPaged<'a> {
    /// The project.
    pub project_id: &'a str,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [AlignedFeatureOptField]>,
}

impl ApiRequest for GetAlignedFeaturesPaged<'_> {
    type Response = PagedModel<AlignedFeature>;

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/aligned-features/page",
            segment(self.project_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_fields("optFields", self.opt_fields))
    }
}

/// Get the spectra of an aligned feature.
#[derive(Debug, Clone)]
pub struct GetMsData<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
}

impl ApiRequest for GetMsData<'_> {
    type Response = MsData;

    fn path(&self) -> String {
        format!(
            "{}/ms-data",
            feature_path(self.project_id, self.aligned_feature_id)
        )
    }
}

/// Get the LC-MS traces of an aligned feature.
#[derive(Debug, Clone)]
pub struct GetFeatureTraces<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// Include all samples belonging to the same merged trace, not only the
    /// ones containing the feature.
    pub include_all: Option<bool>,
}

impl ApiRequest for GetFeatureTraces<'_> {
    type Response = TraceSet;

    fn path(&self) -> String {
        format!(
            "{}/traces",
            feature_path(self.project_id, self.aligned_feature_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_param("includeAll", self.include_all))
    }
}

/// Get the quantification of an aligned feature, as a one-row table.
#[derive(Debug, Clone)]
pub struct GetFeatureQuantification<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// The quantification measure. Defaults to the apex height.
    pub measure: Option<QuantificationMeasure>,
}

impl ApiRequest for GetFeatureQuantification<'_> {
    type Response = QuantificationTable;

    fn path(&self) -> String {
        format!(
            "{}/quantification",
            feature_path(self.project_id, self.aligned_feature_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_param("type", self.measure.as_ref()))
    }
}

/// List the formula candidates of an aligned feature.
#[derive(Debug, Clone)]
pub struct GetFormulaCandidates<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [FormulaCandidateOptField]>,
}

impl ApiRequest for GetFormulaCandidates<'_> {
    type Response = Vec<FormulaCandidate>;

    fn path(&self) -> String {
        format!(
            "{}/formulas",
            feature_path(self.project_id, self.aligned_feature_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_fields("optFields", self.opt_fields))
    }
}

/// List the formula candidates of an aligned feature, page by page.
#[derive(Debug, Clone)]
pub struct GetFormulaCandidatesPaged<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [FormulaCandidateOptField]>,
}

impl ApiRequest for GetFormulaCandidatesPaged<'_> {
    type Response = PagedModel<FormulaCandidate>;

    fn path(&self) -> String {
        format!(
            "{}/formulas/page",
            feature_path(self.project_id, self.aligned_feature_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_fields("optFields", self.opt_fields))
    }
}

/// Get a single formula candidate.
#[derive(Debug, Clone)]
pub struct GetFormulaCandidate<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// The formula candidate.
    pub formula_id: &'a str,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [FormulaCandidateOptField]>,
}

impl ApiRequest for GetFormulaCandidate<'_> {
    type Response = FormulaCandidate;

    fn path(&self) -> String {
        formula_path(self.project_id, self.aligned_feature_id, self.formula_id)
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_fields("optFields", self.opt_fields))
    }
}

/// List the structure candidates of an aligned feature across all formula
/// candidates.
#[derive(Debug, Clone)]
pub struct GetStructureCandidates<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// List de novo generated structures instead of database hits.
    pub de_novo: bool,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [StructureCandidateOptField]>,
}

impl ApiRequest for GetStructureCandidates<'_> {
    type Response = Vec<StructureCandidate>;

    fn path(&self) -> String {
        format!(
            "{}/{}",
            feature_path(self.project_id, self.aligned_feature_id),
            structures_segment(self.de_novo)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_fields("optFields", self.opt_fields))
    }
}

/// Like [GetStructureCandidates], page by page.
#[derive(Debug, Clone)]
pub struct GetStructureCandidatesPaged<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// List de novo generated structures instead of database hits.
    pub de_novo: bool,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [StructureCandidateOptField]>,
}

impl ApiRequest for GetStructureCandidatesPaged<'_> {
    type Response = PagedModel<StructureCandidate>;

    fn path(&self) -> String {
        format!(
            "{}/{}/page",
            feature_path(self.project_id, self.aligned_feature_id),
            structures_segment(self.de_novo)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_fields("optFields", self.opt_fields))
    }
}

/// List the structure candidates of a single formula candidate.
#[derive(Debug, Clone)]
pub struct GetStructureCandidatesByFormula<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// The formula candidate.
    pub formula_id: &'a str,
    /// List de novo generated structures instead of database hits.
    pub de_novo: bool,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [StructureCandidateOptField]>,
}

impl ApiRequest for GetStructureCandidatesByFormula<'_> {
    type Response = Vec<StructureCandidate>;

    fn path(&self) -> String {
        format!(
            "{}/{}",
            formula_path(self.project_id, self.aligned_feature_id, self.formula_id),
            structures_segment(self.de_novo)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_fields("optFields", self.opt_fields))
    }
}

/// Like [GetStructureCandidatesByFormula], page by page.
#[derive(Debug, Clone)]
pub struct GetStructureCandidatesByFormulaPaged<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// The formula candidate.
    pub formula_id: &'a str,
    /// List de novo generated structures instead of database hits.
    pub de_novo: bool,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [StructureCandidateOptField]>,
}

impl ApiRequest for GetStructureCandidatesByFormulaPaged<'_> {
    type Response = PagedModel<StructureCandidate>;

    fn path(&self) -> String {
        format!(
            "{}/{}/page",
            formula_path(self.project_id, self.aligned_feature_id, self.formula_id),
            structures_segment(self.de_novo)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_fields("optFields", self.opt_fields))
    }
}

/// Get the predicted fingerprint of a formula candidate, one probability per
/// molecular property.
#[derive(Debug, Clone)]
pub struct GetFingerprintPrediction<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// The formula candidate.
    pub formula_id: &'a str,
}

impl ApiRequest for GetFingerprintPrediction<'_> {
    type Response = Vec<f64>;

    fn path(&self) -> String {
        format!(
            "{}/fingerprint",
            formula_path(self.project_id, self.aligned_feature_id, self.formula_id)
        )
    }
}

/// Get the fragmentation tree of a formula candidate.
#[derive(Debug, Clone)]
pub struct GetFragTree<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// The formula candidate.
    pub formula_id: &'a str,
}

impl ApiRequest for GetFragTree<'_> {
    type Response = FragmentationTree;

    fn path(&self) -> String {
        format!(
            "{}/fragtree",
            formula_path(self.project_id, self.aligned_feature_id, self.formula_id)
        )
    }
}

/// Get the fragmentation tree of a formula candidate in the native SIRIUS
/// JSON format, unparsed.
#[derive(Debug, Clone)]
pub struct GetSiriusFragTree<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// The formula candidate.
    pub formula_id: &'a str,
}

impl ApiRequest for GetSiriusFragTree<'_> {
    type Response = PlainText;

    fn path(&self) -> String {
        format!(
            "{}/sirius-fragtree",
            formula_path(self.project_id, self.aligned_feature_id, self.formula_id)
        )
    }
}

/// Get the lipid annotation of a formula candidate.
#[derive(Debug, Clone)]
pub struct GetLipidAnnotation<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// The formula candidate.
    pub formula_id: &'a str,
}

impl ApiRequest for GetLipidAnnotation<'_> {
    type Response = LipidAnnotation;

    fn path(&self) -> String {
        format!(
            "{}/lipid-annotation",
            formula_path(self.project_id, self.aligned_feature_id, self.formula_id)
        )
    }
}

/// Get all CANOPUS class probabilities of a formula candidate.
#[derive(Debug, Clone)]
pub struct GetCanopusPrediction<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// The formula candidate.
    pub formula_id: &'a str,
}

impl ApiRequest for GetCanopusPrediction<'_> {
    type Response = CanopusPrediction;

    fn path(&self) -> String {
        format!(
            "{}/canopus-prediction",
            formula_path(self.project_id, self.aligned_feature_id, self.formula_id)
        )
    }
}

/// Get the most likely compound classes of a formula candidate.
#[derive(Debug, Clone)]
pub struct GetBestMatchingCompoundClasses<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// The formula candidate.
    pub formula_id: &'a str,
}

impl ApiRequest for GetBestMatchingCompoundClasses<'_> {
    type Response = CompoundClasses;

    fn path(&self) -> String {
        format!(
            "{}/best-compound-classes",
            formula_path(self.project_id, self.aligned_feature_id, self.formula_id)
        )
    }
}

/// Filters for spectral library matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectralMatchFilter<'a> {
    /// Minimal number of shared peaks.
    pub min_shared_peaks: Option<u32>,
    /// Minimal similarity.
    pub min_similarity: Option<f64>,
    /// Only matches against references with this 2D InChIKey.
    pub inchi_key: Option<&'a str>,
}

impl SpectralMatchFilter<'_> {
    fn to_query(self) -> QueryParams {
        QueryParams::new()
            .opt_param("minSharedPeaks", self.min_shared_peaks)
            .opt_param("minSimilarity", self.min_similarity)
            .opt_param("inchiKey", self.inchi_key)
    }
}

/// List the spectral library matches of an aligned feature.
#[derive(Debug, Clone)]
pub struct GetSpectralLibraryMatches<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// Which matches to list.
    pub filter: SpectralMatchFilter<'a>,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [SpectralLibraryMatchOptField]>,
}

impl ApiRequest for GetSpectralLibraryMatches<'_> {
    type Response = Vec<SpectralLibraryMatch>;

    fn path(&self) -> String {
        format!(
            "{}/spectral-library-matches",
            feature_path(self.project_id, self.aligned_feature_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            self.filter
                .to_query()
                .opt_fields("optFields", self.opt_fields),
        )
    }
}

/// Like [GetSpectralLibraryMatches], page by page.
#[derive(Debug, Clone)]
pub struct GetSpectralLibraryMatchesPaged<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// Which matches to list.
    pub filter: SpectralMatchFilter<'a>,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [SpectralLibraryMatchOptField]>,
}

impl ApiRequest for GetSpectralLibraryMatchesPaged<'_> {
    type Response = PagedModel<SpectralLibraryMatch>;

    fn path(&self) -> String {
        format!(
            "{}/spectral-library-matches/page",
            feature_path(self.project_id, self.aligned_feature_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            self.filter
                .to_query()
                .opt_fields("optFields", self.opt_fields),
        )
    }
}

/// Get a single spectral library match.
#[derive(Debug, Clone)]
pub struct GetSpectralLibraryMatch<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// The match.
    pub match_id: &'a str,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [SpectralLibraryMatchOptField]>,
}

impl ApiRequest for GetSpectralLibraryMatch<'_> {
    type Response = SpectralLibraryMatch;

    fn path(&self) -> String {
        format!(
            "{}/spectral-library-matches/{}",
            feature_path(self.project_id, self.aligned_feature_id),
            segment(self.match_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_fields("optFields", self.opt_fields))
    }
}

/// Summarize the spectral library matches of an aligned feature.
#[derive(Debug, Clone)]
pub struct GetSpectralLibraryMatchesSummary<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// Which matches to count.
    pub filter: SpectralMatchFilter<'a>,
}

impl ApiRequest for GetSpectralLibraryMatchesSummary<'_> {
    type Response = SpectralLibraryMatchSummary;

    fn path(&self) -> String {
        format!(
            "{}/spectral-library-matches/summary",
            feature_path(self.project_id, self.aligned_feature_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(self.filter.to_query())
    }
}

/// Get the data quality report of an aligned feature. Experimental on the
/// server side.
#[derive(Debug, Clone)]
pub struct GetAlignedFeatureQuality<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
}

impl ApiRequest for GetAlignedFeatureQuality<'_> {
    type Response = AlignedFeatureQuality;

    fn path(&self) -> String {
        format!(
            "{}/quality-report",
            feature_path(self.project_id, self.aligned_feature_id)
        )
    }
}

/// Get the adduct network around an aligned feature, with the merged traces
/// of all features in it.
#[derive(Debug, Clone)]
pub struct GetAdductNetwork<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The main feature of the network.
    pub aligned_feature_id: &'a str,
}

impl ApiRequest for GetAdductNetwork<'_> {
    type Response = TraceSet;

    fn path(&self) -> String {
        format!(
            "{}/adducts",
            feature_path(self.project_id, self.aligned_feature_id)
        )
    }
}

/// Get an MS/MS spectrum annotated with the fragmentation tree of a formula
/// candidate.
#[derive(Debug, Clone)]
pub struct GetFormulaAnnotatedSpectrum<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// The formula candidate.
    pub formula_id: &'a str,
    /// The spectrum to annotate. The merged MS/MS is used if unset or
    /// negative.
    pub spectrum_index: Option<i32>,
}

impl ApiRequest for GetFormulaAnnotatedSpectrum<'_> {
    type Response = AnnotatedSpectrum;

    fn path(&self) -> String {
        format!(
            "{}/annotated-spectrum",
            formula_path(self.project_id, self.aligned_feature_id, self.formula_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_param("spectrumIndex", self.spectrum_index))
    }
}

/// Get all MS/MS spectra of a feature annotated with the fragmentation tree
/// of a formula candidate.
#[derive(Debug, Clone)]
pub struct GetFormulaAnnotatedMsMsData<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// The formula candidate.
    pub formula_id: &'a str,
}

impl ApiRequest for GetFormulaAnnotatedMsMsData<'_> {
    type Response = AnnotatedMsMsData;

    fn path(&self) -> String {
        format!(
            "{}/annotated-msmsdata",
            formula_path(self.project_id, self.aligned_feature_id, self.formula_id)
        )
    }
}

/// Get the measured isotope pattern next to the one simulated for a formula
/// candidate.
#[derive(Debug, Clone)]
pub struct GetIsotopePatternAnnotation<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// The formula candidate.
    pub formula_id: &'a str,
}

impl ApiRequest for GetIsotopePatternAnnotation<'_> {
    type Response = IsotopePatternAnnotation;

    fn path(&self) -> String {
        format!(
            "{}/isotope-pattern",
            formula_path(self.project_id, self.aligned_feature_id, self.formula_id)
        )
    }
}

/// Like [GetFormulaAnnotatedSpectrum], with peaks also annotated by the
/// substructures of a structure candidate. Experimental on the server side.
#[derive(Debug, Clone)]
pub struct GetStructureAnnotatedSpectrum<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// The formula candidate.
    pub formula_id: &'a str,
    /// The 2D InChIKey of the structure candidate.
    pub inchi_key: &'a str,
    /// The spectrum to annotate. The merged MS/MS is used if unset or
    /// negative.
    pub spectrum_index: Option<i32>,
}

impl ApiRequest for GetStructureAnnotatedSpectrum<'_> {
    type Response = AnnotatedSpectrum;

    fn path(&self) -> String {
        format!(
            "{}/structures/{}/annotated-spectrum",
            formula_path(self.project_id, self.aligned_feature_id, self.formula_id),
            segment(self.inchi_key)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_param("spectrumIndex", self.spectrum_index))
    }
}

/// Like [GetFormulaAnnotatedMsMsData], with substructure annotations for a
/// structure candidate.
#[derive(Debug, Clone)]
pub struct GetStructureAnnotatedMsMsData<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The feature.
    pub aligned_feature_id: &'a str,
    /// The formula candidate.
    pub formula_id: &'a str,
    /// The 2D InChIKey of the structure candidate.
    pub inchi_key: &'a str,
}

impl ApiRequest for GetStructureAnnotatedMsMsData<'_> {
    type Response = AnnotatedMsMsData;

    fn path(&self) -> String {
        format!(
            "{}/structures/{}/annotated-msmsdata",
            formula_path(self.project_id, self.aligned_feature_id, self.formula_id),
            segment(self.inchi_key)
        )
    }
}
