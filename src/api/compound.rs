//! API operations concerning compounds: groups of aligned features that are
//! ions of the same molecule.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::api::{
    ApiRequest, DataResponse, PagedModel, QueryParams,
    feature::{
        AlignedFeature, AlignedFeatureOptField, CompoundClasses, FeatureImport, StructureCandidate,
    },
    quant::{QuantificationMeasure, QuantificationTable, TraceSet},
    segment,
    tag::Tag,
};

api_enum! {
    /// The kind of instrument the data was measured with. Determines how
    /// spectra are merged on import.
    pub enum InstrumentProfile {
        "QTOF" => Qtof,
        "ORBITRAP" => Orbitrap,
    }
}

api_enum! {
    /// Optional fields of a [Compound].
    pub enum CompoundOptField {
        "consensusAnnotations" => ConsensusAnnotations,
        "consensusAnnotationsDeNovo" => ConsensusAnnotationsDeNovo,
        "customAnnotations" => CustomAnnotations,
        "tags" => Tags,
    }
}

/// The annotation agreed on by the features of a compound.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusAnnotations {
    /// The consensus molecular formula.
    pub molecular_formula: Option<String>,
    /// The consensus compound classes.
    pub compound_class_annotation: Option<CompoundClasses>,
    /// The features that support the consensus.
    #[serde(default)]
    pub supporting_feature_ids: Vec<String>,
    /// How the consensus was chosen, e.g. `MAJORITY_STRUCTURE`.
    pub selection_criterion: Option<String>,
    /// The consensus structure.
    pub csi_finger_id_structure: Option<StructureCandidate>,
    /// Confidence that the structure is an exact match.
    pub confidence_exact_match: Option<f64>,
    /// Confidence that the structure is an approximate match.
    pub confidence_approx_match: Option<f64>,
}

/// A compound in a project.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Compound {
    /// The compound id, unique within the project.
    pub compound_id: String,
    /// An optional display name.
    pub name: Option<String>,
    /// The earliest retention time of any feature.
    pub rt_start_seconds: Option<f64>,
    /// The latest retention time of any feature.
    pub rt_end_seconds: Option<f64>,
    /// The neutral mass of the compound.
    pub neutral_mass: Option<f64>,
    /// The aligned features (adducts, in-source fragments) of the compound.
    #[serde(default)]
    pub features: Vec<AlignedFeature>,
    /// Only set with [CompoundOptField::ConsensusAnnotations].
    pub consensus_annotations: Option<ConsensusAnnotations>,
    /// Only set with [CompoundOptField::ConsensusAnnotationsDeNovo].
    pub consensus_annotations_de_novo: Option<ConsensusAnnotations>,
    /// Only set with [CompoundOptField::CustomAnnotations].
    pub custom_annotations: Option<ConsensusAnnotations>,
    /// Tags by tag name. Only set with [CompoundOptField::Tags].
    pub tags: Option<BTreeMap<String, Tag>>,
}

impl DataResponse for Compound {}

/// A compound to import.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundImport {
    /// An optional display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The features of the compound, at least one.
    pub features: Vec<FeatureImport>,
}

/// Import compounds and their features into a project.
#[derive(Debug, Clone)]
pub struct AddCompounds<'a> {
    /// The project to import into.
    pub project_id: &'a str,
    /// The compounds to import.
    pub compounds: &'a [CompoundImport],
    /// The instrument the data was measured with.
    pub profile: Option<InstrumentProfile>,
    /// Optional fields of the returned compounds.
    pub opt_fields: Option<&'a [CompoundOptField]>,
    /// Optional fields of the features of the returned compounds.
    pub opt_fields_features: Option<&'a [AlignedFeatureOptField]>,
}

impl ApiRequest for AddCompounds<'_> {
    type Response = Vec<Compound>;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn path(&self) -> String {
        format!("/api/projects/{}/compounds", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .opt_param("profile", self.profile.as_ref())
                .opt_fields("optFields", self.opt_fields)
                .opt_fields("optFieldsFeatures", self.opt_fields_features),
        )
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(self.compounds)
    }
}

/// Delete a compound and all its features.
#[derive(Debug, Clone)]
pub struct DeleteCompound<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The compound to delete.
    pub compound_id: &'a str,
}

impl ApiRequest for DeleteCompound<'_> {
    type Response = ();

    fn method(&self) -> http::Method {
        http::Method::DELETE
    }

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/compounds/{}",
            segment(self.project_id),
            segment(self.compound_id)
        )
    }
}

/// Get a single compound.
#[derive(Debug, Clone)]
pub struct GetCompound<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The compound to fetch.
    pub compound_id: &'a str,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [CompoundOptField]>,
    /// Optional fields to include in the compound's features.
    pub opt_fields_features: Option<&'a [AlignedFeatureOptField]>,
}

impl ApiRequest for GetCompound<'_> {
    type Response = Compound;

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/compounds/{}",
            segment(self.project_id),
            segment(self.compound_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .opt_fields("optFields", self.opt_fields)
                .opt_fields("optFieldsFeatures", self.opt_fields_features),
        )
    }
}

/// List all compounds of a project.
#[derive(Debug, Clone)]
pub struct GetCompounds<'a> {
    /// The project.
    pub project_id: &'a str,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [CompoundOptField]>,
    /// Optional fields to include in the compounds' features.
    pub opt_fields_features: Option<&'a [AlignedFeatureOptField]>,
}

impl ApiRequest for GetCompounds<'_> {
    type Response = Vec<Compound>;

    fn path(&self) -> String {
        format!("/api/projects/{}/compounds", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .opt_fields("optFields", self.opt_fields)
                .opt_fields("optFieldsFeatures", self.opt_fields_features),
        )
    }
}

/// List the compounds of a project, page by page.
#[derive(Debug, Clone)]
pub struct GetCompoundsPaged<'a> {
    /// The project.
    pub project_id: &'a str,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [CompoundOptField]>,
    /// Optional fields to include in the compounds' features.
    pub opt_fields_features: Option<&'a [AlignedFeatureOptField]>,
}

impl ApiRequest for GetCompoundsPaged<'_> {
    type Response = PagedModel<Compound>;

    fn path(&self) -> String {
        format!("/api/projects/{}/compounds/page", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .opt_fields("optFields", self.opt_fields)
                .opt_fields("optFieldsFeatures", self.opt_fields_features),
        )
    }
}

/// Get the LC-MS traces of a compound's features.
#[derive(Debug, Clone)]
pub struct GetCompoundTraces<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The compound.
    pub compound_id: &'a str,
    /// Restrict the traces to the samples containing this feature.
    pub feature_id: Option<&'a str>,
}

impl ApiRequest for GetCompoundTraces<'_> {
    type Response = TraceSet;

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/compounds/{}/traces",
            segment(self.project_id),
            segment(self.compound_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_param("featureId", self.feature_id))
    }
}

/// Get the quantification table of all compounds of a project.
#[derive(Debug, Clone)]
pub struct GetCompoundQuantification<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The quantification measure. Defaults to the apex height.
    pub measure: Option<QuantificationMeasure>,
}

impl ApiRequest for GetCompoundQuantification<'_> {
    type Response = QuantificationTable;

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/compounds/quantification",
            segment(self.project_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_param("type", self.measure.as_ref()))
    }
}

/// Get the quantification of a single compound, as a one-row table.
#[derive(Debug, Clone)]
pub struct GetCompoundQuantificationRow<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The compound.
    pub compound_id: &'a str,
    /// The quantification measure. Defaults to the apex height.
    pub measure: Option<QuantificationMeasure>,
}

impl ApiRequest for GetCompoundQuantificationRow<'_> {
    type Response = QuantificationTable;

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/compounds/{}/quantification",
            segment(self.project_id),
            segment(self.compound_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_param("type", self.measure.as_ref()))
    }
}
