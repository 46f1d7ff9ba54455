//! Quantification tables and LC-MS traces, shared by compounds and aligned
//! features.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::api::DataResponse;

api_enum! {
    /// How a feature is quantified within one sample.
    pub enum QuantificationMeasure {
        "APEX_HEIGHT" => ApexHeight,
        "AREA_UNDER_CURVE" => AreaUnderCurve,
    }
}

api_enum! {
    /// The kind of object a table row stands for.
    pub enum QuantRowType {
        "FEATURES" => Features,
        "COMPOUNDS" => Compounds,
    }
}

api_enum! {
    /// The kind of object a table column stands for.
    pub enum QuantColumnType {
        "SAMPLES" => Samples,
    }
}

/// A matrix of quantities, one row per feature or compound and one column
/// per sample.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantificationTable {
    /// How the values were measured.
    pub quantification_measure: Option<QuantificationMeasure>,
    /// What the rows stand for.
    pub row_type: Option<QuantRowType>,
    /// What the columns stand for.
    pub column_type: Option<QuantColumnType>,
    /// Display names of the rows.
    #[serde(default)]
    pub row_names: Vec<String>,
    /// Display names of the columns.
    #[serde(default)]
    pub column_names: Vec<String>,
    /// The object ids of the rows.
    #[serde(default)]
    pub row_ids: Vec<i64>,
    /// The object ids of the columns.
    #[serde(default)]
    pub column_ids: Vec<i64>,
    /// Row-major values; `values[row][column]`.
    #[serde(default)]
    pub values: Vec<Vec<f64>>,
}

impl DataResponse for QuantificationTable {}

impl QuantificationTable {
    /// The value at the given row and column id, if present.
    pub fn get(&self, row_id: i64, column_id: i64) -> Option<f64> {
        let row = self.row_ids.iter().position(|&id| id == row_id)?;
        let col = self.column_ids.iter().position(|&id| id == column_id)?;
        self.values.get(row)?.get(col).copied()
    }
}

/// The shared axes of all traces in a [TraceSet].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceAxes {
    /// Scan numbers.
    #[serde(default)]
    pub scan_numbers: Vec<i32>,
    /// Scan identifiers as given in the input file.
    #[serde(default)]
    pub scan_ids: Vec<String>,
    /// Retention times.
    #[serde(default)]
    pub retention_time_in_seconds: Vec<f64>,
}

/// A labeled interval on a trace, e.g. the extent of a feature.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceAnnotation {
    /// The annotation kind, e.g. `FEATURE`.
    pub r#type: Option<String>,
    /// A human-readable description.
    pub description: Option<String>,
    /// The index of the apex.
    pub index: Option<i32>,
    /// The first index covered.
    pub from: Option<i32>,
    /// The last index covered.
    pub to: Option<i32>,
}

/// The intensity of one ion over retention time in one sample.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    /// The trace id.
    pub id: Option<String>,
    /// The sample the trace was measured in.
    pub sample_id: Option<String>,
    /// The name of that sample.
    pub sample_name: Option<String>,
    /// A label, usually the ion type.
    pub label: Option<String>,
    /// One value per entry of the set's axes.
    #[serde(default)]
    pub intensities: Vec<f64>,
    /// Annotated intervals.
    #[serde(default)]
    pub annotations: Vec<TraceAnnotation>,
    /// The m/z of the traced ion.
    pub mz: Option<f64>,
    /// True for the trace merged across all samples.
    #[serde(default)]
    pub merged: bool,
    /// Multiply intensities by this to normalize them.
    pub normalization_factor: Option<f64>,
    /// The estimated noise level.
    pub noise_level: Option<f64>,
}

/// Traces sharing one retention time axis.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceSet {
    /// The sample this set belongs to, if it is a single one.
    pub sample_id: Option<i64>,
    /// The name of that sample.
    pub sample_name: Option<String>,
    /// The shared axes.
    #[serde(default)]
    pub axes: TraceAxes,
    /// The traces.
    #[serde(default)]
    pub traces: Vec<Trace>,
    /// The adducts and in-source fragments linked to the feature. Only set
    /// for adduct network requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adduct_network: Option<AdductNetwork>,
    /// Extra, server-specific information.
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl DataResponse for TraceSet {}

/// A feature in an adduct network, with the ion types it may be.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdductNode {
    /// The aligned feature.
    pub aligned_feature_id: String,
    /// The m/z of the feature.
    pub mz: Option<f64>,
    /// Probabilities by adduct, e.g. `[M+Na]+`.
    #[serde(default)]
    pub adduct_annotations: BTreeMap<String, f64>,
}

/// A mass difference between two features of an adduct network, with the
/// evidence that they belong to the same compound.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdductEdge {
    /// Index of the source node.
    pub from: usize,
    /// Index of the target node.
    pub to: usize,
    /// The m/z difference.
    pub mz_delta: Option<f64>,
    /// The explanation of the difference, e.g. `[M+Na]+ -> [M+H]+`.
    pub annotation: Option<String>,
    /// Correlation of the merged traces.
    pub merged_correlation: Option<f32>,
    /// Correlation of the representative traces.
    pub representative_correlation: Option<f32>,
    /// Cosine similarity of the MS/MS spectra.
    #[serde(rename = "ms2cosine")]
    pub ms2_cosine: Option<f32>,
    /// The p-value of the link.
    pub pvalue: Option<f32>,
    /// Score of the intensity ratio.
    pub intensity_ratio_score: Option<f32>,
}

/// Features linked as different ions of one compound.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AdductNetwork {
    /// The features.
    pub nodes: Vec<AdductNode>,
    /// The links between them, by node index.
    pub edges: Vec<AdductEdge>,
}

impl AdductNetwork {
    /// The nodes linked to the node at `idx`.
    pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = &AdductNode> {
        self.edges
            .iter()
            .filter_map(move |e| match (e.from == idx, e.to == idx) {
                (true, _) => Some(e.to),
                (_, true) => Some(e.from),
                _ => None,
            })
            .filter_map(|i| self.nodes.get(i))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::test::respond;

    #[test]
    fn quantification_table_lookup() {
        let body = r#"{
            "quantificationMeasure": "APEX_HEIGHT",
            "rowType": "FEATURES",
            "columnType": "SAMPLES",
            "rowIds": [10, 11],
            "columnIds": [1, 2, 3],
            "rowNames": ["f10", "f11"],
            "columnNames": ["s1", "s2", "s3"],
            "values": [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]
        }"#;

        let table = respond::<QuantificationTable>(200, body).unwrap();
        assert_eq!(
            table.quantification_measure,
            Some(QuantificationMeasure::ApexHeight)
        );
        assert_eq!(table.get(11, 2), Some(5.0));
        assert_eq!(table.get(12, 2), None);
    }

    #[test]
    fn parse_trace_set() {
        let body = r#"{
            "sampleId": 3,
            "sampleName": "blank",
            "axes": {"scanNumbers": [1, 2], "scanIds": ["a", "b"], "retentionTimeInSeconds": [10.0, 11.5]},
            "traces": [{"id": "7", "label": "[M+H]+", "intensities": [0.0, 120.5], "merged": true}],
            "normalizedBy": "max"
        }"#;

        let set = respond::<TraceSet>(200, body).unwrap();
        assert_eq!(set.axes.retention_time_in_seconds, vec![10.0, 11.5]);
        assert!(set.traces[0].merged);
        assert!(set.adduct_network.is_none());
        assert!(set.extra.contains_key("normalizedBy"));
    }

    #[test]
    fn parse_adduct_network() {
        let body = r#"{
            "axes": {"retentionTimeInSeconds": [10.0]},
            "traces": [],
            "adductNetwork": {
                "nodes": [
                    {"alignedFeatureId": "7", "mz": 195.09, "adductAnnotations": {"[M+H]+": 0.9}},
                    {"alignedFeatureId": "8", "mz": 217.07},
                    {"alignedFeatureId": "9", "mz": 389.17}
                ],
                "edges": [
                    {"from": 0, "to": 1, "mzDelta": 21.98, "annotation": "[M+H]+ -> [M+Na]+", "ms2cosine": 0.8},
                    {"from": 2, "to": 0, "mzDelta": 194.08}
                ]
            }
        }"#;

        let set = respond::<TraceSet>(200, body).unwrap();
        let network = set.adduct_network.unwrap();
        assert_eq!(network.nodes[0].adduct_annotations["[M+H]+"], 0.9);
        assert_eq!(network.edges[0].ms2_cosine, Some(0.8));

        let linked: Vec<_> = network
            .neighbors(0)
            .map(|n| n.aligned_feature_id.as_str())
            .collect();
        assert_eq!(linked, ["8", "9"]);
        assert_eq!(network.neighbors(1).count(), 1);
    }
}
