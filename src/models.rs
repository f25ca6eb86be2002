//! Wire types for the Aura Hub API.
//!
//! The backend speaks Portuguese field names (`razao_social`, `objeto`,
//! `ano_do_termo`, ...); serde rename attributes keep the Rust side in
//! English while matching the wire exactly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One search hit, as returned by the search endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ParceriaSummary {
    pub id: i64,
    #[serde(rename = "razao_social")]
    pub organization: Option<String>,
    #[serde(rename = "objeto")]
    pub object_description: Option<String>,
    #[serde(rename = "ano_do_termo")]
    pub term_year: Option<i32>,
    /// Work-plan excerpt; only some records carry one.
    #[serde(rename = "plano_de_trabalho", default)]
    pub work_plan: Option<String>,
    /// Present only on semantic search results, in 0.0..=1.0.
    #[serde(default)]
    pub similarity_score: Option<f64>,
}

/// Full record from `GET /api/v1/parcerias/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ParceriaDetail {
    pub id: i64,
    #[serde(rename = "numero_do_termo")]
    pub term_number: Option<String>,
    #[serde(rename = "ano_do_termo")]
    pub term_year: Option<i32>,
    #[serde(rename = "cpf_cnpj")]
    pub tax_id: Option<String>,
    #[serde(rename = "razao_social")]
    pub organization: Option<String>,
    #[serde(rename = "objeto")]
    pub object_description: Option<String>,
    #[serde(rename = "plano_de_trabalho", default)]
    pub work_plan: Option<String>,
    #[serde(rename = "data_da_assinatura")]
    pub signature_date: Option<NaiveDate>,
    #[serde(rename = "data_de_publicacao")]
    pub publication_date: Option<NaiveDate>,
    #[serde(rename = "vigencia")]
    pub validity_date: Option<NaiveDate>,
    #[serde(rename = "situacao")]
    pub status: Option<String>,
    #[serde(default)]
    pub similarity_score: Option<f64>,
}

/// Response shape shared by the keyword and semantic search endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResults {
    pub total_items: u64,
    #[serde(default)]
    pub items: Vec<ParceriaSummary>,
}

/// Field suggestions returned by the document-processing endpoint.
///
/// The extractor never suggests a work plan; the upload form always starts
/// that field empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractionSuggestions {
    #[serde(rename = "razao_social_sugerida", default)]
    pub organization: Option<String>,
    #[serde(rename = "objeto_sugerido", default)]
    pub object_description: Option<String>,
    #[serde(rename = "cnpj_sugerido", default)]
    pub tax_id: Option<String>,
    #[serde(rename = "ano_do_termo_sugerido", default)]
    pub term_year: Option<String>,
}

/// JSON body for `POST /api/v1/parcerias`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewParceria {
    #[serde(rename = "razao_social")]
    pub organization: String,
    #[serde(rename = "objeto")]
    pub object_description: String,
    #[serde(rename = "plano_de_trabalho")]
    pub work_plan: String,
    #[serde(rename = "cpf_cnpj")]
    pub tax_id: String,
    /// Integer year, or null when the form's year text did not parse.
    #[serde(rename = "ano_do_termo")]
    pub term_year: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_deserializes_wire_names() {
        let json = r#"{
            "id": 17,
            "razao_social": "Instituto Aurora",
            "objeto": "Cooperação técnica",
            "ano_do_termo": 2023,
            "similarity_score": 0.82
        }"#;
        let summary: ParceriaSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.id, 17);
        assert_eq!(summary.organization.as_deref(), Some("Instituto Aurora"));
        assert_eq!(summary.term_year, Some(2023));
        assert_eq!(summary.similarity_score, Some(0.82));
        assert!(summary.work_plan.is_none());
    }

    #[test]
    fn summary_tolerates_nulls_and_missing_score() {
        let json = r#"{"id": 3, "razao_social": null, "objeto": null, "ano_do_termo": null}"#;
        let summary: ParceriaSummary = serde_json::from_str(json).unwrap();
        assert!(summary.organization.is_none());
        assert!(summary.similarity_score.is_none());
    }

    #[test]
    fn detail_parses_iso_dates() {
        let json = r#"{
            "id": 42,
            "numero_do_termo": "123",
            "ano_do_termo": 2024,
            "cpf_cnpj": "21.154.877/0001-07",
            "razao_social": "Associação Beta",
            "objeto": "Apoio a projetos",
            "plano_de_trabalho": null,
            "data_da_assinatura": "2024-10-27",
            "data_de_publicacao": null,
            "vigencia": "2026-12-31",
            "situacao": "Vigente"
        }"#;
        let detail: ParceriaDetail = serde_json::from_str(json).unwrap();
        assert_eq!(
            detail.signature_date,
            Some(NaiveDate::from_ymd_opt(2024, 10, 27).unwrap())
        );
        assert!(detail.publication_date.is_none());
        assert_eq!(detail.status.as_deref(), Some("Vigente"));
    }

    #[test]
    fn search_results_default_to_empty_items() {
        let results: SearchResults = serde_json::from_str(r#"{"total_items": 0}"#).unwrap();
        assert_eq!(results.total_items, 0);
        assert!(results.items.is_empty());
    }

    #[test]
    fn new_parceria_serializes_null_year() {
        let body = NewParceria {
            organization: "Org".into(),
            object_description: "Objeto".into(),
            work_plan: String::new(),
            tax_id: "00.000.000/0001-00".into(),
            term_year: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["ano_do_termo"], serde_json::Value::Null);
        assert_eq!(json["razao_social"], "Org");
    }
}
