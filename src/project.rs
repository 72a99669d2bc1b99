//! Import and export of a sheet configuration together with its records
//!
//! The interchange file holds one page section:
//!
//! ```json
//! {
//!   "qrCodeWithTextPage": {
//!     "sheetConfig": { "columns": 2, "rows": 7, ... , "unit": "mm" },
//!     "formValue": [ { "text": "...", "qrCodeContent": "...", "randomId": "..." } ]
//!   }
//! }
//! ```
//!
//! Import is all or nothing: any missing or mistyped field rejects the file.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::Result;
use crate::config::SheetConfig;
use crate::content::ContentRecord;
use crate::error::SheetError;

/// A configuration and its records, as carried by an interchange file
#[derive(Debug, Clone, PartialEq)]
pub struct Project<R> {
    pub sheet_config: SheetConfig,
    pub records: Vec<R>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageSectionOut<'a, R> {
    sheet_config: &'a SheetConfig,
    form_value: Vec<R>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageSectionIn<S> {
    sheet_config: SheetConfig,
    form_value: Vec<S>,
}

/// Serialize a configuration and its records, pretty-printed.
///
/// Absent text fields are written as empty strings so the file always passes
/// import validation.
pub fn export_json<R: ContentRecord>(config: &SheetConfig, records: &[R]) -> Result<String> {
    let section = PageSectionOut {
        sheet_config: config,
        form_value: records.iter().map(ContentRecord::normalized).collect(),
    };
    let section = serde_json::to_value(section).map_err(|e| SheetError::Export(e.to_string()))?;

    let mut root = Map::new();
    root.insert(R::KIND.export_key().to_string(), section);

    serde_json::to_string_pretty(&Value::Object(root)).map_err(|e| SheetError::Export(e.to_string()))
}

/// Parse and validate an interchange file for the record type's page kind
#[instrument(skip_all, fields(page = R::KIND.export_key(), bytes = json.len()))]
pub fn import_json<R: ContentRecord>(json: &str) -> Result<Project<R>> {
    let mut root: Map<String, Value> = serde_json::from_str(json)?;
    let key = R::KIND.export_key();
    let section = root
        .remove(key)
        .ok_or_else(|| <serde_json::Error as serde::de::Error>::missing_field(key))?;

    let section: PageSectionIn<R::Strict> = serde_json::from_value(section)?;
    section.sheet_config.validate()?;

    let records: Vec<R> = section.form_value.into_iter().map(Into::into).collect();
    debug!("Imported {} records", records.len());

    Ok(Project {
        sheet_config: section.sheet_config,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SheetPreset;
    use crate::content::{LocationRecord, QrTextRecord, bind_content};

    fn records() -> Vec<QrTextRecord> {
        vec![
            QrTextRecord::new("ASN00001", "ASN00001"),
            QrTextRecord {
                text: None,
                qr_code_content: Some("only-qr".to_string()),
                random_id: "r2".to_string(),
            },
        ]
    }

    #[test]
    fn test_export_shape() {
        let json = export_json(&SheetPreset::Herma5076.config(), &records()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        let section = &value["qrCodeWithTextPage"];
        assert_eq!(section["sheetConfig"]["columns"], 2);
        assert_eq!(section["sheetConfig"]["unit"], "mm");
        assert_eq!(section["formValue"][1]["text"], "");
        assert_eq!(section["formValue"][1]["randomId"], "r2");
        assert!(json.contains("\n  \"qrCodeWithTextPage\""));
    }

    #[test]
    fn test_round_trip_preserves_rendered_grid() {
        let config = SheetPreset::Herma5076.config();
        let before = bind_content(&records(), 7, 2);

        let json = export_json(&config, &records()).unwrap();
        let project: Project<QrTextRecord> = import_json(&json).unwrap();

        assert_eq!(project.sheet_config, config);
        assert_eq!(bind_content(&project.records, 7, 2), before);
    }

    #[test]
    fn test_missing_random_id_rejects_import() {
        let mut value: Value =
            serde_json::from_str(&export_json(&SheetConfig::default(), &records()).unwrap())
                .unwrap();
        value["qrCodeWithTextPage"]["formValue"][1]
            .as_object_mut()
            .unwrap()
            .remove("randomId");

        let result = import_json::<QrTextRecord>(&value.to_string());
        assert!(matches!(result, Err(SheetError::Import(_))));
    }

    #[test]
    fn test_wrong_page_section_rejects_import() {
        let json = export_json(&SheetConfig::default(), &records()).unwrap();
        let result = import_json::<LocationRecord>(&json);
        assert!(matches!(result, Err(SheetError::Import(_))));
    }

    #[test]
    fn test_non_string_field_rejects_import() {
        let json = r#"{"locationsPage": {"sheetConfig": CONFIG, "formValue": [
            {"description": "Garage", "url": 42, "randomId": "a"}
        ]}}"#
            .replace(
                "CONFIG",
                &serde_json::to_string(&SheetConfig::default()).unwrap(),
            );
        assert!(import_json::<LocationRecord>(&json).is_err());
    }

    #[test]
    fn test_invalid_geometry_rejects_import() {
        let mut config = SheetConfig::default();
        config.columns = 0;
        let json = export_json::<LocationRecord>(&config, &[]).unwrap();
        assert!(matches!(
            import_json::<LocationRecord>(&json),
            Err(SheetError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_location_import() {
        let json = format!(
            r#"{{"locationsPage": {{"sheetConfig": {}, "formValue": [
                {{"description": "Garage", "url": "https://homebox.local/l/1", "randomId": "a"}}
            ]}}}}"#,
            serde_json::to_string(&SheetConfig::default()).unwrap()
        );
        let project: Project<LocationRecord> = import_json(&json).unwrap();
        assert_eq!(project.records.len(), 1);
        assert_eq!(project.records[0].description.as_deref(), Some("Garage"));
    }
}
