//! The editor state of one page kind: sheet configuration plus records
//!
//! A [`Workspace`] is the single owner of that state. Every mutation goes
//! through it and is written to the backing [`KeyValueStore`] before it
//! becomes visible, so reopening a workspace on the same store restores
//! exactly what was last shown.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::Result;
use crate::config::{SheetConfig, SheetPreset};
use crate::content::{ContentRecord, RenderedGrid, bind_content};
use crate::error::SheetError;
use crate::generate::asn_records;
use crate::project::{export_json, import_json};
use crate::render::{RenderedSheet, render_sheet};
use crate::store::KeyValueStore;
use crate::style::RenderOptions;

#[derive(Debug)]
pub struct Workspace<R: ContentRecord, S: KeyValueStore> {
    store: S,
    config: SheetConfig,
    records: Vec<R>,
}

impl<R: ContentRecord, S: KeyValueStore> Workspace<R, S> {
    /// Load the persisted state of `R`'s page kind from `store`.
    ///
    /// Missing values fall back to the HERMA 5076 preset and an empty record
    /// list. Unreadable values are logged, copied to their [`backup_key`] and
    /// fall back the same way.
    pub fn open(mut store: S) -> Result<Self> {
        let kind = R::KIND;
        let config = load_or_default(&mut store, kind.config_storage_key(), SheetConfig::default)?;
        let records = load_or_default(&mut store, kind.records_storage_key(), Vec::new)?;
        debug!(
            "Opened {:?} workspace with {} records",
            kind,
            records.len()
        );
        Ok(Self {
            store,
            config,
            records,
        })
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Replace the sheet configuration after validating it
    pub fn set_config(&mut self, config: SheetConfig) -> Result<()> {
        config.validate()?;
        self.persist_config(&config)?;
        self.config = config;
        Ok(())
    }

    pub fn apply_preset(&mut self, preset: SheetPreset) -> Result<()> {
        info!("Applying preset {}", preset.nice_name());
        self.set_config(preset.config())
    }

    /// Append a blank record and return its index
    pub fn add_record(&mut self) -> Result<usize> {
        self.push_record(R::blank())
    }

    /// Append a record and return its index
    pub fn push_record(&mut self, record: R) -> Result<usize> {
        let mut records = self.records.clone();
        records.push(record);
        self.replace_records(records)?;
        Ok(self.records.len() - 1)
    }

    /// Insert a copy of the record at `index` right after it
    pub fn duplicate_record(&mut self, index: usize) -> Result<()> {
        let copy = self.record(index)?.duplicate();
        let mut records = self.records.clone();
        records.insert(index + 1, copy);
        self.replace_records(records)
    }

    pub fn remove_record(&mut self, index: usize) -> Result<R> {
        self.record(index)?;
        let mut records = self.records.clone();
        let removed = records.remove(index);
        self.replace_records(records)?;
        Ok(removed)
    }

    /// Overwrite the text fields of a record, keeping its identity
    pub fn update_record(
        &mut self,
        index: usize,
        description: Option<String>,
        qr_content: Option<String>,
    ) -> Result<()> {
        let id = self.record(index)?.random_id().to_string();
        let mut records = self.records.clone();
        records[index] = R::from_parts(description, qr_content, id);
        self.replace_records(records)
    }

    /// Move a record to a new position, shifting the ones in between
    pub fn move_record(&mut self, from: usize, to: usize) -> Result<()> {
        self.record(from)?;
        self.record(to)?;
        let mut records = self.records.clone();
        let record = records.remove(from);
        records.insert(to, record);
        self.replace_records(records)
    }

    pub fn replace_records(&mut self, records: Vec<R>) -> Result<()> {
        self.persist_records(&records)?;
        self.records = records;
        Ok(())
    }

    /// Fill the sheet with consecutive archive serial numbers, replacing all records
    pub fn generate_asns(&mut self, start: u32) -> Result<()> {
        let records = asn_records(start, self.config.capacity());
        info!("Generated {} ASN records from {}", records.len(), start);
        self.replace_records(records)
    }

    /// Replace configuration and records with the contents of an
    /// interchange file. On any error nothing changes.
    pub fn import_json(&mut self, json: &str) -> Result<()> {
        let project = import_json::<R>(json)?;
        self.store.set_many(vec![
            (
                R::KIND.config_storage_key(),
                to_stored(&project.sheet_config)?,
            ),
            (R::KIND.records_storage_key(), to_stored(&project.records)?),
        ])?;
        info!("Imported {} records", project.records.len());
        self.config = project.sheet_config;
        self.records = project.records;
        Ok(())
    }

    pub fn export_json(&self) -> Result<String> {
        export_json(&self.config, &self.records)
    }

    /// The records bound onto the current grid
    pub fn rendered_grid(&self) -> RenderedGrid {
        bind_content(
            &self.records,
            self.config.rows as usize,
            self.config.columns as usize,
        )
    }

    pub fn render(&self, options: &RenderOptions) -> Result<RenderedSheet> {
        render_sheet(&self.config, &self.rendered_grid(), options)
    }

    /// The printable single-page PDF of the current state
    pub fn render_pdf(&self, options: &RenderOptions) -> Result<Vec<u8>> {
        crate::render_pdf(&self.config, &self.rendered_grid(), options)
    }

    fn record(&self, index: usize) -> Result<&R> {
        self.records.get(index).ok_or(SheetError::RecordIndex {
            index,
            len: self.records.len(),
        })
    }

    fn persist_config(&mut self, config: &SheetConfig) -> Result<()> {
        let value = to_stored(config)?;
        self.store.set(R::KIND.config_storage_key(), value)
    }

    fn persist_records(&mut self, records: &[R]) -> Result<()> {
        let value = to_stored(records)?;
        self.store.set(R::KIND.records_storage_key(), value)
    }
}

/// Key under which an unreadable stored value is kept before it can be
/// overwritten
pub fn backup_key(key: &str) -> String {
    format!("{key}/unreadable")
}

fn to_stored<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| SheetError::Storage(e.to_string()))
}

fn load_or_default<T, S>(store: &mut S, key: &str, default: impl FnOnce() -> T) -> Result<T>
where
    T: DeserializeOwned,
    S: KeyValueStore,
{
    let Some(value) = store.get(key)? else {
        return Ok(default());
    };
    match serde_json::from_str(&value) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            let backup = backup_key(key);
            warn!(
                "Ignoring unreadable stored value for {}, kept under {}: {}",
                key, backup, e
            );
            store.set(&backup, value)?;
            Ok(default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{CellContent, LocationRecord, PageKind, QrTextRecord};
    use crate::store::MemoryStore;

    type QrWorkspace = Workspace<QrTextRecord, MemoryStore>;

    fn texts(ws: &QrWorkspace) -> Vec<String> {
        ws.records()
            .iter()
            .map(|r| r.text.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_fresh_workspace_uses_preset() {
        let ws = QrWorkspace::open(MemoryStore::new()).unwrap();
        assert_eq!(*ws.config(), SheetPreset::Herma5076.config());
        assert!(ws.records().is_empty());
        assert_eq!(ws.rendered_grid().len(), 14);
        assert!(ws.store().is_empty());
    }

    #[test]
    fn test_every_change_is_persisted() {
        let mut ws = QrWorkspace::open(MemoryStore::new()).unwrap();
        ws.add_record().unwrap();
        ws.update_record(0, Some("Shelf".into()), Some("shelf".into()))
            .unwrap();
        let mut config = ws.config().clone();
        config.rows = 3;
        ws.set_config(config).unwrap();

        let reopened = QrWorkspace::open(ws.into_store()).unwrap();
        assert_eq!(reopened.config().rows, 3);
        assert_eq!(texts(&reopened), vec!["Shelf"]);
    }

    #[test]
    fn test_list_editing() {
        let mut ws = QrWorkspace::open(MemoryStore::new()).unwrap();
        for text in ["a", "b", "c"] {
            ws.push_record(QrTextRecord::new(text, text)).unwrap();
        }

        ws.duplicate_record(0).unwrap();
        assert_eq!(texts(&ws), vec!["a", "a", "b", "c"]);
        assert_ne!(ws.records()[0].random_id, ws.records()[1].random_id);

        ws.move_record(3, 0).unwrap();
        assert_eq!(texts(&ws), vec!["c", "a", "a", "b"]);

        let removed = ws.remove_record(1).unwrap();
        assert_eq!(removed.text.as_deref(), Some("a"));
        assert_eq!(texts(&ws), vec!["c", "a", "b"]);

        assert!(matches!(
            ws.remove_record(5),
            Err(SheetError::RecordIndex { index: 5, len: 3 })
        ));
        assert!(ws.move_record(0, 3).is_err());
    }

    #[test]
    fn test_invalid_config_is_not_applied() {
        let mut ws = QrWorkspace::open(MemoryStore::new()).unwrap();
        let mut config = ws.config().clone();
        config.cell_width = 0.0;
        assert!(ws.set_config(config).is_err());
        assert_eq!(*ws.config(), SheetConfig::default());
        assert!(ws.store().is_empty());
    }

    #[test]
    fn test_failed_import_changes_nothing() {
        let mut ws = QrWorkspace::open(MemoryStore::new()).unwrap();
        ws.push_record(QrTextRecord::new("keep", "keep")).unwrap();
        let stored_before = ws
            .store()
            .get(PageKind::QrCodeWithText.records_storage_key())
            .unwrap();

        let json = format!(
            r#"{{"qrCodeWithTextPage": {{"sheetConfig": {}, "formValue": [
                {{"text": "a", "qrCodeContent": "a", "randomId": "1"}},
                {{"text": "b", "qrCodeContent": "b"}}
            ]}}}}"#,
            serde_json::to_string(&SheetConfig::default()).unwrap()
        );
        assert!(matches!(ws.import_json(&json), Err(SheetError::Import(_))));

        assert_eq!(texts(&ws), vec!["keep"]);
        assert_eq!(
            ws.store()
                .get(PageKind::QrCodeWithText.records_storage_key())
                .unwrap(),
            stored_before
        );
    }

    #[test]
    fn test_export_import_between_workspaces() {
        let mut source = QrWorkspace::open(MemoryStore::new()).unwrap();
        source.generate_asns(1).unwrap();
        let json = source.export_json().unwrap();

        let mut target = QrWorkspace::open(MemoryStore::new()).unwrap();
        target.import_json(&json).unwrap();
        assert_eq!(target.rendered_grid(), source.rendered_grid());
        assert_eq!(target.records(), source.records());
    }

    #[test]
    fn test_generate_asns_fills_the_sheet() {
        let mut ws = QrWorkspace::open(MemoryStore::new()).unwrap();
        ws.generate_asns(100).unwrap();
        let grid = ws.rendered_grid();
        assert_eq!(ws.records().len(), 14);
        assert_eq!(grid.filled(), 14);
        assert_eq!(
            grid.get(6, 1),
            Some(&CellContent::qr_with_description("ASN00113", "ASN00113"))
        );
    }

    #[test]
    fn test_unreadable_stored_values_fall_back() {
        let mut store = MemoryStore::new();
        store
            .set(PageKind::Locations.config_storage_key(), "{broken".into())
            .unwrap();
        store
            .set(
                PageKind::Locations.records_storage_key(),
                r#"[{"description":"Garage","url":"u","randomId":"x"}]"#.into(),
            )
            .unwrap();

        let ws = Workspace::<LocationRecord, _>::open(store).unwrap();
        assert_eq!(*ws.config(), SheetConfig::default());
        assert_eq!(ws.records().len(), 1);
        assert_eq!(
            ws.store()
                .get(&backup_key(PageKind::Locations.config_storage_key()))
                .unwrap()
                .as_deref(),
            Some("{broken")
        );
    }

    #[test]
    fn test_unreadable_records_survive_the_next_edit() {
        let key = PageKind::QrCodeWithText.records_storage_key();
        let stored = r#"[{"text":"a","qrCodeContent":"a"}]"#;
        let mut store = MemoryStore::new();
        store.set(key, stored.into()).unwrap();

        let mut ws = QrWorkspace::open(store).unwrap();
        assert!(ws.records().is_empty());
        ws.add_record().unwrap();

        let store = ws.into_store();
        assert_eq!(
            store.get(&backup_key(key)).unwrap().as_deref(),
            Some(stored)
        );
    }

    /// Accepts a fixed number of writes, then fails every further one
    #[derive(Debug, Default)]
    struct LimitedStore {
        inner: MemoryStore,
        writes_left: usize,
    }

    impl LimitedStore {
        fn write(&mut self) -> Result<()> {
            if self.writes_left == 0 {
                return Err(SheetError::Storage("disk full".to_string()));
            }
            self.writes_left -= 1;
            Ok(())
        }
    }

    impl KeyValueStore for LimitedStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: String) -> Result<()> {
            self.write()?;
            self.inner.set(key, value)
        }

        fn set_many(&mut self, entries: Vec<(&str, String)>) -> Result<()> {
            self.write()?;
            self.inner.set_many(entries)
        }
    }

    #[test]
    fn test_import_that_cannot_be_stored_changes_nothing() {
        let store = LimitedStore {
            writes_left: 1,
            ..LimitedStore::default()
        };
        let mut ws = Workspace::<QrTextRecord, _>::open(store).unwrap();
        ws.push_record(QrTextRecord::new("keep", "keep")).unwrap();

        let mut config = SheetConfig::default();
        config.rows = 3;
        let json = export_json(&config, &[QrTextRecord::new("new", "new")]).unwrap();
        assert!(matches!(ws.import_json(&json), Err(SheetError::Storage(_))));
        assert_eq!(ws.config().rows, 7);
        assert_eq!(ws.records().len(), 1);

        let mut store = ws.into_store();
        assert_eq!(
            store
                .get(PageKind::QrCodeWithText.config_storage_key())
                .unwrap(),
            None
        );
        store.writes_left = 1;
        let reopened = Workspace::<QrTextRecord, _>::open(store).unwrap();
        assert_eq!(reopened.config().rows, 7);
        assert_eq!(reopened.records()[0].text.as_deref(), Some("keep"));
    }

    #[test]
    fn test_page_kinds_use_separate_keys() {
        let mut store = MemoryStore::new();
        {
            let mut ws = Workspace::<QrTextRecord, _>::open(&mut store).unwrap();
            ws.add_record().unwrap();
        }
        let ws = Workspace::<LocationRecord, _>::open(&mut store).unwrap();
        assert!(ws.records().is_empty());
    }
}
