//! Cell content and the binding of user records onto grid positions

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use uuid::Uuid;

/// What one cell of the sheet shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    /// Nothing is printed
    Empty,
    /// A QR symbol encoding `qr_code_text` next to the formatted description
    QrWithDescription {
        qr_code_text: String,
        description: String,
    },
}

impl CellContent {
    pub fn qr_with_description<Q: Into<String>, D: Into<String>>(
        qr_code_text: Q,
        description: D,
    ) -> Self {
        Self::QrWithDescription {
            qr_code_text: qr_code_text.into(),
            description: description.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }
}

/// The two editor variants, each with its own record shape and storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Description + URL stickers
    Locations,
    /// Markdown text + arbitrary QR payload stickers
    QrCodeWithText,
}

impl PageKind {
    /// Top-level key of the import/export file
    pub fn export_key(&self) -> &'static str {
        match self {
            PageKind::Locations => "locationsPage",
            PageKind::QrCodeWithText => "qrCodeWithTextPage",
        }
    }

    pub fn config_storage_key(&self) -> &'static str {
        match self {
            PageKind::Locations => "homebox-label-sheet-generator/locations/form/sheetConfig",
            PageKind::QrCodeWithText => "label-sheet-generator/qrCodeWithText/form/sheetConfig",
        }
    }

    pub fn records_storage_key(&self) -> &'static str {
        match self {
            PageKind::Locations => "homebox-label-sheet-generator/locations/form/location",
            PageKind::QrCodeWithText => "label-sheet-generator/qrCodeWithText/form/location",
        }
    }

    /// Suggested file name for exports
    pub fn export_file_name(&self) -> &'static str {
        match self {
            PageKind::Locations => "locationsLabelSheet.json",
            PageKind::QrCodeWithText => "qrCodeWithTextLabelSheet.json",
        }
    }
}

/// Generate a fresh identity token for a record
pub fn random_id() -> String {
    format!("rec-{}", Uuid::new_v4().simple())
}

/// One user-entered entry destined for one cell.
///
/// Both text fields are optional in storage. The identity token only serves
/// list editing and never influences layout.
pub trait ContentRecord: Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned {
    /// The import shape, where every field is required
    type Strict: DeserializeOwned + Into<Self>;

    const KIND: PageKind;

    fn from_parts(
        description: Option<String>,
        qr_content: Option<String>,
        random_id: String,
    ) -> Self;

    /// The text printed next to the QR symbol
    fn description(&self) -> Option<&str>;

    /// The QR payload
    fn qr_content(&self) -> Option<&str>;

    fn random_id(&self) -> &str;

    /// A blank record with a fresh identity
    fn blank() -> Self {
        Self::from_parts(Some(String::new()), Some(String::new()), random_id())
    }

    /// A copy of the text fields under a fresh identity
    fn duplicate(&self) -> Self {
        Self::from_parts(
            self.description().map(str::to_string),
            self.qr_content().map(str::to_string),
            random_id(),
        )
    }

    /// The same record with absent fields written out as empty strings
    fn normalized(&self) -> Self {
        Self::from_parts(
            Some(self.description().unwrap_or_default().to_string()),
            Some(self.qr_content().unwrap_or_default().to_string()),
            self.random_id().to_string(),
        )
    }

    fn to_cell_content(&self) -> CellContent {
        CellContent::QrWithDescription {
            qr_code_text: self.qr_content().unwrap_or_default().to_string(),
            description: self.description().unwrap_or_default().to_string(),
        }
    }
}

/// A location sticker: description plus the URL the QR symbol points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub random_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrictLocationRecord {
    description: String,
    url: String,
    random_id: String,
}

impl From<StrictLocationRecord> for LocationRecord {
    fn from(r: StrictLocationRecord) -> Self {
        Self {
            description: Some(r.description),
            url: Some(r.url),
            random_id: r.random_id,
        }
    }
}

impl ContentRecord for LocationRecord {
    type Strict = StrictLocationRecord;
    const KIND: PageKind = PageKind::Locations;

    fn from_parts(description: Option<String>, url: Option<String>, random_id: String) -> Self {
        Self {
            description,
            url,
            random_id,
        }
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn qr_content(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn random_id(&self) -> &str {
        &self.random_id
    }
}

/// A free-form sticker: Markdown text plus arbitrary QR payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrTextRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code_content: Option<String>,
    pub random_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrictQrTextRecord {
    text: String,
    qr_code_content: String,
    random_id: String,
}

impl From<StrictQrTextRecord> for QrTextRecord {
    fn from(r: StrictQrTextRecord) -> Self {
        Self {
            text: Some(r.text),
            qr_code_content: Some(r.qr_code_content),
            random_id: r.random_id,
        }
    }
}

impl QrTextRecord {
    pub fn new<T: Into<String>, Q: Into<String>>(text: T, qr_code_content: Q) -> Self {
        Self {
            text: Some(text.into()),
            qr_code_content: Some(qr_code_content.into()),
            random_id: random_id(),
        }
    }
}

impl ContentRecord for QrTextRecord {
    type Strict = StrictQrTextRecord;
    const KIND: PageKind = PageKind::QrCodeWithText;

    fn from_parts(text: Option<String>, qr_code_content: Option<String>, random_id: String) -> Self {
        Self {
            text,
            qr_code_content,
            random_id,
        }
    }

    fn description(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn qr_content(&self) -> Option<&str> {
        self.qr_code_content.as_deref()
    }

    fn random_id(&self) -> &str {
        &self.random_id
    }
}

/// Cell contents for every grid position, row-major, exactly `rows * columns` long
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedGrid {
    cells: Vec<CellContent>,
    rows: usize,
    columns: usize,
}

impl RenderedGrid {
    /// Build a grid from explicit cell contents, truncating or padding with
    /// `Empty` to the grid capacity
    pub fn from_cells(mut cells: Vec<CellContent>, rows: usize, columns: usize) -> Self {
        cells.resize(rows * columns, CellContent::Empty);
        Self {
            cells,
            rows,
            columns,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[CellContent] {
        &self.cells
    }

    /// Content at a grid position. Positions outside the grid are `None`.
    pub fn get(&self, row: usize, column: usize) -> Option<&CellContent> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.cells.get(row * self.columns + column)
    }

    /// Number of cells that show something
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }
}

/// Map records onto grid positions in row-major order.
///
/// Record `i` lands in cell `i`; cells past the last record are `Empty` and
/// records past the grid capacity are left out.
pub fn bind_content<R: ContentRecord>(records: &[R], rows: usize, columns: usize) -> RenderedGrid {
    let capacity = rows * columns;
    debug!(
        "Binding {} records onto {} cells",
        records.len(),
        capacity
    );
    if records.len() > capacity {
        trace!(
            "{} records do not fit on the sheet",
            records.len() - capacity
        );
    }

    let cells = (0..capacity)
        .map(|index| match records.get(index) {
            Some(record) => record.to_cell_content(),
            None => CellContent::Empty,
        })
        .collect();

    RenderedGrid {
        cells,
        rows,
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(description: &str, url: &str) -> LocationRecord {
        LocationRecord {
            description: Some(description.to_string()),
            url: Some(url.to_string()),
            random_id: random_id(),
        }
    }

    #[test]
    fn test_three_records_on_herma_grid() {
        let records = vec![
            location("Garage", "https://homebox.local/location/1"),
            location("Attic", "https://homebox.local/location/2"),
            location("Cellar", "https://homebox.local/location/3"),
        ];
        let grid = bind_content(&records, 7, 2);

        assert_eq!(grid.len(), 14);
        assert_eq!(grid.filled(), 3);
        assert_eq!(
            grid.get(0, 1),
            Some(&CellContent::qr_with_description(
                "https://homebox.local/location/2",
                "Attic"
            ))
        );
        assert_eq!(
            grid.get(1, 0),
            Some(&CellContent::qr_with_description(
                "https://homebox.local/location/3",
                "Cellar"
            ))
        );
        assert_eq!(grid.get(1, 1), Some(&CellContent::Empty));
        assert_eq!(grid.get(6, 1), Some(&CellContent::Empty));
        assert_eq!(grid.get(7, 0), None);
    }

    #[test]
    fn test_excess_records_are_truncated() {
        let records: Vec<QrTextRecord> = (0..5)
            .map(|i| QrTextRecord::new(format!("Box {i}"), format!("box-{i}")))
            .collect();
        let grid = bind_content(&records, 2, 2);

        assert_eq!(grid.len(), 4);
        for (index, cell) in grid.cells().iter().enumerate() {
            assert_eq!(*cell, records[index].to_cell_content());
        }
    }

    #[test]
    fn test_blank_fields_still_produce_qr_cell() {
        let records = vec![location("", "")];
        let grid = bind_content(&records, 1, 2);
        assert_eq!(grid.cells()[0], CellContent::qr_with_description("", ""));
        assert!(grid.cells()[1].is_empty());
    }

    #[test]
    fn test_absent_fields_become_empty_strings() {
        let record = QrTextRecord {
            text: None,
            qr_code_content: Some("ASN00001".to_string()),
            random_id: "a".to_string(),
        };
        assert_eq!(
            record.to_cell_content(),
            CellContent::qr_with_description("ASN00001", "")
        );
        assert_eq!(record.normalized().text.as_deref(), Some(""));
    }

    #[test]
    fn test_duplicate_gets_fresh_identity() {
        let original = QrTextRecord::new("Shelf", "shelf");
        let copy = original.duplicate();
        assert_eq!(copy.text, original.text);
        assert_eq!(copy.qr_code_content, original.qr_code_content);
        assert_ne!(copy.random_id, original.random_id);
    }

    #[test]
    fn test_stored_record_fields_are_optional() {
        let record: LocationRecord = serde_json::from_str(r#"{"randomId":"x1"}"#).unwrap();
        assert_eq!(record.description, None);
        assert_eq!(record.url, None);

        let json = serde_json::to_string(&QrTextRecord {
            text: Some("a".into()),
            qr_code_content: Some("b".into()),
            random_id: "c".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"text":"a","qrCodeContent":"b","randomId":"c"}"#);
    }

    #[test]
    fn test_from_cells_pads_and_truncates() {
        let grid = RenderedGrid::from_cells(vec![CellContent::qr_with_description("a", "b")], 2, 2);
        assert_eq!(grid.len(), 4);
        assert_eq!(grid.filled(), 1);

        let cells = vec![CellContent::qr_with_description("a", "b"); 6];
        assert_eq!(RenderedGrid::from_cells(cells, 2, 2).len(), 4);
    }
}
