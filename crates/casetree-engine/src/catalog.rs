// Column catalog - static registry of every field a column can show
//
// Each entry is keyed by its logical field name. Link-backed fields (Case #,
// AE/AM, Work Group) carry the physical link field they bind to: the
// committed column renders the link as data and the logical field as the
// visible cell text. Adding a field is a table entry, not new branch code.

use casetree_types::{
    CellType, ColumnId, ColumnSpec, FieldBinding, FieldChoice, RenderOptions, TypeAttributes,
};

const LINK_TARGET: &str = "_blank";
const WIDE_TEXT_WIDTH: u32 = 300;
const DATE_WIDTH: u32 = 130;

/// Static description of one known field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub field_name: &'static str,
    pub label: &'static str,
    pub cell_type: CellType,
    /// Physical link field a column for this entry binds to.
    pub link_field: Option<&'static str>,
    pub wrap_text: bool,
    pub initial_width: Option<u32>,
    /// Render dates as `02 Jan 2024` instead of the grid default.
    pub short_date: bool,
}

impl CatalogEntry {
    const fn new(field_name: &'static str, label: &'static str, cell_type: CellType) -> Self {
        Self {
            field_name,
            label,
            cell_type,
            link_field: None,
            wrap_text: false,
            initial_width: None,
            short_date: false,
        }
    }

    const fn text(field_name: &'static str, label: &'static str) -> Self {
        Self::new(field_name, label, CellType::Text)
    }

    const fn linked(field_name: &'static str, label: &'static str, link: &'static str) -> Self {
        let mut entry = Self::new(field_name, label, CellType::Url);
        entry.link_field = Some(link);
        entry
    }

    const fn date(field_name: &'static str, label: &'static str) -> Self {
        let mut entry = Self::new(field_name, label, CellType::Date);
        entry.initial_width = Some(DATE_WIDTH);
        entry
    }

    const fn width(mut self, width: u32) -> Self {
        self.initial_width = Some(width);
        self
    }

    const fn wide(mut self) -> Self {
        self.wrap_text = true;
        self.initial_width = Some(WIDE_TEXT_WIDTH);
        self
    }

    const fn short_date(mut self) -> Self {
        self.short_date = true;
        self
    }

    /// Field the committed column binds its data to.
    pub fn bound_field(&self) -> &'static str {
        self.link_field.unwrap_or(self.field_name)
    }

    fn render_options(&self) -> RenderOptions {
        let mut type_attributes = TypeAttributes::default();
        match self.cell_type {
            CellType::Url => {
                type_attributes.label = Some(FieldBinding {
                    field_name: self.field_name.to_string(),
                });
                type_attributes.target = Some(LINK_TARGET.to_string());
            }
            CellType::Date if self.short_date => {
                type_attributes.year = Some("numeric".to_string());
                type_attributes.month = Some("short".to_string());
                type_attributes.day = Some("2-digit".to_string());
            }
            CellType::Number => type_attributes.maximum_fraction_digits = Some(0),
            _ => {}
        }

        RenderOptions {
            type_attributes,
            wrap_text: self.wrap_text,
            initial_width: self.initial_width,
            editable: false,
        }
    }
}

static CATALOG: &[CatalogEntry] = &[
    CatalogEntry::linked("caseNumber", "Case #", "caseUrl").width(110),
    CatalogEntry::text("subject", "Subject").wide(),
    CatalogEntry::text("description", "Description").wide(),
    CatalogEntry::text("status", "Status").width(120),
    CatalogEntry::text("priority", "Priority").width(100),
    CatalogEntry::text("caseType", "Type").width(120),
    CatalogEntry::new("childCount", "Child Count", CellType::Number).width(110),
    CatalogEntry::linked("aeAm", "AE/AM", "aeAmUrl"),
    CatalogEntry::linked("workGroup", "Work Group", "workGroupUrl"),
    CatalogEntry::text("origin", "Origin"),
    CatalogEntry::text("ownerName", "Owner"),
    CatalogEntry::date("createdDate", "Created").short_date(),
    CatalogEntry::date("lastModifiedDate", "Last Modified"),
    CatalogEntry::date("closedDate", "Closed").short_date(),
    CatalogEntry::new("isClosed", "Closed?", CellType::Boolean).width(90),
    CatalogEntry::new("isEscalated", "Escalated", CellType::Boolean).width(100),
];

/// Columns shown on first view, as logical field names.
pub const DEFAULT_FIELDS: &[&str] = &[
    "caseNumber",
    "subject",
    "status",
    "priority",
    "caseType",
    "childCount",
    "aeAm",
    "workGroup",
];

/// Field a freshly added draft column starts with when every catalog field
/// is already in use.
pub const FALLBACK_FIELD: &str = "subject";

pub fn entries() -> &'static [CatalogEntry] {
    CATALOG
}

/// Look up an entry by logical field name, or by the physical link field of
/// a link-backed entry.
pub fn resolve(field_name: &str) -> Option<&'static CatalogEntry> {
    let field_name = field_name.trim();
    CATALOG
        .iter()
        .find(|entry| entry.field_name == field_name)
        .or_else(|| {
            CATALOG
                .iter()
                .find(|entry| entry.link_field == Some(field_name))
        })
}

/// Reverse of the alias rule: the logical field a column bound to
/// `physical` presents in the editor. Unknown names map to themselves.
pub fn logical_field(physical: &str) -> &str {
    match resolve(physical) {
        Some(entry) => entry.field_name,
        None => physical,
    }
}

/// Header label the catalog suggests for a field.
pub fn default_label(field_name: &str) -> Option<&'static str> {
    resolve(field_name).map(|entry| entry.label)
}

/// Resolve a (label, field) pair into a render-ready column.
///
/// Link-backed fields bind the column to their link field while the chosen
/// logical field drives the visible cell text. Unrecognized fields become
/// plain text columns bound to the name as given. A blank label falls back
/// to the catalog label.
pub fn build_column(id: ColumnId, label: &str, field_name: &str) -> ColumnSpec {
    let label = label.trim();
    match resolve(field_name) {
        Some(entry) => ColumnSpec {
            id,
            label: if label.is_empty() {
                entry.label.to_string()
            } else {
                label.to_string()
            },
            field_name: entry.bound_field().to_string(),
            cell_type: entry.cell_type,
            render: entry.render_options(),
        },
        None => ColumnSpec {
            id,
            label: label.to_string(),
            field_name: field_name.trim().to_string(),
            cell_type: CellType::Text,
            render: RenderOptions::default(),
        },
    }
}

/// Candidate list for a field picker, marking `selected` (logical or
/// physical name) as chosen.
pub fn field_choices(selected: &str) -> Vec<FieldChoice> {
    let selected = logical_field(selected);
    CATALOG
        .iter()
        .map(|entry| FieldChoice {
            label: entry.label.to_string(),
            value: entry.field_name.to_string(),
            is_selected: entry.field_name == selected,
        })
        .collect()
}
