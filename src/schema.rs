//! Declarative content schema: which content types exist, how to fetch
//! them, and how their fields map onto generated frontmatter.
//!
//! The schema is plain data. Transform behavior is selected by the
//! [`TransformKind`] tag and dispatched in the page generator, so the
//! registries stay serializable and testable on their own.

use serde::{Deserialize, Serialize};

/// Query directive disabling the API's default page size.
pub const DISABLE_PAGINATION: &str = "pagination[limit]=999";
/// Query directive expanding all relations (media, nested records).
pub const POPULATE_ALL: &str = "populate=*";

/// How a schema entry is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// Many records: one index page plus one detail page per record.
    Collection,
    /// Exactly one record, rendered as exactly one page.
    Singleton,
}

/// Tag selecting how a raw field value becomes a frontmatter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformKind {
    /// Emit the raw value unchanged.
    Copy,
    /// Resolve a single media reference to a local path (or remote URL).
    Image,
    /// Resolve a list of media references, order-preserving.
    ImageList,
}

/// One declarative rule: field key plus transform tag. Applied only when
/// the source record actually carries the key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldTransform {
    pub field_key: String,
    pub kind: TransformKind,
}

/// Everything the pipeline needs to know about one content type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSchemaEntry {
    /// Unique content-type key; names the snapshot file and page dir.
    pub key: String,
    /// API query path, relative to the `/api` root.
    pub fetch_path: String,
    /// Fallback page title when the record has none.
    pub display_title: String,
    /// Optional `type:` frontmatter line for the generator's templates.
    pub generator_type: Option<String>,
    /// Frontmatter lines in declaration order.
    pub field_transforms: Vec<FieldTransform>,
    /// Singleton-only override for the generated file name.
    pub output_file_name: Option<String>,
    pub kind: EntryKind,
}

fn copy(field_key: &str) -> FieldTransform {
    FieldTransform {
        field_key: field_key.to_string(),
        kind: TransformKind::Copy,
    }
}

fn image(field_key: &str) -> FieldTransform {
    FieldTransform {
        field_key: field_key.to_string(),
        kind: TransformKind::Image,
    }
}

fn image_list(field_key: &str) -> FieldTransform {
    FieldTransform {
        field_key: field_key.to_string(),
        kind: TransformKind::ImageList,
    }
}

/// All product collections share the same shape: filtered product query,
/// price/availability copy fields, cover image and gallery.
fn product_collection(key: &str, type_filter: &str, display_title: &str) -> ContentSchemaEntry {
    ContentSchemaEntry {
        key: key.to_string(),
        fetch_path: format!(
            "/products?filters[type][$eq]={}&{}&{}",
            type_filter, DISABLE_PAGINATION, POPULATE_ALL
        ),
        display_title: display_title.to_string(),
        generator_type: Some("products".to_string()),
        field_transforms: vec![
            copy("price"),
            copy("isReserved"),
            copy("isSold"),
            image("cover"),
            image_list("images"),
        ],
        output_file_name: None,
        kind: EntryKind::Collection,
    }
}

fn singleton(key: &str, transforms: Vec<FieldTransform>) -> ContentSchemaEntry {
    ContentSchemaEntry {
        key: key.to_string(),
        fetch_path: format!("/{}?{}", key.replace('_', "-"), POPULATE_ALL),
        display_title: key.to_string(),
        generator_type: None,
        field_transforms: transforms,
        output_file_name: None,
        kind: EntryKind::Singleton,
    }
}

/// Collection registry, in declaration (= processing) order.
pub fn collections() -> Vec<ContentSchemaEntry> {
    vec![
        product_collection("allerlei", "Allerlei", "Dies & Das"),
        product_collection("clutches", "Clutch", "Clutches"),
        product_collection("handytaschen", "Handytasche", "Handytaschen"),
        product_collection("necessaires", "Necessaire", "Necessaires"),
        product_collection("sacs", "Sac", "Wäschesäcke"),
    ]
}

/// Singleton registry, in declaration (= processing) order.
pub fn singletons() -> Vec<ContentSchemaEntry> {
    vec![
        singleton("about", vec![image("image")]),
        singleton("imprint", vec![]),
        ContentSchemaEntry {
            output_file_name: Some("_index.md".to_string()),
            ..singleton("landing", vec![image_list("images")])
        },
        singleton("privacy", vec![]),
        singleton("term_condition", vec![]),
    ]
}

/// Fetch-phase processing order: singletons before collections.
pub fn all_entries() -> Vec<ContentSchemaEntry> {
    let mut entries = singletons();
    entries.extend(collections());
    entries
}
