#![warn(missing_docs)]
//! # build-info-core
//!
//! ## Purpose
//! Defines the pure data model and rendering rules used across the
//! `build-info` workspace.
//!
//! ## Responsibilities
//! - Name every form field and its input kind ([`FieldName`], [`FieldKind`]).
//! - Represent one build announcement as a [`BuildRecord`].
//! - Convert records to and from the flat [`FormData`] draft mapping.
//! - Render the fixed plain-text announcement and its download filename.
//!
//! ## Data flow
//! Form edits produce [`FormData`] snapshots. Snapshots are persisted as the
//! draft through [`draft_to_json`] / [`draft_from_json`], and converted into a
//! [`BuildRecord`] for [`generate_content`] and [`output_filename`].
//!
//! ## Ownership and lifetimes
//! Records and drafts own their strings; nothing here borrows from the form
//! view, so snapshots can be handed to storage or download code freely.
//!
//! ## Error model
//! Rendering is infallible. Only draft decoding can fail, reported as
//! [`CoreError`].
//!
//! ## Example
//! ```rust
//! use build_info_core::{BuildRecord, FieldName, output_filename};
//!
//! let mut record = BuildRecord::default();
//! record.set(FieldName::Brand, "Acme Co.");
//! record.set(FieldName::SfNumber, "SF-123.4");
//! assert_eq!(output_filename(&record), "acme-co-sf-123.4.txt");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

/// Storage key holding the single persisted draft.
pub const DRAFT_STORAGE_KEY: &str = "buildFormData";

/// Value a checked checkbox contributes to form data.
pub const CHECKBOX_ON: &str = "on";

/// Substituted for an empty design-shell link in rendered output.
pub const DESIGN_SHELL_LINK_FALLBACK: &str = "N/A";

/// Flat field-name to value mapping, as submitted by the form and persisted
/// as the draft.
pub type FormData = BTreeMap<String, String>;

/// Input control kind backing a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line text input.
    Text,
    /// Multi-line text area.
    TextArea,
    /// Drop-down selection; empty value means nothing selected.
    Select,
    /// Boolean checkbox.
    Checkbox,
}

/// Every field of the build form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldName {
    /// Tactic identifier.
    TacticId,
    /// Promo identifier.
    PromoId,
    /// Brand/department identifier.
    BrandDeptId,
    /// SF ticket number.
    SfNumber,
    /// Client name.
    Client,
    /// Brand name.
    Brand,
    /// Selected design shell type.
    DesignShellType,
    /// Link to the design shell.
    DesignShellLink,
    /// Script reference.
    Script,
    /// Program URLs, one per line.
    ProgramUrls,
    /// Jenkins build number.
    JenkinsBuild,
    /// Bundle number.
    BundleNumber,
    /// Whether this build clones a previous one.
    IsCloneBuild,
    /// Link to the cloned build.
    PreviousLink,
}

impl FieldName {
    /// All fields in display order.
    pub const ALL: [FieldName; 14] = [
        FieldName::TacticId,
        FieldName::PromoId,
        FieldName::BrandDeptId,
        FieldName::SfNumber,
        FieldName::Client,
        FieldName::Brand,
        FieldName::DesignShellType,
        FieldName::DesignShellLink,
        FieldName::Script,
        FieldName::ProgramUrls,
        FieldName::JenkinsBuild,
        FieldName::BundleNumber,
        FieldName::IsCloneBuild,
        FieldName::PreviousLink,
    ];

    /// Form/storage key of the field.
    pub fn key(self) -> &'static str {
        match self {
            FieldName::TacticId => "tacticId",
            FieldName::PromoId => "promoId",
            FieldName::BrandDeptId => "brandDeptId",
            FieldName::SfNumber => "sfNumber",
            FieldName::Client => "client",
            FieldName::Brand => "brand",
            FieldName::DesignShellType => "designShellType",
            FieldName::DesignShellLink => "designShellLink",
            FieldName::Script => "script",
            FieldName::ProgramUrls => "programUrls",
            FieldName::JenkinsBuild => "jenkinsBuild",
            FieldName::BundleNumber => "bundleNumber",
            FieldName::IsCloneBuild => "isCloneBuild",
            FieldName::PreviousLink => "previousLink",
        }
    }

    /// Resolves a form/storage key. Unknown keys yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    /// Input kind of the field.
    pub fn kind(self) -> FieldKind {
        match self {
            FieldName::ProgramUrls => FieldKind::TextArea,
            FieldName::DesignShellType => FieldKind::Select,
            FieldName::IsCloneBuild => FieldKind::Checkbox,
            _ => FieldKind::Text,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            FieldName::TacticId => "Tactic ID",
            FieldName::PromoId => "Promo ID",
            FieldName::BrandDeptId => "Brand/Department ID",
            FieldName::SfNumber => "SF#",
            FieldName::Client => "Client",
            FieldName::Brand => "Brand",
            FieldName::DesignShellType => "Design Shell",
            FieldName::DesignShellLink => "Link to Design Shell (FIGMA)",
            FieldName::Script => "Script",
            FieldName::ProgramUrls => "Program URLs",
            FieldName::JenkinsBuild => "Jenkins Build #",
            FieldName::BundleNumber => "Bundle #",
            FieldName::IsCloneBuild => "Clone build",
            FieldName::PreviousLink => "Previous link",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One build announcement. Missing values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildRecord {
    /// Tactic identifier.
    pub tactic_id: String,
    /// Promo identifier.
    pub promo_id: String,
    /// Brand/department identifier.
    pub brand_dept_id: String,
    /// SF ticket number.
    pub sf_number: String,
    /// Client name.
    pub client: String,
    /// Brand name.
    pub brand: String,
    /// Selected design shell type; empty when none.
    pub design_shell_type: String,
    /// Design shell link; empty renders as [`DESIGN_SHELL_LINK_FALLBACK`].
    pub design_shell_link: String,
    /// Script reference.
    pub script: String,
    /// Program URLs.
    pub program_urls: String,
    /// Jenkins build number.
    pub jenkins_build: String,
    /// Bundle number.
    pub bundle_number: String,
    /// Clone-build flag.
    pub is_clone_build: bool,
    /// Link to the cloned build.
    pub previous_link: String,
}

impl BuildRecord {
    /// Builds a record from submitted form data.
    ///
    /// Absent keys become empty strings. The checkbox is set when its value
    /// is [`CHECKBOX_ON`] (or `"true"`, tolerated for hand-edited drafts).
    pub fn from_form_data(data: &FormData) -> Self {
        let mut record = Self::default();
        for field in FieldName::ALL {
            if let Some(value) = data.get(field.key()) {
                record.set(field, value);
            }
        }
        record
    }

    /// Serializes the record the way a form submission would: every text
    /// field is present, the checkbox only when checked.
    pub fn to_form_data(&self) -> FormData {
        let mut data = FormData::new();
        for field in FieldName::ALL {
            if field.kind() == FieldKind::Checkbox && !self.is_clone_build {
                continue;
            }
            data.insert(field.key().to_string(), self.get(field));
        }
        data
    }

    /// Returns a field's form value. The checkbox reads as [`CHECKBOX_ON`]
    /// or empty.
    pub fn get(&self, field: FieldName) -> String {
        match field {
            FieldName::IsCloneBuild => {
                if self.is_clone_build {
                    CHECKBOX_ON.to_string()
                } else {
                    String::new()
                }
            }
            other => self.text(other).to_string(),
        }
    }

    /// Sets a field from its form value.
    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        let value = value.into();
        match field {
            FieldName::TacticId => self.tactic_id = value,
            FieldName::PromoId => self.promo_id = value,
            FieldName::BrandDeptId => self.brand_dept_id = value,
            FieldName::SfNumber => self.sf_number = value,
            FieldName::Client => self.client = value,
            FieldName::Brand => self.brand = value,
            FieldName::DesignShellType => self.design_shell_type = value,
            FieldName::DesignShellLink => self.design_shell_link = value,
            FieldName::Script => self.script = value,
            FieldName::ProgramUrls => self.program_urls = value,
            FieldName::JenkinsBuild => self.jenkins_build = value,
            FieldName::BundleNumber => self.bundle_number = value,
            FieldName::IsCloneBuild => self.is_clone_build = checkbox_checked(&value),
            FieldName::PreviousLink => self.previous_link = value,
        }
    }

    /// Previous link to render, present only for clone builds that carry one.
    pub fn previous_link_block(&self) -> Option<&str> {
        (self.is_clone_build && !self.previous_link.is_empty())
            .then_some(self.previous_link.as_str())
    }

    fn text(&self, field: FieldName) -> &str {
        match field {
            FieldName::TacticId => &self.tactic_id,
            FieldName::PromoId => &self.promo_id,
            FieldName::BrandDeptId => &self.brand_dept_id,
            FieldName::SfNumber => &self.sf_number,
            FieldName::Client => &self.client,
            FieldName::Brand => &self.brand,
            FieldName::DesignShellType => &self.design_shell_type,
            FieldName::DesignShellLink => &self.design_shell_link,
            FieldName::Script => &self.script,
            FieldName::ProgramUrls => &self.program_urls,
            FieldName::JenkinsBuild => &self.jenkins_build,
            FieldName::BundleNumber => &self.bundle_number,
            FieldName::IsCloneBuild => "",
            FieldName::PreviousLink => &self.previous_link,
        }
    }
}

/// Returns `true` for the values a checked checkbox may be stored as.
pub fn checkbox_checked(value: &str) -> bool {
    value == CHECKBOX_ON || value.eq_ignore_ascii_case("true")
}

/// Renders the announcement text for a record.
///
/// # Semantics
/// Every line is always emitted; missing values render as empty strings. The
/// "Previous link" block appears only for clone builds with a link. The
/// result has no trailing newline.
pub fn generate_content(record: &BuildRecord) -> String {
    let build_kind = if record.is_clone_build {
        "clone"
    } else {
        "initial"
    };
    let design_shell_link = if record.design_shell_link.is_empty() {
        DESIGN_SHELL_LINK_FALLBACK
    } else {
        record.design_shell_link.as_str()
    };

    let mut lines = vec![
        "Hi Everyone".to_string(),
        String::new(),
        format!(
            "This {build_kind} build is completed and is ready for internal review. Please see information below."
        ),
        String::new(),
        format!("Tactic ID: {}", record.tactic_id),
        format!("Promo ID: {}", record.promo_id),
        format!("Brand/Department ID: {}", record.brand_dept_id),
        format!("SF#: {}", record.sf_number),
        String::new(),
        format!("Client: {}", record.client),
        format!("Brand: {}", record.brand),
        String::new(),
        format!("Design Shell: {}", record.design_shell_type),
        format!("*** Link to Design Shell (FIGMA): {design_shell_link}"),
        String::new(),
        format!("Script: {}", record.script),
    ];

    if let Some(previous_link) = record.previous_link_block() {
        lines.push("Previous link: ".to_string());
        lines.push(previous_link.to_string());
    }

    lines.extend([
        String::new(),
        "Program URLs: ".to_string(),
        record.program_urls.clone(),
        String::new(),
        format!("Jenkins Build #: {}", record.jenkins_build),
        format!("Bundle #: {}", record.bundle_number),
    ]);

    lines.join("\n")
}

/// Lowercases a brand and replaces every non-alphanumeric character with `-`.
///
/// Leading and trailing `-` are trimmed so punctuation at either end never
/// doubles the separator in [`output_filename`]. Replacement is per `char`,
/// so one emoji yields one `-`.
pub fn sanitize_brand(brand: &str) -> String {
    let replaced: String = brand
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    replaced.trim_matches('-').to_string()
}

/// Keeps only `[a-zA-Z0-9.-]` from an SF number, lowercased.
pub fn sanitize_sf_number(sf_number: &str) -> String {
    sf_number
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '.' || *ch == '-')
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

/// Derives the download filename `<brand>-<sfNumber>.txt`.
pub fn output_filename(record: &BuildRecord) -> String {
    format!(
        "{}-{}.txt",
        sanitize_brand(&record.brand),
        sanitize_sf_number(&record.sf_number)
    )
}

/// Encodes a draft as a JSON object of string values.
pub fn draft_to_json(data: &FormData) -> Value {
    let object: Map<String, Value> = data
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect();
    Value::Object(object)
}

/// Decodes a persisted draft.
///
/// Non-string scalars written by other tools are coerced: `true` becomes
/// [`CHECKBOX_ON`], numbers their decimal text; `false` and `null` drop the
/// key.
///
/// # Errors
/// Returns [`CoreError::InvalidDraft`] when the value is not a JSON object or
/// holds nested arrays/objects.
pub fn draft_from_json(value: Value) -> Result<FormData, CoreError> {
    let Value::Object(object) = value else {
        return Err(CoreError::InvalidDraft(
            "draft must be a JSON object".to_string(),
        ));
    };

    let mut data = FormData::new();
    for (key, value) in object {
        let text = match value {
            Value::String(text) => text,
            Value::Bool(true) => CHECKBOX_ON.to_string(),
            Value::Number(number) => number.to_string(),
            Value::Bool(false) | Value::Null => continue,
            Value::Array(_) | Value::Object(_) => {
                return Err(CoreError::InvalidDraft(format!(
                    "draft value for '{key}' must be a scalar"
                )));
            }
        };
        data.insert(key, text);
    }

    Ok(data)
}

/// Parses a draft from raw JSON text.
///
/// # Errors
/// Returns [`CoreError::Codec`] for malformed JSON and
/// [`CoreError::InvalidDraft`] for a structurally invalid draft.
pub fn draft_from_str(raw: &str) -> Result<FormData, CoreError> {
    let value: Value = serde_json::from_str(raw)?;
    draft_from_json(value)
}

/// Error type for draft decoding.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Draft does not have the expected shape.
    #[error("invalid draft: {0}")]
    InvalidDraft(String),
    /// JSON decoding error.
    #[error("draft codec failure: {0}")]
    Codec(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    //! Unit tests for field keys and record conversion.

    use super::*;

    #[test]
    fn field_keys_resolve_back_to_fields() {
        for field in FieldName::ALL {
            assert_eq!(FieldName::from_key(field.key()), Some(field));
        }
        assert_eq!(FieldName::from_key("unknownField"), None);
    }

    #[test]
    fn unchecked_checkbox_is_omitted_from_form_data() {
        let record = BuildRecord::default();
        let data = record.to_form_data();
        assert!(!data.contains_key("isCloneBuild"));
        assert_eq!(data.get("brand").map(String::as_str), Some(""));
        assert_eq!(data.len(), FieldName::ALL.len() - 1);
    }

    #[test]
    fn checked_checkbox_serializes_as_on() {
        let mut record = BuildRecord::default();
        record.set(FieldName::IsCloneBuild, CHECKBOX_ON);
        assert!(record.is_clone_build);
        assert_eq!(
            record.to_form_data().get("isCloneBuild").map(String::as_str),
            Some("on")
        );
    }

    #[test]
    fn draft_decoding_coerces_scalars() {
        let value = serde_json::json!({
            "brand": "Acme",
            "isCloneBuild": true,
            "jenkinsBuild": 42,
            "previousLink": null,
        });
        let data = draft_from_json(value).expect("draft should decode");
        assert_eq!(data.get("isCloneBuild").map(String::as_str), Some("on"));
        assert_eq!(data.get("jenkinsBuild").map(String::as_str), Some("42"));
        assert!(!data.contains_key("previousLink"));
    }

    #[test]
    fn draft_decoding_rejects_non_objects() {
        assert!(matches!(
            draft_from_json(serde_json::json!(["brand"])),
            Err(CoreError::InvalidDraft(_))
        ));
        assert!(matches!(
            draft_from_str("{not json"),
            Err(CoreError::Codec(_))
        ));
    }
}
