//! Filter template and effective-filter data structures
//!
//! - `TemplateField`: one named field with a typed default value
//! - `FilterTemplate`: the ordered field list behind one controller
//! - `FilterTemplateBuilder`: validating builder for templates
//! - `EffectiveFilters`: a template-shaped snapshot with URL overrides
//!
//! A field's kind is carried by the variant of its default `FilterValue`,
//! so the coercion rule is fixed at build time: `.string_list("tags", [])`
//! declares a string list even though the default is empty, and nothing is
//! ever inferred from element inspection at decode time.
//!
//! Fields serialize with their declared `kind` next to the value. Values
//! themselves are untagged on the wire, and an untagged empty list cannot
//! tell a string list from a number list; the persisted kind restores the
//! declaration on read, and a document whose kind contradicts its value is
//! rejected.

use super::error::FilterError;
use crate::value::{FilterKind, FilterValue};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One template field: a name plus a typed default value
///
/// Serializes as `{ name, kind, default }` so the declared kind survives a
/// round trip even when the default is an empty list.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateField {
    name: String,
    default: FilterValue,
}

impl TemplateField {
    /// Create a field after validating its name
    ///
    /// # Errors
    ///
    /// Returns `FilterError` if the name is empty or contains characters
    /// that would corrupt a query string.
    pub fn new(name: impl Into<String>, default: FilterValue) -> Result<Self, FilterError> {
        let name = name.into();
        validate_field_name(&name)?;
        Ok(Self { name, default })
    }

    /// The field name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The default value
    #[must_use]
    pub const fn default(&self) -> &FilterValue {
        &self.default
    }

    /// The field's declared kind
    #[must_use]
    pub const fn kind(&self) -> FilterKind {
        self.default.kind()
    }
}

/// Ordered set of filter fields with typed defaults
///
/// The field set and each field's kind are fixed for the lifetime of a
/// controller built from this template.
///
/// # Examples
///
/// ```
/// use filtersync::FilterTemplate;
///
/// let template = FilterTemplate::builder()
///     .string("search", "")
///     .string("category", "all")
///     .number("page", 1.0)
///     .build()
///     .unwrap();
///
/// assert_eq!(template.len(), 3);
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct FilterTemplate {
    fields: Vec<TemplateField>,
}

impl FilterTemplate {
    /// Create a builder for constructing a template
    #[must_use]
    pub fn builder() -> FilterTemplateBuilder {
        FilterTemplateBuilder::default()
    }

    /// The fields in declared order
    #[must_use]
    pub fn fields(&self) -> &[TemplateField] {
        &self.fields
    }

    /// Look up a field by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TemplateField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether a field with this name exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the template has no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for `FilterTemplate`
///
/// Each method declares one field with its kind and default. Validation
/// (name well-formedness, duplicates) happens in `build`.
#[derive(Debug, Clone, Default)]
pub struct FilterTemplateBuilder {
    fields: Vec<(String, FilterValue)>,
}

impl FilterTemplateBuilder {
    /// Declare a string field
    #[must_use]
    pub fn string(mut self, name: impl Into<String>, default: impl Into<String>) -> Self {
        self.fields.push((name.into(), FilterValue::Str(default.into())));
        self
    }

    /// Declare a numeric field
    #[must_use]
    pub fn number(mut self, name: impl Into<String>, default: f64) -> Self {
        self.fields.push((name.into(), FilterValue::Number(default)));
        self
    }

    /// Declare a boolean field
    #[must_use]
    pub fn boolean(mut self, name: impl Into<String>, default: bool) -> Self {
        self.fields.push((name.into(), FilterValue::Boolean(default)));
        self
    }

    /// Declare a string-list field
    #[must_use]
    pub fn string_list<I, S>(mut self, name: impl Into<String>, default: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = default.into_iter().map(Into::into).collect();
        self.fields.push((name.into(), FilterValue::StrList(items)));
        self
    }

    /// Declare a number-list field
    #[must_use]
    pub fn number_list(mut self, name: impl Into<String>, default: impl IntoIterator<Item = f64>) -> Self {
        let items = default.into_iter().collect();
        self.fields.push((name.into(), FilterValue::NumberList(items)));
        self
    }

    /// Declare a field from an already-typed default value
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, default: FilterValue) -> Self {
        self.fields.push((name.into(), default));
        self
    }

    /// Build the template
    ///
    /// # Errors
    ///
    /// Returns `FilterError` if any field name is empty or ill-formed, or
    /// if two fields share a name.
    pub fn build(self) -> Result<FilterTemplate, FilterError> {
        let mut fields: Vec<TemplateField> = Vec::with_capacity(self.fields.len());
        for (name, default) in self.fields {
            if fields.iter().any(|f| f.name() == name) {
                return Err(FilterError::DuplicateField(name));
            }
            fields.push(TemplateField::new(name, default)?);
        }
        Ok(FilterTemplate { fields })
    }
}

/// The filter object actually consumed by a list view
///
/// Template-shaped: same fields in the same order, each holding either the
/// URL-derived value or the template default. Recomputed fresh on every
/// controller read; never mutated in place from outside.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EffectiveFilters {
    fields: Vec<EffectiveField>,
}

/// One resolved field inside `EffectiveFilters`
///
/// Serializes as `{ name, kind, value }`, mirroring `TemplateField`, so an
/// empty list value keeps its declared element kind across persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveField {
    name: String,
    value: FilterValue,
}

impl EffectiveField {
    pub(crate) const fn new(name: String, value: FilterValue) -> Self {
        Self { name, value }
    }

    /// The field name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved value
    #[must_use]
    pub const fn value(&self) -> &FilterValue {
        &self.value
    }
}

impl EffectiveFilters {
    pub(crate) const fn from_fields(fields: Vec<EffectiveField>) -> Self {
        Self { fields }
    }

    /// A snapshot equal to the template defaults, no overrides applied
    #[must_use]
    pub fn from_template(template: &FilterTemplate) -> Self {
        let fields = template
            .fields()
            .iter()
            .map(|f| EffectiveField::new(f.name().to_string(), f.default().clone()))
            .collect();
        Self { fields }
    }

    /// Look up a field's value by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(EffectiveField::value)
    }

    /// The string value of `name`, if present and a string
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FilterValue::as_str)
    }

    /// The numeric value of `name`, if present and a number
    ///
    /// May be `NaN` when the URL carried malformed numeric input.
    #[must_use]
    pub fn get_number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FilterValue::as_number)
    }

    /// The boolean value of `name`, if present and a boolean
    #[must_use]
    pub fn get_boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FilterValue::as_boolean)
    }

    /// The string list of `name`, if present and a string list
    #[must_use]
    pub fn get_str_list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(FilterValue::as_str_list)
    }

    /// The number list of `name`, if present and a number list
    #[must_use]
    pub fn get_number_list(&self, name: &str) -> Option<&[f64]> {
        self.get(name).and_then(FilterValue::as_number_list)
    }

    /// Iterate over fields in template order
    pub fn iter(&self) -> impl Iterator<Item = &EffectiveField> {
        self.fields.iter()
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether there are no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Serialize)]
struct TemplateFieldRef<'a> {
    name: &'a str,
    kind: FilterKind,
    default: &'a FilterValue,
}

#[derive(Deserialize)]
struct TemplateFieldRepr {
    name: String,
    kind: FilterKind,
    default: FilterValue,
}

impl Serialize for TemplateField {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        TemplateFieldRef {
            name: &self.name,
            kind: self.kind(),
            default: &self.default,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TemplateField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = TemplateFieldRepr::deserialize(deserializer)?;
        let default = apply_declared_kind(repr.default, repr.kind).map_err(D::Error::custom)?;
        Self::new(repr.name, default).map_err(D::Error::custom)
    }
}

#[derive(Deserialize)]
struct FilterTemplateRepr {
    fields: Vec<TemplateField>,
}

impl<'de> Deserialize<'de> for FilterTemplate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = FilterTemplateRepr::deserialize(deserializer)?;
        for (index, field) in repr.fields.iter().enumerate() {
            if repr.fields[..index].iter().any(|f| f.name() == field.name()) {
                return Err(D::Error::custom(FilterError::DuplicateField(
                    field.name().to_string(),
                )));
            }
        }
        Ok(Self {
            fields: repr.fields,
        })
    }
}

#[derive(Serialize)]
struct EffectiveFieldRef<'a> {
    name: &'a str,
    kind: FilterKind,
    value: &'a FilterValue,
}

#[derive(Deserialize)]
struct EffectiveFieldRepr {
    name: String,
    kind: FilterKind,
    value: FilterValue,
}

impl Serialize for EffectiveField {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        EffectiveFieldRef {
            name: &self.name,
            kind: self.value.kind(),
            value: &self.value,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EffectiveField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = EffectiveFieldRepr::deserialize(deserializer)?;
        let value = apply_declared_kind(repr.value, repr.kind).map_err(D::Error::custom)?;
        Ok(Self::new(repr.name, value))
    }
}

/// Restore a declared kind after the untagged value round trip
///
/// The only information the untagged wire shape loses is the element kind
/// of an empty list, which deserializes as a string list; any other
/// mismatch between the declared kind and the value is a corrupt document.
fn apply_declared_kind(value: FilterValue, kind: FilterKind) -> Result<FilterValue, String> {
    if value.kind() == kind {
        return Ok(value);
    }
    match (value, kind) {
        (FilterValue::StrList(items), FilterKind::NumberList) if items.is_empty() => {
            Ok(FilterValue::NumberList(Vec::new()))
        }
        (FilterValue::NumberList(items), FilterKind::StrList) if items.is_empty() => {
            Ok(FilterValue::StrList(Vec::new()))
        }
        (value, kind) => Err(format!(
            "declared kind {kind:?} does not match value kind {:?}",
            value.kind()
        )),
    }
}

/// Validate a filter field name
///
/// Field names become query-string keys, so they must not be empty and must
/// not contain the structural characters `&`, `=`, `#`, `?` or whitespace.
/// Percent-encoding would technically allow them, but a key that changes
/// spelling between the template and the address bar is a foot-gun for any
/// other consumer of the same URL.
///
/// # Errors
///
/// Returns `FilterError` describing the offending character.
pub fn validate_field_name(name: &str) -> Result<(), FilterError> {
    if name.is_empty() {
        return Err(FilterError::EmptyFieldName);
    }
    if let Some(bad) = name.chars().find(|c| is_structural(*c)) {
        return Err(FilterError::InvalidFieldName(
            name.to_string(),
            format!("contains '{bad}'"),
        ));
    }
    Ok(())
}

/// Validate a controller namespace, same rules as field names
///
/// # Errors
///
/// Returns `FilterError` if the namespace is empty or ill-formed.
pub fn validate_namespace(namespace: &str) -> Result<(), FilterError> {
    if namespace.is_empty() {
        return Err(FilterError::InvalidNamespace(
            String::new(),
            "cannot be empty".to_string(),
        ));
    }
    if let Some(bad) = namespace.chars().find(|c| is_structural(*c)) {
        return Err(FilterError::InvalidNamespace(
            namespace.to_string(),
            format!("contains '{bad}'"),
        ));
    }
    Ok(())
}

fn is_structural(c: char) -> bool {
    matches!(c, '&' | '=' | '#' | '?') || c.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_declares_kinds() {
        let template = FilterTemplate::builder()
            .string("search", "")
            .number("page", 1.0)
            .boolean("in_stock", false)
            .string_list("categories", ["all"])
            .number_list("price_range", [0.0, 100.0])
            .build()
            .unwrap();

        assert_eq!(template.len(), 5);
        assert_eq!(template.get("search").unwrap().kind(), FilterKind::Str);
        assert_eq!(template.get("page").unwrap().kind(), FilterKind::Number);
        assert_eq!(template.get("in_stock").unwrap().kind(), FilterKind::Boolean);
        assert_eq!(
            template.get("categories").unwrap().kind(),
            FilterKind::StrList
        );
        assert_eq!(
            template.get("price_range").unwrap().kind(),
            FilterKind::NumberList
        );
    }

    #[test]
    fn test_builder_preserves_declaration_order() {
        let template = FilterTemplate::builder()
            .string("b", "")
            .string("a", "")
            .string("c", "")
            .build()
            .unwrap();

        let names: Vec<_> = template.fields().iter().map(TemplateField::name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_builder_rejects_duplicate_field() {
        let result = FilterTemplate::builder()
            .string("page", "")
            .number("page", 1.0)
            .build();
        assert_eq!(result, Err(FilterError::DuplicateField("page".to_string())));
    }

    #[test]
    fn test_builder_rejects_bad_names() {
        assert_eq!(
            FilterTemplate::builder().string("", "").build(),
            Err(FilterError::EmptyFieldName)
        );
        assert!(FilterTemplate::builder().string("a&b", "").build().is_err());
        assert!(FilterTemplate::builder().string("a=b", "").build().is_err());
        assert!(FilterTemplate::builder().string("a b", "").build().is_err());
    }

    #[test]
    fn test_empty_list_declares_element_kind() {
        let template = FilterTemplate::builder()
            .string_list("tags", Vec::<String>::new())
            .number_list("ids", [])
            .build()
            .unwrap();

        assert_eq!(template.get("tags").unwrap().kind(), FilterKind::StrList);
        assert_eq!(template.get("ids").unwrap().kind(), FilterKind::NumberList);
    }

    #[test]
    fn test_validate_namespace() {
        assert!(validate_namespace("shop").is_ok());
        assert!(validate_namespace("user-list").is_ok());
        assert!(validate_namespace("").is_err());
        assert!(validate_namespace("a=b").is_err());
        assert!(validate_namespace("a b").is_err());
    }

    #[test]
    fn test_effective_filters_from_template_equals_defaults() {
        let template = FilterTemplate::builder()
            .string("search", "")
            .number("page", 1.0)
            .build()
            .unwrap();

        let filters = EffectiveFilters::from_template(&template);
        assert_eq!(filters.get_str("search"), Some(""));
        assert_eq!(filters.get_number("page"), Some(1.0));
        assert_eq!(filters.get("missing"), None);
    }

    #[test]
    fn test_template_serde_round_trip() {
        let template = FilterTemplate::builder()
            .string("search", "test")
            .number("page", 2.0)
            .string_list("categories", ["books", "movies"])
            .build()
            .unwrap();

        let json = serde_json::to_string(&template).unwrap();
        let back: FilterTemplate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, template);
    }

    #[test]
    fn test_empty_list_kind_survives_serde_round_trip() {
        let template = FilterTemplate::builder()
            .number_list("ids", [])
            .string_list("tags", Vec::<String>::new())
            .build()
            .unwrap();

        let json = serde_json::to_string(&template).unwrap();
        let back: FilterTemplate = serde_json::from_str(&json).unwrap();

        assert_eq!(back.get("ids").unwrap().kind(), FilterKind::NumberList);
        assert_eq!(back.get("tags").unwrap().kind(), FilterKind::StrList);
        assert_eq!(back, template);
    }

    #[test]
    fn test_field_deserialize_rejects_kind_mismatch() {
        let json = r#"{"name":"ids","kind":"number-list","default":["a","b"]}"#;
        assert!(serde_json::from_str::<TemplateField>(json).is_err());

        // Names are validated on this path too
        let json = r#"{"name":"a b","kind":"str","default":""}"#;
        assert!(serde_json::from_str::<TemplateField>(json).is_err());
    }

    #[test]
    fn test_template_deserialize_rejects_duplicate_fields() {
        let json = r#"{"fields":[
            {"name":"page","kind":"number","default":1.0},
            {"name":"page","kind":"str","default":""}
        ]}"#;
        assert!(serde_json::from_str::<FilterTemplate>(json).is_err());
    }

    #[test]
    fn test_snapshot_empty_list_kind_survives_serde() {
        let template = FilterTemplate::builder()
            .number_list("ids", [])
            .build()
            .unwrap();
        let snapshot = EffectiveFilters::from_template(&template);

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: EffectiveFilters = serde_json::from_str(&json).unwrap();

        assert_eq!(back.get_number_list("ids"), Some(&[][..]));
        assert_eq!(back, snapshot);
    }
}
