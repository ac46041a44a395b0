use crate::error::ParameterError;
use crate::flow::NodeKind;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The free-form parameter bag written by the stage editors.
///
/// Which fields are meaningful depends on the stage kind; conversion into a
/// typed parameter set happens through the `TryFrom<&RawStageConfig>` impls below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStageConfig {
    pub id: String,
    pub op: String,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub logic: Option<String>,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub comparand: Option<String>,
    #[serde(default)]
    pub replacement: Option<String>,
    #[serde(default)]
    pub newcol: Option<String>,
}

impl RawStageConfig {
    fn required(
        &self,
        value: &Option<String>,
        field: &'static str,
    ) -> Result<String, ParameterError> {
        non_empty(value)
            .map(str::to_string)
            .ok_or_else(|| ParameterError::MissingField {
                node_id: self.id.clone(),
                field,
            })
    }

    fn check_identity(&self) -> Result<(), ParameterError> {
        if self.id.trim().is_empty() {
            return Err(ParameterError::MissingNodeId);
        }
        if self.op.trim().is_empty() {
            return Err(ParameterError::MissingField {
                node_id: self.id.clone(),
                field: "op",
            });
        }
        Ok(())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Splits a `|`-separated list, trimming entries and dropping empty ones.
fn split_alternatives(value: &str) -> Vec<String> {
    value
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Generates a string-tagged enum with `as_str`, `Display` and `FromStr`.
macro_rules! string_enum {
    ( $(#[$meta:meta])* $name:ident { $( $variant:ident => $tag:literal ),* $(,)? } ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( #[serde(rename = $tag)] $variant, )*
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $tag, )*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ();
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $tag => Ok($name::$variant), )*
                    _ => Err(()),
                }
            }
        }
    };
}

string_enum! {
    /// Row predicate applied by a filter stage.
    FilterMode {
        Equal => "equal",
        NotEqual => "not_equal",
        Contains => "contains",
        NotContains => "not_contains",
        StartsWith => "starts_with",
        NotStartsWith => "not_starts_with",
        EndsWith => "ends_with",
        NotEndsWith => "not_ends_with",
        IsNull => "is_null",
        IsNotNull => "is_not_null",
        Gt => "gt",
        Ge => "ge",
        Lt => "lt",
        Le => "le",
        Between => "between",
    }
}

string_enum! {
    /// How a filter combines with the other filters of the pipeline.
    FilterLogic {
        And => "and",
        Or => "or",
    }
}

impl FilterMode {
    pub fn takes_value(&self) -> bool {
        !matches!(self, FilterMode::IsNull | FilterMode::IsNotNull)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FilterMode::Gt | FilterMode::Ge | FilterMode::Lt | FilterMode::Le
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectParams {
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    pub column: String,
    pub mode: FilterMode,
    pub value: Option<String>,
    pub logic: FilterLogic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrParams {
    pub column: String,
    pub mode: String,
    pub comparand: Option<String>,
    pub replacement: Option<String>,
    pub newcol: Option<String>,
}

/// String modes that rewrite the column in place instead of adding a new one.
const IN_PLACE_STR_MODES: &[&str] = &[
    "fill",
    "f_fill",
    "lower",
    "upper",
    "trim",
    "ltrim",
    "rtrim",
    "squeeze",
    "strip",
    "replace",
    "regex_replace",
    "round",
    "reverse",
    "abs",
    "neg",
    "normalize",
];

impl StrParams {
    pub fn produces_new_column(&self) -> bool {
        !IN_PLACE_STR_MODES.contains(&self.mode.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameParams {
    pub column: String,
    pub new_name: String,
}

impl TryFrom<&RawStageConfig> for SelectParams {
    type Error = ParameterError;

    fn try_from(raw: &RawStageConfig) -> Result<Self, Self::Error> {
        raw.check_identity()?;
        let columns = split_alternatives(&raw.required(&raw.column, "column")?);
        if columns.is_empty() {
            return Err(ParameterError::MissingField {
                node_id: raw.id.clone(),
                field: "column",
            });
        }
        Ok(Self { columns })
    }
}

impl TryFrom<&RawStageConfig> for FilterParams {
    type Error = ParameterError;

    fn try_from(raw: &RawStageConfig) -> Result<Self, Self::Error> {
        raw.check_identity()?;
        let column = raw.required(&raw.column, "column")?;
        let mode_text = raw.required(&raw.mode, "mode")?;
        let mode = mode_text
            .parse::<FilterMode>()
            .map_err(|_| ParameterError::UnknownFilterMode {
                node_id: raw.id.clone(),
                mode: mode_text.clone(),
            })?;

        let logic = match non_empty(&raw.logic) {
            None => FilterLogic::Or,
            Some(text) => text.to_lowercase().parse::<FilterLogic>().map_err(|_| {
                ParameterError::UnknownFilterLogic {
                    node_id: raw.id.clone(),
                    logic: text.to_string(),
                }
            })?,
        };

        let value = if mode.takes_value() {
            let value = raw.required(&raw.value, "value")?;
            check_filter_value(&raw.id, mode, &value)?;
            Some(value)
        } else {
            None
        };

        Ok(Self {
            column,
            mode,
            value,
            logic,
        })
    }
}

fn check_filter_value(
    node_id: &str,
    mode: FilterMode,
    value: &str,
) -> Result<(), ParameterError> {
    if mode.is_numeric() && value.parse::<f64>().is_err() {
        return Err(ParameterError::InvalidNumber {
            node_id: node_id.to_string(),
            value: value.to_string(),
        });
    }
    if mode == FilterMode::Between {
        let bounds: AHashSet<String> = split_alternatives(value).into_iter().collect();
        if bounds.len() != 2 {
            return Err(ParameterError::InvalidBetween {
                node_id: node_id.to_string(),
                value: value.to_string(),
            });
        }
    }
    Ok(())
}

impl TryFrom<&RawStageConfig> for StrParams {
    type Error = ParameterError;

    fn try_from(raw: &RawStageConfig) -> Result<Self, Self::Error> {
        raw.check_identity()?;
        let comparand = non_empty(&raw.comparand).map(str::to_string);
        // An empty replacement deletes the matched text, so it only survives
        // next to a comparand.
        let replacement = match comparand {
            Some(_) => raw.replacement.clone(),
            None => non_empty(&raw.replacement).map(str::to_string),
        };
        Ok(Self {
            column: raw.required(&raw.column, "column")?,
            mode: raw.required(&raw.mode, "mode")?,
            comparand,
            replacement,
            newcol: non_empty(&raw.newcol).map(str::to_string),
        })
    }
}

impl TryFrom<&RawStageConfig> for RenameParams {
    type Error = ParameterError;

    fn try_from(raw: &RawStageConfig) -> Result<Self, Self::Error> {
        raw.check_identity()?;
        Ok(Self {
            column: raw.required(&raw.column, "column")?,
            new_name: raw.required(&raw.value, "value")?,
        })
    }
}

/// Typed parameters of one stage, tagged by stage kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageParameters {
    Select(SelectParams),
    Filter(FilterParams),
    Str(StrParams),
    Rename(RenameParams),
}

impl StageParameters {
    pub fn kind(&self) -> NodeKind {
        match self {
            StageParameters::Select(_) => NodeKind::Select,
            StageParameters::Filter(_) => NodeKind::Filter,
            StageParameters::Str(_) => NodeKind::Str,
            StageParameters::Rename(_) => NodeKind::Rename,
        }
    }

    /// Flattens the parameters into the string map the engine consumes.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        let mut put = |key: &str, value: &str| {
            map.insert(key.to_string(), value.to_string());
        };
        match self {
            StageParameters::Select(p) => put("column", p.columns.join("|").as_str()),
            StageParameters::Filter(p) => {
                put("column", p.column.as_str());
                put("mode", p.mode.as_str());
                put("logic", p.logic.as_str());
                if let Some(value) = &p.value {
                    put("value", value.as_str());
                }
            }
            StageParameters::Str(p) => {
                put("column", p.column.as_str());
                put("mode", p.mode.as_str());
                for (key, value) in [
                    ("comparand", &p.comparand),
                    ("replacement", &p.replacement),
                    ("newcol", &p.newcol),
                ] {
                    if let Some(value) = value {
                        put(key, value.as_str());
                    }
                }
            }
            StageParameters::Rename(p) => {
                put("column", p.column.as_str());
                put("value", p.new_name.as_str());
            }
        }
        map
    }

    /// The short label used in pipeline summaries: the mode for filter and
    /// string stages, the column(s) otherwise.
    pub fn summary_label(&self) -> String {
        match self {
            StageParameters::Select(p) => p.columns.join("|"),
            StageParameters::Filter(p) => p.mode.as_str().to_string(),
            StageParameters::Str(p) => p.mode.clone(),
            StageParameters::Rename(p) => p.column.clone(),
        }
    }
}

impl From<SelectParams> for StageParameters {
    fn from(p: SelectParams) -> Self {
        StageParameters::Select(p)
    }
}

impl From<FilterParams> for StageParameters {
    fn from(p: FilterParams) -> Self {
        StageParameters::Filter(p)
    }
}

impl From<StrParams> for StageParameters {
    fn from(p: StrParams) -> Self {
        StageParameters::Str(p)
    }
}

impl From<RenameParams> for StageParameters {
    fn from(p: RenameParams) -> Self {
        StageParameters::Rename(p)
    }
}

/// One resolved pipeline step, in the order the engine must apply it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledOperation {
    pub node_id: String,
    pub op: String,
    pub parameters: StageParameters,
}

impl CompiledOperation {
    pub fn parameter_map(&self) -> BTreeMap<String, String> {
        self.parameters.to_map()
    }
}

impl fmt::Display for CompiledOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.op, self.parameters.summary_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, op: &str) -> RawStageConfig {
        RawStageConfig {
            id: id.to_string(),
            op: op.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn select_splits_columns() {
        let mut cfg = raw("n1", "select");
        cfg.column = Some(" name | age ||".to_string());
        let params = SelectParams::try_from(&cfg).unwrap();
        assert_eq!(params.columns, ["name", "age"]);
    }

    #[test]
    fn filter_defaults_to_or_and_drops_value_for_null_checks() {
        let mut cfg = raw("n2", "filter");
        cfg.column = Some("city".to_string());
        cfg.mode = Some("is_null".to_string());
        cfg.value = Some("ignored".to_string());
        let params = FilterParams::try_from(&cfg).unwrap();
        assert_eq!(params.logic, FilterLogic::Or);
        assert_eq!(params.value, None);
    }

    #[test]
    fn filter_logic_is_case_insensitive() {
        let mut cfg = raw("n2", "filter");
        cfg.column = Some("city".to_string());
        cfg.mode = Some("equal".to_string());
        cfg.value = Some("Oslo|Bergen".to_string());
        cfg.logic = Some("AND".to_string());
        assert_eq!(FilterParams::try_from(&cfg).unwrap().logic, FilterLogic::And);

        cfg.logic = Some("xor".to_string());
        assert!(matches!(
            FilterParams::try_from(&cfg),
            Err(ParameterError::UnknownFilterLogic { .. })
        ));
    }

    #[test]
    fn numeric_and_between_values_are_checked() {
        let mut cfg = raw("n3", "filter");
        cfg.column = Some("age".to_string());
        cfg.mode = Some("gt".to_string());
        cfg.value = Some("ten".to_string());
        assert!(matches!(
            FilterParams::try_from(&cfg),
            Err(ParameterError::InvalidNumber { .. })
        ));

        cfg.mode = Some("between".to_string());
        cfg.value = Some("1|1".to_string());
        assert!(matches!(
            FilterParams::try_from(&cfg),
            Err(ParameterError::InvalidBetween { .. })
        ));

        cfg.value = Some("1|9".to_string());
        assert!(FilterParams::try_from(&cfg).is_ok());
    }

    #[test]
    fn unknown_filter_mode_is_rejected() {
        let mut cfg = raw("n4", "filter");
        cfg.column = Some("age".to_string());
        cfg.mode = Some("roughly".to_string());
        cfg.value = Some("1".to_string());
        assert_eq!(
            FilterParams::try_from(&cfg),
            Err(ParameterError::UnknownFilterMode {
                node_id: "n4".to_string(),
                mode: "roughly".to_string(),
            })
        );
    }

    #[test]
    fn str_mode_decides_new_column() {
        let mut cfg = raw("n5", "str");
        cfg.column = Some("name".to_string());
        cfg.mode = Some("upper".to_string());
        assert!(!StrParams::try_from(&cfg).unwrap().produces_new_column());
        cfg.mode = Some("len".to_string());
        assert!(StrParams::try_from(&cfg).unwrap().produces_new_column());
    }

    #[test]
    fn empty_replacement_only_kept_with_comparand() {
        let mut cfg = raw("n7", "str");
        cfg.column = Some("name".to_string());
        cfg.mode = Some("upper".to_string());
        cfg.comparand = Some(String::new());
        cfg.replacement = Some(String::new());
        let params = StrParams::try_from(&cfg).unwrap();
        assert_eq!(params.replacement, None);
        assert!(!StageParameters::from(params).to_map().contains_key("replacement"));

        cfg.mode = Some("replace".to_string());
        cfg.comparand = Some("-".to_string());
        let params = StrParams::try_from(&cfg).unwrap();
        assert_eq!(params.replacement.as_deref(), Some(""));
    }

    #[test]
    fn missing_id_is_rejected_first() {
        let cfg = raw("  ", "rename");
        assert_eq!(RenameParams::try_from(&cfg), Err(ParameterError::MissingNodeId));
    }

    #[test]
    fn rename_maps_to_engine_parameters() {
        let mut cfg = raw("n6", "rename");
        cfg.column = Some("old".to_string());
        cfg.value = Some("new".to_string());
        let op = CompiledOperation {
            node_id: cfg.id.clone(),
            op: cfg.op.clone(),
            parameters: RenameParams::try_from(&cfg).unwrap().into(),
        };
        let map = op.parameter_map();
        assert_eq!(map.get("column").map(String::as_str), Some("old"));
        assert_eq!(map.get("value").map(String::as_str), Some("new"));
        assert_eq!(op.to_string(), "rename(old)");
    }
}
