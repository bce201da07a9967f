use phf::{Set, phf_set};
use std::fmt;

/// Score columns that docking programs write as integers.
static INTEGER_FIELDS: Set<&'static str> = phf_set! {
    "Cluster",      // SwissDock
    "ClusterRank",  // SwissDock
    "Conf",         // pyDock
    "RANK",         // pyDock
};

pub fn is_integer_field(field: &str) -> bool {
    INTEGER_FIELDS.contains(field)
}

/// A numeric score read verbatim from a docking result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreValue {
    Integer(i64),
    Real(f64),
}

impl ScoreValue {
    /// Parses `raw` with the numeric kind implied by the field name.
    pub fn parse_for(field: &str, raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if is_integer_field(field) {
            raw.parse().ok().map(ScoreValue::Integer)
        } else {
            raw.parse().ok().map(ScoreValue::Real)
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            ScoreValue::Integer(v) => v as f64,
            ScoreValue::Real(v) => v,
        }
    }

    pub fn as_integer(self) -> Option<i64> {
        match self {
            ScoreValue::Integer(v) => Some(v),
            ScoreValue::Real(_) => None,
        }
    }

    /// Value used for ordering; `None` for NaN so it sorts with missing values.
    pub fn sort_key(self) -> Option<f64> {
        let v = self.as_f64();
        (!v.is_nan()).then_some(v)
    }

    /// Renders integers exactly and reals with `precision` decimal places.
    pub fn format_fixed(self, precision: usize) -> String {
        match self {
            ScoreValue::Integer(v) => v.to_string(),
            ScoreValue::Real(v) => format!("{:.*}", precision, v),
        }
    }
}

impl fmt::Display for ScoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreValue::Integer(v) => write!(f, "{}", v),
            ScoreValue::Real(v) => write!(f, "{}", v),
        }
    }
}

/// Score fields of one pose, kept in the order they were first inserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreSet {
    entries: Vec<(String, ScoreValue)>,
}

impl ScoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites `field`. Overwriting keeps the original position.
    pub fn insert(&mut self, field: impl Into<String>, value: ScoreValue) -> Option<ScoreValue> {
        let field = field.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((field, value));
                None
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<ScoreValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| *value)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ScoreValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, ScoreValue)> for ScoreSet {
    fn from_iter<I: IntoIterator<Item = (S, ScoreValue)>>(iter: I) -> Self {
        let mut set = ScoreSet::new();
        for (field, value) in iter {
            set.insert(field, value);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_for_uses_integer_kind_for_rank_columns() {
        assert_eq!(
            ScoreValue::parse_for("ClusterRank", " 3 "),
            Some(ScoreValue::Integer(3))
        );
        assert_eq!(ScoreValue::parse_for("RANK", "1.5"), None);
        assert_eq!(
            ScoreValue::parse_for("deltaG", "-7.25"),
            Some(ScoreValue::Real(-7.25))
        );
        assert_eq!(ScoreValue::parse_for("Total", "abc"), None);
    }

    #[test]
    fn format_fixed_keeps_integers_exact() {
        assert_eq!(ScoreValue::Integer(12).format_fixed(6), "12");
        assert_eq!(ScoreValue::Real(-8.5).format_fixed(3), "-8.500");
    }

    #[test]
    fn nan_has_no_sort_key() {
        assert_eq!(ScoreValue::Real(f64::NAN).sort_key(), None);
        assert_eq!(ScoreValue::Integer(2).sort_key(), Some(2.0));
    }

    #[test]
    fn score_set_preserves_first_insertion_order() {
        let mut set = ScoreSet::new();
        set.insert("Total", ScoreValue::Real(1.0));
        set.insert("Elec", ScoreValue::Real(2.0));
        let previous = set.insert("Total", ScoreValue::Real(3.0));

        assert_eq!(previous, Some(ScoreValue::Real(1.0)));
        assert_eq!(set.fields().collect::<Vec<_>>(), vec!["Total", "Elec"]);
        assert_eq!(set.get("Total"), Some(ScoreValue::Real(3.0)));
        assert!(set.get("VdW").is_none());
    }
}
