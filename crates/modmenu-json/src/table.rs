use crate::error::EncodeError;
use crate::value::{Map, Value};

/// Key of a host-table entry: a 1-based integer index or a string name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableKey {
    Index(i64),
    Name(String),
}

/// A scripting-host table captured before it is known whether it is an
/// array or an object.
///
/// Converting to a [`Value`] enforces the host's table rules: integer
/// keys must form the dense run 1..=N, and integer and string keys must
/// not mix. An empty table converts to an empty Array; the host cannot
/// distinguish an empty array from an empty object, so neither can the
/// bridge (see the crate docs for the round-trip consequence).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    entries: Vec<(TableKey, Value)>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: TableKey, value: Value) {
        self.entries.push((key, value));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate the key shape and produce an Array or Object value.
    pub fn into_value(self) -> Result<Value, EncodeError> {
        if self.entries.is_empty() {
            return Ok(Value::Array(Vec::new()));
        }
        let has_index = self.entries.iter().any(|(k, _)| matches!(k, TableKey::Index(_)));
        let has_name = self.entries.iter().any(|(k, _)| matches!(k, TableKey::Name(_)));
        if has_index && has_name {
            return Err(EncodeError::MixedKeys);
        }
        if has_index {
            let mut indexed: Vec<(i64, Value)> = Vec::with_capacity(self.entries.len());
            for (key, value) in self.entries {
                match key {
                    TableKey::Index(i) if i >= 1 => indexed.push((i, value)),
                    TableKey::Index(_) => return Err(EncodeError::MixedKeys),
                    TableKey::Name(_) => unreachable!(),
                }
            }
            indexed.sort_by_key(|(i, _)| *i);
            for (expected, (i, _)) in indexed.iter().enumerate() {
                // Duplicates and gaps both break the 1..=N run
                if *i != expected as i64 + 1 {
                    return Err(EncodeError::SparseArray);
                }
            }
            Ok(Value::Array(indexed.into_iter().map(|(_, v)| v).collect()))
        } else {
            let mut map = Map::new();
            for (key, value) in self.entries {
                match key {
                    // Last write wins on duplicate names
                    TableKey::Name(name) => {
                        map.insert(name, value);
                    }
                    TableKey::Index(_) => unreachable!(),
                }
            }
            Ok(Value::Object(map))
        }
    }
}

impl FromIterator<(TableKey, Value)> for Table {
    fn from_iter<I: IntoIterator<Item = (TableKey, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(i: i64, v: impl Into<Value>) -> (TableKey, Value) {
        (TableKey::Index(i), v.into())
    }

    fn name(n: &str, v: impl Into<Value>) -> (TableKey, Value) {
        (TableKey::Name(n.to_string()), v.into())
    }

    #[test]
    fn test_dense_array() {
        let t: Table = [idx(2, "b"), idx(1, "a"), idx(3, "c")].into_iter().collect();
        assert_eq!(
            t.into_value().unwrap(),
            Value::Array(vec![Value::from("a"), Value::from("b"), Value::from("c")])
        );
    }

    #[test]
    fn test_object() {
        let t: Table = [name("on", true), name("count", 3)].into_iter().collect();
        let v = t.into_value().unwrap();
        let m = v.as_object().unwrap();
        assert_eq!(m["on"], Value::Bool(true));
        assert_eq!(m["count"], Value::Number(3.0));
    }

    #[test]
    fn test_empty_is_array() {
        assert_eq!(Table::new().into_value().unwrap(), Value::Array(Vec::new()));
    }

    #[test]
    fn test_sparse_rejected() {
        let t: Table = [idx(1, "a"), idx(3, "b")].into_iter().collect();
        assert_eq!(t.into_value().unwrap_err(), EncodeError::SparseArray);
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let t: Table = [idx(1, "a"), idx(1, "b")].into_iter().collect();
        assert_eq!(t.into_value().unwrap_err(), EncodeError::SparseArray);
    }

    #[test]
    fn test_mixed_keys_rejected() {
        let t: Table = [idx(1, "a"), name("b", 2)].into_iter().collect();
        assert_eq!(t.into_value().unwrap_err(), EncodeError::MixedKeys);
    }

    #[test]
    fn test_nonpositive_index_rejected() {
        let t: Table = [idx(0, "a")].into_iter().collect();
        assert_eq!(t.into_value().unwrap_err(), EncodeError::MixedKeys);
        let t: Table = [idx(-4, "a")].into_iter().collect();
        assert_eq!(t.into_value().unwrap_err(), EncodeError::MixedKeys);
    }

    #[test]
    fn test_duplicate_name_last_wins() {
        let t: Table = [name("a", 1), name("a", 2)].into_iter().collect();
        let v = t.into_value().unwrap();
        assert_eq!(v.as_object().unwrap()["a"], Value::Number(2.0));
    }
}
