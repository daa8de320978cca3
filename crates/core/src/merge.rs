//! Recursive right-biased merging of YAML values.

use std::collections::HashMap;

use serde_yaml::{Mapping, Value};

/// Recursively merge two values, the overlay winning on conflicts.
///
/// When both operands are mappings the result contains the keys of both;
/// a key held by both sides recurses when both values are mappings and
/// takes the overlay's value otherwise. Scalars and sequences are never
/// merged element-wise. Absent operands act as identity; two absent
/// operands yield an empty mapping.
///
/// Produces a new value and never mutates its inputs.
pub fn deep_merge(base: Option<&Value>, overlay: Option<&Value>) -> Value {
    match (base, overlay) {
        (None, None) => Value::Mapping(Mapping::new()),
        (Some(b), None) => b.clone(),
        (None, Some(o)) => o.clone(),
        (Some(Value::Mapping(b)), Some(Value::Mapping(o))) => {
            Value::Mapping(merge_mappings(b, o))
        }
        (Some(_), Some(o)) => o.clone(),
    }
}

/// Mapping-level entry point of [`deep_merge`].
pub fn merge_mappings(base: &Mapping, overlay: &Mapping) -> Mapping {
    let mut merged = base.clone();
    for (key, overlay_value) in overlay {
        let combined = match (base.get(key), overlay_value) {
            (Some(Value::Mapping(b)), Value::Mapping(o)) => {
                Value::Mapping(merge_mappings(b, o))
            }
            _ => overlay_value.clone(),
        };
        merged.insert(key.clone(), combined);
    }
    merged
}

/// Build a string-valued mapping from ambient variables.
///
/// Keys are sorted so the resulting mapping iterates deterministically.
pub fn mapping_from_vars(vars: &HashMap<String, String>) -> Mapping {
    let mut pairs: Vec<_> = vars.iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let mut mapping = Mapping::new();
    for (name, value) in pairs {
        mapping.insert(Value::String(name.clone()), Value::String(value.clone()));
    }
    mapping
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn merge_of_two_absent_operands_is_empty_mapping() {
        assert_eq!(deep_merge(None, None), Value::Mapping(Mapping::new()));
    }

    #[test]
    fn merge_with_one_absent_operand_is_identity() {
        let a = yaml("{a: 1, b: [x, y]}");
        assert_eq!(deep_merge(Some(&a), None), a);
        assert_eq!(deep_merge(None, Some(&a)), a);
    }

    #[test]
    fn merge_is_right_biased_on_scalars() {
        let merged = deep_merge(Some(&yaml("{a: 1}")), Some(&yaml("{a: 2}")));
        assert_eq!(merged, yaml("{a: 2}"));
    }

    #[test]
    fn merge_replaces_lists_outright() {
        let merged = deep_merge(Some(&yaml("{a: [1, 2, 3]}")), Some(&yaml("{a: [9]}")));
        assert_eq!(merged, yaml("{a: [9]}"));
    }

    #[test]
    fn merge_recurses_into_nested_mappings() {
        let base = yaml("{a: {x: 1, y: 2}}");
        let overlay = yaml("{a: {y: 3, z: 4}}");
        assert_eq!(deep_merge(Some(&base), Some(&overlay)), yaml("{a: {x: 1, y: 3, z: 4}}"));
    }

    #[test]
    fn merge_keeps_keys_unique_to_either_side() {
        let merged = deep_merge(Some(&yaml("{a: 1}")), Some(&yaml("{b: 2}")));
        assert_eq!(merged, yaml("{a: 1, b: 2}"));
    }

    #[test]
    fn merge_overlay_scalar_replaces_base_mapping() {
        let merged = deep_merge(Some(&yaml("{a: {x: 1}}")), Some(&yaml("{a: flat}")));
        assert_eq!(merged, yaml("{a: flat}"));
    }

    #[test]
    fn merge_does_not_mutate_inputs() {
        let base = yaml("{a: {x: 1}}");
        let overlay = yaml("{a: {y: 2}}");
        let _ = deep_merge(Some(&base), Some(&overlay));
        assert_eq!(base, yaml("{a: {x: 1}}"));
        assert_eq!(overlay, yaml("{a: {y: 2}}"));
    }

    #[test]
    fn mapping_from_vars_sorts_keys() {
        let mut vars = HashMap::new();
        vars.insert("zeta".to_string(), "1".to_string());
        vars.insert("alpha".to_string(), "2".to_string());

        let mapping = mapping_from_vars(&vars);
        let keys: Vec<_> = mapping.keys().map(|k| k.as_str().unwrap().to_string()).collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }
}
