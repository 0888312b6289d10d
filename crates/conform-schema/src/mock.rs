//! # Example Synthesis
//!
//! Builds a raw sketch of a value that a schema would plausibly accept. The
//! sketch is not guaranteed to conform; the façade runs it back through the
//! matcher in [`Mode::Synthesize`] so converters and defaults apply.
//!
//! Absence is modelled as `None`. A mapping field whose sketch is `None` is
//! left out, a sequence whose element sketch is `None` becomes `[]`.
//!
//! [`Mode::Synthesize`]: crate::options::Mode::Synthesize

use serde_json::{Map, Value};

use conform_core::TypeTag;

use crate::options::Options;
use crate::schema::Schema;

/// Placeholder for values no rule can produce.
pub const UNCERTAIN_FORMAT: &str = "<uncertain format>";

fn uncertain() -> Value {
    Value::from(UNCERTAIN_FORMAT)
}

/// Sketch a value for `schema`. `None` means "leave this value out".
pub fn sketch(schema: &Schema, options: &Options) -> Option<Value> {
    sketch_at(schema, options, 0)
}

fn sketch_at(schema: &Schema, options: &Options, depth: usize) -> Option<Value> {
    if depth > options.max_depth {
        return Some(uncertain());
    }

    match schema {
        Schema::Any | Schema::Converter(_) => Some(Value::Null),
        Schema::Forbidden => None,
        Schema::Type(tag) => Some(tag.zero()),
        Schema::Pattern(_) | Schema::Predicate(_) => Some(uncertain()),
        Schema::Enum(candidates) => Some(candidates.first().cloned().unwrap_or_else(uncertain)),
        Schema::Default(supplier) | Schema::Example(supplier) => Some(supplier.get()),
        Schema::And(members) | Schema::Or(members) => {
            if let Some(example) = schema.example_member() {
                return Some(example.get());
            }
            if let Some(default) = schema.default_member() {
                return Some(default.get());
            }
            if let Some(absent) = members
                .iter()
                .find(|m| matches!(m, Schema::Forbidden | Schema::Type(TypeTag::Null)))
            {
                return sketch_at(absent, options, depth + 1);
            }
            match (schema, members.first()) {
                (Schema::Or(_), Some(first)) => sketch_at(first, options, depth + 1),
                _ => Some(uncertain()),
            }
        }
        Schema::Mapping(mapping) => {
            let mut out = Map::new();
            for field in mapping.fields() {
                if options.dict_key_pattern_mode && !field.is_identifier() {
                    continue;
                }
                if let Some(v) = sketch_at(field.schema(), options, depth + 1) {
                    out.insert(field.key().to_string(), v);
                }
            }
            Some(Value::Object(out))
        }
        Schema::Sequence(element) => Some(Value::Array(
            sketch_at(element, options, depth + 1).into_iter().collect(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sk(schema: &Schema) -> Option<Value> {
        sketch(schema, &Options::default())
    }

    #[test]
    fn test_leaf_sketches() {
        assert_eq!(sk(&Schema::Any), Some(Value::Null));
        assert_eq!(sk(&Schema::Forbidden), None);
        assert_eq!(sk(&Schema::of(TypeTag::Int)), Some(json!(0)));
        assert_eq!(sk(&Schema::of(TypeTag::Str)), Some(json!("")));
        assert_eq!(sk(&Schema::pattern("^a").unwrap()), Some(json!(UNCERTAIN_FORMAT)));
        assert_eq!(sk(&Schema::one_of(["b", "a"])), Some(json!("b")));
        assert_eq!(sk(&Schema::Enum(vec![])), Some(json!(UNCERTAIN_FORMAT)));
        assert_eq!(sk(&Schema::default_value(3)), Some(json!(3)));
    }

    #[test]
    fn test_group_priority_example_then_default() {
        let s = Schema::or(vec![Schema::default_value(18), Schema::example(28)]);
        assert_eq!(sk(&s), Some(json!(28)));
        let s = Schema::and(vec![Schema::of(TypeTag::Int), Schema::default_value(18)]);
        assert_eq!(sk(&s), Some(json!(18)));
    }

    #[test]
    fn test_group_absence_member() {
        let s = Schema::or(vec![Schema::of(TypeTag::Int), Schema::Forbidden]);
        assert_eq!(sk(&s), None);
        let s = Schema::or(vec![Schema::of(TypeTag::Int), Schema::of(TypeTag::Null)]);
        assert_eq!(sk(&s), Some(Value::Null));
    }

    #[test]
    fn test_group_fallbacks() {
        let s = Schema::or(vec![Schema::of(TypeTag::Bool), Schema::of(TypeTag::Int)]);
        assert_eq!(sk(&s), Some(json!(false)));
        let s = Schema::and(vec![Schema::of(TypeTag::Int)]);
        assert_eq!(sk(&s), Some(json!(UNCERTAIN_FORMAT)));
        assert_eq!(sk(&Schema::or(vec![])), Some(json!(UNCERTAIN_FORMAT)));
    }

    #[test]
    fn test_mapping_omits_absent_and_pattern_fields() {
        let s = Schema::mapping([
            ("id", Schema::of(TypeTag::Int)),
            ("secret", Schema::Forbidden),
            ("^x_", Schema::of(TypeTag::Str)),
        ]);
        assert_eq!(sk(&s), Some(json!({"id": 0})));
    }

    #[test]
    fn test_sequence_sketches() {
        assert_eq!(sk(&Schema::list(Schema::example("a"))), Some(json!(["a"])));
        assert_eq!(sk(&Schema::list(Schema::Forbidden)), Some(json!([])));
    }

    #[test]
    fn test_depth_bound() {
        let mut s = Schema::of(TypeTag::Int);
        for _ in 0..4 {
            s = Schema::list(s);
        }
        let options = Options::default().with_max_depth(2);
        assert_eq!(sketch(&s, &options), Some(json!([[[UNCERTAIN_FORMAT]]])));
    }
}
