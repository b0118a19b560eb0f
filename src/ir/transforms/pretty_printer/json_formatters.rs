use crate::error::ExprResult;
use crate::ir::expr::ExprRef;

/// Serializes the tree to JSON for diagnostic dumps.
///
/// Nodes are tagged by `kind` and literals by `type`, e.g.
/// `{"kind":"Constant","value":{"type":"Integer","value":42}}`.
/// Shared subtrees are written out once per occurrence.
pub fn to_json(tree: &ExprRef, pretty_print: bool) -> ExprResult<String> {
    let json = if pretty_print {
        serde_json::to_string_pretty(&**tree)?
    } else {
        serde_json::to_string(&**tree)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::expr::builder::*;

    #[test]
    fn test_constant_is_tagged() {
        assert_eq!(
            to_json(&integer(42), false).unwrap(),
            r#"{"kind":"Constant","value":{"type":"Integer","value":42}}"#
        );
    }

    #[test]
    fn test_unit_variants_and_entities() {
        assert_eq!(to_json(&now(), false).unwrap(), r#"{"kind":"Now"}"#);
        assert_eq!(
            to_json(&entity("Sales"), false).unwrap(),
            r#"{"kind":"Entity","schema":null,"entity":"Sales","variable":null}"#
        );
    }

    #[test]
    fn test_pretty_output_spans_lines() {
        let json = to_json(&not(boolean(true)), true).unwrap();
        assert!(json.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"], "Not");
        assert_eq!(value["arg"]["value"]["value"], true);
    }
}
