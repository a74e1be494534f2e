use super::grammar::DistinctExpr;

/// Encode a selection out of a finite domain in its shorter form.
///
/// More than half of the domain selected encodes the unselected rest as
/// `notIn`, anything up to exactly half encodes the selection as `in`.
/// With `trim` the category marker is stripped from every emitted value.
pub fn encode_distinct(selected: &[String], domain: &[String], trim: bool) -> DistinctExpr {
    let strip = |value: &String| {
        if trim {
            value.trim_end().to_string()
        } else {
            value.clone()
        }
    };

    if selected.len() > domain.len() / 2 {
        DistinctExpr::NotIn(
            domain
                .iter()
                .filter(|value| !selected.contains(value))
                .map(strip)
                .collect(),
        )
    } else {
        DistinctExpr::In(selected.iter().map(strip).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_exactly_half_uses_inclusion() {
        let domain = strings(&["a", "b", "c", "d"]);
        let expr = encode_distinct(&strings(&["a", "b"]), &domain, false);
        assert_eq!(expr, DistinctExpr::In(strings(&["a", "b"])));
    }

    #[test]
    fn test_majority_uses_exclusion() {
        let domain = strings(&["a", "b", "c", "d", "e"]);
        let expr = encode_distinct(&strings(&["a", "b", "c", "d"]), &domain, false);
        assert_eq!(expr, DistinctExpr::NotIn(strings(&["e"])));
        assert_eq!(expr.to_string(), "notIn(e)");
    }

    #[test]
    fn test_odd_domain_threshold() {
        let domain = strings(&["a", "b", "c", "d", "e"]);
        assert!(matches!(
            encode_distinct(&strings(&["a", "b"]), &domain, false),
            DistinctExpr::In(_)
        ));
        assert!(matches!(
            encode_distinct(&strings(&["a", "b", "c"]), &domain, false),
            DistinctExpr::NotIn(_)
        ));
    }

    #[test]
    fn test_trim_strips_category_marker() {
        let domain = strings(&["correct ", "wrong ", "missing "]);
        assert_eq!(
            encode_distinct(&strings(&["correct "]), &domain, true),
            DistinctExpr::In(strings(&["correct"]))
        );
        assert_eq!(
            encode_distinct(&strings(&["correct ", "wrong "]), &domain, true),
            DistinctExpr::NotIn(strings(&["missing"]))
        );
    }

    #[test]
    fn test_without_trim_keeps_values() {
        let domain = strings(&["a ", "b"]);
        assert_eq!(
            encode_distinct(&strings(&["a "]), &domain, false),
            DistinctExpr::In(strings(&["a "]))
        );
    }
}
