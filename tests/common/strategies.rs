use proptest::prelude::*;

/// Four colon-separated levels, occasionally padded with whitespace
pub fn taxonomy_code_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec("[A-Z0-9]{1,4}", 4),
        prop::bool::weighted(0.2),
    )
        .prop_map(|(levels, padded)| {
            let code = levels.join(":");
            if padded {
                format!(" {code} ")
            } else {
                code
            }
        })
}

/// A manual code and an optional auto code that equals it about half the time
pub fn code_pair_strategy() -> impl Strategy<Value = (String, Option<String>)> {
    (
        taxonomy_code_strategy(),
        taxonomy_code_strategy(),
        0u8..3,
    )
        .prop_map(|(manual, other, choice)| {
            let auto = match choice {
                0 => Some(manual.trim().to_string()),
                1 => Some(other),
                _ => None,
            };
            (manual, auto)
        })
}

pub fn code_pairs_strategy() -> impl Strategy<Value = Vec<(String, Option<String>)>> {
    prop::collection::vec(code_pair_strategy(), 0..40)
}
