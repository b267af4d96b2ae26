//! First-person rewriting of learning objectives ("I can ..." statements).

/// Prefix rewrites, tried in order. The first match wins.
/// `case_sensitive` rules only match the exact capitalisation given.
struct Rewrite {
    prefixes: &'static [&'static str],
    replacement: &'static str,
    case_sensitive: bool,
}

const REWRITES: &[Rewrite] = &[
    Rewrite {
        prefixes: &[
            "students will be able to ",
            "pupils will be able to ",
            "learners will be able to ",
            "students will ",
            "pupils will ",
            "learners will ",
        ],
        replacement: "I can ",
        case_sensitive: false,
    },
    Rewrite {
        prefixes: &["To "],
        replacement: "I can ",
        case_sensitive: true,
    },
    Rewrite {
        prefixes: &["understand "],
        replacement: "I can explain ",
        case_sensitive: false,
    },
    Rewrite {
        prefixes: &["learn about ", "learn "],
        replacement: "I can describe ",
        case_sensitive: false,
    },
    Rewrite {
        prefixes: &["identify "],
        replacement: "I can find and name ",
        case_sensitive: false,
    },
    Rewrite {
        prefixes: &["recognize ", "recognise "],
        replacement: "I can spot ",
        case_sensitive: false,
    },
    Rewrite {
        prefixes: &["demonstrate "],
        replacement: "I can show ",
        case_sensitive: false,
    },
];

const I_CAN: &str = "I can ";

/// Returns the remainder of `text` after `prefix`, if it starts with it.
fn strip_prefix<'a>(text: &'a str, prefix: &str, case_sensitive: bool) -> Option<&'a str> {
    if case_sensitive {
        return text.strip_prefix(prefix);
    }
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Rewrites a teacher-facing objective as a learner's "I can" statement.
///
/// A fixed table of prefix rewrites is tried first ("Students will be able to X"
/// becomes "I can X", "Understand Y" becomes "I can explain Y"). Whatever remains
/// is guaranteed to start with "I can": a leading "i can" in any case is
/// normalised, anything else gets the prefix and a lower-cased first letter.
///
/// # Examples
///
/// ```
/// use lesson_deck_tools::worksheet::rewrite_objective;
///
/// assert_eq!(rewrite_objective("Identify the parts of a plant"), "I can find and name the parts of a plant");
/// assert_eq!(rewrite_objective("I can already do this"), "I can already do this");
/// ```
pub fn rewrite_objective(objective: &str) -> String {
    let objective = objective.trim();

    for rule in REWRITES {
        for prefix in rule.prefixes {
            if let Some(rest) = strip_prefix(objective, prefix, rule.case_sensitive) {
                return format!("{}{}", rule.replacement, rest);
            }
        }
    }

    if let Some(rest) = strip_prefix(objective, "i can", false) {
        return format!("I can{rest}");
    }
    format!("{I_CAN}{}", lowercase_first(objective))
        .trim_end()
        .to_string()
}
