use crate::password::PasswordSpec;
use crate::pool::CharClass;

/// Spec that would generate secrets shaped like `sample`.
///
/// Classes are the predefined ones `sample` draws from, or all of them when
/// it matches none. Repetition is allowed only if some character repeats.
pub fn infer_spec(sample: &str) -> PasswordSpec {
    let mut spec = PasswordSpec {
        length: sample.chars().count(),
        ..Default::default()
    };
    if sample.is_empty() {
        return spec;
    }

    spec.classes = CharClass::PREDEFINED
        .iter()
        .filter(|class| sample.chars().any(|c| class.chars().contains(c)))
        .cloned()
        .collect();
    if spec.classes.is_empty() {
        spec.classes = CharClass::PREDEFINED.to_vec();
    }

    let mut seen: Vec<char> = Vec::with_capacity(spec.length);
    for c in sample.chars() {
        if seen.contains(&c) {
            spec.allow_repeat = true;
            break;
        }
        seen.push(c);
    }

    log::debug!(
        "inferred {} classes from a {}-character sample",
        spec.classes.len(),
        spec.length
    );
    spec
}
