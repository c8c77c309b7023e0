//! Placeholder interpolation for template bodies

/// Replace every `{{key}}` in `body` with its value.
///
/// Unknown placeholders are left untouched; there are no conditionals, loops
/// or escaping.
pub fn render(body: &str, vars: &[(&str, String)]) -> String {
    vars.iter().fold(body.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{{{}}}}}", key), value)
    })
}
