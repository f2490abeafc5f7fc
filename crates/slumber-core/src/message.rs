//! Chat formatting: `&` color codes and `{placeholder}` templates.

const SECTION: char = '\u{00A7}';
const CODES: &str = "0123456789abcdefklmnorABCDEFKLMNOR";

/// Translate `&x` color codes into the `§x` form clients understand.
pub fn colorize(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut chars = message.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(&next) if c == '&' && CODES.contains(next) => {
                out.push(SECTION);
                out.push(next.to_ascii_lowercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

/// Remove both `&x` and `§x` color codes.
pub fn strip_colors(message: &str) -> String {
    let colored = colorize(message);
    let mut out = String::with_capacity(colored.len());
    let mut chars = colored.chars();
    while let Some(c) = chars.next() {
        if c == SECTION {
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

/// Substitute every `{key}` in `template`.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}
