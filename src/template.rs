//! `$name` / `${name}` expansion of command templates

use crate::error::{ReceiverError, Result};

/// Named values available to command templates.
///
/// Keys keep insertion order so error messages list them predictably.
/// A `None` value is a known name whose payload field was absent; it
/// expands to the empty string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubstitutionContext {
    values: Vec<(&'static str, Option<String>)>,
}

impl SubstitutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &'static str, value: Option<String>) {
        match self.values.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
    }

    /// Returns the expansion for `name`, or `None` if the name is unknown.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_deref().unwrap_or(""))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.iter().map(|(key, _)| *key)
    }

    fn unresolved(&self, name: &str) -> ReceiverError {
        ReceiverError::Substitution {
            name: name.to_string(),
            available: self.names().map(String::from).collect(),
        }
    }
}

/// Expand every element of `template` against `context`.
///
/// Fails on the first unknown placeholder without returning a partial command.
pub fn expand(template: &[String], context: &SubstitutionContext) -> Result<Vec<String>> {
    template
        .iter()
        .map(|element| expand_one(element, context))
        .collect()
}

fn expand_one(input: &str, context: &SubstitutionContext) -> Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            out.push('$');
            rest = tail;
            continue;
        }

        if let Some(braced) = after.strip_prefix('{') {
            if let Some(end) = braced.find('}') {
                let name = &braced[..end];
                if is_identifier(name) {
                    let value = context.resolve(name).ok_or_else(|| context.unresolved(name))?;
                    out.push_str(value);
                    rest = &braced[end + 1..];
                    continue;
                }
            }
            out.push('$');
            rest = after;
            continue;
        }

        let len = identifier_len(after);
        if len == 0 {
            out.push('$');
            rest = after;
            continue;
        }
        let name = &after[..len];
        let value = context.resolve(name).ok_or_else(|| context.unresolved(name))?;
        out.push_str(value);
        rest = &after[len..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Length in bytes of the identifier at the start of `s`, 0 if none.
fn identifier_len(s: &str) -> usize {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return 0,
    }
    chars
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && identifier_len(s) == s.len()
}
