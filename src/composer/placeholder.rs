use super::ids::{IdGenerator, id_prefix};
use crate::model::{Action, Element, Replacer, ReplacerStrategy, Step};
use ahash::{AHashMap, AHashSet};
use tracing::{debug, warn};

/// Lookup of placeholder key -> generated identifier produced by one substitution pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceholderMap {
    resolved: AHashMap<String, String>,
}

impl PlaceholderMap {
    /// Looks up a placeholder written either bare (`VIEW_ID`) or braced (`{{VIEW_ID}}`).
    pub fn get(&self, placeholder: &str) -> Option<&str> {
        let key = placeholder_key(placeholder)?;
        self.resolved.get(key).map(String::as_str)
    }

    pub fn contains(&self, placeholder: &str) -> bool {
        self.get(placeholder).is_some()
    }

    /// Maps an id chosen before substitution onto its replacement, if it was a placeholder.
    pub fn remap(&self, id: &str) -> String {
        self.get(id).unwrap_or(id).to_string()
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.resolved.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn resolve_token(&self, value: &str) -> Option<&str> {
        let key = token_key(value)?;
        self.resolved.get(key).map(String::as_str)
    }
}

/// Strips surrounding braces from a placeholder and validates the remaining key.
pub fn placeholder_key(raw: &str) -> Option<&str> {
    let key = raw
        .trim()
        .trim_start_matches('{')
        .trim_end_matches('}')
        .trim();
    let valid = !key.is_empty()
        && !key.contains(['{', '}'])
        && !key.chars().any(char::is_whitespace);
    valid.then_some(key)
}

/// A value only counts as a token when it is written in braces.
fn token_key(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        placeholder_key(trimmed)
    } else {
        None
    }
}

/// Rewrites every placeholder token in `steps` into a freshly generated identifier.
///
/// Each distinct placeholder gets exactly one id, shared by all of its occurrences as a
/// step id, component id or `action.next`. Generated ids never collide with one another
/// or with ids already present in `steps`.
pub fn substitute_placeholders(
    mut steps: Vec<Step>,
    replacers: &[Replacer],
    ids: &mut dyn IdGenerator,
) -> (Vec<Step>, PlaceholderMap) {
    let mut used: AHashSet<String> = AHashSet::new();
    let mut prefixes: AHashMap<String, String> = AHashMap::new();
    for step in &steps {
        note_id(&step.id, step.kind.as_str(), &mut used, &mut prefixes);
        step.walk_components(&mut |element| {
            note_id(&element.id, element.kind.as_str(), &mut used, &mut prefixes);
        });
    }

    let mut map = PlaceholderMap::default();
    for replacer in replacers {
        let Some(key) = placeholder_key(&replacer.placeholder) else {
            warn!(placeholder = %replacer.placeholder, "unresolvable placeholder format, leaving as-is");
            continue;
        };
        if map.resolved.contains_key(key) {
            continue;
        }
        match &replacer.strategy {
            ReplacerStrategy::Id => {
                let prefix = prefixes
                    .get(key)
                    .cloned()
                    .unwrap_or_else(|| "resource".to_string());
                let fresh = loop {
                    let candidate = ids.next_id(&prefix);
                    if used.insert(candidate.clone()) {
                        break candidate;
                    }
                };
                debug!(placeholder = key, id = %fresh, "resolved placeholder");
                map.resolved.insert(key.to_string(), fresh);
            }
            ReplacerStrategy::Other(strategy) => {
                warn!(placeholder = key, strategy = %strategy, "unsupported replacer strategy, leaving as-is");
            }
        }
    }

    if map.is_empty() {
        return (steps, map);
    }

    for step in &mut steps {
        replace_in_place(&mut step.id, &map);
        if let Some(action) = &mut step.data.action {
            replace_next(action, &map);
        }
        step.walk_components_mut(&mut |element: &mut Element| {
            replace_in_place(&mut element.id, &map);
            if let Some(action) = &mut element.action {
                replace_next(action, &map);
            }
        });
    }

    (steps, map)
}

fn note_id(
    id: &str,
    type_tag: &str,
    used: &mut AHashSet<String>,
    prefixes: &mut AHashMap<String, String>,
) {
    match token_key(id) {
        Some(key) => {
            prefixes
                .entry(key.to_string())
                .or_insert_with(|| id_prefix(type_tag));
        }
        None if !id.is_empty() => {
            used.insert(id.to_string());
        }
        None => {}
    }
}

fn replace_in_place(value: &mut String, map: &PlaceholderMap) {
    if let Some(resolved) = map.resolve_token(value) {
        *value = resolved.to_string();
    }
}

fn replace_next(action: &mut Action, map: &PlaceholderMap) {
    if let Some(next) = &mut action.next {
        replace_in_place(next, map);
    }
}
