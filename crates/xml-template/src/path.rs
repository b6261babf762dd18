//! Limited structural path expressions.
//!
//! Supported forms, evaluated against the root element as context:
//!
//! - `.` the context element, `./a/b` children, `.//a` descendants
//! - `/Root/a` absolute paths (the first step must match the root element)
//! - `//a` any element in the document, root included
//! - step tests: qualified names (exact, prefix included), `*`, `.`
//! - predicates: `[@attr]`, `[@attr='v']`, `[child]`, `[N]` (1-based), `[last()]`
//!
//! Anything outside this subset is rejected with a [`PathError`].

use crate::document::{Document, ElementHandle};
use crate::error::PathError;
use crate::selector::NodeSelector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeTest {
    SelfNode,
    Any,
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    HasAttribute(String),
    AttributeEquals(String, String),
    HasChild(String),
    Position(usize),
    Last,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    test: NodeTest,
    predicates: Vec<Predicate>,
}

/// A parsed structural path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathQuery {
    expr: String,
    absolute: bool,
    steps: Vec<Step>,
}

impl PathQuery {
    pub fn parse(expr: &str) -> Result<Self, PathError> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err(PathError::new(expr, "empty expression"));
        }

        let segments = split_segments(trimmed)?;
        let absolute = segments.first().is_some_and(|s| s.is_empty());
        let start = usize::from(absolute);

        let mut steps = Vec::new();
        let mut descendant = false;
        for segment in &segments[start..] {
            if segment.is_empty() {
                if descendant {
                    return Err(PathError::new(expr, "too many consecutive '/'"));
                }
                descendant = true;
                continue;
            }
            let axis = if descendant {
                Axis::Descendant
            } else {
                Axis::Child
            };
            steps.push(parse_step(expr, segment, axis)?);
            descendant = false;
        }

        if descendant || steps.is_empty() {
            return Err(PathError::new(expr, "path ends with '/'"));
        }

        Ok(Self {
            expr: trimmed.to_string(),
            absolute,
            steps,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.expr
    }

    /// Evaluate the path, returning matches in document order without duplicates.
    pub fn evaluate(&self, document: &Document) -> Vec<ElementHandle> {
        // `None` stands for the document node that owns the root element.
        let mut contexts: Vec<Option<ElementHandle>> = if self.absolute {
            vec![None]
        } else {
            vec![Some(ElementHandle::root())]
        };

        for step in &self.steps {
            let mut next = Vec::new();
            for context in &contexts {
                next.extend(apply_step(document, context.as_ref(), step));
            }
            next.sort();
            next.dedup();
            contexts = next.into_iter().map(Some).collect();
        }

        contexts.into_iter().flatten().collect()
    }
}

impl NodeSelector for PathQuery {
    fn select(&self, document: &Document) -> Result<Vec<ElementHandle>, PathError> {
        Ok(self.evaluate(document))
    }
}

fn apply_step(
    document: &Document,
    context: Option<&ElementHandle>,
    step: &Step,
) -> Vec<ElementHandle> {
    if step.test == NodeTest::SelfNode {
        let candidates = match (step.axis, context) {
            (Axis::Child, Some(handle)) => vec![handle.clone()],
            (Axis::Child, None) => Vec::new(),
            (Axis::Descendant, Some(handle)) => {
                let mut all = vec![handle.clone()];
                all.extend(document.descendant_handles(handle));
                all
            }
            (Axis::Descendant, None) => all_elements(document),
        };
        return filter_predicates(document, candidates, &step.predicates);
    }

    // Positional predicates count siblings, so a descendant step is evaluated
    // as a child step from every descendant-or-self of the context.
    let parents: Vec<Option<ElementHandle>> = match step.axis {
        Axis::Child => vec![context.cloned()],
        Axis::Descendant => {
            let mut parents = vec![context.cloned()];
            match context {
                Some(handle) => {
                    parents.extend(document.descendant_handles(handle).into_iter().map(Some))
                }
                None => parents.extend(all_elements(document).into_iter().map(Some)),
            }
            parents
        }
    };

    let mut out = Vec::new();
    for parent in parents {
        let children = match &parent {
            Some(handle) => document.child_handles(handle),
            None => vec![ElementHandle::root()],
        };
        let matching: Vec<_> = children
            .into_iter()
            .filter(|h| matches_test(document, h, &step.test))
            .collect();
        out.extend(filter_predicates(document, matching, &step.predicates));
    }
    out
}

fn all_elements(document: &Document) -> Vec<ElementHandle> {
    document.elements().into_iter().map(|(h, _)| h).collect()
}

fn matches_test(document: &Document, handle: &ElementHandle, test: &NodeTest) -> bool {
    match test {
        NodeTest::Any | NodeTest::SelfNode => true,
        NodeTest::Name(name) => document.element(handle).is_some_and(|el| el.name == *name),
    }
}

fn filter_predicates(
    document: &Document,
    mut nodes: Vec<ElementHandle>,
    predicates: &[Predicate],
) -> Vec<ElementHandle> {
    for predicate in predicates {
        nodes = match predicate {
            Predicate::Position(n) => nodes.get(n - 1).cloned().into_iter().collect(),
            Predicate::Last => nodes.last().cloned().into_iter().collect(),
            Predicate::HasAttribute(key) => nodes
                .into_iter()
                .filter(|h| {
                    document
                        .element(h)
                        .is_some_and(|el| el.attribute(key).is_some())
                })
                .collect(),
            Predicate::AttributeEquals(key, value) => nodes
                .into_iter()
                .filter(|h| {
                    document
                        .element(h)
                        .is_some_and(|el| el.attribute(key) == Some(value.as_str()))
                })
                .collect(),
            Predicate::HasChild(name) => nodes
                .into_iter()
                .filter(|h| {
                    document
                        .element(h)
                        .is_some_and(|el| el.child_elements().any(|(_, c)| c.name == *name))
                })
                .collect(),
        };
    }
    nodes
}

/// Split on `/` outside of predicates and quoted strings.
fn split_segments(expr: &str) -> Result<Vec<String>, PathError> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in expr.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                current.push(c);
            }
            (None, '[') => {
                depth += 1;
                current.push(c);
            }
            (None, ']') => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| PathError::new(expr, "unbalanced ']'"))?;
                current.push(c);
            }
            (None, '/') if depth == 0 => segments.push(std::mem::take(&mut current)),
            (None, c) => current.push(c),
        }
    }

    if quote.is_some() {
        return Err(PathError::new(expr, "unterminated string literal"));
    }
    if depth != 0 {
        return Err(PathError::new(expr, "unbalanced '['"));
    }
    segments.push(current);
    Ok(segments)
}

fn parse_step(expr: &str, segment: &str, axis: Axis) -> Result<Step, PathError> {
    let (test_part, mut rest) = match segment.find('[') {
        Some(idx) => segment.split_at(idx),
        None => (segment, ""),
    };

    let test = match test_part {
        "." => NodeTest::SelfNode,
        "*" => NodeTest::Any,
        ".." => return Err(PathError::new(expr, "parent steps are not supported")),
        name if is_name(name) => NodeTest::Name(name.to_string()),
        other => return Err(PathError::new(expr, format!("invalid step '{other}'"))),
    };

    let mut predicates = Vec::new();
    while !rest.is_empty() {
        let close = find_predicate_end(rest)
            .ok_or_else(|| PathError::new(expr, "unbalanced predicate"))?;
        predicates.push(parse_predicate(expr, &rest[1..close])?);
        rest = &rest[close + 1..];
        if !rest.is_empty() && !rest.starts_with('[') {
            return Err(PathError::new(expr, format!("unexpected '{rest}'")));
        }
    }

    Ok(Step {
        axis,
        test,
        predicates,
    })
}

/// Index of the `]` closing the predicate that starts at `s[0]`.
fn find_predicate_end(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, c) in s.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, ']') => return Some(idx),
            _ => {}
        }
    }
    None
}

fn parse_predicate(expr: &str, body: &str) -> Result<Predicate, PathError> {
    let body = body.trim();

    if let Some(attr) = body.strip_prefix('@') {
        return match attr.split_once('=') {
            None if is_name(attr.trim()) => Ok(Predicate::HasAttribute(attr.trim().to_string())),
            Some((key, value)) if is_name(key.trim()) => {
                let value = unquote(value.trim()).ok_or_else(|| {
                    PathError::new(expr, format!("attribute value must be quoted in '[{body}]'"))
                })?;
                Ok(Predicate::AttributeEquals(
                    key.trim().to_string(),
                    value.to_string(),
                ))
            }
            _ => Err(PathError::new(expr, format!("invalid predicate '[{body}]'"))),
        };
    }

    if body == "last()" {
        return Ok(Predicate::Last);
    }

    if !body.is_empty() && body.chars().all(|c| c.is_ascii_digit()) {
        return match body.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(Predicate::Position(n)),
            _ => Err(PathError::new(expr, "positions start at 1")),
        };
    }

    if is_name(body) {
        return Ok(Predicate::HasChild(body.to_string()));
    }

    Err(PathError::new(expr, format!("unsupported predicate '[{body}]'")))
}

fn unquote(value: &str) -> Option<&str> {
    let inner = value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .or_else(|| value.strip_prefix('"').and_then(|v| v.strip_suffix('"')))?;
    Some(inner)
}

fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}
