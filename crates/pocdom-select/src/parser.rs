//! Selector string parsing.
//!
//! A selector is split into comma-separated groups, each group into
//! whitespace-separated tokens. Each token is classified on its own, in
//! priority order: attribute, id, class, pseudo-class, universal,
//! combinator, tag name.

use pocdom_dom::{AttributesMap, DomError, NodeData, Result};

/// An attribute condition inside `[...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSelector {
    /// `[attr]`: the attribute is present.
    Exists(String),
    /// `[attr=value]`: the value is exactly `value`.
    Equals(String, String),
    /// `[attr~=value]`: one of the whitespace-separated words is `value`.
    Includes(String, String),
    /// `[attr|=value]`: the value is `value` or starts with `value-`.
    DashMatch(String, String),
    /// `[attr^=value]`: the value starts with `value`.
    PrefixMatch(String, String),
    /// `[attr$=value]`: the value ends with `value`.
    SuffixMatch(String, String),
    /// `[attr*=value]`: the value contains `value`.
    SubstringMatch(String, String),
}

impl AttributeSelector {
    /// Check the condition against an attribute map.
    #[must_use]
    pub fn matches(&self, attrs: &AttributesMap) -> bool {
        match self {
            Self::Exists(name) => attrs.contains_key(name),
            Self::Equals(name, val) => attrs.get(name).is_some_and(|v| v == val),
            Self::Includes(name, val) => attrs
                .get(name)
                .is_some_and(|v| v.split_whitespace().any(|w| w == val)),
            Self::DashMatch(name, val) => attrs.get(name).is_some_and(|v| {
                v == val
                    || v.strip_prefix(val.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }),
            Self::PrefixMatch(name, val) => {
                attrs.get(name).is_some_and(|v| v.starts_with(val.as_str()))
            }
            Self::SuffixMatch(name, val) => {
                attrs.get(name).is_some_and(|v| v.ends_with(val.as_str()))
            }
            Self::SubstringMatch(name, val) => {
                attrs.get(name).is_some_and(|v| v.contains(val.as_str()))
            }
        }
    }

    fn with_operator(operator: Option<char>, name: String, value: String) -> Self {
        match operator {
            None => Self::Exists(name),
            Some('~') => Self::Includes(name, value),
            Some('|') => Self::DashMatch(name, value),
            Some('^') => Self::PrefixMatch(name, value),
            Some('$') => Self::SuffixMatch(name, value),
            Some('*') => Self::SubstringMatch(name, value),
            Some(_) => Self::Equals(name, value),
        }
    }
}

/// A structural relationship introduced by `>`, `~` or `+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `>`: direct children of the context node.
    Child,
    /// `~`: every following sibling of the context node.
    SubsequentSibling,
    /// `+`: the first following sibling that is an element.
    NextSibling,
}

/// What a compound token requires of a candidate beyond its tag name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// No further requirement (`tag` or `*`).
    Any,
    /// `tag#id`
    Id(String),
    /// `tag.a.b`: every listed class is present.
    Classes(Vec<String>),
    /// `tag[...]`
    Attribute(AttributeSelector),
    /// `tag:nth-of-type(N)`: the Nth candidate, 1-based.
    NthOfType(usize),
}

/// One non-combinator token: an optional tag name plus a condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compound {
    /// Required tag name; `None` accepts any element.
    pub tag: Option<String>,
    /// Additional requirement.
    pub condition: Condition,
}

impl Compound {
    /// Whether `data` passes the tag name and, for stateless conditions,
    /// the condition. `nth-of-type` is counted by the caller.
    #[must_use]
    pub fn matches(&self, data: &NodeData) -> bool {
        if self.tag.as_deref().is_some_and(|tag| tag != data.name) {
            return false;
        }
        match &self.condition {
            Condition::Any | Condition::NthOfType(_) => true,
            Condition::Id(id) => data.id() == Some(id.as_str()),
            Condition::Classes(classes) => {
                let own: Vec<&str> = data.classes().collect();
                classes.iter().all(|class| own.contains(&class.as_str()))
            }
            Condition::Attribute(selector) => selector.matches(&data.attrs),
        }
    }
}

/// One evaluation step: candidates come from the combinator (descendants
/// when `None`) and are filtered by the compound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// How candidates are generated from each context node.
    pub via: Option<Combinator>,
    /// The filter applied to each candidate.
    pub compound: Compound,
}

/// A parsed, comma-separated selector group list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    /// One step chain per comma-separated alternative.
    pub groups: Vec<Vec<Step>>,
}

fn invalid(message: impl Into<String>) -> DomError {
    DomError::InvalidSelector(message.into())
}

/// Whether `name` is a plain tag name: `[a-zA-Z0-9][-.a-zA-Z0-9:_]*`.
fn is_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | ':' | '_'))
}

/// The tag part in front of `#`, `.`, `[` or `:`; empty or `*` mean any.
fn tag_part(tag: &str, token: &str) -> Result<Option<String>> {
    match tag {
        "" | "*" => Ok(None),
        name if is_tag_name(name) => Ok(Some(name.to_string())),
        _ => Err(invalid(format!("invalid tag name in \"{token}\""))),
    }
}

/// Parse `tag[attr op "value"]`.
fn parse_attribute(token: &str) -> Result<Compound> {
    let malformed = || invalid(format!("malformed attribute selector \"{token}\""));

    let (tag, rest) = token.split_once('[').ok_or_else(malformed)?;
    let body = rest.strip_suffix(']').ok_or_else(malformed)?;

    let name_len = body
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(body.len());
    let (name, rest) = body.split_at(name_len);
    if name.is_empty() {
        return Err(malformed());
    }

    let mut chars = rest.chars();
    let operator = match chars.next() {
        None => None,
        Some(op @ ('=' | '~' | '|' | '^' | '$' | '*')) => Some(op),
        Some(_) => return Err(malformed()),
    };
    let rest = chars.as_str();
    let rest = rest.strip_prefix('=').unwrap_or(rest);
    let unquoted = rest.strip_prefix('"').unwrap_or(rest);
    let value = unquoted.strip_suffix('"').unwrap_or(unquoted);
    if value.contains(['"', ']']) {
        return Err(malformed());
    }

    Ok(Compound {
        tag: tag_part(tag, token)?,
        condition: Condition::Attribute(AttributeSelector::with_operator(
            operator,
            name.to_string(),
            value.to_string(),
        )),
    })
}

/// Parse `tag:nth-of-type(N)`.
fn parse_pseudo(token: &str, tag: &str, pseudo: &str) -> Result<Compound> {
    if tag.is_empty() {
        return Err(invalid("a pseudo-class must be prefixed with a tag name"));
    }
    let (kind, argument) = pseudo
        .strip_suffix(')')
        .and_then(|inner| inner.split_once('('))
        .unwrap_or((pseudo, ""));
    if kind != "nth-of-type" {
        return Err(invalid(format!(
            "unsupported pseudo-class \"{kind}\"; only nth-of-type is implemented"
        )));
    }
    let not_numeric = || invalid(format!("nth-of-type needs a numeric argument in \"{token}\""));
    if argument.is_empty() || !argument.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_numeric());
    }
    let n: usize = argument.parse().map_err(|_| not_numeric())?;
    if n < 1 {
        return Err(invalid("nth-of-type value must be at least 1"));
    }
    Ok(Compound {
        tag: tag_part(tag, token)?,
        condition: Condition::NthOfType(n),
    })
}

/// A classified token.
enum Token {
    Compound(Compound),
    Combinator(Combinator),
}

fn classify(token: &str) -> Result<Token> {
    if token.contains('[') {
        return parse_attribute(token).map(Token::Compound);
    }
    if let Some((tag, id)) = token.split_once('#') {
        if id.is_empty() {
            return Err(invalid(format!("empty id in \"{token}\"")));
        }
        return Ok(Token::Compound(Compound {
            tag: tag_part(tag, token)?,
            condition: Condition::Id(id.to_string()),
        }));
    }
    if let Some((tag, classes)) = token.split_once('.') {
        let classes: Vec<String> = classes.split('.').map(str::to_string).collect();
        if classes.iter().any(String::is_empty) {
            return Err(invalid(format!("empty class name in \"{token}\"")));
        }
        return Ok(Token::Compound(Compound {
            tag: tag_part(tag, token)?,
            condition: Condition::Classes(classes),
        }));
    }
    if let Some((tag, pseudo)) = token.split_once(':') {
        return parse_pseudo(token, tag, pseudo).map(Token::Compound);
    }
    let token = match token {
        "*" => Token::Compound(Compound {
            tag: None,
            condition: Condition::Any,
        }),
        ">" => Token::Combinator(Combinator::Child),
        "~" => Token::Combinator(Combinator::SubsequentSibling),
        "+" => Token::Combinator(Combinator::NextSibling),
        name if is_tag_name(name) => Token::Compound(Compound {
            tag: Some(name.to_string()),
            condition: Condition::Any,
        }),
        other => {
            return Err(invalid(format!("unsupported or invalid CSS selector \"{other}\"")));
        }
    };
    Ok(token)
}

/// Parse one comma-free alternative into its steps.
fn parse_group(group: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    let mut pending: Option<Combinator> = None;
    for raw in group.split_whitespace() {
        match classify(raw)? {
            Token::Combinator(combinator) => {
                if pending.is_some() {
                    return Err(invalid(format!(
                        "combinator \"{raw}\" follows another combinator"
                    )));
                }
                pending = Some(combinator);
            }
            Token::Compound(compound) => steps.push(Step {
                via: pending.take(),
                compound,
            }),
        }
    }
    if pending.is_some() {
        return Err(invalid(format!(
            "final combinator in \"{group}\" is missing an argument"
        )));
    }
    if steps.is_empty() {
        return Err(invalid("empty selector"));
    }
    Ok(steps)
}

/// Parse a raw selector string.
///
/// # Errors
///
/// Returns [`DomError::InvalidSelector`] for empty selectors or group
/// members, a trailing or doubled combinator, and tokens that are not one
/// of the supported forms.
pub fn parse_selector(raw: &str) -> Result<SelectorList> {
    if raw.trim().is_empty() {
        return Err(invalid("empty selector"));
    }
    let groups = raw
        .split(',')
        .map(|group| {
            let group = group.trim();
            if group.is_empty() {
                Err(invalid(format!("invalid group selection syntax: \"{raw}\"")))
            } else {
                parse_group(group)
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(SelectorList { groups })
}
