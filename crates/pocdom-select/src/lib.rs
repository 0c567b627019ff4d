//! CSS selector subset for pocdom trees.
//!
//! Supported forms, one per whitespace-separated token:
//!
//! - `tag`, `*`
//! - `tag#id`, `tag.class1.class2`
//! - `tag[attr]`, `tag[attr=v]`, `[attr~=v]`, `[attr|=v]`, `[attr^=v]`,
//!   `[attr$=v]`, `[attr*=v]`
//! - `tag:nth-of-type(N)`, counted over the whole context for a plain
//!   descendant step and per context node after a combinator
//! - combinators `>` (children), `~` (following siblings) and `+` (next
//!   element sibling), each applying to the token after it
//! - comma-separated groups, unioned
//!
//! Evaluation is iterative: the context starts as `{root}` and each step
//! replaces it with the matching candidates generated from every context
//! node (all descendants, unless a combinator says otherwise).
//!
//! ```
//! use pocdom_dom::DomTree;
//!
//! let mut tree = DomTree::new();
//! let form = tree.element("form");
//! let label = tree.element("label");
//! let input = tree.element_with("input", [("type", "text")]);
//! tree.append_all(form, [label, input])?;
//!
//! assert_eq!(pocdom_select::select(&tree, form, "input[type=text]")?, [input]);
//! assert_eq!(pocdom_select::select_one(&tree, form, "label + input")?, Some(input));
//! # Ok::<(), pocdom_dom::DomError>(())
//! ```

use indexmap::IndexSet;
use log::debug;
use pocdom_dom::{DomTree, Node, NodeId, Result};

mod parser;

pub use parser::{
    AttributeSelector, Combinator, Compound, Condition, SelectorList, Step, parse_selector,
};

/// Select every node below `root` matching `selector`.
///
/// # Errors
///
/// Returns [`pocdom_dom::DomError::InvalidSelector`] if the selector cannot be
/// parsed.
pub fn select(tree: &DomTree, root: NodeId, selector: &str) -> Result<Vec<NodeId>> {
    select_with_limit(tree, root, selector, None)
}

/// Select at most `limit` nodes below `root` matching `selector`.
///
/// # Errors
///
/// Returns [`pocdom_dom::DomError::InvalidSelector`] if the selector cannot be
/// parsed.
pub fn select_with_limit(
    tree: &DomTree,
    root: NodeId,
    selector: &str,
    limit: Option<usize>,
) -> Result<Vec<NodeId>> {
    debug!(target: "pocdom::select", "running CSS selector \"{selector}\"");
    Ok(parse_selector(selector)?.evaluate(tree, root, limit))
}

/// The first node below `root` matching `selector`.
///
/// # Errors
///
/// Returns [`pocdom_dom::DomError::InvalidSelector`] if the selector cannot be
/// parsed.
pub fn select_one(tree: &DomTree, root: NodeId, selector: &str) -> Result<Option<NodeId>> {
    Ok(select_with_limit(tree, root, selector, Some(1))?
        .first()
        .copied())
}

impl SelectorList {
    /// Run the parsed selector against the subtree below `root`.
    ///
    /// Groups are evaluated in order and their results unioned without
    /// duplicates.
    #[must_use]
    pub fn evaluate(&self, tree: &DomTree, root: NodeId, limit: Option<usize>) -> Vec<NodeId> {
        let mut found = IndexSet::new();
        for steps in &self.groups {
            found.extend(run_steps(tree, root, steps, limit));
            if limit.is_some_and(|limit| found.len() >= limit) {
                break;
            }
        }
        let mut found: Vec<NodeId> = found.into_iter().collect();
        if let Some(limit) = limit {
            found.truncate(limit);
        }
        found
    }
}

fn is_element(tree: &DomTree, id: NodeId) -> bool {
    tree.get(id).is_some_and(|node| node.data().kind().is_tag())
}

fn candidates<'a>(
    tree: &'a DomTree,
    context: NodeId,
    via: Option<Combinator>,
) -> Box<dyn Iterator<Item = NodeId> + 'a> {
    match via {
        None => Box::new(tree.descendants(context)),
        Some(Combinator::Child) => Box::new(tree.children(context).iter().copied()),
        Some(Combinator::SubsequentSibling) => Box::new(tree.next_siblings(context)),
        Some(Combinator::NextSibling) => Box::new(
            tree.next_siblings(context)
                .find(|&id| is_element(tree, id))
                .into_iter(),
        ),
    }
}

fn run_steps(
    tree: &DomTree,
    root: NodeId,
    steps: &[Step],
    limit: Option<usize>,
) -> IndexSet<NodeId> {
    let mut context = IndexSet::from([root]);
    for (index, step) in steps.iter().enumerate() {
        let last = index + 1 == steps.len();
        debug!(target: "pocdom::select", " considering {step:?}");

        // A plain descendant step counts nth-of-type across the whole
        // context; a step after a combinator counts per context node.
        let shared_count = step.via.is_none();
        let mut seen_of_type = 0;
        let mut next = IndexSet::new();
        'contexts: for &node in &context {
            if !shared_count {
                seen_of_type = 0;
            }
            for candidate in candidates(tree, node, step.via) {
                let Some(data) = tree.get(candidate).map(Node::data) else {
                    continue;
                };
                if !data.kind().is_tag() || !step.compound.matches(data) {
                    continue;
                }
                if let Condition::NthOfType(n) = step.compound.condition {
                    seen_of_type += 1;
                    if seen_of_type < n {
                        continue;
                    }
                }

                debug!(target: "pocdom::select", "  matched {candidate} <{}>", data.name);
                let _ = next.insert(candidate);
                if last && limit.is_some_and(|limit| next.len() >= limit) {
                    break 'contexts;
                }
                if matches!(step.compound.condition, Condition::NthOfType(_)) {
                    if shared_count {
                        break 'contexts;
                    }
                    break;
                }
            }
        }
        context = next;
        if context.is_empty() {
            break;
        }
    }
    context
}
