//! In-memory host implementation for testing.
//!
//! Provides an arena-backed element tree with a virtual clock. Timer waits and
//! animation frames advance the clock instead of blocking, and yield once so
//! that concurrently polled flows interleave the way they would on a real
//! event loop.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::{UiError, UiResult};
use crate::host::Host;

/// Virtual time between two animation frames (~60 fps)
pub const FRAME_INTERVAL_MS: f64 = 16.0;

/// Handle to an element in a [`MemoryHost`]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeRef(usize);

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Observable side effects recorded by a [`MemoryHost`], in order.
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    ClassAdded { node: NodeRef, class: String },
    ClassRemoved { node: NodeRef, class: String },
    Slept(u32),
    Frame(f64),
    Navigated(String),
}

#[derive(Clone, Debug)]
struct MemoryNode {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    html: String,
    parent: Option<NodeRef>,
    children: Vec<NodeRef>,
    detached: bool,
}

impl MemoryNode {
    fn new(tag: &str, parent: Option<NodeRef>) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            text: String::new(),
            html: String::new(),
            parent,
            children: Vec::new(),
            detached: false,
        }
    }
}

/// In-memory page for testing.
pub struct MemoryHost {
    /// Element arena; index 0 is the body
    nodes: RefCell<Vec<MemoryNode>>,
    /// Virtual clock (ms)
    clock: Cell<f64>,
    viewport_width: Cell<f64>,
    reduced_motion: Cell<bool>,
    path: RefCell<String>,
    navigations: RefCell<Vec<String>>,
    fail_navigation: Cell<bool>,
    /// Nodes whose mutations are rejected
    poisoned: RefCell<BTreeSet<NodeRef>>,
    /// Single operations rejected on a node
    poisoned_ops: RefCell<BTreeSet<(NodeRef, &'static str)>>,
    journal: RefCell<Vec<HostEvent>>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// Create an empty page containing only a body, 1024px wide, at `/index.html`.
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(vec![MemoryNode::new("body", None)]),
            clock: Cell::new(0.0),
            viewport_width: Cell::new(1024.0),
            reduced_motion: Cell::new(false),
            path: RefCell::new(String::from("/index.html")),
            navigations: RefCell::new(Vec::new()),
            fail_navigation: Cell::new(false),
            poisoned: RefCell::new(BTreeSet::new()),
            poisoned_ops: RefCell::new(BTreeSet::new()),
            journal: RefCell::new(Vec::new()),
        }
    }

    // ========== Page Building ==========

    /// The body element.
    pub fn body_ref(&self) -> NodeRef {
        NodeRef(0)
    }

    /// Append an element with an optional id and classes.
    pub fn create_element(
        &self,
        parent: &NodeRef,
        tag: &str,
        id: Option<&str>,
        classes: &[&str],
    ) -> NodeRef {
        let mut nodes = self.nodes.borrow_mut();
        let node = NodeRef(nodes.len());
        let mut element = MemoryNode::new(tag, Some(*parent));
        if let Some(id) = id {
            element.attributes.insert("id".to_string(), id.to_string());
        }
        element.classes = classes.iter().map(|c| c.to_string()).collect();
        nodes.push(element);
        nodes[parent.0].children.push(node);
        node
    }

    // ========== Environment ==========

    pub fn set_viewport_width(&self, width: f64) {
        self.viewport_width.set(width);
    }

    pub fn set_reduced_motion(&self, reduced: bool) {
        self.reduced_motion.set(reduced);
    }

    pub fn set_path(&self, path: &str) {
        *self.path.borrow_mut() = path.to_string();
    }

    /// Make every subsequent `navigate` call fail.
    pub fn fail_navigation(&self, fail: bool) {
        self.fail_navigation.set(fail);
    }

    /// Make every subsequent mutation of `node` fail.
    pub fn poison(&self, node: &NodeRef) {
        self.poisoned.borrow_mut().insert(*node);
    }

    /// Make only `op` (e.g. `"set_text"`) fail on `node`.
    pub fn poison_op(&self, node: &NodeRef, op: &'static str) {
        self.poisoned_ops.borrow_mut().insert((*node, op));
    }

    /// Move the virtual clock forward.
    pub fn advance(&self, ms: f64) {
        self.clock.set(self.clock.get() + ms);
    }

    // ========== Inspection ==========

    pub fn classes(&self, node: &NodeRef) -> Vec<String> {
        self.nodes.borrow()[node.0].classes.clone()
    }

    pub fn style(&self, node: &NodeRef, property: &str) -> Option<String> {
        self.nodes.borrow()[node.0].styles.get(property).cloned()
    }

    pub fn html(&self, node: &NodeRef) -> String {
        self.nodes.borrow()[node.0].html.clone()
    }

    pub fn children(&self, node: &NodeRef) -> Vec<NodeRef> {
        let nodes = self.nodes.borrow();
        nodes[node.0]
            .children
            .iter()
            .copied()
            .filter(|c| !nodes[c.0].detached)
            .collect()
    }

    /// Whether `node` is reachable from the body.
    pub fn is_attached(&self, node: &NodeRef) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = Some(*node);
        while let Some(n) = current {
            if nodes[n.0].detached {
                return false;
            }
            current = nodes[n.0].parent;
        }
        true
    }

    /// URLs passed to `navigate`, in order.
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.borrow().clone()
    }

    pub fn journal(&self) -> Vec<HostEvent> {
        self.journal.borrow().clone()
    }

    pub fn clear_journal(&self) {
        self.journal.borrow_mut().clear();
    }

    // ========== Internals ==========

    fn record(&self, event: HostEvent) {
        self.journal.borrow_mut().push(event);
    }

    fn check_writable(&self, node: &NodeRef, op: &'static str) -> UiResult<()> {
        if self.poisoned.borrow().contains(node)
            || self.poisoned_ops.borrow().contains(&(*node, op))
        {
            return Err(UiError::dom(op, format!("{:?} rejected the mutation", node)));
        }
        Ok(())
    }

    /// Attached elements below the body in document order.
    fn document_order(&self) -> Vec<NodeRef> {
        let nodes = self.nodes.borrow();
        let mut order = Vec::new();
        let mut stack = vec![NodeRef(0)];
        while let Some(node) = stack.pop() {
            if nodes[node.0].detached {
                continue;
            }
            if node.0 != 0 {
                order.push(node);
            }
            stack.extend(nodes[node.0].children.iter().rev().copied());
        }
        order
    }

    fn detach_children(nodes: &mut [MemoryNode], node: &NodeRef) {
        let children = std::mem::take(&mut nodes[node.0].children);
        for child in children {
            nodes[child.0].detached = true;
        }
    }
}

// ========== Selector Matching ==========

/// One compound selector: `tag.class#id[attr]`, every part optional.
#[derive(Default)]
struct Compound<'a> {
    tag: Option<&'a str>,
    id: Option<&'a str>,
    classes: Vec<&'a str>,
    attributes: Vec<&'a str>,
}

fn parse_compound(selector: &str) -> Compound<'_> {
    let mut compound = Compound::default();
    let bytes = selector.as_bytes();
    let mut i = 0;
    let token_end = |start: usize| {
        selector[start..]
            .find(&['.', '#', '['][..])
            .map(|off| start + off)
            .unwrap_or(selector.len())
    };
    while i < bytes.len() {
        match bytes[i] {
            b'.' => {
                let end = token_end(i + 1);
                compound.classes.push(&selector[i + 1..end]);
                i = end;
            }
            b'#' => {
                let end = token_end(i + 1);
                compound.id = Some(&selector[i + 1..end]);
                i = end;
            }
            b'[' => {
                let end = selector[i..].find(']').map(|off| i + off).unwrap_or(selector.len());
                compound.attributes.push(&selector[i + 1..end]);
                i = (end + 1).min(selector.len());
            }
            _ => {
                let end = token_end(i);
                compound.tag = Some(&selector[i..end]);
                i = end;
            }
        }
    }
    compound
}

fn matches(node: &MemoryNode, compound: &Compound<'_>) -> bool {
    if let Some(tag) = compound.tag {
        if !node.tag.eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if let Some(id) = compound.id {
        if node.attributes.get("id").map(String::as_str) != Some(id) {
            return false;
        }
    }
    compound
        .classes
        .iter()
        .all(|c| node.classes.iter().any(|have| have == c))
        && compound
            .attributes
            .iter()
            .all(|a| node.attributes.contains_key(*a))
}

/// Drop everything between `<` and `>`.
fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}

/// Completes on the second poll, waking itself in between.
struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

impl Host for MemoryHost {
    type Node = NodeRef;

    fn element_by_id(&self, id: &str) -> Option<NodeRef> {
        let order = self.document_order();
        let nodes = self.nodes.borrow();
        order
            .into_iter()
            .find(|n| nodes[n.0].attributes.get("id").map(String::as_str) == Some(id))
    }

    fn query_all(&self, selector: &str) -> Vec<NodeRef> {
        let alternatives: Vec<Compound<'_>> = selector
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_compound)
            .collect();
        let order = self.document_order();
        let nodes = self.nodes.borrow();
        order
            .into_iter()
            .filter(|n| alternatives.iter().any(|c| matches(&nodes[n.0], c)))
            .collect()
    }

    fn body(&self) -> Option<NodeRef> {
        Some(NodeRef(0))
    }

    fn add_class(&self, node: &NodeRef, class: &str) -> UiResult<()> {
        self.check_writable(node, "add_class")?;
        let mut nodes = self.nodes.borrow_mut();
        let classes = &mut nodes[node.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
        drop(nodes);
        self.record(HostEvent::ClassAdded {
            node: *node,
            class: class.to_string(),
        });
        Ok(())
    }

    fn remove_class(&self, node: &NodeRef, class: &str) -> UiResult<()> {
        self.check_writable(node, "remove_class")?;
        self.nodes.borrow_mut()[node.0].classes.retain(|c| c != class);
        self.record(HostEvent::ClassRemoved {
            node: *node,
            class: class.to_string(),
        });
        Ok(())
    }

    fn has_class(&self, node: &NodeRef, class: &str) -> bool {
        self.nodes.borrow()[node.0].classes.iter().any(|c| c == class)
    }

    fn set_text(&self, node: &NodeRef, text: &str) -> UiResult<()> {
        self.check_writable(node, "set_text")?;
        let mut nodes = self.nodes.borrow_mut();
        Self::detach_children(&mut nodes, node);
        nodes[node.0].text = text.to_string();
        nodes[node.0].html.clear();
        Ok(())
    }

    fn text(&self, node: &NodeRef) -> String {
        self.nodes.borrow()[node.0].text.clone()
    }

    fn set_inner_html(&self, node: &NodeRef, html: &str) -> UiResult<()> {
        self.check_writable(node, "set_inner_html")?;
        let mut nodes = self.nodes.borrow_mut();
        Self::detach_children(&mut nodes, node);
        nodes[node.0].html = html.to_string();
        nodes[node.0].text = strip_tags(html);
        Ok(())
    }

    fn set_style(&self, node: &NodeRef, property: &str, value: &str) -> UiResult<()> {
        self.check_writable(node, "set_style")?;
        let mut nodes = self.nodes.borrow_mut();
        if value.is_empty() {
            nodes[node.0].styles.remove(property);
        } else {
            nodes[node.0]
                .styles
                .insert(property.to_string(), value.to_string());
        }
        Ok(())
    }

    fn attribute(&self, node: &NodeRef, name: &str) -> Option<String> {
        self.nodes.borrow()[node.0].attributes.get(name).cloned()
    }

    fn set_attribute(&self, node: &NodeRef, name: &str, value: &str) -> UiResult<()> {
        self.check_writable(node, "set_attribute")?;
        self.nodes.borrow_mut()[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_attribute(&self, node: &NodeRef, name: &str) -> UiResult<()> {
        self.check_writable(node, "remove_attribute")?;
        self.nodes.borrow_mut()[node.0].attributes.remove(name);
        Ok(())
    }

    fn append_element(&self, parent: &NodeRef, tag: &str, class: &str) -> UiResult<NodeRef> {
        self.check_writable(parent, "append_element")?;
        let classes: Vec<&str> = class.split_whitespace().collect();
        Ok(self.create_element(parent, tag, None, &classes))
    }

    fn remove(&self, node: &NodeRef) {
        if node.0 == 0 {
            return;
        }
        self.nodes.borrow_mut()[node.0].detached = true;
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width.get()
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion.get()
    }

    fn current_path(&self) -> String {
        self.path.borrow().clone()
    }

    fn navigate(&self, url: &str) -> UiResult<()> {
        if self.fail_navigation.get() {
            return Err(UiError::Navigation {
                url: url.to_string(),
                reason: "navigation blocked".to_string(),
            });
        }
        self.navigations.borrow_mut().push(url.to_string());
        self.record(HostEvent::Navigated(url.to_string()));
        *self.path.borrow_mut() = url.to_string();
        Ok(())
    }

    fn now(&self) -> f64 {
        self.clock.get()
    }

    async fn sleep(&self, ms: u32) {
        self.record(HostEvent::Slept(ms));
        self.advance(f64::from(ms));
        YieldNow { yielded: false }.await;
    }

    async fn next_frame(&self) -> f64 {
        self.advance(FRAME_INTERVAL_MS);
        let timestamp = self.clock.get();
        self.record(HostEvent::Frame(timestamp));
        YieldNow { yielded: false }.await;
        timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_query_by_class_tag_and_attribute() {
        let host = MemoryHost::new();
        let body = host.body_ref();
        let nav = host.create_element(&body, "nav", Some("sidebar"), &["sidebar"]);
        let a = host.create_element(&nav, "a", None, &["nav-link", "active"]);
        let b = host.create_element(&nav, "a", None, &["nav-link"]);
        let span = host.create_element(&body, "span", None, &[]);
        host.set_attribute(&span, "data-counter", "10").unwrap();

        assert_eq!(host.query_all(".nav-link"), vec![a, b]);
        assert_eq!(host.query_all("a.active"), vec![a]);
        assert_eq!(host.query_all("[data-counter]"), vec![span]);
        assert_eq!(host.query_all("#sidebar, span"), vec![nav, span]);
        assert_eq!(host.element_by_id("sidebar"), Some(nav));
    }

    #[test]
    fn test_document_order_follows_tree() {
        let host = MemoryHost::new();
        let body = host.body_ref();
        let first = host.create_element(&body, "section", None, &["page-transition"]);
        let second = host.create_element(&body, "section", None, &["page-transition"]);
        let nested = host.create_element(&first, "div", None, &["page-transition"]);

        assert_eq!(
            host.query_all(".page-transition"),
            vec![first, nested, second]
        );
    }

    #[test]
    fn test_removed_elements_are_not_found() {
        let host = MemoryHost::new();
        let body = host.body_ref();
        let parent = host.create_element(&body, "div", Some("parent"), &[]);
        let child = host.create_element(&parent, "p", Some("child"), &[]);

        host.remove(&parent);
        host.remove(&parent);
        assert!(host.element_by_id("parent").is_none());
        assert!(host.element_by_id("child").is_none());
        assert!(!host.is_attached(&child));
    }

    #[test]
    fn test_class_mutation_is_idempotent() {
        let host = MemoryHost::new();
        let el = host.create_element(&host.body_ref(), "div", None, &[]);
        host.add_class(&el, "loaded").unwrap();
        host.add_class(&el, "loaded").unwrap();
        assert_eq!(host.classes(&el), vec!["loaded".to_string()]);

        host.remove_class(&el, "loaded").unwrap();
        host.remove_class(&el, "loaded").unwrap();
        assert!(host.classes(&el).is_empty());
    }

    #[test]
    fn test_poisoned_node_rejects_mutation() {
        let host = MemoryHost::new();
        let el = host.create_element(&host.body_ref(), "div", None, &[]);
        host.poison(&el);

        let err = host.add_class(&el, "active").unwrap_err();
        assert!(matches!(err, UiError::Dom { op: "add_class", .. }));
        assert!(host.set_text(&el, "x").is_err());
        assert!(!host.has_class(&el, "active"));
    }

    #[test]
    fn test_poisoned_op_rejects_only_that_op() {
        let host = MemoryHost::new();
        let el = host.create_element(&host.body_ref(), "button", None, &[]);
        host.poison_op(&el, "set_text");

        assert!(host.set_text(&el, "x").is_err());
        host.add_class(&el, "loading").unwrap();
        assert!(host.has_class(&el, "loading"));
    }

    #[test]
    fn test_inner_html_exposes_text() {
        let host = MemoryHost::new();
        let el = host.create_element(&host.body_ref(), "ul", None, &[]);
        host.set_inner_html(&el, "<li><strong>O+</strong> 67 units</li>")
            .unwrap();
        assert_eq!(host.text(&el), "O+ 67 units");
    }

    #[test]
    fn test_sleep_and_frames_advance_clock() {
        let host = MemoryHost::new();
        block_on(async {
            host.sleep(250).await;
            let t = host.next_frame().await;
            assert_eq!(t, 250.0 + FRAME_INTERVAL_MS);
        });
        assert_eq!(host.now(), 250.0 + FRAME_INTERVAL_MS);
        assert_eq!(
            host.journal(),
            vec![HostEvent::Slept(250), HostEvent::Frame(266.0)]
        );
    }

    #[test]
    fn test_navigation_failure() {
        let host = MemoryHost::new();
        host.fail_navigation(true);
        assert!(matches!(
            host.navigate("/donors.html"),
            Err(UiError::Navigation { .. })
        ));
        assert!(host.navigations().is_empty());
    }
}
