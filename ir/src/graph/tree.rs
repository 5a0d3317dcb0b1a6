//! ASCII tree view of a signal's driving subgraph.
//!
//! Signals reached a second time (shared inputs, or cycles) print as
//! back-references instead of being expanded again, so cyclic graphs render
//! finitely.

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashSet;
use std::io;
use std::rc::Rc;

use ptree::{Style, TreeItem};

use super::{Graph, SignalId};

#[derive(Clone)]
pub struct SignalTree<'g> {
    graph: &'g Graph,
    signal: SignalId,
    visited: Rc<RefCell<HashSet<SignalId>>>,
    /// Set by `write_self` when the signal had already been printed.
    is_backref: RefCell<bool>,
}

impl<'g> SignalTree<'g> {
    pub fn new(graph: &'g Graph, signal: SignalId) -> Self {
        Self { graph, signal, visited: Rc::new(RefCell::new(HashSet::new())), is_backref: RefCell::new(false) }
    }

    fn child(&self, signal: SignalId) -> Self {
        Self { graph: self.graph, signal, visited: self.visited.clone(), is_backref: RefCell::new(false) }
    }
}

impl TreeItem for SignalTree<'_> {
    type Child = Self;

    fn write_self<W: io::Write>(&self, f: &mut W, _style: &Style) -> io::Result<()> {
        let mut visited = self.visited.borrow_mut();
        if visited.insert(self.signal) {
            write!(f, "{}", format_signal(self.graph, self.signal))
        } else {
            *self.is_backref.borrow_mut() = true;
            write!(f, "[{}] → (see above)", self.signal)
        }
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        if *self.is_backref.borrow() {
            return Cow::Borrowed(&[]);
        }
        let Some(port) = self.graph.driver(self.signal).and_then(|p| self.graph.port(p).ok()) else {
            return Cow::Borrowed(&[]);
        };
        Cow::Owned(port.inputs().iter().map(|&input| self.child(input)).collect())
    }
}

/// `[id] label = ENTITY (symbol) value=... cycles=n {properties}`
fn format_signal(graph: &Graph, id: SignalId) -> String {
    let Ok(signal) = graph.signal(id) else {
        return format!("[{id}] <removed>");
    };
    let mut out = format!("[{id}]");
    if let Some(label) = signal.label() {
        out.push_str(&format!(" {label}"));
    }
    match signal.driver().and_then(|p| graph.port(p).ok()) {
        Some(port) => out.push_str(&format!(" = {} ({})", port.entity().id, port.entity().symbol)),
        None => out.push_str(" = <source>"),
    }
    if let Some(value) = signal.value() {
        out.push_str(&format!(" value={value}"));
    }
    if signal.is_cyclic() {
        out.push_str(&format!(" cycles={}", signal.cycles()));
    }
    if !signal.properties().is_empty() {
        let properties: Vec<_> = signal.properties().iter().map(|p| p.name()).collect();
        out.push_str(&format!(" {{{}}}", properties.join(", ")));
    }
    out
}

/// Render `root`'s driving subgraph as an ASCII tree.
pub fn render_tree(graph: &Graph, root: SignalId) -> String {
    let tree = SignalTree::new(graph, root);
    let mut buf = Vec::new();
    if let Err(error) = ptree::write_tree(&tree, &mut buf) {
        tracing::warn!(%root, %error, "tree rendering failed");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

impl Graph {
    /// See [`render_tree`].
    pub fn render_tree(&self, root: SignalId) -> String {
        render_tree(self, root)
    }
}
