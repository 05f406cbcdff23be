//! Component tree contract: immutable builders and the renderer node.
//!
//! Components are immutable builder-pattern values ([`Text`], [`Container`])
//! whose `render()` produces the plain-data [`RendererNode`] handed to the
//! terminal renderer. A [`Widget`] is a component factory that additionally
//! consumes the [`Hooks`] facade — this is where state and behavior live.
//! The cell-level renderer itself is an external collaborator; this module
//! only defines the tree it consumes.

use crate::hooks::Hooks;

// ---------------------------------------------------------------------------
// RendererNode
// ---------------------------------------------------------------------------

/// Layout direction for a box node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Column,
    Row,
}

/// Plain-data tree handed to the external renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum RendererNode {
    Text {
        content: String,
        bold: bool,
        dim: bool,
    },
    Box {
        direction: Direction,
        children: Vec<RendererNode>,
    },
}

impl RendererNode {
    /// Total number of nodes in this subtree, root included.
    pub fn node_count(&self) -> usize {
        match self {
            RendererNode::Text { .. } => 1,
            RendererNode::Box { children, .. } => {
                1 + children.iter().map(RendererNode::node_count).sum::<usize>()
            }
        }
    }

    /// Concatenated text content of the subtree, in tree order.
    pub fn text_content(&self) -> String {
        match self {
            RendererNode::Text { content, .. } => content.clone(),
            RendererNode::Box { children, .. } => children
                .iter()
                .map(RendererNode::text_content)
                .collect::<Vec<_>>()
                .join(""),
        }
    }
}

// ---------------------------------------------------------------------------
// Component trait
// ---------------------------------------------------------------------------

/// A node in the declarative UI tree.
///
/// Implementations are immutable values; `render` may be called any number
/// of times and must be side-effect free.
pub trait Component {
    /// Produce the renderer-facing node for this component.
    fn render(&self) -> RendererNode;
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// A run of styled text. Builder methods return new values.
#[derive(Debug, Clone, Default)]
pub struct Text {
    content: String,
    bold: bool,
    dim: bool,
}

impl Text {
    /// Create a text component with the given content.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            bold: false,
            dim: false,
        }
    }

    /// Render bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Render dimmed.
    pub fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    /// The text content.
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Component for Text {
    fn render(&self) -> RendererNode {
        RendererNode::Text {
            content: self.content.clone(),
            bold: self.bold,
            dim: self.dim,
        }
    }
}

// ---------------------------------------------------------------------------
// Container
// ---------------------------------------------------------------------------

/// A box of child components laid out in a row or column.
pub struct Container {
    direction: Direction,
    children: Vec<Box<dyn Component>>,
}

impl Container {
    /// A column container (children stacked vertically).
    pub fn column() -> Self {
        Self {
            direction: Direction::Column,
            children: Vec::new(),
        }
    }

    /// A row container (children laid out horizontally).
    pub fn row() -> Self {
        Self {
            direction: Direction::Row,
            children: Vec::new(),
        }
    }

    /// Append a child (builder).
    pub fn child(mut self, child: impl Component + 'static) -> Self {
        self.children.push(Box::new(child));
        self
    }

    /// Append an already-boxed child (builder).
    pub fn child_boxed(mut self, child: Box<dyn Component>) -> Self {
        self.children.push(child);
        self
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the container has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Component for Container {
    fn render(&self) -> RendererNode {
        RendererNode::Box {
            direction: self.direction,
            children: self.children.iter().map(|c| c.render()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Widget trait
// ---------------------------------------------------------------------------

/// A component factory with state: `build` runs once per render pass, inside
/// an active hook context, and claims hook slots through `hooks`.
///
/// Rules of hooks apply: `build` must call hooks in the same order every
/// pass — no hooks inside conditionals, loops with varying iteration counts,
/// or early returns.
pub trait Widget {
    /// Build the component tree for the current render pass.
    fn build(&self, hooks: &mut Hooks) -> Box<dyn Component>;
}

impl<F> Widget for F
where
    F: Fn(&mut Hooks) -> Box<dyn Component>,
{
    fn build(&self, hooks: &mut Hooks) -> Box<dyn Component> {
        self(hooks)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ── Text ─────────────────────────────────────────────────────────

    #[test]
    fn text_renders_content() {
        let node = Text::new("hello").render();
        assert_eq!(
            node,
            RendererNode::Text {
                content: "hello".into(),
                bold: false,
                dim: false,
            }
        );
    }

    #[test]
    fn text_builder_styles() {
        let node = Text::new("x").bold().dim().render();
        match node {
            RendererNode::Text { bold, dim, .. } => {
                assert!(bold);
                assert!(dim);
            }
            other => panic!("expected Text, got {:?}", other),
        }
    }

    // ── Container ────────────────────────────────────────────────────

    #[test]
    fn empty_column() {
        let container = Container::column();
        assert!(container.is_empty());
        let node = container.render();
        assert_eq!(node.node_count(), 1);
    }

    #[test]
    fn container_nests() {
        let tree = Container::column()
            .child(Text::new("a"))
            .child(Container::row().child(Text::new("b")).child(Text::new("c")));
        let node = tree.render();
        assert_eq!(node.node_count(), 5);
        assert_eq!(node.text_content(), "abc");
    }

    #[test]
    fn row_direction() {
        let node = Container::row().render();
        match node {
            RendererNode::Box { direction, .. } => assert_eq!(direction, Direction::Row),
            other => panic!("expected Box, got {:?}", other),
        }
    }

    // ── Widget via closure ───────────────────────────────────────────

    #[test]
    fn closure_is_a_widget() {
        let widget = |_hooks: &mut Hooks| -> Box<dyn Component> { Box::new(Text::new("w")) };
        let mut hooks = Hooks::detached();
        let node = widget.build(&mut hooks).render();
        assert_eq!(node.text_content(), "w");
    }
}
