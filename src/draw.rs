//! DOT output of the tree shape, for debugging balance and colors.

use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::index::{IndexType, NodeIndex};
use crate::map::OrderedMap;
use crate::node::Node;
use crate::set::OrderedSet;
use crate::tree::RbTree;

impl<K, V, C, Ix> RbTree<K, V, C, Ix>
where
    K: Display,
    Ix: IndexType,
{
    /// Write the tree in the DOT graph description language. `label` renders
    /// the text of one node.
    fn write_dot<W, F>(&self, w: &mut W, label: F) -> io::Result<()>
    where
        W: Write,
        F: Fn(&Node<K, V, Ix>) -> String,
    {
        writeln!(w, "digraph {{")?;
        writeln!(w, "\tnode [style=filled, fontcolor=white];")?;
        if let Some(root) = self.root() {
            self.write_dot_node(w, root, &label)?;
        }
        writeln!(w, "}}")
    }

    fn write_dot_node<W, F>(&self, w: &mut W, x: NodeIndex<Ix>, label: &F) -> io::Result<()>
    where
        W: Write,
        F: Fn(&Node<K, V, Ix>) -> String,
    {
        let node = &self.nodes[x.index()];
        let fill = if node.is_red() { "red" } else { "black" };
        writeln!(
            w,
            "\tn{} [label=\"{}\", fillcolor={fill}];",
            x.index(),
            label(node)
        )?;
        for child in [node.left(), node.right()].into_iter().flatten() {
            writeln!(w, "\tn{} -> n{};", x.index(), child.index())?;
            self.write_dot_node(w, child, label)?;
        }
        Ok(())
    }
}

fn create(path: impl AsRef<Path>) -> io::Result<BufWriter<File>> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "writing dot file");
    Ok(BufWriter::new(File::create(path)?))
}

impl<K, V, C, Ix> OrderedMap<K, V, C, Ix>
where
    K: Display,
    Ix: IndexType,
{
    /// Write a DOT file of the tree, labelling each node `key: value`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be written.
    pub fn draw(&self, path: impl AsRef<Path>) -> io::Result<()>
    where
        V: Display,
    {
        let mut w = create(path)?;
        self.tree
            .write_dot(&mut w, |n| format!("{}: {}", n.key(), n.value()))?;
        w.flush()
    }

    /// Write a DOT file of the tree, labelling each node with its key only.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be written.
    pub fn draw_without_value(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut w = create(path)?;
        self.tree.write_dot(&mut w, |n| n.key().to_string())?;
        w.flush()
    }
}

impl<K, C, Ix> OrderedSet<K, C, Ix>
where
    K: Display,
    Ix: IndexType,
{
    /// Write a DOT file of the tree.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be written.
    pub fn draw(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut w = create(path)?;
        self.tree.write_dot(&mut w, |n| n.key().to_string())?;
        w.flush()
    }
}

#[cfg(test)]
mod test {
    use crate::OrderedMap;

    #[test]
    fn dot_output_lists_every_node_with_its_color() {
        let map: OrderedMap<_, _> = (1..=4).map(|k| (k, k * 10)).collect();
        let mut out = Vec::new();
        map.tree
            .write_dot(&mut out, |n| format!("{}: {}", n.key(), n.value()))
            .unwrap();
        let dot = String::from_utf8(out).unwrap();
        assert!(dot.starts_with("digraph {"));
        for k in 1..=4 {
            assert!(dot.contains(&format!("label=\"{k}: {}\"", k * 10)));
        }
        assert_eq!(dot.matches(" -> ").count(), 3);
        assert_eq!(dot.matches("fillcolor=red").count(), 1);
    }
}
