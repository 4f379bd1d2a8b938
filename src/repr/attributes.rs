/*!
# Attribute Overlay

Vertices and edges carry an ordered list of string attributes. Algorithms use fixed slots of
these lists as scratch space or to publish results (e.g. reach probabilities) so that
reporting layers can read them back by name.

Reads are lenient: a missing vertex, edge or slot reads as the empty string.
Writes grow the storage as needed; it never shrinks on read.
*/

use super::*;

/// Per-vertex and per-edge attribute lists
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    vertex: Vec<Vec<String>>,
    edge: Vec<Vec<String>>,
}

fn read(table: &[Vec<String>], index: usize, slot: usize) -> &str {
    table
        .get(index)
        .and_then(|list| list.get(slot))
        .map_or("", String::as_str)
}

fn row(table: &mut Vec<Vec<String>>, index: usize) -> &mut Vec<String> {
    if table.len() <= index {
        table.resize_with(index + 1, Vec::new);
    }
    &mut table[index]
}

fn write(table: &mut Vec<Vec<String>>, index: usize, slot: usize, value: String) {
    let list = row(table, index);
    if list.len() <= slot {
        list.resize_with(slot + 1, String::new);
    }
    list[slot] = value;
}

impl Attributes {
    /// Returns the attribute in `slot` of vertex `u` or `""` if absent
    pub fn vertex_attribute(&self, u: Node, slot: usize) -> &str {
        read(&self.vertex, u as usize, slot)
    }

    /// Returns all attributes of vertex `u`
    pub fn vertex_attributes(&self, u: Node) -> &[String] {
        self.vertex.get(u as usize).map_or(&[], Vec::as_slice)
    }

    /// Replaces the attribute list of vertex `u`
    pub fn set_vertex_attributes(&mut self, u: Node, list: Vec<String>) {
        *row(&mut self.vertex, u as usize) = list;
    }

    /// Writes a single attribute of vertex `u`, growing the list as needed
    pub fn set_vertex_attribute(&mut self, u: Node, slot: usize, value: impl Into<String>) {
        write(&mut self.vertex, u as usize, slot, value.into());
    }

    /// Returns the attribute in `slot` of edge `e` or `""` if absent
    pub fn edge_attribute(&self, e: EdgeId, slot: usize) -> &str {
        read(&self.edge, e as usize, slot)
    }

    /// Returns all attributes of edge `e`
    pub fn edge_attributes(&self, e: EdgeId) -> &[String] {
        self.edge.get(e as usize).map_or(&[], Vec::as_slice)
    }

    /// Replaces the attribute list of edge `e`
    pub fn set_edge_attributes(&mut self, e: EdgeId, list: Vec<String>) {
        *row(&mut self.edge, e as usize) = list;
    }

    /// Writes a single attribute of edge `e`, growing the list as needed
    pub fn set_edge_attribute(&mut self, e: EdgeId, slot: usize, value: impl Into<String>) {
        write(&mut self.edge, e as usize, slot, value.into());
    }
}

/// Convenience access to an embedded [`Attributes`] overlay
pub trait AttributeOverlay {
    fn overlay(&self) -> &Attributes;

    fn overlay_mut(&mut self) -> &mut Attributes;

    fn vertex_attribute(&self, u: Node, slot: usize) -> &str {
        self.overlay().vertex_attribute(u, slot)
    }

    fn set_vertex_attributes(&mut self, u: Node, list: Vec<String>) {
        self.overlay_mut().set_vertex_attributes(u, list);
    }

    fn set_vertex_attribute(&mut self, u: Node, slot: usize, value: impl Into<String>) {
        self.overlay_mut().set_vertex_attribute(u, slot, value);
    }

    fn edge_attribute(&self, e: EdgeId, slot: usize) -> &str {
        self.overlay().edge_attribute(e, slot)
    }

    fn set_edge_attributes(&mut self, e: EdgeId, list: Vec<String>) {
        self.overlay_mut().set_edge_attributes(e, list);
    }

    fn set_edge_attribute(&mut self, e: EdgeId, slot: usize, value: impl Into<String>) {
        self.overlay_mut().set_edge_attribute(e, slot, value);
    }
}

impl AttributeOverlay for Graph {
    fn overlay(&self) -> &Attributes {
        self.attributes()
    }

    fn overlay_mut(&mut self) -> &mut Attributes {
        self.attributes_mut()
    }
}
