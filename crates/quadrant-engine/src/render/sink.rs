use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use log::debug;

/// One transformed vertex as handed to a [`VertexSink`].
///
/// `color` is already in the sink's channel order (see `ContextConfig::color_order`).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SinkVertex {
    pub position: [f32; 3],
    pub color: u32,
    pub uv: [f32; 2],
    pub overlay: u32,
    pub lightmap: u32,
    pub normal: [f32; 3],
}

/// Consumer of finished vertices. Four consecutive calls form one quad.
pub trait VertexSink {
    fn vertex(&mut self, vertex: &SinkVertex);
}

/// Output layer a quad is routed to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SinkLayer {
    /// The item's own layer, resolved by the host.
    Item,
    TranslucentCull,
    Cutout,
}

/// Stable handle to a sink, valid for the provider that issued it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SinkId(pub usize);

/// Hands out vertex sinks per layer.
///
/// `glint` is set for enchanted stacks; providers that draw the glint overlay
/// return a sink that writes to both outputs. Callers resolve a layer once
/// and keep the [`SinkId`] while the layer stays the same.
pub trait SinkProvider {
    fn resolve(&mut self, layer: SinkLayer, glint: bool) -> SinkId;

    /// # Panics
    /// May panic for an id this provider did not issue.
    fn sink_mut(&mut self, id: SinkId) -> &mut dyn VertexSink;

    fn sink(&mut self, layer: SinkLayer, glint: bool) -> &mut dyn VertexSink {
        let id = self.resolve(layer, glint);
        self.sink_mut(id)
    }
}

/// Vec-backed sink.
#[derive(Debug, Clone, Default)]
pub struct VertexBuffer {
    vertices: Vec<SinkVertex>,
}

impl VertexBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn vertices(&self) -> &[SinkVertex] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Complete quads written so far.
    #[inline]
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Raw vertex bytes, ready for upload.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }
}

impl VertexSink for VertexBuffer {
    #[inline]
    fn vertex(&mut self, vertex: &SinkVertex) {
        self.vertices.push(*vertex);
    }
}

/// Provider that creates one [`VertexBuffer`] per (layer, glint) pair on first use.
///
/// Ids index the buffer list directly and stay valid until the provider is dropped.
#[derive(Debug, Default)]
pub struct BufferedSinks {
    index: HashMap<(SinkLayer, bool), SinkId>,
    buffers: Vec<((SinkLayer, bool), VertexBuffer)>,
}

impl BufferedSinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, layer: SinkLayer, glint: bool) -> Option<&VertexBuffer> {
        let SinkId(i) = *self.index.get(&(layer, glint))?;
        Some(&self.buffers[i].1)
    }

    /// Number of buffers created so far.
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn total_vertices(&self) -> usize {
        self.buffers.iter().map(|(_, buf)| buf.len()).sum()
    }

    /// Buffers in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (SinkLayer, bool, &VertexBuffer)> {
        self.buffers.iter().map(|((layer, glint), buf)| (*layer, *glint, buf))
    }

    /// Empties every buffer, keeping them allocated.
    pub fn clear(&mut self) {
        self.buffers.iter_mut().for_each(|(_, buf)| buf.clear());
    }
}

impl SinkProvider for BufferedSinks {
    fn resolve(&mut self, layer: SinkLayer, glint: bool) -> SinkId {
        let buffers = &mut self.buffers;
        *self.index.entry((layer, glint)).or_insert_with(|| {
            debug!("creating vertex buffer for {layer:?} (glint: {glint})");
            buffers.push(((layer, glint), VertexBuffer::new()));
            SinkId(buffers.len() - 1)
        })
    }

    fn sink_mut(&mut self, SinkId(i): SinkId) -> &mut dyn VertexSink {
        &mut self.buffers[i].1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32) -> SinkVertex {
        SinkVertex {
            position: [x, 0.0, 0.0],
            color: 0xFFFF_FFFF,
            uv: [0.0, 0.0],
            overlay: 0,
            lightmap: 0,
            normal: [0.0, 1.0, 0.0],
        }
    }

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<SinkVertex>(), 11 * 4);
    }

    #[test]
    fn buffers_are_created_lazily_per_layer() {
        let mut sinks = BufferedSinks::new();
        assert_eq!(sinks.buffer_count(), 0);

        sinks.sink(SinkLayer::Cutout, false).vertex(&vertex(1.0));
        sinks.sink(SinkLayer::Cutout, false).vertex(&vertex(2.0));
        sinks.sink(SinkLayer::Cutout, true).vertex(&vertex(3.0));
        assert_eq!(sinks.buffer_count(), 2);
        assert_eq!(sinks.total_vertices(), 3);

        let cutout = sinks.get(SinkLayer::Cutout, false).expect("created");
        assert_eq!(cutout.vertices()[1].position[0], 2.0);
        assert!(sinks.get(SinkLayer::Item, false).is_none());

        sinks.clear();
        assert_eq!(sinks.buffer_count(), 2);
        assert_eq!(sinks.total_vertices(), 0);
    }

    #[test]
    fn resolved_ids_are_stable() {
        let mut sinks = BufferedSinks::new();
        let cutout = sinks.resolve(SinkLayer::Cutout, false);
        let item = sinks.resolve(SinkLayer::Item, true);
        assert_ne!(cutout, item);
        assert_eq!(sinks.resolve(SinkLayer::Cutout, false), cutout);

        sinks.sink_mut(item).vertex(&vertex(5.0));
        sinks.sink_mut(cutout).vertex(&vertex(6.0));
        assert_eq!(sinks.get(SinkLayer::Item, true).map(VertexBuffer::len), Some(1));

        let layers: Vec<_> = sinks.iter().map(|(layer, glint, _)| (layer, glint)).collect();
        assert_eq!(layers, [(SinkLayer::Cutout, false), (SinkLayer::Item, true)]);
    }

    #[test]
    fn bytes_cover_all_vertices() {
        let mut buf = VertexBuffer::new();
        for i in 0..4 {
            buf.vertex(&vertex(i as f32));
        }
        assert_eq!(buf.quad_count(), 1);
        assert_eq!(buf.as_bytes().len(), 4 * std::mem::size_of::<SinkVertex>());
    }
}
