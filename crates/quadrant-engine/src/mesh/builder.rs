use std::ops::{Deref, DerefMut};

use crate::error::MeshError;

use super::encoding::TOTAL_STRIDE;
use super::mutable::QuadEmitter;
use super::view::{MutableQuad, QuadRef};

/// Immutable sequence of encoded quads.
///
/// The word count is always a whole number of `TOTAL_STRIDE`s and quads are
/// kept in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mesh {
    words: Box<[u32]>,
}

impl Mesh {
    /// Wraps already-encoded quads.
    pub fn from_words(words: impl Into<Box<[u32]>>) -> Result<Self, MeshError> {
        let words = words.into();
        if words.len() % TOTAL_STRIDE != 0 {
            return Err(MeshError::Misaligned { len: words.len() });
        }
        Ok(Self { words })
    }

    /// Reads a mesh from its byte form (see [`Mesh::as_bytes`]).
    ///
    /// `bytes` must be 4-byte aligned and hold whole words.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MeshError> {
        let words: &[u32] = bytemuck::try_cast_slice(bytes)?;
        Self::from_words(words)
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.words.len() / TOTAL_STRIDE
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[inline]
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    /// Read-only view of quad `index`.
    pub fn quad(&self, index: usize) -> Option<QuadRef<'_>> {
        (index < self.quad_count()).then(|| QuadRef::load(&self.words, index * TOTAL_STRIDE))
    }

    /// Quads in encoding order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = QuadRef<'_>> + '_ {
        (0..self.quad_count()).map(move |i| QuadRef::load(&self.words, i * TOTAL_STRIDE))
    }

    /// Calls `f` once per quad, in encoding order.
    pub fn for_each(&self, mut f: impl FnMut(&QuadRef<'_>)) {
        for quad in self.iter() {
            f(&quad);
        }
    }
}

/// Accumulates emitted quads into a [`Mesh`].
#[derive(Debug, Default)]
pub struct MeshBuilder {
    words: Vec<u32>,
    editor: MutableQuad,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocates room for `quads` quads.
    pub fn with_capacity(quads: usize) -> Self {
        Self {
            words: Vec::with_capacity(quads * TOTAL_STRIDE),
            editor: MutableQuad::new(),
        }
    }

    /// The builder's emitter, with a cleared editor quad.
    pub fn emitter(&mut self) -> MeshEmitter<'_> {
        self.editor.clear();
        MeshEmitter { builder: self }
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.words.len() / TOTAL_STRIDE
    }

    /// Finalizes the accumulated quads and resets the builder.
    pub fn build(&mut self) -> Mesh {
        self.editor.clear();
        let words = std::mem::take(&mut self.words);
        Mesh { words: words.into_boxed_slice() }
    }

    fn append_editor(&mut self) {
        self.editor.compute_geometry();
        self.words.extend_from_slice(self.editor.words());
        self.editor.clear();
    }
}

/// Emitter writing into a [`MeshBuilder`].
pub struct MeshEmitter<'a> {
    builder: &'a mut MeshBuilder,
}

impl Deref for MeshEmitter<'_> {
    type Target = MutableQuad;

    fn deref(&self) -> &MutableQuad {
        &self.builder.editor
    }
}

impl DerefMut for MeshEmitter<'_> {
    fn deref_mut(&mut self) -> &mut MutableQuad {
        &mut self.builder.editor
    }
}

impl QuadEmitter for MeshEmitter<'_> {
    fn emit(&mut self) -> &mut Self {
        self.builder.append_editor();
        self
    }
}
