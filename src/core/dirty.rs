//! Dirty bits: one flag per render-relevant channel.
//!
//! A bit in a *requested* mask is permission to read that channel this frame.
//! A bit in a *result* mask says the cached value for that channel is valid
//! for the frame. Results are always a subset of the request.

use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct DirtyBits: u32 {
        const POINTS       = 1 << 0;
        const TOPOLOGY     = 1 << 1;
        const WIDTHS       = 1 << 2;
        const NORMALS      = 1 << 3;
        const TRANSFORM    = 1 << 4;
        const VISIBILITY   = 1 << 5;
        const PRIMVAR      = 1 << 6;
        const EXTENT       = 1 << 7;
        const DOUBLE_SIDED = 1 << 8;
    }
}

impl DirtyBits {
    /// Channels the basis-curves adapter knows how to fill.
    pub const ALL_CURVES: Self = Self::POINTS
        .union(Self::TOPOLOGY)
        .union(Self::WIDTHS)
        .union(Self::NORMALS)
        .union(Self::TRANSFORM)
        .union(Self::VISIBILITY)
        .union(Self::PRIMVAR);

    /// Wrap a raw host mask, keeping bits this crate does not name.
    #[inline]
    pub const fn from_host(bits: u32) -> Self {
        Self::from_bits_retain(bits)
    }

    /// Single-channel flags set in `self`, lowest bit first.
    pub fn channels(self) -> impl Iterator<Item = DirtyBits> {
        (0..u32::BITS)
            .map(|i| DirtyBits::from_bits_retain(1 << i))
            .filter(move |bit| self.contains(*bit))
    }
}
