//! Checks that make an accessor safe to hand to the primitive reader.
//!
//! The reader computes slice bounds from JSON offsets, strides and counts with
//! plain arithmetic. Every extent is verified here with checked arithmetic
//! first, so a malformed accessor surfaces as a [`DecodeError`] instead of an
//! overflow or a read from the wrong place.

use gltf::accessor::{Accessor, DataType, Dimensions};

use crate::error::DecodeError;

/// Index of the buffer backed by the binary chunk of a GLB.
const GLB_BUFFER: usize = 0;

/// Fail unless every element of `accessor` lies inside its buffer view and the
/// view lies inside the binary chunk of `bin_len` bytes.
pub fn check_extent(accessor: &Accessor<'_>, bin_len: usize) -> Result<(), DecodeError> {
    let index = accessor.index();
    if accessor.sparse().is_some() {
        return Err(DecodeError::SparseAccessor(index));
    }
    let view = accessor.view().ok_or(DecodeError::SparseAccessor(index))?;
    let buffer = view.buffer().index();
    if buffer != GLB_BUFFER {
        return Err(DecodeError::ExternalBuffer {
            accessor: index,
            buffer,
        });
    }
    if view
        .offset()
        .checked_add(view.length())
        .is_none_or(|end| end > bin_len)
    {
        return Err(DecodeError::OutOfBounds {
            accessor: index,
            offset: view.offset(),
            needed: view.length(),
            available: bin_len,
        });
    }

    let count = accessor.count();
    if count == 0 {
        return Ok(());
    }
    let element = accessor.size();
    let stride = view.stride().unwrap_or(element);
    if stride < element {
        return Err(DecodeError::InvalidStride {
            accessor: index,
            stride,
            element,
        });
    }
    let needed = (count - 1)
        .checked_mul(stride)
        .and_then(|span| span.checked_add(element));
    if needed
        .and_then(|needed| needed.checked_add(accessor.offset()))
        .is_none_or(|end| end > view.length())
    {
        return Err(DecodeError::OutOfBounds {
            accessor: index,
            offset: accessor.offset(),
            needed: needed.unwrap_or(usize::MAX),
            available: view.length(),
        });
    }
    Ok(())
}

/// Fail unless `accessor` holds `dimensions`-shaped elements of one of
/// `data_types`.
pub fn check_format(
    accessor: &Accessor<'_>,
    attribute: &'static str,
    data_types: &[DataType],
    dimensions: Dimensions,
) -> Result<(), DecodeError> {
    if accessor.dimensions() == dimensions && data_types.contains(&accessor.data_type()) {
        Ok(())
    } else {
        Err(DecodeError::UnsupportedAttribute {
            accessor: accessor.index(),
            attribute,
        })
    }
}

/// Fail unless `accessor` is a scalar list of unsigned 8, 16 or 32 bit
/// indices.
pub fn check_indices(accessor: &Accessor<'_>) -> Result<(), DecodeError> {
    match (accessor.data_type(), accessor.dimensions()) {
        (DataType::U8 | DataType::U16 | DataType::U32, Dimensions::Scalar) => Ok(()),
        (data_type, _) => Err(DecodeError::UnsupportedComponentType {
            accessor: accessor.index(),
            component_type: data_type.as_gl_enum(),
        }),
    }
}
