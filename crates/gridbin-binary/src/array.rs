use gridbin_interop::OutputStream;
use gridbin_types::TypeCode;
use tracing::warn;

use crate::error::BinaryResult;
use crate::value::{length_prefix, write_code, BinaryValue};

/// Streams the elements of a string array whose length is not known up
/// front.
///
/// Created by `write_string_array` on the named or raw writer, which writes
/// the array type code and reserves the `i32` count. Each element carries its
/// own type code (string or null), so elements need not share a width. The
/// count is patched by [`close`](Self::close); a writer dropped without
/// `close` patches it too. The writer holds the parent's stream borrow, so
/// the parent cannot write or finish while an array is open.
pub struct StringArrayWriter<'w, 'a> {
    out: &'w mut OutputStream<'a>,
    count_offset: usize,
    count: usize,
    closed: bool,
}

impl<'w, 'a> StringArrayWriter<'w, 'a> {
    pub(crate) fn begin(out: &'w mut OutputStream<'a>) -> BinaryResult<Self> {
        write_code(out, TypeCode::StringArray)?;
        let count_offset = out.reserve(4)?;
        Ok(Self {
            out,
            count_offset,
            count: 0,
            closed: false,
        })
    }

    /// Append one element; `None` is written as the null code.
    pub fn write(&mut self, value: Option<&str>) -> BinaryResult<()> {
        value.write_binary(self.out)?;
        self.count += 1;
        Ok(())
    }

    /// Number of elements written so far.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Patch the element count and release the parent writer.
    pub fn close(mut self) -> BinaryResult<()> {
        self.closed = true;
        self.patch_count()
    }

    fn patch_count(&mut self) -> BinaryResult<()> {
        let count = length_prefix(self.count)?;
        self.out.write_at(self.count_offset, count)?;
        Ok(())
    }
}

impl Drop for StringArrayWriter<'_, '_> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(err) = self.patch_count() {
            warn!(error = %err, count = self.count, "failed to patch string array count");
        }
    }
}
