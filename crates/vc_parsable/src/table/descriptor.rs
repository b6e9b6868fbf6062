use crate::category::Category;

// -----------------------------------------------------------------------------
// AttributeDescriptor

/// Static information about one registered attribute.
///
/// Descriptors are produced by [`TableBuilder`](crate::TableBuilder) and
/// never change after the table is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDescriptor {
    pub(crate) name: &'static str,
    pub(crate) category: Category,
    pub(crate) required: bool,
    pub(crate) order_rank: Option<usize>,
}

impl AttributeDescriptor {
    /// Returns the attribute name, which is also its key in a mapping.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the category the attribute was registered into.
    #[inline]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Returns `true` if encoding fails while the attribute holds no value.
    #[inline]
    pub const fn required(&self) -> bool {
        self.required
    }

    /// Returns the attribute's position in the declared parse order, if listed.
    #[inline]
    pub const fn order_rank(&self) -> Option<usize> {
        self.order_rank
    }
}
