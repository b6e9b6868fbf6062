use core::fmt;

// -----------------------------------------------------------------------------
// Category

/// The closed set of ways an attribute is converted to and from its
/// boundary representation.
///
/// Every registered attribute belongs to exactly one category.
///
/// | Category | Encoded as |
/// |---|---|
/// | `Serializable` | whatever `serde_json` produces for the value |
/// | `Enum` | the variant name |
/// | `Parsable` | the nested object's own mapping |
/// | `DictOfParsables` | an object of nested mappings |
/// | `ListOfParsables` | an array of nested mappings, order kept |
/// | `Specialized` | whatever the attribute's encode function returns |
///
/// The declaration order is also the order in which the serializer visits
/// categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Serializable,
    Enum,
    Parsable,
    DictOfParsables,
    ListOfParsables,
    Specialized,
}

impl Category {
    /// All categories, in serialization order.
    pub const ALL: [Category; 6] = [
        Self::Serializable,
        Self::Enum,
        Self::Parsable,
        Self::DictOfParsables,
        Self::ListOfParsables,
        Self::Specialized,
    ];

    /// Returns `true` if attributes of this category hold nested parsable objects.
    #[inline]
    pub const fn is_nested(self) -> bool {
        matches!(
            self,
            Self::Parsable | Self::DictOfParsables | Self::ListOfParsables
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serializable => f.pad("Serializable"),
            Self::Enum => f.pad("Enum"),
            Self::Parsable => f.pad("Parsable"),
            Self::DictOfParsables => f.pad("DictOfParsables"),
            Self::ListOfParsables => f.pad("ListOfParsables"),
            Self::Specialized => f.pad("Specialized"),
        }
    }
}
