use alloc::format;
use alloc::string::String;

use crate::driver::ParseMode;
use crate::error::{ErrorKind, Result, report};

// -----------------------------------------------------------------------------
// Slot

pub(crate) enum Getter<T, F> {
    Maybe(fn(&T) -> Option<&F>),
    Always(fn(&T) -> &F),
}

pub(crate) enum Setter<T, F> {
    Required(fn(&mut T, F)),
    Optional(fn(&mut T, Option<F>)),
}

/// Typed access to one attribute of `T` holding a value of type `F`.
///
/// A slot tells the framework how to read, write and check the presence of
/// an attribute. It is category-agnostic: the same slot type is passed to
/// every typed registration method of [`TableBuilder`](crate::TableBuilder).
///
/// There are three flavours:
///
/// - [`required`](Self::required): stored as `Option<F>`, absent until set,
///   encoding fails while absent and `null` is rejected on input.
/// - [`optional`](Self::optional): stored as `Option<F>`, omitted from
///   output while absent and cleared by `null` on input.
/// - [`always`](Self::always): stored as a plain `F` initialized by
///   `Default`, hence always present.
///
/// # Examples
///
/// ```
/// use vc_parsable::Slot;
///
/// #[derive(Default)]
/// struct Tile {
///     height: Option<u32>,
///     label: Option<String>,
///     tags: Vec<String>,
/// }
///
/// let height = Slot::required(|t: &Tile| t.height.as_ref(), |t, v| t.height = Some(v));
/// let label = Slot::optional(|t: &Tile| t.label.as_ref(), |t, v| t.label = v);
/// let tags = Slot::always(|t: &Tile| &t.tags, |t, v| t.tags = v)
///     .merge(|t, v| {
///         t.tags.extend(v);
///         Ok(())
///     });
/// # let _ = (height, label, tags);
/// ```
pub struct Slot<T, F> {
    pub(crate) get: Getter<T, F>,
    pub(crate) set: Setter<T, F>,
    pub(crate) merge: Option<fn(&mut T, F) -> Result<()>>,
    pub(crate) validate: Option<fn(&F) -> Result<(), String>>,
}

impl<T, F> Slot<T, F> {
    /// Creates a slot for a required attribute stored as `Option<F>`.
    pub fn required(get: fn(&T) -> Option<&F>, set: fn(&mut T, F)) -> Self {
        Self {
            get: Getter::Maybe(get),
            set: Setter::Required(set),
            merge: None,
            validate: None,
        }
    }

    /// Creates a slot for an optional attribute stored as `Option<F>`.
    ///
    /// The setter receives `None` when the attribute is cleared.
    pub fn optional(get: fn(&T) -> Option<&F>, set: fn(&mut T, Option<F>)) -> Self {
        Self {
            get: Getter::Maybe(get),
            set: Setter::Optional(set),
            merge: None,
            validate: None,
        }
    }

    /// Creates a slot for an attribute that always holds a value.
    pub fn always(get: fn(&T) -> &F, set: fn(&mut T, F)) -> Self {
        Self {
            get: Getter::Always(get),
            set: Setter::Required(set),
            merge: None,
            validate: None,
        }
    }

    /// Sets the operation used instead of the setter when parsing in
    /// [`ParseMode::Merge`].
    pub fn merge(mut self, merge: fn(&mut T, F) -> Result<()>) -> Self {
        self.merge = Some(merge);
        self
    }

    /// Sets a check run on every decoded value before it is stored.
    ///
    /// A rejected value fails with [`ErrorKind::TypeMismatch`] carrying the
    /// returned message.
    pub fn validate(mut self, validate: fn(&F) -> Result<(), String>) -> Self {
        self.validate = Some(validate);
        self
    }

    /// Returns `true` if a value must be present when encoding.
    #[inline]
    pub(crate) fn is_required(&self) -> bool {
        matches!(self.set, Setter::Required(_))
    }

    pub(crate) fn read<'t>(&self, target: &'t T) -> Option<&'t F> {
        match self.get {
            Getter::Maybe(get) => get(target),
            Getter::Always(get) => Some(get(target)),
        }
    }

    /// Stores `value`, where `None` is the explicit "no value" marker.
    pub(crate) fn write(&self, target: &mut T, value: Option<F>, mode: ParseMode) -> Result<()> {
        let Some(value) = value else {
            return match self.set {
                Setter::Optional(set) => {
                    set(target, None);
                    Ok(())
                }
                Setter::Required(_) => Err(report(
                    ErrorKind::TypeMismatch,
                    "expected a value, found null",
                )),
            };
        };

        if let Some(validate) = self.validate {
            validate(&value).map_err(|message| {
                report(ErrorKind::TypeMismatch, format!("rejected value: {message}"))
            })?;
        }

        if mode == ParseMode::Merge
            && let Some(merge) = self.merge
        {
            return merge(target, value);
        }

        match self.set {
            Setter::Required(set) => set(target, value),
            Setter::Optional(set) => set(target, Some(value)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::Slot;
    use crate::ErrorKind;
    use crate::driver::ParseMode;

    #[derive(Default)]
    struct Record {
        count: Option<u32>,
        note: Option<String>,
        items: Vec<u8>,
    }

    fn count() -> Slot<Record, u32> {
        Slot::required(|p: &Record| p.count.as_ref(), |p, v| p.count = Some(v)).validate(|v| {
            if *v < 100 {
                Ok(())
            } else {
                Err(String::from("count must be below 100"))
            }
        })
    }

    fn note() -> Slot<Record, String> {
        Slot::optional(|p: &Record| p.note.as_ref(), |p, v| p.note = v)
    }

    fn items() -> Slot<Record, Vec<u8>> {
        Slot::always(|p: &Record| &p.items, |p, v| p.items = v).merge(|p, v| {
            p.items.extend(v);
            Ok(())
        })
    }

    #[test]
    fn presence() {
        let mut record = Record::default();
        assert!(count().read(&record).is_none());
        assert!(note().read(&record).is_none());
        assert!(items().read(&record).is_some());
        assert!(count().is_required());
        assert!(!note().is_required());

        count().write(&mut record, Some(7), ParseMode::Initialize).unwrap();
        assert_eq!(count().read(&record), Some(&7));
    }

    #[test]
    fn null_marker() {
        let mut record = Record::default();
        note()
            .write(&mut record, Some(String::from("hi")), ParseMode::Initialize)
            .unwrap();
        note().write(&mut record, None, ParseMode::Initialize).unwrap();
        assert_eq!(record.note, None);

        let err = count()
            .write(&mut record, None, ParseMode::Initialize)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn validator_rejects() {
        let mut record = Record::default();
        let err = count()
            .write(&mut record, Some(500), ParseMode::Initialize)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.message(), "rejected value: count must be below 100");
        assert_eq!(record.count, None);
    }

    #[test]
    fn merge_only_in_merge_mode() {
        let mut record = Record::default();
        items()
            .write(&mut record, Some(vec![1, 2]), ParseMode::Initialize)
            .unwrap();
        items()
            .write(&mut record, Some(vec![3]), ParseMode::Merge)
            .unwrap();
        assert_eq!(record.items, [1, 2, 3]);

        items()
            .write(&mut record, Some(vec![9]), ParseMode::Initialize)
            .unwrap();
        assert_eq!(record.items, [9]);

        // Without a merge operation the setter is used.
        note()
            .write(&mut record, Some(String::from("a")), ParseMode::Merge)
            .unwrap();
        assert_eq!(record.note.as_deref(), Some("a"));
    }
}
