use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Parsable;
use crate::driver::{Context, ParseMode, UpdateOptions, serialize_table, update_table};
use crate::enums::{ParsableEnum, decode_enum, encode_enum};
use crate::error::{ErrorKind, Result, report};
use crate::table::{DictKey, ParsableDict, Slot};
use crate::value::{Mapping, Value, contains_null, expect_array, expect_object};

// -----------------------------------------------------------------------------
// Codec

/// Converts between a typed attribute value and its boundary value.
pub(crate) trait Codec<F>: 'static {
    fn encode(value: &F, cx: &mut Context<'_>) -> Result<Value>;
    fn decode(value: &Value, cx: &mut Context<'_>) -> Result<F>;
}

pub(crate) struct SerializableCodec;
pub(crate) struct EnumCodec;
pub(crate) struct ParsableCodec;
pub(crate) struct DictCodec;
pub(crate) struct ListCodec;

impl<F: Serialize + DeserializeOwned> Codec<F> for SerializableCodec {
    fn encode(value: &F, _: &mut Context<'_>) -> Result<Value> {
        let out = serde_json::to_value(value)
            .map_err(|err| report(ErrorKind::TypeMismatch, err.to_string()))?;
        // Non-finite floats encode as `null`, which the type may not accept back.
        if contains_null(&out)
            && let Err(err) = F::deserialize(&out)
        {
            return Err(report(
                ErrorKind::TypeMismatch,
                format!("value cannot be read back from its encoding: {err}"),
            ));
        }
        Ok(out)
    }

    fn decode(value: &Value, _: &mut Context<'_>) -> Result<F> {
        F::deserialize(value).map_err(|err| report(ErrorKind::TypeMismatch, err.to_string()))
    }
}

impl<E: ParsableEnum> Codec<E> for EnumCodec {
    #[inline]
    fn encode(value: &E, _: &mut Context<'_>) -> Result<Value> {
        Ok(encode_enum(value))
    }

    #[inline]
    fn decode(value: &Value, _: &mut Context<'_>) -> Result<E> {
        decode_enum(value)
    }
}

fn encode_nested<P: Parsable>(value: &P, cx: &mut Context<'_>) -> Result<Value> {
    let table = cx.registry().table::<P>()?;
    cx.nested(|cx| serialize_table(table, value, cx))
        .map(Value::Object)
}

fn decode_nested<P: Parsable>(value: &Value, cx: &mut Context<'_>) -> Result<P> {
    let input = expect_object(value)?;
    let table = cx.registry().table::<P>()?;
    let mut out = P::default();
    cx.nested(|cx| update_table(table, &mut out, input, UpdateOptions::INITIALIZE, cx))?;
    Ok(out)
}

impl<P: Parsable> Codec<P> for ParsableCodec {
    #[inline]
    fn encode(value: &P, cx: &mut Context<'_>) -> Result<Value> {
        encode_nested(value, cx)
    }

    #[inline]
    fn decode(value: &Value, cx: &mut Context<'_>) -> Result<P> {
        decode_nested(value, cx)
    }
}

impl<D: ParsableDict> Codec<D> for DictCodec {
    fn encode(value: &D, cx: &mut Context<'_>) -> Result<Value> {
        let mut out = Mapping::new();
        for (key, item) in value.entries() {
            let key = key.encode_key();
            let item = match encode_nested(item, cx) {
                Ok(item) => item,
                Err(err) => return Err(err.within_key(key)),
            };
            // Distinct keys may render identically; the last one wins.
            out.insert(key, item);
        }
        Ok(Value::Object(out))
    }

    fn decode(value: &Value, cx: &mut Context<'_>) -> Result<D> {
        let input = expect_object(value)?;
        let mut out = D::default();
        for (key, item) in input {
            let Some(decoded) = D::Key::decode_key(key) else {
                return Err(report(
                    ErrorKind::TypeMismatch,
                    format!("`{key}` is not a valid dictionary key"),
                )
                .within_key(key.clone()));
            };
            let item = decode_nested(item, cx).map_err(|err| err.within_key(key.clone()))?;
            out.insert_entry(decoded, item);
        }
        Ok(out)
    }
}

impl<P: Parsable> Codec<Vec<P>> for ListCodec {
    fn encode(value: &Vec<P>, cx: &mut Context<'_>) -> Result<Value> {
        value
            .iter()
            .enumerate()
            .map(|(index, item)| encode_nested(item, cx).map_err(|err| err.within_index(index)))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }

    fn decode(value: &Value, cx: &mut Context<'_>) -> Result<Vec<P>> {
        expect_array(value)?
            .iter()
            .enumerate()
            .map(|(index, item)| decode_nested(item, cx).map_err(|err| err.within_index(index)))
            .collect()
    }
}

// -----------------------------------------------------------------------------
// AttributeOps

/// Type-erased operations of one registered attribute.
pub(crate) trait AttributeOps<T>: Send + Sync {
    fn is_present(&self, target: &T) -> bool;

    /// Returns `None` if the attribute holds no value.
    fn encode(&self, target: &T, cx: &mut Context<'_>) -> Result<Option<Value>>;

    fn decode(
        &self,
        target: &mut T,
        value: &Value,
        mode: ParseMode,
        cx: &mut Context<'_>,
    ) -> Result<()>;
}

pub(crate) struct SlotOps<T, F, C> {
    slot: Slot<T, F>,
    codec: PhantomData<fn() -> C>,
}

impl<T, F, C> SlotOps<T, F, C> {
    #[inline]
    pub(crate) const fn new(slot: Slot<T, F>) -> Self {
        Self {
            slot,
            codec: PhantomData,
        }
    }
}

impl<T, F, C> AttributeOps<T> for SlotOps<T, F, C>
where
    C: Codec<F>,
{
    #[inline]
    fn is_present(&self, target: &T) -> bool {
        self.slot.read(target).is_some()
    }

    fn encode(&self, target: &T, cx: &mut Context<'_>) -> Result<Option<Value>> {
        self.slot
            .read(target)
            .map(|value| C::encode(value, cx))
            .transpose()
    }

    fn decode(
        &self,
        target: &mut T,
        value: &Value,
        mode: ParseMode,
        cx: &mut Context<'_>,
    ) -> Result<()> {
        let value = match value {
            Value::Null => None,
            other => Some(C::decode(other, cx)?),
        };
        self.slot.write(target, value, mode)
    }
}

// -----------------------------------------------------------------------------
// Specialized

/// Hand-written conversion for an attribute no other category fits.
///
/// Every function is optional at registration. A missing encode or decode
/// function fails with [`ErrorKind::MissingHandler`] only when that direction
/// is actually used, so one-directional attributes are allowed.
///
/// Without a presence check the attribute is always considered present.
///
/// # Examples
///
/// ```
/// use vc_parsable::{ErrorKind, Specialized, Value, report};
///
/// #[derive(Default)]
/// struct Reading {
///     raw: Option<String>,
/// }
///
/// let bar = Specialized::<Reading>::new()
///     .has(|r| r.raw.is_some())
///     .encode(|r| Ok(Value::from(r.raw.clone())))
///     .decode(|r, value| match value.as_str() {
///         Some(s) => {
///             r.raw = Some(s.to_owned());
///             Ok(())
///         }
///         None => Err(report(ErrorKind::TypeMismatch, "expected string")),
///     });
/// # let _ = bar;
/// ```
pub struct Specialized<T> {
    required: bool,
    has: Option<fn(&T) -> bool>,
    encode: Option<fn(&T) -> Result<Value>>,
    decode: Option<fn(&mut T, &Value) -> Result<()>>,
    merge: Option<fn(&mut T, &Value) -> Result<()>>,
}

impl<T> Default for Specialized<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Specialized<T> {
    /// Creates a handler with no functions, for an optional attribute.
    #[inline]
    pub const fn new() -> Self {
        Self {
            required: false,
            has: None,
            encode: None,
            decode: None,
            merge: None,
        }
    }

    /// Marks the attribute as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the presence check.
    pub fn has(mut self, has: fn(&T) -> bool) -> Self {
        self.has = Some(has);
        self
    }

    /// Sets the function producing the boundary value.
    pub fn encode(mut self, encode: fn(&T) -> Result<Value>) -> Self {
        self.encode = Some(encode);
        self
    }

    /// Sets the function that reads a boundary value and stores it.
    pub fn decode(mut self, decode: fn(&mut T, &Value) -> Result<()>) -> Self {
        self.decode = Some(decode);
        self
    }

    /// Sets the function used instead of `decode` in [`ParseMode::Merge`].
    pub fn merge(mut self, merge: fn(&mut T, &Value) -> Result<()>) -> Self {
        self.merge = Some(merge);
        self
    }

    #[inline]
    pub(crate) const fn is_required(&self) -> bool {
        self.required
    }
}

impl<T> AttributeOps<T> for Specialized<T> {
    #[inline]
    fn is_present(&self, target: &T) -> bool {
        self.has.is_none_or(|has| has(target))
    }

    fn encode(&self, target: &T, _: &mut Context<'_>) -> Result<Option<Value>> {
        if !self.is_present(target) {
            return Ok(None);
        }
        let Some(encode) = self.encode else {
            return Err(report(
                ErrorKind::MissingHandler,
                "no encode function registered",
            ));
        };
        encode(target).map(Some)
    }

    fn decode(
        &self,
        target: &mut T,
        value: &Value,
        mode: ParseMode,
        _: &mut Context<'_>,
    ) -> Result<()> {
        if self.required && value.is_null() {
            return Err(report(
                ErrorKind::TypeMismatch,
                "expected a value, found null",
            ));
        }
        if mode == ParseMode::Merge
            && let Some(merge) = self.merge
        {
            return merge(target, value);
        }
        let Some(decode) = self.decode else {
            return Err(report(
                ErrorKind::MissingHandler,
                "no decode function registered",
            ));
        };
        decode(target, value)
    }
}
