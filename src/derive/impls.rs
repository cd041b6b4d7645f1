//! [`JsonSchema`] for std, serde_json, indexmap and chrono types.
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{JsonSchema, TypeMetadata, embedded};
use crate::schema::{ArraySchema, NumericSchema, ObjectSchema, Schema, StringSchema};

// -------------------------------- Scalars --------------------------------- //

impl JsonSchema for bool {
    fn structural_schema() -> Schema {
        Schema::boolean()
    }
}

macro_rules! bounded_integer {
    ($($t:ty),*) => {
        $(
            impl JsonSchema for $t {
                fn structural_schema() -> Schema {
                    Schema::Integer(NumericSchema::new().range(<$t>::MIN as f64, <$t>::MAX as f64))
                }
            }
        )*
    };
}

// 64-bit and wider bounds are not exactly representable as f64; keep only
// the sign constraint there
bounded_integer!(i8, i16, i32, u8, u16, u32);

macro_rules! unsigned_integer {
    ($($t:ty),*) => {
        $(
            impl JsonSchema for $t {
                fn structural_schema() -> Schema {
                    Schema::Integer(NumericSchema::new().minimum(0.0))
                }
            }
        )*
    };
}

unsigned_integer!(u64, u128, usize);

macro_rules! signed_integer {
    ($($t:ty),*) => {
        $(
            impl JsonSchema for $t {
                fn structural_schema() -> Schema {
                    Schema::integer()
                }
            }
        )*
    };
}

signed_integer!(i64, i128, isize);

impl JsonSchema for f32 {
    fn structural_schema() -> Schema {
        Schema::number()
    }
}

impl JsonSchema for f64 {
    fn structural_schema() -> Schema {
        Schema::number()
    }
}

impl JsonSchema for String {
    fn structural_schema() -> Schema {
        Schema::string()
    }
}

impl JsonSchema for str {
    fn structural_schema() -> Schema {
        Schema::string()
    }
}

impl JsonSchema for char {
    fn structural_schema() -> Schema {
        Schema::String(StringSchema::new().min_length(1).max_length(1))
    }
}

impl JsonSchema for () {
    fn structural_schema() -> Schema {
        Schema::Null
    }
}

impl JsonSchema for Value {
    fn structural_schema() -> Schema {
        Schema::any()
    }
}

impl JsonSchema for serde_json::Map<String, Value> {
    fn structural_schema() -> Schema {
        Schema::Object(ObjectSchema::new())
    }
}

// ------------------------------- Optionality ------------------------------ //

/// Required but nullable: the key must be present, its value may be `null`.
///
/// `Option<T>` on a field means "may be absent or null"; wrap it in
/// `Nullable` when absence should be an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nullable<T>(pub Option<T>);

impl<T> Nullable<T> {
    pub fn into_inner(self) -> Option<T> {
        self.0
    }
}

impl<T> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        Nullable(value)
    }
}

impl<T: JsonSchema> JsonSchema for Nullable<T> {
    fn structural_schema() -> Schema {
        T::structural_schema().nullable()
    }

    fn metadata() -> TypeMetadata {
        T::metadata()
    }
}

impl<T: JsonSchema> JsonSchema for Option<T> {
    /// serde writes `None` as `null` and accepts a missing key, so both
    /// modifiers apply.
    fn structural_schema() -> Schema {
        T::structural_schema().nullable().optional()
    }

    fn metadata() -> TypeMetadata {
        T::metadata()
    }
}

// ------------------------------- Indirection ------------------------------ //

macro_rules! transparent_pointer {
    ($($p:ident),*) => {
        $(
            impl<T: JsonSchema + ?Sized> JsonSchema for $p<T> {
                fn structural_schema() -> Schema {
                    T::structural_schema()
                }

                fn metadata() -> TypeMetadata {
                    T::metadata()
                }
            }
        )*
    };
}

transparent_pointer!(Box, Rc, Arc);

impl<T: JsonSchema + ?Sized> JsonSchema for &T {
    fn structural_schema() -> Schema {
        T::structural_schema()
    }

    fn metadata() -> TypeMetadata {
        T::metadata()
    }
}

// ------------------------------- Sequences -------------------------------- //

fn sequence_metadata<T: JsonSchema + ?Sized>() -> TypeMetadata {
    TypeMetadata { items: T::metadata().non_empty(), ..TypeMetadata::default() }
}

impl<T: JsonSchema> JsonSchema for Vec<T> {
    fn structural_schema() -> Schema {
        Schema::array_of(T::structural_schema())
    }

    fn metadata() -> TypeMetadata {
        sequence_metadata::<T>()
    }
}

impl<T: JsonSchema> JsonSchema for VecDeque<T> {
    fn structural_schema() -> Schema {
        Schema::array_of(T::structural_schema())
    }

    fn metadata() -> TypeMetadata {
        sequence_metadata::<T>()
    }
}

impl<T: JsonSchema> JsonSchema for [T] {
    fn structural_schema() -> Schema {
        Schema::array_of(T::structural_schema())
    }

    fn metadata() -> TypeMetadata {
        sequence_metadata::<T>()
    }
}

impl<T: JsonSchema, const N: usize> JsonSchema for [T; N] {
    fn structural_schema() -> Schema {
        ArraySchema::of(T::structural_schema()).min_items(N as u64).max_items(N as u64).into()
    }

    fn metadata() -> TypeMetadata {
        sequence_metadata::<T>()
    }
}

impl<T: JsonSchema, S> JsonSchema for HashSet<T, S> {
    fn structural_schema() -> Schema {
        ArraySchema::of(T::structural_schema()).unique().into()
    }

    fn metadata() -> TypeMetadata {
        sequence_metadata::<T>()
    }
}

impl<T: JsonSchema> JsonSchema for BTreeSet<T> {
    fn structural_schema() -> Schema {
        ArraySchema::of(T::structural_schema()).unique().into()
    }

    fn metadata() -> TypeMetadata {
        sequence_metadata::<T>()
    }
}

impl<T: JsonSchema, S> JsonSchema for IndexSet<T, S> {
    fn structural_schema() -> Schema {
        ArraySchema::of(T::structural_schema()).unique().into()
    }

    fn metadata() -> TypeMetadata {
        sequence_metadata::<T>()
    }
}

macro_rules! tuple_impl {
    ($($name:ident),+) => {
        impl<$($name: JsonSchema),+> JsonSchema for ($($name,)+) {
            fn structural_schema() -> Schema {
                ArraySchema::tuple(vec![$(embedded::<$name>()),+]).into()
            }
        }
    };
}

tuple_impl!(A);
tuple_impl!(A, B);
tuple_impl!(A, B, C);
tuple_impl!(A, B, C, D);
tuple_impl!(A, B, C, D, E);
tuple_impl!(A, B, C, D, E, F);

// ---------------------------------- Maps ---------------------------------- //

fn map_schema<V: JsonSchema + ?Sized>() -> Schema {
    ObjectSchema::new().additional(V::structural_schema()).into()
}

fn map_metadata<V: JsonSchema + ?Sized>() -> TypeMetadata {
    TypeMetadata { values: V::metadata().non_empty(), ..TypeMetadata::default() }
}

impl<V: JsonSchema, S> JsonSchema for HashMap<String, V, S> {
    fn structural_schema() -> Schema {
        map_schema::<V>()
    }

    fn metadata() -> TypeMetadata {
        map_metadata::<V>()
    }
}

impl<V: JsonSchema> JsonSchema for BTreeMap<String, V> {
    fn structural_schema() -> Schema {
        map_schema::<V>()
    }

    fn metadata() -> TypeMetadata {
        map_metadata::<V>()
    }
}

impl<V: JsonSchema, S> JsonSchema for IndexMap<String, V, S> {
    fn structural_schema() -> Schema {
        map_schema::<V>()
    }

    fn metadata() -> TypeMetadata {
        map_metadata::<V>()
    }
}

// --------------------------------- chrono --------------------------------- //

impl<Tz: TimeZone> JsonSchema for DateTime<Tz> {
    fn structural_schema() -> Schema {
        Schema::String(StringSchema::new().format("date-time"))
    }
}

impl JsonSchema for NaiveDate {
    fn structural_schema() -> Schema {
        Schema::String(StringSchema::new().format("date"))
    }
}

// no offset, so neither satisfies the RFC 3339 `date-time` / `time` formats
impl JsonSchema for NaiveDateTime {
    fn structural_schema() -> Schema {
        Schema::string()
    }
}

impl JsonSchema for NaiveTime {
    fn structural_schema() -> Schema {
        Schema::string()
    }
}
