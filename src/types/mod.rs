//! Typed perception taxonomy
//!
//! One closed enum per family. Every variant carries its wire code as the
//! enum discriminant, so `variant as u8` is the value producers put on the
//! wire and the registry tables are derived from these definitions.
//!
//! On the wire every family serializes as its integer code. Deserializing a
//! code this build does not know yields the family's sentinel (for families
//! that have one), since the payload most likely comes from a newer producer.

use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::registry::Family;

/// A family enum with a stable integer code per variant
pub trait CodedEnum: Sized + Copy + 'static {
    /// The family this enum implements
    const FAMILY: Family;
    /// `(symbol, code)` pairs in declaration order
    const MEMBERS: &'static [(&'static str, u8)];
    /// Variant standing in for "no information", if the family has one
    const SENTINEL: Option<Self>;
    /// Code of [`Self::SENTINEL`]
    const SENTINEL_CODE: Option<u8>;

    /// Wire code of this variant
    fn code(self) -> u8;

    /// Symbolic name of this variant (e.g. `"PEDESTRIAN"`)
    fn symbol(self) -> &'static str;

    /// Decode a wire code, failing with `UnknownCode` on a miss
    fn from_code(code: u8) -> Result<Self>;

    /// Resolve a symbolic name, failing with `UnknownSymbol` on a miss
    fn from_symbol(symbol: &str) -> Result<Self>;

    /// Decode a wire code, mapping unknown codes to the sentinel
    fn from_code_lenient(code: u8) -> Result<Self> {
        decode_wire(i64::from(code))
    }
}

/// Decode a raw integer read off the wire into a family value.
///
/// Values outside `u8` are unknown codes like any other. Unknown codes map to
/// the family sentinel; families without a sentinel return `UnknownCode`.
pub fn decode_wire<T: CodedEnum>(raw: i64) -> Result<T> {
    let decoded = u8::try_from(raw)
        .map_err(|_| SchemaError::UnknownCode { family: T::FAMILY, code: raw })
        .and_then(T::from_code);

    match decoded {
        Err(err @ SchemaError::UnknownCode { .. }) => match T::SENTINEL {
            Some(sentinel) => {
                debug!(family = %T::FAMILY, code = raw, "unknown code, falling back to sentinel");
                Ok(sentinel)
            }
            None => Err(err),
        },
        other => other,
    }
}

macro_rules! coded_enum {
    (@sentinel $name:ident) => { None };
    (@sentinel $name:ident $sentinel:ident) => { Some($name::$sentinel) };
    (@sentinel_code $name:ident) => { None };
    (@sentinel_code $name:ident $sentinel:ident) => { Some($name::$sentinel as u8) };

    (
        $(#[$meta:meta])*
        $name:ident $(, sentinel = $sentinel:ident)? {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $symbol:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $code, )+
        }

        impl $name {
            /// All variants in code order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn code(self) -> u8 {
                self as u8
            }

            pub const fn symbol(self) -> &'static str {
                match self {
                    $( $name::$variant => $symbol, )+
                }
            }
        }

        impl $crate::types::CodedEnum for $name {
            const FAMILY: $crate::registry::Family = $crate::registry::Family::$name;
            const MEMBERS: &'static [(&'static str, u8)] = &[$( ($symbol, $code) ),+];
            const SENTINEL: Option<Self> = coded_enum!(@sentinel $name $($sentinel)?);
            const SENTINEL_CODE: Option<u8> = coded_enum!(@sentinel_code $name $($sentinel)?);

            fn code(self) -> u8 {
                self as u8
            }

            fn symbol(self) -> &'static str {
                $name::symbol(self)
            }

            fn from_code(code: u8) -> $crate::error::Result<Self> {
                match code {
                    $( $code => Ok($name::$variant), )+
                    _ => Err($crate::error::SchemaError::UnknownCode {
                        family: $crate::registry::Family::$name,
                        code: i64::from(code),
                    }),
                }
            }

            fn from_symbol(symbol: &str) -> $crate::error::Result<Self> {
                match symbol {
                    $( $symbol => Ok($name::$variant), )+
                    _ => Err($crate::error::SchemaError::UnknownSymbol {
                        family: $crate::registry::Family::$name,
                        symbol: symbol.to_string(),
                    }),
                }
            }
        }

        $(
            impl Default for $name {
                fn default() -> Self {
                    $name::$sentinel
                }
            }
        )?

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.symbol())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::SchemaError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                <$name as $crate::types::CodedEnum>::from_symbol(s)
            }
        }

        impl TryFrom<u8> for $name {
            type Error = $crate::error::SchemaError;

            fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
                <$name as $crate::types::CodedEnum>::from_code(code)
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value as u8
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_u8(*self as u8)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let raw = <i64 as ::serde::Deserialize>::deserialize(deserializer)?;
                $crate::types::decode_wire::<$name>(raw).map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub mod measurement;
pub mod object;
pub mod sensor;

pub use measurement::{MeasState, MovementClassification, PerceptionType};
pub use object::{ClassificationTrack, Dimensions, ObjectClassification};
pub use sensor::{SensorModality, TrackingPoint};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wire_out_of_u8_range() {
        let value: MovementClassification = decode_wire(1_000).unwrap();
        assert_eq!(value, MovementClassification::NoInfo);

        let value: TrackingPoint = decode_wire(-1).unwrap();
        assert_eq!(value, TrackingPoint::Unknown);
    }

    #[test]
    fn test_decode_wire_without_sentinel() {
        let err = decode_wire::<SensorModality>(0).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnknownCode { family: Family::SensorModality, code: 0 }
        ));
    }

    #[test]
    fn test_sentinel_codes() {
        assert_eq!(MeasState::SENTINEL_CODE, Some(0));
        assert_eq!(ObjectClassification::SENTINEL_CODE, Some(0));
        assert_eq!(SensorModality::SENTINEL_CODE, None);
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&ObjectClassification::Pedestrian).unwrap();
        assert_eq!(json, "4");

        let back: ObjectClassification = serde_json::from_str("4").unwrap();
        assert_eq!(back, ObjectClassification::Pedestrian);

        let newer: ObjectClassification = serde_json::from_str("42").unwrap();
        assert_eq!(newer, ObjectClassification::NoInfo);

        assert!(serde_json::from_str::<SensorModality>("9").is_err());
    }
}
