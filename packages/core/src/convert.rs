//! Total coercions between primitive kinds, text and enumerations.
//!
//! Every conversion here either produces a value or reports "no meaningful
//! value" with `None`; [`convert`] and [`convert_or`] turn that into the
//! caller's default. Nothing in this module panics or returns an error.
//!
//! Numeric to numeric conversions are plain `as` casts: integers wrap, floats
//! saturate and truncate toward zero. This is the documented lossy policy.

use crate::enumeration::Enumerated;

/// Coercion from a source type `S`.
pub trait ConvertFrom<S>: Sized {
    /// `None` means the source carries no meaningful value of `Self`.
    fn convert_from(value: S) -> Option<Self>;
}

/// Convert `value` into `T`, falling back to `T::default()`.
///
/// ```rust
/// use structpack_core::convert::convert;
///
/// assert_eq!(convert::<i32, _>("42"), 42);
/// assert_eq!(convert::<i32, _>("parrot"), 0);
/// assert_eq!(convert::<String, _>(22.5f64), "22.5");
/// ```
pub fn convert<T, S>(value: S) -> T
where
    T: ConvertFrom<S> + Default,
{
    convert_or(value, T::default())
}

/// Convert `value` into `T`, falling back to `default`.
pub fn convert_or<T, S>(value: S, default: T) -> T
where
    T: ConvertFrom<S>,
{
    T::convert_from(value).unwrap_or(default)
}

/// Enumerator from its declared name, or `default` when no name matches.
pub fn enum_from_text<E: Enumerated>(text: &str, default: E) -> E {
    E::from_name(text).unwrap_or(default)
}

/// Enumerator from its declared code, or `default` when no code matches.
pub fn enum_from_code<E: Enumerated>(code: i32, default: E) -> E {
    E::from_code(code).unwrap_or(default)
}

pub fn enum_to_text<E: Enumerated>(value: E) -> &'static str {
    value.name()
}

pub fn enum_to_code<E: Enumerated>(value: E) -> i32 {
    value.code()
}

fn parse_bool(text: &str) -> bool {
    let lower = text.trim().to_ascii_lowercase();
    lower == "true" || lower == "1" || lower == "on"
}

// Integers parse as integers first, then as decimals truncated toward zero.
// Out-of-range values wrap like any other integer cast.
fn parse_integer(text: &str) -> Option<i128> {
    let text = text.trim();
    if let Ok(v) = text.parse::<i128>() {
        return Some(v);
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v as i128),
        _ => None,
    }
}

macro_rules! numeric_from_numeric {
    ($($target:ty),*) => {
        $(
            numeric_from_numeric!(@each $target; i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);
        )*
    };
    (@each $target:ty; $($source:ty),*) => {
        $(
            impl ConvertFrom<$source> for $target {
                fn convert_from(value: $source) -> Option<Self> {
                    Some(value as $target)
                }
            }
        )*
    };
}

numeric_from_numeric!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

macro_rules! integer_from_other {
    ($($target:ty),*) => {
        $(
            impl ConvertFrom<bool> for $target {
                fn convert_from(value: bool) -> Option<Self> {
                    Some(value as u8 as $target)
                }
            }

            impl<'a> ConvertFrom<&'a str> for $target {
                fn convert_from(value: &'a str) -> Option<Self> {
                    parse_integer(value).map(|v| v as $target)
                }
            }

            impl<'a> ConvertFrom<&'a [u8]> for $target {
                fn convert_from(value: &'a [u8]) -> Option<Self> {
                    std::str::from_utf8(value).ok().and_then(<$target>::convert_from)
                }
            }

            impl ConvertFrom<String> for $target {
                fn convert_from(value: String) -> Option<Self> {
                    <$target>::convert_from(value.as_str())
                }
            }
        )*
    };
}

integer_from_other!(i8, i16, i32, i64, u8, u16, u32, u64);

macro_rules! float_from_other {
    ($($target:ty),*) => {
        $(
            impl ConvertFrom<bool> for $target {
                fn convert_from(value: bool) -> Option<Self> {
                    Some(if value { 1.0 } else { 0.0 })
                }
            }

            impl<'a> ConvertFrom<&'a str> for $target {
                fn convert_from(value: &'a str) -> Option<Self> {
                    value.trim().parse::<$target>().ok()
                }
            }

            impl<'a> ConvertFrom<&'a [u8]> for $target {
                fn convert_from(value: &'a [u8]) -> Option<Self> {
                    std::str::from_utf8(value).ok().and_then(<$target>::convert_from)
                }
            }

            impl ConvertFrom<String> for $target {
                fn convert_from(value: String) -> Option<Self> {
                    <$target>::convert_from(value.as_str())
                }
            }
        )*
    };
}

float_from_other!(f32, f64);

macro_rules! bool_from_number {
    (int: $($int:ty),*; float: $($float:ty),*) => {
        $(
            impl ConvertFrom<$int> for bool {
                fn convert_from(value: $int) -> Option<Self> {
                    Some(value != 0)
                }
            }
        )*
        $(
            impl ConvertFrom<$float> for bool {
                fn convert_from(value: $float) -> Option<Self> {
                    Some(value > 0.0 || value < 0.0)
                }
            }
        )*
    };
}

bool_from_number!(int: i8, i16, i32, i64, u8, u16, u32, u64; float: f32, f64);

impl ConvertFrom<bool> for bool {
    fn convert_from(value: bool) -> Option<Self> {
        Some(value)
    }
}

impl<'a> ConvertFrom<&'a str> for bool {
    fn convert_from(value: &'a str) -> Option<Self> {
        Some(parse_bool(value))
    }
}

impl<'a> ConvertFrom<&'a [u8]> for bool {
    fn convert_from(value: &'a [u8]) -> Option<Self> {
        std::str::from_utf8(value).ok().map(parse_bool)
    }
}

impl ConvertFrom<String> for bool {
    fn convert_from(value: String) -> Option<Self> {
        Some(parse_bool(&value))
    }
}

macro_rules! text_from_display {
    ($($source:ty),*) => {
        $(
            impl ConvertFrom<$source> for String {
                fn convert_from(value: $source) -> Option<Self> {
                    Some(value.to_string())
                }
            }
        )*
    };
}

text_from_display!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, bool);

impl<'a> ConvertFrom<&'a str> for String {
    fn convert_from(value: &'a str) -> Option<Self> {
        Some(value.to_string())
    }
}

impl ConvertFrom<String> for String {
    fn convert_from(value: String) -> Option<Self> {
        Some(value)
    }
}

impl<'a> ConvertFrom<&'a [u8]> for String {
    fn convert_from(value: &'a [u8]) -> Option<Self> {
        Some(String::from_utf8_lossy(value).into_owned())
    }
}

impl<'a> ConvertFrom<&'a str> for Vec<u8> {
    fn convert_from(value: &'a str) -> Option<Self> {
        Some(value.as_bytes().to_vec())
    }
}

impl ConvertFrom<String> for Vec<u8> {
    fn convert_from(value: String) -> Option<Self> {
        Some(value.into_bytes())
    }
}

impl<'a> ConvertFrom<&'a [u8]> for Vec<u8> {
    fn convert_from(value: &'a [u8]) -> Option<Self> {
        Some(value.to_vec())
    }
}

impl ConvertFrom<Vec<u8>> for Vec<u8> {
    fn convert_from(value: Vec<u8>) -> Option<Self> {
        Some(value)
    }
}

macro_rules! bytes_from_scalar {
    ($($source:ty),*) => {
        $(
            impl ConvertFrom<$source> for Vec<u8> {
                fn convert_from(_: $source) -> Option<Self> {
                    None
                }
            }
        )*
    };
}

bytes_from_scalar!(i32, i64, u32, u64, f32, f64, bool);
