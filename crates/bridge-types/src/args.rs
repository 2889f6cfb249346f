//! # Argument Lists
//!
//! Operations take positional arguments, carried on the wire as a JSON array.
//! [`ArgList`] maps a Rust tuple to and from that array: `()` is `[]`,
//! `(2,)` is `[2]`, `(a, b)` is `[a, b]`.
//!
//! Decoding is strict about arity so that a peer speaking a different
//! contract is rejected at the boundary instead of handing malformed data to
//! the application.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors converting between a tuple and its wire array.
#[derive(Debug, Error)]
pub enum ArgsError {
    #[error("expected {expected} argument(s), got {found}")]
    Arity { expected: usize, found: usize },

    #[error("argument {index} could not be encoded: {source}")]
    Encode {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("argument {index} has the wrong shape: {source}")]
    Decode {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// A positional argument list with a fixed arity.
pub trait ArgList: Sized + Send + 'static {
    /// Number of positional arguments.
    const ARITY: usize;

    /// Encode into the wire array.
    fn into_values(self) -> Result<Vec<Value>, ArgsError>;

    /// Decode from the wire array.
    fn from_values(values: Vec<Value>) -> Result<Self, ArgsError>;
}

impl ArgList for () {
    const ARITY: usize = 0;

    fn into_values(self) -> Result<Vec<Value>, ArgsError> {
        Ok(Vec::new())
    }

    fn from_values(values: Vec<Value>) -> Result<Self, ArgsError> {
        if values.is_empty() {
            Ok(())
        } else {
            Err(ArgsError::Arity {
                expected: 0,
                found: values.len(),
            })
        }
    }
}

macro_rules! impl_arg_list {
    ($arity:expr; $($name:ident : $idx:tt),+) => {
        impl<$($name),+> ArgList for ($($name,)+)
        where
            $($name: Serialize + DeserializeOwned + Send + 'static),+
        {
            const ARITY: usize = $arity;

            fn into_values(self) -> Result<Vec<Value>, ArgsError> {
                Ok(vec![$(
                    serde_json::to_value(self.$idx)
                        .map_err(|source| ArgsError::Encode { index: $idx, source })?
                ),+])
            }

            fn from_values(values: Vec<Value>) -> Result<Self, ArgsError> {
                let found = values.len();
                if found != $arity {
                    return Err(ArgsError::Arity { expected: $arity, found });
                }
                let mut values = values.into_iter();
                Ok(($(
                    {
                        let value = values
                            .next()
                            .ok_or(ArgsError::Arity { expected: $arity, found })?;
                        serde_json::from_value::<$name>(value)
                            .map_err(|source| ArgsError::Decode { index: $idx, source })?
                    },
                )+))
            }
        }
    };
}

impl_arg_list!(1; A: 0);
impl_arg_list!(2; A: 0, B: 1);
impl_arg_list!(3; A: 0, B: 1, C: 2);
impl_arg_list!(4; A: 0, B: 1, C: 2, D: 3);
impl_arg_list!(5; A: 0, B: 1, C: 2, D: 3, E: 4);
impl_arg_list!(6; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
