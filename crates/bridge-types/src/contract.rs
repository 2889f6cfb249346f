//! # Operation Contracts
//!
//! A contract is the table of operations both peers agree on. Each operation
//! is a zero-sized type naming its wire name, argument tuple and return type.
//! Engines are generic over the contract, so calling an operation from a
//! different contract, or with the wrong arguments, fails to compile.
//!
//! ```ignore
//! bridge_types::contract! {
//!     /// Operations the parent page serves to its webview.
//!     pub contract DemoContract {
//!         GetText = "getText": () => String;
//!         MultiplyByFour = "multiplyByFour": (i64,) => i64;
//!     }
//! }
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::args::ArgList;

/// Marker for a table of operations shared by both peers.
pub trait Contract: Send + Sync + 'static {
    /// Wire names of every operation in the contract.
    ///
    /// Dynamic callers are checked against this list. An empty list means
    /// the contract is open and any name is forwarded.
    fn operations() -> &'static [&'static str] {
        &[]
    }

    /// Whether `name` is declared by this contract.
    fn declares(name: &str) -> bool {
        let operations = Self::operations();
        operations.is_empty() || operations.contains(&name)
    }
}

/// One entry of a [`Contract`].
pub trait Operation: Send + Sync + 'static {
    /// Contract this operation belongs to.
    type Contract: Contract;

    /// Positional arguments.
    type Args: ArgList;

    /// Successful result.
    type Output: Serialize + DeserializeOwned + Send + 'static;

    /// Name sent as `functionName` on the wire.
    const NAME: &'static str;
}

/// Declare a contract and its operations.
///
/// Expands to a marker type implementing [`Contract`] plus one unit struct
/// per operation implementing [`Operation`].
#[macro_export]
macro_rules! contract {
    (
        $(#[$meta:meta])*
        $vis:vis contract $contract:ident {
            $(
                $(#[$op_meta:meta])*
                $op:ident = $name:literal : $args:ty => $output:ty;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        $vis struct $contract;

        impl $crate::Contract for $contract {
            fn operations() -> &'static [&'static str] {
                &[$($name),*]
            }
        }

        $(
            $(#[$op_meta])*
            #[derive(Debug, Clone, Copy, Default)]
            $vis struct $op;

            impl $crate::Operation for $op {
                type Contract = $contract;
                type Args = $args;
                type Output = $output;
                const NAME: &'static str = $name;
            }
        )*
    };
}
