//! Method tables: each service declares a closed enum of remote method names
//! and one marker type per method binding its parameter and response types.

use std::fmt::{Debug, Display};

use serde::{Serialize, de::DeserializeOwned};
use validator::ValidationErrors;

use crate::xmlrpc::{self, Blob, Value, XmlRpcError};

/// A remote service reachable through [`RpcClient`](crate::RpcClient)
pub trait Service: Send + Sync + 'static {
    const NAME: &'static str;
    /// Path appended to the root url when the configuration sets none
    const DEFAULT_PATH: &'static str;
    type Method: MethodName;
}

/// Closed set of wire method names of a service
pub trait MethodName: Copy + Debug + Display + Send + Sync + 'static {
    fn as_str(&self) -> &'static str;
}

/// How the typed parameter value maps onto the positional XML-RPC parameter list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    /// The value is the only parameter
    Single,
    /// The value is a tuple whose elements are sent in order
    Positional,
    /// No parameter is sent
    Empty,
}

/// A parameter value that can be checked before anything is sent
pub trait Params: Serialize + Send + Sync {
    fn check(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

impl Params for () {}
impl Params for String {}
impl Params for Blob {}

/// One entry of a method table
pub trait RemoteMethod: Copy + Send + Sync + 'static {
    type Service: Service;
    type Params: Params;
    type Response: DeserializeOwned;

    const METHOD: <Self::Service as Service>::Method;
    const STYLE: ParamStyle;

    fn encode_params(params: &Self::Params) -> Result<Vec<Value>, XmlRpcError> {
        match Self::STYLE {
            ParamStyle::Single => Ok(vec![xmlrpc::to_value(params)?]),
            ParamStyle::Positional => match xmlrpc::to_value(params)? {
                Value::Array(items) => Ok(items),
                other => Ok(vec![other]),
            },
            ParamStyle::Empty => Ok(Vec::new()),
        }
    }
}

/// Declares a service method table.
///
/// ```ignore
/// remote_methods! {
///     Signature => enum SignatureMethod {
///         Sign = "signer.sign" (Single: Blob) -> Blob;
///     }
/// }
/// ```
///
/// expands to `SignatureMethod::Sign` plus a `Sign` marker implementing
/// [`RemoteMethod`].
#[macro_export]
macro_rules! remote_methods {
    (
        $service:ty => $(#[$enum_meta:meta])* enum $name:ident {
            $(
                $(#[$meta:meta])*
                $variant:ident = $wire:literal ($style:ident: $params:ty) -> $response:ty;
            )+
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$meta])*
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl $crate::method::MethodName for $name {
            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::method::MethodName::as_str(self))
            }
        }

        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            pub struct $variant;

            impl $crate::method::RemoteMethod for $variant {
                type Service = $service;
                type Params = $params;
                type Response = $response;

                const METHOD: $name = $name::$variant;
                const STYLE: $crate::method::ParamStyle = $crate::method::ParamStyle::$style;
            }
        )+
    };
}
