//! Defines helper macros for generating domain port error enums.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

/// Maps the `Connection`/`Query` pair every repository error carries onto
/// the domain [`crate::domain::Error`]; extra variants get explicit arms.
macro_rules! map_repository_error {
    ($name:ident $(, $variant:ident { $($field:ident),* } => $mapped:expr)* $(,)?) => {
        impl From<$name> for crate::domain::Error {
            fn from(err: $name) -> Self {
                match err {
                    $name::Connection { message } => crate::domain::Error::service_unavailable(message),
                    $name::Query { message } => crate::domain::Error::internal(message),
                    $( $name::$variant { $($field),* } => $mapped, )*
                }
            }
        }
    };
}

pub(crate) use define_port_error;
pub(crate) use map_repository_error;

#[cfg(test)]
mod tests {
    use crate::domain::{Error, ErrorCode};

    define_port_error! {
        pub enum SamplePortError {
            Connection { message: String } => "connection: {message}",
            Query { message: String } => "query: {message}",
            Duplicate { slug: String, count: u32 } => "duplicate {slug} ({count})",
            Closed => "closed",
        }
    }

    map_repository_error!(
        SamplePortError,
        Duplicate { slug, count } => Error::conflict(format!("{slug} x{count}")),
        Closed { } => Error::service_unavailable("closed"),
    );

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = SamplePortError::connection("refused");
        assert_eq!(err.to_string(), "connection: refused");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = SamplePortError::duplicate("cats", 2_u32);
        assert_eq!(err.to_string(), "duplicate cats (2)");
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(SamplePortError::closed(), SamplePortError::Closed);
    }

    #[test]
    fn repository_errors_map_to_domain_codes() {
        let cases = [
            (SamplePortError::connection("down"), ErrorCode::ServiceUnavailable),
            (SamplePortError::query("syntax"), ErrorCode::InternalError),
            (SamplePortError::duplicate("cats", 1_u32), ErrorCode::Conflict),
            (SamplePortError::closed(), ErrorCode::ServiceUnavailable),
        ];
        for (err, expected) in cases {
            assert_eq!(Error::from(err).code(), expected);
        }
    }
}
