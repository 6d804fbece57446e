//! Defines helper macros for generating domain port error enums.
//!
//! Each variant names the [`crate::domain::ErrorCode`] it surfaces as, so the
//! generated enum converts into the domain [`crate::domain::Error`] without a
//! hand-written mapping per port.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
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
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
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

    (@pattern $name:ident $variant:ident) => {
        $name::$variant
    };

    (@pattern $name:ident $variant:ident { $($field:ident),* }) => {
        $name::$variant { .. }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr ; $code:ident
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $(#[doc = stringify!($field)] $field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*

            /// Domain error code this failure surfaces as.
            pub fn code(&self) -> $crate::domain::ErrorCode {
                match self {
                    $(
                        define_port_error!(@pattern $name $variant $( { $($field),* } )?) => {
                            $crate::domain::ErrorCode::$code
                        }
                    )*
                }
            }
        }

        impl From<$name> for $crate::domain::Error {
            fn from(value: $name) -> Self {
                let code = value.code();
                Self::try_new(code, value.to_string())
                    .unwrap_or_else(|_| Self::new(code, stringify!($name)))
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use crate::domain::{Error, ErrorCode};

    define_port_error! {
        pub enum ExamplePortError {
            Foo { message: String } => "foo: {message}"; ServiceUnavailable,
            Bar { count: u32 } => "bar: {count}"; InternalError,
            Baz { message: String, count: u32 } => "baz: {message} ({count})"; InternalError,
            Qux => "qux"; UserNotFound,
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = ExamplePortError::foo("hello");
        assert_eq!(err.to_string(), "foo: hello");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = ExamplePortError::bar(42_u32);
        assert_eq!(err.to_string(), "bar: 42");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = ExamplePortError::baz("hello", 42_u32);
        assert_eq!(err.to_string(), "baz: hello (42)");
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(ExamplePortError::qux().to_string(), "qux");
    }

    #[test]
    fn variants_convert_into_domain_errors_with_declared_code() {
        let err: Error = ExamplePortError::foo("db down").into();
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
        assert_eq!(err.message(), "foo: db down");

        let err: Error = ExamplePortError::qux().into();
        assert_eq!(err.code(), ErrorCode::UserNotFound);
    }

    define_port_error! {
        pub enum BareError {
            Raw { message: String } => "{message}"; InternalError,
        }
    }

    #[test]
    fn blank_messages_fall_back_to_the_enum_name() {
        let err: Error = BareError::raw("  ").into();
        assert_eq!(err.message(), "BareError");
    }
}
