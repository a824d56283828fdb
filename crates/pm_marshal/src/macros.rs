/// Declares an enum written on the wire as an integer code.
///
/// The first variant is the zero value returned by [`Default`].
///
/// # Examples
///
/// ```
/// use pm_marshal::{WireEnum, wire_enum};
///
/// wire_enum! {
///     pub enum Rarity {
///         Common = 0,
///         Rare = 10,
///         Cursed = -1,
///     }
/// }
///
/// assert_eq!(Rarity::default(), Rarity::Common);
/// assert_eq!(Rarity::Rare.code(), 10);
/// assert_eq!(Rarity::by_name("Cursed").unwrap(), Rarity::Cursed);
/// assert!(Rarity::by_name("cursed").is_err());
/// ```
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(#[$first_meta:meta])*
            $first:ident = $first_code:expr
            $(, $(#[$variant_meta:meta])* $variant:ident = $code:expr)* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
        $vis enum $name {
            $(#[$first_meta])*
            #[default]
            $first,
            $($(#[$variant_meta])* $variant,)*
        }

        impl $crate::registry::WireEnum for $name {
            fn info() -> &'static $crate::registry::EnumInfo {
                static INFO: $crate::registry::EnumInfo = $crate::registry::EnumInfo::new(
                    ::core::stringify!($name),
                    &[
                        $crate::registry::EnumVariant::new(::core::stringify!($first), $first_code),
                        $($crate::registry::EnumVariant::new(::core::stringify!($variant), $code),)*
                    ],
                );
                &INFO
            }

            #[inline]
            fn code(self) -> i64 {
                match self {
                    Self::$first => $first_code,
                    $(Self::$variant => $code,)*
                }
            }

            fn from_code(code: i64) -> ::core::option::Option<Self> {
                if code == $first_code {
                    return ::core::option::Option::Some(Self::$first);
                }
                $(
                    if code == $code {
                        return ::core::option::Option::Some(Self::$variant);
                    }
                )*
                ::core::option::Option::None
            }
        }
    };
}

/// Submits a [`Class`](crate::Class) for
/// [`ClassRegistry::auto_register`](crate::ClassRegistry::auto_register).
///
/// Expands to nothing without the `auto_register` feature.
///
/// ```ignore
/// pm_marshal::auto_register_class!(Player, Item);
/// ```
#[macro_export]
macro_rules! auto_register_class {
    ($($ty:ty),+ $(,)?) => {
        $crate::__auto_register! {
            $(
                $crate::__macro_exports::inventory::submit! {
                    $crate::__macro_exports::auto_register::ClassEntry(
                        $crate::__macro_exports::auto_register::register_class::<$ty>
                    )
                }
            )+
        }
    };
}

/// Submits a [`WireEnum`](crate::WireEnum) for
/// [`EnumRegistry::auto_register`](crate::EnumRegistry::auto_register).
///
/// Expands to nothing without the `auto_register` feature.
#[macro_export]
macro_rules! auto_register_enum {
    ($($ty:ty),+ $(,)?) => {
        $crate::__auto_register! {
            $(
                $crate::__macro_exports::inventory::submit! {
                    $crate::__macro_exports::auto_register::EnumEntry(
                        $crate::__macro_exports::auto_register::register_enum::<$ty>
                    )
                }
            )+
        }
    };
}

#[cfg(feature = "auto_register")]
#[doc(hidden)]
#[macro_export]
macro_rules! __auto_register {
    ($($tt:tt)*) => { $($tt)* };
}

#[cfg(not(feature = "auto_register"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __auto_register {
    ($($tt:tt)*) => {};
}
