//! Macros for declaring state and event enums.

/// Declare a fieldless enum and implement [`State`](crate::core::State) for it.
///
/// The enum gets the derives a state needs and an `ALL` constant listing
/// every variant in declaration order.
///
/// # Example
///
/// ```
/// use statekeeper::state_enum;
/// use statekeeper::core::State;
///
/// state_enum! {
///     pub enum OrderState {
///         Submitted,
///         Paid,
///         Fulfilled,
///         Cancelled,
///     }
/// }
///
/// assert_eq!(OrderState::Paid.name(), "Paid");
/// assert_eq!(OrderState::ALL.len(), 4);
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $crate::__label_enum! {
            State;
            $(#[$meta])*
            $vis enum $name {
                $(
                    $(#[$variant_meta])*
                    $variant
                ),*
            }
        }
    };
}

/// Declare a fieldless enum and implement [`Event`](crate::core::Event) for it.
///
/// # Example
///
/// ```
/// use statekeeper::event_enum;
/// use statekeeper::core::Event;
///
/// event_enum! {
///     pub enum OrderEvent {
///         Pay,
///         Fulfill,
///         Cancel,
///     }
/// }
///
/// assert_eq!(OrderEvent::Cancel.name(), "Cancel");
/// assert_eq!(OrderEvent::ALL, &[OrderEvent::Pay, OrderEvent::Fulfill, OrderEvent::Cancel]);
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $crate::__label_enum! {
            Event;
            $(#[$meta])*
            $vis enum $name {
                $(
                    $(#[$variant_meta])*
                    $variant
                ),*
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __label_enum {
    (
        $trait:ident;
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),*
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            #[allow(dead_code)]
            pub const ALL: &'static [$name] = &[$($name::$variant),*];
        }

        impl $crate::core::$trait for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
