//! Macros for reducing boilerplate when defining closed enums
//!
//! Status, priority, role and category values all follow the same shape: a
//! fieldless enum with a snake_case wire key, a few legacy aliases the backend
//! still emits, and a stable declaration order used for sorting.

/// Define a closed enum with its wire keys and [`ClosedEnum`] implementation
///
/// Each variant maps to one canonical key (used for serialization) and any
/// number of aliases accepted when parsing.
///
/// # Example
///
/// ```rust,ignore
/// closed_enum! {
///     /// Task workflow state
///     pub enum TaskStatus {
///         Todo => "todo" | "pending",
///         InProgress => "in_progress" | "in-progress",
///         Done => "done" | "completed",
///     }
/// }
///
/// assert_eq!(TaskStatus::parse("completed"), Some(TaskStatus::Done));
/// assert_eq!(TaskStatus::Done.key(), "done");
/// ```
///
/// [`ClosedEnum`]: crate::core::badge::ClosedEnum
#[macro_export]
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $key:literal $(| $alias:literal)*
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $key $(, alias = $alias)*)]
                $variant,
            )+
        }

        impl $crate::core::badge::ClosedEnum for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn key(&self) -> &'static str {
                match self {
                    $(Self::$variant => $key,)+
                }
            }

            fn ordinal(&self) -> u8 {
                *self as u8
            }

            fn aliases(&self) -> &'static [&'static str] {
                match self {
                    $(Self::$variant => &[$($alias),*],)+
                }
            }

            fn parse(value: &str) -> Option<Self> {
                let value = value.trim();
                $(
                    if value.eq_ignore_ascii_case($key)
                        $(|| value.eq_ignore_ascii_case($alias))*
                    {
                        return Some(Self::$variant);
                    }
                )+
                None
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::badge::ClosedEnum::key(self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as $crate::core::badge::ClosedEnum>::parse(s).ok_or_else(|| {
                    let keys: Vec<&str> = <Self as $crate::core::badge::ClosedEnum>::ALL
                        .iter()
                        .map(<Self as $crate::core::badge::ClosedEnum>::key)
                        .collect();
                    format!("unknown {} '{}', expected one of: {}", stringify!($name), s, keys.join(", "))
                })
            }
        }
    };
}
